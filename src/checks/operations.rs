//! Benign operations against the workspace.
//!
//! A scratch-file round trip and two read-only git commands. The scratch
//! file is owned by [`ScratchFile`], which removes it when dropped, so no
//! path through the round trip can leave it behind.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::checks::status::CheckResult;
use crate::error::{Result, SvcheckError};
use crate::shell::{CommandSpec, ProcessRunner};

/// Name of the combined result.
pub const OPERATIONS: &str = "operations";

/// Content written to the scratch file.
pub const SCRATCH_CONTENT: &str = "MCP test content for Qt5 development";

/// A file that is deleted when this guard goes out of scope.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    /// Create `path`, failing if it already exists.
    pub fn create(path: PathBuf) -> Result<Self> {
        OpenOptions::new().write(true).create_new(true).open(&path)?;
        Ok(Self { path })
    }

    /// Scratch file for this process inside `workspace`.
    pub fn in_workspace(workspace: &Path) -> Result<Self> {
        let name = format!(".svcheck-scratch-{}.tmp", std::process::id());
        Self::create(workspace.join(name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("failed to remove scratch file {}: {}", self.path.display(), e);
        }
    }
}

/// Write `content` to a fresh scratch file in `workspace` and read it back.
pub fn round_trip(workspace: &Path, content: &str) -> Result<()> {
    round_trip_with(workspace, content, |_| Ok(()))
}

/// As [`round_trip`], calling `between` after the write and before the read.
pub fn round_trip_with<F>(workspace: &Path, content: &str, between: F) -> Result<()>
where
    F: FnOnce(&Path) -> Result<()>,
{
    let scratch = ScratchFile::in_workspace(workspace)?;
    {
        let mut file = OpenOptions::new().write(true).open(scratch.path())?;
        file.write_all(content.as_bytes())?;
    }

    between(scratch.path())?;

    let read = fs::read(scratch.path())?;
    if read != content.as_bytes() {
        return Err(SvcheckError::ContentMismatch {
            path: scratch.path().to_path_buf(),
        });
    }
    Ok(())
}

/// Runs the operation battery against a workspace.
pub struct OperationCheck<'a> {
    runner: &'a dyn ProcessRunner,
    workspace: &'a Path,
    timeout: std::time::Duration,
}

impl<'a> OperationCheck<'a> {
    pub fn new(
        runner: &'a dyn ProcessRunner,
        workspace: &'a Path,
        timeout: std::time::Duration,
    ) -> Self {
        Self {
            runner,
            workspace,
            timeout,
        }
    }

    /// Run both operations and combine them.
    pub fn run(&self) -> CheckResult {
        CheckResult::all_of(OPERATIONS, vec![self.check_files(), self.check_git()])
    }

    /// Scratch-file round trip.
    pub fn check_files(&self) -> CheckResult {
        const NAME: &str = "File operations";

        match round_trip(self.workspace, SCRATCH_CONTENT) {
            Ok(()) => CheckResult::pass(NAME, "read/write working"),
            Err(SvcheckError::ContentMismatch { .. }) => CheckResult::fail(NAME, "content mismatch"),
            Err(e) => CheckResult::fail(NAME, format!("failed: {}", e)),
        }
    }

    /// `git status` and `git branch --show-current` must both succeed.
    pub fn check_git(&self) -> CheckResult {
        const NAME: &str = "Git operations";

        let status = CommandSpec::new("git")
            .args(["status", "--porcelain"])
            .cwd(self.workspace);
        let branch = CommandSpec::new("git")
            .args(["branch", "--show-current"])
            .cwd(self.workspace);

        // Both commands always run.
        let status_result = self
            .runner
            .run(&status, self.timeout)
            .and_then(|output| output.ensure_success(&status));
        let branch_result = self
            .runner
            .run(&branch, self.timeout)
            .and_then(|output| output.ensure_success(&branch).map(|()| output));

        match (status_result, branch_result) {
            (Ok(()), Ok(output)) => {
                let name = output.stdout.trim();
                if name.is_empty() {
                    CheckResult::pass(NAME, "working on a detached HEAD")
                } else {
                    CheckResult::pass(NAME, format!("working on branch '{}'", name))
                }
            }
            (status_result, branch_result) => {
                let errors: Vec<String> = [status_result.err(), branch_result.err()]
                    .into_iter()
                    .flatten()
                    .map(|e| e.to_string())
                    .collect();
                CheckResult::fail(NAME, format!("commands failed: {}", errors.join("; ")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{Liveness, ProcessOutput};
    use std::cell::RefCell;
    use std::time::Duration;
    use tempfile::TempDir;

    fn scratch_files(dir: &Path) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(".svcheck-scratch-"))
            })
            .collect()
    }

    struct GitRunner {
        status_code: i32,
        branch_code: i32,
        invoked: RefCell<Vec<String>>,
    }

    impl GitRunner {
        fn new(status_code: i32, branch_code: i32) -> Self {
            Self {
                status_code,
                branch_code,
                invoked: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessRunner for GitRunner {
        fn run(&self, spec: &CommandSpec, _timeout: Duration) -> Result<ProcessOutput> {
            self.invoked.borrow_mut().push(spec.to_string());
            let (code, stdout) = if spec.args[0] == "branch" {
                (self.branch_code, "main\n")
            } else {
                (self.status_code, "")
            };
            Ok(ProcessOutput {
                exit_code: Some(code),
                stdout: stdout.to_string(),
                ..Default::default()
            })
        }

        fn check_liveness(&self, _spec: &CommandSpec, _grace: Duration) -> Result<Liveness> {
            unreachable!()
        }
    }

    #[test]
    fn round_trip_succeeds_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        round_trip(temp.path(), SCRATCH_CONTENT).unwrap();
        assert!(scratch_files(temp.path()).is_empty());
    }

    #[test]
    fn round_trip_cleans_up_after_injected_fault() {
        let temp = TempDir::new().unwrap();
        let result = round_trip_with(temp.path(), SCRATCH_CONTENT, |path| {
            assert!(path.exists());
            Err(SvcheckError::Other(anyhow::anyhow!("injected")))
        });
        assert!(result.is_err());
        assert!(scratch_files(temp.path()).is_empty());
    }

    #[test]
    fn round_trip_detects_mismatch_and_cleans_up() {
        let temp = TempDir::new().unwrap();
        let result = round_trip_with(temp.path(), SCRATCH_CONTENT, |path| {
            fs::write(path, "tampered")?;
            Ok(())
        });
        assert!(matches!(result, Err(SvcheckError::ContentMismatch { .. })));
        assert!(scratch_files(temp.path()).is_empty());
    }

    #[test]
    fn scratch_file_refuses_existing_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taken.tmp");
        fs::write(&path, "keep me").unwrap();

        assert!(ScratchFile::create(path.clone()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep me");
    }

    #[test]
    fn file_check_fails_in_missing_workspace() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");
        let runner = GitRunner::new(0, 0);
        let check = OperationCheck::new(&runner, &missing, Duration::from_secs(5));

        let result = check.check_files();

        assert!(!result.passed);
        assert!(result.message.unwrap().starts_with("failed:"));
    }

    #[test]
    fn git_check_names_branch() {
        let temp = TempDir::new().unwrap();
        let runner = GitRunner::new(0, 0);
        let check = OperationCheck::new(&runner, temp.path(), Duration::from_secs(5));

        let result = check.run();

        assert!(result.passed);
        assert_eq!(
            result.details[1].message.as_deref(),
            Some("working on branch 'main'")
        );
    }

    #[test]
    fn git_check_fails_when_either_command_fails() {
        let temp = TempDir::new().unwrap();
        let runner = GitRunner::new(0, 1);
        let check = OperationCheck::new(&runner, temp.path(), Duration::from_secs(5));

        let result = check.run();

        assert!(!result.passed);
        assert!(result.details[0].passed);
        assert!(!result.details[1].passed);
    }

    #[test]
    fn git_check_runs_branch_query_after_status_failure() {
        let temp = TempDir::new().unwrap();
        let runner = GitRunner::new(128, 128);
        let check = OperationCheck::new(&runner, temp.path(), Duration::from_secs(5));

        let result = check.check_git();

        assert!(!result.passed);
        assert_eq!(
            *runner.invoked.borrow(),
            vec!["git status --porcelain", "git branch --show-current"]
        );
        let message = result.message.unwrap();
        assert!(message.contains("git status --porcelain"));
        assert!(message.contains("git branch --show-current"));
    }
}
