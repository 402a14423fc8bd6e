//! Backend probing.
//!
//! A backend is reached by trying its launch strategies in order. The first
//! strategy that succeeds decides the outcome and later ones are never run.

use std::path::Path;
use std::time::Duration;

use crate::checks::status::{Evidence, ProbeOutcome};
use crate::config::schema::{BackendSpec, LaunchStrategy, StrategyKind};
use crate::shell::{CommandSpec, Liveness, ProcessOutput, ProcessRunner};

/// Flag appended to help-flag strategies.
pub const HELP_FLAG: &str = "--help";

/// Maximum length of a diagnostic taken from stderr.
pub const DIAGNOSTIC_CHARS: usize = 100;

/// Probes backends through a [`ProcessRunner`].
pub struct BackendProbe<'a> {
    runner: &'a dyn ProcessRunner,
    workspace: &'a Path,
    grace: Duration,
}

/// What a single strategy attempt produced.
enum Attempt {
    Reached(Evidence),
    Failed { diagnostic: Option<String>, timed_out: bool },
}

impl<'a> BackendProbe<'a> {
    /// Create a probe whose strategies run in `workspace`; `grace` is how
    /// long a long-lived process must survive.
    pub fn new(runner: &'a dyn ProcessRunner, workspace: &'a Path, grace: Duration) -> Self {
        Self {
            runner,
            workspace,
            grace,
        }
    }

    /// Probe one backend.
    pub fn probe(&self, backend: &BackendSpec) -> ProbeOutcome {
        let mut last_diagnostic = None;
        let mut any_timed_out = false;

        for (index, strategy) in backend.strategies.iter().enumerate() {
            match self.attempt(strategy) {
                Attempt::Reached(evidence) => {
                    tracing::debug!(
                        backend = %backend.name,
                        strategy = index,
                        ?evidence,
                        "backend available"
                    );
                    return ProbeOutcome::available(index, evidence);
                }
                Attempt::Failed {
                    diagnostic,
                    timed_out,
                } => {
                    tracing::debug!(
                        backend = %backend.name,
                        strategy = index,
                        timed_out,
                        "strategy failed"
                    );
                    any_timed_out |= timed_out;
                    last_diagnostic = diagnostic;
                }
            }
        }

        if any_timed_out {
            ProbeOutcome::ambiguous(last_diagnostic)
        } else {
            ProbeOutcome::unavailable(last_diagnostic)
        }
    }

    fn attempt(&self, strategy: &LaunchStrategy) -> Attempt {
        match strategy.kind {
            StrategyKind::LongLived => self.attempt_long_lived(strategy),
            StrategyKind::HelpFlag => self.attempt_help_flag(strategy),
        }
    }

    fn attempt_long_lived(&self, strategy: &LaunchStrategy) -> Attempt {
        let spec = CommandSpec::new(&strategy.command)
            .args(&strategy.args)
            .cwd(self.workspace);
        match self.runner.check_liveness(&spec, self.grace) {
            Ok(Liveness::Running) => Attempt::Reached(Evidence::StillRunning),
            Ok(Liveness::Exited(output)) => {
                if mentions_usage(&output.stdout) {
                    Attempt::Reached(Evidence::UsageText)
                } else {
                    Attempt::Failed {
                        diagnostic: Some(diagnose(&output)),
                        timed_out: false,
                    }
                }
            }
            Err(e) => Attempt::Failed {
                diagnostic: Some(e.to_string()),
                timed_out: false,
            },
        }
    }

    fn attempt_help_flag(&self, strategy: &LaunchStrategy) -> Attempt {
        let spec = CommandSpec::new(&strategy.command)
            .args(&strategy.args)
            .arg(HELP_FLAG)
            .cwd(self.workspace);
        match self.runner.run(&spec, strategy.timeout()) {
            Ok(output) if output.success() => Attempt::Reached(Evidence::HelpExitZero),
            Ok(output) => Attempt::Failed {
                diagnostic: Some(diagnose(&output)),
                timed_out: output.timed_out,
            },
            Err(e) => Attempt::Failed {
                diagnostic: Some(e.to_string()),
                timed_out: false,
            },
        }
    }
}

/// Weak heuristic: a server that prints help or usage text is installed.
fn mentions_usage(stdout: &str) -> bool {
    let lower = stdout.to_lowercase();
    lower.contains("help") || lower.contains("usage")
}

fn diagnose(output: &ProcessOutput) -> String {
    if let Some(prefix) = output.stderr_prefix(DIAGNOSTIC_CHARS) {
        return prefix;
    }
    if output.timed_out {
        return format!("no response after {:.1}s", output.duration.as_secs_f64());
    }
    match output.exit_code {
        Some(code) => format!("exited with code {}", code),
        None => "terminated by signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::status::ProbeStatus;
    use crate::error::{Result, SvcheckError};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::path::PathBuf;

    /// Scripted runner that records every command it was asked to launch.
    #[derive(Default)]
    struct FakeRunner {
        runs: RefCell<VecDeque<Result<ProcessOutput>>>,
        liveness: RefCell<VecDeque<Result<Liveness>>>,
        invoked: RefCell<Vec<String>>,
        cwds: RefCell<Vec<Option<PathBuf>>>,
    }

    impl FakeRunner {
        fn push_run(&self, result: Result<ProcessOutput>) {
            self.runs.borrow_mut().push_back(result);
        }

        fn push_liveness(&self, result: Result<Liveness>) {
            self.liveness.borrow_mut().push_back(result);
        }

        fn invocations(&self) -> Vec<String> {
            self.invoked.borrow().clone()
        }
    }

    impl ProcessRunner for FakeRunner {
        fn run(&self, spec: &CommandSpec, _timeout: Duration) -> Result<ProcessOutput> {
            self.invoked.borrow_mut().push(spec.to_string());
            self.cwds.borrow_mut().push(spec.cwd.clone());
            self.runs
                .borrow_mut()
                .pop_front()
                .expect("unexpected run invocation")
        }

        fn check_liveness(&self, spec: &CommandSpec, _grace: Duration) -> Result<Liveness> {
            self.invoked.borrow_mut().push(spec.to_string());
            self.cwds.borrow_mut().push(spec.cwd.clone());
            self.liveness
                .borrow_mut()
                .pop_front()
                .expect("unexpected liveness invocation")
        }
    }

    fn exited(code: i32, stdout: &str, stderr: &str) -> ProcessOutput {
        ProcessOutput {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            ..Default::default()
        }
    }

    fn timed_out() -> ProcessOutput {
        ProcessOutput {
            timed_out: true,
            duration: Duration::from_secs(5),
            ..Default::default()
        }
    }

    fn launch_error(command: &str) -> SvcheckError {
        SvcheckError::LaunchFailure {
            command: command.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        }
    }

    fn backend(strategies: Vec<LaunchStrategy>) -> BackendSpec {
        BackendSpec {
            name: "filesystem".to_string(),
            description: None,
            strategies,
        }
    }

    fn grace() -> Duration {
        Duration::from_secs(1)
    }

    fn workspace() -> &'static Path {
        Path::new("/work/app")
    }

    #[test]
    fn strategies_run_in_the_workspace() {
        let runner = FakeRunner::default();
        runner.push_liveness(Ok(Liveness::Exited(exited(1, "", "crashed"))));
        runner.push_run(Ok(exited(0, "", "")));
        let spec = backend(vec![
            LaunchStrategy::long_lived("npx", ["server-filesystem"]),
            LaunchStrategy::help_flag("mcp-server-filesystem", Vec::<String>::new()),
        ]);

        BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        let expected = Some(PathBuf::from("/work/app"));
        assert_eq!(*runner.cwds.borrow(), vec![expected.clone(), expected]);
    }

    #[test]
    fn first_success_short_circuits() {
        let runner = FakeRunner::default();
        runner.push_run(Ok(exited(0, "usage", "")));
        let spec = backend(vec![
            LaunchStrategy::help_flag("npx", ["server-filesystem"]),
            LaunchStrategy::help_flag("/home/dev/.local/bin/mcp-server-filesystem", Vec::<String>::new()),
        ]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert!(outcome.is_available());
        assert_eq!(outcome.strategy(), Some(0));
        assert_eq!(outcome.evidence(), Some(Evidence::HelpExitZero));
        assert_eq!(runner.invocations(), vec!["npx server-filesystem --help"]);
    }

    #[test]
    fn falls_back_to_second_strategy() {
        let runner = FakeRunner::default();
        runner.push_run(Ok(exited(1, "", "npm ERR! 404")));
        runner.push_run(Ok(exited(0, "", "")));
        let spec = backend(vec![
            LaunchStrategy::help_flag("npx", ["server-filesystem"]),
            LaunchStrategy::help_flag("mcp-server-filesystem", Vec::<String>::new()),
        ]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert_eq!(outcome.strategy(), Some(1));
        assert_eq!(runner.invocations().len(), 2);
    }

    #[test]
    fn long_lived_running_is_available_regardless_of_stdout() {
        let runner = FakeRunner::default();
        runner.push_liveness(Ok(Liveness::Running));
        let spec = backend(vec![LaunchStrategy::long_lived("npx", ["server-memory"])]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert_eq!(outcome.status(), ProbeStatus::Available);
        assert_eq!(outcome.evidence(), Some(Evidence::StillRunning));
        assert_eq!(runner.invocations(), vec!["npx server-memory"]);
    }

    #[test]
    fn long_lived_usage_text_is_available() {
        let runner = FakeRunner::default();
        runner.push_liveness(Ok(Liveness::Exited(exited(
            2,
            "Usage: mcp-server-git [OPTIONS]",
            "",
        ))));
        let spec = backend(vec![LaunchStrategy::long_lived("mcp-server-git", Vec::<String>::new())]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert!(outcome.is_available());
        assert_eq!(outcome.evidence(), Some(Evidence::UsageText));
    }

    #[test]
    fn long_lived_unrelated_stdout_moves_on() {
        let runner = FakeRunner::default();
        runner.push_liveness(Ok(Liveness::Exited(exited(0, "ok bye", ""))));
        runner.push_liveness(Ok(Liveness::Running));
        let spec = backend(vec![
            LaunchStrategy::long_lived("first", Vec::<String>::new()),
            LaunchStrategy::long_lived("second", Vec::<String>::new()),
        ]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert_eq!(outcome.strategy(), Some(1));
        assert_eq!(runner.invocations(), vec!["first", "second"]);
    }

    #[test]
    fn launch_error_is_treated_as_failure() {
        let runner = FakeRunner::default();
        runner.push_run(Err(launch_error("npx")));
        let spec = backend(vec![LaunchStrategy::help_flag("npx", ["server"])]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert_eq!(outcome.status(), ProbeStatus::Unavailable);
        assert!(outcome.diagnostic().unwrap().contains("Failed to launch"));
    }

    #[test]
    fn diagnostic_is_truncated_stderr_of_last_attempt() {
        let runner = FakeRunner::default();
        runner.push_run(Ok(exited(1, "", "first error")));
        runner.push_run(Ok(exited(1, "", &"x".repeat(250))));
        let spec = backend(vec![
            LaunchStrategy::help_flag("a", Vec::<String>::new()),
            LaunchStrategy::help_flag("b", Vec::<String>::new()),
        ]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        let diagnostic = outcome.diagnostic().unwrap();
        assert_eq!(diagnostic.chars().count(), DIAGNOSTIC_CHARS);
        assert!(diagnostic.starts_with('x'));
    }

    #[test]
    fn exhausted_with_timeout_is_ambiguous() {
        let runner = FakeRunner::default();
        runner.push_run(Ok(timed_out()));
        runner.push_run(Err(launch_error("mcp-server-git")));
        let spec = backend(vec![
            LaunchStrategy::help_flag("python3", ["-m", "mcp_server_git"]),
            LaunchStrategy::help_flag("mcp-server-git", Vec::<String>::new()),
        ]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert_eq!(outcome.status(), ProbeStatus::Ambiguous);
        assert_eq!(outcome.strategy(), None);
    }

    #[test]
    fn nonzero_exit_without_stderr_names_exit_code() {
        let runner = FakeRunner::default();
        runner.push_run(Ok(exited(127, "", "")));
        let spec = backend(vec![LaunchStrategy::help_flag("npx", ["server"])]);

        let outcome = BackendProbe::new(&runner, workspace(), grace()).probe(&spec);

        assert_eq!(outcome.diagnostic(), Some("exited with code 127"));
    }

    #[test]
    fn usage_heuristic_is_case_insensitive() {
        assert!(mentions_usage("USAGE: server"));
        assert!(mentions_usage("Run with --Help for options"));
        assert!(!mentions_usage("listening on stdio"));
    }
}
