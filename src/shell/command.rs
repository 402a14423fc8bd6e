//! Process execution with bounded waits.
//!
//! [`ProcessRunner`] is the seam every check launches processes through.
//! [`NativeRunner`] is the real implementation; tests substitute scripted
//! runners or drive `NativeRunner` with a [`ManualClock`](super::ManualClock).
//!
//! A non-zero exit or a timeout is a normal outcome reported in
//! [`ProcessOutput`]. The only error a runner returns is a launch failure
//! (or an I/O error while waiting).

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Result, SvcheckError};

use super::clock::{Clock, SystemClock};
use super::platform::{isolate_process_group, signal_group, Signal};

/// How often a bounded wait checks whether the child has exited.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long a terminated child gets before it is force-killed.
pub const DEFAULT_KILL_GRACE: Duration = Duration::from_secs(2);

/// An executable plus its argument vector. No shell is involved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path.
    pub program: String,

    /// Arguments, passed as discrete elements.
    pub args: Vec<String>,

    /// Working directory (inherits the current one if unset).
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a spec for `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished (or stopped) process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether the runner stopped the process because it ran too long.
    pub timed_out: bool,

    /// Time from spawn until the process was reaped.
    pub duration: Duration,
}

impl ProcessOutput {
    /// Whether the process completed on its own with exit code 0.
    pub fn success(&self) -> bool {
        !self.timed_out && self.exit_code == Some(0)
    }

    /// Turn an unsuccessful output into an error.
    pub fn ensure_success(&self, spec: &CommandSpec) -> Result<()> {
        if self.timed_out {
            return Err(SvcheckError::Timeout {
                command: spec.to_string(),
                timeout: self.duration,
            });
        }
        if self.exit_code != Some(0) {
            return Err(SvcheckError::CommandFailed {
                command: spec.to_string(),
                code: self.exit_code,
            });
        }
        Ok(())
    }

    /// First `max_chars` characters of trimmed stderr, if there is any.
    pub fn stderr_prefix(&self, max_chars: usize) -> Option<String> {
        let trimmed = self.stderr.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.chars().take(max_chars).collect())
        }
    }
}

/// Whether a long-lived process survived its grace period.
#[derive(Debug, Clone)]
pub enum Liveness {
    /// Still running when the grace period ended. It has since been stopped.
    Running,
    /// Exited on its own within the grace period.
    Exited(ProcessOutput),
}

/// Launches external commands.
pub trait ProcessRunner {
    /// Run `spec` to completion, stopping it after `timeout`.
    ///
    /// Returns `Err` only when the process could not be started.
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<ProcessOutput>;

    /// Start `spec` with stdin held open and report whether it is still
    /// alive after `grace`. A running process is stopped before returning.
    fn check_liveness(&self, spec: &CommandSpec, grace: Duration) -> Result<Liveness>;
}

/// Runs processes on the host using `std::process`.
#[derive(Debug)]
pub struct NativeRunner<C: Clock = SystemClock> {
    clock: C,
    poll_interval: Duration,
    kill_grace: Duration,
}

impl NativeRunner<SystemClock> {
    /// Create a runner on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for NativeRunner<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> NativeRunner<C> {
    /// Create a runner that waits on `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            poll_interval: DEFAULT_POLL_INTERVAL,
            kill_grace: DEFAULT_KILL_GRACE,
        }
    }

    /// Set the liveness polling interval.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the window between terminate and force-kill.
    pub fn kill_grace(mut self, grace: Duration) -> Self {
        self.kill_grace = grace;
        self
    }

    /// The clock this runner waits on.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn spawn(&self, spec: &CommandSpec, hold_stdin: bool) -> Result<Spawned> {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(if hold_stdin {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(cwd) = &spec.cwd {
            cmd.current_dir(cwd);
        }
        isolate_process_group(&mut cmd);

        let started = self.clock.now();
        let mut child = cmd.spawn().map_err(|source| SvcheckError::LaunchFailure {
            command: spec.to_string(),
            source,
        })?;
        tracing::debug!(pid = child.id(), command = %spec, "spawned");

        let stdin = child.stdin.take();
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        Ok(Spawned {
            child,
            stdin,
            stdout,
            stderr,
            started,
        })
    }

    /// Poll until the child exits or `deadline` passes.
    fn wait_until(&self, child: &mut Child, deadline: Instant) -> Result<Option<ExitStatus>> {
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            let now = self.clock.now();
            if now >= deadline {
                return Ok(None);
            }
            self.clock.sleep(self.poll_interval.min(deadline - now));
        }
    }

    /// Terminate, wait out the kill grace, then force-kill.
    fn terminate(&self, child: &mut Child) -> Option<ExitStatus> {
        let pid = child.id();
        if !signal_group(pid, Signal::Terminate) {
            let _ = child.kill();
        }

        let deadline = self.clock.now() + self.kill_grace;
        if let Ok(Some(status)) = self.wait_until(child, deadline) {
            tracing::debug!(pid, "terminated");
            // Stragglers in the group would keep the output pipes open.
            signal_group(pid, Signal::Kill);
            return Some(status);
        }

        tracing::warn!(pid, "process ignored terminate, killing");
        signal_group(pid, Signal::Kill);
        let _ = child.kill();
        child.wait().ok()
    }
}

impl<C: Clock> ProcessRunner for NativeRunner<C> {
    fn run(&self, spec: &CommandSpec, timeout: Duration) -> Result<ProcessOutput> {
        let mut spawned = self.spawn(spec, false)?;
        let deadline = spawned.started + timeout;

        let (status, timed_out) = match self.wait_until(&mut spawned.child, deadline)? {
            Some(status) => {
                // Background children left in the group would keep the pipes open.
                signal_group(spawned.child.id(), Signal::Kill);
                (Some(status), false)
            }
            None => {
                tracing::debug!(command = %spec, ?timeout, "timed out");
                (self.terminate(&mut spawned.child), true)
            }
        };

        let duration = self.clock.now().saturating_duration_since(spawned.started);
        let exit_code = if timed_out {
            None
        } else {
            status.and_then(|s| s.code())
        };
        Ok(spawned.collect(exit_code, timed_out, duration))
    }

    fn check_liveness(&self, spec: &CommandSpec, grace: Duration) -> Result<Liveness> {
        let mut spawned = self.spawn(spec, true)?;
        let deadline = spawned.started + grace;

        match self.wait_until(&mut spawned.child, deadline)? {
            None => {
                tracing::debug!(command = %spec, "still running after grace period");
                self.terminate(&mut spawned.child);
                let duration = self.clock.now().saturating_duration_since(spawned.started);
                spawned.collect(None, false, duration);
                Ok(Liveness::Running)
            }
            Some(status) => {
                signal_group(spawned.child.id(), Signal::Kill);
                let duration = self.clock.now().saturating_duration_since(spawned.started);
                Ok(Liveness::Exited(spawned.collect(
                    status.code(),
                    false,
                    duration,
                )))
            }
        }
    }
}

/// A child plus the threads draining its output.
struct Spawned {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: Option<JoinHandle<String>>,
    stderr: Option<JoinHandle<String>>,
    started: Instant,
}

impl Spawned {
    /// Close stdin and gather output. The child must already be reaped.
    fn collect(self, exit_code: Option<i32>, timed_out: bool, duration: Duration) -> ProcessOutput {
        drop(self.stdin);
        ProcessOutput {
            exit_code,
            stdout: join_output(self.stdout),
            stderr: join_output(self.stderr),
            timed_out,
            duration,
        }
    }
}

fn drain<R: Read + Send + 'static>(mut reader: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = reader.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_output(handle: Option<JoinHandle<String>>) -> String {
    handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ManualClock;

    #[test]
    fn command_spec_displays_program_and_args() {
        let spec = CommandSpec::new("git").args(["status", "--porcelain"]);
        assert_eq!(spec.to_string(), "git status --porcelain");
    }

    #[test]
    fn command_spec_builder_sets_cwd() {
        let spec = CommandSpec::new("pwd").cwd("/tmp");
        assert_eq!(spec.cwd, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn ensure_success_maps_timeout_and_exit_code() {
        let spec = CommandSpec::new("node").arg("--version");

        let ok = ProcessOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(ok.ensure_success(&spec).is_ok());

        let failed = ProcessOutput {
            exit_code: Some(2),
            ..Default::default()
        };
        assert!(matches!(
            failed.ensure_success(&spec),
            Err(SvcheckError::CommandFailed { code: Some(2), .. })
        ));

        let timed_out = ProcessOutput {
            timed_out: true,
            ..Default::default()
        };
        assert!(matches!(
            timed_out.ensure_success(&spec),
            Err(SvcheckError::Timeout { .. })
        ));
    }

    #[test]
    fn stderr_prefix_truncates_on_char_boundary() {
        let output = ProcessOutput {
            stderr: "  ééééé failure  ".to_string(),
            ..Default::default()
        };
        assert_eq!(output.stderr_prefix(3), Some("ééé".to_string()));
        assert_eq!(ProcessOutput::default().stderr_prefix(10), None);
    }

    #[test]
    fn run_missing_binary_is_launch_failure() {
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("definitely-not-a-real-binary-xyz");
        let result = runner.run(&spec, Duration::from_secs(1));
        assert!(matches!(result, Err(SvcheckError::LaunchFailure { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn run_captures_stdout() {
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("echo").arg("hello");
        let output = runner.run(&spec, Duration::from_secs(10)).unwrap();

        assert!(output.success());
        assert_eq!(output.exit_code, Some(0));
        assert!(output.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn run_reports_nonzero_exit_without_error() {
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo oops >&2; exit 3"]);
        let output = runner.run(&spec, Duration::from_secs(10)).unwrap();

        assert!(!output.success());
        assert!(!output.timed_out);
        assert_eq!(output.exit_code, Some(3));
        assert!(output.stderr.contains("oops"));
    }

    #[cfg(unix)]
    #[test]
    fn run_uses_working_directory() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("pwd").cwd(temp.path());
        let output = runner.run(&spec, Duration::from_secs(10)).unwrap();

        let reported = PathBuf::from(output.stdout.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            temp.path().canonicalize().unwrap()
        );
    }

    #[cfg(unix)]
    #[test]
    fn run_times_out_without_real_delay() {
        let runner = NativeRunner::with_clock(ManualClock::new());
        let spec = CommandSpec::new("sleep").arg("30");

        let wall = Instant::now();
        let output = runner.run(&spec, Duration::from_secs(5)).unwrap();

        assert!(output.timed_out);
        assert!(!output.success());
        assert_eq!(output.exit_code, None);
        assert!(output.duration >= Duration::from_secs(5));
        assert!(wall.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn run_force_kills_process_ignoring_terminate() {
        // Real time here: the trap must be installed before the terminate arrives.
        let runner = NativeRunner::new().kill_grace(Duration::from_millis(300));
        let spec = CommandSpec::new("sh").args(["-c", "trap '' TERM; while true; do sleep 1; done"]);

        let output = runner.run(&spec, Duration::from_millis(500)).unwrap();

        assert!(output.timed_out);
        assert!(output.duration >= Duration::from_millis(800));
        assert!(output.duration < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[test]
    fn run_does_not_wait_for_background_children() {
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "sleep 8 & echo usage; exit 0"]);

        let wall = Instant::now();
        let output = runner.run(&spec, Duration::from_secs(1)).unwrap();

        assert!(output.success());
        assert!(output.stdout.contains("usage"));
        assert!(wall.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn liveness_reports_running_process() {
        let runner = NativeRunner::with_clock(ManualClock::new());
        let spec = CommandSpec::new("sleep").arg("30");

        let liveness = runner.check_liveness(&spec, Duration::from_secs(1)).unwrap();

        assert!(matches!(liveness, Liveness::Running));
    }

    #[cfg(unix)]
    #[test]
    fn liveness_holds_stdin_open() {
        // `cat` exits on EOF, so it only stays alive if stdin stays open.
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("cat");

        let liveness = runner
            .check_liveness(&spec, Duration::from_millis(300))
            .unwrap();

        assert!(matches!(liveness, Liveness::Running));
    }

    #[cfg(unix)]
    #[test]
    fn liveness_reports_exit_with_output() {
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("sh").args(["-c", "echo 'Usage: tool [options]'"]);

        let liveness = runner.check_liveness(&spec, Duration::from_secs(10)).unwrap();

        match liveness {
            Liveness::Exited(output) => {
                assert_eq!(output.exit_code, Some(0));
                assert!(output.stdout.contains("Usage:"));
            }
            Liveness::Running => panic!("Expected process to exit"),
        }
    }

    #[test]
    fn liveness_missing_binary_is_launch_failure() {
        let runner = NativeRunner::new();
        let spec = CommandSpec::new("definitely-not-a-real-binary-xyz");
        let result = runner.check_liveness(&spec, Duration::from_millis(100));
        assert!(matches!(result, Err(SvcheckError::LaunchFailure { .. })));
    }
}
