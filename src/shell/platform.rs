//! Platform-specific process control.
//!
//! On Unix every spawned child leads its own process group, so a launcher
//! such as `npx` can be stopped together with the server it started.
//! Elsewhere the runner falls back to `Child::kill`.

use std::process::Command;

/// Signals the runner sends when stopping a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Ask the process to exit (SIGTERM).
    Terminate,
    /// Force the process to exit (SIGKILL).
    Kill,
}

/// Make the spawned child the leader of a new process group.
pub fn isolate_process_group(cmd: &mut Command) {
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        cmd.process_group(0);
    }
    #[cfg(not(unix))]
    {
        let _ = cmd;
    }
}

/// Send `signal` to the process group led by `pid`.
///
/// Returns `false` when nothing was signalled (group already gone, or the
/// platform has no process groups).
#[cfg(unix)]
pub fn signal_group(pid: u32, signal: Signal) -> bool {
    let sig = match signal {
        Signal::Terminate => libc::SIGTERM,
        Signal::Kill => libc::SIGKILL,
    };
    let Ok(pgid) = i32::try_from(pid) else {
        return false;
    };
    // SAFETY: kill(2) with a negative pid signals a process group; it takes
    // no pointers and has no memory effects on this process.
    unsafe { libc::kill(-pgid, sig) == 0 }
}

#[cfg(not(unix))]
pub fn signal_group(_pid: u32, _signal: Signal) -> bool {
    false
}
