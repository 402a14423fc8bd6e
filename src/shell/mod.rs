//! Process execution and the clock it waits on.

pub mod clock;
pub mod command;
pub mod platform;

pub use clock::{Clock, ManualClock, SystemClock};
pub use command::{
    CommandSpec, Liveness, NativeRunner, ProcessOutput, ProcessRunner, DEFAULT_KILL_GRACE,
    DEFAULT_POLL_INTERVAL,
};
pub use platform::{isolate_process_group, signal_group, Signal};
