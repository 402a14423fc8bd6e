//! Time source for bounded waits.
//!
//! Every wait inside the process runner goes through a [`Clock`], so the
//! grace-period and timeout logic can be driven by [`ManualClock`] in tests
//! without real wall-clock delay.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// A source of time that can also block.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;

    /// Block for `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// A clock that only moves when slept on.
///
/// `sleep` returns immediately after advancing the clock, which makes any
/// "wait up to N, polling every M" loop finish after N/M iterations.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
    slept: Cell<Duration>,
}

impl ManualClock {
    /// Create a clock starting at the current instant.
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
            slept: Cell::new(Duration::ZERO),
        }
    }

    /// Move the clock forward without counting it as sleep.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    /// Total time spent in `sleep`.
    pub fn slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
        self.slept.set(self.slept.get() + duration);
    }
}
