//!
//! Monotonic microsecond clock.
//!
//! Backed by [`std::time::Instant`], which is guaranteed monotonic on every
//! platform Rust targets — the same property `CLOCK_MONOTONIC_RAW` gives the
//! reference implementation: readings never move backward and are not
//! slewed by NTP.
//!

use std::time::Instant;

/// A fixed reference point that [`Clock::now_micros`] readings are measured
/// from. Two clocks never compare; each scheduler owns exactly one.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }

    /// Microseconds elapsed since this clock was created.
    pub fn now_micros(&self) -> u64 {
        self.epoch.elapsed().as_micros() as u64
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}
