//! Monotonic millisecond clocks.
//!
//! The transition controller never reads time on its own; the host samples a
//! [`Clock`] and passes the timestamp into `start` and `tick`.

use std::cell::Cell;
use std::time::Instant;

/// A monotonic clock reporting milliseconds since an arbitrary epoch.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Wall clock backed by [`Instant`]; the epoch is the moment of construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock that only moves when told to. Used for offline rendering and tests.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
