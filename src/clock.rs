use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// A monotonic time source.
///
/// `now()` is the time elapsed since some fixed origin chosen by the
/// clock. Only differences between two readings carry meaning.
pub trait Clock {
    fn now(&self) -> Duration;
}

// ─── Real clock ──────────────────────────────────────────────────

/// Reads `tokio::time::Instant`, which is the OS monotonic clock in a
/// normal runtime and the virtual clock when tokio time is paused.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

// ─── Manual clock ────────────────────────────────────────────────

/// A clock that only moves when told to.
///
/// Clones share the same reading, so a test can hand one clone to a
/// `Sampler` and keep another to advance time between samples.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the clock at an arbitrary reading.
    pub fn starting_at(now: Duration) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}
