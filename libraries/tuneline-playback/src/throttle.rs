//! Emission throttling for high-frequency backend events

use std::cell::Cell;
use std::time::Duration;
use web_time::Instant;

/// Default interval between position emissions
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(100);

/// Monotonic time source
///
/// Returned values only need to be comparable with each other.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
///
/// Uses `performance.now()` in the browser, where `std::time::Instant`
/// is unavailable.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock for tests and simulations
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time
    pub fn set(&self, to: Duration) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Leading-edge throttle
///
/// The first call passes, then every call within `interval` of the last
/// accepted one is rejected.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_accepted: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Returns true (and records `now`) if a call at `now` may pass
    pub fn ready(&mut self, now: Duration) -> bool {
        match self.last_accepted {
            Some(last) if now.saturating_sub(last) < self.interval => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    /// Forget the last accepted call
    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_THROTTLE_INTERVAL)
    }
}
