//! Host clock adapter.
//!
//! Provides the [`Clock`] port from `std::time::Instant` for host-side
//! simulation and tests.  Firmware builds implement [`Clock`] over their own
//! tick counter instead.

use std::time::Instant;

use crate::events::Millis;
use crate::ports::Clock;

/// Milliseconds since construction, truncated to [`Millis`] (wraps after
/// ~49.7 days, which the tick helpers tolerate).
pub struct StdClock {
    start: Instant,
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now_ms(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }
}
