//! Two-sided hysteresis band around a single threshold.
//!
//! ```text
//!   level 1 ─────────────┐        ┌──────────
//!                        │        │
//!   level 0 ─────────────┘        └──────────
//!            ...   low ──┴── high ──┴── ...
//! ```
//!
//! `1 → 0` only at or below `low`, `0 → 1` only at or above `high`.  Anything
//! strictly between leaves the level alone, so noise narrower than the band
//! never produces events.

use core::ops::{Add, Sub};

/// Output level of a binary classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Direction of a level change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crossing {
    Rising,
    Falling,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinaryHysteresis<T> {
    low: T,
    high: T,
    level: Level,
}

impl<T: Copy + PartialOrd> BinaryHysteresis<T> {
    /// Band with explicit edges.  `low` must not exceed `high`.
    pub fn with_band(low: T, high: T, level: Level) -> Self {
        debug_assert!(low <= high, "hysteresis band is inverted");
        Self { low, high, level }
    }

    /// Feed one measurement.  Returns the crossing it caused, if any.
    pub fn update(&mut self, reading: T) -> Option<Crossing> {
        match self.level {
            Level::High if reading <= self.low => {
                self.level = Level::Low;
                Some(Crossing::Falling)
            }
            Level::Low if reading >= self.high => {
                self.level = Level::High;
                Some(Crossing::Rising)
            }
            _ => None,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn band(&self) -> (T, T) {
        (self.low, self.high)
    }
}

impl<T: Copy + PartialOrd + Add<Output = T> + Sub<Output = T>> BinaryHysteresis<T> {
    /// Band of `center ± half_width`, starting at `level`.
    pub fn centered(center: T, half_width: T, level: Level) -> Self {
        Self::with_band(center - half_width, center + half_width, level)
    }

    /// Band of `center ± half_width`, seeded from a first reading: high when
    /// the reading is at or above `center`.
    pub fn seeded(center: T, half_width: T, reading: T) -> Self {
        let level = if reading >= center {
            Level::High
        } else {
            Level::Low
        };
        Self::centered(center, half_width, level)
    }
}
