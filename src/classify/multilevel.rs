//! N-level banded classifier with dead-zone margins.
//!
//! The input range is split into `levels` equal bands.  The top and bottom
//! `width / margin_divisor` counts of every band form a margin:
//!
//! ```text
//!   band k+1  ┌──────────────────────────────┐
//!             │ above   ← pulled toward k+2  │
//!             │ within                       │
//!             │ below   ← pulled toward k    │
//!   band k    └──────────────────────────────┘
//! ```
//!
//! The stored level walks one band at a time toward the raw band.  Steps
//! that pass through intermediate bands are always taken; the final step
//! into the band adjacent to the stored level is taken only if the
//! sub-position agrees with the direction of travel.  A reading sitting in
//! the lower margin of the band above therefore does not step up, and
//! noise at a boundary cannot chatter.

use crate::config::AnalogRangeConfig;
use crate::error::Result;

/// Where a reading sits within its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SubPosition {
    Below = -1,
    Within = 0,
    Above = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Up,
    Down,
}

/// One band step.  `level` is the level *after* the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub direction: StepDirection,
    pub level: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiLevel {
    max_level: u16,
    width: u32,
    margin: u32,
    level: u16,
}

impl MultiLevel {
    /// Build from a validated config, seeding the level from `reading`.
    pub fn new(config: &AnalogRangeConfig, reading: u16) -> Result<Self> {
        config.validate()?;
        let width = u32::from(config.full_scale / config.levels);
        let mut classifier = Self {
            max_level: config.levels - 1,
            width,
            margin: width / u32::from(config.margin_divisor),
            level: 0,
        };
        classifier.level = classifier.band(reading).0;
        Ok(classifier)
    }

    /// Raw band index and sub-position of a reading.
    pub fn band(&self, reading: u16) -> (u16, SubPosition) {
        let reading = u32::from(reading);
        let index = reading / self.width;
        if index > u32::from(self.max_level) {
            return (self.max_level, SubPosition::Above);
        }

        let offset = reading % self.width;
        let sub = if offset < self.margin {
            SubPosition::Below
        } else if offset > self.width - self.margin {
            SubPosition::Above
        } else {
            SubPosition::Within
        };
        (index as u16, sub)
    }

    /// Feed one reading, calling `on_step` for every band step taken.
    /// Returns the number of steps.
    pub fn update(&mut self, reading: u16, mut on_step: impl FnMut(Step)) -> usize {
        let (target, sub) = self.band(reading);
        let mut steps = 0;

        while target != self.level {
            let direction = if target > self.level {
                StepDirection::Up
            } else {
                StepDirection::Down
            };
            let adjacent = target.abs_diff(self.level) == 1;
            if adjacent {
                let agrees = match direction {
                    StepDirection::Up => sub >= SubPosition::Within,
                    StepDirection::Down => sub <= SubPosition::Within,
                };
                if !agrees {
                    break;
                }
            }

            self.level = match direction {
                StepDirection::Up => self.level + 1,
                StepDirection::Down => self.level - 1,
            };
            on_step(Step {
                direction,
                level: self.level,
            });
            steps += 1;
        }
        steps
    }

    pub fn level(&self) -> u16 {
        self.level
    }

    /// Jump straight to the band of `reading` without reporting steps.
    pub fn reseed(&mut self, reading: u16) {
        self.level = self.band(reading).0;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }
}
