//! Ordered multi-zone classifier (proximity zones).
//!
//! Boundaries are listed far → near.  Zone 0 is beyond the first boundary;
//! zone `k` lies between boundary `k - 1` and boundary `k`.
//!
//! ```text
//!   sensor │ zone 2 │   zone 1   │      zone 0 (far)
//!          │        b1           b0
//! ```
//!
//! A boundary adjacent to the current zone is crossed only past its
//! hysteresis margin (`b - h` inward, `b + h` outward).  Leaving the
//! innermost zone already happens at `b + h`.  Boundaries further
//! away are crossed at their nominal distance.  One crossing is reported per
//! boundary, in the order the object passed them, so a jump from far to the
//! innermost zone still reports the outer boundary first.

use crate::error::{Error, Result};

/// Maximum number of boundaries a ladder holds.
pub const MAX_ZONE_BOUNDARIES: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneDirection {
    /// Moving toward the sensor.
    Inward,
    /// Moving away from the sensor.
    Outward,
}

/// A boundary crossing.  `boundary` indexes the far → near list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneCrossing {
    pub boundary: usize,
    pub direction: ZoneDirection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneLadder {
    boundaries: heapless::Vec<i32, MAX_ZONE_BOUNDARIES>,
    hysteresis: i32,
    min: i32,
    max: i32,
    zone: usize,
}

impl ZoneLadder {
    /// Build a ladder starting in the far zone.
    ///
    /// Readings outside `min..=max` are discarded.  Boundaries must be
    /// strictly decreasing.
    pub fn new(boundaries: &[u16], hysteresis: u16, min: u16, max: u16) -> Result<Self> {
        if boundaries.is_empty() {
            return Err(Error::Configuration("zone ladder needs at least one boundary"));
        }
        if min >= max {
            return Err(Error::Configuration("zone window is empty"));
        }
        if boundaries.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(Error::Configuration(
                "zone boundaries must be ordered far to near",
            ));
        }

        let mut stored = heapless::Vec::new();
        for &b in boundaries {
            stored
                .push(i32::from(b))
                .map_err(|_| Error::Configuration("too many zone boundaries"))?;
        }

        Ok(Self {
            boundaries: stored,
            hysteresis: i32::from(hysteresis),
            min: i32::from(min),
            max: i32::from(max),
            zone: 0,
        })
    }

    /// Feed one distance reading, calling `on_cross` for every boundary
    /// passed.  Returns `None` when the reading was discarded, otherwise the
    /// zone after the update.
    pub fn update(&mut self, mm: u16, mut on_cross: impl FnMut(ZoneCrossing)) -> Option<usize> {
        let mm = i32::from(mm);
        if mm < self.min || mm > self.max {
            return None;
        }

        let start = self.zone;
        let mut zone = start;

        // Inward: boundary `zone` separates `zone` from `zone + 1`.
        while zone < self.boundaries.len() {
            let b = self.boundaries[zone];
            let threshold = if zone == start { b - self.hysteresis } else { b };
            if mm > threshold {
                break;
            }
            on_cross(ZoneCrossing {
                boundary: zone,
                direction: ZoneDirection::Inward,
            });
            zone += 1;
        }

        if zone == start {
            let innermost = self.boundaries.len();
            // Outward: boundary `zone - 1` separates `zone` from `zone - 1`.
            while zone > 0 {
                let b = self.boundaries[zone - 1];
                let stays = if zone != start {
                    mm <= b
                } else if zone == innermost {
                    mm < b + self.hysteresis
                } else {
                    mm <= b + self.hysteresis
                };
                if stays {
                    break;
                }
                on_cross(ZoneCrossing {
                    boundary: zone - 1,
                    direction: ZoneDirection::Outward,
                });
                zone -= 1;
            }
        }

        self.zone = zone;
        Some(zone)
    }

    /// Current zone (0 = far).
    pub fn zone(&self) -> usize {
        self.zone
    }

    /// Number of zones (boundaries + 1).
    pub fn zone_count(&self) -> usize {
        self.boundaries.len() + 1
    }
}
