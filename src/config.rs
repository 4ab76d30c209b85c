//! Construction-time configuration.
//!
//! Every source takes explicit thresholds and hysteresis widths.  These
//! structs group them, carry the defaults the monitors were tuned with, and
//! reject nonsense eagerly through `validate()`.  Nothing here is persisted
//! by the framework; the serde derives are for embedders that want to.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dispatch loop options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Log one trace line per dispatched event.
    pub trace: bool,
}

/// Binary hysteresis around an analog threshold, in ADC counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogLevelConfig {
    /// Center of the hysteresis band.
    pub threshold: u16,
    /// Counts above and below `threshold` that do not change the level.
    pub half_width: u16,
}

impl AnalogLevelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.threshold.checked_sub(self.half_width).is_none()
            || self.threshold.checked_add(self.half_width).is_none()
        {
            return Err(Error::Configuration(
                "analog band extends past the 16-bit range",
            ));
        }
        Ok(())
    }
}

/// Subdivided analog range (rotary encoder emulation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogRangeConfig {
    /// Number of equal-width bands.
    pub levels: u16,
    /// Largest reading the input produces.
    pub full_scale: u16,
    /// Dead-zone margin as a fraction of band width: `width / margin_divisor`
    /// at the top and bottom of every band.
    pub margin_divisor: u16,
}

impl Default for AnalogRangeConfig {
    fn default() -> Self {
        Self {
            levels: 4,
            full_scale: u16::MAX,
            margin_divisor: 5, // top and bottom 20% of each band
        }
    }
}

impl AnalogRangeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.levels < 2 {
            return Err(Error::Configuration("analog range needs at least two levels"));
        }
        if self.full_scale / self.levels == 0 {
            return Err(Error::Configuration("more levels than analog counts"));
        }
        if self.margin_divisor < 2 {
            return Err(Error::Configuration("margin divisor must be at least 2"));
        }
        Ok(())
    }
}

/// Per-axis threshold band, in g.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBand {
    pub threshold_g: f32,
    pub half_width_g: f32,
}

impl AxisBand {
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_g.is_finite() || !self.half_width_g.is_finite() {
            return Err(Error::Configuration("axis threshold must be finite"));
        }
        if self.half_width_g < 0.0 {
            return Err(Error::Configuration("axis half-width must not be negative"));
        }
        Ok(())
    }
}

/// Valid measurement window and boundary hysteresis for a zone ranger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneWindow {
    /// Readings below this are discarded as unreliable.
    pub min_mm: u16,
    /// Readings above this are discarded as unreliable.
    pub max_mm: u16,
    /// Dead zone on each side of a boundary adjacent to the current zone.
    pub hysteresis_mm: u16,
}

impl Default for ZoneWindow {
    fn default() -> Self {
        Self {
            min_mm: 20,
            max_mm: 4000,
            hysteresis_mm: 10,
        }
    }
}

impl ZoneWindow {
    pub fn validate(&self) -> Result<()> {
        if self.min_mm >= self.max_mm {
            return Err(Error::Configuration("zone window is empty"));
        }
        Ok(())
    }
}

/// Color dominance thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorConfig {
    /// A channel is dominant when it exceeds the RGB mean by this factor.
    pub saturation_factor: f32,
    /// Hysteresis on `saturation_factor`, applied on each side.
    pub half_width: f32,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            saturation_factor: 1.45,
            half_width: 0.05,
        }
    }
}

impl ColorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.half_width < 0.0 || self.saturation_factor - self.half_width <= 1.0 {
            return Err(Error::Configuration(
                "color dominance band must stay above the mean",
            ));
        }
        Ok(())
    }
}

/// Matrix keypad scan options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypadConfig {
    /// Settling delay after releasing each row, if any.
    pub row_delay_ms: Option<u32>,
}

impl Default for KeypadConfig {
    fn default() -> Self {
        Self {
            row_delay_ms: Some(35),
        }
    }
}
