//! Port traits: the boundary between event sources and the hardware.
//!
//! ```text
//!   Driver ──▶ Port trait ──▶ EventSource ──▶ EventQueue
//! ```
//!
//! Digital pins and delays come from `embedded-hal`.  Everything else a
//! source needs is a single synchronous "read current value" call declared
//! here.  Errors are typed per driver; sources discard failed readings
//! rather than escalating them.

use core::ops::BitOr;

use crate::events::Millis;

// ───────────────────────────────────────────────────────────────
// Time
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait Clock {
    fn now_ms(&self) -> Millis;
}

// ───────────────────────────────────────────────────────────────
// Measurement ports
// ───────────────────────────────────────────────────────────────

/// 16-bit analog sampler (ADC scaled to `0..=u16::MAX`).
pub trait AnalogInput {
    type Error: core::fmt::Debug;

    fn read_u16(&mut self) -> Result<u16, Self::Error>;
}

/// Three-axis accelerometer.
pub trait Accelerometer {
    type Error: core::fmt::Debug;

    /// X, Y, Z acceleration in m/s².
    fn acceleration(&mut self) -> Result<[f32; 3], Self::Error>;
}

/// Distance sensor (ultrasonic, time-of-flight).
///
/// A read may block until the sensor's own echo timeout expires; the
/// dispatch loop has no visibility into that.
pub trait Rangefinder {
    type Error: core::fmt::Debug;

    fn range_mm(&mut self) -> Result<u16, Self::Error>;
}

/// RGB color sensor with a saturating integrator.
pub trait ColorSensor {
    type Error: core::fmt::Debug;

    /// Red, green, blue channel counts.
    fn rgb(&mut self) -> Result<[u16; 3], Self::Error>;

    /// Count at which a channel is saturated and its value meaningless.
    fn overflow_count(&self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Edge interrupts
// ───────────────────────────────────────────────────────────────

/// Which pin edges raise an interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeMask(u8);

impl EdgeMask {
    pub const NONE: Self = Self(0);
    pub const RISING: Self = Self(0b01);
    pub const FALLING: Self = Self(0b10);
    pub const BOTH: Self = Self(0b11);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for EdgeMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Interrupt callback.  Receives the pin's logic level at the time of the
/// edge (`true` = high).
pub type EdgeHandler<'a> = Box<dyn FnMut(bool) + 'a>;

/// A pin that can call back on edges.
///
/// The handler runs in interrupt context on real hardware.  Whether a full
/// classify-and-publish cycle is legal there is a per-platform question;
/// the handlers this crate installs only read their captured configuration
/// and push one event.
pub trait InterruptPin<'a> {
    /// Install `handler` for the edges in `edges`, replacing any previous one.
    fn listen(&mut self, edges: EdgeMask, handler: EdgeHandler<'a>);

    /// Disable the interrupt and drop the handler.
    fn unlisten(&mut self);
}
