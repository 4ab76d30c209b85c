//! Event sources: condition monitors that turn measurements into events.
//!
//! Every source is either *pollable* (the registry calls [`EventSource::poll`]
//! from the foreground scan) or *interrupt-driven* (it installs an edge
//! handler that publishes directly).  Never both: state written by the poll
//! path is never touched by an interrupt handler.
//!
//! Sources publish through a [`Publisher`], a copyable handle onto the shared
//! queue and clock handed out by the registry.
//!
//! | Source                 | Classifier          | Default payload |
//! |------------------------|---------------------|-----------------|
//! | [`PolledPin`]          | previous level      | user data       |
//! | [`InterruptPinSource`] | none (edge)         | user data       |
//! | [`AnalogLevel`]        | `BinaryHysteresis`  | user data       |
//! | [`AnalogRange`]        | `MultiLevel`        | new level       |
//! | [`AccelerometerAxes`]  | `BinaryHysteresis`×3| axis index      |
//! | [`ZoneRanger`]         | `ZoneLadder`        | distance (mm)   |
//! | [`Timer`]              | deadline            | user data       |
//! | [`Keypad`]             | previous key matrix | key position    |
//! | [`ColorDominance`]     | saturation band     | RGB counts      |

pub mod accel;
pub mod analog_level;
pub mod analog_range;
pub mod color;
pub mod gpio;
pub mod keypad;
pub mod ranger;
pub mod timer;

#[cfg(test)]
pub(crate) mod mock;

pub use accel::AccelerometerAxes;
pub use analog_level::AnalogLevel;
pub use analog_range::AnalogRange;
pub use color::ColorDominance;
pub use gpio::{InterruptPinSource, PolledPin};
pub use keypad::Keypad;
pub use ranger::{ZoneBoundary, ZoneRanger};
pub use timer::{Timer, TimerMode};

use crate::events::{Event, Millis, Payload, SharedQueue};
use crate::ports::Clock;

// ───────────────────────────────────────────────────────────────
// Source contract
// ───────────────────────────────────────────────────────────────

/// The capability interface the registry drives.
pub trait EventSource {
    /// Fixed at construction.  Decides whether the registry ever polls.
    fn is_pollable(&self) -> bool;

    /// One measure-classify-publish cycle.  Returns whether at least one
    /// event was published.  Must not block beyond the underlying
    /// measurement's own timeout.
    fn poll(&mut self) -> bool {
        false
    }

    /// Release any interrupt binding.  Called on unregister.
    fn deinit(&mut self) {}
}

// ───────────────────────────────────────────────────────────────
// Publisher
// ───────────────────────────────────────────────────────────────

/// Copyable handle a source uses to stamp and enqueue events.
pub struct Publisher<'q, E> {
    queue: &'q dyn SharedQueue<E>,
    clock: &'q dyn Clock,
}

impl<E> Clone for Publisher<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Publisher<'_, E> {}

impl<'q, E> Publisher<'q, E> {
    pub fn new(queue: &'q dyn SharedQueue<E>, clock: &'q dyn Clock) -> Self {
        Self { queue, clock }
    }

    pub fn now_ms(&self) -> Millis {
        self.clock.now_ms()
    }

    /// Enqueue an event with an explicit timestamp.  Returns `false` if the
    /// queue was full and the event was dropped.
    pub fn publish_at(&self, id: E, timestamp_ms: Millis, payload: Option<Payload>) -> bool {
        self.queue.push(Event::new(id, timestamp_ms, payload))
    }

    /// Enqueue an event stamped with the current time.
    pub fn publish(&self, id: E, payload: Option<Payload>) -> bool {
        self.publish_at(id, self.now_ms(), payload)
    }
}

// ───────────────────────────────────────────────────────────────
// Event identifier pairs
// ───────────────────────────────────────────────────────────────

/// Events to publish on each transition direction.  Either may be absent,
/// in which case that direction is tracked but silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEvents<E> {
    /// Rising edge, level up, entering, recognized.
    pub rising: Option<E>,
    /// Falling edge, level down, leaving, lost.
    pub falling: Option<E>,
}

impl<E: Copy> EdgeEvents<E> {
    pub const fn new(rising: Option<E>, falling: Option<E>) -> Self {
        Self { rising, falling }
    }

    pub const fn both(rising: E, falling: E) -> Self {
        Self::new(Some(rising), Some(falling))
    }

    pub const fn rising_only(rising: E) -> Self {
        Self::new(Some(rising), None)
    }

    pub const fn falling_only(falling: E) -> Self {
        Self::new(None, Some(falling))
    }

    pub const fn is_empty(&self) -> bool {
        self.rising.is_none() && self.falling.is_none()
    }
}

/// Check a per-axis / per-channel event table: exact arity and at least one
/// configured event somewhere.  Absent entries become silent pairs.
pub(crate) fn validate_event_table<E: Copy, const N: usize>(
    table: &[Option<EdgeEvents<E>>],
    wrong_arity: &'static str,
    all_empty: &'static str,
) -> crate::error::Result<[EdgeEvents<E>; N]> {
    use crate::error::Error;

    if table.len() != N {
        return Err(Error::Configuration(wrong_arity));
    }
    let events: [EdgeEvents<E>; N] =
        core::array::from_fn(|i| table[i].unwrap_or(EdgeEvents::new(None, None)));
    if events.iter().all(EdgeEvents::is_empty) {
        return Err(Error::Configuration(all_empty));
    }
    Ok(events)
}
