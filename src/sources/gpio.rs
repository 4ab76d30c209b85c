//! Digital edge sources.
//!
//! [`PolledPin`] samples an `embedded-hal` input on every scan and compares
//! it with the previous level.  [`InterruptPinSource`] never polls; it binds
//! an edge handler that publishes straight into the queue.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

use super::{EdgeEvents, EventSource, Publisher};
use crate::error::{Error, Result};
use crate::events::Payload;
use crate::ports::{EdgeMask, InterruptPin};

// ── Polled ────────────────────────────────────────────────────

pub struct PolledPin<'q, E, P> {
    publisher: Publisher<'q, E>,
    events: EdgeEvents<E>,
    pin: P,
    data: Option<Payload>,
    high: bool,
}

impl<'q, E: Copy, P: InputPin> PolledPin<'q, E, P> {
    /// Watch `pin`, starting from its current level.
    pub fn new(
        publisher: Publisher<'q, E>,
        events: EdgeEvents<E>,
        mut pin: P,
        data: Option<Payload>,
    ) -> Result<Self> {
        if events.is_empty() {
            return Err(Error::Configuration("pin source has no edge event"));
        }
        let high = pin.is_high().unwrap_or_else(|e| {
            warn!("PolledPin: initial read failed ({e:?}), assuming low");
            false
        });
        Ok(Self {
            publisher,
            events,
            pin,
            data,
            high,
        })
    }

    /// Last level seen.
    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl<E: Copy, P: InputPin> EventSource for PolledPin<'_, E, P> {
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        let high = match self.pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                debug!("PolledPin: read failed: {e:?}");
                return false;
            }
        };
        if high == self.high {
            return false;
        }
        self.high = high;

        let id = if high {
            self.events.rising
        } else {
            self.events.falling
        };
        match id {
            Some(id) => self.publisher.publish(id, self.data),
            None => false,
        }
    }
}

// ── Interrupt driven ──────────────────────────────────────────

/// Edge source driven by a pin interrupt.
///
/// The handler only picks an id by level and pushes one event.  It holds no
/// state of its own, so nothing is shared with the foreground.
pub struct InterruptPinSource<P> {
    pin: P,
    edges: EdgeMask,
}

impl<P> InterruptPinSource<P> {
    /// Bind `pin` for the edges that have an event configured.
    pub fn new<'q, E>(
        publisher: Publisher<'q, E>,
        events: EdgeEvents<E>,
        mut pin: P,
        data: Option<Payload>,
    ) -> Result<Self>
    where
        E: Copy + 'q,
        P: InterruptPin<'q>,
    {
        let mut edges = EdgeMask::NONE;
        if events.rising.is_some() {
            edges = edges | EdgeMask::RISING;
        }
        if events.falling.is_some() {
            edges = edges | EdgeMask::FALLING;
        }
        if edges.is_empty() {
            return Err(Error::Configuration("pin source has no edge event"));
        }

        pin.listen(
            edges,
            Box::new(move |high| {
                let id = if high { events.rising } else { events.falling };
                if let Some(id) = id {
                    // A full queue counts the drop; nothing to do here.
                    let _ = publisher.publish(id, data);
                }
            }),
        );
        Ok(Self { pin, edges })
    }

    pub fn edges(&self) -> EdgeMask {
        self.edges
    }
}

impl<'q, P: InterruptPin<'q>> EventSource for InterruptPinSource<P> {
    fn is_pollable(&self) -> bool {
        false
    }

    fn deinit(&mut self) {
        self.pin.unlisten();
        self.edges = EdgeMask::NONE;
    }
}
