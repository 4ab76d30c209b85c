//! Proximity zones over a rangefinder.
//!
//! Boundaries are listed far to near.  Moving inward past a boundary
//! publishes its `on_enter` event, moving outward its `on_exit` event.  A
//! fast approach that skips a zone still publishes every boundary on the
//! way, outer first.

use log::debug;

use super::{EventSource, Publisher};
use crate::classify::{ZoneDirection, ZoneLadder, MAX_ZONE_BOUNDARIES};
use crate::config::ZoneWindow;
use crate::error::{Error, Result};
use crate::events::Payload;
use crate::ports::Rangefinder;

/// One zone boundary and its events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZoneBoundary<E> {
    pub distance_mm: u16,
    /// Published when the object moves inside this boundary.
    pub on_enter: Option<E>,
    /// Published when the object moves back outside it.
    pub on_exit: Option<E>,
}

pub struct ZoneRanger<'q, E, R> {
    publisher: Publisher<'q, E>,
    boundaries: heapless::Vec<ZoneBoundary<E>, MAX_ZONE_BOUNDARIES>,
    sensor: R,
    data: Option<Payload>,
    ladder: ZoneLadder,
}

impl<'q, E: Copy, R: Rangefinder> ZoneRanger<'q, E, R> {
    /// Start in the far zone.  `data` replaces the default payload (the
    /// measured distance).
    pub fn new(
        publisher: Publisher<'q, E>,
        boundaries: &[ZoneBoundary<E>],
        sensor: R,
        window: ZoneWindow,
        data: Option<Payload>,
    ) -> Result<Self> {
        window.validate()?;
        if boundaries
            .iter()
            .all(|b| b.on_enter.is_none() && b.on_exit.is_none())
        {
            return Err(Error::Configuration("zone ranger has no event configured"));
        }

        let mut distances = heapless::Vec::<u16, MAX_ZONE_BOUNDARIES>::new();
        for b in boundaries {
            distances
                .push(b.distance_mm)
                .map_err(|_| Error::Configuration("too many zone boundaries"))?;
        }
        let ladder = ZoneLadder::new(
            &distances,
            window.hysteresis_mm,
            window.min_mm,
            window.max_mm,
        )?;
        let boundaries = heapless::Vec::from_slice(boundaries)
            .map_err(|()| Error::Configuration("too many zone boundaries"))?;

        Ok(Self {
            publisher,
            boundaries,
            sensor,
            data,
            ladder,
        })
    }

    /// Current zone, 0 being the far zone.
    pub fn zone(&self) -> usize {
        self.ladder.zone()
    }
}

impl<E: Copy, R: Rangefinder> EventSource for ZoneRanger<'_, E, R> {
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        let mm = match self.sensor.range_mm() {
            Ok(mm) => mm,
            Err(e) => {
                debug!("ZoneRanger: reading discarded: {e:?}");
                return false;
            }
        };

        let now = self.publisher.now_ms();
        let payload = self.data.or(Some(Payload::Distance(mm)));
        let (publisher, boundaries) = (self.publisher, &self.boundaries);
        let mut published = false;
        let zone = self.ladder.update(mm, |crossing| {
            let b = &boundaries[crossing.boundary];
            let id = match crossing.direction {
                ZoneDirection::Inward => b.on_enter,
                ZoneDirection::Outward => b.on_exit,
            };
            if let Some(id) = id {
                published |= publisher.publish_at(id, now, payload);
            }
        });
        if zone.is_none() {
            debug!("ZoneRanger: {mm}mm outside window, discarded");
        }
        published
    }
}
