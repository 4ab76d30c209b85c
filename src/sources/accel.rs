//! Per-axis acceleration thresholds.
//!
//! Each axis runs its own binary hysteresis band in g.  A poll publishes
//! every axis that crossed, X first.

use log::debug;

use super::{validate_event_table, EdgeEvents, EventSource, Publisher};
use crate::classify::{BinaryHysteresis, Crossing, Level};
use crate::config::AxisBand;
use crate::error::{Error, Result};
use crate::events::Payload;
use crate::ports::Accelerometer;

/// Standard gravity, m/s².
pub const STANDARD_GRAVITY: f32 = 9.806_65;

const AXES: usize = 3;

pub struct AccelerometerAxes<'q, E, S> {
    publisher: Publisher<'q, E>,
    events: [EdgeEvents<E>; AXES],
    sensor: S,
    data: Option<Payload>,
    axes: [BinaryHysteresis<f32>; AXES],
}

impl<'q, E: Copy, S: Accelerometer> AccelerometerAxes<'q, E, S> {
    /// `events` and `bands` are X, Y, Z.  An absent entry in `events` tracks
    /// that axis silently.  Axes are seeded from a first reading, or start
    /// low if it fails.
    pub fn new(
        publisher: Publisher<'q, E>,
        events: &[Option<EdgeEvents<E>>],
        bands: &[AxisBand],
        mut sensor: S,
        data: Option<Payload>,
    ) -> Result<Self> {
        let events = validate_event_table::<E, AXES>(
            events,
            "accelerometer needs exactly three axis entries",
            "accelerometer has no axis event configured",
        )?;
        if bands.len() != AXES {
            return Err(Error::Configuration(
                "accelerometer needs exactly three axis bands",
            ));
        }
        for band in bands {
            band.validate()?;
        }
        let seed = match sensor.acceleration() {
            Ok(reading) => Some(reading.map(|a| a / STANDARD_GRAVITY)),
            Err(e) => {
                debug!("Accelerometer: initial read failed: {e:?}");
                None
            }
        };
        let axes = core::array::from_fn(|i| {
            let AxisBand {
                threshold_g,
                half_width_g,
            } = bands[i];
            match seed {
                Some(g) => BinaryHysteresis::seeded(threshold_g, half_width_g, g[i]),
                None => BinaryHysteresis::centered(threshold_g, half_width_g, Level::Low),
            }
        });

        Ok(Self {
            publisher,
            events,
            sensor,
            data,
            axes,
        })
    }

    pub fn levels(&self) -> [Level; AXES] {
        core::array::from_fn(|i| self.axes[i].level())
    }
}

impl<E: Copy, S: Accelerometer> EventSource for AccelerometerAxes<'_, E, S> {
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        let reading = match self.sensor.acceleration() {
            Ok(r) => r,
            Err(e) => {
                debug!("Accelerometer: reading discarded: {e:?}");
                return false;
            }
        };

        let now = self.publisher.now_ms();
        let mut published = false;
        for (axis, (classifier, events)) in self.axes.iter_mut().zip(&self.events).enumerate() {
            let g = reading[axis] / STANDARD_GRAVITY;
            let id = match classifier.update(g) {
                Some(Crossing::Rising) => events.rising,
                Some(Crossing::Falling) => events.falling,
                None => None,
            };
            if let Some(id) = id {
                let payload = self.data.or(Some(Payload::Axis(axis as u8)));
                published |= self.publisher.publish_at(id, now, payload);
            }
        }
        published
    }
}
