//! Binary threshold on a 16-bit analog input.

use log::debug;

use super::{EdgeEvents, EventSource, Publisher};
use crate::classify::{BinaryHysteresis, Crossing, Level};
use crate::config::AnalogLevelConfig;
use crate::error::{Error, Result};
use crate::events::Payload;
use crate::ports::AnalogInput;

pub struct AnalogLevel<'q, E, A> {
    publisher: Publisher<'q, E>,
    events: EdgeEvents<E>,
    input: A,
    data: Option<Payload>,
    classifier: BinaryHysteresis<i32>,
}

impl<'q, E: Copy, A: AnalogInput> AnalogLevel<'q, E, A> {
    /// Seed the level from a first reading: high at or above the threshold.
    /// A failed first read seeds low.
    pub fn new(
        publisher: Publisher<'q, E>,
        events: EdgeEvents<E>,
        mut input: A,
        config: AnalogLevelConfig,
        data: Option<Payload>,
    ) -> Result<Self> {
        config.validate()?;
        if events.is_empty() {
            return Err(Error::Configuration("analog level source has no event"));
        }

        let center = i32::from(config.threshold);
        let half = i32::from(config.half_width);
        let classifier = match input.read_u16() {
            Ok(reading) => BinaryHysteresis::seeded(center, half, i32::from(reading)),
            Err(e) => {
                debug!("AnalogLevel: initial read failed: {e:?}");
                BinaryHysteresis::centered(center, half, Level::Low)
            }
        };

        Ok(Self {
            publisher,
            events,
            input,
            data,
            classifier,
        })
    }

    pub fn level(&self) -> Level {
        self.classifier.level()
    }
}

impl<E: Copy, A: AnalogInput> EventSource for AnalogLevel<'_, E, A> {
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        let reading = match self.input.read_u16() {
            Ok(r) => r,
            Err(e) => {
                debug!("AnalogLevel: reading discarded: {e:?}");
                return false;
            }
        };

        let id = match self.classifier.update(i32::from(reading)) {
            Some(Crossing::Rising) => self.events.rising,
            Some(Crossing::Falling) => self.events.falling,
            None => None,
        };
        id.is_some_and(|id| self.publisher.publish(id, self.data))
    }
}
