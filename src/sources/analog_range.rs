//! Rotary-encoder emulation over a 16-bit analog input.
//!
//! The input range is split into equal bands by [`MultiLevel`]; every band
//! step publishes the up or down event, all with the timestamp of the poll
//! that caused them.

use log::debug;

use super::{EdgeEvents, EventSource, Publisher};
use crate::classify::{MultiLevel, StepDirection};
use crate::config::AnalogRangeConfig;
use crate::error::{Error, Result};
use crate::events::Payload;
use crate::ports::AnalogInput;

pub struct AnalogRange<'q, E, A> {
    publisher: Publisher<'q, E>,
    /// `rising` = level up, `falling` = level down.
    events: EdgeEvents<E>,
    input: A,
    data: Option<Payload>,
    classifier: MultiLevel,
    /// False until a reading has placed the classifier.
    seeded: bool,
}

impl<'q, E: Copy, A: AnalogInput> AnalogRange<'q, E, A> {
    /// `data` replaces the default payload (the level after each step).
    /// When the initial read fails, the first good poll seeds the level
    /// silently.
    pub fn new(
        publisher: Publisher<'q, E>,
        events: EdgeEvents<E>,
        mut input: A,
        config: AnalogRangeConfig,
        data: Option<Payload>,
    ) -> Result<Self> {
        if events.is_empty() {
            return Err(Error::Configuration("analog range source has no event"));
        }
        let seed = match input.read_u16() {
            Ok(reading) => Some(reading),
            Err(e) => {
                debug!("AnalogRange: initial read failed: {e:?}");
                None
            }
        };
        let classifier = MultiLevel::new(&config, seed.unwrap_or(0))?;
        Ok(Self {
            publisher,
            events,
            input,
            data,
            classifier,
            seeded: seed.is_some(),
        })
    }

    /// Current level, once a reading has been taken.
    pub fn level(&self) -> Option<u16> {
        self.seeded.then(|| self.classifier.level())
    }
}

impl<E: Copy, A: AnalogInput> EventSource for AnalogRange<'_, E, A> {
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        let reading = match self.input.read_u16() {
            Ok(r) => r,
            Err(e) => {
                debug!("AnalogRange: reading discarded: {e:?}");
                return false;
            }
        };

        if !self.seeded {
            self.classifier.reseed(reading);
            self.seeded = true;
            return false;
        }

        let now = self.publisher.now_ms();
        let (publisher, events, data) = (self.publisher, self.events, self.data);
        let mut published = false;
        self.classifier.update(reading, |step| {
            let id = match step.direction {
                StepDirection::Up => events.rising,
                StepDirection::Down => events.falling,
            };
            if let Some(id) = id {
                let payload = data.or(Some(Payload::Level(step.level)));
                published |= publisher.publish_at(id, now, payload);
            }
        });
        published
    }
}
