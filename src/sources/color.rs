//! Single-color dominance over an RGB sensor.
//!
//! A channel becomes dominant when it is the largest and exceeds the RGB
//! mean by more than the upper saturation factor.  It stays dominant until
//! it drops below the mean times the lower factor.  Only one channel is
//! dominant at a time.

use log::debug;

use super::{validate_event_table, EdgeEvents, EventSource, Publisher};
use crate::config::ColorConfig;
use crate::error::Result;
use crate::events::Payload;
use crate::ports::ColorSensor;

const CHANNELS: usize = 3;

pub struct ColorDominance<'q, E, S> {
    publisher: Publisher<'q, E>,
    /// Per channel (R, G, B): `rising` = recognized, `falling` = lost.
    events: [EdgeEvents<E>; CHANNELS],
    sensor: S,
    data: Option<Payload>,
    factor_low: f32,
    factor_high: f32,
    dominant: Option<usize>,
}

impl<'q, E: Copy, S: ColorSensor> ColorDominance<'q, E, S> {
    pub fn new(
        publisher: Publisher<'q, E>,
        events: &[Option<EdgeEvents<E>>],
        sensor: S,
        config: ColorConfig,
        data: Option<Payload>,
    ) -> Result<Self> {
        config.validate()?;
        let events = validate_event_table::<E, CHANNELS>(
            events,
            "color source needs exactly three channel entries",
            "color source has no channel event configured",
        )?;
        Ok(Self {
            publisher,
            events,
            sensor,
            data,
            factor_low: config.saturation_factor - config.half_width,
            factor_high: config.saturation_factor + config.half_width,
            dominant: None,
        })
    }

    /// Index (0 = red, 1 = green, 2 = blue) of the dominant channel.
    pub fn dominant(&self) -> Option<usize> {
        self.dominant
    }
}

impl<E: Copy, S: ColorSensor> EventSource for ColorDominance<'_, E, S> {
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        let mut counts = match self.sensor.rgb() {
            Ok(c) => c,
            Err(e) => {
                debug!("ColorDominance: reading discarded: {e:?}");
                return false;
            }
        };
        let overflow = self.sensor.overflow_count();
        for count in counts.iter_mut().filter(|c| **c >= overflow) {
            *count = 0;
        }

        let mean = counts.iter().map(|&c| f32::from(c)).sum::<f32>() / CHANNELS as f32;
        let (largest, largest_count) = counts
            .iter()
            .copied()
            .enumerate()
            .fold((0, 0), |best, (i, c)| if c > best.1 { (i, c) } else { best });

        let now = self.publisher.now_ms();
        let payload = self.data.or(Some(Payload::Rgb(counts)));
        let mut published = false;

        if let Some(channel) = self.dominant {
            if f32::from(counts[channel]) < mean * self.factor_low {
                self.dominant = None;
                if let Some(id) = self.events[channel].falling {
                    published |= self.publisher.publish_at(id, now, payload);
                }
            }
        }

        if self.dominant.is_none() && f32::from(largest_count) > mean * self.factor_high {
            self.dominant = Some(largest);
            if let Some(id) = self.events[largest].rising {
                published |= self.publisher.publish_at(id, now, payload);
            }
        }
        published
    }
}
