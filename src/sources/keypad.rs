//! Polled matrix keypad.
//!
//! Rows are outputs, held low while idle.  A scan raises one row at a time
//! and reads every column; a high column means the key at that crossing is
//! down.  Each poll publishes at most one press or release, so several keys
//! changing together come out over successive scans.  Any number of keys
//! may be held at once.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::debug;

use super::{EdgeEvents, EventSource, Publisher};
use crate::config::KeypadConfig;
use crate::error::{Error, Result};
use crate::events::Payload;

/// Column state is kept as one bit per column.
pub const MAX_KEYPAD_COLUMNS: usize = 32;

pub struct Keypad<'q, E, R, C, D> {
    publisher: Publisher<'q, E>,
    /// `rising` = press, `falling` = release.
    events: EdgeEvents<E>,
    rows: Vec<R>,
    cols: Vec<C>,
    delay: D,
    row_delay_ms: Option<u32>,
    /// Bit `c` of `down[r]` set while key (r, c) is held.
    down: Vec<u32>,
}

impl<'q, E, R, C, D> Keypad<'q, E, R, C, D>
where
    E: Copy,
    R: OutputPin,
    C: InputPin,
    D: DelayNs,
{
    pub fn new(
        publisher: Publisher<'q, E>,
        events: EdgeEvents<E>,
        mut rows: Vec<R>,
        cols: Vec<C>,
        delay: D,
        config: KeypadConfig,
    ) -> Result<Self> {
        if events.is_empty() {
            return Err(Error::Configuration("keypad has no press or release event"));
        }
        if rows.is_empty() || cols.is_empty() {
            return Err(Error::Configuration("keypad needs at least one row and column"));
        }
        if cols.len() > MAX_KEYPAD_COLUMNS {
            return Err(Error::Configuration("keypad has too many columns"));
        }
        for (r, row) in rows.iter_mut().enumerate() {
            if let Err(e) = row.set_low() {
                debug!("Keypad: row {r} idle drive failed: {e:?}");
            }
        }

        let down = vec![0; rows.len()];
        Ok(Self {
            publisher,
            events,
            rows,
            cols,
            delay,
            row_delay_ms: config.row_delay_ms,
            down,
        })
    }

    /// Whether key (row, col) was down at the last scan.
    pub fn is_down(&self, row: usize, col: usize) -> bool {
        self.down
            .get(row)
            .is_some_and(|bits| col < self.cols.len() && bits & (1 << col) != 0)
    }

    /// Scan one row.  Returns `Some(published)` at the first changed key.
    fn scan_row(&mut self, r: usize) -> Option<bool> {
        for (c, col) in self.cols.iter_mut().enumerate() {
            let pressed = match col.is_high() {
                Ok(level) => level,
                Err(e) => {
                    debug!("Keypad: column {c} read failed: {e:?}");
                    continue;
                }
            };
            let mask = 1u32 << c;
            if pressed == (self.down[r] & mask != 0) {
                continue;
            }
            self.down[r] ^= mask;

            let id = if pressed {
                self.events.rising
            } else {
                self.events.falling
            };
            if let Some(id) = id {
                let key = Payload::Key {
                    row: r as u8,
                    col: c as u8,
                };
                return Some(self.publisher.publish(id, Some(key)));
            }
        }
        None
    }
}

impl<E, R, C, D> EventSource for Keypad<'_, E, R, C, D>
where
    E: Copy,
    R: OutputPin,
    C: InputPin,
    D: DelayNs,
{
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        for r in 0..self.rows.len() {
            if let Err(e) = self.rows[r].set_high() {
                debug!("Keypad: row {r} drive failed: {e:?}");
                continue;
            }
            let result = self.scan_row(r);
            if let Err(e) = self.rows[r].set_low() {
                debug!("Keypad: row {r} release failed: {e:?}");
            }
            if let Some(published) = result {
                return published;
            }
            if let Some(ms) = self.row_delay_ms {
                self.delay.delay_ms(ms);
            }
        }
        false
    }
}
