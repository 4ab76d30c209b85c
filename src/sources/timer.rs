//! Restartable polled timer.
//!
//! The transition function needs to start and cancel timers while the
//! registry owns the polling, so a `Timer` keeps its state in `Cell`s and
//! is registered by reference:
//!
//! ```ignore
//! let timer = Timer::new(eventer.publisher(), Ev::Timeout, TimerMode::OneShot, None, None);
//! eventer.register(&timer);
//! timer.start(Some(250), None)?;
//! ```
//!
//! A timer that already fired may have its event queued when `cancel` is
//! called.  The transition function must tolerate that late event.

use core::cell::Cell;

use super::{EventSource, Publisher};
use crate::error::{Error, Result};
use crate::events::{ticks_add, ticks_diff, Millis, Payload};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Fire once per `start`.
    OneShot,
    /// Re-arm from the firing time after every expiry.
    Periodic,
}

pub struct Timer<'q, E> {
    publisher: Publisher<'q, E>,
    event: E,
    mode: TimerMode,
    period_ms: Cell<Option<Millis>>,
    data: Cell<Option<Payload>>,
    deadline: Cell<Option<Millis>>,
}

impl<'q, E: Copy> Timer<'q, E> {
    /// Idle timer.  `period_ms` is the default for `start(None, ..)`.
    pub fn new(
        publisher: Publisher<'q, E>,
        event: E,
        mode: TimerMode,
        period_ms: Option<Millis>,
        data: Option<Payload>,
    ) -> Self {
        Self {
            publisher,
            event,
            mode,
            period_ms: Cell::new(period_ms),
            data: Cell::new(data),
            deadline: Cell::new(None),
        }
    }

    /// Arm (or re-arm) the timer.  A given period becomes the new default,
    /// and a given payload replaces the previous one.
    pub fn start(&self, period_ms: Option<Millis>, data: Option<Payload>) -> Result<()> {
        let period = match period_ms.or(self.period_ms.get()) {
            Some(p) => p,
            None => return Err(Error::Configuration("timer started without a period")),
        };
        self.period_ms.set(Some(period));
        if data.is_some() {
            self.data.set(data);
        }
        self.deadline
            .set(Some(ticks_add(self.publisher.now_ms(), period)));
        Ok(())
    }

    pub fn cancel(&self) {
        self.deadline.set(None);
    }

    pub fn is_running(&self) -> bool {
        self.deadline.get().is_some()
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    fn fire_if_due(&self) -> bool {
        let Some(deadline) = self.deadline.get() else {
            return false;
        };
        let now = self.publisher.now_ms();
        if ticks_diff(now, deadline) < 0 {
            return false;
        }

        let next = match (self.mode, self.period_ms.get()) {
            (TimerMode::Periodic, Some(period)) => Some(ticks_add(now, period)),
            _ => None,
        };
        self.deadline.set(next);
        self.publisher.publish_at(self.event, now, self.data.get())
    }
}

impl<E: Copy> EventSource for &Timer<'_, E> {
    fn is_pollable(&self) -> bool {
        true
    }

    fn poll(&mut self) -> bool {
        self.fire_if_due()
    }
}
