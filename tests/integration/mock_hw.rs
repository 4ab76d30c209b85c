//! Mock hardware for integration tests.
//!
//! Every mock keeps its value behind shared cells so a test can hand the
//! mock to a source and keep steering it from outside.

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin};
use eventer::events::Millis;
use eventer::ports::{Clock, EdgeHandler, EdgeMask, InterruptPin};

// ── Clock ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now: Cell<Millis>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(now: Millis) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

// ── Push button (polled) ──────────────────────────────────────

/// Active-high push button.
#[derive(Clone, Default)]
pub struct MockButton {
    pressed: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl MockButton {
    pub fn press(&self) {
        self.pressed.set(true);
    }

    pub fn release(&self) {
        self.pressed.set(false);
    }
}

impl ErrorType for MockButton {
    type Error = Infallible;
}

impl InputPin for MockButton {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.pressed.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.pressed.get())
    }
}

// ── Interrupt line ────────────────────────────────────────────

/// Edge-interrupt pin.  `edge` plays the role of the ISR.
#[derive(Clone, Default)]
pub struct MockIrqPin<'a> {
    handler: Rc<RefCell<Option<EdgeHandler<'a>>>>,
    mask: Rc<Cell<EdgeMask>>,
}

#[allow(dead_code)]
impl MockIrqPin<'_> {
    /// Deliver an edge that left the pin at `level`, if that edge is enabled.
    pub fn edge(&self, level: bool) {
        let wanted = if level {
            EdgeMask::RISING
        } else {
            EdgeMask::FALLING
        };
        if !self.mask.get().contains(wanted) {
            return;
        }
        if let Some(handler) = self.handler.borrow_mut().as_mut() {
            handler(level);
        }
    }

    pub fn is_listening(&self) -> bool {
        self.handler.borrow().is_some()
    }
}

impl<'a> InterruptPin<'a> for MockIrqPin<'a> {
    fn listen(&mut self, edges: EdgeMask, handler: EdgeHandler<'a>) {
        self.mask.set(edges);
        *self.handler.borrow_mut() = Some(handler);
    }

    fn unlisten(&mut self) {
        self.mask.set(EdgeMask::NONE);
        *self.handler.borrow_mut() = None;
    }
}
