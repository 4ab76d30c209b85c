//! Shared test doubles for source unit tests.
//!
//! Each mock keeps its measured value behind an `Rc<Cell<_>>` so a test can
//! move the mock into a source and keep steering it from outside.

use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use crate::events::Millis;
use crate::ports::{
    Accelerometer, AnalogInput, Clock, ColorSensor, EdgeHandler, EdgeMask, InterruptPin,
    Rangefinder,
};

/// Measurement that failed on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFault;

// ── Clock ─────────────────────────────────────────────────────

pub struct MockClock {
    now: Cell<Millis>,
}

impl MockClock {
    pub fn at(now: Millis) -> Self {
        Self {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: Millis) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

// ── Scalar sensors ────────────────────────────────────────────

/// A value a test can change, or `None` to make the next read fail.
pub type Knob<T> = Rc<Cell<Option<T>>>;

pub fn knob<T>(initial: T) -> Knob<T> {
    Rc::new(Cell::new(Some(initial)))
}

pub struct MockAdc(pub Knob<u16>);

impl AnalogInput for MockAdc {
    type Error = ReadFault;

    fn read_u16(&mut self) -> Result<u16, ReadFault> {
        self.0.get().ok_or(ReadFault)
    }
}

pub struct MockAccel(pub Knob<[f32; 3]>);

impl Accelerometer for MockAccel {
    type Error = ReadFault;

    fn acceleration(&mut self) -> Result<[f32; 3], ReadFault> {
        self.0.get().ok_or(ReadFault)
    }
}

pub struct MockRanger(pub Knob<u16>);

impl Rangefinder for MockRanger {
    type Error = ReadFault;

    fn range_mm(&mut self) -> Result<u16, ReadFault> {
        self.0.get().ok_or(ReadFault)
    }
}

pub struct MockColor {
    pub counts: Knob<[u16; 3]>,
    pub overflow: u16,
}

impl ColorSensor for MockColor {
    type Error = ReadFault;

    fn rgb(&mut self) -> Result<[u16; 3], ReadFault> {
        self.counts.get().ok_or(ReadFault)
    }

    fn overflow_count(&self) -> u16 {
        self.overflow
    }
}

// ── Digital pins ──────────────────────────────────────────────

pub struct MockInput(pub Knob<bool>);

impl ErrorType for MockInput {
    type Error = Infallible;
}

impl InputPin for MockInput {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        // A failed read reads as low on a pin without error reporting.
        Ok(self.0.get().unwrap_or(false))
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|h| !h)
    }
}

pub struct MockOutput(pub Rc<Cell<bool>>);

impl ErrorType for MockOutput {
    type Error = Infallible;
}

impl OutputPin for MockOutput {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

// ── Edge interrupts ───────────────────────────────────────────

/// Interrupt line the test fires by hand.
#[derive(Clone, Default)]
pub struct MockIrqLine<'a> {
    pub handler: Rc<RefCell<Option<EdgeHandler<'a>>>>,
    pub edges: Rc<Cell<EdgeMask>>,
}

impl MockIrqLine<'_> {
    /// Simulate an edge that left the pin at `level`.
    pub fn fire(&self, level: bool) {
        if let Some(handler) = self.handler.borrow_mut().as_mut() {
            handler(level);
        }
    }

    pub fn is_bound(&self) -> bool {
        self.handler.borrow().is_some()
    }
}

impl<'a> InterruptPin<'a> for MockIrqLine<'a> {
    fn listen(&mut self, edges: EdgeMask, handler: EdgeHandler<'a>) {
        self.edges.set(edges);
        *self.handler.borrow_mut() = Some(handler);
    }

    fn unlisten(&mut self) {
        self.edges.set(EdgeMask::NONE);
        *self.handler.borrow_mut() = None;
    }
}
