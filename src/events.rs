//! Interrupt-safe event queue.
//!
//! Events are produced by:
//! - polled event sources (foreground, inside `Eventer::poll_once`)
//! - interrupt-driven event sources (edge handlers, preemptive)
//! - the embedding program itself (`Eventer::publish`)
//!
//! and consumed by the dispatch loop, one per iteration, in FIFO order.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Polled src   │────▶│              │     │              │
//! │ Edge ISR     │────▶│  EventQueue  │────▶│ DispatchLoop │
//! │ Application  │────▶│ (crit. sect) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! Every push and pop runs inside a `critical_section::with` bracket.  On a
//! single-core target that masks interrupts; on multi-core or host targets
//! the linked critical-section implementation is a real lock.

use core::cell::RefCell;
use core::fmt;

use critical_section::Mutex;
use heapless::Deque;

/// Default number of pending events a queue can hold.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

// ── Time ──────────────────────────────────────────────────────

/// Monotonic milliseconds since boot.  Wraps at `u32::MAX`.
pub type Millis = u32;

/// `t + delta` with wrap-around.
#[inline]
pub const fn ticks_add(t: Millis, delta: Millis) -> Millis {
    t.wrapping_add(delta)
}

/// Signed distance from `earlier` to `later`, correct across one wrap.
#[inline]
pub const fn ticks_diff(later: Millis, earlier: Millis) -> i32 {
    later.wrapping_sub(earlier) as i32
}

// ── Event ─────────────────────────────────────────────────────

/// Optional data attached to an event.
///
/// Sources fill in a value derived from the measurement unless the
/// application supplied its own constant at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payload {
    /// Application-supplied constant.
    User(u32),
    /// Level reached by a multi-level classifier.
    Level(u16),
    /// Axis index (0 = X, 1 = Y, 2 = Z).
    Axis(u8),
    /// Measured distance in millimetres.
    Distance(u16),
    /// Matrix keypad position.
    Key { row: u8, col: u8 },
    /// Red, green, blue channel counts.
    Rgb([u16; 3]),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(v) => write!(f, "{v}"),
            Self::Level(l) => write!(f, "L{l}"),
            Self::Axis(a) => write!(f, "axis{a}"),
            Self::Distance(mm) => write!(f, "{mm}mm"),
            Self::Key { row, col } => write!(f, "({row},{col})"),
            Self::Rgb([r, g, b]) => write!(f, "rgb({r},{g},{b})"),
        }
    }
}

/// A detected condition change.  The queue owns it once published and hands
/// ownership to the dispatch loop on removal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event<E> {
    pub id: E,
    pub timestamp_ms: Millis,
    pub payload: Option<Payload>,
}

impl<E> Event<E> {
    pub const fn new(id: E, timestamp_ms: Millis, payload: Option<Payload>) -> Self {
        Self {
            id,
            timestamp_ms,
            payload,
        }
    }
}

// ── Queue seam ────────────────────────────────────────────────

/// The single synchronization point of the framework.
///
/// Implementations must make `push` safe to call from interrupt context:
/// no allocation, no blocking, no panics.
pub trait SharedQueue<E> {
    /// Append an event.  Returns `false` if it was dropped.
    fn push(&self, event: Event<E>) -> bool;

    /// Remove the oldest event, if any.
    fn pop(&self) -> Option<Event<E>>;

    /// Number of pending events.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Events dropped because the queue was full.
    fn dropped(&self) -> u32;
}

// ── Fixed-capacity implementation ─────────────────────────────

struct Inner<E, const N: usize> {
    events: Deque<Event<E>, N>,
    dropped: u32,
}

/// Fixed-capacity FIFO guarded by a critical section.
///
/// `new` is `const`, so the queue can live in a `static` shared with
/// interrupt handlers:
///
/// ```
/// use eventer::events::EventQueue;
///
/// static QUEUE: EventQueue<u8> = EventQueue::new();
/// ```
pub struct EventQueue<E, const N: usize = DEFAULT_QUEUE_CAPACITY> {
    inner: Mutex<RefCell<Inner<E, N>>>,
}

impl<E, const N: usize> EventQueue<E, N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Inner {
                events: Deque::new(),
                dropped: 0,
            })),
        }
    }

    /// Maximum number of pending events.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Discard every pending event.
    pub fn clear(&self) {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).events.clear());
    }
}

impl<E, const N: usize> Default for EventQueue<E, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, const N: usize> SharedQueue<E> for EventQueue<E, N> {
    fn push(&self, event: Event<E>) -> bool {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            if inner.events.push_back(event).is_err() {
                inner.dropped = inner.dropped.saturating_add(1);
                return false;
            }
            true
        })
    }

    fn pop(&self) -> Option<Event<E>> {
        critical_section::with(|cs| self.inner.borrow_ref_mut(cs).events.pop_front())
    }

    fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow_ref(cs).events.len())
    }

    fn dropped(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow_ref(cs).dropped)
    }
}
