//! Event source registry and poll scan.
//!
//! ```text
//!  ┌──────────────────────────────────────────────┐
//!  │  Eventer                                     │
//!  │  ┌────┬──────────┬──────────────────────┐    │
//!  │  │ id │ pollable │ source               │    │
//!  │  ├────┼──────────┼──────────────────────┤    │
//!  │  │ #0 │   yes    │ PolledPin (cancel)   │ ◀── polled first
//!  │  │ #1 │   no     │ InterruptPinSource   │    │
//!  │  │ #2 │   yes    │ &Timer               │ ◀── polled last
//!  │  └────┴──────────┴──────────────────────┘    │
//!  │                 │ publish                    │
//!  │                 ▼                            │
//!  │           SharedQueue ──▶ next()             │
//!  └──────────────────────────────────────────────┘
//! ```
//!
//! Registration order is the poll priority.  A scan stops at the first
//! source that publishes ("one and done"), so a cancel button registered
//! ahead of a timer wins when both trip in the same scan, and the loser is
//! picked up on a later iteration instead of racing in the same one.

use core::fmt;

use log::{info, warn};

use crate::error::{Error, Result};
use crate::events::{Event, Payload, SharedQueue};
use crate::ports::Clock;
use crate::sources::{EventSource, Publisher};

/// Registration id.  Assigned sequentially, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(u32);

impl SourceId {
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry<'q> {
    id: SourceId,
    pollable: bool,
    source: Box<dyn EventSource + 'q>,
}

/// The registry: owns the sources, borrows the shared queue and clock.
pub struct Eventer<'q, E> {
    queue: &'q dyn SharedQueue<E>,
    clock: &'q dyn Clock,
    entries: Vec<Entry<'q>>,
    next_id: u32,
    requires_polling: usize,
    poll_hook: Option<Box<dyn FnMut() + 'q>>,
}

impl<'q, E> Eventer<'q, E> {
    pub fn new(queue: &'q dyn SharedQueue<E>, clock: &'q dyn Clock) -> Self {
        Self {
            queue,
            clock,
            entries: Vec::new(),
            next_id: 0,
            requires_polling: 0,
            poll_hook: None,
        }
    }

    /// Handle for constructing sources that publish into this registry.
    pub fn publisher(&self) -> Publisher<'q, E> {
        Publisher::new(self.queue, self.clock)
    }

    /// Take ownership of a source.  Returns its id.
    pub fn register<S: EventSource + 'q>(&mut self, source: S) -> SourceId {
        let id = SourceId(self.next_id);
        self.next_id += 1;

        let pollable = source.is_pollable();
        if pollable {
            self.requires_polling += 1;
        }
        self.entries.push(Entry {
            id,
            pollable,
            source: Box::new(source),
        });
        info!(
            "Eventer: registered source {} ({})",
            id,
            if pollable { "polled" } else { "interrupt" }
        );
        id
    }

    /// Remove a source, release its interrupt binding, and forget its id.
    pub fn unregister(&mut self, id: SourceId) -> Result<()> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(Error::NotFound(id))?;

        let mut entry = self.entries.remove(pos);
        if entry.pollable {
            self.requires_polling -= 1;
        }
        entry.source.deinit();
        info!("Eventer: unregistered source {}", id);
        Ok(())
    }

    /// Whether any registered source needs polling.
    pub fn requires_polling(&self) -> bool {
        self.requires_polling > 0
    }

    /// Number of registered sources.
    pub fn source_count(&self) -> usize {
        self.entries.len()
    }

    /// Hook run at the start of every scan that has something to poll.
    pub fn set_poll_hook(&mut self, hook: impl FnMut() + 'q) {
        self.poll_hook = Some(Box::new(hook));
    }

    pub fn clear_poll_hook(&mut self) {
        self.poll_hook = None;
    }

    /// Scan pollable sources in registration order, stopping at the first
    /// one that publishes.  Returns whether anything was published.
    pub fn poll_once(&mut self) -> bool {
        if self.requires_polling == 0 {
            return false;
        }
        if let Some(hook) = self.poll_hook.as_mut() {
            hook();
        }

        for entry in self.entries.iter_mut().filter(|e| e.pollable) {
            if entry.source.poll() {
                return true;
            }
        }
        false
    }

    /// Enqueue an application event stamped with the current time.
    /// Returns `false` if the queue was full.
    pub fn publish(&self, id: E, payload: Option<Payload>) -> bool {
        let accepted = self.publisher().publish(id, payload);
        if !accepted {
            warn!("Eventer: queue full, application event dropped");
        }
        accepted
    }

    /// Enqueue a fully formed event.
    pub fn publish_event(&self, event: Event<E>) -> bool {
        self.queue.push(event)
    }

    /// Oldest pending event, or `None` when the queue is empty.
    pub fn next(&self) -> Option<Event<E>> {
        self.queue.pop()
    }

    /// Number of pending events.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Events dropped on a full queue since boot.
    pub fn dropped(&self) -> u32 {
        self.queue.dropped()
    }
}
