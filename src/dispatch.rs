//! Dispatch loop: drains the queue into the application's transition
//! function.
//!
//! ```text
//!   ┌─────────────── step ───────────────┐
//!   │ loop hook(&state)                  │
//!   │ poll_once()        (if pollable)   │
//!   │ next() ──▶ transition(state, ev)   │──▶ new state
//!   └────────────────────────────────────┘
//! ```
//!
//! The loop never sleeps or yields.  A transition that returns an error
//! (normally one built by a [`Labels`] diagnostic) ends [`DispatchLoop::run`]
//! with that error; there is no recovery above the loop.

use core::convert::Infallible;
use core::fmt;

use log::{info, warn};

use crate::config::DispatchConfig;
use crate::error::{Error, FaultKind, Result, StateMachineFault};
use crate::events::{Millis, Payload};
use crate::registry::Eventer;

/// Log target of the per-event trace line.
pub const TRACE_TARGET: &str = "eventer::trace";

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

/// Optional human-readable names for states and events.
///
/// Identifiers missing from a table render as `State#<id>` / `Event#<id>`.
pub struct Labels<S: 'static, E: 'static> {
    states: &'static [(S, &'static str)],
    events: &'static [(E, &'static str)],
}

impl<S: 'static, E: 'static> Clone for Labels<S, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: 'static, E: 'static> Copy for Labels<S, E> {}

impl<S: 'static, E: 'static> Default for Labels<S, E> {
    fn default() -> Self {
        Self::none()
    }
}

impl<S: 'static, E: 'static> Labels<S, E> {
    pub const fn new(
        states: &'static [(S, &'static str)],
        events: &'static [(E, &'static str)],
    ) -> Self {
        Self { states, events }
    }

    /// No tables: everything renders numerically.
    pub const fn none() -> Self {
        Self::new(&[], &[])
    }
}

impl<S: PartialEq + fmt::Debug + 'static, E: PartialEq + fmt::Debug + 'static> Labels<S, E> {
    pub fn state<'a>(&'a self, state: &'a S) -> Label<'a, S> {
        Label {
            name: lookup(self.states, state),
            kind: "State",
            id: state,
        }
    }

    pub fn event<'a>(&'a self, event: &'a E) -> Label<'a, E> {
        Label {
            name: lookup(self.events, event),
            kind: "Event",
            id: event,
        }
    }

    /// `event` is not handled in `state` at all.
    pub fn unrecognized_event(&self, state: S, event: E) -> Error {
        StateMachineFault::new(
            FaultKind::UnrecognizedEvent,
            format_args!(
                "Unrecognized {} in {}",
                self.event(&event),
                self.state(&state)
            ),
        )
        .into()
    }

    /// `event` is known to `state` but should not have arrived now.
    pub fn unexpected_event(&self, state: S, event: E, payload: Option<Payload>) -> Error {
        let payload = PayloadSuffix(payload);
        StateMachineFault::new(
            FaultKind::UnexpectedEvent,
            format_args!(
                "Unexpected {}{} in {}",
                self.event(&event),
                payload,
                self.state(&state)
            ),
        )
        .into()
    }

    /// `state` is not part of the machine.
    pub fn undefined_state(&self, state: S) -> Error {
        StateMachineFault::new(
            FaultKind::UndefinedState,
            format_args!("Undefined or unhandled {}", self.state(&state)),
        )
        .into()
    }
}

fn lookup<T: PartialEq>(table: &[(T, &'static str)], id: &T) -> Option<&'static str> {
    table.iter().find(|(k, _)| k == id).map(|&(_, name)| name)
}

/// Display adapter for a labelled state or event.
pub struct Label<'a, T> {
    name: Option<&'static str>,
    kind: &'static str,
    id: &'a T,
}

impl<T: fmt::Debug> fmt::Display for Label<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => f.write_str(name),
            None => write!(f, "{}#{:?}", self.kind, self.id),
        }
    }
}

/// `:payload`, or nothing.
struct PayloadSuffix(Option<Payload>);

impl fmt::Display for PayloadSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(p) => write!(f, ":{p}"),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

pub struct DispatchLoop<'h, S: 'static, E: 'static> {
    config: DispatchConfig,
    labels: Labels<S, E>,
    loop_hook: Option<Box<dyn FnMut(&S) + 'h>>,
    dropped_seen: u32,
    dispatched: u64,
}

impl<'h, S, E> DispatchLoop<'h, S, E>
where
    S: Copy + PartialEq + fmt::Debug + 'static,
    E: Copy + PartialEq + fmt::Debug + 'static,
{
    pub fn new(config: DispatchConfig, labels: Labels<S, E>) -> Self {
        Self {
            config,
            labels,
            loop_hook: None,
            dropped_seen: 0,
            dispatched: 0,
        }
    }

    /// Called with the current state at the top of every iteration.
    pub fn set_loop_hook(&mut self, hook: impl FnMut(&S) + 'h) {
        self.loop_hook = Some(Box::new(hook));
    }

    pub fn labels(&self) -> Labels<S, E> {
        self.labels
    }

    /// Events handed to the transition function so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// One iteration: hook, poll scan, then at most one event through
    /// `transition(state, event, timestamp_ms, payload)`.  Returns the state to carry into the next iteration.
    pub fn step(
        &mut self,
        eventer: &mut Eventer<'_, E>,
        transition: &mut impl FnMut(S, E, Millis, Option<Payload>) -> Result<S>,
        state: S,
    ) -> Result<S> {
        if let Some(hook) = self.loop_hook.as_mut() {
            hook(&state);
        }
        if eventer.requires_polling() {
            eventer.poll_once();
        }

        let dropped = eventer.dropped();
        if dropped != self.dropped_seen {
            warn!(
                "Dispatch: event queue overflowed, {} event(s) lost",
                dropped.wrapping_sub(self.dropped_seen)
            );
            self.dropped_seen = dropped;
        }

        let Some(event) = eventer.next() else {
            return Ok(state);
        };
        self.dispatched += 1;
        let outcome = transition(state, event.id, event.timestamp_ms, event.payload);

        // The event that ends the loop is traced too.
        if self.config.trace {
            let event_label = self.labels.event(&event.id);
            let payload = PayloadSuffix(event.payload);
            match &outcome {
                Ok(next) => info!(
                    target: TRACE_TARGET,
                    "{}:{}{} -> {}",
                    event_label,
                    event.timestamp_ms,
                    payload,
                    self.labels.state(next)
                ),
                Err(e) => info!(
                    target: TRACE_TARGET,
                    "{}:{}{} -> {}",
                    event_label,
                    event.timestamp_ms,
                    payload,
                    e
                ),
            }
        }
        outcome
    }

    /// Run forever.  Returns only with the first transition error.
    pub fn run(
        &mut self,
        eventer: &mut Eventer<'_, E>,
        mut transition: impl FnMut(S, E, Millis, Option<Payload>) -> Result<S>,
        initial: S,
    ) -> Result<Infallible> {
        if self.config.trace {
            info!(target: TRACE_TARGET, "{}", self.labels.state(&initial));
        }
        let mut state = initial;
        loop {
            state = self.step(eventer, &mut transition, state)?;
        }
    }
}
