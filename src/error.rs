//! Unified error types for the event framework.
//!
//! A single `Error` enum that every subsystem converts into, so the embedding
//! program's `main` only has one thing to match on.  Measurement faults from
//! sensor collaborators never show up here: they are discarded at the
//! classifier boundary.

use core::fmt;

use crate::registry::SourceId;

/// Capacity of a rendered state-machine fault message.
pub const FAULT_MESSAGE_CAP: usize = 96;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed construction arguments (wrong arity, no event configured,
    /// missing threshold).  Detected eagerly, never tolerated.
    Configuration(&'static str),
    /// An operation referenced a registration id the registry does not hold.
    NotFound(SourceId),
    /// The transition function hit an invalid (state, event) combination.
    StateMachine(StateMachineFault),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration: {msg}"),
            Self::NotFound(id) => write!(f, "no such event source: {id}"),
            Self::StateMachine(fault) => write!(f, "state machine: {fault}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// State-machine faults
// ---------------------------------------------------------------------------

/// Which diagnostic constructor produced a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// The event is not handled at all in the current state.
    UnrecognizedEvent,
    /// The event is known to the state but should not have arrived now.
    UnexpectedEvent,
    /// The state itself is not part of the machine.
    UndefinedState,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnrecognizedEvent => write!(f, "unrecognized event"),
            Self::UnexpectedEvent => write!(f, "unexpected event"),
            Self::UndefinedState => write!(f, "undefined state"),
        }
    }
}

/// Fatal fault raised from inside a transition function.
///
/// The message is rendered eagerly into a fixed-capacity buffer; anything
/// past [`FAULT_MESSAGE_CAP`] bytes is cut off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMachineFault {
    pub kind: FaultKind,
    pub message: heapless::String<FAULT_MESSAGE_CAP>,
}

impl StateMachineFault {
    pub fn new(kind: FaultKind, args: fmt::Arguments<'_>) -> Self {
        let mut message = heapless::String::new();
        // Overflow only truncates the rendering.
        let _ = fmt::write(&mut message, args);
        Self { kind, message }
    }
}

impl fmt::Display for StateMachineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<StateMachineFault> for Error {
    fn from(e: StateMachineFault) -> Self {
        Self::StateMachine(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
