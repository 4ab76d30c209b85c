//! Event composition and dispatch for small embedded controllers.
//!
//! Condition monitors ([`sources`]) turn measurements into discrete events,
//! an interrupt-safe FIFO ([`events::EventQueue`]) collects them, the
//! registry ([`registry::Eventer`]) polls monitors in priority order, and
//! the [`dispatch::DispatchLoop`] feeds events one at a time to an
//! application-supplied transition function.
//!
//! ```text
//!   sources ──poll/ISR──▶ EventQueue ──next()──▶ DispatchLoop ──▶ transition
//!      ▲                                              │
//!      └──────────── poll_once() (one and done) ◀─────┘
//! ```

#![deny(unused_must_use)]

pub mod adapters;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod ports;
pub mod registry;
pub mod sources;

pub use error::{Error, Result};
