//! Hysteresis classifiers shared by every condition monitor.
//!
//! Each classifier maps a raw measurement plus its own state to a zone or
//! level and reports the crossings that warrant an event.  They do no I/O
//! and know nothing about events; sources translate crossings into event
//! identifiers.
//!
//! | Classifier          | Used by                          |
//! |---------------------|----------------------------------|
//! | [`BinaryHysteresis`]| analog level, accelerometer axes |
//! | [`MultiLevel`]      | analog range                     |
//! | [`ZoneLadder`]      | zone ranger                      |

pub mod binary;
pub mod multilevel;
pub mod zones;

pub use binary::{BinaryHysteresis, Crossing, Level};
pub use multilevel::{MultiLevel, Step, StepDirection, SubPosition};
pub use zones::{MAX_ZONE_BOUNDARIES, ZoneCrossing, ZoneDirection, ZoneLadder};
