//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter | Implements | Connects to            |
//! |---------|------------|------------------------|
//! | `time`  | Clock      | `std::time::Instant`   |

pub mod time;
