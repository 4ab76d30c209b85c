//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a subsystem against mock
//! hardware.  All tests run on the host with no real hardware required.

mod dispatch_flow_tests;
mod mock_hw;
mod registry_tests;
