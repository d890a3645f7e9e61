//! Tests requiring a real DUT on a serial port.
//!
//! These tests are ignored by default and require actual hardware to run.
//! They read `TEST_PORT` and optionally `TEST_BAUD` from the environment.

pub mod dut_tests;
pub mod utils;
