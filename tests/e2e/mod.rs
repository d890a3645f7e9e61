//! End-to-end tests against a scripted DUT.
//!
//! The mock port plays the firmware: it answers test ids with verdicts and
//! emits the packets a conforming stack would, so a whole run can be checked
//! from signal to report.

pub mod orchestrator_tests;
pub mod report_tests;
pub mod suite_tests;
