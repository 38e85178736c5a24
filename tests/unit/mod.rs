//! Unit test harness for stepper-axis.
//!
//! Organizes the configuration tests that go through the public API.

mod config_parsing;
mod config_validation;
