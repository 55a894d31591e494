//! Integration tests for robosim acceptance testing.
//!
//! One file per concern, sharing the controllers and helpers in `common`.

mod common;
mod config_test;
mod error_test;
mod lag_test;
mod scenario_test;
