//! Common utilities for acceptance tests.
//!
//! Provides:
//! - A scriptable controller for driving wrong or faulty behavior
//! - Harness configuration helpers
//! - Temporary configuration files

#![allow(dead_code)] // Not every helper is used by every test file

use robosim_common::config::{HarnessConfig, RobotConfig};
use robosim_common::error::{SimError, SimResult};
use robosim_runtime::controller::Controller;
use robosim_runtime::io_stub::IoStub;
use std::io::Write;
use tempfile::NamedTempFile;

/// Motor law of a scripted controller: `(tm, io) -> motor`.
pub type MotorLaw = fn(f64, &IoStub) -> f64;

/// Controller whose motor law, stop point and fault point are set by the test.
#[derive(Debug)]
pub struct Scripted {
    /// Reported configuration.
    pub config: RobotConfig,
    /// Motor law applied each iteration.
    pub law: MotorLaw,
    /// Return `false` from this call on (1-indexed).
    pub stop_at: Option<u64>,
    /// Return an error from this call (1-indexed).
    pub fault_at: Option<u64>,
    /// Operator-control calls so far.
    pub calls: u64,
    /// Times passed to operator control.
    pub seen: Vec<f64>,
}

impl Scripted {
    /// Scripted controller selecting `challenge`.
    pub fn new(challenge: u32, law: MotorLaw) -> Self {
        Self {
            config: RobotConfig::challenge(challenge),
            law,
            stop_at: None,
            fault_at: None,
            calls: 0,
            seen: Vec::new(),
        }
    }
}

impl Controller for Scripted {
    fn config(&self) -> RobotConfig {
        self.config
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn operator_control(&mut self, tm: f64, io: &mut IoStub) -> SimResult<bool> {
        self.calls += 1;
        self.seen.push(tm);
        if self.fault_at == Some(self.calls) {
            return Err(SimError::controller_fault("operator_control", "encoder lost"));
        }
        io.motor = (self.law)(tm, io);
        Ok(self.stop_at.map_or(true, |stop| self.calls < stop))
    }
}

/// Motor laws matching the reference programs.
pub fn full_forward(_tm: f64, _io: &IoStub) -> f64 {
    1.0
}

/// Motor follows the joystick.
pub fn follow_stick(_tm: f64, io: &IoStub) -> f64 {
    io.joystick_y
}

/// Motor follows the joystick while the digital input is high.
pub fn gated_stick(_tm: f64, io: &IoStub) -> f64 {
    if io.digital_input {
        io.joystick_y
    } else {
        0.0
    }
}

/// Default configuration with a different iteration cap.
pub fn config_with_iterations(max_iterations: i64) -> HarnessConfig {
    HarnessConfig {
        max_iterations,
        ..Default::default()
    }
}

/// Write `contents` to a temporary TOML file.
pub fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config file");
    file.write_all(contents.as_bytes())
        .expect("write temp config file");
    file
}
