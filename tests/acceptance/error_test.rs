//! Fatal error acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - A non-positive iteration cap errors before any iteration runs
//! - Controller errors abort the run and surface unchanged
//! - Unknown IO fields are fatal to the controller that touches them
//! - A call over the wall-clock budget errors the run
//! - Errors are reported as a verdict distinct from failure

use super::common::{config_with_iterations, follow_stick, Scripted};
use robosim_common::config::{HarnessConfig, RobotConfig};
use robosim_common::error::{SimError, SimResult};
use robosim_common::state::RunState;
use robosim_runtime::controller::Controller;
use robosim_runtime::driver::LoopDriver;
use robosim_runtime::io_stub::{IoStub, IoValue};
use robosim_runtime::result::Verdict;
use robosim_scenarios::{ChallengeOracle, ScenarioRunner};
use std::time::Duration;

#[test]
fn test_non_positive_cap_runs_nothing() {
    for cap in [0, -1, i64::MIN] {
        let mut controller = Scripted::new(2, follow_stick);
        let outcome = ScenarioRunner::new(config_with_iterations(cap)).run_controller(&mut controller);

        assert_eq!(Verdict::of(&outcome), Verdict::Error);
        assert!(matches!(outcome, Err(SimError::Config(_))));
        assert_eq!(controller.calls, 0);
    }
}

#[test]
fn test_driver_state_after_config_error() {
    let mut driver = LoopDriver::new(config_with_iterations(0));
    let err = driver
        .run(
            None,
            &mut Scripted::new(2, follow_stick),
            &mut ChallengeOracle::mirror(),
            &mut IoStub::new(),
        )
        .unwrap_err();

    assert_eq!(err.to_string(), "configuration error: max_iterations must be positive, got 0");
    assert_eq!(driver.state(), RunState::Errored);
    assert_eq!(driver.clock().ticks(), 0);
}

#[test]
fn test_controller_fault_surfaces_unchanged() {
    let mut controller = Scripted::new(4, follow_stick);
    controller.fault_at = Some(250);

    let outcome = ScenarioRunner::default().run_controller(&mut controller);
    assert_eq!(Verdict::of(&outcome), Verdict::Error);
    assert_eq!(
        outcome.unwrap_err(),
        SimError::controller_fault("operator_control", "encoder lost")
    );
    assert_eq!(controller.calls, 250);
}

/// Reads its sensors by name, one of which does not exist.
struct Misspelled;

impl Controller for Misspelled {
    fn config(&self) -> RobotConfig {
        RobotConfig::challenge(2)
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn operator_control(&mut self, _tm: f64, io: &mut IoStub) -> SimResult<bool> {
        let stick = io.get_named("joystick_x")?;
        io.set_named("motor", stick)?;
        Ok(true)
    }
}

#[test]
fn test_unknown_field_is_fatal() {
    let outcome = ScenarioRunner::default().run_controller(&mut Misspelled);
    assert_eq!(
        outcome.unwrap_err(),
        SimError::UnknownField("joystick_x".into())
    );
}

#[test]
fn test_wrong_field_type_is_fatal() {
    let mut io = IoStub::new();
    let err = io.set_named("digital_input", IoValue::Real(1.0)).unwrap_err();
    assert!(matches!(err, SimError::FieldType { .. }));
    assert!(err.to_string().contains("digital_input"));
}

/// Takes longer than any sensible budget on its third call.
struct Stalls {
    calls: u32,
}

impl Controller for Stalls {
    fn config(&self) -> RobotConfig {
        RobotConfig::challenge(1)
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn operator_control(&mut self, _tm: f64, io: &mut IoStub) -> SimResult<bool> {
        self.calls += 1;
        if self.calls == 3 {
            std::thread::sleep(Duration::from_millis(50));
        }
        io.motor = 1.0;
        Ok(true)
    }
}

#[test]
fn test_overrun_errors_run() {
    let runner = ScenarioRunner::new(HarnessConfig {
        step_budget: Some(Duration::from_millis(10)),
        ..Default::default()
    });
    let mut controller = Stalls { calls: 0 };

    let err = runner.run_controller(&mut controller).unwrap_err();
    match err {
        SimError::ControllerOverrun {
            iteration,
            budget_ns,
            actual_ns,
        } => {
            assert_eq!(iteration, 3);
            assert_eq!(budget_ns, 10_000_000);
            assert!(actual_ns >= 50_000_000);
        }
        other => panic!("expected overrun, got {other}"),
    }
    assert_eq!(controller.calls, 3);
}
