//! Lag and clock acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - At entry to iteration n > 1 the motor equals the prediction made at n - 1
//! - The controller sees `tm == n * 0.04` exactly at iteration n
//! - Pre-registered and same-tick readings report the same error one
//!   iteration apart
//! - Only the same-tick reading can catch a wrong final output

use super::common::{follow_stick, Scripted};
use robosim_common::config::{HarnessConfig, LagMode, RobotConfig, ScenarioId};
use robosim_common::time::VirtualClock;
use robosim_runtime::driver::{LoopDriver, LoopDriverBuilder};
use robosim_runtime::io_stub::IoStub;
use robosim_runtime::oracle::{Oracle, SensorReading};
use robosim_scenarios::{
    joystick_wave, lookup, reference_controller, ChallengeOracle, ScenarioRunner,
};

#[test]
fn test_clock_exact_over_full_run() {
    let mut clock = VirtualClock::default();
    for n in 1..=1000u32 {
        assert_eq!(clock.advance(), f64::from(n) * 0.04);
    }
    assert_eq!(clock.time(), 40.0);
}

#[test]
fn test_controller_sees_exact_tick_times() {
    let mut controller = Scripted::new(2, follow_stick);
    ScenarioRunner::default()
        .run_controller(&mut controller)
        .unwrap();

    assert_eq!(controller.seen.len(), 1000);
    for (i, tm) in controller.seen.iter().enumerate() {
        let n = u32::try_from(i + 1).unwrap();
        assert_eq!(*tm, f64::from(n) * 0.04);
    }
}

#[test]
fn test_motor_at_entry_equals_previous_prediction() {
    for id in 1..=4 {
        let id = ScenarioId(id);
        let mut driver = LoopDriver::new(HarnessConfig {
            trace_depth: 1000,
            ..Default::default()
        });
        let mut program = reference_controller(RobotConfig { challenge: Some(id) });
        let mut oracle = lookup(id).unwrap().oracle();

        let result = driver
            .run(Some(id), &mut program, &mut oracle, &mut IoStub::new())
            .unwrap();
        assert!(result.passed());

        // Replay the oracle on its own to get the predictions
        let mut replay = lookup(id).unwrap().oracle();
        let predictions: Vec<f64> = (1..=1000u32)
            .map(|n| replay.predict(f64::from(n) * 0.04, SensorReading::default()).actuator)
            .collect();

        let frames = driver.recorder().frames();
        for frame in &frames[1..] {
            let index = usize::try_from(frame.iteration).unwrap() - 2;
            assert_eq!(frame.motor_in, predictions[index], "{id} iteration {}", frame.iteration);
        }
    }
}

#[test]
fn test_lag_modes_differ_by_one_iteration() {
    /// Mirrors the joystick but outputs 0.0 during iteration 40 only.
    fn glitch(tm: f64, io: &IoStub) -> f64 {
        if (tm - 40.0 * 0.04).abs() < 1e-9 {
            0.0
        } else {
            io.joystick_y
        }
    }

    let mut found = Vec::new();
    for mode in [LagMode::PreRegistered, LagMode::SameTick] {
        let runner = ScenarioRunner::new(HarnessConfig {
            lag_mode: mode,
            ..Default::default()
        });
        let result = runner.run_controller(&mut Scripted::new(2, glitch)).unwrap();
        assert_eq!(result.failures.len(), 1, "{mode}");
        found.push(result.failures[0]);
    }

    assert_eq!(found[0].iteration, 41);
    assert_eq!(found[1].iteration, 40);
    assert_eq!(found[0].expected, found[1].expected);
    assert_eq!(found[0].expected, joystick_wave(40.0 * 0.04));
}

#[test]
fn test_final_output_only_checked_same_tick() {
    fn wrong_at_end(tm: f64, io: &IoStub) -> f64 {
        if tm > 999.5 * 0.04 {
            5.0
        } else {
            io.joystick_y
        }
    }

    let pre = ScenarioRunner::default()
        .run_controller(&mut Scripted::new(2, wrong_at_end))
        .unwrap();
    assert!(pre.passed());

    let same = LoopDriverBuilder::new()
        .lag_mode(LagMode::SameTick)
        .build()
        .run(
            Some(ScenarioId(2)),
            &mut Scripted::new(2, wrong_at_end),
            &mut ChallengeOracle::mirror(),
            &mut IoStub::new(),
        )
        .unwrap();
    assert_eq!(same.failures.len(), 1);
    assert_eq!(same.failures[0].iteration, 1000);
}
