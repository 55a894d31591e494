//! End-to-end scenario acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Every reference controller passes its challenge over 1000 iterations
//! - Final clock time is exactly 40.0 and above the completion tolerance
//! - Wrong controllers fail with a diff naming the first bad iteration
//! - Unknown scenarios pass trivially

use super::common::{follow_stick, full_forward, gated_stick, Scripted};
use robosim_common::config::{LagMode, RobotConfig, ScenarioId};
use robosim_runtime::result::{RunFinding, Verdict};
use robosim_scenarios::{reference_controller, ScenarioRunner, SCENARIOS};

#[test]
fn test_reference_controllers_pass_all_challenges() {
    let runner = ScenarioRunner::default();

    for scenario in &SCENARIOS {
        let result = runner.run(scenario.id).expect("run completes");

        assert!(result.passed(), "{result}");
        assert_eq!(result.scenario, Some(scenario.id));
        assert_eq!(result.oracle, scenario.name);
        assert_eq!(result.iterations_run, 1000);
        assert_eq!(result.final_time, 40.0);
        assert!(result.final_time >= 0.04 * 900.0);
        assert!(result.trace.is_empty());
    }
}

#[test]
fn test_direct_scenario_with_scripted_controller() {
    let mut controller = Scripted::new(1, full_forward);
    let result = ScenarioRunner::default()
        .run_controller(&mut controller)
        .unwrap();

    assert!(result.failures.is_empty());
    assert_eq!(controller.calls, 1000);
}

#[test]
fn test_mirror_fails_direct_challenge() {
    let mut controller = Scripted::new(1, follow_stick);
    let outcome = ScenarioRunner::default().run_controller(&mut controller);
    assert_eq!(Verdict::of(&outcome), Verdict::Fail);

    let result = outcome.unwrap();
    // Direct presents no joystick, so the motor stays at 0.0
    let first = result.first_failure().unwrap();
    assert_eq!(first.iteration, 2);
    assert_eq!(first.expected, 1.0);
    assert_eq!(first.actual, 0.0);
    // Collect mode keeps checking after the first mismatch
    assert_eq!(result.failures.len(), 999);

    let text = result.to_string();
    assert!(text.starts_with("challenge-1 (direct): FAIL after 1000 iterations"));
    assert!(text.contains("expected"));
}

#[test]
fn test_gate_scripted_controllers() {
    let runner = ScenarioRunner::default();

    let result = runner
        .run_controller(&mut Scripted::new(3, gated_stick))
        .unwrap();
    assert!(result.passed(), "{result}");

    let result = runner
        .run_controller(&mut Scripted::new(3, follow_stick))
        .unwrap();
    assert!(!result.passed());
    assert!(result.failures.iter().all(|m| m.expected == 0.0));
}

#[test]
fn test_unknown_scenario_passes_trivially() {
    let runner = ScenarioRunner::default();

    for id in [0, 5, 1000] {
        let outcome = runner.run(ScenarioId(id));
        assert_eq!(Verdict::of(&outcome), Verdict::Pass);
        let result = outcome.unwrap();
        assert_eq!(result.iterations_run, 0);
        assert_eq!(result.scenario, Some(ScenarioId(id)));
    }

    // No scenario selected at all
    let mut idle = reference_controller(RobotConfig::default());
    let result = runner.run_controller(&mut idle).unwrap();
    assert!(result.passed());
    assert_eq!(result.scenario, None);
    assert_eq!(result.lag_mode, LagMode::PreRegistered);
}

#[test]
fn test_early_stop_is_reported() {
    let mut controller = Scripted::new(2, follow_stick);
    controller.stop_at = Some(500);

    let result = ScenarioRunner::default()
        .run_controller(&mut controller)
        .unwrap();

    assert!(result.failures.is_empty());
    assert_eq!(result.iterations_run, 500);
    assert_eq!(
        result.findings,
        vec![
            RunFinding::ShortRun {
                expected: 1000,
                actual: 500,
            },
            RunFinding::ClockBehind {
                required: 0.9 * 1000.0 * 0.04,
                actual: 500.0 * 0.04,
            },
        ]
    );
    assert!(!result.passed());
}

#[test]
fn test_stop_on_last_iteration_passes() {
    let mut controller = Scripted::new(2, follow_stick);
    controller.stop_at = Some(1000);

    let result = ScenarioRunner::default()
        .run_controller(&mut controller)
        .unwrap();
    assert!(result.passed(), "{result}");
    assert_eq!(result.iterations_run, 1000);
}

#[test]
fn test_failed_result_serializes_with_trace() {
    let mut controller = Scripted::new(2, full_forward);
    let result = ScenarioRunner::default()
        .run_controller(&mut controller)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
    assert_eq!(value["oracle"], "mirror");
    assert_eq!(value["iterations_run"], 1000);
    assert_eq!(value["failures"][0]["iteration"], 2);
    // Default trace depth keeps the last 64 frames
    assert_eq!(value["trace"].as_array().unwrap().len(), 64);
    assert_eq!(value["trace"][63]["iteration"], 1000);
}
