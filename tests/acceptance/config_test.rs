//! Configuration acceptance tests.
//!
//! # Acceptance Criteria
//!
//! - Configuration files drive the harness the same way as code
//! - Missing keys fall back to defaults
//! - Invalid files are reported, invalid values error the run

use super::common::{config_file, follow_stick, Scripted};
use robosim_common::config::{ConfigError, FailureMode, HarnessConfig, LagMode, ScenarioId};
use robosim_common::error::SimError;
use robosim_scenarios::ScenarioRunner;
use std::time::Duration;

#[test]
fn test_file_configures_runner() {
    let file = config_file(
        r#"
        max_iterations = 250
        failure_mode = "fail_fast"
        lag_mode = "same_tick"
        trace_depth = 8
        "#,
    );
    let config = HarnessConfig::from_file(file.path()).unwrap();
    assert_eq!(config.failure_mode, FailureMode::FailFast);
    assert_eq!(config.lag_mode, LagMode::SameTick);

    let runner = ScenarioRunner::new(config);
    let result = runner.run(ScenarioId(3)).unwrap();
    assert!(result.passed());
    assert_eq!(result.iterations_run, 250);
    assert_eq!(result.final_time, 10.0);

    // Fail fast stops at the first mismatch and keeps a short trace
    let result = runner
        .run_controller(&mut Scripted::new(1, follow_stick))
        .unwrap();
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].iteration, 1);
    assert_eq!(result.iterations_run, 1);
    assert_eq!(result.trace.len(), 1);
}

#[test]
fn test_empty_file_gives_defaults() {
    let file = config_file("");
    let config = HarnessConfig::from_file(file.path()).unwrap();
    assert_eq!(config, HarnessConfig::default());
}

#[test]
fn test_budget_parsed_from_humantime() {
    let file = config_file("step_budget = \"1s 500ms\"\n");
    let config = HarnessConfig::from_file(file.path()).unwrap();
    assert_eq!(config.step_budget, Some(Duration::from_millis(1500)));

    // A generous budget does not affect the reference programs
    let result = ScenarioRunner::new(config).run(ScenarioId(4)).unwrap();
    assert!(result.passed());
}

#[test]
fn test_bad_files_are_reported() {
    let file = config_file("max_iterations = \"many\"\n");
    assert!(matches!(
        HarnessConfig::from_file(file.path()),
        Err(ConfigError::Parse(_))
    ));

    let file = config_file("step_budget = \"soon\"\n");
    assert!(HarnessConfig::from_file(file.path()).is_err());

    let missing = std::path::Path::new("/nonexistent/robosim/config.toml");
    assert!(matches!(
        HarnessConfig::from_file(missing),
        Err(ConfigError::Io { .. })
    ));
}

#[test]
fn test_invalid_values_error_the_run() {
    let file = config_file("completion_tolerance = 0.0\n");
    let config = HarnessConfig::from_file(file.path()).unwrap();

    let err = ScenarioRunner::new(config).run(ScenarioId(1)).unwrap_err();
    assert!(matches!(err, SimError::Config(_)));
}

#[test]
fn test_oversized_buffers_error_the_run() {
    for contents in [
        "trace_depth = 9223372036854775807\n",
        "[metrics]\nhistogram_size = 9223372036854775807\n",
        "trace_depth = 1000001\n",
    ] {
        let file = config_file(contents);
        let config = HarnessConfig::from_file(file.path()).unwrap();

        let err = ScenarioRunner::new(config).run(ScenarioId(1)).unwrap_err();
        assert!(matches!(err, SimError::Config(_)), "{contents}: {err}");
    }
}

#[test]
fn test_effective_config_round_trips_through_file() {
    let config = HarnessConfig {
        max_iterations: 42,
        step_budget: Some(Duration::from_millis(20)),
        ..Default::default()
    };
    let file = config_file(&config.to_toml().unwrap());
    assert_eq!(HarnessConfig::from_file(file.path()).unwrap(), config);
}
