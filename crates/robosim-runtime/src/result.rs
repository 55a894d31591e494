//! Scenario results and verdicts.

use crate::recorder::TraceFrame;
use robosim_common::config::{LagMode, ScenarioId};
use robosim_common::error::SimError;
use serde::Serialize;
use std::fmt;

/// One actuator check that failed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mismatch {
    /// Iteration in which the check ran (1-indexed).
    pub iteration: u64,
    /// Virtual time of that iteration.
    pub tm: f64,
    /// Value predicted by the oracle.
    pub expected: f64,
    /// Motor value committed by the controller.
    pub actual: f64,
}

/// End-of-run condition that fails a scenario without a specific mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFinding {
    /// The controller stopped before the iteration cap.
    ShortRun {
        /// Iterations the run was configured for.
        expected: u64,
        /// Iterations that ran.
        actual: u64,
    },
    /// The clock ended below the completion tolerance.
    ClockBehind {
        /// Minimum final time required.
        required: f64,
        /// Final clock time.
        actual: f64,
    },
}

impl fmt::Display for RunFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRun { expected, actual } => {
                write!(f, "controller stopped after {actual} of {expected} iterations")
            }
            Self::ClockBehind { required, actual } => {
                write!(f, "clock ended at {actual:.3}, required at least {required:.3}")
            }
        }
    }
}

/// Outcome of one scenario run that did not error.
///
/// Immutable once returned by the driver. Two runs of the same scenario from
/// fresh state compare equal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioResult {
    /// Scenario that selected the oracle, if any.
    pub scenario: Option<ScenarioId>,
    /// Oracle name (`"none"` for a trivially passing run).
    pub oracle: String,
    /// Lag reading used for the checks.
    pub lag_mode: LagMode,
    /// Iterations executed.
    pub iterations_run: u64,
    /// Final virtual time.
    pub final_time: f64,
    /// Failed checks, in iteration order.
    pub failures: Vec<Mismatch>,
    /// End-of-run findings.
    pub findings: Vec<RunFinding>,
    /// Recent iteration frames, attached when the run failed.
    pub trace: Vec<TraceFrame>,
}

impl ScenarioResult {
    /// Empty result for a run about to start.
    #[must_use]
    pub fn new(scenario: Option<ScenarioId>, oracle: &str, lag_mode: LagMode) -> Self {
        Self {
            scenario,
            oracle: oracle.to_string(),
            lag_mode,
            iterations_run: 0,
            final_time: 0.0,
            failures: Vec::new(),
            findings: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// Result of a scenario without a registered oracle.
    #[must_use]
    pub fn trivial_pass(scenario: Option<ScenarioId>, lag_mode: LagMode) -> Self {
        Self::new(scenario, "none", lag_mode)
    }

    /// True when no check failed and no finding was raised.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty() && self.findings.is_empty()
    }

    /// First failed check, if any.
    #[must_use]
    pub fn first_failure(&self) -> Option<&Mismatch> {
        self.failures.first()
    }

    /// Serialize the result as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self
            .scenario
            .map_or_else(|| "no scenario".to_string(), |id| id.to_string());
        let verdict = if self.passed() { "PASS" } else { "FAIL" };
        writeln!(
            f,
            "{name} ({}): {verdict} after {} iterations (t={:.2}, lag={})",
            self.oracle, self.iterations_run, self.final_time, self.lag_mode
        )?;

        if !self.failures.is_empty() {
            writeln!(f, "  {:>9}  {:>8}  {:>10}  {:>10}", "iteration", "tm", "expected", "actual")?;
            for m in &self.failures {
                writeln!(
                    f,
                    "  {:>9}  {:>8.2}  {:>10.4}  {:>10.4}",
                    m.iteration, m.tm, m.expected, m.actual
                )?;
            }
        }
        for finding in &self.findings {
            writeln!(f, "  {finding}")?;
        }
        Ok(())
    }
}

/// Three-way verdict surfaced to a test framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// All checks passed.
    Pass,
    /// The run completed with mismatches or findings.
    Fail,
    /// The run aborted with a fatal error.
    Error,
}

impl Verdict {
    /// Classify a run outcome.
    #[must_use]
    pub fn of(outcome: &Result<ScenarioResult, SimError>) -> Self {
        match outcome {
            Ok(result) if result.passed() => Self::Pass,
            Ok(_) => Self::Fail,
            Err(_) => Self::Error,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}
