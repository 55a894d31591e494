//! Run summaries for the terminal and for machines.

use robosim_common::config::ScenarioId;
use robosim_common::error::SimError;
use robosim_common::metrics::MetricsSnapshot;
use robosim_runtime::result::{ScenarioResult, Verdict};
use robosim_scenarios::RunReport;
use serde::Serialize;
use std::fmt::Write as _;

/// Outcome of one scenario as reported by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// Scenario that was requested.
    pub scenario: ScenarioId,
    /// Three-way verdict.
    pub verdict: Verdict,
    /// Result of a completed run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ScenarioResult>,
    /// Fatal error of an aborted run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Controller call timings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsSnapshot>,
}

impl Outcome {
    /// Classify the outcome of a run.
    pub fn new(scenario: ScenarioId, outcome: Result<RunReport, SimError>) -> Self {
        let (outcome, metrics) = match outcome {
            Ok(report) => (Ok(report.result), report.metrics),
            Err(e) => (Err(e), None),
        };
        let verdict = Verdict::of(&outcome);
        let (result, error) = match outcome {
            Ok(result) => (Some(result), None),
            Err(e) => (None, Some(e.to_string())),
        };

        Self {
            scenario,
            verdict,
            result,
            error,
            metrics,
        }
    }
}

/// All outcomes of one CLI invocation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Outcomes in run order.
    pub outcomes: Vec<Outcome>,
    /// Scenarios that passed.
    pub passed: usize,
    /// Scenarios that failed.
    pub failed: usize,
    /// Scenarios that errored.
    pub errored: usize,
}

impl Summary {
    /// Add an outcome.
    pub fn push(&mut self, outcome: Outcome) {
        match outcome.verdict {
            Verdict::Pass => self.passed += 1,
            Verdict::Fail => self.failed += 1,
            Verdict::Error => self.errored += 1,
        }
        self.outcomes.push(outcome);
    }

    /// True when every scenario passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }

    /// Human-readable report.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for outcome in &self.outcomes {
            match (&outcome.result, &outcome.error) {
                (Some(result), _) => {
                    let _ = write!(out, "{result}");
                    if let Some(metrics) = &outcome.metrics {
                        let _ = writeln!(out, "  {}", format_metrics(metrics));
                    }
                }
                (None, Some(error)) => {
                    let _ = writeln!(out, "{}: ERROR {error}", outcome.scenario);
                }
                (None, None) => {}
            }
        }

        let _ = writeln!(
            out,
            "\n{} passed, {} failed, {} errored",
            self.passed, self.failed, self.errored
        );
        out
    }

    /// JSON report.
    pub fn render_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_metrics(metrics: &MetricsSnapshot) -> String {
    let us = |ns: Option<u64>| ns.map_or(0.0, |ns| ns as f64 / 1000.0);
    let mut line = format!(
        "controller calls: {} (min {:.1}us, mean {:.1}us, max {:.1}us",
        metrics.total_steps,
        us(metrics.min_ns),
        us(metrics.mean_ns),
        us(metrics.max_ns)
    );
    for (p, ns) in &metrics.percentiles_ns {
        let _ = write!(line, ", p{p} {:.1}us", us(Some(*ns)));
    }
    if metrics.over_budget > 0 {
        let _ = write!(line, ", {} over budget", metrics.over_budget);
    }
    line.push(')');
    line
}
