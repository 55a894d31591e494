//! Scenario runner - wires a controller to its challenge oracle.
//!
//! For every run the runner:
//!
//! 1. Calls the controller's autonomous and disabled entry points once as
//!    smoke checks
//! 2. Looks up the oracle from the controller's [`RobotConfig`]
//! 3. Drives the operator-control loop on a fresh IO stub
//!
//! A controller without a registered scenario passes trivially after the
//! smoke checks.

use crate::robot::reference_controller;
use crate::scenarios::lookup;
use robosim_common::config::{HarnessConfig, RobotConfig, ScenarioId};
use robosim_common::error::SimResult;
use robosim_common::metrics::MetricsSnapshot;
use robosim_runtime::controller::{Controller, Mode};
use robosim_runtime::driver::LoopDriver;
use robosim_runtime::io_stub::IoStub;
use robosim_runtime::result::ScenarioResult;
use serde::Serialize;
use tracing::{debug, info};

/// Scenario result together with the wall-clock metrics of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    /// Outcome of the run.
    pub result: ScenarioResult,
    /// Controller call timings; `None` when metrics are disabled or the
    /// loop never ran.
    pub metrics: Option<MetricsSnapshot>,
}

/// Runs scenarios with a shared harness configuration.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: HarnessConfig,
}

impl ScenarioRunner {
    /// Creates a runner with the given configuration.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Harness configuration used for every run.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Runs scenario `id` against a fresh reference controller.
    ///
    /// # Errors
    ///
    /// Returns any fatal error of the run (see [`ScenarioRunner::run_controller`]).
    pub fn run(&self, id: ScenarioId) -> SimResult<ScenarioResult> {
        let mut controller = reference_controller(RobotConfig {
            challenge: Some(id),
        });
        self.run_controller(&mut controller)
    }

    /// Runs the scenario selected by `controller`.
    ///
    /// # Errors
    ///
    /// Returns the controller's error if a smoke check or loop iteration
    /// fails, and configuration or overrun errors from the loop driver.
    pub fn run_controller<C: Controller + ?Sized>(
        &self,
        controller: &mut C,
    ) -> SimResult<ScenarioResult> {
        self.run_detailed(controller).map(|report| report.result)
    }

    /// Runs the scenario selected by `controller` and keeps the metrics.
    ///
    /// # Errors
    ///
    /// Same as [`ScenarioRunner::run_controller`].
    pub fn run_detailed<C: Controller + ?Sized>(&self, controller: &mut C) -> SimResult<RunReport> {
        let scenario = controller.config().challenge;

        smoke_check(controller)?;

        let Some(entry) = scenario.and_then(lookup) else {
            info!(scenario = ?scenario, "No oracle registered, passing trivially");
            return Ok(RunReport {
                result: ScenarioResult::trivial_pass(scenario, self.config.lag_mode),
                metrics: None,
            });
        };

        debug!(scenario = %entry.id, name = entry.name, "Wiring scenario");

        let mut oracle = entry.oracle();
        let mut io = IoStub::new();
        let mut driver = LoopDriver::new(self.config.clone());
        let result = driver.run(scenario, controller, &mut oracle, &mut io)?;

        Ok(RunReport {
            result,
            metrics: driver.metrics(),
        })
    }
}

/// Autonomous and disabled entry points must be callable without error.
fn smoke_check<C: Controller + ?Sized>(controller: &mut C) -> SimResult<()> {
    let mut io = IoStub::new();
    controller.autonomous(&mut io)?;
    debug!(mode = %Mode::Autonomous, "Smoke check passed");
    controller.disabled(&mut io)?;
    debug!(mode = %Mode::Disabled, "Smoke check passed");
    Ok(())
}
