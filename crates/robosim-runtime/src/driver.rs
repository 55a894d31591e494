//! Deterministic virtual-time loop driver.
//!
//! The driver runs the operator-control loop of one controller against one
//! oracle. Every iteration executes the same steps to completion, in order:
//!
//! 1. Advance the virtual clock
//! 2. Ask the oracle for this tick's sensors and expected actuator value
//! 3. Present the sensors on the IO stub
//! 4. Check the motor against the prediction registered on the previous
//!    iteration ([`LagMode::PreRegistered`])
//! 5. Call the controller
//! 6. Register this tick's prediction for the next check (or check it right
//!    away under [`LagMode::SameTick`])
//!
//! The loop ends at the iteration cap or when the controller asks to stop.
//! Mismatches are recorded, not raised; controller errors and overruns of
//! the wall-clock budget abort the run.

use crate::controller::{Controller, Mode};
use crate::io_stub::IoStub;
use crate::oracle::{Oracle, SensorReading};
use crate::recorder::{TraceFrame, TraceRecorder};
use crate::result::{Mismatch, RunFinding, ScenarioResult};
use robosim_common::config::{FailureMode, HarnessConfig, LagMode, ScenarioId};
use robosim_common::error::{SimError, SimResult};
use robosim_common::metrics::{MetricsSnapshot, StepMetrics};
use robosim_common::state::{RunState, RunStateMachine};
use robosim_common::time::VirtualClock;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};

/// What the loop does after an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    /// The controller asked to stop.
    ControllerStop,
    /// A mismatch was found in fail-fast mode.
    FailFast,
}

/// Runs scenario loops. One driver may run many scenarios in sequence; every
/// run starts from a fresh clock, lag buffer and trace.
#[derive(Debug)]
pub struct LoopDriver {
    config: HarnessConfig,
    clock: VirtualClock,
    state: RunStateMachine,
    /// Prediction registered on the previous iteration.
    lag: Option<f64>,
    metrics: StepMetrics,
    recorder: TraceRecorder,
}

impl LoopDriver {
    /// Create a driver with the given configuration.
    ///
    /// The configuration is validated when a run starts, so an invalid
    /// iteration cap errors that run without executing any iteration. Trace
    /// and metrics buffers are sized only after validation.
    #[must_use]
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            clock: VirtualClock::new(config.step),
            metrics: StepMetrics::new(0, config.step_budget),
            recorder: TraceRecorder::new(0),
            config,
            state: RunStateMachine::new(),
            lag: None,
        }
    }

    /// Create a driver with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(HarnessConfig::default())
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Clock of the current or most recent run.
    #[must_use]
    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    /// Lifecycle state of the current or most recent run.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state.state()
    }

    /// Trace of the current or most recent run.
    #[must_use]
    pub fn recorder(&self) -> &TraceRecorder {
        &self.recorder
    }

    /// Wall-clock metrics of the most recent run, if collection is enabled.
    #[must_use]
    pub fn metrics(&self) -> Option<MetricsSnapshot> {
        self.config
            .metrics
            .enabled
            .then(|| self.metrics.snapshot(&self.config.metrics.percentiles))
    }

    /// Run one scenario to completion.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for an invalid configuration (no
    /// iteration runs), any error the controller returns, and
    /// [`SimError::ControllerOverrun`] when a call exceeds the step budget.
    pub fn run<C, O>(
        &mut self,
        scenario: Option<ScenarioId>,
        controller: &mut C,
        oracle: &mut O,
        io: &mut IoStub,
    ) -> SimResult<ScenarioResult>
    where
        C: Controller + ?Sized,
        O: Oracle + ?Sized,
    {
        let cap = self.arm()?;
        oracle.reset();

        info!(
            scenario = ?scenario,
            oracle = oracle.name(),
            max_iterations = cap,
            step = self.config.step,
            lag_mode = %self.config.lag_mode,
            "Starting scenario run"
        );

        self.state.transition(RunState::Running)?;
        let mut result = ScenarioResult::new(scenario, oracle.name(), self.config.lag_mode);

        let mut flow = Flow::Continue;
        for iteration in 1..=cap {
            flow = match self.run_iteration(iteration, controller, oracle, io, &mut result) {
                Ok(flow) => flow,
                Err(e) => {
                    error!(iteration, mode = %Mode::OperatorControl, error = %e, "Scenario run aborted");
                    self.state.transition(RunState::Errored)?;
                    return Err(e);
                }
            };
            if flow != Flow::Continue {
                break;
            }
        }

        result.iterations_run = self.clock.ticks();
        result.final_time = self.clock.time();

        if flow != Flow::FailFast {
            self.check_completion(cap, &mut result);
        }

        let verdict = if result.passed() {
            RunState::Passed
        } else {
            result.trace = self.recorder.frames();
            RunState::Failed
        };
        self.state.transition(verdict)?;

        info!(
            scenario = ?scenario,
            iterations = result.iterations_run,
            failures = result.failures.len(),
            findings = result.findings.len(),
            state = %verdict,
            "Scenario run finished"
        );

        Ok(result)
    }

    /// Validate configuration and reset per-run state.
    fn arm(&mut self) -> SimResult<u64> {
        self.state.reset();
        self.state.transition(RunState::Armed)?;

        let cap = match self.config.iteration_cap() {
            Ok(cap) => cap,
            Err(e) => {
                error!(error = %e, "Invalid harness configuration");
                self.state.transition(RunState::Errored)?;
                return Err(e);
            }
        };

        self.clock = VirtualClock::new(self.config.step);
        self.lag = None;
        self.size_buffers();

        debug!(max_iterations = cap, "Driver armed");
        Ok(cap)
    }

    /// Allocate the trace and metrics buffers for the validated
    /// configuration, or clear them when already sized.
    fn size_buffers(&mut self) {
        let depth = self.config.trace_depth;
        if self.recorder.capacity() == depth {
            self.recorder.clear();
        } else {
            self.recorder = TraceRecorder::new(depth);
        }

        let histogram = self.config.metrics.histogram_size.max(1);
        if self.metrics.capacity() == histogram {
            self.metrics.reset();
        } else {
            self.metrics = StepMetrics::new(histogram, self.config.step_budget);
        }
    }

    /// Execute one iteration.
    fn run_iteration<C, O>(
        &mut self,
        iteration: u64,
        controller: &mut C,
        oracle: &mut O,
        io: &mut IoStub,
        result: &mut ScenarioResult,
    ) -> SimResult<Flow>
    where
        C: Controller + ?Sized,
        O: Oracle + ?Sized,
    {
        // 1. Advance the clock
        let tm = self.clock.advance();

        // 2-3. Oracle prediction and sensor presentation
        let prediction = oracle.predict(tm, SensorReading::from(&*io));
        prediction.sensors.apply(io);

        let mut frame = TraceFrame {
            iteration,
            tm,
            digital_input: io.digital_input,
            joystick_y: io.joystick_y,
            motor_in: io.motor,
            ..Default::default()
        };

        // 4. Lagged check against the previous iteration's prediction
        let mut mismatched = false;
        if self.config.lag_mode == LagMode::PreRegistered {
            if let Some(expected) = self.lag {
                frame.expected = Some(expected);
                mismatched = check(iteration, tm, expected, io.motor, result);
            }
        }

        if mismatched && self.config.failure_mode == FailureMode::FailFast {
            frame.mismatch = true;
            frame.motor_out = io.motor;
            self.recorder.record(frame);
            return Ok(Flow::FailFast);
        }

        // 5. Controller call
        let started = Instant::now();
        let keep_going = controller.operator_control(tm, io)?;
        let elapsed = started.elapsed();
        self.observe_call(iteration, elapsed)?;

        // 6. Register (or check) this tick's prediction
        if self.config.lag_mode == LagMode::SameTick {
            frame.expected = Some(prediction.actuator);
            mismatched = check(iteration, tm, prediction.actuator, io.motor, result);
        }
        self.lag = Some(prediction.actuator);

        frame.motor_out = io.motor;
        frame.mismatch = mismatched;
        self.recorder.record(frame);

        trace!(
            iteration,
            tm,
            motor = io.motor,
            predicted = prediction.actuator,
            "Iteration complete"
        );

        if mismatched && self.config.failure_mode == FailureMode::FailFast {
            return Ok(Flow::FailFast);
        }
        if !keep_going {
            debug!(iteration, tm, "Controller requested stop");
            return Ok(Flow::ControllerStop);
        }
        Ok(Flow::Continue)
    }

    /// Record the wall-clock duration of a controller call and enforce the budget.
    fn observe_call(&mut self, iteration: u64, elapsed: Duration) -> SimResult<()> {
        if self.config.metrics.enabled {
            self.metrics.record(elapsed);
        }

        if let Some(budget) = self.config.step_budget {
            if elapsed > budget {
                return Err(SimError::ControllerOverrun {
                    iteration,
                    budget_ns: u64::try_from(budget.as_nanos()).unwrap_or(u64::MAX),
                    actual_ns: u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX),
                });
            }
        }
        Ok(())
    }

    /// End-of-run assertions on iteration count and clock progress.
    #[allow(clippy::cast_precision_loss)]
    fn check_completion(&self, cap: u64, result: &mut ScenarioResult) {
        if result.iterations_run != cap {
            result.findings.push(RunFinding::ShortRun {
                expected: cap,
                actual: result.iterations_run,
            });
        }

        let required = self.config.completion_tolerance * cap as f64 * self.config.step;
        if self.clock.time() < required {
            result.findings.push(RunFinding::ClockBehind {
                required,
                actual: self.clock.time(),
            });
        }

        for finding in &result.findings {
            warn!(%finding, "Run completion check failed");
        }
    }
}

/// Compare the committed motor value against an expectation; exact equality.
fn check(iteration: u64, tm: f64, expected: f64, actual: f64, result: &mut ScenarioResult) -> bool {
    #[allow(clippy::float_cmp)]
    let matches = actual == expected;
    if !matches {
        warn!(iteration, tm, expected, actual, "Actuator mismatch");
        result.failures.push(Mismatch {
            iteration,
            tm,
            expected,
            actual,
        });
    }
    !matches
}

/// Builder for configuring the driver.
#[derive(Debug, Default)]
pub struct LoopDriverBuilder {
    config: HarnessConfig,
}

impl LoopDriverBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the iteration cap.
    #[must_use]
    pub fn max_iterations(mut self, max: i64) -> Self {
        self.config.max_iterations = max;
        self
    }

    /// Set the virtual time step.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.config.step = step;
        self
    }

    /// Set the mismatch handling mode.
    #[must_use]
    pub fn failure_mode(mut self, mode: FailureMode) -> Self {
        self.config.failure_mode = mode;
        self
    }

    /// Set the lag reading.
    #[must_use]
    pub fn lag_mode(mut self, mode: LagMode) -> Self {
        self.config.lag_mode = mode;
        self
    }

    /// Set the wall-clock budget per controller call.
    #[must_use]
    pub fn step_budget(mut self, budget: Duration) -> Self {
        self.config.step_budget = Some(budget);
        self
    }

    /// Set the trace depth.
    #[must_use]
    pub fn trace_depth(mut self, depth: usize) -> Self {
        self.config.trace_depth = depth;
        self
    }

    /// Replace the full configuration.
    #[must_use]
    pub fn config(mut self, config: HarnessConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the driver.
    #[must_use]
    pub fn build(self) -> LoopDriver {
        LoopDriver::new(self.config)
    }
}
