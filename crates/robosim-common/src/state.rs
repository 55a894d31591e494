//! Run lifecycle state machine for a scenario run.
//!
//! State transitions follow the harness lifecycle:
//! IDLE → ARMED → RUNNING → PASSED | FAILED | ERRORED
//!
//! Configuration errors move ARMED straight to ERRORED; every terminal
//! state may return to IDLE so a driver can be reused.

use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Lifecycle states of one scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunState {
    /// No run in progress.
    #[default]
    Idle,
    /// Configuration validated, clock and IO reset.
    Armed,
    /// Iterations are executing.
    Running,
    /// Run completed without mismatches or findings.
    Passed,
    /// Run completed with at least one mismatch or finding.
    Failed,
    /// Run aborted by a fatal error.
    Errored,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Armed => write!(f, "ARMED"),
            Self::Running => write!(f, "RUNNING"),
            Self::Passed => write!(f, "PASSED"),
            Self::Failed => write!(f, "FAILED"),
            Self::Errored => write!(f, "ERRORED"),
        }
    }
}

impl RunState {
    /// Check if a transition to `target` is valid from the current state.
    #[must_use]
    pub fn can_transition_to(&self, target: RunState) -> bool {
        use RunState::{Armed, Errored, Failed, Idle, Passed, Running};

        matches!(
            (self, target),
            (Idle, Armed)
                | (Armed, Running)
                // Invalid configuration is detected while arming
                | (Armed, Errored)
                | (Running, Passed)
                | (Running, Failed)
                | (Running, Errored)
                | (Passed | Failed | Errored, Idle)
        )
    }

    /// Returns true once the run has reached a verdict.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Passed | Self::Failed | Self::Errored)
    }
}

/// State machine wrapper with transition history tracking.
#[derive(Debug, Clone, Default)]
pub struct RunStateMachine {
    current: RunState,
    previous: Option<RunState>,
    transition_count: u64,
}

impl RunStateMachine {
    /// Create a new state machine starting in IDLE.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.current
    }

    /// Get the previous state (if any transition occurred).
    #[must_use]
    pub fn previous_state(&self) -> Option<RunState> {
        self.previous
    }

    /// Get total number of transitions.
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    /// Attempt a state transition.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidStateTransition`] if the lifecycle does not
    /// allow moving from the current state to `target`.
    pub fn transition(&mut self, target: RunState) -> SimResult<()> {
        if !self.current.can_transition_to(target) {
            return Err(SimError::InvalidStateTransition {
                from: self.current.to_string(),
                to: target.to_string(),
            });
        }
        trace!(from = %self.current, to = %target, "run state transition");
        self.previous = Some(self.current);
        self.current = target;
        self.transition_count += 1;
        Ok(())
    }

    /// Return to IDLE from a terminal state; no-op when already idle.
    pub fn reset(&mut self) {
        if self.current.is_terminal() {
            self.previous = Some(self.current);
            self.current = RunState::Idle;
            self.transition_count += 1;
        }
    }
}
