use thiserror::Error;

/// Fatal harness errors.
///
/// A `SimError` aborts the scenario run it occurs in. Actuator mismatches are
/// not errors; they are recorded in the scenario result and the run continues.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    /// Configuration or wiring error, detected before any iteration runs.
    #[error("configuration error: {0}")]
    Config(String),

    /// The controller returned an error from one of its mode entry points.
    #[error("controller fault in {mode}: {reason}")]
    ControllerFault {
        /// Entry point that failed (`autonomous`, `disabled`, `operator_control`).
        mode: String,
        /// Error reported by the controller.
        reason: String,
    },

    /// A single controller call exceeded the configured wall-clock budget.
    #[error("controller overrun at iteration {iteration}: budget {budget_ns}ns, actual {actual_ns}ns")]
    ControllerOverrun {
        /// Iteration in which the overrun happened (1-indexed).
        iteration: u64,
        /// Configured budget in nanoseconds.
        budget_ns: u64,
        /// Measured call duration in nanoseconds.
        actual_ns: u64,
    },

    /// An IO stub field was addressed by a name that does not exist.
    #[error("unknown IO field: {0}")]
    UnknownField(String),

    /// A value of the wrong type was written to an IO stub field.
    #[error("type mismatch on IO field {field}: expected {expected}")]
    FieldType {
        /// Field that was written.
        field: String,
        /// Declared type of the field.
        expected: String,
    },

    /// Invalid run lifecycle transition attempted.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Source state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

impl SimError {
    /// Build a [`SimError::ControllerFault`] for the given entry point.
    pub fn controller_fault(mode: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ControllerFault {
            mode: mode.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for harness operations.
pub type SimResult<T> = Result<T, SimError>;
