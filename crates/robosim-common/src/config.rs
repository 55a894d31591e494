//! Configuration structures for the simulation harness.
//!
//! Supports TOML deserialization with defaults that reproduce the reference
//! 25 Hz, 1000-iteration operator-control run.

use crate::error::{SimError, SimResult};
use crate::time::DEFAULT_STEP;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Default iteration cap for one scenario run.
pub const DEFAULT_MAX_ITERATIONS: i64 = 1000;

/// Default fraction of the nominal run length the clock must reach.
pub const DEFAULT_COMPLETION_TOLERANCE: f64 = 0.9;

/// Default number of iteration frames kept by the trace recorder.
pub const DEFAULT_TRACE_DEPTH: usize = 64;

/// Largest accepted `trace_depth` and `metrics.histogram_size`.
pub const MAX_BUFFER_DEPTH: usize = 1_000_000;

/// Identifier of a scenario ("challenge") selected by a controller.
///
/// Any value is representable; ids without a registered oracle resolve to a
/// trivially passing run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub u32);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "challenge-{}", self.0)
    }
}

/// Construction-time configuration of a controller under test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Scenario the controller implements; `None` means no scenario selected.
    pub challenge: Option<ScenarioId>,
}

impl RobotConfig {
    /// Configuration selecting the given scenario.
    #[must_use]
    pub fn challenge(id: u32) -> Self {
        Self {
            challenge: Some(ScenarioId(id)),
        }
    }
}

/// How actuator mismatches are handled by the loop driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FailureMode {
    /// Record every mismatch and keep iterating (full trace).
    #[default]
    Collect,
    /// Stop the run at the first mismatch.
    FailFast,
}

/// When the controller's actuator output is compared against the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LagMode {
    /// The prediction made at iteration n is checked at entry to iteration
    /// n + 1, before the controller runs again.
    #[default]
    PreRegistered,
    /// The prediction made at iteration n is checked right after the
    /// controller call of iteration n.
    SameTick,
}

impl fmt::Display for LagMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreRegistered => write!(f, "pre_registered"),
            Self::SameTick => write!(f, "same_tick"),
        }
    }
}

/// Top-level harness configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Virtual time added per tick.
    pub step: f64,

    /// Iteration cap; must be positive.
    pub max_iterations: i64,

    /// Fraction of `max_iterations * step` the clock must reach at run end.
    pub completion_tolerance: f64,

    /// Mismatch handling.
    pub failure_mode: FailureMode,

    /// Lag comparison reading.
    pub lag_mode: LagMode,

    /// Wall-clock budget for one controller call.
    #[serde(with = "humantime_serde_opt")]
    pub step_budget: Option<Duration>,

    /// Number of iteration frames kept for diagnosis.
    pub trace_depth: usize,

    /// Step metrics configuration.
    pub metrics: MetricsConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            completion_tolerance: DEFAULT_COMPLETION_TOLERANCE,
            failure_mode: FailureMode::default(),
            lag_mode: LagMode::default(),
            step_budget: None,
            trace_depth: DEFAULT_TRACE_DEPTH,
            metrics: MetricsConfig::default(),
        }
    }
}

/// Step metrics configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Enable wall-clock metrics collection.
    pub enabled: bool,

    /// Size of the duration ring buffer.
    pub histogram_size: usize,

    /// Percentiles reported at run end.
    pub percentiles: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            histogram_size: 1024,
            percentiles: vec![50.0, 90.0, 99.0],
        }
    }
}

impl HarnessConfig {
    /// Check the configuration before a run starts.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for a non-positive iteration cap, a
    /// non-positive or non-finite step, a tolerance outside `(0, 1]`, or a
    /// trace or histogram buffer larger than [`MAX_BUFFER_DEPTH`].
    pub fn validate(&self) -> SimResult<()> {
        if self.max_iterations <= 0 {
            return Err(SimError::Config(format!(
                "max_iterations must be positive, got {}",
                self.max_iterations
            )));
        }
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(SimError::Config(format!(
                "step must be a positive finite number, got {}",
                self.step
            )));
        }
        if !(self.completion_tolerance > 0.0 && self.completion_tolerance <= 1.0) {
            return Err(SimError::Config(format!(
                "completion_tolerance must be in (0, 1], got {}",
                self.completion_tolerance
            )));
        }
        if self.trace_depth > MAX_BUFFER_DEPTH {
            return Err(SimError::Config(format!(
                "trace_depth must be at most {MAX_BUFFER_DEPTH}, got {}",
                self.trace_depth
            )));
        }
        if self.metrics.histogram_size > MAX_BUFFER_DEPTH {
            return Err(SimError::Config(format!(
                "metrics.histogram_size must be at most {MAX_BUFFER_DEPTH}, got {}",
                self.metrics.histogram_size
            )));
        }
        Ok(())
    }

    /// Iteration cap as an unsigned count, after validation.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the configuration is invalid.
    pub fn iteration_cap(&self) -> SimResult<u64> {
        self.validate()?;
        u64::try_from(self.max_iterations)
            .map_err(|_| SimError::Config(format!("invalid max_iterations {}", self.max_iterations)))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    /// Serialize configuration to TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Serde helper module for `Option<Duration>` using humantime format.
mod humantime_serde_opt {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_str(&humantime::format_duration(*d).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
