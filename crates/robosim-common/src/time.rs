//! Virtual time for deterministic simulation.
//!
//! Simulation time is a plain `f64` in abstract time-units (seconds for a
//! 25 Hz robot loop). The clock never reads the host clock: it only moves
//! when the loop driver advances it, one fixed step per tick.

/// Default step between ticks (25 Hz control loop).
pub const DEFAULT_STEP: f64 = 0.04;

/// Nanoseconds per virtual time-unit.
pub const NANOS_PER_UNIT: f64 = 1_000_000_000.0;

/// Integer virtual time in nanoseconds, used by function blocks.
pub type Time = i64;

/// Convert a virtual timestamp to integer nanoseconds.
///
/// Rounds to the nearest nanosecond so that tick timestamps such as
/// `226 * 0.04` map onto exact integers.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn to_time(tm: f64) -> Time {
    (tm * NANOS_PER_UNIT).round() as Time
}

/// Convert a duration in time-units to integer nanoseconds.
#[must_use]
pub fn units(value: f64) -> Time {
    to_time(value)
}

/// Monotonic virtual clock owned by a single scenario run.
///
/// The current time is always derived as `ticks * step` rather than
/// accumulated, so after `n` advances it is exactly `n as f64 * step`.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualClock {
    ticks: u64,
    step: f64,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}

impl VirtualClock {
    /// Create a clock at time zero with the given step.
    #[must_use]
    pub fn new(step: f64) -> Self {
        Self { ticks: 0, step }
    }

    /// Advance by one step and return the new time.
    pub fn advance(&mut self) -> f64 {
        self.ticks += 1;
        self.time()
    }

    /// Current virtual time.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn time(&self) -> f64 {
        self.ticks as f64 * self.step
    }

    /// Number of advances so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Configured step.
    #[must_use]
    pub fn step(&self) -> f64 {
        self.step
    }
}
