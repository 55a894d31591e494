//! Timestamp-driven timer blocks.
//!
//! Unlike delta-accumulating PLC timers, these blocks take the absolute
//! virtual timestamp of the current iteration. Elapsed time is measured from
//! the iteration on which the block started, so a timer started at tick `t0`
//! reports exactly `now - t0` regardless of how many iterations ran between.
//!
//! - [`Ton`] - On-delay: Q goes TRUE once IN has been TRUE for PT
//! - [`Tp`] - Pulse: Q is TRUE for PT after a rising edge on IN
//!
//! All values are [`Time`] (integer nanoseconds of virtual time).

use robosim_common::time::Time;
use serde::{Deserialize, Serialize};

/// Timer On-Delay (TON), used to debounce digital inputs.
///
/// The timer starts on the iteration where IN becomes TRUE (ET = 0 there)
/// and Q goes TRUE on the first iteration where `now - start >= PT`.
/// Q and ET drop to zero as soon as IN is FALSE.
///
/// ```text
///       +------+     +---------------+
/// IN    |      |     |               |
///    ---+      +-----+               +----
///                          +---------+
/// Q                        |         |
///    ----------------------+         +----
///                    |<-PT->|
/// ```
///
/// # Example
///
/// ```
/// use robosim_stdlib::timers::Ton;
///
/// let mut ton = Ton::new();
/// let pt = 1_000_000_000;
///
/// assert!(!ton.call(true, pt, 3_000_000_000)); // starts timing
/// assert!(!ton.call(true, pt, 3_960_000_000));
/// assert!(ton.call(true, pt, 4_000_000_000)); // held for PT
/// assert!(!ton.call(false, pt, 4_040_000_000)); // released
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ton {
    q: bool,
    et: Time,
    /// Timestamp of the iteration on which IN rose.
    start: Time,
    prev_in: bool,
}

impl Ton {
    /// Create a new TON timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one iteration and return Q.
    ///
    /// * `input` - IN, timing runs while TRUE.
    /// * `pt` - preset time.
    /// * `now` - timestamp of this iteration.
    pub fn call(&mut self, input: bool, pt: Time, now: Time) -> bool {
        if input {
            if !self.prev_in {
                self.start = now;
            }
            self.et = (now - self.start).clamp(0, pt);
            self.q = self.et >= pt;
        } else {
            self.q = false;
            self.et = 0;
        }

        self.prev_in = input;
        self.q
    }

    /// Get current Q output.
    #[must_use]
    pub fn q(&self) -> bool {
        self.q
    }

    /// Get current elapsed time (capped at PT).
    #[must_use]
    pub fn et(&self) -> Time {
        self.et
    }

    /// Reset the timer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Timer Pulse (TP), used for fixed-length drive phases.
///
/// A rising edge on IN while idle starts a pulse; Q stays TRUE for
/// iterations with `now - start < PT` and the pulse cannot be retriggered
/// while it runs. IN must fall and rise again to start the next pulse.
///
/// # Example
///
/// ```
/// use robosim_stdlib::timers::Tp;
///
/// let mut tp = Tp::new();
/// let pt = 3_000_000_000;
///
/// assert!(tp.call(true, pt, 4_040_000_000)); // pulse starts
/// assert!(tp.call(false, pt, 7_000_000_000)); // input ignored while running
/// assert!(!tp.call(false, pt, 7_040_000_000)); // PT elapsed
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tp {
    q: bool,
    et: Time,
    start: Time,
    prev_in: bool,
    running: bool,
}

impl Tp {
    /// Create a new TP timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one iteration and return Q.
    ///
    /// * `input` - IN trigger, only its rising edge matters.
    /// * `pt` - pulse length.
    /// * `now` - timestamp of this iteration.
    pub fn call(&mut self, input: bool, pt: Time, now: Time) -> bool {
        if input && !self.prev_in && !self.running {
            self.running = true;
            self.start = now;
        }

        if self.running {
            self.et = (now - self.start).clamp(0, pt);
            if self.et >= pt {
                self.running = false;
                self.et = 0;
            }
        }

        self.q = self.running;
        self.prev_in = input;
        self.q
    }

    /// Get current Q output.
    #[must_use]
    pub fn q(&self) -> bool {
        self.q
    }

    /// Get current elapsed time of the running pulse.
    #[must_use]
    pub fn et(&self) -> Time {
        self.et
    }

    /// Check if pulse is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reset the timer.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
