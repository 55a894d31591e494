//! Iteration trace recording for mismatch diagnosis.
//!
//! A fixed-capacity ring buffer keeps the most recent iteration frames. When
//! a scenario fails, the retained frames are attached to the result so the
//! sequence of sensors, outputs and expectations leading up to (and after)
//! a mismatch can be read without re-running.
//!
//! The buffer is allocated when the driver arms its first run; recording
//! never allocates.

use robosim_common::config::DEFAULT_TRACE_DEPTH;
use serde::Serialize;

/// One iteration as seen by the loop driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TraceFrame {
    /// Iteration number (1-indexed).
    pub iteration: u64,
    /// Virtual time of the iteration.
    pub tm: f64,
    /// Digital input presented to the controller.
    pub digital_input: bool,
    /// Joystick Y presented to the controller.
    pub joystick_y: f64,
    /// Motor value at entry to the iteration.
    pub motor_in: f64,
    /// Motor value after the controller call.
    pub motor_out: f64,
    /// Value the motor was checked against in this iteration, if any.
    pub expected: Option<f64>,
    /// Whether the check in this iteration failed.
    pub mismatch: bool,
}

/// Ring buffer of recent [`TraceFrame`]s.
#[derive(Debug, Clone)]
pub struct TraceRecorder {
    frames: Box<[TraceFrame]>,
    write_pos: usize,
    count: usize,
    total_recorded: u64,
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_DEPTH)
    }
}

impl TraceRecorder {
    /// Create a recorder retaining up to `depth` frames; `0` disables it.
    #[must_use]
    pub fn new(depth: usize) -> Self {
        Self {
            frames: vec![TraceFrame::default(); depth].into_boxed_slice(),
            write_pos: 0,
            count: 0,
            total_recorded: 0,
        }
    }

    /// Maximum number of frames retained.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.frames.len()
    }

    /// Frames currently retained.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// True when no frame is retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Frames recorded since the last clear, including overwritten ones.
    #[must_use]
    pub fn total_recorded(&self) -> u64 {
        self.total_recorded
    }

    /// Record a frame, overwriting the oldest when full.
    pub fn record(&mut self, frame: TraceFrame) {
        self.total_recorded += 1;
        if self.frames.is_empty() {
            return;
        }
        self.frames[self.write_pos] = frame;
        self.write_pos = (self.write_pos + 1) % self.frames.len();
        self.count = (self.count + 1).min(self.frames.len());
    }

    /// Retained frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> Vec<TraceFrame> {
        let cap = self.frames.len();
        if cap == 0 {
            return Vec::new();
        }
        let start = (self.write_pos + cap - self.count) % cap;
        (0..self.count)
            .map(|i| self.frames[(start + i) % cap])
            .collect()
    }

    /// Look up a retained frame by iteration number.
    #[must_use]
    pub fn find(&self, iteration: u64) -> Option<TraceFrame> {
        self.frames().into_iter().find(|f| f.iteration == iteration)
    }

    /// Drop all frames.
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.count = 0;
        self.total_recorded = 0;
    }
}
