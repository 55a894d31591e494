//! Oracle variants for the challenge scenarios.

use crate::sequence::phase_at;
use robosim_runtime::oracle::{Oracle, Prediction, SensorFrame, SensorReading};

/// Joystick waveform shared by the mirror, gate and sequence challenges.
///
/// A sawtooth from `-1.0` up to `1.0` with a period of 2 time-units.
#[must_use]
pub fn joystick_wave(tm: f64) -> f64 {
    (tm % 2.0) - 1.0
}

/// Digital input level of the gate challenge.
#[must_use]
pub fn gate_open(tm: f64) -> bool {
    tm % 2.0 < 0.5
}

/// Reference model for one challenge.
///
/// Every variant is a pure function of virtual time. The joystick value a
/// controller must echo one iteration later is held by the loop driver's
/// lag buffer, not by the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeOracle {
    /// Motor must be `1.0` at all times.
    Direct,
    /// Motor must follow the joystick.
    Mirror,
    /// Motor follows the joystick while the digital input is high.
    Gate,
    /// Debounced trigger with forward and backward drive phases.
    TimedSequence,
}

impl ChallengeOracle {
    /// Direct-drive oracle.
    #[must_use]
    pub fn direct() -> Self {
        Self::Direct
    }

    /// Joystick-mirror oracle.
    #[must_use]
    pub fn mirror() -> Self {
        Self::Mirror
    }

    /// Gated-mirror oracle.
    #[must_use]
    pub fn gate() -> Self {
        Self::Gate
    }

    /// Timed-sequence oracle.
    #[must_use]
    pub fn timed_sequence() -> Self {
        Self::TimedSequence
    }
}

impl Oracle for ChallengeOracle {
    fn name(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Mirror => "mirror",
            Self::Gate => "gate",
            Self::TimedSequence => "timed_sequence",
        }
    }

    fn predict(&mut self, tm: f64, _prior: SensorReading) -> Prediction {
        let stick = joystick_wave(tm);

        match self {
            Self::Direct => Prediction {
                sensors: SensorFrame::default(),
                actuator: 1.0,
            },
            Self::Mirror => Prediction {
                sensors: SensorFrame {
                    digital_input: None,
                    joystick_y: Some(stick),
                },
                actuator: stick,
            },
            Self::Gate => {
                let open = gate_open(tm);
                Prediction {
                    sensors: SensorFrame {
                        digital_input: Some(open),
                        joystick_y: Some(stick),
                    },
                    actuator: if open { stick } else { 0.0 },
                }
            }
            Self::TimedSequence => {
                let phase = phase_at(tm);
                Prediction {
                    sensors: SensorFrame {
                        digital_input: Some(phase.digital_input),
                        joystick_y: Some(stick),
                    },
                    actuator: phase.drive.actuator(stick),
                }
            }
        }
    }
}
