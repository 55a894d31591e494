//! Phase table of the timed-sequence challenge.
//!
//! The table is keyed on absolute virtual time. Each phase covers
//! `[start, next.start)`; a tick landing exactly on a boundary belongs to the
//! later phase.
//!
//! ```text
//!  t:    0    1  1.5    3  4.01  5    6  7.01     9.04 9.9   15 15.9
//!  DI:   ____####_______##########____#####__________####_____####______
//!  drive: passthrough        |   forward (1.0)  |backward| passthrough
//! ```
//!
//! The pulse on `[1, 1.5)` is shorter than the debounce threshold and must
//! be ignored. The pulse from 3 qualifies at 4.01 and starts a forward drive
//! that ignores both the joystick and the input dropping at 5. Backward drive
//! follows from 7.01 until 9.04. The pulses at 9.04 and 15 are again too
//! short to trigger.

use serde::Serialize;

/// What the motor must do during a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    /// Motor follows the joystick.
    Passthrough,
    /// Motor pinned to `1.0`.
    Forward,
    /// Motor pinned to `-1.0`.
    Backward,
}

impl Drive {
    /// Actuator value for this drive given the live joystick value.
    #[must_use]
    pub fn actuator(self, joystick: f64) -> f64 {
        match self {
            Self::Passthrough => joystick,
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// One row of the phase table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Phase {
    /// Inclusive start time.
    pub start: f64,
    /// Digital input level presented during the phase.
    pub digital_input: bool,
    /// Expected motor behavior.
    pub drive: Drive,
}

const fn phase(start: f64, digital_input: bool, drive: Drive) -> Phase {
    Phase {
        start,
        digital_input,
        drive,
    }
}

/// Phases in start order. The last phase is open-ended.
pub const PHASES: [Phase; 12] = [
    phase(0.0, false, Drive::Passthrough),
    // Spurious short pulse
    phase(1.0, true, Drive::Passthrough),
    phase(1.5, false, Drive::Passthrough),
    // Long pulse, still below the threshold
    phase(3.0, true, Drive::Passthrough),
    phase(4.01, true, Drive::Forward),
    phase(5.0, false, Drive::Forward),
    phase(6.0, true, Drive::Forward),
    phase(7.01, false, Drive::Backward),
    // Short pulse right at the end of backward drive
    phase(9.04, true, Drive::Passthrough),
    phase(9.9, false, Drive::Passthrough),
    phase(15.0, true, Drive::Passthrough),
    phase(15.9, false, Drive::Passthrough),
];

/// Phase active at virtual time `tm`.
///
/// Times before zero map onto the first phase.
#[must_use]
pub fn phase_at(tm: f64) -> &'static Phase {
    PHASES
        .iter()
        .rev()
        .find(|p| tm >= p.start)
        .unwrap_or(&PHASES[0])
}
