//! The oracle boundary: reference models of correct controller behavior.

use crate::io_stub::IoStub;
use serde::Serialize;

/// Sensor values an oracle presents for the next controller call.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorFrame {
    /// Digital input level.
    pub digital_input: Option<bool>,
    /// Joystick Y position.
    pub joystick_y: Option<f64>,
}

impl SensorFrame {
    /// Write the frame's values into the IO stub.
    pub fn apply(&self, io: &mut IoStub) {
        if let Some(level) = self.digital_input {
            io.digital_input = level;
        }
        if let Some(y) = self.joystick_y {
            io.joystick_y = y;
        }
    }
}

/// Sensor values the controller saw on the previous iteration.
///
/// Carries no actuator field, so an oracle cannot base its prediction on
/// the controller's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorReading {
    /// Digital input level.
    pub digital_input: bool,
    /// Joystick Y position.
    pub joystick_y: f64,
}

impl From<&IoStub> for SensorReading {
    fn from(io: &IoStub) -> Self {
        Self {
            digital_input: io.digital_input,
            joystick_y: io.joystick_y,
        }
    }
}

/// Oracle output for one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Sensors to present before the controller runs.
    pub sensors: SensorFrame,
    /// Actuator value the controller must commit for these sensors.
    pub actuator: f64,
}

/// A reference model the loop driver checks a controller against.
///
/// `predict` is called exactly once per iteration, before the controller,
/// with the sensors as they stood after the previous iteration.
pub trait Oracle {
    /// Short name used in reports.
    fn name(&self) -> &'static str;

    /// Compute sensors and the expected actuator value at virtual time `tm`.
    fn predict(&mut self, tm: f64, prior: SensorReading) -> Prediction;

    /// Clear per-run memory. Called once before the first iteration.
    fn reset(&mut self) {}
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn predict(&mut self, tm: f64, prior: SensorReading) -> Prediction {
        (**self).predict(tm, prior)
    }

    fn reset(&mut self) {
        (**self).reset();
    }
}
