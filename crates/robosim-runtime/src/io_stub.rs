//! Simulated actuator and sensor cells shared by controller and oracle.
//!
//! The stub is plain storage: no range checks, no coercion beyond the
//! declared field type, no history. Access is single-threaded and ordered
//! by the loop driver's iteration protocol:
//!
//! ```text
//!   oracle ──writes──▶ digital_input, joystick_y ──reads──▶ controller
//!   controller ──writes──▶ motor ──reads──▶ driver (lagged check)
//! ```

use robosim_common::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Addressable IO stub fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Motor controller output (actuator), nominally `-1.0..=1.0`.
    Motor,
    /// Digital input / limit switch (sensor).
    DigitalInput,
    /// Joystick Y axis (sensor), nominally `-1.0..=1.0`.
    JoystickY,
}

impl Field {
    /// All fields in declaration order.
    pub const ALL: [Field; 3] = [Field::Motor, Field::DigitalInput, Field::JoystickY];

    /// Field name as used by [`IoStub::get_named`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Motor => "motor",
            Self::DigitalInput => "digital_input",
            Self::JoystickY => "joystick_y",
        }
    }

    fn type_name(self) -> &'static str {
        match self {
            Self::Motor | Self::JoystickY => "real",
            Self::DigitalInput => "bool",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| SimError::UnknownField(s.to_string()))
    }
}

/// A value stored in one IO stub field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IoValue {
    /// Real-valued field.
    Real(f64),
    /// Boolean field.
    Bool(bool),
}

impl fmt::Display for IoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// The IO stub set of one scenario run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IoStub {
    /// Motor output written by the controller.
    pub motor: f64,
    /// Digital input written by the oracle.
    pub digital_input: bool,
    /// Joystick Y axis written by the oracle.
    pub joystick_y: f64,
}

impl IoStub {
    /// Create a stub with every field zeroed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a field.
    #[must_use]
    pub fn get(&self, field: Field) -> IoValue {
        match field {
            Field::Motor => IoValue::Real(self.motor),
            Field::DigitalInput => IoValue::Bool(self.digital_input),
            Field::JoystickY => IoValue::Real(self.joystick_y),
        }
    }

    /// Write a field.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::FieldType`] if `value` does not match the field's
    /// declared type.
    pub fn set(&mut self, field: Field, value: IoValue) -> SimResult<()> {
        match (field, value) {
            (Field::Motor, IoValue::Real(v)) => self.motor = v,
            (Field::JoystickY, IoValue::Real(v)) => self.joystick_y = v,
            (Field::DigitalInput, IoValue::Bool(v)) => self.digital_input = v,
            (field, _) => {
                return Err(SimError::FieldType {
                    field: field.name().to_string(),
                    expected: field.type_name().to_string(),
                })
            }
        }
        Ok(())
    }

    /// Read a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownField`] for names that are not fields.
    pub fn get_named(&self, name: &str) -> SimResult<IoValue> {
        Ok(self.get(name.parse()?))
    }

    /// Write a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownField`] for names that are not fields and
    /// [`SimError::FieldType`] for values of the wrong type.
    pub fn set_named(&mut self, name: &str, value: IoValue) -> SimResult<()> {
        self.set(name.parse()?, value)
    }
}
