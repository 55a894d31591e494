//! The controller-under-test boundary.
//!
//! A controller is the robot program: it reads sensors from the IO stub and
//! writes its actuator decision back. The loop driver re-enters
//! [`Controller::operator_control`] once per iteration until the controller
//! asks to stop or the iteration cap is reached.

use crate::io_stub::IoStub;
use robosim_common::config::RobotConfig;
use robosim_common::error::SimResult;
use std::fmt;

/// Competition-mode entry points of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Autonomous period.
    Autonomous,
    /// Robot disabled.
    Disabled,
    /// Operator (teleoperated) control loop.
    OperatorControl,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Autonomous => write!(f, "autonomous"),
            Self::Disabled => write!(f, "disabled"),
            Self::OperatorControl => write!(f, "operator_control"),
        }
    }
}

/// Trait implemented by every controller the harness can drive.
///
/// All calls are synchronous and run to completion; the harness never
/// interrupts a call. Returning an error from any entry point aborts the
/// scenario run with that error.
pub trait Controller {
    /// Construction-time configuration, including the selected scenario.
    fn config(&self) -> RobotConfig;

    /// Autonomous-mode entry point.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the run.
    fn autonomous(&mut self, io: &mut IoStub) -> SimResult<()>;

    /// Disabled-mode entry point.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the run.
    fn disabled(&mut self, io: &mut IoStub) -> SimResult<()>;

    /// One operator-control iteration at virtual time `tm`.
    ///
    /// Returns `true` to keep looping, `false` to stop.
    ///
    /// # Errors
    ///
    /// Any error is fatal to the run.
    fn operator_control(&mut self, tm: f64, io: &mut IoStub) -> SimResult<bool>;
}

impl<C: Controller + ?Sized> Controller for Box<C> {
    fn config(&self) -> RobotConfig {
        (**self).config()
    }

    fn autonomous(&mut self, io: &mut IoStub) -> SimResult<()> {
        (**self).autonomous(io)
    }

    fn disabled(&mut self, io: &mut IoStub) -> SimResult<()> {
        (**self).disabled(io)
    }

    fn operator_control(&mut self, tm: f64, io: &mut IoStub) -> SimResult<bool> {
        (**self).operator_control(tm, io)
    }
}
