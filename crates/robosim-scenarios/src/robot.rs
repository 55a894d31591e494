//! Reference controllers.
//!
//! One correct robot program per challenge, written the way a cyclic
//! controller is written on the real robot: read sensors, run function
//! blocks, write the motor. They exercise the harness end to end and serve
//! as the known-good side of every acceptance test.

use robosim_common::config::{RobotConfig, ScenarioId};
use robosim_common::error::SimResult;
use robosim_common::time::{to_time, units};
use robosim_runtime::controller::Controller;
use robosim_runtime::io_stub::IoStub;
use robosim_stdlib::{FTrig, RTrig, Ton, Tp};

/// Robot program with no challenge selected. Leaves the motor alone.
#[derive(Debug, Clone, Default)]
pub struct IdleRobot {
    config: RobotConfig,
}

impl IdleRobot {
    /// Idle robot reporting the given configuration.
    #[must_use]
    pub fn new(config: RobotConfig) -> Self {
        Self { config }
    }
}

impl Controller for IdleRobot {
    fn config(&self) -> RobotConfig {
        self.config
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn operator_control(&mut self, _tm: f64, _io: &mut IoStub) -> SimResult<bool> {
        Ok(true)
    }
}

/// Challenge 1: drive forward at full power.
#[derive(Debug, Clone, Default)]
pub struct DirectDrive;

impl Controller for DirectDrive {
    fn config(&self) -> RobotConfig {
        RobotConfig::challenge(1)
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, io: &mut IoStub) -> SimResult<()> {
        io.motor = 0.0;
        Ok(())
    }

    fn operator_control(&mut self, _tm: f64, io: &mut IoStub) -> SimResult<bool> {
        io.motor = 1.0;
        Ok(true)
    }
}

/// Challenge 2: motor follows the joystick.
#[derive(Debug, Clone, Default)]
pub struct JoystickMirror;

impl Controller for JoystickMirror {
    fn config(&self) -> RobotConfig {
        RobotConfig::challenge(2)
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, io: &mut IoStub) -> SimResult<()> {
        io.motor = 0.0;
        Ok(())
    }

    fn operator_control(&mut self, _tm: f64, io: &mut IoStub) -> SimResult<bool> {
        io.motor = io.joystick_y;
        Ok(true)
    }
}

/// Challenge 3: motor follows the joystick only while the digital input is high.
#[derive(Debug, Clone, Default)]
pub struct GatedMirror;

impl Controller for GatedMirror {
    fn config(&self) -> RobotConfig {
        RobotConfig::challenge(3)
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, io: &mut IoStub) -> SimResult<()> {
        io.motor = 0.0;
        Ok(())
    }

    fn operator_control(&mut self, _tm: f64, io: &mut IoStub) -> SimResult<bool> {
        io.motor = if io.digital_input { io.joystick_y } else { 0.0 };
        Ok(true)
    }
}

/// Challenge 4: debounced trigger starting a forward then backward drive.
///
/// Holding the digital input for the debounce time starts a forward drive;
/// when it ends, a backward drive follows. The joystick drives the motor
/// otherwise. A new trigger is ignored while either drive runs.
#[derive(Debug, Clone)]
pub struct SequencedDrive {
    /// Minimum hold time of the input, in time-units.
    pub debounce: f64,
    /// Forward drive length, in time-units.
    pub forward: f64,
    /// Backward drive length, in time-units.
    pub backward: f64,
    hold: Ton,
    trigger: RTrig,
    forward_pulse: Tp,
    forward_end: FTrig,
    backward_pulse: Tp,
}

impl Default for SequencedDrive {
    fn default() -> Self {
        Self::new(1.01, 3.0, 2.0)
    }
}

impl SequencedDrive {
    /// Sequenced drive with the given timings.
    #[must_use]
    pub fn new(debounce: f64, forward: f64, backward: f64) -> Self {
        Self {
            debounce,
            forward,
            backward,
            hold: Ton::new(),
            trigger: RTrig::new(),
            forward_pulse: Tp::new(),
            forward_end: FTrig::new(),
            backward_pulse: Tp::new(),
        }
    }

    fn reset_blocks(&mut self) {
        self.hold.reset();
        self.trigger.reset();
        self.forward_pulse.reset();
        self.forward_end.reset();
        self.backward_pulse.reset();
    }
}

impl Controller for SequencedDrive {
    fn config(&self) -> RobotConfig {
        RobotConfig::challenge(4)
    }

    fn autonomous(&mut self, _io: &mut IoStub) -> SimResult<()> {
        Ok(())
    }

    fn disabled(&mut self, io: &mut IoStub) -> SimResult<()> {
        self.reset_blocks();
        io.motor = 0.0;
        Ok(())
    }

    fn operator_control(&mut self, tm: f64, io: &mut IoStub) -> SimResult<bool> {
        let now = to_time(tm);

        let held = self.hold.call(io.digital_input, units(self.debounce), now);
        let pressed = self.trigger.call(held);

        let backing = self.backward_pulse.is_running();
        let forward = self
            .forward_pulse
            .call(pressed && !backing, units(self.forward), now);
        let forward_done = self.forward_end.call(forward);
        let backward = self
            .backward_pulse
            .call(forward_done, units(self.backward), now);

        io.motor = if forward {
            1.0
        } else if backward {
            -1.0
        } else {
            io.joystick_y
        };
        Ok(true)
    }
}

/// Build the reference controller for a robot configuration.
///
/// Configurations without a challenge, or with an id that has no reference
/// program, get an [`IdleRobot`].
#[must_use]
pub fn reference_controller(config: RobotConfig) -> Box<dyn Controller> {
    match config.challenge {
        Some(ScenarioId(1)) => Box::new(DirectDrive),
        Some(ScenarioId(2)) => Box::new(JoystickMirror),
        Some(ScenarioId(3)) => Box::new(GatedMirror),
        Some(ScenarioId(4)) => Box::new(SequencedDrive::default()),
        _ => Box::new(IdleRobot::new(config)),
    }
}
