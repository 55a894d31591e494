//! Scenarios for the robosim harness.
//!
//! Each scenario ("challenge") pairs an oracle with the controller behavior
//! it expects:
//!
//! | Id | Oracle | Expected motor |
//! |----|--------|----------------|
//! | 1 | Direct | `1.0` |
//! | 2 | Mirror | joystick Y |
//! | 3 | Gate | joystick Y while the digital input is high, else `0.0` |
//! | 4 | TimedSequence | debounced trigger, forward then backward drive |
//!
//! [`ScenarioRunner`] selects the oracle from the controller's
//! [`RobotConfig`](robosim_common::config::RobotConfig), runs the smoke
//! checks and drives the loop.

pub mod oracle;
pub mod robot;
pub mod runner;
pub mod scenarios;
pub mod sequence;

pub use oracle::{gate_open, joystick_wave, ChallengeOracle};
pub use robot::{
    reference_controller, DirectDrive, GatedMirror, IdleRobot, JoystickMirror, SequencedDrive,
};
pub use runner::{RunReport, ScenarioRunner};
pub use scenarios::{lookup, Scenario, SCENARIOS};
pub use sequence::{phase_at, Drive, Phase, PHASES};
