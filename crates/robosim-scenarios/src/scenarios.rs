//! Scenario table.

use crate::oracle::ChallengeOracle;
use robosim_common::config::ScenarioId;

/// A registered challenge.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    /// Identifier selected by a controller's configuration.
    pub id: ScenarioId,
    /// Short name.
    pub name: &'static str,
    /// What a correct controller does.
    pub description: &'static str,
    build: fn() -> ChallengeOracle,
}

impl Scenario {
    /// Fresh oracle for one run of this scenario.
    #[must_use]
    pub fn oracle(&self) -> ChallengeOracle {
        (self.build)()
    }
}

/// All registered scenarios, by id.
pub static SCENARIOS: [Scenario; 4] = [
    Scenario {
        id: ScenarioId(1),
        name: "direct",
        description: "Drive the motor forward at full power",
        build: ChallengeOracle::direct,
    },
    Scenario {
        id: ScenarioId(2),
        name: "mirror",
        description: "Set the motor to the joystick Y position",
        build: ChallengeOracle::mirror,
    },
    Scenario {
        id: ScenarioId(3),
        name: "gate",
        description: "Mirror the joystick while the digital input is high, otherwise stop",
        build: ChallengeOracle::gate,
    },
    Scenario {
        id: ScenarioId(4),
        name: "timed_sequence",
        description: "Debounce the digital input, then drive forward for 3s and back for 2s",
        build: ChallengeOracle::timed_sequence,
    },
];

/// Find the scenario registered under `id`.
#[must_use]
pub fn lookup(id: ScenarioId) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.id == id)
}
