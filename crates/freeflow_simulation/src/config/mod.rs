//! Simulation config: seed, tick rate и tuning всех подсистем.
//!
//! Все поля имеют defaults, JSON может переопределять любое подмножество.

use serde::{Deserialize, Serialize};

use crate::ai::{AgentBehaviourConfig, SchedulerConfig};
use crate::combat::CombatConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for `DeterministicRng`.
    pub seed: u64,
    /// FixedUpdate rate.
    pub tick_hz: f64,
    pub scheduler: SchedulerConfig,
    pub combat: CombatConfig,
    pub agents: AgentBehaviourConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            scheduler: SchedulerConfig::default(),
            combat: CombatConfig::default(),
            agents: AgentBehaviourConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One fixed tick in seconds.
    pub fn timestep(&self) -> f64 {
        1.0 / self.tick_hz
    }
}
