//! Static roster for unit tests (no World needed).

use std::collections::HashMap;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{AgentRegistry, RosterView};
use crate::components::{AgentSnapshot, AgentState};

pub struct FakeRoster {
    pub registry: AgentRegistry,
    pub agents: HashMap<Entity, AgentSnapshot>,
    pub rng: ChaCha8Rng,
}

impl FakeRoster {
    pub fn new(seed: u64) -> Self {
        Self {
            registry: AgentRegistry::default(),
            agents: HashMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Registers an alive, idle agent at `position` facing -Z.
    pub fn spawn(&mut self, index: u32, position: Vec3) -> Entity {
        let agent = Entity::from_raw(index);
        self.registry.register(agent);
        self.agents.insert(
            agent,
            AgentSnapshot {
                state: AgentState::default(),
                health: 3,
                position,
                forward: Vec3::NEG_Z,
            },
        );
        agent
    }

    pub fn state_mut(&mut self, agent: Entity) -> &mut AgentState {
        &mut self
            .agents
            .get_mut(&agent)
            .expect("agent spawned in fake roster")
            .state
    }

    pub fn snapshot_mut(&mut self, agent: Entity) -> &mut AgentSnapshot {
        self.agents
            .get_mut(&agent)
            .expect("agent spawned in fake roster")
    }

    pub fn kill(&mut self, agent: Entity) {
        self.state_mut(agent).active = false;
        let _ = self.registry.set_availability(agent, false);
    }
}

impl RosterView for FakeRoster {
    fn agent(&self, agent: Entity) -> Option<AgentSnapshot> {
        self.agents.get(&agent).copied()
    }

    fn alive_count(&mut self) -> usize {
        let agents = &self.agents;
        self.registry.alive_count(|agent| agents.get(&agent).copied())
    }

    fn available_count(&self) -> usize {
        self.registry.available_count()
    }

    fn is_available(&self, agent: Entity) -> bool {
        self.registry.is_available(agent)
    }

    fn pick_random(&mut self, excluding: Option<Entity>) -> Option<Entity> {
        self.registry.pick_random(excluding, &mut self.rng)
    }

    fn any_preparing_attack(&self) -> bool {
        self.registry
            .any_preparing_attack(|agent| self.agents.get(&agent).copied())
    }

    fn closest_preparing_attacker(&self, origin: Vec3) -> Entity {
        self.registry
            .closest_preparing_attacker(origin, |agent| self.agents.get(&agent).copied())
    }

    fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}
