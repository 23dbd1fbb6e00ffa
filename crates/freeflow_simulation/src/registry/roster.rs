//! Roster view: то, что scheduler и player controller видят о врагах за один тик.
//!
//! `RosterView` это шов между логикой арбитража и ECS. В игре это `Roster`
//! (SystemParam поверх `AgentRegistry` + Query), в unit-тестах: статический fake.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::{AgentRegistry, AvailabilityChanged};
use crate::components::{Agent, AgentSnapshot, AgentState, Health};
use crate::DeterministicRng;

/// Read access to the roster plus the shared deterministic RNG.
pub trait RosterView {
    fn agent(&self, agent: Entity) -> Option<AgentSnapshot>;

    fn alive_count(&mut self) -> usize;

    fn available_count(&self) -> usize;

    fn is_available(&self, agent: Entity) -> bool;

    fn pick_random(&mut self, excluding: Option<Entity>) -> Option<Entity>;

    fn any_preparing_attack(&self) -> bool;

    /// Panics if nobody is preparing an attack.
    fn closest_preparing_attacker(&self, origin: Vec3) -> Entity;

    fn rng(&mut self) -> &mut ChaCha8Rng;
}

/// ECS roster: registry + agent predicates + RNG.
#[derive(SystemParam)]
pub struct Roster<'w, 's> {
    registry: ResMut<'w, AgentRegistry>,
    rng: ResMut<'w, DeterministicRng>,
    agents: Query<'w, 's, (&'static AgentState, &'static Health, &'static Transform), With<Agent>>,
    availability_events: EventWriter<'w, AvailabilityChanged>,
}

fn snapshot(
    agents: &Query<(&AgentState, &Health, &Transform), With<Agent>>,
    agent: Entity,
) -> Option<AgentSnapshot> {
    agents
        .get(agent)
        .ok()
        .map(|(state, health, transform)| AgentSnapshot {
            state: *state,
            health: health.current,
            position: transform.translation,
            forward: transform.forward().as_vec3(),
        })
}

impl Roster<'_, '_> {
    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Sets availability and broadcasts `AvailabilityChanged`.
    pub fn set_availability(&mut self, agent: Entity, available: bool) {
        let event = self.registry.set_availability(agent, available);
        self.availability_events.write(event);
    }
}

impl RosterView for Roster<'_, '_> {
    fn agent(&self, agent: Entity) -> Option<AgentSnapshot> {
        snapshot(&self.agents, agent)
    }

    fn alive_count(&mut self) -> usize {
        let agents = &self.agents;
        self.registry.alive_count(|agent| snapshot(agents, agent))
    }

    fn available_count(&self) -> usize {
        self.registry.available_count()
    }

    fn is_available(&self, agent: Entity) -> bool {
        self.registry.is_available(agent)
    }

    fn pick_random(&mut self, excluding: Option<Entity>) -> Option<Entity> {
        self.registry.pick_random(excluding, &mut self.rng.rng)
    }

    fn any_preparing_attack(&self) -> bool {
        self.registry
            .any_preparing_attack(|agent| snapshot(&self.agents, agent))
    }

    fn closest_preparing_attacker(&self, origin: Vec3) -> Entity {
        self.registry
            .closest_preparing_attacker(origin, |agent| snapshot(&self.agents, agent))
    }

    fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng.rng
    }
}
