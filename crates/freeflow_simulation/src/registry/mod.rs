//! Agent Registry: source of truth for which agents exist and which are eligible
//!
//! Registry владеет только bookkeeping'ом availability. Liveness и предикаты
//! живут на самих агентах (`AgentState`) и читаются через lookup на каждый вызов,
//! ничего не кешируется между тиками (кроме observable `cached_alive_count`).

use bevy::prelude::*;
use rand::Rng;

use crate::components::{Agent, AgentSnapshot};

pub mod roster;

#[cfg(test)]
pub(crate) mod test_support;


pub use roster::{Roster, RosterView};

/// Fired on every `set_availability` call.
///
/// Player controller подписан: `available == false` для текущего lock-on сбрасывает его.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvailabilityChanged {
    pub agent: Entity,
    pub available: bool,
}

/// One roster slot: exactly one availability flag per agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub struct RegistryEntry {
    pub agent: Entity,
    pub available: bool,
}

/// Ordered roster of enemy agents.
///
/// Order is registration order and is used only for deterministic iteration.
#[derive(Resource, Debug, Clone, Default)]
pub struct AgentRegistry {
    entries: Vec<RegistryEntry>,
    cached_alive_count: usize,
}

impl AgentRegistry {
    /// Adds `agent` as available. Returns false if it was already registered.
    pub fn register(&mut self, agent: Entity) -> bool {
        if self.contains(agent) {
            return false;
        }
        self.entries.push(RegistryEntry {
            agent,
            available: true,
        });
        true
    }

    /// Drops `agent` from the roster, keeping the order of the rest.
    pub fn unregister(&mut self, agent: Entity) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.agent != agent);
        before != self.entries.len()
    }

    pub fn contains(&self, agent: Entity) -> bool {
        self.entries.iter().any(|entry| entry.agent == agent)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_available(&self, agent: Entity) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.agent == agent && entry.available)
    }

    /// Value of the last `alive_count` call (UI / AI observable).
    pub fn cached_alive_count(&self) -> usize {
        self.cached_alive_count
    }

    /// Counts agents whose liveness flag is currently true and refreshes the cached count.
    ///
    /// Despawned agents (lookup returns `None`) count as dead.
    pub fn alive_count<F>(&mut self, lookup: F) -> usize
    where
        F: Fn(Entity) -> Option<AgentSnapshot>,
    {
        let count = self
            .entries
            .iter()
            .filter(|entry| lookup(entry.agent).is_some_and(|agent| agent.is_alive()))
            .count();
        self.cached_alive_count = count;
        count
    }

    pub fn available_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.available).count()
    }

    /// Uniform pick among available agents, optionally excluding one.
    ///
    /// Eligible set is rebuilt on every call.
    pub fn pick_random<R: Rng + ?Sized>(&self, excluding: Option<Entity>, rng: &mut R) -> Option<Entity> {
        let eligible: Vec<Entity> = self
            .entries
            .iter()
            .filter(|entry| entry.available && Some(entry.agent) != excluding)
            .map(|entry| entry.agent)
            .collect();

        if eligible.is_empty() {
            return None;
        }

        Some(eligible[rng.gen_range(0..eligible.len())])
    }

    pub fn any_preparing_attack<F>(&self, lookup: F) -> bool
    where
        F: Fn(Entity) -> Option<AgentSnapshot>,
    {
        self.entries
            .iter()
            .any(|entry| lookup(entry.agent).is_some_and(|agent| agent.state.preparing_attack))
    }

    /// Sets the availability flag and returns the event to broadcast.
    ///
    /// Unknown agents are left untouched but the event is still produced so a
    /// dangling lock-on on them gets released.
    #[must_use = "broadcast the event, otherwise a lock-on on this agent is never released"]
    pub fn set_availability(&mut self, agent: Entity, available: bool) -> AvailabilityChanged {
        for entry in self.entries.iter_mut().filter(|entry| entry.agent == agent) {
            entry.available = available;
        }
        AvailabilityChanged { agent, available }
    }

    /// Closest agent (Euclidean) among those preparing an attack.
    ///
    /// # Panics
    /// If no agent is preparing an attack. Callers must check `any_preparing_attack` first.
    pub fn closest_preparing_attacker<F>(&self, origin: Vec3, lookup: F) -> Entity
    where
        F: Fn(Entity) -> Option<AgentSnapshot>,
    {
        self.entries
            .iter()
            .filter_map(|entry| lookup(entry.agent).map(|agent| (entry.agent, agent)))
            .filter(|(_, agent)| agent.state.preparing_attack)
            .min_by(|(_, a), (_, b)| {
                a.position
                    .distance_squared(origin)
                    .total_cmp(&b.position.distance_squared(origin))
            })
            .map(|(agent, _)| agent)
            .unwrap_or_else(|| {
                panic!("closest_preparing_attacker: no agent is preparing an attack (caller must check any_preparing_attack)")
            })
    }
}

/// System: регистрируем новых агентов (Added<Agent>) в порядке появления.
pub fn register_new_agents(
    mut registry: ResMut<AgentRegistry>,
    added: Query<Entity, Added<Agent>>,
) {
    for agent in added.iter() {
        if registry.register(agent) {
            crate::log(&format!("📋 Registry: agent {:?} registered ({} total)", agent, registry.len()));
        }
    }
}

/// System: забываем despawned агентов, чтобы roster не держал мёртвые handle'ы.
pub fn forget_despawned_agents(
    mut registry: ResMut<AgentRegistry>,
    mut removed: RemovedComponents<Agent>,
) {
    for agent in removed.read() {
        if registry.unregister(agent) {
            crate::log(&format!("📋 Registry: agent {:?} removed ({} left)", agent, registry.len()));
        }
    }
}

/// Registry Plugin
pub struct RegistryPlugin;

impl Plugin for RegistryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AgentRegistry>()
            .add_event::<AvailabilityChanged>()
            .add_systems(
                FixedUpdate,
                (register_new_agents, forget_despawned_agents)
                    .chain()
                    .in_set(crate::SimulationSet::Roster),
            );
    }
}
