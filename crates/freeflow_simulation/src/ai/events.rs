//! AI Events: команды агентам и управление loop'ом атак
//!
//! Scheduler и player controller никогда не трогают `AgentState` напрямую:
//! они пишут `AgentCommand`, поведение агента (reference или движок) исполняет.

use bevy::prelude::*;

/// Commanded agent transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AgentCommandKind {
    /// Scheduler: start the windup (agent owns the timing).
    BeginAttack,
    /// Scheduler: back off after the attack resolved.
    BeginRetreat,
    /// Player: freeze in place before being approached.
    StopMoving,
    /// Player: the agent is on the player's attack trajectory.
    PlayerApproaching,
    /// Player: the agent's windup got countered.
    Countered,
    /// Player: a strike landed on the agent.
    Hit,
}

/// Команда конкретному агенту
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentCommand {
    pub agent: Entity,
    pub kind: AgentCommandKind,
}

impl AgentCommand {
    pub fn new(agent: Entity, kind: AgentCommandKind) -> Self {
        Self { agent, kind }
    }
}

/// Restart the attack loop from a fresh turn (StartAI).
///
/// Работает и после silent stop (никто не available), и после termination.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct StartAttackLoop;
