//! Базовые компоненты врагов: Agent, AgentState, Health

use bevy::prelude::*;

/// Enemy combatant marker.
///
/// Required Components добавляют состояние, здоровье, таймеры reference-поведения и Transform.
/// Регистрация в `AgentRegistry` происходит автоматически (см. `registry::register_new_agents`).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(AgentState, Health, crate::ai::AgentTimers, Transform)]
pub struct Agent;

/// Предикаты агента, которые читают scheduler и player controller.
///
/// Пишет их только поведение агента (reference implementation в `ai::systems::behaviour`
/// или движок). Ядро никогда не мутирует их напрямую.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AgentState {
    /// External activity flag; liveness is derived from it.
    pub active: bool,
    pub retreating: bool,
    pub locked_by_player: bool,
    pub stunned: bool,
    pub preparing_attack: bool,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            active: true,
            retreating: false,
            locked_by_player: false,
            stunned: false,
            preparing_attack: false,
        }
    }
}

impl AgentState {
    pub fn is_alive(&self) -> bool {
        self.active
    }
}

/// Здоровье агента (в ударах)
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(3) // три чистых удара
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Read-only copy of everything the arbitration core needs about one agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSnapshot {
    pub state: AgentState,
    pub health: u32,
    pub position: Vec3,
    pub forward: Vec3,
}

impl AgentSnapshot {
    pub fn is_alive(&self) -> bool {
        self.state.is_alive()
    }
}
