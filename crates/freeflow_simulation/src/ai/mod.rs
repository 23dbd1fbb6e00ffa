//! AI module: Attack Scheduler + reference поведение агентов
//!
//! Scheduler решает, КТО и КОГДА атакует (один атакующий за раз).
//! Поведение агента исполняет `AgentCommand` и держит предикаты `AgentState`.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::*;
pub use systems::*;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. tick_agent_timers → apply_agent_commands (`SimulationSet::Agents`)
/// 2. restart_attack_loop → drive_attack_scheduler (`SimulationSet::Scheduler`)
///
/// Agents идут первыми: lock/stun от игрока этого тика уже применены, когда
/// scheduler проверяет гейты. `BeginAttack` scheduler'а агент получает тиком позже.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AgentCommand>()
            .add_event::<StartAttackLoop>()
            .init_resource::<AttackScheduler>()
            .init_resource::<SchedulerConfig>()
            .init_resource::<AgentBehaviourConfig>()
            .add_systems(
                FixedUpdate,
                (restart_attack_loop, drive_attack_scheduler)
                    .chain()
                    .in_set(crate::SimulationSet::Scheduler),
            )
            .add_systems(
                FixedUpdate,
                (tick_agent_timers, apply_agent_commands)
                    .chain() // Последовательное выполнение для детерминизма
                    .in_set(crate::SimulationSet::Agents),
            );
    }
}
