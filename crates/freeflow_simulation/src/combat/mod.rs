//! Combat module: Player Combat Controller
//!
//! ECS ответственность:
//! - Player state: lock-on, combo index, attack/counter/damage/finisher секвенции
//! - Combat rules: выбор цели, range gating, final blow, counter degrade
//! - Events: CombatInput, HitLanded, DamageTaken → EffectCommand / AgentCommand
//!
//! Движок (вне ядра): detection cone, hitbox, анимации, звук, tween'ы, камера.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::*;
pub use systems::*;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. tick_player_sequences: таймеры секвенций (`PlayerSequences`)
/// 2. handle_damage_taken → handle_hit_landed → handle_combat_input (`PlayerInput`)
/// 3. apply_locomotion: hold/release + ramp (`Locomotion`)
/// 4. release_lock_on_unavailable: сброс lock-on (`Roster` и `Reactions`)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<CombatInput>()
            .add_event::<HitLanded>()
            .add_event::<DamageTaken>()
            .add_event::<crate::effects::EffectCommand>()
            .add_event::<crate::ai::AgentCommand>()
            .init_resource::<CombatConfig>()
            .init_resource::<TargetDetection>()
            .init_resource::<crate::clock::SimulationClock>();

        // Регистрация систем в FixedUpdate
        app.add_systems(
            FixedUpdate,
            tick_player_sequences.in_set(crate::SimulationSet::PlayerSequences),
        )
        .add_systems(
            FixedUpdate,
            (handle_damage_taken, handle_hit_landed, handle_combat_input)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(crate::SimulationSet::PlayerInput),
        )
        .add_systems(
            FixedUpdate,
            apply_locomotion.in_set(crate::SimulationSet::Locomotion),
        )
        // Дважды: внешние set_availability между тиками сбрасываются до player
        // секвенций/input'а, смерти от Agents ещё в этом же тике
        .add_systems(
            FixedUpdate,
            release_lock_on_unavailable.in_set(crate::SimulationSet::Roster),
        )
        .add_systems(
            FixedUpdate,
            release_lock_on_unavailable.in_set(crate::SimulationSet::Reactions),
        );
    }
}
