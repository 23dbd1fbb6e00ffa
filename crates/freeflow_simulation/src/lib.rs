//! Freeflow Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: ядро арбитража ближнего боя.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = кто атакует и когда, lock-on, combat секвенции, time scale
//! - Движок = анимации, звук, tween'ы, камера, detection cone, hitbox
//!
//! Граница: движок шлёт `CombatInput` / `HitLanded` / `TargetDetection`,
//! ядро отвечает `EffectCommand` и `AgentCommand`.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod clock;
pub mod combat;
pub mod components;
pub mod config;
pub mod effects;
pub mod logger;
pub mod registry;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AgentCommand, AgentCommandKind, AttackScheduler, StartAttackLoop};
pub use clock::{SimulationClock, TimeDomain};
pub use combat::{CombatInput, CombatPlugin, DamageTaken, HitLanded, PlayerCombat, TargetDetection};
pub use components::*;
pub use config::SimulationConfig;
pub use effects::{AnimationCue, EffectCommand, SoundCue};
pub use logger::*;
pub use registry::{AgentRegistry, AvailabilityChanged, RegistryPlugin, Roster, RosterView};

/// FixedUpdate порядок (chain): секвенции созданные в тике t тикают с t+1.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Real/scaled delta этого тика
    Clock,
    /// Registry bookkeeping (новые / despawned агенты)
    Roster,
    PlayerSequences,
    PlayerInput,
    Locomotion,
    /// Reference поведение агентов. До scheduler'а: гейты хода видят
    /// команды игрока этого же тика (lock, stun).
    Agents,
    Scheduler,
    /// Реакции на availability
    Reactions,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = &self.config;

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Clock,
                SimulationSet::Roster,
                SimulationSet::PlayerSequences,
                SimulationSet::PlayerInput,
                SimulationSet::Locomotion,
                SimulationSet::Agents,
                SimulationSet::Scheduler,
                SimulationSet::Reactions,
            )
                .chain(), // Последовательное выполнение для детерминизма
        )
        // Fixed timestep (60Hz по умолчанию)
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        // Детерминистичный RNG
        .insert_resource(DeterministicRng::new(config.seed))
        .insert_resource(config.scheduler.clone())
        .insert_resource(config.combat.clone())
        .insert_resource(config.agents.clone())
        .init_resource::<SimulationClock>()
        .add_systems(
            FixedUpdate,
            clock::advance_clock.in_set(SimulationSet::Clock),
        )
        // Подсистемы
        .add_plugins((RegistryPlugin, CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции (default tuning)
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_config(SimulationConfig {
        seed,
        ..Default::default()
    })
}

/// Headless App с заданным config
///
/// Каждый `app.update()` = ровно один fixed tick (ManualDuration = timestep),
/// кроме самого первого: Bevy стартует часы с нулевой delta.
pub fn create_headless_app_with_config(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    let timestep = Duration::from_secs_f64(config.timestep());
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(timestep))
        .add_plugins(SimulationPlugin::with_config(config));

    app
}
