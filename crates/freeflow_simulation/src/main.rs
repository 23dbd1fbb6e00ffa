//! Headless симуляция Freeflow
//!
//! Игрок на autopilot против кольца агентов: counter когда кто-то замахивается,
//! иначе периодическая атака. Движок заменён заглушками: попадание приходит
//! через несколько тиков после атаки, MoveTo применяется мгновенно.
//!
//! Usage: `freeflow_simulation [config.json]`

use std::env;
use std::fs;

use bevy::prelude::*;
use freeflow_simulation::{
    create_headless_app_with_config, init_logger, log_info, log_warning, Agent, AgentState,
    AttackScheduler, CombatInput, DamageTaken, EffectCommand, Health, HitLanded, Player,
    PlayerCombat, SimulationConfig, SimulationSet,
};

const AGENT_COUNT: usize = 3;
const RING_RADIUS: f32 = 5.0;
const TICK_BUDGET: u32 = 60 * 180;
/// Attack input → engine reports the impact.
const IMPACT_DELAY: u32 = 8;
/// Counter dodge (12 тиков) + follow-up impact.
const COUNTER_IMPACT_DELAY: u32 = 20;
const ATTACK_INTERVAL: u32 = 45;

#[derive(Resource, Default, Debug)]
struct Autopilot {
    tick: u32,
    pending_impact: Option<u32>,
    attacks: u32,
    counters: u32,
    impacts: u32,
    damage_taken: u32,
}

fn load_config() -> SimulationConfig {
    let Some(path) = env::args().nth(1) else {
        return SimulationConfig::default();
    };

    let json = match fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            log_warning(&format!("⚠️ Cannot read config {}: {} (using defaults)", path, err));
            return SimulationConfig::default();
        }
    };

    match SimulationConfig::from_json(&json) {
        Ok(config) => {
            log_info(&format!("📄 Config loaded from {}", path));
            config
        }
        Err(err) => {
            log_warning(&format!("⚠️ Invalid config {}: {} (using defaults)", path, err));
            SimulationConfig::default()
        }
    }
}

/// System: scripted player input
fn autopilot(
    mut pilot: ResMut<Autopilot>,
    agents: Query<&AgentState, With<Agent>>,
    players: Query<&PlayerCombat, With<Player>>,
    mut damage_events: EventReader<DamageTaken>,
    mut inputs: EventWriter<CombatInput>,
    mut hits: EventWriter<HitLanded>,
) {
    pilot.tick += 1;
    pilot.damage_taken += damage_events.read().count() as u32;

    let Ok(combat) = players.single() else {
        return;
    };

    if pilot.pending_impact.is_some_and(|at| pilot.tick >= at) {
        hits.write(HitLanded);
        pilot.pending_impact = None;
        pilot.impacts += 1;
    }

    if combat.is_attacking() || combat.is_countering() {
        return;
    }

    if agents.iter().any(|state| state.preparing_attack) {
        inputs.write(CombatInput::Counter);
        pilot.counters += 1;
        pilot.pending_impact = Some(pilot.tick + COUNTER_IMPACT_DELAY);
        return;
    }

    if pilot.tick % ATTACK_INTERVAL == 0 {
        inputs.write(CombatInput::Attack);
        pilot.attacks += 1;
        pilot.pending_impact = Some(pilot.tick + IMPACT_DELAY);
    }
}

/// System: tween stub, MoveTo lands instantly
fn apply_moves(mut effects: EventReader<EffectCommand>, mut transforms: Query<&mut Transform>) {
    for effect in effects.read() {
        let EffectCommand::MoveTo {
            entity, destination, ..
        } = effect
        else {
            continue;
        };
        if let Ok(mut transform) = transforms.get_mut(*entity) {
            transform.translation = *destination;
        }
    }
}

fn main() {
    init_logger();
    let config = load_config();
    let seed = config.seed;
    let max_health = config.agents.max_health;
    log_info(&format!("Starting Freeflow headless simulation (seed: {})", seed));

    let mut app = create_headless_app_with_config(config);
    app.init_resource::<Autopilot>()
        .add_systems(
            FixedUpdate,
            autopilot
                .after(SimulationSet::PlayerSequences)
                .before(SimulationSet::PlayerInput),
        )
        .add_systems(FixedUpdate, apply_moves.after(SimulationSet::Reactions));

    app.world_mut().spawn((Player, Transform::default()));
    for i in 0..AGENT_COUNT {
        let angle = i as f32 / AGENT_COUNT as f32 * std::f32::consts::TAU;
        let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * RING_RADIUS;
        app.world_mut().spawn((
            Agent,
            Health::new(max_health),
            Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
        ));
    }

    let mut alive = AGENT_COUNT;
    for tick in 0..TICK_BUDGET {
        app.update();

        let mut agents = app.world_mut().query_filtered::<&AgentState, With<Agent>>();
        alive = agents
            .iter(app.world())
            .filter(|state| state.is_alive())
            .count();

        if tick % 600 == 0 {
            log_info(&format!("Tick {}: {} agents alive", tick, alive));
        }
        if alive == 0 {
            log_info(&format!("🏆 All agents down at tick {}", tick));
            break;
        }
    }

    let pilot = app.world().resource::<Autopilot>();
    let turns = app.world().resource::<AttackScheduler>().turns_started();
    log_info(&format!(
        "Simulation complete: {} alive, {} enemy turns, {} attacks, {} counters, {} impacts, {} hits taken",
        alive, turns, pilot.attacks, pilot.counters, pilot.impacts, pilot.damage_taken
    ));
}
