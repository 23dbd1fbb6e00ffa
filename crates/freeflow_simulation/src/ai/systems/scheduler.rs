//! Scheduler systems: StartAI + один tick loop'а атак за FixedUpdate.

use bevy::prelude::*;

use crate::ai::{AgentCommand, AttackScheduler, SchedulerConfig, StartAttackLoop};
use crate::clock::{SimulationClock, TimeDomain};
use crate::registry::Roster;

/// System: StartAttackLoop → свежий ход без exclude
///
/// Несколько запросов за тик = один restart.
pub fn restart_attack_loop(
    mut requests: EventReader<StartAttackLoop>,
    mut scheduler: ResMut<AttackScheduler>,
) {
    if requests.read().last().is_none() {
        return;
    }
    scheduler.restart();
    crate::log_info("▶️ Scheduler: attack loop (re)started");
}

/// System: продвигает scheduler на scaled delta и публикует команду хода
pub fn drive_attack_scheduler(
    mut scheduler: ResMut<AttackScheduler>,
    mut roster: Roster,
    clock: Res<SimulationClock>,
    config: Res<SchedulerConfig>,
    mut agent_commands: EventWriter<AgentCommand>,
) {
    let delta = clock.delta(TimeDomain::Scaled);
    if let Some(command) = scheduler.tick(delta, &mut roster, &config) {
        agent_commands.write(command);
    }
}
