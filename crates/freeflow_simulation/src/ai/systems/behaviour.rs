//! Reference agent behaviour systems.
//!
//! Порядок в `SimulationSet::Agents`: сначала таймеры (команды этого тика
//! начинают отсчёт со следующего), потом новые команды.

use bevy::prelude::*;

use crate::ai::{AgentBehaviourConfig, AgentCommand, AgentTimers, CommandOutcome};
use crate::clock::{SimulationClock, TimeDomain};
use crate::combat::{DamageTaken, PlayerCombat};
use crate::components::{Agent, AgentState, Health, Player};
use crate::effects::{AnimationCue, EffectCommand, SoundCue};
use crate::registry::{AgentRegistry, AvailabilityChanged};

/// System: windup/retreat/stun/lock таймеры
///
/// Windup истёк → удар по игроку, если тот не атакует и не контрит.
pub fn tick_agent_timers(
    clock: Res<SimulationClock>,
    mut agents: Query<(Entity, &mut AgentState, &mut AgentTimers), With<Agent>>,
    players: Query<&PlayerCombat, With<Player>>,
    mut damage_events: EventWriter<DamageTaken>,
    mut effects: EventWriter<EffectCommand>,
) {
    let delta = clock.delta(TimeDomain::Scaled);
    let player = players.single().ok();

    for (entity, mut state, mut timers) in agents.iter_mut() {
        if !timers.tick(delta, &mut state) {
            continue;
        }

        effects.write(EffectCommand::Animate {
            entity,
            cue: AnimationCue::AirPunch,
        });

        let Some(player) = player else {
            continue;
        };

        if player.is_attacking() || player.is_countering() {
            crate::log(&format!("🛡️ {:?} strike whiffed (player busy)", entity));
            continue;
        }

        damage_events.write(DamageTaken { attacker: entity });
        crate::log(&format!("💥 {:?} strike landed on player", entity));
    }
}

/// System: AgentCommand → предикаты агента + эффекты
pub fn apply_agent_commands(
    mut agent_commands: EventReader<AgentCommand>,
    config: Res<AgentBehaviourConfig>,
    mut agents: Query<(&mut AgentState, &mut Health, &mut AgentTimers), With<Agent>>,
    mut registry: ResMut<AgentRegistry>,
    mut availability_events: EventWriter<AvailabilityChanged>,
    mut effects: EventWriter<EffectCommand>,
) {
    for command in agent_commands.read() {
        let Ok((mut state, mut health, mut timers)) = agents.get_mut(command.agent) else {
            crate::log_warning(&format!(
                "⚠️ {:?} for missing agent {:?}",
                command.kind, command.agent
            ));
            continue;
        };

        let outcome = timers.apply(command.kind, &mut state, &mut health, &config);
        match outcome {
            CommandOutcome::Ignored | CommandOutcome::Applied => {}
            CommandOutcome::Halted => {
                effects.write(EffectCommand::Halt {
                    entity: command.agent,
                });
            }
            CommandOutcome::Stunned => {
                effects.write(EffectCommand::Animate {
                    entity: command.agent,
                    cue: AnimationCue::Hit,
                });
                crate::log(&format!(
                    "😵 {:?} stunned ({}/{} HP)",
                    command.agent, health.current, health.max
                ));
            }
            CommandOutcome::Died => {
                availability_events.write(registry.set_availability(command.agent, false));
                effects.write(EffectCommand::Animate {
                    entity: command.agent,
                    cue: AnimationCue::Death,
                });
                effects.write(EffectCommand::sound(command.agent, SoundCue::Knockout));
                crate::log_info(&format!("☠️ {:?} knocked out", command.agent));
            }
        }
    }
}
