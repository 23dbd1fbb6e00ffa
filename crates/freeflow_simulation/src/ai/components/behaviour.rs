//! Reference agent behaviour: таймеры и реакция на `AgentCommand`.
//!
//! Движок может заменить это своим поведением; ядру важно только, чтобы
//! предикаты `AgentState` менялись в ответ на команды.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::AgentCommandKind;
use crate::clock::tick_down;
use crate::components::{AgentState, Health};

/// Durations of the reference behaviour (scaled seconds).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentBehaviourConfig {
    /// BeginAttack → strike.
    pub windup_duration: f32,
    pub retreat_duration: f32,
    pub stun_duration: f32,
    /// How long `locked_by_player` stays up after PlayerApproaching.
    pub lock_duration: f32,
    pub max_health: u32,
}

impl Default for AgentBehaviourConfig {
    fn default() -> Self {
        Self {
            windup_duration: 1.0,
            retreat_duration: 0.8,
            stun_duration: 0.5,
            lock_duration: 1.0,
            max_health: 3,
        }
    }
}

/// What a command did to the agent, so the system can emit side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Dead agent or nothing to cancel.
    Ignored,
    Applied,
    /// StopMoving: engine must stop the agent's movement.
    Halted,
    Stunned,
    /// Health reached 0 on this hit.
    Died,
}

/// Active behaviour timers. `None` = не идёт.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AgentTimers {
    pub windup: Option<f32>,
    pub retreat: Option<f32>,
    pub stun: Option<f32>,
    pub lock: Option<f32>,
}

/// Decrement a timer; `true` when it expired this tick.
fn countdown(timer: &mut Option<f32>, delta: f32) -> bool {
    let Some(remaining) = timer.as_mut() else {
        return false;
    };
    if tick_down(remaining, delta) {
        *timer = None;
        return true;
    }
    false
}

impl AgentTimers {
    fn cancel_windup(&mut self, state: &mut AgentState) {
        state.preparing_attack = false;
        self.windup = None;
    }

    /// Apply a command to the agent's predicates.
    pub fn apply(
        &mut self,
        kind: AgentCommandKind,
        state: &mut AgentState,
        health: &mut Health,
        config: &AgentBehaviourConfig,
    ) -> CommandOutcome {
        if !state.is_alive() {
            return CommandOutcome::Ignored;
        }

        match kind {
            AgentCommandKind::BeginAttack => {
                state.preparing_attack = true;
                self.windup = Some(config.windup_duration);
                CommandOutcome::Applied
            }
            AgentCommandKind::BeginRetreat => {
                self.cancel_windup(state);
                state.retreating = true;
                self.retreat = Some(config.retreat_duration);
                CommandOutcome::Applied
            }
            AgentCommandKind::StopMoving => CommandOutcome::Halted,
            AgentCommandKind::PlayerApproaching => {
                self.cancel_windup(state);
                state.locked_by_player = true;
                self.lock = Some(config.lock_duration);
                CommandOutcome::Applied
            }
            AgentCommandKind::Countered => {
                if !state.preparing_attack {
                    return CommandOutcome::Ignored;
                }
                self.cancel_windup(state);
                CommandOutcome::Applied
            }
            AgentCommandKind::Hit => {
                // Удар сбивает замах и lock
                self.cancel_windup(state);
                state.locked_by_player = false;
                self.lock = None;

                health.take_damage(1);
                if !health.is_alive() {
                    *state = AgentState {
                        active: false,
                        retreating: false,
                        locked_by_player: false,
                        stunned: false,
                        preparing_attack: false,
                    };
                    *self = AgentTimers::default();
                    return CommandOutcome::Died;
                }

                state.stunned = true;
                self.stun = Some(config.stun_duration);
                CommandOutcome::Stunned
            }
        }
    }

    /// Advance all timers. Returns `true` when the windup ran out (strike released).
    pub fn tick(&mut self, delta: f32, state: &mut AgentState) -> bool {
        if countdown(&mut self.retreat, delta) {
            state.retreating = false;
        }
        if countdown(&mut self.stun, delta) {
            state.stunned = false;
        }
        if countdown(&mut self.lock, delta) {
            state.locked_by_player = false;
        }

        let strike = countdown(&mut self.windup, delta);
        if strike {
            state.preparing_attack = false;
        }
        strike
    }
}
