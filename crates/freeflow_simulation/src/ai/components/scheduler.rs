//! Attack Scheduler: бесконечный loop "ходов" врагов.
//!
//! Один логический loop, без рекурсии: каждый ход проходит
//! Starting → Pacing → Gating → Resolving → Cooldown → Starting (с exclude = прошлый атакующий).
//! Остановка = просто перестаём переходить в следующий ход.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::ai::{AgentCommand, AgentCommandKind};
use crate::clock::tick_down;
use crate::components::AgentState;
use crate::registry::RosterView;

/// Pacing parameters (scaled seconds).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Pause before picking an attacker: uniform in [pace_min, pace_max].
    pub pace_min: f32,
    pub pace_max: f32,
    /// Pause after the retreat command: uniform in [cooldown_min, cooldown_max].
    pub cooldown_min: f32,
    pub cooldown_max: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pace_min: 0.5,
            pace_max: 1.5,
            cooldown_min: 0.0,
            cooldown_max: 0.5,
        }
    }
}

/// Eligibility waits, evaluated in this order. Each one is passed once and
/// never re-checked after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EligibilityGate {
    NotRetreating,
    NotLockedByPlayer,
    NotStunned,
}

impl EligibilityGate {
    pub fn blocks(self, state: &AgentState) -> bool {
        match self {
            EligibilityGate::NotRetreating => state.retreating,
            EligibilityGate::NotLockedByPlayer => state.locked_by_player,
            EligibilityGate::NotStunned => state.stunned,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            EligibilityGate::NotRetreating => Some(EligibilityGate::NotLockedByPlayer),
            EligibilityGate::NotLockedByPlayer => Some(EligibilityGate::NotStunned),
            EligibilityGate::NotStunned => None,
        }
    }
}

/// Scheduler loop phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TurnPhase {
    /// Termination check, then roll the pacing delay.
    Starting { exclude: Option<Entity> },
    Pacing { remaining: f32, exclude: Option<Entity> },
    Gating { attacker: Entity, gate: EligibilityGate },
    /// Waiting for the attacker's windup to finish.
    Resolving { attacker: Entity },
    Cooldown { remaining: f32, attacker: Entity },
    /// Nobody available when picking. Resumable via `StartAttackLoop`.
    Stopped,
    /// Nobody alive. Resumable via `StartAttackLoop`.
    Terminated,
}

/// Enemy attack turn arbitration.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct AttackScheduler {
    phase: TurnPhase,
    turns_started: u64,
}

impl Default for AttackScheduler {
    fn default() -> Self {
        Self {
            phase: TurnPhase::Starting { exclude: None },
            turns_started: 0,
        }
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

impl AttackScheduler {
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn turns_started(&self) -> u64 {
        self.turns_started
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.phase, TurnPhase::Stopped | TurnPhase::Terminated)
    }

    /// Agent currently holding the turn (gated, attacking or cooling down).
    pub fn current_attacker(&self) -> Option<Entity> {
        match self.phase {
            TurnPhase::Gating { attacker, .. }
            | TurnPhase::Resolving { attacker }
            | TurnPhase::Cooldown { attacker, .. } => Some(attacker),
            _ => None,
        }
    }

    /// StartAI: fresh turn, no exclusion. Replaces whatever turn was in flight.
    pub fn restart(&mut self) {
        self.phase = TurnPhase::Starting { exclude: None };
    }

    /// Advance the loop by one tick of scaled time.
    ///
    /// Returns at most one command per tick. Phases that do not wait on time or
    /// predicates resolve within the same tick.
    pub fn tick<R: RosterView + ?Sized>(
        &mut self,
        delta: f32,
        roster: &mut R,
        config: &SchedulerConfig,
    ) -> Option<AgentCommand> {
        loop {
            match self.phase {
                TurnPhase::Starting { exclude } => {
                    if roster.alive_count() == 0 {
                        crate::log_info("🏁 Scheduler: no agents alive, attack loop terminated");
                        self.phase = TurnPhase::Terminated;
                        return None;
                    }
                    let remaining = roll(roster.rng(), config.pace_min, config.pace_max);
                    self.turns_started += 1;
                    crate::log(&format!(
                        "⏳ Scheduler: turn #{} pacing {:.2}s (exclude: {:?})",
                        self.turns_started, remaining, exclude
                    ));
                    self.phase = TurnPhase::Pacing { remaining, exclude };
                    return None;
                }

                TurnPhase::Pacing { mut remaining, exclude } => {
                    if !tick_down(&mut remaining, delta) {
                        self.phase = TurnPhase::Pacing { remaining, exclude };
                        return None;
                    }

                    // Soft anti-repeat: fall back to anyone available
                    let picked = roster
                        .pick_random(exclude)
                        .or_else(|| roster.pick_random(None));

                    let Some(attacker) = picked else {
                        crate::log_warning("⚠️ Scheduler: no available agent, attack loop stopped");
                        self.phase = TurnPhase::Stopped;
                        return None;
                    };

                    crate::log(&format!("🎯 Scheduler: picked {:?}", attacker));
                    self.phase = TurnPhase::Gating {
                        attacker,
                        gate: EligibilityGate::NotRetreating,
                    };
                }

                TurnPhase::Gating { attacker, gate } => {
                    let Some(agent) = roster.agent(attacker).filter(|agent| agent.is_alive()) else {
                        crate::log_warning(&format!(
                            "⚠️ Scheduler: {:?} died while waiting for its turn, turn abandoned",
                            attacker
                        ));
                        self.phase = TurnPhase::Starting {
                            exclude: Some(attacker),
                        };
                        continue;
                    };

                    let mut gate = gate;
                    loop {
                        if gate.blocks(&agent.state) {
                            self.phase = TurnPhase::Gating { attacker, gate };
                            return None;
                        }
                        match gate.next() {
                            Some(next) => gate = next,
                            None => break,
                        }
                    }

                    crate::log(&format!("⚔️ Scheduler: {:?} begins attack", attacker));
                    self.phase = TurnPhase::Resolving { attacker };
                    return Some(AgentCommand::new(attacker, AgentCommandKind::BeginAttack));
                }

                TurnPhase::Resolving { attacker } => {
                    let agent = roster.agent(attacker);
                    if agent.is_some_and(|agent| agent.state.preparing_attack) {
                        return None;
                    }

                    let remaining = roll(roster.rng(), config.cooldown_min, config.cooldown_max);
                    self.phase = TurnPhase::Cooldown { remaining, attacker };

                    if agent.is_some_and(|agent| agent.is_alive()) {
                        crate::log(&format!(
                            "↩️ Scheduler: {:?} attack resolved, retreat (cooldown {:.2}s)",
                            attacker, remaining
                        ));
                        return Some(AgentCommand::new(attacker, AgentCommandKind::BeginRetreat));
                    }
                    return None;
                }

                TurnPhase::Cooldown { mut remaining, attacker } => {
                    if !tick_down(&mut remaining, delta) {
                        self.phase = TurnPhase::Cooldown { remaining, attacker };
                        return None;
                    }

                    if roster.alive_count() == 0 {
                        crate::log_info("🏁 Scheduler: last agent down, attack loop terminated");
                        self.phase = TurnPhase::Terminated;
                        return None;
                    }
                    self.phase = TurnPhase::Starting {
                        exclude: Some(attacker),
                    };
                }

                TurnPhase::Stopped | TurnPhase::Terminated => return None,
            }
        }
    }
}
