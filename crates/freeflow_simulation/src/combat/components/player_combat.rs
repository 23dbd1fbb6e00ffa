//! Player Combat Controller.
//!
//! Два входа (attack, counter) → выбор цели → timed секвенции + команды агентам.
//! Чистая логика: всё, что должно уйти наружу (эффекты, команды агентам,
//! time scale), собирается в `CombatOutputs`, системы потом публикуют.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::detection::TargetDetection;
use super::sequences::{AttackSequence, CounterSequence, DamageSequence, FinisherSequence};
use crate::ai::{AgentCommand, AgentCommandKind};
use crate::components::AgentSnapshot;
use crate::effects::{approach_point, AnimationCue, EffectCommand, SoundCue, COMBO};
use crate::registry::RosterView;

// ============================================================================
// Config
// ============================================================================

/// Player combat tuning. Durations are scaled seconds unless noted.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub attack_cooldown: f32,
    pub air_attack_cooldown: f32,
    /// Overrides the attack cooldown on a final blow.
    pub final_blow_cooldown: f32,
    /// Locomotion stays held this long after the strike phase.
    pub recovery_delay: f32,
    /// Targets at or beyond this distance get an air attack instead.
    pub engagement_range: f32,
    /// Counters beyond this distance degrade to a plain attack.
    pub counter_range: f32,
    pub input_deadzone: f32,
    pub dodge_duration: f32,
    pub approach_duration: f32,
    pub look_at_duration: f32,
    /// Approach stops this far short of the target.
    pub target_offset: f32,
    pub damage_lockout: f32,
    pub acceleration_ramp: f32,
    pub final_blow_time_scale: f32,
    /// Real seconds.
    pub final_blow_hold: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_cooldown: 0.5,
            air_attack_cooldown: 0.2,
            final_blow_cooldown: 1.5,
            recovery_delay: 0.2,
            engagement_range: 15.0,
            counter_range: 2.0,
            input_deadzone: 0.2,
            dodge_duration: 0.2,
            approach_duration: 0.65,
            look_at_duration: 0.2,
            target_offset: 0.95,
            damage_lockout: 0.5,
            acceleration_ramp: 0.6,
            final_blow_time_scale: 0.5,
            final_blow_hold: 2.0,
        }
    }
}

// ============================================================================
// Controller I/O
// ============================================================================

/// Player entity + position for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPose {
    pub entity: Entity,
    pub position: Vec3,
}

/// Everything the controller wants done outside itself, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombatOutputs {
    pub effects: Vec<EffectCommand>,
    pub agent_commands: Vec<AgentCommand>,
    /// New global time scale, applied by the system via `SimulationClock`.
    pub time_scale: Option<f32>,
}

impl CombatOutputs {
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.agent_commands.is_empty() && self.time_scale.is_none()
    }

    fn command(&mut self, agent: Entity, kind: AgentCommandKind) {
        self.agent_commands.push(AgentCommand::new(agent, kind));
    }
}

// ============================================================================
// Player Combat Component
// ============================================================================

/// Player combat state machine.
///
/// Инвариант: `attack` в фазе Striking и `counter` никогда не активны одновременно
/// (counter стартует только когда не атакуем, attack input игнорируется во время counter).
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PlayerCombat {
    /// Canonical lock-on.
    pub locked_target: Option<Entity>,
    /// Index into `COMBO` of the last combo attack.
    pub combo_index: usize,
    pub attack: Option<AttackSequence>,
    pub counter: Option<CounterSequence>,
    pub damage: Option<DamageSequence>,
    pub finisher: Option<FinisherSequence>,
}

impl PlayerCombat {
    pub fn is_attacking(&self) -> bool {
        self.attack.is_some_and(|attack| attack.is_attacking())
    }

    pub fn is_countering(&self) -> bool {
        self.counter.is_some()
    }

    pub fn is_finishing(&self) -> bool {
        self.finisher.is_some()
    }

    /// True while any sequence holds locomotion control.
    pub fn holds_locomotion(&self) -> bool {
        self.attack.is_some() || self.counter.is_some() || self.damage.is_some()
    }

    /// Drop the lock-on if it points at `agent`.
    pub fn release_lock(&mut self, agent: Entity) -> bool {
        if self.locked_target != Some(agent) {
            return false;
        }
        self.locked_target = None;
        true
    }

    // ------------------------------------------------------------------------
    // Inputs
    // ------------------------------------------------------------------------

    /// Attack input: resolve the target, then attack it.
    ///
    /// Returns `false` if the input was ignored (attack or counter in flight).
    pub fn on_attack_input<R: RosterView + ?Sized>(
        &mut self,
        pose: PlayerPose,
        detection: &TargetDetection,
        roster: &mut R,
        config: &CombatConfig,
        out: &mut CombatOutputs,
    ) -> bool {
        if self.is_attacking() || self.is_countering() {
            crate::log("🚫 Attack input ignored (sequence in flight)");
            return false;
        }

        // Старый lock-on переиспользуется только пока агент доступен
        if self
            .locked_target
            .is_some_and(|agent| !roster.is_available(agent))
        {
            self.locked_target = None;
        }

        // Сенсор может держать агента, которого уже сняли с доступных
        let sensed = detection
            .current_target
            .filter(|agent| roster.is_available(*agent));

        if sensed.is_none() {
            if roster.alive_count() == 0 {
                self.resolve_attack(None, pose, roster, config, out);
                return true;
            }
            self.locked_target = roster.pick_random(None);
        }

        // Направленный ввод: берём цель из detection
        if detection.input_magnitude > config.input_deadzone {
            self.locked_target = sensed;
        }

        if self.locked_target.is_none() {
            self.locked_target = roster.pick_random(None);
        }

        self.resolve_attack(self.locked_target, pose, roster, config, out);
        true
    }

    /// Counter input: dodge the closest winding-up agent and strike back.
    ///
    /// Returns `false` if the input was ignored.
    pub fn on_counter_input<R: RosterView + ?Sized>(
        &mut self,
        pose: PlayerPose,
        roster: &mut R,
        config: &CombatConfig,
        out: &mut CombatOutputs,
    ) -> bool {
        if self.is_countering() || self.is_attacking() || !roster.any_preparing_attack() {
            return false;
        }

        // Direct assignment: availability не проверяется
        let target = roster.closest_preparing_attacker(pose.position);
        self.locked_target = Some(target);
        out.command(target, AgentCommandKind::Countered);

        let Some(agent) = roster.agent(target) else {
            return true;
        };

        let distance = pose.position.distance(agent.position);
        if distance > config.counter_range {
            crate::log(&format!(
                "↪️ Counter on {:?} at {:.2} > {:.2}, degraded to attack",
                target, distance, config.counter_range
            ));
            self.resolve_attack(Some(target), pose, roster, config, out);
            return true;
        }

        let duration = config.dodge_duration;
        out.effects.push(EffectCommand::Animate {
            entity: pose.entity,
            cue: AnimationCue::Dodging,
        });
        out.effects.push(EffectCommand::sound(pose.entity, SoundCue::Counter));
        out.effects.push(EffectCommand::LookAt {
            entity: pose.entity,
            target: agent.position,
            duration,
        });
        out.effects.push(EffectCommand::MoveTo {
            entity: pose.entity,
            destination: pose.position + agent.forward,
            duration,
        });

        self.counter = Some(CounterSequence::new(duration));
        crate::log(&format!("🔄 Counter on {:?} ({:.2}s dodge)", target, duration));
        true
    }

    /// The player's strike connected with the locked target.
    pub fn on_hit_landed<R: RosterView + ?Sized>(
        &mut self,
        pose: PlayerPose,
        roster: &mut R,
        out: &mut CombatOutputs,
    ) {
        let Some(target) = self.locked_target else {
            return;
        };
        if roster.alive_count() == 0 {
            return;
        }

        out.command(target, AgentCommandKind::Hit);
        out.effects.push(EffectCommand::sound(pose.entity, SoundCue::Hit));
    }

    /// An agent's strike reached the player. Replaces any in-flight hit reaction.
    pub fn on_damage_taken(
        &mut self,
        attacker: Entity,
        pose: PlayerPose,
        config: &CombatConfig,
        out: &mut CombatOutputs,
    ) {
        out.effects.push(EffectCommand::Animate {
            entity: pose.entity,
            cue: AnimationCue::Hit,
        });
        self.damage = Some(DamageSequence::new(config.damage_lockout));
        crate::log(&format!("🩸 Player hit by {:?}", attacker));
    }

    // ------------------------------------------------------------------------
    // Sequences
    // ------------------------------------------------------------------------

    /// Advance every in-flight sequence by one tick.
    pub fn tick<R: RosterView + ?Sized>(
        &mut self,
        scaled_delta: f32,
        real_delta: f32,
        pose: PlayerPose,
        roster: &mut R,
        config: &CombatConfig,
        out: &mut CombatOutputs,
    ) {
        if let Some(attack) = self.attack.as_mut() {
            if attack.tick(scaled_delta, config.recovery_delay) {
                self.attack = None;
            }
        }

        if let Some(damage) = self.damage.as_mut() {
            if damage.tick(scaled_delta) {
                self.damage = None;
            }
        }

        if let Some(counter) = self.counter.as_mut() {
            if counter.tick(scaled_delta) {
                // Флаг снимаем до follow-up атаки: иначе attack и counter пересеклись бы
                self.counter = None;
                self.resolve_attack(self.locked_target, pose, roster, config, out);
            }
        }

        if let Some(finisher) = self.finisher.as_mut() {
            if finisher.tick(real_delta) {
                let focus = finisher.focus;
                self.finisher = None;
                out.time_scale = Some(1.0);
                out.effects.push(EffectCommand::FinisherCamera {
                    active: false,
                    focus,
                });
                crate::log_info("🎬 Final blow sequence over, time scale restored");
            }
        }
    }

    // ------------------------------------------------------------------------
    // Attack resolution
    // ------------------------------------------------------------------------

    /// Attack `target`: combo / final blow in range, air attack otherwise.
    pub fn resolve_attack<R: RosterView + ?Sized>(
        &mut self,
        target: Option<Entity>,
        pose: PlayerPose,
        roster: &mut R,
        config: &CombatConfig,
        out: &mut CombatOutputs,
    ) {
        let Some((target, agent)) = target.and_then(|t| roster.agent(t).map(|agent| (t, agent))) else {
            if target.is_some() {
                self.locked_target = None;
            }
            self.air_attack(pose, config, out);
            return;
        };

        let distance = pose.position.distance(agent.position);
        if distance >= config.engagement_range {
            crate::log(&format!(
                "📏 {:?} out of range ({:.2} ≥ {:.2}), lock cleared",
                target, distance, config.engagement_range
            ));
            self.locked_target = None;
            self.air_attack(pose, config, out);
            return;
        }

        self.locked_target = Some(target);
        let final_blow = is_final_blow(&agent, roster);

        let (cue, cooldown) = if final_blow {
            // Финальный удар: случайный вариант, combo index не двигаем
            let cue = COMBO[roster.rng().gen_range(0..COMBO.len())];
            (cue, config.final_blow_cooldown)
        } else {
            self.combo_index = (self.combo_index + 1) % COMBO.len();
            (COMBO[self.combo_index], config.attack_cooldown)
        };

        out.effects.push(EffectCommand::Animate {
            entity: pose.entity,
            cue,
        });
        self.attack = Some(AttackSequence::new(cooldown));

        if final_blow {
            self.start_finisher(pose, agent.position, config, out);
        }

        out.command(target, AgentCommandKind::StopMoving);
        out.command(target, AgentCommandKind::PlayerApproaching);
        out.effects.push(EffectCommand::LookAt {
            entity: pose.entity,
            target: agent.position,
            duration: config.look_at_duration,
        });
        out.effects.push(EffectCommand::MoveTo {
            entity: pose.entity,
            destination: approach_point(pose.position, agent.position, config.target_offset),
            duration: config.approach_duration,
        });

        crate::log(&format!(
            "👊 {:?} on {:?} (distance {:.2}, cooldown {:.2}s)",
            cue, target, distance, cooldown
        ));
    }

    fn air_attack(&mut self, pose: PlayerPose, config: &CombatConfig, out: &mut CombatOutputs) {
        out.effects.push(EffectCommand::Animate {
            entity: pose.entity,
            cue: AnimationCue::AirPunch,
        });
        self.attack = Some(AttackSequence::new(config.air_attack_cooldown));
        crate::log("💨 Air attack (no target)");
    }

    fn start_finisher(
        &mut self,
        pose: PlayerPose,
        focus: Vec3,
        config: &CombatConfig,
        out: &mut CombatOutputs,
    ) {
        self.finisher = Some(FinisherSequence::new(config.final_blow_hold, focus));
        out.effects.push(EffectCommand::sound(pose.entity, SoundCue::Finishing));
        out.time_scale = Some(config.final_blow_time_scale);
        out.effects.push(EffectCommand::FinisherCamera { active: true, focus });
        crate::log_info(&format!(
            "🎬 Final blow! time scale {} for {}s real time",
            config.final_blow_time_scale, config.final_blow_hold
        ));
    }
}

/// Exactly one agent alive and the target is on its last health point.
fn is_final_blow<R: RosterView + ?Sized>(target: &AgentSnapshot, roster: &mut R) -> bool {
    roster.alive_count() == 1 && target.health <= 1
}
