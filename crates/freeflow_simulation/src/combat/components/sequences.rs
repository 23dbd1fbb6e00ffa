//! Timed player sequences.
//!
//! Каждая секвенция = phase + timer, как `MeleeAttackState`. Новая секвенция
//! того же вида просто заменяет старую (latest wins): никакой ручной очистки,
//! locomotion выводится из того, какие секвенции ещё живы.

use bevy::prelude::*;

use crate::clock::{tick_down, TIMER_EPSILON};

/// Attack sequence phases.
///
/// - **Striking**: `is_attacking == true` for the attack's cooldown
/// - **Recovering**: not attacking anymore, locomotion still held for the recovery delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackPhase {
    Striking,
    Recovering,
}

/// Player attack in flight (combo, final blow or air attack).
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AttackSequence {
    pub phase: AttackPhase,
    /// Scaled seconds left in the current phase.
    pub phase_timer: f32,
}

impl AttackSequence {
    pub fn new(cooldown: f32) -> Self {
        Self {
            phase: AttackPhase::Striking,
            phase_timer: cooldown,
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.phase, AttackPhase::Striking)
    }

    /// Advance by `delta`. Returns `true` when the whole sequence is over.
    ///
    /// Striking → Recovering carries leftover time into the recovery delay.
    pub fn tick(&mut self, delta: f32, recovery_delay: f32) -> bool {
        if !tick_down(&mut self.phase_timer, delta) {
            return false;
        }
        match self.phase {
            AttackPhase::Striking => {
                self.phase = AttackPhase::Recovering;
                self.phase_timer += recovery_delay;
                self.phase_timer <= TIMER_EPSILON
            }
            AttackPhase::Recovering => true,
        }
    }
}

/// Counter dodge in flight. Ends with a follow-up attack on the locked target.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct CounterSequence {
    pub timer: f32,
}

impl CounterSequence {
    pub fn new(duration: f32) -> Self {
        Self { timer: duration }
    }

    pub fn tick(&mut self, delta: f32) -> bool {
        tick_down(&mut self.timer, delta)
    }
}

/// Hit reaction: locomotion lockout after taking damage.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DamageSequence {
    pub timer: f32,
}

impl DamageSequence {
    pub fn new(lockout: f32) -> Self {
        Self { timer: lockout }
    }

    pub fn tick(&mut self, delta: f32) -> bool {
        tick_down(&mut self.timer, delta)
    }
}

/// Slow-motion finishing close-up.
///
/// Единственная секвенция на real time: slow motion не растягивает hold.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct FinisherSequence {
    pub real_timer: f32,
    pub focus: Vec3,
}

impl FinisherSequence {
    pub fn new(hold: f32, focus: Vec3) -> Self {
        Self {
            real_timer: hold,
            focus,
        }
    }

    pub fn tick(&mut self, real_delta: f32) -> bool {
        tick_down(&mut self.real_timer, real_delta)
    }
}
