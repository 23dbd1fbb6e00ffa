//! Player control marker + locomotion state
//!
//! Отмечает entity которым управляет игрок. Locomotion читает движок
//! (walk/jump сами по себе вне ядра), ядро только включает/выключает ввод
//! и разгоняет acceleration после боевых секвенций.

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// # Single-player
/// Ядро ожидает ровно одного игрока; системы используют `single_mut()` и
/// тихо выходят, если игрока нет.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(crate::combat::PlayerCombat, Locomotion, Transform)]
pub struct Player;

/// Locomotion gate shared by every player sequence.
///
/// `enabled` is derived: the locomotion system disables it while any combat
/// sequence holds control and re-enables it (with an acceleration ramp) once
/// the last hold is gone.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    pub enabled: bool,
    /// Movement acceleration multiplier, 0..=1.
    pub acceleration: f32,
    ramp: Option<AccelerationRamp>,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            enabled: true,
            acceleration: 1.0,
            ramp: None,
        }
    }
}

/// Smoothed 0 → 1 acceleration ease (ease-out quad).
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct AccelerationRamp {
    pub elapsed: f32,
    pub duration: f32,
}

impl AccelerationRamp {
    pub fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        1.0 - (1.0 - t) * (1.0 - t)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + crate::clock::TIMER_EPSILON >= self.duration
    }
}

impl Locomotion {
    /// A sequence took control: input off, acceleration snapped to zero.
    pub fn hold(&mut self) {
        self.enabled = false;
        self.acceleration = 0.0;
        self.ramp = None;
    }

    /// Last hold released: input back on, acceleration eases in from zero.
    pub fn release(&mut self, ramp_duration: f32) {
        self.enabled = true;
        self.acceleration = 0.0;
        self.ramp = Some(AccelerationRamp {
            elapsed: 0.0,
            duration: ramp_duration,
        });
        if ramp_duration <= 0.0 {
            self.acceleration = 1.0;
            self.ramp = None;
        }
    }

    pub fn is_ramping(&self) -> bool {
        self.ramp.is_some()
    }

    /// Advance the acceleration ramp (scaled time).
    pub fn tick(&mut self, delta: f32) {
        let Some(ramp) = self.ramp.as_mut() else {
            return;
        };
        ramp.elapsed += delta;
        self.acceleration = ramp.value();
        if ramp.is_finished() {
            self.acceleration = 1.0;
            self.ramp = None;
        }
    }
}
