//! Target detection sensor.

use bevy::prelude::*;

/// What the engine's targeting subsystem currently senses.
///
/// Только сенсор: канонический lock-on живёт в `PlayerCombat::locked_target`.
/// Движок пишет сюда каждый кадр.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetDetection {
    /// Agent under the directional detection cone, if any.
    pub current_target: Option<Entity>,
    /// Directional input stick magnitude, 0..=1.
    pub input_magnitude: f32,
}

impl TargetDetection {
    /// Forget `agent` if it is the sensed target. Returns true if something was cleared.
    pub fn forget(&mut self, agent: Entity) -> bool {
        if self.current_target != Some(agent) {
            return false;
        }
        self.current_target = None;
        true
    }
}
