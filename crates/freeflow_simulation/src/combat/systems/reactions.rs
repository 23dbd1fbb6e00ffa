//! Reactions to roster changes.

use bevy::prelude::*;

use crate::combat::{PlayerCombat, TargetDetection};
use crate::components::Player;
use crate::registry::AvailabilityChanged;

/// System: агент снят с доступных → сбрасываем lock-on (и сенсор), если это он
pub fn release_lock_on_unavailable(
    mut availability_events: EventReader<AvailabilityChanged>,
    mut players: Query<&mut PlayerCombat, With<Player>>,
    mut detection: ResMut<TargetDetection>,
) {
    for event in availability_events.read() {
        if event.available {
            continue;
        }

        for mut combat in players.iter_mut() {
            if combat.release_lock(event.agent) {
                crate::log(&format!("🎯 Lock-on on {:?} released (unavailable)", event.agent));
            }
        }
        detection.forget(event.agent);
    }
}
