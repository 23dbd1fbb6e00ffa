//! Player sequence timers.

use bevy::prelude::*;

use super::CombatSink;
use crate::clock::TimeDomain;
use crate::combat::{CombatConfig, CombatOutputs, PlayerCombat, PlayerPose};
use crate::components::Player;
use crate::registry::Roster;

/// System: attack/counter/damage на scaled time, finisher на real time
///
/// Запускается до input'ов: секвенция, начатая в тике t, впервые тикает в t+1.
pub fn tick_player_sequences(
    config: Res<CombatConfig>,
    mut roster: Roster,
    mut players: Query<(Entity, &Transform, &mut PlayerCombat), With<Player>>,
    mut sink: CombatSink,
) {
    let Ok((entity, transform, mut combat)) = players.single_mut() else {
        return;
    };
    let pose = PlayerPose {
        entity,
        position: transform.translation,
    };

    let clock = sink.clock();
    let scaled = clock.delta(TimeDomain::Scaled);
    let real = clock.delta(TimeDomain::Real);

    let mut out = CombatOutputs::default();
    combat.tick(scaled, real, pose, &mut roster, &config, &mut out);
    sink.publish(out);
}
