//! Player input systems: attack/counter, landed hits, incoming damage.

use bevy::prelude::*;

use super::CombatSink;
use crate::combat::{
    CombatConfig, CombatInput, CombatOutputs, DamageTaken, HitLanded, PlayerCombat, PlayerPose,
    TargetDetection,
};
use crate::components::Player;
use crate::registry::Roster;

/// System: CombatInput → target resolution + sequences
///
/// Несколько input'ов за тик обрабатываются по порядку: второй attack
/// в том же тике уже упрётся в `is_attacking`.
pub fn handle_combat_input(
    mut inputs: EventReader<CombatInput>,
    detection: Res<TargetDetection>,
    config: Res<CombatConfig>,
    mut roster: Roster,
    mut players: Query<(Entity, &Transform, &mut PlayerCombat), With<Player>>,
    mut sink: CombatSink,
) {
    let Ok((entity, transform, mut combat)) = players.single_mut() else {
        inputs.clear();
        return;
    };
    let pose = PlayerPose {
        entity,
        position: transform.translation,
    };

    let mut out = CombatOutputs::default();
    for input in inputs.read() {
        match input {
            CombatInput::Attack => {
                combat.on_attack_input(pose, &detection, &mut roster, &config, &mut out);
            }
            CombatInput::Counter => {
                combat.on_counter_input(pose, &mut roster, &config, &mut out);
            }
        }
    }
    sink.publish(out);
}

/// System: HitLanded → Hit команда lock-on цели
pub fn handle_hit_landed(
    mut hits: EventReader<HitLanded>,
    mut roster: Roster,
    mut players: Query<(Entity, &Transform, &mut PlayerCombat), With<Player>>,
    mut sink: CombatSink,
) {
    let Ok((entity, transform, mut combat)) = players.single_mut() else {
        hits.clear();
        return;
    };
    let pose = PlayerPose {
        entity,
        position: transform.translation,
    };

    let mut out = CombatOutputs::default();
    for _ in hits.read() {
        combat.on_hit_landed(pose, &mut roster, &mut out);
    }
    sink.publish(out);
}

/// System: DamageTaken → hit reaction (locomotion lockout)
pub fn handle_damage_taken(
    mut damage_events: EventReader<DamageTaken>,
    config: Res<CombatConfig>,
    mut players: Query<(Entity, &Transform, &mut PlayerCombat), With<Player>>,
    mut sink: CombatSink,
) {
    let Ok((entity, transform, mut combat)) = players.single_mut() else {
        damage_events.clear();
        return;
    };
    let pose = PlayerPose {
        entity,
        position: transform.translation,
    };

    let mut out = CombatOutputs::default();
    for event in damage_events.read() {
        combat.on_damage_taken(event.attacker, pose, &config, &mut out);
    }
    sink.publish(out);
}
