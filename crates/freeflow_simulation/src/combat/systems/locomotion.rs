//! Locomotion gate: выводится из живых секвенций игрока.

use bevy::prelude::*;

use crate::clock::{SimulationClock, TimeDomain};
use crate::combat::{CombatConfig, PlayerCombat};
use crate::components::{Locomotion, Player};

/// System: hold/release locomotion + acceleration ramp
///
/// Пока хоть одна секвенция держит контроль, ввод выключен и acceleration = 0.
/// Последняя отпустила → ввод включён, acceleration разгоняется 0 → 1.
/// Отменённая секвенция просто исчезает, так что "забыть включить обратно" невозможно.
pub fn apply_locomotion(
    clock: Res<SimulationClock>,
    config: Res<CombatConfig>,
    mut players: Query<(&PlayerCombat, &mut Locomotion), With<Player>>,
) {
    let delta = clock.delta(TimeDomain::Scaled);

    for (combat, mut locomotion) in players.iter_mut() {
        if combat.holds_locomotion() {
            if locomotion.enabled || locomotion.acceleration > 0.0 {
                locomotion.hold();
                crate::log("🔒 Locomotion held");
            }
            continue;
        }

        if !locomotion.enabled {
            locomotion.release(config.acceleration_ramp);
            crate::log("🔓 Locomotion released, ramping acceleration");
            continue;
        }

        if locomotion.is_ramping() {
            locomotion.tick(delta);
        }
    }
}
