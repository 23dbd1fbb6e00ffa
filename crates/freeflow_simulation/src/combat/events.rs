//! Combat events: входы игрока и боевые сенсоры движка.

use bevy::prelude::*;

/// Discrete player combat input.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum CombatInput {
    Attack,
    Counter,
}

/// Player's strike connected (engine hitbox / animation event).
///
/// Цель не передаётся: удар всегда идёт в текущий lock-on.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitLanded;

/// An agent's strike reached the player.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageTaken {
    pub attacker: Entity,
}
