//! Effector commands (ECS → engine)
//!
//! Fire-and-forget: ядро пишет `EffectCommand`, движок проигрывает анимации,
//! звук, твины и камеру. Ничего из этого не возвращается обратно в ядро.

use bevy::prelude::*;

/// Named animation states the core can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationCue {
    OverhandKick,
    RoundJumpKick,
    FlyingKick,
    FlyingKnee,
    /// No-target swing (nothing in range / nothing alive).
    AirPunch,
    Dodging,
    Hit,
    Death,
}

/// Rotating combo list (fixed order, 4 entries).
pub const COMBO: [AnimationCue; 4] = [
    AnimationCue::OverhandKick,
    AnimationCue::RoundJumpKick,
    AnimationCue::FlyingKick,
    AnimationCue::FlyingKnee,
];

/// Named audio cues. Clip selection is the engine's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum SoundCue {
    /// Random impact clip
    Hit,
    Finishing,
    Counter,
    Knockout,
}

impl SoundCue {
    /// Volume hint for one-shot playback.
    pub fn volume(self) -> f32 {
        match self {
            SoundCue::Hit => 1.0,
            SoundCue::Finishing => 3.0,
            SoundCue::Counter => 2.0,
            SoundCue::Knockout => 0.4,
        }
    }
}

/// Effector command emitted by the arbitration core.
#[derive(Event, Debug, Clone, PartialEq)]
pub enum EffectCommand {
    Animate {
        entity: Entity,
        cue: AnimationCue,
    },
    /// One-shot cue at `volume` (see `SoundCue::volume`).
    PlaySound {
        entity: Entity,
        cue: SoundCue,
        volume: f32,
    },
    /// Tween `entity` to `destination` over `duration` (scaled seconds).
    MoveTo {
        entity: Entity,
        destination: Vec3,
        duration: f32,
    },
    /// Rotate `entity` to face `target` over `duration`.
    LookAt {
        entity: Entity,
        target: Vec3,
        duration: f32,
    },
    /// Stop any locomotion of `entity`.
    Halt { entity: Entity },
    /// Toggle the finishing close-up camera.
    FinisherCamera { active: bool, focus: Vec3 },
}

impl EffectCommand {
    /// `PlaySound` with the cue's default volume.
    pub fn sound(entity: Entity, cue: SoundCue) -> Self {
        EffectCommand::PlaySound {
            entity,
            cue,
            volume: cue.volume(),
        }
    }
}

/// Point `offset` units short of `target` along the target → origin line.
///
/// Никогда не проскакивает origin: если дистанция меньше offset, возвращает origin.
pub fn approach_point(origin: Vec3, target: Vec3, offset: f32) -> Vec3 {
    let to_origin = origin - target;
    let distance = to_origin.length();
    if distance <= offset || distance <= f32::EPSILON {
        return origin;
    }
    target + to_origin / distance * offset
}
