//! Simulation clock: единственный владелец time scale.
//!
//! Fixed tick всегда равен одному реальному timestep. Геймплейные таймеры
//! берут `TimeDomain::Scaled`, finisher hold: `TimeDomain::Real`.

use bevy::prelude::*;

/// Timers at or below this many seconds count as expired (f32 drift over many ticks).
pub const TIMER_EPSILON: f32 = 1e-4;

/// Decrement `remaining` by `delta`; `true` once the timer has run out.
pub fn tick_down(remaining: &mut f32, delta: f32) -> bool {
    *remaining -= delta;
    *remaining <= TIMER_EPSILON
}

/// Which clock a timer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum TimeDomain {
    /// Wall-clock seconds, unaffected by slow motion.
    Real,
    /// Real seconds multiplied by the current time scale.
    Scaled,
}

/// Process-wide simulation clock.
///
/// Инвариант: `scaled_delta == real_delta * time_scale` для текущего тика.
#[derive(Resource, Debug, Clone)]
pub struct SimulationClock {
    time_scale: f32,
    real_delta: f32,
    scaled_delta: f32,
    real_elapsed: f64,
    scaled_elapsed: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            real_delta: 0.0,
            scaled_delta: 0.0,
            real_elapsed: 0.0,
            scaled_elapsed: 0.0,
        }
    }
}

impl SimulationClock {
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Negative scales are clamped to a full stop. Takes effect on the next tick.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Advance by one real timestep.
    pub fn advance(&mut self, real_delta: f32) {
        self.real_delta = real_delta;
        self.scaled_delta = real_delta * self.time_scale;
        self.real_elapsed += self.real_delta as f64;
        self.scaled_elapsed += self.scaled_delta as f64;
    }

    pub fn delta(&self, domain: TimeDomain) -> f32 {
        match domain {
            TimeDomain::Real => self.real_delta,
            TimeDomain::Scaled => self.scaled_delta,
        }
    }

    pub fn elapsed(&self, domain: TimeDomain) -> f64 {
        match domain {
            TimeDomain::Real => self.real_elapsed,
            TimeDomain::Scaled => self.scaled_elapsed,
        }
    }
}

/// System: advance the clock by exactly one fixed timestep.
///
/// Uses `timestep()` rather than `delta_secs()` so that running `FixedUpdate`
/// by hand (tests) still moves time forward.
pub fn advance_clock(mut clock: ResMut<SimulationClock>, time: Res<Time<Fixed>>) {
    clock.advance(time.timestep().as_secs_f32());
}
