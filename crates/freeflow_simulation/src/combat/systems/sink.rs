//! CombatSink: публикация `CombatOutputs` controller'а.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::ai::AgentCommand;
use crate::clock::SimulationClock;
use crate::combat::CombatOutputs;
use crate::effects::EffectCommand;

/// Effect/command writers + clock, in one param.
#[derive(SystemParam)]
pub struct CombatSink<'w> {
    clock: ResMut<'w, SimulationClock>,
    effects: EventWriter<'w, EffectCommand>,
    agent_commands: EventWriter<'w, AgentCommand>,
}

impl CombatSink<'_> {
    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Emit everything in order. Time scale changes take effect next tick.
    pub fn publish(&mut self, out: CombatOutputs) {
        for effect in out.effects {
            self.effects.write(effect);
        }
        for command in out.agent_commands {
            self.agent_commands.write(command);
        }
        if let Some(scale) = out.time_scale {
            self.clock.set_time_scale(scale);
        }
    }
}
