//! Headless harness для integration тестов.
//!
//! Шаг = один прогон `FixedUpdate` напрямую (детерминированно, без real time).

#![allow(dead_code)]

use bevy::prelude::*;
use freeflow_simulation::ai::SchedulerConfig;
use freeflow_simulation::*;

/// Все события ядра за прогон, с номером тика.
#[derive(Resource, Default, Debug)]
pub struct Recorded {
    pub tick: u32,
    pub effects: Vec<(u32, EffectCommand)>,
    pub agent_commands: Vec<(u32, AgentCommand)>,
    pub damage: Vec<(u32, DamageTaken)>,
}

impl Recorded {
    pub fn commands_of(&self, kind: AgentCommandKind) -> Vec<(u32, Entity)> {
        self.agent_commands
            .iter()
            .filter(|(_, command)| command.kind == kind)
            .map(|(tick, command)| (*tick, command.agent))
            .collect()
    }

    pub fn effects_at(&self, tick: u32) -> Vec<EffectCommand> {
        self.effects
            .iter()
            .filter(|(at, _)| *at == tick)
            .map(|(_, effect)| effect.clone())
            .collect()
    }

    pub fn animations_of(&self, entity: Entity) -> Vec<AnimationCue> {
        self.effects
            .iter()
            .filter_map(|(_, effect)| match effect {
                EffectCommand::Animate { entity: e, cue } if *e == entity => Some(*cue),
                _ => None,
            })
            .collect()
    }
}

fn record(
    mut recorded: ResMut<Recorded>,
    mut effects: EventReader<EffectCommand>,
    mut agent_commands: EventReader<AgentCommand>,
    mut damage: EventReader<DamageTaken>,
) {
    recorded.tick += 1;
    let tick = recorded.tick;
    for effect in effects.read() {
        recorded.effects.push((tick, effect.clone()));
    }
    for command in agent_commands.read() {
        recorded.agent_commands.push((tick, *command));
    }
    for event in damage.read() {
        recorded.damage.push((tick, *event));
    }
}

/// Scheduler, который практически никогда не доходит до выбора атакующего.
pub fn quiet_scheduler() -> SimulationConfig {
    SimulationConfig {
        scheduler: SchedulerConfig {
            pace_min: 1000.0,
            pace_max: 1000.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub struct Harness {
    pub app: App,
    pub player: Entity,
}

impl Harness {
    pub fn new(config: SimulationConfig) -> Self {
        let mut app = create_headless_app_with_config(config);
        app.init_resource::<Recorded>()
            .add_systems(FixedUpdate, record.after(SimulationSet::Reactions));
        let player = app.world_mut().spawn((Player, Transform::default())).id();
        Self { app, player }
    }

    pub fn spawn_agent(&mut self, position: Vec3, health: u32) -> Entity {
        self.app
            .world_mut()
            .spawn((
                Agent,
                Health::new(health),
                Transform::from_translation(position).looking_at(Vec3::ZERO, Vec3::Y),
            ))
            .id()
    }

    pub fn step(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    pub fn step_n(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn send<E: Event>(&mut self, event: E) {
        self.app.world_mut().send_event(event);
    }

    pub fn tick(&self) -> u32 {
        self.recorded().tick
    }

    pub fn recorded(&self) -> &Recorded {
        self.app.world().resource::<Recorded>()
    }

    pub fn combat(&self) -> &PlayerCombat {
        self.app
            .world()
            .get::<PlayerCombat>(self.player)
            .expect("player has PlayerCombat")
    }

    pub fn locomotion(&self) -> &Locomotion {
        self.app
            .world()
            .get::<Locomotion>(self.player)
            .expect("player has Locomotion")
    }

    pub fn agent_state(&self, agent: Entity) -> AgentState {
        *self
            .app
            .world()
            .get::<AgentState>(agent)
            .expect("agent has AgentState")
    }

    pub fn agent_state_mut(&mut self, agent: Entity) -> Mut<'_, AgentState> {
        self.app
            .world_mut()
            .get_mut::<AgentState>(agent)
            .expect("agent has AgentState")
    }

    pub fn health(&self, agent: Entity) -> Health {
        *self
            .app
            .world()
            .get::<Health>(agent)
            .expect("agent has Health")
    }

    pub fn registry(&self) -> &AgentRegistry {
        self.app.world().resource::<AgentRegistry>()
    }

    pub fn scheduler(&self) -> &AttackScheduler {
        self.app.world().resource::<AttackScheduler>()
    }

    pub fn clock(&self) -> &SimulationClock {
        self.app.world().resource::<SimulationClock>()
    }

    /// Same as `Roster::set_availability`: flag + broadcast.
    pub fn set_availability(&mut self, agent: Entity, available: bool) {
        let event = self
            .app
            .world_mut()
            .resource_mut::<AgentRegistry>()
            .set_availability(agent, available);
        self.send(event);
    }

    pub fn preparing_count(&mut self) -> usize {
        let mut agents = self
            .app
            .world_mut()
            .query_filtered::<&AgentState, With<Agent>>();
        agents
            .iter(self.app.world())
            .filter(|state| state.preparing_attack)
            .count()
    }
}
