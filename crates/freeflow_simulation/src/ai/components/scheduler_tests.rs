//! Tests for the attack scheduler turn loop.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::scheduler::{AttackScheduler, EligibilityGate, SchedulerConfig, TurnPhase};
    use crate::ai::{AgentCommand, AgentCommandKind};
    use crate::registry::test_support::FakeRoster;

    const DT: f32 = 1.0 / 60.0;

    /// Фиксированный pacing 0.5s и нулевой cooldown: тайминги предсказуемы.
    fn fixed_config() -> SchedulerConfig {
        SchedulerConfig {
            pace_min: 0.5,
            pace_max: 0.5,
            cooldown_min: 0.0,
            cooldown_max: 0.0,
        }
    }

    /// Tick until the scheduler emits something. Returns (tick index, command).
    fn run_until_command(
        scheduler: &mut AttackScheduler,
        roster: &mut FakeRoster,
        config: &SchedulerConfig,
        max_ticks: usize,
    ) -> Option<(usize, AgentCommand)> {
        (0..max_ticks).find_map(|tick| {
            scheduler
                .tick(DT, roster, config)
                .map(|command| (tick, command))
        })
    }

    /// Run a full turn: BeginAttack, windup resolved by the test, BeginRetreat.
    fn complete_turn(
        scheduler: &mut AttackScheduler,
        roster: &mut FakeRoster,
        config: &SchedulerConfig,
    ) -> Entity {
        let (_, attack) = run_until_command(scheduler, roster, config, 600).expect("attack issued");
        assert_eq!(attack.kind, AgentCommandKind::BeginAttack);

        let (_, retreat) = run_until_command(scheduler, roster, config, 5).expect("retreat issued");
        assert_eq!(retreat, AgentCommand::new(attack.agent, AgentCommandKind::BeginRetreat));
        attack.agent
    }

    #[test]
    fn test_first_tick_rolls_pacing_within_bounds() {
        let mut roster = FakeRoster::new(1);
        roster.spawn(1, Vec3::X);
        let config = SchedulerConfig::default();
        let mut scheduler = AttackScheduler::default();

        assert_eq!(scheduler.tick(DT, &mut roster, &config), None);
        match scheduler.phase() {
            TurnPhase::Pacing { remaining, exclude } => {
                assert!((0.5..=1.5).contains(&remaining));
                assert_eq!(exclude, None);
            }
            other => panic!("expected pacing, got {:?}", other),
        }
        assert_eq!(scheduler.turns_started(), 1);
    }

    #[test]
    fn test_attack_issued_after_pacing_elapses() {
        let mut roster = FakeRoster::new(1);
        let a = roster.spawn(1, Vec3::X);
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        // tick 0: start, ticks 1..=30: pacing 0.5s
        let (tick, command) = run_until_command(&mut scheduler, &mut roster, &config, 100).unwrap();
        assert_eq!(tick, 30);
        assert_eq!(command, AgentCommand::new(a, AgentCommandKind::BeginAttack));
        assert_eq!(scheduler.phase(), TurnPhase::Resolving { attacker: a });
        assert_eq!(scheduler.current_attacker(), Some(a));
    }

    #[test]
    fn test_gates_block_until_predicates_clear() {
        let mut roster = FakeRoster::new(1);
        let a = roster.spawn(1, Vec3::X);
        roster.state_mut(a).retreating = true;
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        assert_eq!(run_until_command(&mut scheduler, &mut roster, &config, 120), None);
        assert_eq!(
            scheduler.phase(),
            TurnPhase::Gating {
                attacker: a,
                gate: EligibilityGate::NotRetreating
            }
        );

        roster.state_mut(a).retreating = false;
        roster.state_mut(a).stunned = true;
        assert_eq!(scheduler.tick(DT, &mut roster, &config), None);
        assert_eq!(
            scheduler.phase(),
            TurnPhase::Gating {
                attacker: a,
                gate: EligibilityGate::NotStunned
            }
        );

        roster.state_mut(a).stunned = false;
        assert_eq!(
            scheduler.tick(DT, &mut roster, &config),
            Some(AgentCommand::new(a, AgentCommandKind::BeginAttack))
        );
    }

    #[test]
    fn test_passed_gate_is_not_rechecked() {
        let mut roster = FakeRoster::new(1);
        let a = roster.spawn(1, Vec3::X);
        roster.state_mut(a).locked_by_player = true;
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        assert_eq!(run_until_command(&mut scheduler, &mut roster, &config, 60), None);
        assert!(matches!(
            scheduler.phase(),
            TurnPhase::Gating {
                gate: EligibilityGate::NotLockedByPlayer,
                ..
            }
        ));

        // retreating снова поднялся, но этот gate уже пройден
        roster.state_mut(a).retreating = true;
        roster.state_mut(a).locked_by_player = false;
        assert_eq!(
            scheduler.tick(DT, &mut roster, &config),
            Some(AgentCommand::new(a, AgentCommandKind::BeginAttack))
        );
    }

    #[test]
    fn test_resolution_waits_for_windup() {
        let mut roster = FakeRoster::new(1);
        let a = roster.spawn(1, Vec3::X);
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        run_until_command(&mut scheduler, &mut roster, &config, 100).unwrap();
        roster.state_mut(a).preparing_attack = true;

        for _ in 0..50 {
            assert_eq!(scheduler.tick(DT, &mut roster, &config), None);
        }
        assert_eq!(scheduler.phase(), TurnPhase::Resolving { attacker: a });

        roster.state_mut(a).preparing_attack = false;
        assert_eq!(
            scheduler.tick(DT, &mut roster, &config),
            Some(AgentCommand::new(a, AgentCommandKind::BeginRetreat))
        );
        assert!(matches!(scheduler.phase(), TurnPhase::Cooldown { attacker, .. } if attacker == a));
    }

    #[test]
    fn test_next_turn_excludes_previous_attacker() {
        let mut roster = FakeRoster::new(3);
        roster.spawn(1, Vec3::X);
        roster.spawn(2, Vec3::NEG_X);
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        let mut previous = complete_turn(&mut scheduler, &mut roster, &config);
        for _ in 0..10 {
            let attacker = complete_turn(&mut scheduler, &mut roster, &config);
            assert_ne!(attacker, previous, "two eligible agents must alternate");
            previous = attacker;
        }
    }

    #[test]
    fn test_single_agent_falls_back_to_repeat() {
        let mut roster = FakeRoster::new(3);
        let a = roster.spawn(1, Vec3::X);
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        assert_eq!(complete_turn(&mut scheduler, &mut roster, &config), a);
        assert_eq!(complete_turn(&mut scheduler, &mut roster, &config), a);
        assert!(scheduler.is_running());
    }

    #[test]
    fn test_empty_roster_terminates_immediately() {
        let mut roster = FakeRoster::new(1);
        let mut scheduler = AttackScheduler::default();

        assert_eq!(scheduler.tick(DT, &mut roster, &fixed_config()), None);
        assert_eq!(scheduler.phase(), TurnPhase::Terminated);
        assert!(!scheduler.is_running());
    }

    #[test]
    fn test_terminates_after_last_agent_dies() {
        let mut roster = FakeRoster::new(1);
        let a = roster.spawn(1, Vec3::X);
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        run_until_command(&mut scheduler, &mut roster, &config, 100).unwrap();
        roster.kill(a);

        // Мёртвый агент не получает BeginRetreat
        assert_eq!(run_until_command(&mut scheduler, &mut roster, &config, 100), None);
        assert_eq!(scheduler.phase(), TurnPhase::Terminated);
    }

    #[test]
    fn test_no_available_agent_stops_silently() {
        let mut roster = FakeRoster::new(1);
        let a = roster.spawn(1, Vec3::X);
        let _ = roster.registry.set_availability(a, false);
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        assert_eq!(run_until_command(&mut scheduler, &mut roster, &config, 100), None);
        assert_eq!(scheduler.phase(), TurnPhase::Stopped);

        // StartAI после того как агент снова доступен
        let _ = roster.registry.set_availability(a, true);
        scheduler.restart();
        let (_, command) = run_until_command(&mut scheduler, &mut roster, &config, 100).unwrap();
        assert_eq!(command, AgentCommand::new(a, AgentCommandKind::BeginAttack));
    }

    #[test]
    fn test_attacker_dying_while_gated_abandons_turn() {
        let mut roster = FakeRoster::new(5);
        let a = roster.spawn(1, Vec3::X);
        let b = roster.spawn(2, Vec3::NEG_X);
        roster.state_mut(a).retreating = true;
        roster.state_mut(b).retreating = true;
        let config = fixed_config();
        let mut scheduler = AttackScheduler::default();

        assert_eq!(run_until_command(&mut scheduler, &mut roster, &config, 60), None);
        let Some(gated) = scheduler.current_attacker() else {
            panic!("expected a gated attacker, got {:?}", scheduler.phase());
        };
        let other = if gated == a { b } else { a };

        roster.kill(gated);
        roster.state_mut(other).retreating = false;

        assert_eq!(scheduler.tick(DT, &mut roster, &config), None);
        assert_eq!(
            scheduler.phase(),
            TurnPhase::Pacing {
                remaining: 0.5,
                exclude: Some(gated)
            }
        );

        let (_, command) = run_until_command(&mut scheduler, &mut roster, &config, 100).unwrap();
        assert_eq!(command, AgentCommand::new(other, AgentCommandKind::BeginAttack));
    }

    #[test]
    fn test_same_seed_same_turn_order() {
        let turns = |seed: u64| {
            let mut roster = FakeRoster::new(seed);
            for i in 0..4 {
                roster.spawn(i, Vec3::new(i as f32, 0.0, 0.0));
            }
            let config = SchedulerConfig::default();
            let mut scheduler = AttackScheduler::default();
            (0..8)
                .map(|_| complete_turn(&mut scheduler, &mut roster, &config))
                .collect::<Vec<_>>()
        };
        assert_eq!(turns(2024), turns(2024));
    }
}
