use anyhow::Result;
use hazard_core::Env as _;
use hazard_env::{
    error::EnvError, geometry::Vec2, reward::Termination, Direction, GoalPlacement, HazardAct,
    HazardEnv, HazardEnvConfig, PlacementConfig, WallLayout,
};

const SPEED: f32 = 50.0 / 15.0;

fn open_grid(grid_size: f32) -> HazardEnvConfig {
    HazardEnvConfig::default()
        .grid_size(grid_size)
        .n_hazards(0)
        .walls(WallLayout::None)
        .goal(GoalPlacement::Fixed(Vec2::new(0.0, 0.0)))
}

#[test_log::test]
fn test_agent_stays_in_bounds() -> Result<()> {
    let config = HazardEnvConfig::default().max_steps(300);
    let ub = config.upper_bound();
    let mut env = HazardEnv::build(&config, 42)?;
    fastrand::seed(42);

    for _ in 0..2000 {
        let act = HazardAct::new(fastrand::i64(0..9));
        let (step, _) = env.step_with_reset(&act)?;
        let p = step.obs.position(0);
        assert!((0.0..=ub).contains(&p.x) && (0.0..=ub).contains(&p.y));
        for h in env.world().hazards() {
            assert!((0.0..=ub).contains(&h.position.x));
            assert!((0.0..=ub).contains(&h.position.y));
        }
    }
    Ok(())
}

#[test_log::test]
fn test_moving_up_on_open_grid() -> Result<()> {
    let config = open_grid(10.0);
    let max_steps = config.max_steps as f32;
    let mut env = HazardEnv::build(&config, 0)?;
    assert_eq!(env.world().agent(), Vec2::new(5.0, 5.0));

    for k in 1..=5 {
        let (step, _) = env.step(&Direction::Up.into());
        let expected = Vec2::new(5.0, (5.0 + k as f32 * SPEED).min(9.0));
        let agent = step.obs.position(0);
        assert!((agent.x - expected.x).abs() < 1e-5);
        assert!((agent.y - expected.y).abs() < 1e-5);

        let goal_distance = expected.norm();
        assert!(!step.is_done());
        assert!((step.reward - (-goal_distance - k as f32 / max_steps)).abs() < 1e-4);
        assert!((step.reward + goal_distance).abs() < 1e-3);
    }
    Ok(())
}

#[test_log::test]
fn test_timeout_on_last_step() -> Result<()> {
    let config = open_grid(10.0).max_steps(5);
    let mut env = HazardEnv::build(&config, 0)?;

    for k in 1..=5 {
        let (step, _) = env.step(&Direction::Right.into());
        if k < 5 {
            assert!(!step.is_done());
        } else {
            assert!(step.is_truncated);
            assert!(!step.is_terminated);
            assert_eq!(step.info.termination, Termination::Timeout);
            assert_eq!(step.reward, config.reward.timeout_penalty);
        }
    }
    Ok(())
}

#[test_log::test]
fn test_goal_reached() -> Result<()> {
    let config = open_grid(10.0).goal(GoalPlacement::Fixed(Vec2::new(5.0, 5.0 + SPEED)));
    let mut env = HazardEnv::build(&config, 0)?;

    let (step, record) = env.step(&Direction::Up.into());
    assert!(step.is_terminated);
    assert_eq!(step.reward, config.reward.goal_bonus);
    assert_eq!(record.get_string("termination")?, "goal");
    Ok(())
}

#[test_log::test]
fn test_unknown_action_stays() -> Result<()> {
    let mut env = HazardEnv::build(&open_grid(10.0), 0)?;

    for id in [-1, 9, 42] {
        let (step, _) = env.step(&HazardAct::new(id));
        assert_eq!(step.obs.position(0), Vec2::new(5.0, 5.0));
        assert_eq!(step.act.label(), "unknown");
    }
    Ok(())
}

#[test_log::test]
fn test_same_seed_replays_episode() -> Result<()> {
    let config = HazardEnvConfig::default().max_steps(100);
    let mut env1 = HazardEnv::build(&config, 3)?;
    let mut env2 = HazardEnv::build(&config, 99)?;
    let obs1 = env1.reset_with_seed(7)?;
    let obs2 = env2.reset_with_seed(7)?;
    assert_eq!(obs1, obs2);

    for ix in 0..100 {
        let act = HazardAct::new(ix % 9);
        let (s1, _) = env1.step(&act);
        let (s2, _) = env2.step(&act);
        assert_eq!(s1.obs, s2.obs);
        assert_eq!(s1.reward, s2.reward);
        if s1.is_done() {
            break;
        }
    }
    Ok(())
}

#[test_log::test]
fn test_placement_after_reset() -> Result<()> {
    let config = HazardEnvConfig::default();
    let placement = &config.placement;
    let start = config.agent_start();
    let mut env = HazardEnv::build(&config, 5)?;

    for _ in 0..20 {
        env.reset()?;
        let world = env.world();
        let hazards = world.hazard_positions();
        assert_eq!(hazards.len(), config.n_hazards);
        assert_eq!(world.walls().len(), 10);
        for (i, a) in hazards.iter().enumerate() {
            for b in &hazards[i + 1..] {
                assert!(a.distance(b) > placement.hazard_min_separation);
            }
            assert!(a.distance(&world.goal()) > placement.goal_min_distance);
        }
        assert!(start.distance(&world.goal()) > placement.goal_min_distance);
    }
    Ok(())
}

#[test_log::test]
fn test_unsatisfiable_placement_is_an_error() {
    let config = HazardEnvConfig::default()
        .walls(WallLayout::None)
        .placement(PlacementConfig {
            hazard_min_separation: 100.0,
            ..PlacementConfig::default()
        });

    let err = HazardEnv::build(&config, 0).err().unwrap();
    assert!(matches!(
        err.downcast_ref::<EnvError>(),
        Some(EnvError::PlacementExhausted {
            entity: "hazard",
            ..
        })
    ));
}
