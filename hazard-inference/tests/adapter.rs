use anyhow::Result;
use hazard_core::{DefaultEvaluator, Evaluator as _};
use hazard_env::{
    geometry::Vec2, Direction, GoalPlacement, HazardEnv, HazardEnvConfig, ObsLayout, WallLayout,
};
use hazard_inference::{
    api::{handle_game_state, GameStateResponse},
    telemetry::Telemetry,
    DecisionPolicy, InferenceAdapter, InferenceAdapterConfig, InferenceError,
};
use hazard_policy_no_backend::{DecisionFunction, Mat};
use std::sync::{Arc, Mutex};

/// Returns a fixed action id and keeps the observations it was shown.
struct FixedDecision {
    id: i64,
    input_dim: Option<usize>,
    seen: Mutex<Vec<Mat>>,
}

impl FixedDecision {
    fn new(id: i64, input_dim: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            id,
            input_dim,
            seen: Mutex::new(vec![]),
        })
    }

    fn last_seen(&self) -> Mat {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

impl DecisionFunction for FixedDecision {
    fn decide(&self, obs: &Mat, _deterministic: bool) -> i64 {
        self.seen.lock().unwrap().push(obs.clone());
        self.id
    }

    fn input_dim(&self) -> Option<usize> {
        self.input_dim
    }
}

fn row(obs: &Mat, i: usize) -> &[f32] {
    let n_cols = obs.shape[1];
    &obs.data[i * n_cols..(i + 1) * n_cols]
}

#[test_log::test]
fn test_empty_obstacles_and_missing_walls() -> Result<()> {
    let config = InferenceAdapterConfig::default();
    let layout = config.layout;
    let decision = FixedDecision::new(Direction::Up.id(), Some(layout.size()));
    let adapter = InferenceAdapter::new(decision.clone(), config)?;

    let body = r#"{
        "player": { "position": [4, 6], "velocity": [0, 0], "is_dead": false },
        "environment": {
            "moving_obstacles": [],
            "goal_area": { "position": [12, 3], "size": 1 }
        }
    }"#;
    let response = handle_game_state(&adapter, body);

    assert_eq!(response.status, "success");
    assert_eq!(response.direction, "up");
    assert_eq!(response.reward, Some(-(8.0f32.hypot(3.0))));

    let obs = decision.last_seen();
    assert_eq!(obs.shape, layout.shape());
    assert_eq!(row(&obs, layout.agent_row()), &[4.0, 6.0, 0.0, 0.0]);
    assert_eq!(row(&obs, layout.goal_row()), &[12.0, 3.0, 0.0, 0.0]);
    for i in layout.wall_rows().chain(layout.hazard_rows()) {
        assert!(row(&obs, i).iter().all(|v| *v == 0.0));
    }
    Ok(())
}

#[test_log::test]
fn test_invalid_body_still_succeeds() -> Result<()> {
    let adapter = InferenceAdapter::new(
        FixedDecision::new(Direction::Stay.id(), None),
        InferenceAdapterConfig::default(),
    )?;

    let response = handle_game_state(&adapter, "{ this is not json");
    assert_eq!(response.status, "success");
    assert_eq!(response.direction, "stay");
    // Agent and goal both default to the origin.
    assert_eq!(response.reward, Some(10000.0));
    Ok(())
}

#[test_log::test]
fn test_unknown_action_label() -> Result<()> {
    let config = InferenceAdapterConfig::default().diagnostic(None);
    let adapter = InferenceAdapter::new(FixedDecision::new(42, None), config)?;

    let response = handle_game_state(&adapter, "{}");
    assert_eq!(response.direction, "unknown");
    assert_eq!(response.to_json()?, r#"{"status":"success","move":"unknown"}"#);
    Ok(())
}

#[test]
fn test_response_json() -> Result<()> {
    let response: GameStateResponse =
        serde_json::from_str(r#"{"status":"success","move":"down-left","reward":-2.5}"#)?;
    assert_eq!(response.direction, "down-left");
    assert_eq!(response.reward, Some(-2.5));
    Ok(())
}

#[test]
fn test_input_dim_mismatch() {
    let config = InferenceAdapterConfig::default();
    let expected = config.layout.size();
    let res = InferenceAdapter::new(FixedDecision::new(0, Some(expected + 1)), config);

    assert_eq!(
        res.err(),
        Some(InferenceError::InputDimMismatch {
            expected,
            actual: expected + 1
        })
    );
}

#[test]
fn test_time_row_from_steps_taken() -> Result<()> {
    let env_config = HazardEnvConfig::default().time_feature(true).max_steps(200);
    let config = InferenceAdapterConfig::from_env_config(&env_config);
    let layout: ObsLayout = config.layout;
    let decision = FixedDecision::new(0, Some(layout.size()));
    let adapter = InferenceAdapter::new(decision.clone(), config)?;

    let telemetry = Telemetry::from_json(r#"{"player": {"steps_taken": 50}}"#);
    let inference = adapter.infer(&telemetry);
    assert_eq!(inference.label, "up-left");

    let obs = decision.last_seen();
    let time_row = layout.time_row().unwrap();
    assert_eq!(row(&obs, time_row)[0], 0.25);
    Ok(())
}

#[test]
fn test_concurrent_inference() -> Result<()> {
    let adapter = InferenceAdapter::new(
        FixedDecision::new(Direction::Right.id(), None),
        InferenceAdapterConfig::default(),
    )?;
    let body = r#"{"player": {"position": [1, 1]}, "environment": {"goal_area": {"position": [4, 5]}}}"#;

    let responses: Vec<GameStateResponse> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| handle_game_state(&adapter, body)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for response in responses {
        assert_eq!(response.direction, "right");
        assert_eq!(response.reward, Some(-5.0));
    }
    Ok(())
}

#[test_log::test]
fn test_decision_policy_with_evaluator() -> Result<()> {
    let speed = 50.0 / 15.0;
    let env_config = HazardEnvConfig::default()
        .grid_size(10.0)
        .n_hazards(0)
        .walls(WallLayout::None)
        .goal(GoalPlacement::Fixed(Vec2::new(5.0, 5.0 + speed)));
    let layout = env_config.obs_layout();
    let mut policy = DecisionPolicy::new(
        FixedDecision::new(Direction::Up.id(), Some(layout.size())),
        &layout,
        true,
    )?;

    let record = DefaultEvaluator::<HazardEnv>::new(&env_config, 0, 3)?.evaluate(&mut policy)?;
    assert_eq!(record.get_scalar("Episode return")?, 10000.0);
    assert_eq!(record.get_scalar("Episode length")?, 1.0);
    Ok(())
}
