//! Reward shaping.
//!
//! [`shape_reward`] is a pure function of the state after a step. Each step is
//! checked in a fixed order: hazard collision, then goal, then timeout. The
//! first check that fires decides the reward and ends the episode; otherwise
//! the reward is the sum of a progress term, a hazard proximity term and a
//! time term.
use crate::geometry::{min_distance, Vec2};
use serde::{Deserialize, Serialize};

/// Named reward presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardProfile {
    /// Negative goal distance per step with large terminal magnitudes.
    Canonical,

    /// Progress relative to the initial goal distance with unit-scale terminals.
    NormalizedProgress,
}

/// How the non-terminal progress term is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgressShaping {
    /// `-goal_distance`.
    AbsoluteDistance,

    /// `(initial_goal_distance - goal_distance) / initial_goal_distance`.
    NormalizedProgress,
}

/// Configuration of the reward shaper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// A hazard closer than this ends the episode.
    pub collision_radius: f32,
    pub collision_penalty: f32,

    /// A goal closer than this ends the episode.
    pub goal_radius: f32,
    pub goal_bonus: f32,

    /// Hazards closer than this add `-proximity_weight / (d + 1)`.
    pub warning_radius: f32,
    pub proximity_weight: f32,

    /// Weight of `-step / max_steps`.
    pub time_penalty_weight: f32,

    /// Reward of the step reaching the step limit.
    pub timeout_penalty: f32,

    pub shaping: ProgressShaping,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self::preset(RewardProfile::Canonical)
    }
}

impl RewardConfig {
    /// Returns the configuration of a named profile.
    pub fn preset(profile: RewardProfile) -> Self {
        match profile {
            RewardProfile::Canonical => Self {
                collision_radius: 1.0,
                collision_penalty: -100.0,
                goal_radius: 0.5,
                goal_bonus: 10000.0,
                warning_radius: 50.0,
                proximity_weight: 5.0,
                time_penalty_weight: 1.0,
                timeout_penalty: -500.0,
                shaping: ProgressShaping::AbsoluteDistance,
            },
            RewardProfile::NormalizedProgress => Self {
                collision_radius: 1.0,
                collision_penalty: -10.0,
                goal_radius: 1.0,
                goal_bonus: 10.0,
                warning_radius: 2.0,
                proximity_weight: 1.0,
                time_penalty_weight: 0.1,
                timeout_penalty: -10.0,
                shaping: ProgressShaping::NormalizedProgress,
            },
        }
    }

    pub fn collision_radius(mut self, v: f32) -> Self {
        self.collision_radius = v;
        self
    }

    pub fn goal_radius(mut self, v: f32) -> Self {
        self.goal_radius = v;
        self
    }

    pub fn warning_radius(mut self, v: f32) -> Self {
        self.warning_radius = v;
        self
    }

    pub fn time_penalty_weight(mut self, v: f32) -> Self {
        self.time_penalty_weight = v;
        self
    }

    pub fn shaping(mut self, v: ProgressShaping) -> Self {
        self.shaping = v;
        self
    }
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    None,
    Collision,
    GoalReached,
    Timeout,
}

impl Termination {
    /// Collision or goal.
    pub fn is_terminated(&self) -> bool {
        matches!(self, Termination::Collision | Termination::GoalReached)
    }

    /// Step limit reached.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Termination::Timeout)
    }

    pub fn is_done(&self) -> bool {
        !matches!(self, Termination::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::None => "none",
            Termination::Collision => "collision",
            Termination::GoalReached => "goal",
            Termination::Timeout => "timeout",
        }
    }
}

/// State after a step, as consumed by [`shape_reward`].
#[derive(Debug, Clone)]
pub struct RewardInput<'a> {
    pub agent: Vec2,
    pub hazards: &'a [Vec2],
    pub goal: Vec2,

    /// Step counter after the step, starting at 1 for the first step.
    pub step: usize,
    pub max_steps: usize,

    /// Goal distance at the start of the episode.
    pub initial_goal_distance: f32,
}

/// Reward of a step with its components.
///
/// The components are zero on terminal steps.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardOutcome {
    pub reward: f32,
    pub termination: Termination,
    pub goal_distance: f32,
    pub min_hazard_distance: f32,
    pub progress_term: f32,
    pub proximity_term: f32,
    pub time_term: f32,
}

/// Computes the reward and the termination verdict of a step.
pub fn shape_reward(config: &RewardConfig, input: &RewardInput) -> RewardOutcome {
    let goal_distance = input.agent.distance(&input.goal);
    let min_hazard_distance = min_distance(&input.agent, input.hazards);

    let terminal = |reward, termination| RewardOutcome {
        reward,
        termination,
        goal_distance,
        min_hazard_distance,
        progress_term: 0.0,
        proximity_term: 0.0,
        time_term: 0.0,
    };

    if min_hazard_distance < config.collision_radius {
        return terminal(config.collision_penalty, Termination::Collision);
    }
    if goal_distance < config.goal_radius {
        return terminal(config.goal_bonus, Termination::GoalReached);
    }
    if input.step >= input.max_steps {
        return terminal(config.timeout_penalty, Termination::Timeout);
    }

    let progress_term = match config.shaping {
        ProgressShaping::AbsoluteDistance => -goal_distance,
        ProgressShaping::NormalizedProgress => {
            if input.initial_goal_distance > 0.0 {
                (input.initial_goal_distance - goal_distance) / input.initial_goal_distance
            } else {
                0.0
            }
        }
    };
    let proximity_term = if min_hazard_distance < config.warning_radius {
        -config.proximity_weight / (min_hazard_distance + 1.0)
    } else {
        0.0
    };
    let time_term =
        -config.time_penalty_weight * (input.step as f32 / input.max_steps.max(1) as f32);

    RewardOutcome {
        reward: progress_term + proximity_term + time_term,
        termination: Termination::None,
        goal_distance,
        min_hazard_distance,
        progress_term,
        proximity_term,
        time_term,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn input<'a>(agent: Vec2, hazards: &'a [Vec2], goal: Vec2, step: usize) -> RewardInput<'a> {
        RewardInput {
            agent,
            hazards,
            goal,
            step,
            max_steps: 100,
            initial_goal_distance: 10.0,
        }
    }

    #[test]
    fn test_collision_precedes_goal() {
        let config = RewardConfig::default();
        let agent = Vec2::new(3.0, 3.0);
        let hazards = [Vec2::new(3.5, 3.0)];
        let out = shape_reward(&config, &input(agent, &hazards, Vec2::new(3.1, 3.0), 100));

        assert_eq!(out.termination, Termination::Collision);
        assert_eq!(out.reward, config.collision_penalty);
    }

    #[test]
    fn test_goal_precedes_timeout() {
        let config = RewardConfig::default();
        let agent = Vec2::new(3.0, 3.0);
        let out = shape_reward(&config, &input(agent, &[], Vec2::new(3.2, 3.0), 100));

        assert_eq!(out.termination, Termination::GoalReached);
        assert_eq!(out.reward, 10000.0);
    }

    #[test]
    fn test_timeout_replaces_incremental_reward() {
        let config = RewardConfig::default();
        let out = shape_reward(
            &config,
            &input(Vec2::new(0.0, 0.0), &[], Vec2::new(9.0, 9.0), 100),
        );

        assert_eq!(out.termination, Termination::Timeout);
        assert!(out.termination.is_truncated());
        assert_eq!(out.reward, -500.0);
    }

    #[test]
    fn test_incremental_reward_terms() {
        let config = RewardConfig::default();
        let hazards = [Vec2::new(0.0, 4.0)];
        let out = shape_reward(
            &config,
            &input(Vec2::new(0.0, 0.0), &hazards, Vec2::new(3.0, 4.0), 10),
        );

        assert_eq!(out.termination, Termination::None);
        assert_eq!(out.goal_distance, 5.0);
        assert_eq!(out.progress_term, -5.0);
        assert_eq!(out.proximity_term, -1.0);
        assert!((out.time_term + 0.1).abs() < 1e-6);
        assert!((out.reward + 6.1).abs() < 1e-5);
    }

    #[test]
    fn test_no_proximity_penalty_outside_warning_radius() {
        let config = RewardConfig::preset(RewardProfile::NormalizedProgress);
        let hazards = [Vec2::new(0.0, 9.0)];
        let out = shape_reward(
            &config,
            &input(Vec2::new(0.0, 0.0), &hazards, Vec2::new(6.0, 8.0), 10),
        );

        assert_eq!(out.proximity_term, 0.0);
        assert_eq!(out.progress_term, 0.0);
        assert!((out.reward + 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_progress_with_zero_initial_distance() {
        let config = RewardConfig::default().shaping(ProgressShaping::NormalizedProgress);
        let mut inp = input(Vec2::new(0.0, 0.0), &[], Vec2::new(6.0, 8.0), 1);
        inp.initial_goal_distance = 0.0;

        assert_eq!(shape_reward(&config, &inp).progress_term, 0.0);
    }
}
