//! Configuration of [HazardEnv](super::HazardEnv).
use crate::{
    error::EnvError,
    geometry::{inside_any, Vec2, Wall},
    obs::{ObsColumns, ObsLayout},
    reward::RewardConfig,
};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Walls of an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WallLayout {
    /// No wall.
    None,

    /// A hand-authored layout, used as is in every episode.
    Fixed(Vec<Wall>),

    /// `count` random horizontal or vertical walls, redrawn at every reset.
    Random { count: usize },
}

impl WallLayout {
    /// Number of walls in every episode.
    pub fn count(&self) -> usize {
        match self {
            WallLayout::None => 0,
            WallLayout::Fixed(walls) => walls.len(),
            WallLayout::Random { count } => *count,
        }
    }
}

/// How hazards choose their direction at every step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardMotion {
    /// Follow the current pattern; after moving, switch to a random pattern
    /// with probability `switch_probability`.
    Patterned { switch_probability: f32 },

    /// Pick every axis independently from `{-1, 0, 1}`.
    RandomWalk,
}

/// What happens when the agent moves into a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveRule {
    /// The move is rejected and the agent stays.
    WallBlocking,

    /// The move is applied; only the grid bounds constrain it.
    ClampOnly,
}

/// Where the goal is placed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GoalPlacement {
    /// Rejection sampling against agent start, hazards and walls.
    Random,

    /// Always at the given point.
    Fixed(Vec2),
}

/// Constraints of rejection sampling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Hazards are placed farther than this from each other.
    pub hazard_min_separation: f32,

    /// If set, hazards are placed farther than this from the agent start.
    pub hazard_min_agent_distance: Option<f32>,

    /// The goal is placed farther than this from the agent start and every hazard.
    pub goal_min_distance: f32,

    /// Attempts per entity before giving up with [`EnvError::PlacementExhausted`].
    pub max_placement_attempts: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            hazard_min_separation: 1.0,
            hazard_min_agent_distance: Some(1.5),
            goal_min_distance: 2.0,
            max_placement_attempts: 1000,
        }
    }
}

/// Configurations of [`HazardEnv`](super::HazardEnv).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEnvConfig {
    /// Side of the square grid; positions live in `[0, grid_size - 1]`.
    pub grid_size: f32,

    /// Displacement of the agent per step along each moving axis.
    pub agent_speed: f32,

    /// Step limit of an episode.
    pub max_steps: usize,

    /// Hazards per episode.
    pub n_hazards: usize,

    /// Hazard rows in observations.
    pub max_hazards: usize,

    /// Wall rows in observations.
    pub max_walls: usize,

    pub walls: WallLayout,
    pub hazard_motion: HazardMotion,
    pub move_rule: MoveRule,
    pub placement: PlacementConfig,
    pub goal: GoalPlacement,
    pub reward: RewardConfig,
    pub obs_columns: ObsColumns,

    /// Appends a row holding `step / max_steps` to observations.
    pub time_feature: bool,
}

impl Default for HazardEnvConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            agent_speed: 50.0 / 15.0,
            max_steps: 10000,
            n_hazards: 5,
            max_hazards: 5,
            max_walls: 10,
            walls: WallLayout::Random { count: 10 },
            hazard_motion: HazardMotion::Patterned {
                switch_probability: 0.05,
            },
            move_rule: MoveRule::WallBlocking,
            placement: PlacementConfig::default(),
            goal: GoalPlacement::Random,
            reward: RewardConfig::default(),
            obs_columns: ObsColumns::Extended,
            time_feature: false,
        }
    }
}

impl HazardEnvConfig {
    pub fn grid_size(mut self, v: f32) -> Self {
        self.grid_size = v;
        self
    }

    pub fn agent_speed(mut self, v: f32) -> Self {
        self.agent_speed = v;
        self
    }

    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    /// Sets the number of hazards, raising `max_hazards` if needed.
    pub fn n_hazards(mut self, v: usize) -> Self {
        self.n_hazards = v;
        self.max_hazards = self.max_hazards.max(v);
        self
    }

    pub fn max_hazards(mut self, v: usize) -> Self {
        self.max_hazards = v;
        self
    }

    pub fn max_walls(mut self, v: usize) -> Self {
        self.max_walls = v;
        self
    }

    pub fn walls(mut self, v: WallLayout) -> Self {
        self.walls = v;
        self
    }

    pub fn hazard_motion(mut self, v: HazardMotion) -> Self {
        self.hazard_motion = v;
        self
    }

    pub fn move_rule(mut self, v: MoveRule) -> Self {
        self.move_rule = v;
        self
    }

    pub fn placement(mut self, v: PlacementConfig) -> Self {
        self.placement = v;
        self
    }

    pub fn goal(mut self, v: GoalPlacement) -> Self {
        self.goal = v;
        self
    }

    pub fn reward(mut self, v: RewardConfig) -> Self {
        self.reward = v;
        self
    }

    pub fn obs_columns(mut self, v: ObsColumns) -> Self {
        self.obs_columns = v;
        self
    }

    pub fn time_feature(mut self, v: bool) -> Self {
        self.time_feature = v;
        self
    }

    /// Shape of the observations emitted under this configuration.
    pub fn obs_layout(&self) -> ObsLayout {
        ObsLayout {
            max_walls: self.max_walls,
            max_hazards: self.max_hazards,
            columns: self.obs_columns,
            time_feature: self.time_feature,
        }
    }

    /// Largest coordinate on either axis.
    pub fn upper_bound(&self) -> f32 {
        self.grid_size - 1.0
    }

    /// Where the agent starts every episode.
    pub fn agent_start(&self) -> Vec2 {
        let c = (self.grid_size / 2.0).floor();
        Vec2::new(c, c)
    }

    /// Checks the consistency of the configuration.
    pub fn validate(&self) -> Result<(), EnvError> {
        let invalid = |msg: String| -> Result<(), EnvError> { Err(EnvError::InvalidConfig(msg)) };

        if !self.grid_size.is_finite() || self.grid_size < 2.0 {
            return invalid(format!(
                "grid_size must be finite and >= 2, got {}",
                self.grid_size
            ));
        }
        if !self.agent_speed.is_finite() || self.agent_speed <= 0.0 {
            return invalid(format!(
                "agent_speed must be finite and > 0, got {}",
                self.agent_speed
            ));
        }
        if self.max_steps == 0 {
            return invalid("max_steps must be > 0".to_string());
        }
        if self.n_hazards > self.max_hazards {
            return invalid(format!(
                "n_hazards ({}) exceeds max_hazards ({})",
                self.n_hazards, self.max_hazards
            ));
        }
        if self.walls.count() > self.max_walls {
            return invalid(format!(
                "{} walls exceed max_walls ({})",
                self.walls.count(),
                self.max_walls
            ));
        }
        if let HazardMotion::Patterned { switch_probability } = self.hazard_motion {
            if !(0.0..=1.0).contains(&switch_probability) {
                return invalid(format!(
                    "switch_probability must be in [0, 1], got {}",
                    switch_probability
                ));
            }
        }
        if let (WallLayout::Fixed(walls), GoalPlacement::Fixed(goal)) = (&self.walls, self.goal) {
            if inside_any(walls, &goal) {
                return invalid(format!("fixed goal {:?} lies inside a wall", goal));
            }
        }
        if self.placement.max_placement_attempts == 0 {
            return invalid("max_placement_attempts must be > 0".to_string());
        }
        Ok(())
    }

    /// Constructs [`HazardEnvConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`HazardEnvConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
