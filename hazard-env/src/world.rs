//! State of an episode and its transition function.
use crate::{
    act::{decode_vector, Direction},
    env::{GoalPlacement, HazardEnvConfig, HazardMotion, MoveRule},
    error::EnvError,
    geometry::{inside_any, Vec2, Wall},
    obs::{MovingEntity, Snapshot},
    placement,
    reward::{shape_reward, RewardInput, RewardOutcome, Termination},
};
use hazard_core::Info;
use rand::Rng;

/// Directions hazards can follow; every compass direction but "stay".
pub const HAZARD_PATTERNS: [Direction; 8] = [
    Direction::UpLeft,
    Direction::Up,
    Direction::UpRight,
    Direction::Left,
    Direction::Right,
    Direction::DownLeft,
    Direction::Down,
    Direction::DownRight,
];

fn random_pattern<R: Rng>(rng: &mut R) -> Direction {
    HAZARD_PATTERNS[rng.gen_range(0..HAZARD_PATTERNS.len())]
}

fn random_axis<R: Rng>(rng: &mut R) -> f32 {
    [-1.0, 0.0, 1.0][rng.gen_range(0..3)]
}

/// A moving hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub position: Vec2,

    /// Direction followed under [`HazardMotion::Patterned`].
    pub pattern: Direction,

    /// Displacement applied on the last step.
    pub velocity: Vec2,
}

impl Hazard {
    pub fn new(position: Vec2, pattern: Direction) -> Self {
        Self {
            position,
            pattern,
            velocity: Vec2::ZERO,
        }
    }
}

/// Diagnostics of a step.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardInfo {
    /// Step counter after the step.
    pub step_index: usize,
    pub goal_distance: f32,

    /// Distance from the agent to every hazard, in hazard order.
    pub hazard_distances: Vec<f32>,
    pub termination: Termination,
}

impl Info for HazardInfo {}

/// Result of [`World::step`].
#[derive(Debug, Clone)]
pub struct WorldStep {
    pub outcome: RewardOutcome,
    pub info: HazardInfo,
}

/// Applies the move rule and the grid bounds to a tentative position.
fn resolve_move(rule: MoveRule, walls: &[Wall], from: Vec2, to: Vec2, ub: f32) -> Vec2 {
    let accepted = match rule {
        MoveRule::WallBlocking if inside_any(walls, &to) => from,
        _ => to,
    };
    accepted.clamp(0.0, ub)
}

/// State of an episode.
///
/// A world is created by [`World::reset`] and mutated only by [`World::step`].
/// Randomness is drawn from the generator passed to these methods.
#[derive(Debug, Clone)]
pub struct World {
    config: HazardEnvConfig,
    agent: Vec2,
    hazards: Vec<Hazard>,
    walls: Vec<Wall>,
    goal: Vec2,
    step_count: usize,
    initial_goal_distance: f32,
}

impl World {
    /// Starts an episode: walls, then hazards, then the goal are placed.
    pub fn reset<R: Rng>(config: &HazardEnvConfig, rng: &mut R) -> Result<Self, EnvError> {
        config.validate()?;

        let agent = config.agent_start();
        let walls = placement::generate_walls(config, rng)?;
        let positions = placement::place_hazards(config, &walls, rng)?;
        let goal = match config.goal {
            GoalPlacement::Random => placement::place_goal(config, &walls, &positions, rng)?,
            GoalPlacement::Fixed(goal) => goal,
        };
        let hazards = positions
            .into_iter()
            .map(|p| Hazard::new(p, random_pattern(rng)))
            .collect();

        log::debug!(
            "Reset world: agent = {:?}, goal = {:?}, {} walls",
            agent,
            goal,
            walls.len()
        );

        Ok(Self::new(config.clone(), agent, hazards, walls, goal))
    }

    /// Builds a world from explicit entities, skipping placement.
    ///
    /// Used to replay recorded scenes. The step counter starts at 0.
    pub fn from_parts(
        config: &HazardEnvConfig,
        agent: Vec2,
        hazards: Vec<Hazard>,
        walls: Vec<Wall>,
        goal: Vec2,
    ) -> Result<Self, EnvError> {
        config.validate()?;
        Ok(Self::new(config.clone(), agent, hazards, walls, goal))
    }

    fn new(
        config: HazardEnvConfig,
        agent: Vec2,
        hazards: Vec<Hazard>,
        walls: Vec<Wall>,
        goal: Vec2,
    ) -> Self {
        Self {
            config,
            agent,
            hazards,
            walls,
            goal,
            step_count: 0,
            initial_goal_distance: agent.distance(&goal),
        }
    }

    /// Advances the episode by one step.
    ///
    /// The configured [`MoveRule`] applies to the agent only; hazards are
    /// always blocked by walls. Unknown action ids leave the agent in place.
    /// Termination is decided by the reward shaper; the world itself never
    /// refuses a step.
    pub fn step<R: Rng>(&mut self, act_id: i64, rng: &mut R) -> WorldStep {
        let ub = self.config.upper_bound();
        let rule = self.config.move_rule;

        let tentative = self.agent + decode_vector(act_id) * self.config.agent_speed;
        self.agent = resolve_move(rule, &self.walls, self.agent, tentative, ub);

        let hazard_speed = self.config.agent_speed / 2.0;
        let motion = self.config.hazard_motion;
        for hazard in self.hazards.iter_mut() {
            let direction = match motion {
                HazardMotion::Patterned { .. } => hazard.pattern.vector(),
                HazardMotion::RandomWalk => Vec2::new(random_axis(rng), random_axis(rng)),
            };
            let tentative = hazard.position + direction * hazard_speed;
            let next = resolve_move(
                MoveRule::WallBlocking,
                &self.walls,
                hazard.position,
                tentative,
                ub,
            );
            hazard.velocity = next - hazard.position;
            hazard.position = next;

            if let HazardMotion::Patterned { switch_probability } = motion {
                if rng.gen_bool(switch_probability as f64) {
                    hazard.pattern = random_pattern(rng);
                }
            }
        }

        self.step_count += 1;

        let positions = self.hazard_positions();
        let outcome = shape_reward(
            &self.config.reward,
            &RewardInput {
                agent: self.agent,
                hazards: &positions,
                goal: self.goal,
                step: self.step_count,
                max_steps: self.config.max_steps,
                initial_goal_distance: self.initial_goal_distance,
            },
        );

        let info = HazardInfo {
            step_index: self.step_count,
            goal_distance: outcome.goal_distance,
            hazard_distances: positions.iter().map(|h| self.agent.distance(h)).collect(),
            termination: outcome.termination,
        };

        log::trace!(
            "Step {}: act = {}, agent = {:?}, reward = {}",
            self.step_count,
            act_id,
            self.agent,
            outcome.reward
        );
        if outcome.termination.is_done() {
            log::info!(
                "Episode ended by {} at step {}",
                outcome.termination.as_str(),
                self.step_count
            );
        }

        WorldStep { outcome, info }
    }

    /// Borrowed view of the entities for the observation encoder.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            agent: self.agent,
            walls: &self.walls,
            hazards: self
                .hazards
                .iter()
                .map(|h| MovingEntity {
                    position: h.position,
                    velocity: h.velocity,
                })
                .collect(),
            goal: self.goal,
            time_fraction: Some(self.step_count as f32 / self.config.max_steps as f32),
        }
    }

    pub fn config(&self) -> &HazardEnvConfig {
        &self.config
    }

    pub fn agent(&self) -> Vec2 {
        self.agent
    }

    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    pub fn hazard_positions(&self) -> Vec<Vec2> {
        self.hazards.iter().map(|h| h.position).collect()
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn goal(&self) -> Vec2 {
        self.goal
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn initial_goal_distance(&self) -> f32 {
        self.initial_goal_distance
    }
}
