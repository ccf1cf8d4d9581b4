//! Random placement of walls, hazards and the goal by bounded rejection sampling.
use crate::{
    env::{GoalPlacement, HazardEnvConfig, WallLayout},
    error::EnvError,
    geometry::{inside_any, Vec2, Wall},
};
use rand::Rng;

/// Draws candidates until one is accepted, at most `max_attempts` times.
fn rejection_sample<R, T>(
    entity: &'static str,
    max_attempts: usize,
    rng: &mut R,
    mut draw: impl FnMut(&mut R) -> T,
    accept: impl Fn(&T) -> bool,
) -> Result<T, EnvError>
where
    R: Rng,
{
    for attempt in 1..=max_attempts {
        let candidate = draw(rng);
        if accept(&candidate) {
            log::trace!("Placed {} after {} attempts", entity, attempt);
            return Ok(candidate);
        }
    }
    log::debug!("Gave up placing {} after {} attempts", entity, max_attempts);
    Err(EnvError::PlacementExhausted {
        entity,
        attempts: max_attempts,
    })
}

/// Uniform point in `[0, grid_size - 1]^2`.
pub fn sample_point<R: Rng>(config: &HazardEnvConfig, rng: &mut R) -> Vec2 {
    let ub = config.upper_bound();
    Vec2::new(rng.gen_range(0.0..=ub), rng.gen_range(0.0..=ub))
}

/// A horizontal (3-5 × 1-2) or vertical (1-2 × 3-5) wall with integer origin,
/// shifted so that it does not exit the grid.
fn sample_wall<R: Rng>(grid: i64, rng: &mut R) -> Wall {
    let x = rng.gen_range(0..grid);
    let y = rng.gen_range(0..grid);
    let (w, h) = if rng.gen_bool(0.5) {
        (rng.gen_range(3..=5), rng.gen_range(1..=2))
    } else {
        (rng.gen_range(1..=2), rng.gen_range(3..=5))
    };
    let (w, h) = (w.min(grid), h.min(grid));
    let x = x.min(grid - w);
    let y = y.min(grid - h);
    Wall::new(x as f32, y as f32, w as f32, h as f32)
}

fn fixed_goal(config: &HazardEnvConfig) -> Option<Vec2> {
    match config.goal {
        GoalPlacement::Fixed(goal) => Some(goal),
        GoalPlacement::Random => None,
    }
}

/// Walls of a new episode. Random walls never cover the agent start nor a
/// fixed goal.
pub fn generate_walls<R: Rng>(
    config: &HazardEnvConfig,
    rng: &mut R,
) -> Result<Vec<Wall>, EnvError> {
    match &config.walls {
        WallLayout::None => Ok(vec![]),
        WallLayout::Fixed(walls) => Ok(walls.clone()),
        WallLayout::Random { count } => {
            let grid = config.grid_size.floor() as i64;
            let start = config.agent_start();
            let goal = fixed_goal(config);
            (0..*count)
                .map(|_| {
                    rejection_sample(
                        "wall",
                        config.placement.max_placement_attempts,
                        rng,
                        |rng| sample_wall(grid, rng),
                        |wall| {
                            !wall.contains(&start) && goal.map_or(true, |g| !wall.contains(&g))
                        },
                    )
                })
                .collect()
        }
    }
}

/// Hazard positions of a new episode.
///
/// Every hazard is farther than `hazard_min_separation` from the others, not
/// inside a wall, and farther than `hazard_min_agent_distance` from the agent
/// start when that constraint is set. With a fixed goal, hazards are also
/// placed farther than `goal_min_distance` from it.
pub fn place_hazards<R: Rng>(
    config: &HazardEnvConfig,
    walls: &[Wall],
    rng: &mut R,
) -> Result<Vec<Vec2>, EnvError> {
    let start = config.agent_start();
    let goal = fixed_goal(config);
    let placement = &config.placement;
    let mut hazards: Vec<Vec2> = Vec::with_capacity(config.n_hazards);

    for _ in 0..config.n_hazards {
        let p = rejection_sample(
            "hazard",
            placement.max_placement_attempts,
            rng,
            |rng| sample_point(config, rng),
            |p| {
                hazards
                    .iter()
                    .all(|h| h.distance(p) > placement.hazard_min_separation)
                    && !inside_any(walls, p)
                    && placement
                        .hazard_min_agent_distance
                        .map_or(true, |d| start.distance(p) > d)
                    && goal.map_or(true, |g| g.distance(p) > placement.goal_min_distance)
            },
        )?;
        hazards.push(p);
    }

    Ok(hazards)
}

/// Goal position of a new episode: farther than `goal_min_distance` from the
/// agent start and from every hazard, and not inside a wall.
pub fn place_goal<R: Rng>(
    config: &HazardEnvConfig,
    walls: &[Wall],
    hazards: &[Vec2],
    rng: &mut R,
) -> Result<Vec2, EnvError> {
    let start = config.agent_start();
    let min_distance = config.placement.goal_min_distance;

    rejection_sample(
        "goal",
        config.placement.max_placement_attempts,
        rng,
        |rng| sample_point(config, rng),
        |p| {
            start.distance(p) > min_distance
                && hazards.iter().all(|h| h.distance(p) > min_distance)
                && !inside_any(walls, p)
        },
    )
}
