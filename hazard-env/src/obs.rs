//! Observation of [HazardEnv](crate::HazardEnv) and its fixed-shape encoding.
//!
//! An observation is a row-major matrix with one row per entity, in the order
//! agent, walls, hazards, goal and an optional time row. Wall and hazard rows
//! are padded with zero rows up to the configured maxima, so the shape of the
//! observation only depends on the [`ObsLayout`].
use crate::geometry::{Vec2, Wall};
use hazard_core::Obs;
use serde::{Deserialize, Serialize};

/// Number of columns per entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObsColumns {
    /// `[x, y]` for every entity.
    Position,

    /// `[x, y, w, h]` for walls, `[x, y, vx, vy]` for hazards,
    /// `[x, y, 0, 0]` for the agent and the goal.
    Extended,
}

impl ObsColumns {
    pub fn n_cols(&self) -> usize {
        match self {
            ObsColumns::Position => 2,
            ObsColumns::Extended => 4,
        }
    }
}

/// A moving entity as seen by the encoder.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovingEntity {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// A borrowed view of the entities to be encoded.
///
/// Both the simulator and live telemetry produce snapshots.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub agent: Vec2,
    pub walls: &'a [Wall],
    pub hazards: Vec<MovingEntity>,
    pub goal: Vec2,

    /// Elapsed fraction of the episode, written into the time row if enabled.
    pub time_fraction: Option<f32>,
}

/// Shape of observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObsLayout {
    pub max_walls: usize,
    pub max_hazards: usize,
    pub columns: ObsColumns,
    pub time_feature: bool,
}

impl ObsLayout {
    /// `1 + max_walls + max_hazards + 1`, plus one if the time row is enabled.
    pub fn n_rows(&self) -> usize {
        1 + self.max_walls + self.max_hazards + 1 + self.time_feature as usize
    }

    pub fn n_cols(&self) -> usize {
        self.columns.n_cols()
    }

    pub fn shape(&self) -> [usize; 2] {
        [self.n_rows(), self.n_cols()]
    }

    /// Number of scalars in a flattened observation.
    pub fn size(&self) -> usize {
        self.n_rows() * self.n_cols()
    }

    pub fn agent_row(&self) -> usize {
        0
    }

    pub fn wall_rows(&self) -> std::ops::Range<usize> {
        1..1 + self.max_walls
    }

    pub fn hazard_rows(&self) -> std::ops::Range<usize> {
        let start = 1 + self.max_walls;
        start..start + self.max_hazards
    }

    pub fn goal_row(&self) -> usize {
        1 + self.max_walls + self.max_hazards
    }

    /// Index of the time row, if enabled.
    pub fn time_row(&self) -> Option<usize> {
        self.time_feature.then(|| self.goal_row() + 1)
    }

    /// Encodes a snapshot.
    ///
    /// Entities beyond `max_walls`/`max_hazards` are dropped with a warning.
    pub fn encode(&self, snapshot: &Snapshot) -> HazardObs {
        let n_cols = self.n_cols();
        let mut obs = HazardObs::zeros(self.shape());

        obs.set_row(self.agent_row(), &[snapshot.agent.x, snapshot.agent.y]);

        if snapshot.walls.len() > self.max_walls {
            log::warn!(
                "{} walls exceed the observation capacity of {}, extra walls are dropped",
                snapshot.walls.len(),
                self.max_walls
            );
        }
        for (row, wall) in self.wall_rows().zip(snapshot.walls.iter()) {
            let v = [wall.x, wall.y, wall.w, wall.h];
            obs.set_row(row, &v[..n_cols]);
        }

        if snapshot.hazards.len() > self.max_hazards {
            log::warn!(
                "{} hazards exceed the observation capacity of {}, extra hazards are dropped",
                snapshot.hazards.len(),
                self.max_hazards
            );
        }
        for (row, hazard) in self.hazard_rows().zip(snapshot.hazards.iter()) {
            let v = [
                hazard.position.x,
                hazard.position.y,
                hazard.velocity.x,
                hazard.velocity.y,
            ];
            obs.set_row(row, &v[..n_cols]);
        }

        obs.set_row(self.goal_row(), &[snapshot.goal.x, snapshot.goal.y]);

        if let (Some(row), Some(t)) = (self.time_row(), snapshot.time_fraction) {
            obs.set_row(row, &[t]);
        }

        obs
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Observation of [HazardEnv](crate::HazardEnv), a row-major `rows × cols` matrix.
pub struct HazardObs {
    data: Vec<f32>,
    shape: [usize; 2],
}

impl HazardObs {
    fn zeros(shape: [usize; 2]) -> Self {
        Self {
            data: vec![0.0; shape[0] * shape[1]],
            shape,
        }
    }

    /// Writes `values` at the beginning of row `i`; remaining columns keep zero.
    fn set_row(&mut self, i: usize, values: &[f32]) {
        let start = i * self.shape[1];
        self.data[start..start + values.len()].copy_from_slice(values);
    }

    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    pub fn row(&self, i: usize) -> &[f32] {
        let n_cols = self.shape[1];
        &self.data[i * n_cols..(i + 1) * n_cols]
    }

    /// Position stored in the first two columns of row `i`.
    pub fn position(&self, i: usize) -> Vec2 {
        let row = self.row(i);
        Vec2::new(row[0], row[1])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.clone()
    }
}

impl Obs for HazardObs {
    fn len(&self) -> usize {
        self.data.len()
    }
}

impl From<HazardObs> for Vec<f32> {
    fn from(obs: HazardObs) -> Self {
        obs.data
    }
}
