//! A 2D navigation environment with moving hazards for [`hazard_core`].
//!
//! The agent lives on a continuous square grid. Each episode it starts at the
//! center and has to reach a goal while hazards drift around it and walls
//! block its path. Actions are ids of the nine compass moves (see
//! [`Direction`]); observations are fixed-shape matrices (see [`ObsLayout`]).
//!
//! Here is an example of running the environment with a random policy.
//!
//! ```no_run
//! use anyhow::Result;
//! use hazard_core::{DefaultEvaluator, Evaluator as _, Policy};
//! use hazard_env::{HazardAct, HazardEnv, HazardEnvConfig, HazardObs};
//!
//! struct RandomPolicy;
//!
//! impl Policy<HazardEnv> for RandomPolicy {
//!     fn sample(&mut self, _: &HazardObs) -> HazardAct {
//!         fastrand::i64(0..9).into()
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     env_logger::init();
//!     let config = HazardEnvConfig::default().max_steps(200);
//!     let record = DefaultEvaluator::<HazardEnv>::new(&config, 0, 5)?.evaluate(&mut RandomPolicy)?;
//!     println!("{:?}", record.get_scalar("Episode return")?);
//!     Ok(())
//! }
//! ```
mod act;
mod env;
pub mod error;
pub mod geometry;
mod obs;
pub mod placement;
pub mod reward;
pub mod world;
pub use act::{decode_label, decode_vector, Direction, HazardAct, UNKNOWN_LABEL};
pub use env::{
    GoalPlacement, HazardEnv, HazardEnvConfig, HazardMotion, MoveRule, PlacementConfig,
    WallLayout,
};
pub use obs::{HazardObs, MovingEntity, ObsColumns, ObsLayout, Snapshot};
