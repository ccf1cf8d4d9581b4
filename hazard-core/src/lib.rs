#![warn(missing_docs)]
//! Core traits shared by the hazard navigation environment and its policies.
//!
//! The main entities interact as follows:
//!
//! * an environment ([`Env`]) emits observations ([`Obs`]),
//! * a policy ([`Policy`]) maps an observation to an action ([`Act`]),
//! * the environment consumes the action and emits a [`Step`] carrying the
//!   next observation, the reward, termination flags and [`Info`].
//!
//! [`DefaultEvaluator`] runs whole episodes with a policy and reports the
//! average return in a [`record::Record`].
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{Act, Env, Info, Obs, Policy, Step};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};
