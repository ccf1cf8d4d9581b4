//! Decision functions evaluated without a tensor backend.
//!
//! A decision function maps a flattened observation to an action id. It is
//! loaded once and shared read-only, so [`DecisionFunction`] takes `&self`
//! and requires `Send + Sync`.
mod error;
mod mat;
mod mlp;
pub use error::PolicyError;
pub use mat::Mat;
pub use mlp::Mlp;

/// Maps an observation to an action id.
pub trait DecisionFunction: Send + Sync {
    /// Returns an action id for a flattened observation.
    ///
    /// Ids outside the action table are allowed; callers treat them as
    /// unknown actions.
    fn decide(&self, obs: &Mat, deterministic: bool) -> i64;

    /// Length of the flattened observation the function expects, if known.
    fn input_dim(&self) -> Option<usize>;
}
