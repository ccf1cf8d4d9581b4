//! Core functionalities.
mod env;
mod policy;
mod step;
pub use env::Env;
pub use policy::Policy;
use std::fmt::Debug;
pub use step::{Info, Step};

/// An observation of an environment.
///
/// Environments are not vectorized, so an observation object holds exactly
/// one observation. `len()` reports the number of scalar features in it.
pub trait Obs: Clone + Debug {
    /// Returns the number of scalar features in the observation.
    fn len(&self) -> usize;

    /// Returns `true` if the observation holds no feature.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An action of an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of actions in the object.
    ///
    /// Environments are not vectorized, so the default is 1.
    fn len(&self) -> usize {
        1
    }
}
