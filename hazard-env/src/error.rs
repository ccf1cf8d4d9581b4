//! Errors of the environment.
use thiserror::Error;

/// Errors of the environment.
#[derive(Error, Debug, PartialEq)]
pub enum EnvError {
    /// Rejection sampling did not find an admissible position.
    ///
    /// This means the placement constraints cannot be met by the configuration.
    #[error("Failed to place {entity} within {attempts} attempts")]
    PlacementExhausted {
        entity: &'static str,
        attempts: usize,
    },

    /// The configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
