//! Errors of decision functions.
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PolicyError {
    /// Weights and biases do not chain into a network.
    #[error("Invalid layers: {0}")]
    InvalidLayers(String),

    #[error("Data of {len} elements does not fit shape {shape:?}")]
    ShapeMismatch { len: usize, shape: [usize; 2] },
}
