//! Errors of the inference adapter.
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum InferenceError {
    /// The decision function does not accept observations of the configured layout.
    #[error("Decision function expects {actual} inputs, observations have {expected}")]
    InputDimMismatch { expected: usize, actual: usize },
}

/// Checks the input dimension reported by a decision function, if any.
pub(crate) fn check_input_dim(expected: usize, actual: Option<usize>) -> Result<(), InferenceError> {
    match actual {
        Some(actual) if actual != expected => {
            Err(InferenceError::InputDimMismatch { expected, actual })
        }
        _ => Ok(()),
    }
}
