//! Serves a trained decision function to a live game.
//!
//! The game client posts [telemetry](telemetry::Telemetry) as JSON;
//! [`InferenceAdapter`] encodes it with the same [`ObsLayout`](hazard_env::ObsLayout)
//! the function was trained on, asks the function for an action id and
//! answers with the label of the move.
//!
//! ```no_run
//! use hazard_inference::{api::handle_game_state, InferenceAdapter, InferenceAdapterConfig};
//! use hazard_policy_no_backend::Mlp;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mlp: Mlp = serde_json::from_str(&std::fs::read_to_string("mlp.json")?)?;
//! let adapter = InferenceAdapter::new(Arc::new(mlp), InferenceAdapterConfig::default())?;
//! let response = handle_game_state(&adapter, r#"{"player": {"position": [3, 4]}}"#);
//! println!("{}", response.to_json()?);
//! # Ok(())
//! # }
//! ```
mod adapter;
pub mod api;
mod error;
mod policy;
pub mod telemetry;
pub use adapter::{DiagnosticConfig, Inference, InferenceAdapter, InferenceAdapterConfig};
pub use error::InferenceError;
pub use policy::DecisionPolicy;
