//! Request and response bodies of the game-state endpoint.
use crate::{telemetry::Telemetry, InferenceAdapter};
use hazard_policy_no_backend::DecisionFunction;
use serde::{Deserialize, Serialize};

/// Response to a game-state request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateResponse {
    /// Always `"success"`.
    pub status: String,

    /// Label of the chosen action.
    #[serde(rename = "move")]
    pub direction: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<f32>,
}

impl GameStateResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Answers a game-state request body.
///
/// Malformed bodies are answered like empty telemetry; this never fails.
pub fn handle_game_state<D: DecisionFunction>(
    adapter: &InferenceAdapter<D>,
    body: &str,
) -> GameStateResponse {
    let inference = adapter.infer(&Telemetry::from_json(body));

    GameStateResponse {
        status: "success".to_string(),
        direction: inference.label.to_string(),
        reward: inference.diagnostic,
    }
}
