//! Inference adapter.
use crate::{error::check_input_dim, telemetry::Telemetry, InferenceError};
use anyhow::Result;
use hazard_env::{decode_label, geometry::Vec2, HazardEnvConfig, HazardObs, ObsLayout};
use hazard_policy_no_backend::{DecisionFunction, Mat};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
    sync::Arc,
};

/// Advisory reward reported along with the action.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticConfig {
    pub goal_radius: f32,
    pub goal_bonus: f32,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            goal_radius: 0.5,
            goal_bonus: 10000.0,
        }
    }
}

impl DiagnosticConfig {
    /// `goal_bonus` within `goal_radius` of the goal, the negated goal distance otherwise.
    pub fn evaluate(&self, agent: Vec2, goal: Vec2) -> f32 {
        let d = agent.distance(&goal);
        if d < self.goal_radius {
            self.goal_bonus
        } else {
            -d
        }
    }
}

/// Configuration of [`InferenceAdapter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceAdapterConfig {
    /// Must match the layout the decision function was trained on.
    pub layout: ObsLayout,

    /// Denominator of the time row.
    pub max_steps: usize,

    /// Sample actions when `false`.
    pub deterministic: bool,

    /// Reports a diagnostic reward when set.
    pub diagnostic: Option<DiagnosticConfig>,
}

impl Default for InferenceAdapterConfig {
    fn default() -> Self {
        Self::from_env_config(&HazardEnvConfig::default())
    }
}

impl InferenceAdapterConfig {
    /// Configuration serving a decision function trained on `config`.
    pub fn from_env_config(config: &HazardEnvConfig) -> Self {
        Self {
            layout: config.obs_layout(),
            max_steps: config.max_steps,
            deterministic: true,
            diagnostic: Some(DiagnosticConfig {
                goal_radius: config.reward.goal_radius,
                goal_bonus: config.reward.goal_bonus,
            }),
        }
    }

    pub fn layout(mut self, v: ObsLayout) -> Self {
        self.layout = v;
        self
    }

    pub fn max_steps(mut self, v: usize) -> Self {
        self.max_steps = v;
        self
    }

    pub fn deterministic(mut self, v: bool) -> Self {
        self.deterministic = v;
        self
    }

    pub fn diagnostic(mut self, v: Option<DiagnosticConfig>) -> Self {
        self.diagnostic = v;
        self
    }

    /// Constructs [`InferenceAdapterConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`InferenceAdapterConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// Result of [`InferenceAdapter::infer`].
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub action_id: i64,

    /// Display label, `"unknown"` for ids outside the action table.
    pub label: &'static str,

    pub diagnostic: Option<f32>,
}

/// Serves a decision function from live telemetry.
///
/// The decision function is a shared read-only handle; the adapter holds no
/// mutable state, so [`InferenceAdapter::infer`] can be called from many
/// threads at once.
pub struct InferenceAdapter<D: DecisionFunction> {
    decision: Arc<D>,
    config: InferenceAdapterConfig,
}

impl<D: DecisionFunction> InferenceAdapter<D> {
    /// Fails if the decision function reports an input dimension other than
    /// the size of the configured observations.
    pub fn new(decision: Arc<D>, config: InferenceAdapterConfig) -> Result<Self, InferenceError> {
        check_input_dim(config.layout.size(), decision.input_dim())?;
        log::info!(
            "Serving a decision function on observations of shape {:?}",
            config.layout.shape()
        );
        Ok(Self { decision, config })
    }

    pub fn config(&self) -> &InferenceAdapterConfig {
        &self.config
    }

    /// Encodes telemetry into an observation.
    pub fn encode(&self, telemetry: &Telemetry) -> HazardObs {
        self.config
            .layout
            .encode(&telemetry.snapshot(self.config.max_steps))
    }

    /// Chooses the action for a telemetry snapshot.
    pub fn infer(&self, telemetry: &Telemetry) -> Inference {
        let layout = &self.config.layout;
        let obs = self.encode(telemetry);
        let action_id = self
            .decision
            .decide(&Mat::new(obs.to_vec(), obs.shape()), self.config.deterministic);
        let label = decode_label(action_id);
        let diagnostic = self.config.diagnostic.map(|d| {
            d.evaluate(obs.position(layout.agent_row()), obs.position(layout.goal_row()))
        });

        log::debug!("Action {} ({}), diagnostic = {:?}", action_id, label, diagnostic);

        Inference {
            action_id,
            label,
            diagnostic,
        }
    }
}
