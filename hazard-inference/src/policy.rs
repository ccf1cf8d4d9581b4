//! Decision functions as policies of [`HazardEnv`].
use crate::{error::check_input_dim, InferenceError};
use hazard_core::Policy;
use hazard_env::{HazardAct, HazardEnv, HazardObs, ObsLayout};
use hazard_policy_no_backend::{DecisionFunction, Mat};
use std::sync::Arc;

/// Runs a decision function against the simulator, e.g. with
/// [`DefaultEvaluator`](hazard_core::DefaultEvaluator).
pub struct DecisionPolicy<D: DecisionFunction> {
    decision: Arc<D>,
    deterministic: bool,
}

impl<D: DecisionFunction> DecisionPolicy<D> {
    pub fn new(
        decision: Arc<D>,
        layout: &ObsLayout,
        deterministic: bool,
    ) -> Result<Self, InferenceError> {
        check_input_dim(layout.size(), decision.input_dim())?;
        Ok(Self {
            decision,
            deterministic,
        })
    }
}

impl<D: DecisionFunction> Policy<HazardEnv> for DecisionPolicy<D> {
    fn sample(&mut self, obs: &HazardObs) -> HazardAct {
        let obs = Mat::new(obs.to_vec(), obs.shape());
        HazardAct::new(self.decision.decide(&obs, self.deterministic))
    }
}
