use crate::{DecisionFunction, Mat, PolicyError};
use rand::{distributions::WeightedIndex, prelude::Distribution};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(try_from = "MlpRaw")]
/// Multilayer perceptron with ReLU activation function.
///
/// The output layer is linear; its entries are the scores of the action ids.
/// Deserialized networks go through the same checks as [`Mlp::new`].
pub struct Mlp {
    /// Weights of layers, `[out, in]`.
    ws: Vec<Mat>,

    /// Biases of layers, `[out, 1]`.
    bs: Vec<Mat>,
}

#[derive(Deserialize)]
struct MlpRaw {
    ws: Vec<Mat>,
    bs: Vec<Mat>,
}

impl TryFrom<MlpRaw> for Mlp {
    type Error = PolicyError;

    fn try_from(raw: MlpRaw) -> Result<Self, Self::Error> {
        Self::new(raw.ws, raw.bs)
    }
}

impl Mlp {
    /// Checks that consecutive layers are compatible.
    pub fn new(ws: Vec<Mat>, bs: Vec<Mat>) -> Result<Self, PolicyError> {
        if ws.is_empty() || ws.len() != bs.len() {
            return Err(PolicyError::InvalidLayers(format!(
                "{} weights and {} biases",
                ws.len(),
                bs.len()
            )));
        }
        for (i, (w, b)) in ws.iter().zip(bs.iter()).enumerate() {
            if b.shape != [w.shape[0], 1] {
                return Err(PolicyError::InvalidLayers(format!(
                    "layer {}: weight {:?}, bias {:?}",
                    i, w.shape, b.shape
                )));
            }
            if i > 0 && ws[i - 1].shape[0] != w.shape[1] {
                return Err(PolicyError::InvalidLayers(format!(
                    "layer {} expects {} inputs, previous layer emits {}",
                    i,
                    w.shape[1],
                    ws[i - 1].shape[0]
                )));
            }
        }
        Ok(Self { ws, bs })
    }

    pub fn forward(&self, x: &Mat) -> Mat {
        let n_layers = self.ws.len();
        let mut x = x.clone();
        for i in 0..n_layers {
            x = self.ws[i].matmul(&x).add(&self.bs[i]);
            if i != n_layers - 1 {
                x = x.relu();
            }
        }
        x
    }

    /// Number of inputs of the first layer.
    pub fn n_inputs(&self) -> usize {
        self.ws.first().map_or(0, |w| w.shape[1])
    }

    /// Number of outputs of the last layer.
    pub fn n_outputs(&self) -> usize {
        self.ws.last().map_or(0, |w| w.shape[0])
    }
}

impl DecisionFunction for Mlp {
    fn decide(&self, obs: &Mat, deterministic: bool) -> i64 {
        let x = Mat::from(obs.data.clone());
        let scores = self.forward(&x);
        if deterministic {
            return scores.argmax() as i64;
        }

        let probs = scores.softmax();
        match WeightedIndex::new(&probs.data) {
            Ok(dist) => dist.sample(&mut rand::thread_rng()) as i64,
            Err(e) => {
                log::warn!("Falling back to argmax, invalid action probabilities: {}", e);
                scores.argmax() as i64
            }
        }
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.n_inputs())
    }
}
