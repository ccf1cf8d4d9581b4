use crate::PolicyError;
use serde::{Deserialize, Serialize};

/// Dense row-major matrix.
///
/// Vectors are column matrices of shape `[n, 1]`. Deserialization rejects
/// data that does not fit the shape.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(try_from = "MatRaw")]
pub struct Mat {
    pub data: Vec<f32>,
    pub shape: [usize; 2],
}

#[derive(Deserialize)]
struct MatRaw {
    data: Vec<f32>,
    shape: [usize; 2],
}

impl TryFrom<MatRaw> for Mat {
    type Error = PolicyError;

    fn try_from(raw: MatRaw) -> Result<Self, Self::Error> {
        if raw.data.len() != raw.shape[0] * raw.shape[1] {
            return Err(PolicyError::ShapeMismatch {
                len: raw.data.len(),
                shape: raw.shape,
            });
        }
        Ok(Self {
            data: raw.data,
            shape: raw.shape,
        })
    }
}

impl Mat {
    /// Panics if `data` does not hold `shape[0] * shape[1]` elements.
    pub fn new(data: Vec<f32>, shape: [usize; 2]) -> Self {
        assert_eq!(
            data.len(),
            shape[0] * shape[1],
            "Data of {} elements does not fit shape {:?}",
            data.len(),
            shape
        );
        Self { data, shape }
    }

    pub fn zeros(shape: [usize; 2]) -> Self {
        Self {
            data: vec![0.0; shape[0] * shape[1]],
            shape,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn matmul(&self, x: &Mat) -> Self {
        let (m, l, n) = (self.shape[0], self.shape[1], x.shape[1]);
        if l != x.shape[0] {
            panic!(
                "Trying to multiply matrices of incompatible sizes: {:?}",
                (&self.shape, &x.shape)
            );
        }

        let mut data = vec![0.0f32; m * n];
        for i in 0..m {
            for j in 0..n {
                let kk = i * n + j;
                for k in 0..l {
                    data[kk] += self.data[i * l + k] * x.data[k * n + j];
                }
            }
        }

        Self {
            shape: [m, n],
            data,
        }
    }

    pub fn add(&self, x: &Mat) -> Self {
        if self.shape != x.shape {
            panic!(
                "Trying to add matrices of different sizes: {:?}",
                (&self.shape, &x.shape)
            );
        }

        let data = self
            .data
            .iter()
            .zip(x.data.iter())
            .map(|(a, b)| *a + *b)
            .collect();

        Self {
            data,
            shape: self.shape,
        }
    }

    pub fn relu(&self) -> Self {
        let data = self.data.iter().map(|a| a.max(0.0)).collect();

        Self {
            data,
            shape: self.shape,
        }
    }

    /// Index of the largest element, the first one on ties.
    ///
    /// `NaN`s are never selected unless every element is `NaN`.
    pub fn argmax(&self) -> usize {
        let mut best = 0;
        for (i, v) in self.data.iter().enumerate() {
            if *v > self.data[best] || self.data[best].is_nan() {
                best = i;
            }
        }
        best
    }

    /// Softmax over all elements.
    pub fn softmax(&self) -> Self {
        let max = self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let exp: Vec<f32> = self.data.iter().map(|v| (v - max).exp()).collect();
        let sum: f32 = exp.iter().sum();

        Self {
            data: exp.into_iter().map(|v| v / sum).collect(),
            shape: self.shape,
        }
    }
}

impl From<Vec<f32>> for Mat {
    fn from(x: Vec<f32>) -> Self {
        Self {
            shape: [x.len(), 1],
            data: x,
        }
    }
}
