use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// A dense linear layer: `n_outputs` rows of `n_features` weights plus one
/// bias per output. `apply` computes the raw logits `W*x + b`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearLayer {
    weights: Vec<f32>,
    bias: Vec<f32>,
    n_features: usize,
}

impl LinearLayer {
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, n_features: usize) -> Self {
        debug_assert_eq!(weights.len(), bias.len() * n_features);
        Self {
            weights,
            bias,
            n_features,
        }
    }

    pub fn n_outputs(&self) -> usize {
        self.bias.len()
    }

    pub fn apply(&self, x: &[f32]) -> Vec<f32> {
        let mut out = self.bias.clone();
        for (row, out_val) in self.weights.chunks(self.n_features).zip(out.iter_mut()) {
            *out_val += row.iter().zip(x).map(|(w, v)| w * v).sum::<f32>();
        }
        out
    }
}

/// The classifier's scoring capability, resolved once at load time from the
/// shape of the persisted model and whether it was calibrated.
///
/// `scores` always returns a vector aligned with the class id order
/// regardless of which variant is active underneath.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ClassifierModel {
    /// A calibrated multi-class model: raw logits are passed through
    /// softmax so scores sum to 1.
    ProbaMultiClass(LinearLayer),
    /// A single real-valued decision output for a two-class problem:
    /// expanded to `[1 - sigmoid(x), sigmoid(x)]`.
    DecisionBinary(LinearLayer),
    /// An uncalibrated multi-class decision function: raw logits, one per
    /// class, returned unchanged.
    DecisionMultiClass(LinearLayer),
}

impl ClassifierModel {
    /// Resolves the capability variant from the persisted layer's shape and
    /// the `calibrated` flag recorded alongside it at save time.
    pub fn resolve(layer: LinearLayer, n_classes: usize, calibrated: bool) -> Result<Self, ClassifierError> {
        let n_outputs = layer.n_outputs();
        if n_outputs == 1 && n_classes == 2 {
            return Ok(ClassifierModel::DecisionBinary(layer));
        }
        if n_outputs == n_classes {
            return Ok(if calibrated {
                ClassifierModel::ProbaMultiClass(layer)
            } else {
                ClassifierModel::DecisionMultiClass(layer)
            });
        }
        Err(ClassifierError::Shape {
            expected: n_classes,
            actual: n_outputs,
        })
    }

    pub fn scores(&self, x: &[f32]) -> Vec<f32> {
        match self {
            ClassifierModel::ProbaMultiClass(layer) => softmax(&layer.apply(x)),
            ClassifierModel::DecisionBinary(layer) => {
                let logit = layer.apply(x)[0];
                let s = sigmoid(logit);
                vec![1.0 - s, s]
            }
            ClassifierModel::DecisionMultiClass(layer) => layer.apply(x),
        }
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum <= 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|v| v / sum).collect()
}
