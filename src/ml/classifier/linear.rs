//! Shared linear decision function.

use serde::{Deserialize, Serialize};

use super::argmax;
use crate::ml::sparse::SparseVector;

/// Per-class weight vectors plus intercepts.
///
/// With a single weight row the model is binary: a positive score selects
/// `classes[1]`, anything else `classes[0]`. With one row per class the
/// highest score wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    classes: Vec<String>,
    weights: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
    n_features: usize,
}

impl LinearModel {
    pub(crate) fn new(classes: Vec<String>, weights: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Self {
        let n_features = weights.first().map_or(0, Vec::len);
        Self {
            classes,
            weights,
            intercepts,
            n_features,
        }
    }

    /// Raw decision scores, one per weight row.
    pub fn decision_function(&self, row: &SparseVector) -> Vec<f64> {
        self.weights
            .iter()
            .zip(&self.intercepts)
            .map(|(weights, intercept)| row.dot_dense(weights) + intercept)
            .collect()
    }

    pub(crate) fn predict_index(&self, row: &SparseVector) -> usize {
        let scores = self.decision_function(row);
        if scores.len() == 1 {
            usize::from(scores[0] > 0.0)
        } else {
            argmax(&scores)
        }
    }

    /// Output classes, sorted.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Input dimensionality.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Weight rows.
    pub fn weights(&self) -> &[Vec<f64>] {
        &self.weights
    }
}
