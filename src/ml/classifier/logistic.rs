//! Multinomial logistic regression.
//!
//! Minimises the mean softmax cross-entropy plus `||W||^2 / (2 * C * n)` by
//! full-batch gradient descent. Intercepts are not penalised.

use serde::{Deserialize, Serialize};

use super::{EncodedLabels, LinearModel};
use crate::ml::sparse::SparseMatrix;

/// Hyperparameters for [`fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticParams {
    /// Inverse regularisation strength.
    pub c: f64,
    /// Maximum gradient steps.
    pub max_iter: usize,
    /// Step size.
    pub learning_rate: f64,
    /// Stop once the largest gradient component falls below this value.
    pub tol: f64,
}

impl Default for LogisticParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 300,
            learning_rate: 0.5,
            tol: 1e-4,
        }
    }
}

/// Numerically stable in-place softmax.
pub(crate) fn softmax(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut total = 0.0;
    for score in scores.iter_mut() {
        *score = (*score - max).exp();
        total += *score;
    }
    for score in scores.iter_mut() {
        *score /= total;
    }
}

pub(crate) fn fit(
    features: &SparseMatrix,
    labels: &EncodedLabels,
    params: &LogisticParams,
) -> LinearModel {
    let n = features.n_rows();
    let d = features.n_cols();
    let k = labels.n_classes();
    let scale = 1.0 / n as f64;
    let penalty = 1.0 / (params.c * n as f64);

    let mut weights = vec![vec![0.0; d]; k];
    let mut intercepts = vec![0.0; k];

    for iteration in 0..params.max_iter {
        let mut weight_grad = vec![vec![0.0; d]; k];
        let mut intercept_grad = vec![0.0; k];

        for (row, &target) in features.rows().iter().zip(&labels.targets) {
            let mut probs: Vec<f64> = weights
                .iter()
                .zip(&intercepts)
                .map(|(w, b)| row.dot_dense(w) + b)
                .collect();
            softmax(&mut probs);

            for (class, prob) in probs.iter().enumerate() {
                let residual = prob - if class == target { 1.0 } else { 0.0 };
                row.add_scaled_to(&mut weight_grad[class], residual * scale);
                intercept_grad[class] += residual * scale;
            }
        }

        let mut largest: f64 = 0.0;
        for class in 0..k {
            for (grad, weight) in weight_grad[class].iter_mut().zip(&weights[class]) {
                *grad += penalty * weight;
                largest = largest.max(grad.abs());
            }
            largest = largest.max(intercept_grad[class].abs());
        }

        for class in 0..k {
            for (weight, grad) in weights[class].iter_mut().zip(&weight_grad[class]) {
                *weight -= params.learning_rate * grad;
            }
            intercepts[class] -= params.learning_rate * intercept_grad[class];
        }

        if largest < params.tol {
            log::debug!("logistic regression converged after {} steps", iteration + 1);
            break;
        }
    }

    LinearModel::new(labels.classes.clone(), weights, intercepts)
}
