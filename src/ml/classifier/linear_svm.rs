//! Linear SVM trained by dual coordinate descent.
//!
//! Minimises `0.5 * ||w||^2 + C * sum(max(0, 1 - y * (w.x + b))^2)` per
//! binary problem. The intercept is learnt as the weight of a constant
//! feature equal to 1, so it is regularised like every other weight.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{EncodedLabels, LinearModel};
use crate::ml::sparse::SparseMatrix;

/// Hyperparameters for [`fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvmParams {
    /// Inverse regularisation strength.
    pub c: f64,
    /// Stop once the projected gradient spread falls below this value.
    pub tol: f64,
    /// Maximum passes over the data.
    pub max_iter: usize,
}

impl Default for LinearSvmParams {
    fn default() -> Self {
        Self {
            c: 1.0,
            tol: 1e-4,
            max_iter: 1000,
        }
    }
}

/// Train one-vs-rest (a single binary problem when there are two classes).
pub(crate) fn fit(
    features: &SparseMatrix,
    labels: &EncodedLabels,
    params: &LinearSvmParams,
) -> LinearModel {
    let problems: Vec<usize> = if labels.n_classes() == 2 {
        vec![1]
    } else {
        (0..labels.n_classes()).collect()
    };

    let (weights, intercepts): (Vec<Vec<f64>>, Vec<f64>) = problems
        .par_iter()
        .map(|&k| fit_binary(features, &labels.signs_for(k), params))
        .unzip();

    LinearModel::new(labels.classes.clone(), weights, intercepts)
}

fn fit_binary(features: &SparseMatrix, signs: &[f64], params: &LinearSvmParams) -> (Vec<f64>, f64) {
    let n = features.n_rows();
    let diag = 0.5 / params.c;

    let mut weights = vec![0.0; features.n_cols()];
    let mut bias = 0.0;
    let mut alpha = vec![0.0; n];
    let q_diag: Vec<f64> = features
        .rows()
        .iter()
        .map(|row| row.squared_norm() + 1.0 + diag)
        .collect();

    for iteration in 0..params.max_iter {
        // Zero-anchored, so the spread bounds every violation.
        let mut pg_max: f64 = 0.0;
        let mut pg_min: f64 = 0.0;

        for i in 0..n {
            let row = features.row(i);
            let y = signs[i];
            let gradient = y * (row.dot_dense(&weights) + bias) - 1.0 + diag * alpha[i];
            let projected = if alpha[i] == 0.0 {
                gradient.min(0.0)
            } else {
                gradient
            };
            pg_max = pg_max.max(projected);
            pg_min = pg_min.min(projected);

            if projected.abs() > 1e-12 {
                let previous = alpha[i];
                alpha[i] = (previous - gradient / q_diag[i]).max(0.0);
                let step = (alpha[i] - previous) * y;
                row.add_scaled_to(&mut weights, step);
                bias += step;
            }
        }

        if pg_max - pg_min <= params.tol {
            log::debug!("linear svm converged after {} passes", iteration + 1);
            break;
        }
    }

    (weights, bias)
}
