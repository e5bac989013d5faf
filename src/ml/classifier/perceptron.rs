//! Perceptron-loss stochastic gradient descent.
//!
//! Each binary problem updates `w += eta * y * x` whenever
//! `y * (w.x + b) <= 0`, with L2 shrinkage `w *= 1 - eta * alpha` before
//! every sample. Samples are visited in a freshly shuffled order each epoch,
//! drawn from a seeded generator so training is reproducible.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{EncodedLabels, LinearModel};
use crate::ml::sparse::SparseMatrix;

/// Hyperparameters for [`fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptronParams {
    /// L2 regularisation strength.
    pub alpha: f64,
    /// Step size.
    pub eta: f64,
    /// Maximum epochs.
    pub max_iter: usize,
    /// Stop after this many epochs without fewer mistakes.
    pub n_iter_no_change: usize,
    /// Seed for the per-epoch shuffle.
    pub seed: u64,
}

impl Default for PerceptronParams {
    fn default() -> Self {
        Self {
            alpha: 1e-4,
            eta: 1.0,
            max_iter: 1000,
            n_iter_no_change: 5,
            seed: 0,
        }
    }
}

pub(crate) fn fit(
    features: &SparseMatrix,
    labels: &EncodedLabels,
    params: &PerceptronParams,
) -> LinearModel {
    let problems: Vec<usize> = if labels.n_classes() == 2 {
        vec![1]
    } else {
        (0..labels.n_classes()).collect()
    };

    let (weights, intercepts): (Vec<Vec<f64>>, Vec<f64>) = problems
        .par_iter()
        .map(|&k| fit_binary(features, &labels.signs_for(k), params, k as u64))
        .unzip();

    LinearModel::new(labels.classes.clone(), weights, intercepts)
}

fn fit_binary(
    features: &SparseMatrix,
    signs: &[f64],
    params: &PerceptronParams,
    problem: u64,
) -> (Vec<f64>, f64) {
    let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(problem));
    let mut order: Vec<usize> = (0..features.n_rows()).collect();

    // Actual weights are `scale * direction`, so shrinkage stays O(1).
    let mut direction = vec![0.0; features.n_cols()];
    let mut scale = 1.0;
    let mut bias = 0.0;
    let shrink = 1.0 - params.eta * params.alpha;

    let mut fewest_mistakes = usize::MAX;
    let mut stale_epochs = 0;

    for epoch in 0..params.max_iter {
        order.shuffle(&mut rng);
        let mut mistakes = 0;

        for &i in &order {
            let row = features.row(i);
            let y = signs[i];
            let margin = y * (scale * row.dot_dense(&direction) + bias);

            scale *= shrink;
            if scale < 1e-9 {
                direction.iter_mut().for_each(|w| *w *= scale);
                scale = 1.0;
            }

            if margin <= 0.0 {
                mistakes += 1;
                row.add_scaled_to(&mut direction, params.eta * y / scale);
                bias += params.eta * y;
            }
        }

        if mistakes == 0 {
            log::debug!("perceptron separated the data after {} epochs", epoch + 1);
            break;
        }
        if mistakes < fewest_mistakes {
            fewest_mistakes = mistakes;
            stale_epochs = 0;
        } else {
            stale_epochs += 1;
            if stale_epochs >= params.n_iter_no_change {
                break;
            }
        }
    }

    direction.iter_mut().for_each(|w| *w *= scale);
    (direction, bias)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::tests::separable;

    #[test]
    fn test_same_seed_same_model() {
        let (features, labels) = separable();
        let encoded = EncodedLabels::encode(&labels);
        let params = PerceptronParams::default();

        let first = fit(&features, &encoded, &params);
        let second = fit(&features, &encoded, &params);
        assert_eq!(first, second);
    }
}
