//! Gradient-boosted regression trees with multinomial deviance.
//!
//! Every stage fits one regression tree per class to the negative gradient
//! `y_k - p_k` of the softmax loss, then sets each leaf with a single Newton
//! step: `(K - 1) / K * sum(r) / sum(|r| * (1 - |r|))`.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::logistic::softmax;
use super::tree::{self, TreeNode, TreeParams};
use super::{EncodedLabels, argmax};
use crate::error::{BhavaError, Result};
use crate::ml::sparse::{SparseMatrix, SparseVector};

/// Hyperparameters for [`GradientBoosting`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingParams {
    /// Number of boosting stages.
    pub n_estimators: usize,
    /// Shrinkage applied to every tree.
    pub learning_rate: f64,
    /// Maximum depth of each tree.
    pub max_depth: usize,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
}

impl Default for GradientBoostingParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            learning_rate: 0.1,
            max_depth: 3,
            min_samples_split: 2,
        }
    }
}

/// A boosted tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoosting {
    classes: Vec<String>,
    /// Initial raw score per class: log class prior.
    init: Vec<f64>,
    /// `stages[stage][class]`.
    stages: Vec<Vec<TreeNode>>,
    learning_rate: f64,
    n_features: usize,
}

impl GradientBoosting {
    pub(crate) fn fit(
        features: &SparseMatrix,
        labels: &EncodedLabels,
        params: &GradientBoostingParams,
    ) -> Result<Self> {
        if params.n_estimators == 0 || params.max_depth == 0 {
            return Err(BhavaError::invalid_config(
                "gradient boosting needs at least one estimator of depth >= 1",
            ));
        }
        if params.learning_rate <= 0.0 {
            return Err(BhavaError::invalid_config(format!(
                "gradient boosting learning rate must be positive, got {}",
                params.learning_rate
            )));
        }

        let n = features.n_rows();
        let k = labels.n_classes();
        let mut counts = vec![0usize; k];
        for &target in &labels.targets {
            counts[target] += 1;
        }
        let init: Vec<f64> = counts
            .iter()
            .map(|&count| (count as f64 / n as f64).ln())
            .collect();

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
        };
        let factor = (k as f64 - 1.0) / k as f64;

        let mut raw: Vec<Vec<f64>> = vec![init.clone(); n];
        let mut stages = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let probs: Vec<Vec<f64>> = raw
                .iter()
                .map(|scores| {
                    let mut p = scores.clone();
                    softmax(&mut p);
                    p
                })
                .collect();

            let trees: Vec<TreeNode> = (0..k)
                .into_par_iter()
                .map(|class| {
                    let residuals: Vec<f64> = probs
                        .iter()
                        .zip(&labels.targets)
                        .map(|(p, &target)| f64::from(target == class) - p[class])
                        .collect();
                    let leaf_value = |samples: &[usize]| {
                        let (numerator, denominator) =
                            samples.iter().fold((0.0, 0.0), |(num, den), &i| {
                                let r = residuals[i];
                                (num + r, den + r.abs() * (1.0 - r.abs()))
                            });
                        if denominator.abs() < 1e-150 {
                            0.0
                        } else {
                            factor * numerator / denominator
                        }
                    };
                    tree::grow(features, &residuals, tree_params, &leaf_value)
                })
                .collect();

            for (scores, row) in raw.iter_mut().zip(features.rows()) {
                for (score, tree) in scores.iter_mut().zip(&trees) {
                    *score += params.learning_rate * tree.predict(row);
                }
            }
            stages.push(trees);
        }

        log::debug!("grew {} boosting stages x {} trees", stages.len(), k);

        Ok(Self {
            classes: labels.classes.clone(),
            init,
            stages,
            learning_rate: params.learning_rate,
            n_features: features.n_cols(),
        })
    }

    /// Raw per-class scores before softmax.
    pub fn decision_function(&self, row: &SparseVector) -> Vec<f64> {
        let mut scores = self.init.clone();
        for trees in &self.stages {
            for (score, tree) in scores.iter_mut().zip(trees) {
                *score += self.learning_rate * tree.predict(row);
            }
        }
        scores
    }

    pub(crate) fn predict_index(&self, row: &SparseVector) -> usize {
        argmax(&self.decision_function(row))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of boosting stages.
    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::classifier::tests::three_classes;

    #[test]
    fn test_stage_count_and_prior_start() {
        let (features, labels) = three_classes();
        let encoded = EncodedLabels::encode(&labels);
        let params = GradientBoostingParams {
            n_estimators: 5,
            ..GradientBoostingParams::default()
        };
        let model = GradientBoosting::fit(&features, &encoded, &params).unwrap();

        assert_eq!(model.n_stages(), 5);
        let uniform = (1.0f64 / 3.0).ln();
        assert!(model.init.iter().all(|&s| (s - uniform).abs() < 1e-12));
    }

    #[test]
    fn test_rejects_zero_estimators() {
        let (features, labels) = three_classes();
        let encoded = EncodedLabels::encode(&labels);
        let params = GradientBoostingParams {
            n_estimators: 0,
            ..GradientBoostingParams::default()
        };
        assert!(matches!(
            GradientBoosting::fit(&features, &encoded, &params),
            Err(BhavaError::InvalidConfig(_))
        ));
    }
}
