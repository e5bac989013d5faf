//! Multinomial naive Bayes.

use serde::{Deserialize, Serialize};

use super::{EncodedLabels, argmax};
use crate::error::{BhavaError, Result};
use crate::ml::sparse::{SparseMatrix, SparseVector};

/// Hyperparameters for [`MultinomialNb`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesParams {
    /// Additive (Lidstone) smoothing.
    pub alpha: f64,
}

impl Default for NaiveBayesParams {
    fn default() -> Self {
        Self { alpha: 0.1 }
    }
}

/// Multinomial naive Bayes over non-negative feature weights.
///
/// TF-IDF rows are treated as fractional counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    /// `feature_log_prob[class][feature]`.
    feature_log_prob: Vec<Vec<f64>>,
    n_features: usize,
}

impl MultinomialNb {
    pub(crate) fn fit(
        features: &SparseMatrix,
        labels: &EncodedLabels,
        params: &NaiveBayesParams,
    ) -> Result<Self> {
        if features.min_value().is_some_and(|value| value < 0.0) {
            return Err(BhavaError::input_validation(
                "multinomial naive Bayes requires non-negative features",
            ));
        }
        if params.alpha <= 0.0 {
            return Err(BhavaError::invalid_config(format!(
                "naive Bayes alpha must be positive, got {}",
                params.alpha
            )));
        }

        let k = labels.n_classes();
        let d = features.n_cols();
        let mut class_counts = vec![0usize; k];
        let mut feature_counts = vec![vec![0.0; d]; k];
        for (row, &target) in features.rows().iter().zip(&labels.targets) {
            class_counts[target] += 1;
            row.add_scaled_to(&mut feature_counts[target], 1.0);
        }

        let n = labels.targets.len() as f64;
        let class_log_prior = class_counts
            .iter()
            .map(|&count| (count as f64 / n).ln())
            .collect();

        let feature_log_prob = feature_counts
            .into_iter()
            .map(|counts| {
                let total: f64 = counts.iter().sum::<f64>() + params.alpha * d as f64;
                let log_total = total.ln();
                counts
                    .into_iter()
                    .map(|count| (count + params.alpha).ln() - log_total)
                    .collect()
            })
            .collect();

        Ok(Self {
            classes: labels.classes.clone(),
            class_log_prior,
            feature_log_prob,
            n_features: d,
        })
    }

    /// Unnormalised joint log likelihood of each class.
    pub fn joint_log_likelihood(&self, row: &SparseVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, log_prob)| prior + row.dot_dense(log_prob))
            .collect()
    }

    pub(crate) fn predict_index(&self, row: &SparseVector) -> usize {
        argmax(&self.joint_log_likelihood(row))
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}
