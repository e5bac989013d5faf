//! Classifier registry.
//!
//! The set of algorithms is closed: [`ClassifierKind`] names one of them
//! together with its hyperparameters, and [`Classifier`] holds the matching
//! trained model. Both are dispatched by exhaustive `match`, so adding an
//! algorithm without wiring up training and prediction does not compile.
//!
//! # Examples
//!
//! ```
//! use bhava::ml::classifier::ClassifierKind;
//!
//! let kind = ClassifierKind::from_name("SVM-v2").unwrap();
//! assert_eq!(kind.name(), "svm");
//! assert!(ClassifierKind::from_name("unknown").is_err());
//! ```

pub mod gradient_boosting;
pub mod linear;
pub mod linear_svm;
pub mod logistic;
pub mod naive_bayes;
pub mod perceptron;
pub mod tree;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BhavaError, Result};
use crate::ml::sparse::SparseMatrix;

pub use self::gradient_boosting::{GradientBoosting, GradientBoostingParams};
pub use self::linear::LinearModel;
pub use self::linear_svm::LinearSvmParams;
pub use self::logistic::LogisticParams;
pub use self::naive_bayes::{MultinomialNb, NaiveBayesParams};
pub use self::perceptron::PerceptronParams;

/// Name rules in priority order: the first rule whose pattern occurs in the
/// requested name (case-insensitively) wins.
const NAME_RULES: [&str; 5] = ["svm", "logistic", "multi-nb", "sgd", "gradient-boosting"];

/// A classifier algorithm with its hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierKind {
    /// Linear support vector machine (squared hinge loss, one-vs-rest).
    LinearSvm(LinearSvmParams),
    /// Multinomial logistic regression.
    Logistic(LogisticParams),
    /// Multinomial naive Bayes over feature weights.
    MultinomialNb(NaiveBayesParams),
    /// Perceptron-loss stochastic gradient descent (one-vs-rest).
    Perceptron(PerceptronParams),
    /// Gradient-boosted regression trees with multinomial deviance.
    GradientBoosting(GradientBoostingParams),
}

impl ClassifierKind {
    /// Select a classifier by name with default hyperparameters.
    ///
    /// Matching is a case-insensitive substring test against, in order:
    /// `svm`, `logistic`, `multi-nb`, `sgd`, `gradient-boosting`.
    pub fn from_name(name: &str) -> Result<Self> {
        let lowered = name.to_lowercase();
        let rule = NAME_RULES
            .iter()
            .find(|pattern| lowered.contains(*pattern))
            .ok_or_else(|| BhavaError::unsupported_classifier(name))?;

        Ok(match *rule {
            "svm" => ClassifierKind::LinearSvm(LinearSvmParams::default()),
            "logistic" => ClassifierKind::Logistic(LogisticParams::default()),
            "multi-nb" => ClassifierKind::MultinomialNb(NaiveBayesParams::default()),
            "sgd" => ClassifierKind::Perceptron(PerceptronParams::default()),
            _ => ClassifierKind::GradientBoosting(GradientBoostingParams::default()),
        })
    }

    /// Canonical name, used in artifact names.
    pub fn name(&self) -> &'static str {
        match self {
            ClassifierKind::LinearSvm(_) => "svm",
            ClassifierKind::Logistic(_) => "logistic",
            ClassifierKind::MultinomialNb(_) => "multi-nb",
            ClassifierKind::Perceptron(_) => "sgd",
            ClassifierKind::GradientBoosting(_) => "gradient-boosting",
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Training labels mapped onto class indices.
///
/// Classes are the sorted distinct label strings.
#[derive(Debug, Clone)]
pub(crate) struct EncodedLabels {
    pub classes: Vec<String>,
    pub targets: Vec<usize>,
}

impl EncodedLabels {
    pub fn encode(labels: &[String]) -> Self {
        let mut classes: Vec<String> = labels.to_vec();
        classes.sort();
        classes.dedup();
        let targets = labels
            .iter()
            .map(|label| classes.binary_search(label).unwrap_or_default())
            .collect();
        Self { classes, targets }
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// `+1.0` for samples of class `k`, `-1.0` otherwise.
    pub fn signs_for(&self, k: usize) -> Vec<f64> {
        self.targets
            .iter()
            .map(|&target| if target == k { 1.0 } else { -1.0 })
            .collect()
    }
}

/// Index of the largest score; the lowest index wins ties.
pub(crate) fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (index, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = index;
        }
    }
    best
}

/// A trained classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Classifier {
    LinearSvm(LinearModel),
    Logistic(LinearModel),
    MultinomialNb(MultinomialNb),
    Perceptron(LinearModel),
    GradientBoosting(GradientBoosting),
}

impl Classifier {
    /// Fit the algorithm described by `kind` on combined feature rows.
    pub fn fit(kind: &ClassifierKind, features: &SparseMatrix, labels: &[String]) -> Result<Self> {
        if features.n_rows() != labels.len() {
            return Err(BhavaError::input_validation(format!(
                "{} feature rows but {} labels",
                features.n_rows(),
                labels.len()
            )));
        }
        if labels.is_empty() {
            return Err(BhavaError::input_validation(
                "cannot train a classifier on zero samples",
            ));
        }

        let encoded = EncodedLabels::encode(labels);
        if encoded.n_classes() < 2 {
            return Err(BhavaError::input_validation(format!(
                "at least two distinct labels are required, found only {:?}",
                encoded.classes
            )));
        }

        log::info!(
            "training {} on {} samples x {} features, {} classes",
            kind,
            features.n_rows(),
            features.n_cols(),
            encoded.n_classes()
        );

        Ok(match kind {
            ClassifierKind::LinearSvm(params) => {
                Classifier::LinearSvm(linear_svm::fit(features, &encoded, params))
            }
            ClassifierKind::Logistic(params) => {
                Classifier::Logistic(logistic::fit(features, &encoded, params))
            }
            ClassifierKind::MultinomialNb(params) => {
                Classifier::MultinomialNb(MultinomialNb::fit(features, &encoded, params)?)
            }
            ClassifierKind::Perceptron(params) => {
                Classifier::Perceptron(perceptron::fit(features, &encoded, params))
            }
            ClassifierKind::GradientBoosting(params) => {
                Classifier::GradientBoosting(GradientBoosting::fit(features, &encoded, params)?)
            }
        })
    }

    /// Predict one label per row.
    pub fn predict(&self, features: &SparseMatrix) -> Result<Vec<String>> {
        if features.n_cols() != self.n_features() {
            return Err(BhavaError::dimension_mismatch(
                "classifier input features",
                self.n_features(),
                features.n_cols(),
            ));
        }

        let classes = self.classes();
        let predictions = features
            .rows()
            .iter()
            .map(|row| {
                let index = match self {
                    Classifier::LinearSvm(model)
                    | Classifier::Logistic(model)
                    | Classifier::Perceptron(model) => model.predict_index(row),
                    Classifier::MultinomialNb(model) => model.predict_index(row),
                    Classifier::GradientBoosting(model) => model.predict_index(row),
                };
                classes[index].clone()
            })
            .collect();
        Ok(predictions)
    }

    /// Output label domain, sorted.
    pub fn classes(&self) -> &[String] {
        match self {
            Classifier::LinearSvm(model)
            | Classifier::Logistic(model)
            | Classifier::Perceptron(model) => model.classes(),
            Classifier::MultinomialNb(model) => model.classes(),
            Classifier::GradientBoosting(model) => model.classes(),
        }
    }

    /// Number of input features the model was trained on.
    pub fn n_features(&self) -> usize {
        match self {
            Classifier::LinearSvm(model)
            | Classifier::Logistic(model)
            | Classifier::Perceptron(model) => model.n_features(),
            Classifier::MultinomialNb(model) => model.n_features(),
            Classifier::GradientBoosting(model) => model.n_features(),
        }
    }

    /// Canonical algorithm name.
    pub fn name(&self) -> &'static str {
        match self {
            Classifier::LinearSvm(_) => "svm",
            Classifier::Logistic(_) => "logistic",
            Classifier::MultinomialNb(_) => "multi-nb",
            Classifier::Perceptron(_) => "sgd",
            Classifier::GradientBoosting(_) => "gradient-boosting",
        }
    }
}
