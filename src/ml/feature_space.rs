//! TF-IDF feature space for text feature extraction.

use std::collections::HashMap;

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{AnalyzerConfig, TextAnalyzer};
use crate::error::{BhavaError, Result};
use crate::ml::sparse::{SparseMatrix, SparseVector};

/// A fitted vocabulary plus one inverse document frequency weight per term.
///
/// The vocabulary is fixed once [`fit`](Self::fit) returns: `transform`
/// ignores unseen tokens and never adds to it. Term indices follow sorted
/// token order, so the same corpus always yields the same feature layout.
#[derive(Clone, Serialize, Deserialize)]
pub struct FeatureSpace {
    /// Analyzer used for fitting; transforms rebuild the same analyzer.
    config: AnalyzerConfig,
    /// Vocabulary: token -> column index.
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency for each column.
    idf: Vec<f64>,
    /// Number of lines the space was fitted on.
    n_documents: usize,
    #[serde(skip)]
    analyzer: Option<TextAnalyzer>,
}

impl std::fmt::Debug for FeatureSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureSpace")
            .field("analyzer", &self.config.to_string())
            .field("vocabulary_size", &self.vocabulary.len())
            .field("n_documents", &self.n_documents)
            .finish()
    }
}

impl PartialEq for FeatureSpace {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.vocabulary == other.vocabulary
            && self.idf == other.idf
            && self.n_documents == other.n_documents
    }
}

impl FeatureSpace {
    /// Fit a feature space on a training corpus.
    ///
    /// IDF is smoothed: `ln((1 + N) / (1 + df)) + 1`, where `N` is the number
    /// of lines and `df` the number of lines containing the token.
    pub fn fit(corpus: &[String], config: AnalyzerConfig) -> Result<Self> {
        if corpus.is_empty() {
            return Err(BhavaError::empty_corpus(format!(
                "cannot fit a {} feature space on zero lines",
                config.name()
            )));
        }

        let analyzer = config.build()?;
        let mut document_frequency: AHashMap<String, usize> = AHashMap::new();

        for line in corpus {
            let unique_tokens: AHashSet<String> = analyzer.analyze(line)?.into_iter().collect();
            for token in unique_tokens {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(BhavaError::input_validation(format!(
                "empty {config} vocabulary: no line produced any token"
            )));
        }

        let mut terms: Vec<(String, usize)> = document_frequency.into_iter().collect();
        terms.sort_by(|a, b| a.0.cmp(&b.0));

        let n_documents = corpus.len();
        let mut vocabulary = HashMap::with_capacity(terms.len());
        let mut idf = Vec::with_capacity(terms.len());
        for (index, (term, df)) in terms.into_iter().enumerate() {
            idf.push(((n_documents as f64 + 1.0) / (df as f64 + 1.0)).ln() + 1.0);
            vocabulary.insert(term, index);
        }

        log::debug!(
            "fitted {} feature space: {} terms from {} lines",
            config,
            vocabulary.len(),
            n_documents
        );

        Ok(Self {
            config,
            vocabulary,
            idf,
            n_documents,
            analyzer: Some(analyzer),
        })
    }

    /// Rebuild the analyzer after deserialization.
    pub(crate) fn prepare(&mut self) -> Result<()> {
        if self.analyzer.is_none() {
            self.analyzer = Some(self.config.build()?);
        }
        Ok(())
    }

    /// Transform one line into an L2-normalised TF-IDF row.
    pub fn transform_line(&self, line: &str) -> Result<SparseVector> {
        let built;
        let analyzer = match &self.analyzer {
            Some(analyzer) => analyzer,
            None => {
                built = self.config.build()?;
                &built
            }
        };
        self.weigh(analyzer, line)
    }

    /// Transform lines into a matrix with one row per line.
    ///
    /// Rows are computed in parallel; row order matches input order.
    pub fn transform(&self, lines: &[String]) -> Result<SparseMatrix> {
        let built;
        let analyzer = match &self.analyzer {
            Some(analyzer) => analyzer,
            None => {
                built = self.config.build()?;
                &built
            }
        };

        let rows = lines
            .par_iter()
            .map(|line| self.weigh(analyzer, line))
            .collect::<Result<Vec<_>>>()?;
        SparseMatrix::new(rows, self.vocabulary.len())
    }

    fn weigh(&self, analyzer: &TextAnalyzer, line: &str) -> Result<SparseVector> {
        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        for token in analyzer.analyze(line)? {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut row = SparseVector::from_pairs(
            counts
                .into_iter()
                .map(|(index, count)| (index, count * self.idf[index]))
                .collect(),
        );
        row.l2_normalize();
        Ok(row)
    }

    /// Get the size of the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of lines the space was fitted on.
    pub fn n_documents(&self) -> usize {
        self.n_documents
    }

    /// Analyzer configuration.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        self.config
    }

    /// Column index of a token.
    pub fn index_of(&self, token: &str) -> Option<usize> {
        self.vocabulary.get(token).copied()
    }

    /// IDF weight of a column.
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }
}
