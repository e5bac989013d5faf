//! Word + character feature concatenation.

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::AnalyzerConfig;
use crate::error::{BhavaError, Result};
use crate::ml::feature_space::FeatureSpace;
use crate::ml::sparse::SparseMatrix;

/// A word-level and a character-level [`FeatureSpace`] fitted on the same
/// lines.
///
/// Combined rows always hold the word block first and the char block second;
/// a classifier trained on one layout must never see the other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedVectorizer {
    word: FeatureSpace,
    char: FeatureSpace,
}

impl CombinedVectorizer {
    /// Fit both spaces independently on the same lines.
    pub fn fit(lines: &[String], word: AnalyzerConfig, char: AnalyzerConfig) -> Result<Self> {
        let word = FeatureSpace::fit(lines, word)?;
        let char = FeatureSpace::fit(lines, char)?;
        log::info!(
            "fitted vectorizer on {} lines: {} word terms + {} char terms",
            lines.len(),
            word.vocabulary_size(),
            char.vocabulary_size()
        );
        Ok(Self { word, char })
    }

    /// Transform lines into combined rows, one per line.
    pub fn transform(&self, lines: &[String]) -> Result<SparseMatrix> {
        let word = self.word.transform(lines)?;
        let char = self.char.transform(lines)?;
        if word.n_rows() != lines.len() {
            return Err(BhavaError::dimension_mismatch(
                "word feature rows",
                lines.len(),
                word.n_rows(),
            ));
        }
        if char.n_rows() != lines.len() {
            return Err(BhavaError::dimension_mismatch(
                "char feature rows",
                lines.len(),
                char.n_rows(),
            ));
        }
        SparseMatrix::hstack(&word, &char)
    }

    /// Total feature count: word vocabulary plus char vocabulary.
    pub fn dimension(&self) -> usize {
        self.word.vocabulary_size() + self.char.vocabulary_size()
    }

    /// The word-level space.
    pub fn word_space(&self) -> &FeatureSpace {
        &self.word
    }

    /// The char-level space.
    pub fn char_space(&self) -> &FeatureSpace {
        &self.char
    }

    pub(crate) fn prepare(&mut self) -> Result<()> {
        self.word.prepare()?;
        self.char.prepare()
    }
}
