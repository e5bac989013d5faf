//! Runtime configuration.
//!
//! Values come from [`BhavaConfig::default`], optionally replaced by a JSON
//! file, then overridden by command line flags.
//!
//! ```json
//! {
//!   "model_dir": "models",
//!   "classifier": "svm",
//!   "word_ngram": { "min": 1, "max": 1 },
//!   "char_ngram": { "min": 2, "max": 5 },
//!   "seed": 42,
//!   "transcript_language": "hi",
//!   "detect_language": true,
//!   "default_language": "hi"
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{AnalyzerConfig, NgramRange};
use crate::error::{BhavaError, Result};
use crate::ml::classifier::ClassifierKind;
use crate::ml::language::LanguageCode;

/// Training and inference settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BhavaConfig {
    /// Directory holding model bundles.
    pub model_dir: PathBuf,
    /// Classifier name, resolved with [`ClassifierKind::from_name`].
    pub classifier: String,
    /// Word analyzer n-gram range.
    pub word_ngram: NgramRange,
    /// Char analyzer n-gram range.
    pub char_ngram: NgramRange,
    /// Seed for the training shuffle and seeded classifiers. `None` draws
    /// from the thread RNG.
    pub seed: Option<u64>,
    /// Bundle used for audio transcripts, which skip detection.
    pub transcript_language: LanguageCode,
    /// Route text inference through language detection.
    pub detect_language: bool,
    /// Bundle used for text inference when detection is off and no language
    /// is given.
    pub default_language: LanguageCode,
}

impl Default for BhavaConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            classifier: "svm".to_string(),
            word_ngram: AnalyzerConfig::word().ngram_range(),
            char_ngram: AnalyzerConfig::char().ngram_range(),
            seed: None,
            transcript_language: LanguageCode::Hindi,
            detect_language: true,
            default_language: LanguageCode::Hindi,
        }
    }
}

impl BhavaConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BhavaError::file_io(path, e))?;
        let config: BhavaConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Check n-gram ranges and the classifier name.
    pub fn validate(&self) -> Result<()> {
        self.word_ngram.validate()?;
        self.char_ngram.validate()?;
        ClassifierKind::from_name(&self.classifier)?;
        Ok(())
    }

    pub fn word_analyzer(&self) -> AnalyzerConfig {
        AnalyzerConfig::Word {
            ngram_range: self.word_ngram,
        }
    }

    pub fn char_analyzer(&self) -> AnalyzerConfig {
        AnalyzerConfig::Char {
            ngram_range: self.char_ngram,
        }
    }

    /// Resolve the classifier with default hyperparameters, seeding the
    /// perceptron from [`seed`](Self::seed) when one is set.
    pub fn classifier_kind(&self) -> Result<ClassifierKind> {
        let mut kind = ClassifierKind::from_name(&self.classifier)?;
        if let (ClassifierKind::Perceptron(params), Some(seed)) = (&mut kind, self.seed) {
            params.seed = seed;
        }
        Ok(kind)
    }
}
