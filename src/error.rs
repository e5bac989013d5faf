//! Error types for the Bhava library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`BhavaError`] enum. Every pipeline failure terminates the current run;
//! nothing in the library retries.
//!
//! # Examples
//!
//! ```
//! use bhava::error::{BhavaError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(BhavaError::input_validation("text and label counts differ"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The main error type for Bhava operations.
#[derive(Error, Debug)]
pub enum BhavaError {
    /// I/O errors without a known path.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// I/O errors while reading or writing a specific file.
    #[error("I/O error on {path}: {source}")]
    FileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed training or scoring input.
    #[error("Input validation error: {0}")]
    InputValidation(String),

    /// A feature space was fitted on zero lines.
    #[error("Empty corpus: {0}")]
    EmptyCorpus(String),

    /// No classifier rule matched the requested name.
    #[error("Unsupported classifier: {name}")]
    UnsupportedClassifier { name: String },

    /// A language code outside the trained set.
    #[error("Unsupported or untrained language: {code}")]
    UnsupportedLanguage { code: String },

    /// Language detection produced no vote for any supported language.
    #[error("No supported language detected in {lines} line(s)")]
    NoSupportedLanguageDetected { lines: usize },

    /// Feature matrix shapes disagree.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// A persisted model bundle does not exist.
    #[error("Model bundle not found: {path}")]
    ArtifactNotFound { path: PathBuf },

    /// A persisted model bundle is corrupt or incompatible.
    #[error("Serialization error for {path}: {reason}")]
    Serialization { path: PathBuf, reason: String },

    /// Analysis-related errors (tokenization, analyzer construction).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failures reported by external collaborators.
    #[error("Upstream {stage} failure: {message}")]
    Upstream { stage: String, message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with BhavaError.
pub type Result<T> = std::result::Result<T, BhavaError>;

impl BhavaError {
    /// Create a new input validation error.
    pub fn input_validation<S: Into<String>>(msg: S) -> Self {
        BhavaError::InputValidation(msg.into())
    }

    /// Create a new empty corpus error.
    pub fn empty_corpus<S: Into<String>>(msg: S) -> Self {
        BhavaError::EmptyCorpus(msg.into())
    }

    /// Create a new unsupported classifier error.
    pub fn unsupported_classifier<S: Into<String>>(name: S) -> Self {
        BhavaError::UnsupportedClassifier { name: name.into() }
    }

    /// Create a new unsupported language error.
    pub fn unsupported_language<S: Into<String>>(code: S) -> Self {
        BhavaError::UnsupportedLanguage { code: code.into() }
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch<S: Into<String>>(context: S, expected: usize, actual: usize) -> Self {
        BhavaError::DimensionMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create a new serialization error for the artifact at `path`.
    pub fn serialization<S: Into<String>>(path: &Path, reason: S) -> Self {
        BhavaError::Serialization {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        BhavaError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        BhavaError::InvalidConfig(msg.into())
    }

    /// Create a new upstream collaborator error.
    pub fn upstream<S: Into<String>, M: Into<String>>(stage: S, message: M) -> Self {
        BhavaError::Upstream {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Attach a path to an I/O error.
    pub fn file_io(path: &Path, source: io::Error) -> Self {
        BhavaError::FileIo {
            path: path.to_path_buf(),
            source,
        }
    }
}
