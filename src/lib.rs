//! # Bhava
//!
//! Multilingual sentiment classification for short reviews in Hindi,
//! Marathi and Telugu.
//!
//! ## Features
//!
//! - Word and character n-gram TF-IDF features
//! - Five interchangeable classifiers selected by name
//! - Checksummed per-language model bundles
//! - Language detection that routes a batch to the right bundle
//! - Training and inference pipelines, with an audio transcript path

pub mod analysis;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod ml;
pub mod pipeline;

pub mod prelude {
    pub use crate::config::BhavaConfig;
    pub use crate::corpus::LabeledCorpus;
    pub use crate::error::{BhavaError, Result};
    pub use crate::ml::bundle::ModelBundle;
    pub use crate::ml::classifier::{Classifier, ClassifierKind};
    pub use crate::ml::language::{
        LanguageCode, LanguageIdentifier, LanguageRouter, ScriptLanguageIdentifier,
    };
    pub use crate::pipeline::{InferencePipeline, Routing, TrainingPipeline, Transcriber};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
