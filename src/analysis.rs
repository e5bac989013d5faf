//! Text analysis for feature extraction.
//!
//! Raw review text is turned into feature tokens in two steps: a
//! [`tokenizer::Tokenizer`] splits text into units, and an
//! [`analyzer::TextAnalyzer`] applies the normalisation and n-gram expansion
//! configured by an [`analyzer::AnalyzerConfig`].

pub mod analyzer;
pub mod token;
pub mod tokenizer;
