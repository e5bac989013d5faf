//! Feature extraction, classification and language routing.
//!
//! The pieces compose bottom-up:
//!
//! - [`feature_space::FeatureSpace`] fits a TF-IDF vocabulary for one analyzer.
//! - [`vectorizer::CombinedVectorizer`] concatenates a word space and a char space.
//! - [`classifier::Classifier`] is one of a closed set of trainable algorithms.
//! - [`bundle::ModelBundle`] persists vectorizer and classifier per language.
//! - [`language::LanguageRouter`] picks the bundle for an incoming batch.

pub mod bundle;
pub mod classifier;
pub mod feature_space;
pub mod language;
pub mod sparse;
pub mod vectorizer;
