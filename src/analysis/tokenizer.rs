//! Tokenizer implementations for text analysis.
//!
//! - [`regex::RegexTokenizer`] - word tokens extracted with a regular expression
//! - [`ngram::NgramTokenizer`] - contiguous character n-grams
//!
//! # Examples
//!
//! ```
//! use bhava::analysis::tokenizer::Tokenizer;
//! use bhava::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::word().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("good product").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so fitted feature spaces can tokenize
/// rows from several threads at once.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod ngram;
pub mod regex;

pub use self::ngram::NgramTokenizer;
pub use self::regex::RegexTokenizer;
