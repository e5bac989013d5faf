//! Character n-gram tokenizer implementation.

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{BhavaError, Result};

/// A tokenizer that generates contiguous character n-grams.
///
/// Every substring of `min_gram..=max_gram` characters is emitted, including
/// substrings that span spaces. Characters are Unicode scalar values, so a
/// Devanagari vowel sign counts as its own character.
///
/// # Examples
///
/// ```
/// use bhava::analysis::tokenizer::ngram::NgramTokenizer;
/// use bhava::analysis::tokenizer::Tokenizer;
///
/// let tokenizer = NgramTokenizer::new(2, 3).unwrap();
/// let tokens: Vec<_> = tokenizer.tokenize("abc").unwrap()
///     .map(|t| t.text)
///     .collect();
/// assert_eq!(tokens, vec!["ab", "abc", "bc"]);
/// ```
#[derive(Clone, Debug)]
pub struct NgramTokenizer {
    /// Minimum n-gram size
    min_gram: usize,
    /// Maximum n-gram size
    max_gram: usize,
}

impl NgramTokenizer {
    /// Create a new n-gram tokenizer.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_gram` is 0 or `max_gram` is less than `min_gram`.
    pub fn new(min_gram: usize, max_gram: usize) -> Result<Self> {
        if min_gram == 0 {
            return Err(BhavaError::analysis("min_gram must be at least 1"));
        }
        if max_gram < min_gram {
            return Err(BhavaError::analysis(format!(
                "max_gram ({max_gram}) must be >= min_gram ({min_gram})"
            )));
        }
        Ok(Self { min_gram, max_gram })
    }
}

impl Tokenizer for NgramTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        // Byte offset of every character boundary, including the end of text.
        let mut boundaries: Vec<usize> = text.char_indices().map(|(offset, _)| offset).collect();
        boundaries.push(text.len());
        let char_count = boundaries.len() - 1;

        let mut tokens = Vec::new();

        for start in 0..char_count {
            for gram_size in self.min_gram..=self.max_gram {
                let end = start + gram_size;
                if end > char_count {
                    break;
                }
                tokens.push(Token::new(&text[boundaries[start]..boundaries[end]]));
            }
        }

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "ngram"
    }
}
