//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use super::Tokenizer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::{BhavaError, Result};

/// Word pattern: runs of two or more word characters between word boundaries.
pub const WORD_PATTERN: &str = r"\b\w\w+\b";

/// A regex-based tokenizer that extracts every match of a pattern as a token.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    /// The regex pattern used to extract tokens
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a tokenizer for the default word pattern ([`WORD_PATTERN`]).
    ///
    /// `\w` is Unicode-aware, so Devanagari and Telugu words including their
    /// combining vowel signs come out as single tokens.
    pub fn word() -> Result<Self> {
        Self::with_pattern(WORD_PATTERN)
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| BhavaError::analysis(format!("Invalid regex pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let tokens: Vec<Token> = self
            .pattern
            .find_iter(text)
            .map(|mat| Token::new(mat.as_str()))
            .collect();

        Ok(Box::new(tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_tokenizer() {
        let tokenizer = RegexTokenizer::word().unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("good, bad product").unwrap().collect();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].text, "good");
        assert_eq!(tokens[1].text, "bad");
        assert_eq!(tokens[2].text, "product");
    }

    #[test]
    fn test_single_character_words_are_skipped() {
        let tokenizer = RegexTokenizer::word().unwrap();
        let texts: Vec<String> = tokenizer
            .tokenize("a b ok")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, vec!["ok"]);
    }

    #[test]
    fn test_indic_words_keep_vowel_signs() {
        let tokenizer = RegexTokenizer::word().unwrap();
        let texts: Vec<String> = tokenizer
            .tokenize("यह फ़ोन बहुत अच्छा है")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(texts, vec!["यह", "फ़ोन", "बहुत", "अच्छा", "है"]);

        let texts: Vec<String> = tokenizer
            .tokenize("చాలా బాగుంది")
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["చాలా", "బాగుంది"]);
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(RegexTokenizer::with_pattern("(unclosed").is_err());
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(RegexTokenizer::word().unwrap().name(), "regex");
    }
}
