//! Feature analyzers.
//!
//! An analyzer turns one line of text into the list of feature tokens a
//! feature space counts. Two modes exist:
//!
//! - **word**: lowercase, extract word tokens with
//!   [`RegexTokenizer::word`], then join runs of consecutive words into
//!   n-grams for every n in the configured range.
//! - **char**: lowercase, collapse whitespace runs to a single space, then
//!   emit every character n-gram in the configured range.
//!
//! The analyzer configuration is persisted with every fitted feature space so
//! inference tokenizes exactly as training did.

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::tokenizer::{NgramTokenizer, RegexTokenizer, Tokenizer};
use crate::error::{BhavaError, Result};

/// Inclusive n-gram size range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NgramRange {
    pub min: usize,
    pub max: usize,
}

impl NgramRange {
    /// Create a validated range.
    pub fn new(min: usize, max: usize) -> Result<Self> {
        let range = NgramRange { min, max };
        range.validate()?;
        Ok(range)
    }

    /// Check `min >= 1` and `max >= min`.
    pub fn validate(&self) -> Result<()> {
        if self.min == 0 {
            return Err(BhavaError::invalid_config(
                "n-gram range minimum must be at least 1",
            ));
        }
        if self.max < self.min {
            return Err(BhavaError::invalid_config(format!(
                "n-gram range maximum ({}) must be >= minimum ({})",
                self.max, self.min
            )));
        }
        Ok(())
    }
}

impl fmt::Display for NgramRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Serializable description of how text becomes feature tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerConfig {
    /// Word n-grams.
    Word { ngram_range: NgramRange },
    /// Character n-grams.
    Char { ngram_range: NgramRange },
}

impl AnalyzerConfig {
    /// Word unigrams.
    pub fn word() -> Self {
        AnalyzerConfig::Word {
            ngram_range: NgramRange { min: 1, max: 1 },
        }
    }

    /// Character 2- to 5-grams.
    pub fn char() -> Self {
        AnalyzerConfig::Char {
            ngram_range: NgramRange { min: 2, max: 5 },
        }
    }

    /// Analyzer type name used in artifact names.
    pub fn name(&self) -> &'static str {
        match self {
            AnalyzerConfig::Word { .. } => "word",
            AnalyzerConfig::Char { .. } => "char",
        }
    }

    /// Configured n-gram range.
    pub fn ngram_range(&self) -> NgramRange {
        match self {
            AnalyzerConfig::Word { ngram_range } | AnalyzerConfig::Char { ngram_range } => {
                *ngram_range
            }
        }
    }

    /// Build the analyzer described by this configuration.
    pub fn build(&self) -> Result<TextAnalyzer> {
        let range = self.ngram_range();
        range.validate()?;
        let inner = match self {
            AnalyzerConfig::Word { .. } => AnalyzerInner::Word(RegexTokenizer::word()?),
            AnalyzerConfig::Char { .. } => {
                AnalyzerInner::Char(NgramTokenizer::new(range.min, range.max)?)
            }
        };
        Ok(TextAnalyzer {
            config: *self,
            inner,
        })
    }
}

impl fmt::Display for AnalyzerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name(), self.ngram_range())
    }
}

#[derive(Clone, Debug)]
enum AnalyzerInner {
    Word(RegexTokenizer),
    Char(NgramTokenizer),
}

/// A ready-to-use analyzer built from an [`AnalyzerConfig`].
#[derive(Clone, Debug)]
pub struct TextAnalyzer {
    config: AnalyzerConfig,
    inner: AnalyzerInner,
}

lazy_static! {
    static ref WHITESPACE_RUNS: Regex =
        Regex::new(r"\s\s+").expect("whitespace pattern should be valid");
}

impl TextAnalyzer {
    /// The configuration this analyzer was built from.
    pub fn config(&self) -> AnalyzerConfig {
        self.config
    }

    /// Analyze one line into feature tokens.
    pub fn analyze(&self, text: &str) -> Result<Vec<String>> {
        let lowered = text.to_lowercase();
        match &self.inner {
            AnalyzerInner::Word(tokenizer) => {
                let words: Vec<String> = tokenizer.tokenize(&lowered)?.map(|t| t.text).collect();
                Ok(word_ngrams(words, self.config.ngram_range()))
            }
            AnalyzerInner::Char(tokenizer) => {
                let normalized = WHITESPACE_RUNS.replace_all(&lowered, " ");
                Ok(tokenizer.tokenize(&normalized)?.map(|t| t.text).collect())
            }
        }
    }
}

fn word_ngrams(words: Vec<String>, range: NgramRange) -> Vec<String> {
    if range.min == 1 && range.max == 1 {
        return words;
    }

    let mut grams = Vec::new();
    if range.min == 1 {
        grams.extend(words.iter().cloned());
    }
    for n in range.min.max(2)..=range.max {
        if n > words.len() {
            break;
        }
        grams.extend(words.windows(n).map(|window| window.join(" ")));
    }
    grams
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_analyzer_lowercases() {
        let analyzer = AnalyzerConfig::word().build().unwrap();
        let tokens = analyzer.analyze("Good PRODUCT").unwrap();
        assert_eq!(tokens, vec!["good", "product"]);
    }

    #[test]
    fn test_word_bigrams() {
        let config = AnalyzerConfig::Word {
            ngram_range: NgramRange::new(1, 2).unwrap(),
        };
        let analyzer = config.build().unwrap();
        let tokens = analyzer.analyze("very good product").unwrap();
        assert_eq!(
            tokens,
            vec!["very", "good", "product", "very good", "good product"]
        );
    }

    #[test]
    fn test_char_analyzer_collapses_whitespace() {
        let config = AnalyzerConfig::Char {
            ngram_range: NgramRange::new(3, 3).unwrap(),
        };
        let analyzer = config.build().unwrap();
        let tokens = analyzer.analyze("Ab \t Cd").unwrap();
        assert_eq!(tokens, vec!["ab ", "b c", " cd"]);
    }

    #[test]
    fn test_empty_text() {
        let analyzer = AnalyzerConfig::char().build().unwrap();
        assert!(analyzer.analyze("").unwrap().is_empty());

        let analyzer = AnalyzerConfig::word().build().unwrap();
        assert!(analyzer.analyze("").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_range() {
        assert!(NgramRange::new(0, 1).is_err());
        assert!(NgramRange::new(3, 2).is_err());

        let config = AnalyzerConfig::Char {
            ngram_range: NgramRange { min: 4, max: 2 },
        };
        assert!(matches!(config.build(), Err(BhavaError::InvalidConfig(_))));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(AnalyzerConfig::word().to_string(), "word-1-1");
        assert_eq!(AnalyzerConfig::char().to_string(), "char-2-5");
    }
}
