//! Tokens produced by tokenizers.

use std::fmt;

/// One unit of text cut out of a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub text: String,
}

impl Token {
    pub fn new<S: Into<String>>(text: S) -> Self {
        Token { text: text.into() }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Tokens in stream order.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
