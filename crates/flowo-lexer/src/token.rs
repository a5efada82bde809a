//! Token types for the Flowo lexer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A classified slice of the source.
///
/// Concatenating the `raw` text of every token, in order, reproduces the
/// source exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub raw: String,
    /// Byte offset of the first character.
    pub start: usize,
}

impl Token {
    pub fn new(kind: TokenKind, raw: impl Into<String>, start: usize) -> Self {
        Self {
            kind,
            raw: raw.into(),
            start,
        }
    }

    /// Byte offset one past the last character.
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }
}

/// Every token kind the lexer produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Number,
    String,
    Operator,
    Word,
    Whitespace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Number => "Number",
            Self::String => "String",
            Self::Operator => "Operator",
            Self::Word => "Word",
            Self::Whitespace => "Whitespace",
            Self::OpenParen => "OpenParenthesis",
            Self::CloseParen => "CloseParenthesis",
            Self::OpenBracket => "OpenSquare",
            Self::CloseBracket => "CloseSquare",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<9} {}", self.raw, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_end() {
        let t = Token::new(TokenKind::Word, "atk", 4);
        assert_eq!(t.end(), 7);
    }

    #[test]
    fn test_token_display_pads_raw() {
        let t = Token::new(TokenKind::Operator, "+", 1);
        assert_eq!(t.to_string(), "+         Operator");
    }

    #[test]
    fn test_kind_display_names() {
        assert_eq!(TokenKind::OpenParen.to_string(), "OpenParenthesis");
        assert_eq!(TokenKind::CloseBracket.to_string(), "CloseSquare");
        assert_eq!(TokenKind::Word.to_string(), "Word");
    }
}
