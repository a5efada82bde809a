//! Core Flowo lexer: a lazy, single-pass scanner over the source text.
//!
//! Scanning order at each position:
//! 1. configured operator symbols, longest first
//! 2. numbers (`number_start`, then `number_body`)
//! 3. strings, up to the same delimiter character (no escapes)
//! 4. words (`word_start`, then `word_body`)
//! 5. whitespace runs
//! 6. `(` `)` `[` `]`
//!
//! Whitespace is emitted rather than skipped, so the token stream covers the
//! source byte for byte.

use std::iter::FusedIterator;

use flowo_types::{CharClass, Config, FlowoError, Result};
use log::trace;

use crate::token::{Token, TokenKind};

/// Scan `source` lazily using the operator symbols and character classes
/// in `config`.
pub fn tokenize<'src, 'cfg>(source: &'src str, config: &'cfg Config) -> Lexer<'src, 'cfg> {
    Lexer::new(source, config)
}

/// The Flowo lexer.
///
/// Yields one `Result<Token>` per call to `next`. The first error ends the
/// stream.
pub struct Lexer<'src, 'cfg> {
    source: &'src str,
    config: &'cfg Config,
    /// Current byte offset into `source`.
    pos: usize,
    /// Open `[` count; a `]` at zero is an error.
    bracket_depth: usize,
    failed: bool,
}

impl<'src, 'cfg> Lexer<'src, 'cfg> {
    pub fn new(source: &'src str, config: &'cfg Config) -> Self {
        Self {
            source,
            config,
            pos: 0,
            bracket_depth: 0,
            failed: false,
        }
    }

    /// Byte offset of the next character to scan.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of `[` not yet closed. A non-zero value at end of input is
    /// not an error here.
    pub fn bracket_depth(&self) -> usize {
        self.bracket_depth
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self, ch: char) {
        self.pos += ch.len_utf8();
    }

    fn eat_while(&mut self, class: CharClass) {
        while let Some(ch) = self.peek() {
            if !class(ch) {
                break;
            }
            self.bump(ch);
        }
    }

    fn match_operator(&self) -> Option<&'cfg str> {
        let rest = self.rest();
        self.config
            .operator_symbols_longest_first()
            .iter()
            .map(String::as_str)
            .find(|sym| !sym.is_empty() && rest.starts_with(sym))
    }

    fn scan(&mut self, ch: char) -> Result<Token> {
        let start = self.pos;

        if let Some(sym) = self.match_operator() {
            self.pos += sym.len();
            return Ok(self.token(TokenKind::Operator, start));
        }

        let classes = *self.config.classes();
        let kind = if (classes.number_start)(ch) {
            self.bump(ch);
            self.eat_while(classes.number_body);
            TokenKind::Number
        } else if (classes.string_head)(ch) {
            self.bump(ch);
            self.scan_string_body(ch);
            TokenKind::String
        } else if (classes.word_start)(ch) {
            self.bump(ch);
            self.eat_while(classes.word_body);
            TokenKind::Word
        } else if (classes.whitespace)(ch) {
            self.bump(ch);
            self.eat_while(classes.whitespace);
            TokenKind::Whitespace
        } else {
            let kind = match ch {
                '(' => TokenKind::OpenParen,
                ')' => TokenKind::CloseParen,
                '[' => {
                    self.bracket_depth += 1;
                    TokenKind::OpenBracket
                }
                ']' if self.bracket_depth == 0 => {
                    return Err(FlowoError::MismatchedBracket { position: start });
                }
                ']' => {
                    self.bracket_depth -= 1;
                    TokenKind::CloseBracket
                }
                _ => {
                    return Err(FlowoError::UnrecognizedCharacter {
                        ch,
                        position: start,
                    })
                }
            };
            self.bump(ch);
            kind
        };

        Ok(self.token(kind, start))
    }

    /// Consume up to and including the next `delimiter`, or to end of input
    /// when the string is unterminated.
    fn scan_string_body(&mut self, delimiter: char) {
        while let Some(ch) = self.peek() {
            self.bump(ch);
            if ch == delimiter {
                return;
            }
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token::new(kind, &self.source[start..self.pos], start)
    }
}

impl Iterator for Lexer<'_, '_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let ch = self.peek()?;
        match self.scan(ch) {
            Ok(token) => {
                trace!("lex: {:?} {:?} @{}", token.kind, token.raw, token.start);
                Some(Ok(token))
            }
            Err(err) => {
                trace!("lex: error {err}");
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl FusedIterator for Lexer<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let config = Config::default();
        tokenize(source, &config)
            .map(|t| t.expect("lex error").kind)
            .collect()
    }

    #[test]
    fn test_empty_source() {
        assert!(kinds("").is_empty());
    }

    #[test]
    fn test_bracket_depth_tracking() {
        let config = Config::default();
        let mut lexer = tokenize("[[1]", &config);
        while let Some(tok) = lexer.next() {
            tok.unwrap();
        }
        assert_eq!(lexer.bracket_depth(), 1);
        assert_eq!(lexer.position(), 4);
    }

    #[test]
    fn test_fused_after_error() {
        let config = Config::default();
        let mut lexer = tokenize("1 @ 2", &config);
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_ok());
        assert!(lexer.next().unwrap().is_err());
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_brackets() {
        assert_eq!(
            kinds("([])"),
            vec![
                TokenKind::OpenParen,
                TokenKind::OpenBracket,
                TokenKind::CloseBracket,
                TokenKind::CloseParen,
            ]
        );
    }
}
