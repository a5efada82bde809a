//! Operator-precedence parsing with the shunting-yard algorithm.
//!
//! Working state:
//! - an operator stack holding pending operators (tagged with their resolved
//!   arity) and opening markers for groups, calls and arrays
//! - an arity stack with one argument counter per open call or array
//! - a "previous token was data" flag that decides unary vs. binary
//!   operators and grouping vs. call parentheses
//!
//! Instructions are produced lazily: each pulled token may queue zero or
//! more instructions, which are handed out before the next token is read.

use std::collections::VecDeque;
use std::iter::FusedIterator;

use flowo_lexer::{Token, TokenKind};
use flowo_types::{Config, FlowoError, Instruction, Literal, Result};
use log::trace;

/// Parse a token stream into postfix instructions.
pub fn shunt<'cfg, I>(tokens: I, config: &'cfg Config) -> Shunter<'cfg, I::IntoIter>
where
    I: IntoIterator<Item = Result<Token>>,
{
    Shunter::new(tokens.into_iter(), config)
}

/// An entry on the operator stack.
#[derive(Debug, Clone, PartialEq)]
enum Pending {
    Operator { symbol: String, arity: usize },
    /// A plain grouping `(`.
    Group { start: usize },
    /// A `(` that directly follows data, i.e. starts a call.
    Call { start: usize },
    /// A `[` starting an array literal.
    Array { start: usize },
}

impl Pending {
    fn is_opener(&self) -> bool {
        !matches!(self, Self::Operator { .. })
    }
}

/// The shunting-yard parser, as a lazy iterator of instructions.
///
/// The first error ends the stream; instructions queued before it are still
/// yielded first.
pub struct Shunter<'cfg, I> {
    tokens: I,
    config: &'cfg Config,
    stack: Vec<Pending>,
    /// Argument/element count for each open call or array.
    arities: Vec<usize>,
    last_was_data: bool,
    /// Kind of the previous non-whitespace token.
    last_kind: Option<TokenKind>,
    output: VecDeque<Instruction>,
    error: Option<FlowoError>,
    done: bool,
}

impl<'cfg, I> Shunter<'cfg, I>
where
    I: Iterator<Item = Result<Token>>,
{
    pub fn new(tokens: I, config: &'cfg Config) -> Self {
        Self {
            tokens,
            config,
            stack: Vec::new(),
            arities: Vec::new(),
            last_was_data: false,
            last_kind: None,
            output: VecDeque::new(),
            error: None,
            done: false,
        }
    }

    fn emit(&mut self, instruction: Instruction) {
        self.output.push_back(instruction);
    }

    fn emit_pending(&mut self, entry: Pending) -> Result<()> {
        match entry {
            Pending::Operator { symbol, arity } => {
                self.emit(Instruction::CallOperator { symbol, arity });
                Ok(())
            }
            Pending::Group { start } | Pending::Call { start } | Pending::Array { start } => {
                Err(FlowoError::UnclosedDelimiter { position: start })
            }
        }
    }

    /// Pop and emit operators until an opening marker (or the bottom) is on top.
    fn flush_to_opener(&mut self) {
        while let Some(Pending::Operator { .. }) = self.stack.last() {
            if let Some(Pending::Operator { symbol, arity }) = self.stack.pop() {
                self.emit(Instruction::CallOperator { symbol, arity });
            }
        }
    }

    /// A comma separates arguments only when the innermost open marker is a
    /// call or an array.
    fn in_arity_context(&self) -> bool {
        matches!(
            self.stack.iter().rev().find(|entry| entry.is_opener()),
            Some(Pending::Call { .. } | Pending::Array { .. })
        )
    }

    /// Decide, once, whether the operator on top of the stack binds tighter
    /// than the incoming binary operator `symbol`, and pop it if so.
    ///
    /// This is a single look-then-act step, not a drain loop.
    fn resolve_binary(&mut self, symbol: &str) {
        let Some(Pending::Operator { symbol: top, .. }) = self.stack.last() else {
            return;
        };
        let pop = match (self.config.precedence(top), self.config.precedence(symbol)) {
            (Some(top_prec), Some(prec)) if self.config.is_right_associative(symbol) => {
                top_prec > prec
            }
            (Some(top_prec), Some(prec)) => top_prec >= prec,
            _ => false,
        };
        if pop {
            if let Some(Pending::Operator { symbol, arity }) = self.stack.pop() {
                self.emit(Instruction::CallOperator { symbol, arity });
            }
        }
    }

    fn accept(&mut self, token: Token) -> Result<()> {
        trace!("shunt: {:?} {:?}", token.kind, token.raw);
        let mut is_data = false;

        match token.kind {
            TokenKind::Whitespace => return Ok(()),

            TokenKind::Number => {
                is_data = true;
                self.emit(Instruction::PushLiteral {
                    value: Literal::parse_number(&token.raw),
                });
            }

            TokenKind::String => {
                is_data = true;
                self.emit(Instruction::PushLiteral {
                    value: Literal::parse_text(&token.raw),
                });
            }

            TokenKind::Word => {
                is_data = true;
                self.emit(Instruction::PushVariable { name: token.raw });
            }

            TokenKind::Operator if token.raw == "," && self.in_arity_context() => {
                if let Some(count) = self.arities.last_mut() {
                    *count += 1;
                }
                self.flush_to_opener();
            }

            TokenKind::Operator => {
                let arity = if self.last_was_data { 2 } else { 1 };
                // Prefix operators never pop anything.
                if arity == 2 {
                    self.resolve_binary(&token.raw);
                }
                self.stack.push(Pending::Operator {
                    symbol: token.raw,
                    arity,
                });
            }

            TokenKind::OpenParen => {
                if self.last_was_data {
                    self.stack.push(Pending::Call { start: token.start });
                    self.arities.push(1);
                } else {
                    self.stack.push(Pending::Group { start: token.start });
                }
            }

            TokenKind::CloseParen => {
                is_data = true;
                self.flush_to_opener();
                match self.stack.pop() {
                    Some(Pending::Group { .. }) => {}
                    Some(Pending::Call { .. }) => {
                        let counted = self.arities.pop().unwrap_or(0);
                        let arity = if self.last_kind == Some(TokenKind::OpenParen) {
                            0
                        } else {
                            counted
                        };
                        self.emit(Instruction::CallFunction { arity });
                    }
                    _ => {
                        return Err(FlowoError::UnmatchedParen {
                            position: token.start,
                        })
                    }
                }
            }

            TokenKind::OpenBracket => {
                self.stack.push(Pending::Array { start: token.start });
                self.arities.push(1);
            }

            TokenKind::CloseBracket => {
                is_data = true;
                self.flush_to_opener();
                match self.stack.pop() {
                    Some(Pending::Array { .. }) => {
                        let counted = self.arities.pop().unwrap_or(0);
                        let count = if self.last_kind == Some(TokenKind::OpenBracket) {
                            0
                        } else {
                            counted
                        };
                        self.emit(Instruction::MakeArray { count });
                    }
                    Some(Pending::Group { start } | Pending::Call { start }) => {
                        return Err(FlowoError::UnclosedDelimiter { position: start })
                    }
                    _ => {
                        return Err(FlowoError::MismatchedBracket {
                            position: token.start,
                        })
                    }
                }
            }
        }

        self.last_kind = Some(token.kind);
        self.last_was_data = is_data;
        Ok(())
    }

    /// End of input: emit everything left on the stack, last in first out.
    fn finish(&mut self) -> Result<()> {
        while let Some(entry) = self.stack.pop() {
            self.emit_pending(entry)?;
        }
        Ok(())
    }

    fn fail(&mut self, err: FlowoError) {
        self.error = Some(err);
        self.done = true;
    }
}

impl<I> Iterator for Shunter<'_, I>
where
    I: Iterator<Item = Result<Token>>,
{
    type Item = Result<Instruction>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(instruction) = self.output.pop_front() {
                trace!("shunt: emit {instruction:?}");
                return Some(Ok(instruction));
            }
            if let Some(err) = self.error.take() {
                return Some(Err(err));
            }
            if self.done {
                return None;
            }
            match self.tokens.next() {
                Some(Ok(token)) => {
                    if let Err(err) = self.accept(token) {
                        self.fail(err);
                    }
                }
                Some(Err(err)) => self.fail(err),
                None => {
                    self.done = true;
                    if let Err(err) = self.finish() {
                        self.fail(err);
                    }
                }
            }
        }
    }
}

impl<I> FusedIterator for Shunter<'_, I> where I: Iterator<Item = Result<Token>> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, raw: &str, start: usize) -> Result<Token> {
        Ok(Token::new(kind, raw, start))
    }

    #[test]
    fn test_in_arity_context_tracks_innermost_opener() {
        let config = Config::default();
        let mut s = Shunter::new(std::iter::empty::<Result<Token>>(), &config);
        assert!(!s.in_arity_context());
        s.stack.push(Pending::Call { start: 1 });
        assert!(s.in_arity_context());
        s.stack.push(Pending::Group { start: 2 });
        assert!(!s.in_arity_context());
        s.stack.push(Pending::Operator {
            symbol: "+".into(),
            arity: 2,
        });
        assert!(!s.in_arity_context());
        s.stack.push(Pending::Array { start: 4 });
        assert!(s.in_arity_context());
    }

    #[test]
    fn test_resolve_binary_pops_at_most_once() {
        let config = Config::default();
        let mut s = Shunter::new(std::iter::empty::<Result<Token>>(), &config);
        s.stack.push(Pending::Operator {
            symbol: "*".into(),
            arity: 2,
        });
        s.stack.push(Pending::Operator {
            symbol: "^".into(),
            arity: 2,
        });
        s.resolve_binary("+");
        assert_eq!(s.output, VecDeque::from([Instruction::operator("^", 2)]));
        assert_eq!(s.stack.len(), 1);
    }

    #[test]
    fn test_unknown_precedence_never_pops() {
        let config = Config::default();
        let mut s = Shunter::new(std::iter::empty::<Result<Token>>(), &config);
        s.stack.push(Pending::Operator {
            symbol: "@".into(),
            arity: 2,
        });
        s.resolve_binary("+");
        assert!(s.output.is_empty());
    }

    #[test]
    fn test_lexer_error_passes_through() {
        let config = Config::default();
        let tokens = vec![
            tok(TokenKind::Number, "1", 0),
            Err(FlowoError::MismatchedBracket { position: 1 }),
            tok(TokenKind::Number, "2", 2),
        ];
        let out: Vec<_> = shunt(tokens, &config).collect();
        assert_eq!(
            out,
            vec![
                Ok(Instruction::number(1.0)),
                Err(FlowoError::MismatchedBracket { position: 1 }),
            ]
        );
    }
}
