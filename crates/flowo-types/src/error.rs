//! Error types shared by every pipeline stage.

use thiserror::Error;

/// Everything that can abort a Flowo evaluation.
///
/// Lexical and structural variants carry the byte offset into the source
/// where the problem was detected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowoError {
    /// A character no scanning rule accepts.
    #[error("unrecognized character `{ch}` at position {position}")]
    UnrecognizedCharacter { ch: char, position: usize },

    /// A `]` with no open `[` before it.
    #[error("mismatched brackets at position {position}")]
    MismatchedBracket { position: usize },

    /// A `)` that does not close a `(` or a call.
    #[error("unmatched parenthesis at position {position}")]
    UnmatchedParen { position: usize },

    /// An opening `(` or `[` still pending at end of input.
    #[error("unclosed delimiter opened at position {position}")]
    UnclosedDelimiter { position: usize },

    /// The instruction stream named an operator the configuration lacks.
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),

    /// The operator exists but has no implementation for this arity.
    #[error("operator `{symbol}` has no implementation for arity {arity}")]
    UnsupportedArity { symbol: String, arity: usize },

    /// Tried to call a value that is not a callable.
    #[error("value of type {0} is not callable")]
    NotCallable(&'static str),

    /// An operator or callable received the wrong kind of value.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// An implementation was handed the wrong number of arguments.
    #[error("expected {expected} argument(s), found {found}")]
    ArgumentCount { expected: usize, found: usize },

    /// Free-form failure raised by a host-supplied operator or callable.
    #[error("{0}")]
    Host(String),
}

impl FlowoError {
    /// Convenience constructor for host implementations.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }

    /// Byte offset into the source, for lexical and structural errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnrecognizedCharacter { position, .. }
            | Self::MismatchedBracket { position }
            | Self::UnmatchedParen { position }
            | Self::UnclosedDelimiter { position } => Some(*position),
            _ => None,
        }
    }

    /// Returns `true` for errors raised by the lexer.
    pub fn is_tokenize_error(&self) -> bool {
        matches!(
            self,
            Self::UnrecognizedCharacter { .. } | Self::MismatchedBracket { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_for_lexical_errors() {
        let err = FlowoError::UnrecognizedCharacter { ch: '@', position: 3 };
        assert_eq!(err.position(), Some(3));
        assert!(err.is_tokenize_error());
    }

    #[test]
    fn test_position_absent_for_runtime_errors() {
        let err = FlowoError::UnknownOperator("%".into());
        assert_eq!(err.position(), None);
        assert!(!err.is_tokenize_error());
    }

    #[test]
    fn test_structural_errors_are_not_tokenize_errors() {
        let err = FlowoError::UnclosedDelimiter { position: 0 };
        assert_eq!(err.position(), Some(0));
        assert!(!err.is_tokenize_error());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            FlowoError::MismatchedBracket { position: 0 }.to_string(),
            "mismatched brackets at position 0"
        );
        assert_eq!(
            FlowoError::UnsupportedArity {
                symbol: "+".into(),
                arity: 1
            }
            .to_string(),
            "operator `+` has no implementation for arity 1"
        );
        assert_eq!(FlowoError::host("boom").to_string(), "boom");
    }
}
