//! The postfix program produced by the shunter and run by the evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A constant embedded in the instruction stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    /// Convert the raw text of a number token.
    ///
    /// Takes the longest valid decimal prefix, so `1.2.3` reads as `1.2`.
    /// Text with no numeric prefix becomes `NaN`.
    pub fn parse_number(raw: &str) -> Self {
        Self::Number(leading_float(raw))
    }

    /// Convert the raw text of a string token.
    ///
    /// The first character is the opening delimiter. The last character is
    /// dropped only when it repeats that delimiter; an unterminated string
    /// keeps everything after the opener.
    pub fn parse_text(raw: &str) -> Self {
        let mut chars = raw.chars();
        let Some(head) = chars.next() else {
            return Self::Text(String::new());
        };
        let body = chars.as_str();
        let body = match body.strip_suffix(head) {
            Some(inner) => inner,
            None => body,
        };
        Self::Text(body.to_string())
    }
}

fn leading_float(text: &str) -> f64 {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut seen_digit = end > int_start;
    if end < len && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < len && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        if seen_digit || frac > end + 1 {
            seen_digit = true;
            end = frac;
        }
    }
    if !seen_digit {
        return f64::NAN;
    }
    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < len && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < len && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }
    text[..end].parse().unwrap_or(f64::NAN)
}

/// One step of a postfix program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Push a constant.
    PushLiteral { value: Literal },
    /// Push the value bound to a name (or missing).
    PushVariable { name: String },
    /// Pop `arity` values, apply the operator, push the result.
    CallOperator { symbol: String, arity: usize },
    /// Pop `count` values into a list.
    MakeArray { count: usize },
    /// Pop a callable and `arity` arguments, push the call result.
    CallFunction { arity: usize },
}

impl Instruction {
    pub fn number(n: f64) -> Self {
        Self::PushLiteral {
            value: Literal::Number(n),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::PushLiteral {
            value: Literal::Text(s.into()),
        }
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::PushVariable { name: name.into() }
    }

    pub fn operator(symbol: impl Into<String>, arity: usize) -> Self {
        Self::CallOperator {
            symbol: symbol.into(),
            arity,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PushLiteral {
                value: Literal::Number(n),
            } => write!(f, "RAW_VALUE\t{n}"),
            Self::PushLiteral {
                value: Literal::Text(s),
            } => write!(f, "RAW_VALUE\t{s:?}"),
            Self::PushVariable { name } => write!(f, "VARIABLE\t{name:?}"),
            Self::CallOperator { symbol, arity } => write!(f, "CALL_OP\t{symbol:?}\t{arity}"),
            Self::MakeArray { count } => write!(f, "MAKE_ARRAY\t{count}"),
            Self::CallFunction { arity } => write!(f, "CALL_FUNC\t{arity}"),
        }
    }
}
