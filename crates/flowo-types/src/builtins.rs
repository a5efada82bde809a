//! The built-in operator set and precedence table.

use crate::{FlowoError, Operator, OperatorTable, Result, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

/// Binding strength of each built-in operator (higher binds tighter).
pub(crate) const DEFAULT_PRECEDENCE: &[(&str, i32)] = &[
    (";", 0),
    (",", 5),
    ("or", 10),
    ("|", 10),
    ("and", 15),
    ("&", 15),
    ("in", 20),
    ("=", 20),
    ("!=", 20),
    (">", 20),
    ("<", 20),
    ("<=", 20),
    (">=", 20),
    ("+", 30),
    ("-", 30),
    ("*", 40),
    ("/", 40),
    ("^", 60),
];

pub(crate) const DEFAULT_RIGHT_ASSOCIATIVE: &[&str] = &["^"];

pub(crate) fn default_precedence() -> BTreeMap<String, i32> {
    DEFAULT_PRECEDENCE
        .iter()
        .map(|(sym, prec)| ((*sym).to_string(), *prec))
        .collect()
}

pub(crate) fn default_right_associative() -> BTreeSet<String> {
    DEFAULT_RIGHT_ASSOCIATIVE
        .iter()
        .map(|sym| (*sym).to_string())
        .collect()
}

pub(crate) fn default_operators() -> OperatorTable {
    let mut ops = OperatorTable::new();
    let mut add = |sym: &str, op: Operator| {
        ops.insert(sym.to_string(), op);
    };

    add("+", Operator::binary(plus));
    add(
        "-",
        Operator::unary(|a| Ok(Value::Number(-number(a, "-")?)))
            .with_binary(|a, b| arithmetic(a, b, "-", |x, y| x - y)),
    );
    add(
        "*",
        Operator::binary(|a, b| arithmetic(a, b, "*", |x, y| x * y)),
    );
    add(
        "/",
        Operator::binary(|a, b| arithmetic(a, b, "/", |x, y| x / y)),
    );
    add(
        "^",
        Operator::binary(|a, b| arithmetic(a, b, "^", f64::powf)),
    );

    add(
        ",",
        Operator::binary(|a, b| Ok(if b.is_truthy() { a.clone() } else { b.clone() })),
    );
    add(";", Operator::binary(|_, b| Ok(b.clone())));

    add(">", comparison(">", Ordering::is_gt));
    add("<", comparison("<", Ordering::is_lt));
    add(">=", comparison(">=", Ordering::is_ge));
    add("<=", comparison("<=", Ordering::is_le));
    add("=", Operator::binary(|a, b| Ok(Value::Bool(loose_eq(a, b)))));
    add("!=", Operator::binary(|a, b| Ok(Value::Bool(!loose_eq(a, b)))));

    add("in", Operator::binary(contains));

    let and = || Operator::binary(|a, b| Ok(if a.is_truthy() { b.clone() } else { a.clone() }));
    let or = || Operator::binary(|a, b| Ok(if a.is_truthy() { a.clone() } else { b.clone() }));
    add("and", and());
    add("&", and());
    add("or", or());
    add("|", or());

    ops
}

fn number(v: &Value, op: &str) -> Result<f64> {
    v.as_number().ok_or_else(|| {
        FlowoError::TypeMismatch(format!("`{op}` expects a number, got {}", v.type_name()))
    })
}

fn arithmetic(a: &Value, b: &Value, op: &str, f: impl Fn(f64, f64) -> f64) -> Result<Value> {
    Ok(Value::Number(f(number(a, op)?, number(b, op)?)))
}

/// Numbers add; text on either side concatenates display forms.
fn plus(a: &Value, b: &Value) -> Result<Value> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => Ok(Value::Number(x + y)),
        (Value::Text(_), _) | (_, Value::Text(_)) => Ok(Value::Text(format!("{a}{b}"))),
        _ => Err(FlowoError::TypeMismatch(format!(
            "cannot add {} and {}",
            a.type_name(),
            b.type_name()
        ))),
    }
}

fn comparison(op: &'static str, test: fn(Ordering) -> bool) -> Operator {
    Operator::binary(move |a, b| {
        let ordering = match (a, b) {
            (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
            (Value::Text(x), Value::Text(y)) => Some(x.cmp(y)),
            _ => {
                return Err(FlowoError::TypeMismatch(format!(
                    "cannot compare {} {op} {}",
                    a.type_name(),
                    b.type_name()
                )))
            }
        };
        // NaN compares false in every direction.
        Ok(Value::Bool(ordering.is_some_and(test)))
    })
}

fn loose_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Text(s) => Some(text_to_number(s)),
        _ => None,
    }
}

/// Numeric value of text under `=`: blank is `0`, signed decimals and
/// `Infinity` parse, anything else is `NaN`. Hex, octal and binary
/// prefixes (`0x10`) are not recognized.
fn text_to_number(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };
    if body == "Infinity" {
        return sign * f64::INFINITY;
    }
    let decimal = !body.starts_with(['+', '-'])
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !decimal {
        return f64::NAN;
    }
    body.parse::<f64>().map_or(f64::NAN, |n| sign * n)
}

/// Text form of a list when compared with a scalar: items joined by `,`,
/// missing items empty.
fn list_text(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Missing => String::new(),
            Value::List(inner) => list_text(inner),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// `=` semantics: numbers, booleans and numeric text compare by value;
/// a list against a scalar compares through its joined text.
fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Missing, Value::Missing) => true,
        (Value::Missing, _) | (_, Value::Missing) => false,
        (Value::Text(x), Value::Text(y)) => x == y,
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(p, q)| loose_eq(p, q))
        }
        (Value::Callable(x), Value::Callable(y)) => x == y,
        (Value::List(items), scalar @ (Value::Number(_) | Value::Text(_) | Value::Bool(_)))
        | (scalar @ (Value::Number(_) | Value::Text(_) | Value::Bool(_)), Value::List(items)) => {
            loose_eq(&Value::Text(list_text(items)), scalar)
        }
        _ => match (loose_number(a), loose_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// `a in b`: list membership or substring test.
fn contains(a: &Value, b: &Value) -> Result<Value> {
    match b {
        Value::List(items) => Ok(Value::Bool(items.iter().any(|item| same_value(item, a)))),
        Value::Text(haystack) => Ok(Value::Bool(haystack.contains(&a.to_string()))),
        _ => Err(FlowoError::TypeMismatch(format!(
            "`in` expects a list or text on the right, got {}",
            b.type_name()
        ))),
    }
}

/// Strict equality where NaN matches NaN.
fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => a == b,
    }
}
