//! Runtime values.

use crate::{FlowoError, Result};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

type CallableFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A host-supplied function value.
///
/// Two callables are equal only when they share the same implementation.
#[derive(Clone)]
pub struct Callable {
    name: Arc<str>,
    func: Arc<CallableFn>,
}

impl Callable {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        let name: String = name.into();
        Self {
            name: Arc::from(name),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.func)(args)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callable({})", self.name)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

/// A Flowo runtime value.
///
/// The evaluator never inspects types itself; mismatches surface as errors
/// from whichever operator or callable receives the wrong value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Result of looking up an unbound variable.
    #[default]
    Missing,
    Number(f64),
    Text(String),
    Bool(bool),
    List(Vec<Value>),
    Callable(Callable),
}

impl Value {
    /// Create a callable value from a closure.
    pub fn callable<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::Callable(Callable::new(name, func))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::List(_) => "list",
            Self::Callable(_) => "callable",
        }
    }

    /// `false`, `0`, `NaN`, `""` and missing are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Missing => false,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Bool(b) => *b,
            Self::List(_) | Self::Callable(_) => true,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}Infinity", if n < 0.0 { "-" } else { "" })
    } else if n == 0.0 {
        write!(f, "0")
    } else {
        write!(f, "{n}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "undefined"),
            Self::Number(n) => fmt_number(*n, f),
            Self::Text(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Self::Callable(c) => write!(f, "<callable {}>", c.name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Missing => serializer.serialize_none(),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::List(items) => serializer.collect_seq(items),
            Self::Callable(c) => serializer.serialize_str(&format!("<callable {}>", c.name())),
        }
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = FlowoError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        Ok(match json {
            serde_json::Value::Null => Self::Missing,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => Self::List(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_json::Value::Object(_) => {
                return Err(FlowoError::TypeMismatch(
                    "JSON objects have no Flowo value".into(),
                ))
            }
        })
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Self::Callable(c)
    }
}
