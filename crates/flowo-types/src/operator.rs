//! Arity-dispatched operator implementations.

use crate::{FlowoError, Result, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A single operator implementation for one arity.
pub type OpFn = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

/// An operator symbol's implementations, keyed by arity.
///
/// `-` is the usual example: negation at arity 1, subtraction at arity 2.
#[derive(Clone, Default)]
pub struct Operator {
    by_arity: BTreeMap<usize, OpFn>,
}

impl Operator {
    /// An operator with no implementations yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// An operator accepting exactly one operand.
    pub fn unary<F>(f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new().with_unary(f)
    }

    /// An operator accepting exactly two operands.
    pub fn binary<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new().with_binary(f)
    }

    /// An operator with a raw implementation for `arity` operands.
    pub fn nary<F>(arity: usize, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self::new().with_arity(arity, f)
    }

    pub fn with_unary<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.with_arity(1, move |args| match args {
            [a] => f(a),
            _ => Err(FlowoError::ArgumentCount {
                expected: 1,
                found: args.len(),
            }),
        })
    }

    pub fn with_binary<F>(self, f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Result<Value> + Send + Sync + 'static,
    {
        self.with_arity(2, move |args| match args {
            [a, b] => f(a, b),
            _ => Err(FlowoError::ArgumentCount {
                expected: 2,
                found: args.len(),
            }),
        })
    }

    pub fn with_arity<F>(mut self, arity: usize, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.by_arity.insert(arity, Arc::new(f));
        self
    }

    /// The implementation for `arity`, if one is registered.
    pub fn get(&self, arity: usize) -> Option<&OpFn> {
        self.by_arity.get(&arity)
    }

    pub fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.by_arity.keys().copied()
    }
}

impl fmt::Debug for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operator")
            .field("arities", &self.by_arity.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Symbol → operator mapping.
pub type OperatorTable = BTreeMap<String, Operator>;
