//! The immutable configuration threaded through every pipeline stage.
//!
//! [`Config::default`] carries the built-in operator set, precedence table and
//! character classifiers. [`Config::builder`] starts from those defaults and
//! replaces whole keys, so caller settings are shallow-merged over them.

use crate::builtins;
use crate::{Operator, OperatorTable, Value};
use std::collections::{BTreeMap, BTreeSet};

/// A character classifier.
pub type CharClass = fn(char) -> bool;

/// The character classifiers the lexer consults.
#[derive(Debug, Clone, Copy)]
pub struct CharClasses {
    pub word_start: CharClass,
    pub word_body: CharClass,
    pub whitespace: CharClass,
    pub number_start: CharClass,
    pub number_body: CharClass,
    pub string_head: CharClass,
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_number_body(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '.'
}

fn is_string_head(ch: char) -> bool {
    ch == '"' || ch == '\''
}

impl Default for CharClasses {
    fn default() -> Self {
        Self {
            word_start: is_word_char,
            word_body: is_word_char,
            whitespace: char::is_whitespace,
            number_start: |ch| ch.is_ascii_digit(),
            number_body: is_number_body,
            string_head: is_string_head,
        }
    }
}

/// Operators, precedences, variable bindings and character classes.
///
/// Read-only once built; share one across threads freely as long as the
/// operator and callable implementations are themselves reentrant.
#[derive(Debug, Clone)]
pub struct Config {
    operators: OperatorTable,
    variables: BTreeMap<String, Value>,
    precedence: BTreeMap<String, i32>,
    right_associative: BTreeSet<String>,
    classes: CharClasses,
    /// Operator symbols sorted longest first, for the lexer.
    symbols: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Config {
    /// Start from the built-in defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// A default configuration with the given variable bindings.
    pub fn with_variables<I, K, V>(variables: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        variables
            .into_iter()
            .fold(Self::builder(), |b, (k, v)| b.variable(k, v))
            .build()
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn operator(&self, symbol: &str) -> Option<&Operator> {
        self.operators.get(symbol)
    }

    pub fn variables(&self) -> &BTreeMap<String, Value> {
        &self.variables
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    pub fn precedence(&self, symbol: &str) -> Option<i32> {
        self.precedence.get(symbol).copied()
    }

    pub fn is_right_associative(&self, symbol: &str) -> bool {
        self.right_associative.contains(symbol)
    }

    pub fn classes(&self) -> &CharClasses {
        &self.classes
    }

    /// Every operator symbol, longest first. Ties keep table order.
    pub fn operator_symbols_longest_first(&self) -> &[String] {
        &self.symbols
    }
}

/// Builds a [`Config`] on top of the defaults.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    operators: OperatorTable,
    variables: BTreeMap<String, Value>,
    precedence: BTreeMap<String, i32>,
    right_associative: BTreeSet<String>,
    classes: CharClasses,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            operators: builtins::default_operators(),
            variables: BTreeMap::new(),
            precedence: builtins::default_precedence(),
            right_associative: builtins::default_right_associative(),
            classes: CharClasses::default(),
        }
    }
}

impl ConfigBuilder {
    /// Replace the whole operator table.
    pub fn operators(mut self, operators: OperatorTable) -> Self {
        self.operators = operators;
        self
    }

    /// Add or replace one operator.
    pub fn operator(mut self, symbol: impl Into<String>, operator: Operator) -> Self {
        self.operators.insert(symbol.into(), operator);
        self
    }

    /// Replace all variable bindings.
    pub fn variables(mut self, variables: BTreeMap<String, Value>) -> Self {
        self.variables = variables;
        self
    }

    /// Bind one variable.
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Replace the whole precedence table.
    pub fn precedence(mut self, precedence: BTreeMap<String, i32>) -> Self {
        self.precedence = precedence;
        self
    }

    /// Set the precedence of one symbol.
    pub fn precedence_of(mut self, symbol: impl Into<String>, precedence: i32) -> Self {
        self.precedence.insert(symbol.into(), precedence);
        self
    }

    /// Replace the set of right-associative symbols.
    pub fn right_associative<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.right_associative = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn word_start(mut self, class: CharClass) -> Self {
        self.classes.word_start = class;
        self
    }

    pub fn word_body(mut self, class: CharClass) -> Self {
        self.classes.word_body = class;
        self
    }

    pub fn whitespace(mut self, class: CharClass) -> Self {
        self.classes.whitespace = class;
        self
    }

    pub fn number_start(mut self, class: CharClass) -> Self {
        self.classes.number_start = class;
        self
    }

    pub fn number_body(mut self, class: CharClass) -> Self {
        self.classes.number_body = class;
        self
    }

    pub fn string_head(mut self, class: CharClass) -> Self {
        self.classes.string_head = class;
        self
    }

    pub fn build(self) -> Config {
        let mut symbols: Vec<String> = self.operators.keys().cloned().collect();
        // Stable, so equal-length symbols stay in table order.
        symbols.sort_by(|a, b| b.len().cmp(&a.len()));
        Config {
            operators: self.operators,
            variables: self.variables,
            precedence: self.precedence,
            right_associative: self.right_associative,
            classes: self.classes,
            symbols,
        }
    }
}
