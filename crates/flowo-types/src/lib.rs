//! Shared types for the Flowo expression language.
//!
//! This crate defines the runtime [`Value`], the postfix [`Instruction`]
//! program, arity-dispatched [`Operator`]s, the immutable [`Config`] that is
//! threaded through every pipeline stage, and the [`FlowoError`] type.

mod builtins;
mod config;
mod error;
mod operator;
mod program;
mod value;

pub use config::{CharClass, CharClasses, Config, ConfigBuilder};
pub use error::FlowoError;
pub use operator::{OpFn, Operator, OperatorTable};
pub use program::{Instruction, Literal};
pub use value::{Callable, Value};

/// Result type used throughout Flowo.
pub type Result<T> = std::result::Result<T, FlowoError>;
