//! Flowo evaluator: a stack machine over postfix instructions.
//!
//! The only state is an ordered value stack. Operators and callables do all
//! type checking; the evaluator just moves values.

mod evaluator;

pub use evaluator::{evaluate, evaluate_program, Evaluator};
