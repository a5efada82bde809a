//! Flowo parser: converts a token stream into a postfix instruction stream
//! with an operator-precedence (shunting-yard) pass.

mod shunter;

pub use shunter::{shunt, Shunter};
