//! Flowo: an embeddable expression language.
//!
//! ```text
//! source → Lexer → tokens → Shunter → instructions → Evaluator → Value
//! ```
//!
//! Each stage is a lazy iterator pulled by the next one, so [`execute`]
//! never materializes the token or instruction streams. [`compile`]
//! collects the instructions when a program is to be run repeatedly.
//!
//! ```
//! use flowo::{execute, Config, Value};
//!
//! let config = Config::with_variables([("atk", 100), ("def", 3000)]);
//! let result = execute("atk<def and atk>0", &config).unwrap();
//! assert_eq!(result, Value::Bool(true));
//! ```

pub use flowo_eval::{evaluate, evaluate_program, Evaluator};
pub use flowo_lexer::{tokenize, Lexer, Token, TokenKind};
pub use flowo_parser::{shunt, Shunter};
pub use flowo_types::{
    Callable, CharClass, CharClasses, Config, ConfigBuilder, FlowoError, Instruction, Literal,
    OpFn, Operator, OperatorTable, Result, Value,
};

use log::debug;

/// Tokenize, shunt and evaluate `source` in one pass.
pub fn execute(source: &str, config: &Config) -> Result<Value> {
    debug!("execute: {source:?}");
    let tokens = tokenize(source, config);
    let instructions = shunt(tokens, config);
    let value = evaluate(instructions, config);
    match &value {
        Ok(v) => debug!("execute: result {v}"),
        Err(e) => debug!("execute: failed: {e}"),
    }
    value
}

/// Compile `source` into a postfix program that can be run with
/// [`evaluate_program`] any number of times.
pub fn compile(source: &str, config: &Config) -> Result<Vec<Instruction>> {
    debug!("compile: {source:?}");
    let program = shunt(tokenize(source, config), config).collect::<Result<Vec<_>>>()?;
    debug!("compile: {} instruction(s)", program.len());
    Ok(program)
}
