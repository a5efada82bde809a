//! Core instruction evaluator.

use flowo_types::{Config, FlowoError, Instruction, Literal, Result, Value};
use log::trace;

/// Run a lazy instruction stream to completion and return the top of the
/// stack.
///
/// The stack depth is not checked at the end: a malformed stream yields
/// whatever ends up on top (or missing when the stack is empty).
pub fn evaluate<I>(instructions: I, config: &Config) -> Result<Value>
where
    I: IntoIterator<Item = Result<Instruction>>,
{
    let mut evaluator = Evaluator::new(config);
    for instruction in instructions {
        evaluator.step(&instruction?)?;
    }
    Ok(evaluator.finish())
}

/// Run an already compiled program. The program and configuration are left
/// untouched, so the same program can be run any number of times.
pub fn evaluate_program(program: &[Instruction], config: &Config) -> Result<Value> {
    let mut evaluator = Evaluator::new(config);
    for instruction in program {
        evaluator.step(instruction)?;
    }
    Ok(evaluator.finish())
}

/// The stack machine.
pub struct Evaluator<'cfg> {
    config: &'cfg Config,
    stack: Vec<Value>,
}

impl<'cfg> Evaluator<'cfg> {
    pub fn new(config: &'cfg Config) -> Self {
        Self {
            config,
            stack: Vec::new(),
        }
    }

    /// The current value stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Remove the top `count` values, keeping their original order.
    ///
    /// Takes whatever is available when the stack is shallower than `count`.
    fn pop_n(&mut self, count: usize) -> Vec<Value> {
        let at = self.stack.len().saturating_sub(count);
        self.stack.split_off(at)
    }

    /// Execute one instruction.
    pub fn step(&mut self, instruction: &Instruction) -> Result<()> {
        trace!("eval: {instruction:?} depth={}", self.stack.len());
        let config = self.config;
        let value = match instruction {
            Instruction::PushLiteral { value } => match value {
                Literal::Number(n) => Value::Number(*n),
                Literal::Text(s) => Value::Text(s.clone()),
            },

            Instruction::PushVariable { name } => {
                config.variable(name).cloned().unwrap_or_default()
            }

            Instruction::CallOperator { symbol, arity } => {
                let operator = config
                    .operator(symbol)
                    .ok_or_else(|| FlowoError::UnknownOperator(symbol.clone()))?;
                let implementation =
                    operator
                        .get(*arity)
                        .ok_or_else(|| FlowoError::UnsupportedArity {
                            symbol: symbol.clone(),
                            arity: *arity,
                        })?;
                let args = self.pop_n(*arity);
                implementation(&args)?
            }

            Instruction::MakeArray { count } => Value::List(self.pop_n(*count)),

            Instruction::CallFunction { arity } => {
                // The callee sits below its arguments.
                let mut group = self.pop_n(arity.saturating_add(1)).into_iter();
                let callee = group.next().unwrap_or_default();
                let args: Vec<Value> = group.collect();
                match callee {
                    Value::Callable(callable) => callable.call(&args)?,
                    other => return Err(FlowoError::NotCallable(other.type_name())),
                }
            }
        };
        self.stack.push(value);
        Ok(())
    }

    /// The top of the stack, or missing if the stack is empty.
    pub fn finish(mut self) -> Value {
        self.stack.pop().unwrap_or_default()
    }
}
