use compact_str::CompactString;
use thiserror::Error;

use super::value::Value;
use crate::report::Diagnostic;

#[derive(Debug, Error, Clone)]
pub enum RuntimeErrorKind {
    #[error("Operand must be a number.")]
    NonNumeric(Value),
    #[error("Operands must be a number.")]
    NonNumerics(Value, Value),
    #[error("Operand types must match.")]
    MismatchedOperands(Value, Value),
    #[error("Division by zero.")]
    DivisionByZero,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(CompactString),
    #[error("Can only call functions.")]
    InvalidCallee(Value),
    #[error("Expected {expected} arguments but got {actual}.")]
    InvalidArgumentCount { expected: usize, actual: usize },
}

#[derive(Debug, Error, Clone)]
#[error("[line {line}] {kind}")]
pub struct RuntimeError {
    #[source]
    pub kind: RuntimeErrorKind,
    pub line: u32,
}

impl Diagnostic for RuntimeError {
    fn line(&self) -> u32 {
        self.line
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}
