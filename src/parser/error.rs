use crate::{lexer::TokenKind, report::Diagnostic};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParserErrorKind {
    #[error("Expect expression.")]
    NonExpression(TokenKind),
    #[error("Expect {expected} {context}.")]
    UnexpectedToken {
        expected: &'static str,
        context: &'static str,
        actual: TokenKind,
    },
    #[error("Invalid assignment target.")]
    InvalidAssignmentTarget,
    #[error("Invalid increment target.")]
    InvalidIncrementTarget,
    #[error("Invalid decrement target.")]
    InvalidDecrementTarget,
    #[error("Parameters must be identifiers.")]
    InvalidParameter(TokenKind),
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("[line {line}] {kind}")]
pub struct ParserError {
    #[source]
    pub kind: ParserErrorKind,
    pub line: u32,
}

impl Diagnostic for ParserError {
    fn line(&self) -> u32 {
        self.line
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}
