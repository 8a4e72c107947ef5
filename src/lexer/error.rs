use crate::report::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LexicalErrorKind {
    #[error("Unexpected character '{0}'.")]
    Unrecognized(char),
    #[error("Unterminated string.")]
    UnclosedString,
    #[error("Indents must be four spaces")]
    MisalignedIndent,
}

#[derive(Debug, Error, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexicalError {
    #[source]
    pub kind: LexicalErrorKind,
    pub line: u32,
}

impl Diagnostic for LexicalError {
    fn line(&self) -> u32 {
        self.line
    }

    fn message(&self) -> String {
        self.kind.to_string()
    }
}
