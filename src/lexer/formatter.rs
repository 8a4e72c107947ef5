use super::{LexicalError, Token};
use crate::report::render;

/// Interface for creating new token formatters.
pub trait TokenFormatter {
    /// Formats a token into a string.
    fn format(&self, token: &Token) -> String;
    /// Formats a lexer error into a string.
    fn format_lexical_error(&self, error: &LexicalError) -> String;
}

pub struct DebugFormatter;

impl TokenFormatter for DebugFormatter {
    fn format(&self, token: &Token) -> String {
        format!("{token:?}")
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        format!("{error:?}")
    }
}

/// Renders tokens as `{KIND, lexeme, literal, line}`.
pub struct BasicFormatter;

impl TokenFormatter for BasicFormatter {
    fn format(&self, token: &Token) -> String {
        let literal = match token.literal {
            Some(ref literal) => literal.to_string(),
            None => "nil".into(),
        };
        format!(
            "{{{}, {}, {}, {}}}",
            token.kind, token.lexeme, literal, token.line
        )
    }

    fn format_lexical_error(&self, error: &LexicalError) -> String {
        render(error.line, &error.kind.to_string())
    }
}
