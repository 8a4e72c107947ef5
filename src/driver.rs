use log::info;

use crate::{
    interpreter::{Interpreter, SystemContext},
    lexer::{self, formatter::TokenFormatter, Lexed},
    parser::{self, formatter::ProgramFormatter, Parsed},
    report::{render, report_all, Diagnostic, ErrorReporter},
};

/// How far a source got through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Lexing failed; nothing was parsed.
    LexicalErrors(usize),
    /// Parsing failed; nothing was run.
    SyntaxErrors(usize),
    /// Every statement was run, some possibly failing at runtime.
    Completed { runtime_errors: usize },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Completed { runtime_errors: 0 })
    }

    /// Conventional process exit code for this outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::LexicalErrors(_) | Outcome::SyntaxErrors(_) => 65,
            Outcome::Completed { runtime_errors: 0 } => 0,
            Outcome::Completed { .. } => 70,
        }
    }
}

/// Lexes `source`, reporting any errors.
pub fn lex<R>(source: &str, reporter: &mut R) -> Lexed
where
    R: ErrorReporter + ?Sized,
{
    let lexed = lexer::scan(source);
    report_all(&lexed.errors, reporter);
    lexed
}

/// Parses an already lexed token stream, reporting any errors.
pub fn parse<R>(lexed: Lexed, reporter: &mut R) -> Parsed
where
    R: ErrorReporter + ?Sized,
{
    let parsed = parser::parse(lexed.tokens);
    report_all(&parsed.errors, reporter);
    parsed
}

/// Formatted lines of a `tokenize` or `parse` listing, with the errors
/// kept apart so they can go to stderr.
#[derive(Debug, Default)]
pub struct Listing {
    pub lines: Vec<String>,
    pub errors: Vec<String>,
}

impl Listing {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub fn list_tokens(source: &str, formatter: &dyn TokenFormatter) -> Listing {
    let lexed = lexer::scan(source);
    Listing {
        lines: lexed.tokens.iter().map(|token| formatter.format(token)).collect(),
        errors: lexed
            .errors
            .iter()
            .map(|error| formatter.format_lexical_error(error))
            .collect(),
    }
}

/// Lists the syntax tree of `source`. Lexical errors are listed ahead of
/// syntax errors; the tokens that did scan are still parsed.
pub fn list_program(source: &str, formatter: &dyn ProgramFormatter) -> Listing {
    let lexed = lexer::scan(source);
    let mut errors: Vec<String> = lexed
        .errors
        .iter()
        .map(|error| render(error.line(), &error.message()))
        .collect();
    let parsed = parser::parse(lexed.tokens);
    errors.extend(parsed.errors.iter().map(|error| formatter.format_error(error)));
    Listing {
        lines: parsed
            .statements
            .iter()
            .map(|statement| formatter.format_statement(statement))
            .collect(),
        errors,
    }
}

/// Runs `source` through every phase, stopping at the first phase that
/// reports an error. The interpreter keeps its globals between calls.
pub fn run<C, R>(source: &str, interpreter: &mut Interpreter<C>, reporter: &mut R) -> Outcome
where
    C: SystemContext,
    R: ErrorReporter + ?Sized,
{
    let lexed = lex(source, reporter);
    if lexed.had_error() {
        info!("Skipping parse after lexical errors");
        return Outcome::LexicalErrors(lexed.errors.len());
    }
    let parsed = parse(lexed, reporter);
    if parsed.had_error() {
        info!("Skipping interpretation after syntax errors");
        return Outcome::SyntaxErrors(parsed.errors.len());
    }
    let runtime_errors = interpreter.interpret(&parsed.statements, reporter);
    Outcome::Completed { runtime_errors }
}

/// Whether a REPL line leaves its statement open, so more lines must follow
/// before the entry can be run.
pub fn needs_continuation(line: &str) -> bool {
    let line = line.trim_end();
    line.ends_with('=')
        || line.ends_with('~')
        || line.split_whitespace().last() == Some("then")
}
