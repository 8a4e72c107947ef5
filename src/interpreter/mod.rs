mod context;
mod environment;
mod error;
mod expression;
mod native;
mod statement;
mod value;

use std::rc::Rc;

pub use context::{BufferedContext, StdioContext, SystemContext};
pub use environment::SharedEnvironment;
pub use error::{RuntimeError, RuntimeErrorKind};
use log::{debug, info};
pub use native::{NativeClock, NativePrint, NativePrintln};
pub use value::{Callable, Function, NativeFunction, Value};

use crate::{
    parser::{expression::Expression, statement::Statement},
    report::{Diagnostic, ErrorReporter},
};

/// How a statement finished.
#[derive(Debug, Clone)]
pub enum ProgramState {
    /// Ran to completion, yielding the statement's value.
    Run(Value),
    /// Hit a `return`; unwinds to the enclosing call.
    Return(Value),
}

impl ProgramState {
    pub fn into_value(self) -> Value {
        match self {
            ProgramState::Run(value) | ProgramState::Return(value) => value,
        }
    }
}

pub struct Interpreter<C: SystemContext> {
    globals: SharedEnvironment,
    context: C,
    repl: bool,
}

impl<C> Interpreter<C>
where
    C: SystemContext,
{
    pub fn new(context: C) -> Self {
        let mut interpreter = Self {
            globals: SharedEnvironment::new(),
            context,
            repl: false,
        };
        for native in native::natives() {
            interpreter.register_native(native);
        }
        interpreter
    }

    /// In REPL mode, every expression statement echoes its value, at any depth.
    pub fn with_repl(mut self, repl: bool) -> Self {
        self.repl = repl;
        self
    }

    pub fn register_native(&mut self, native: Rc<dyn NativeFunction>) {
        debug!("Registering native `{}`", native.get_name());
        self.globals
            .declare(native.get_name(), Value::Callable(Callable::Native(native)));
    }

    pub fn globals(&self) -> &SharedEnvironment {
        &self.globals
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Runs each top-level statement in the global scope. A runtime error
    /// abandons the statement it occurred in, is reported, and execution
    /// resumes with the next one. Returns the number of runtime errors.
    pub fn interpret<R>(&mut self, statements: &[Statement], reporter: &mut R) -> usize
    where
        R: ErrorReporter + ?Sized,
    {
        let globals = self.globals.clone();
        let mut failures = 0;
        for statement in statements {
            if let Err(error) = self.interpret_statement(&globals, statement) {
                debug!("Runtime error on line {}: {error}", error.line);
                reporter.report(error.line(), &error.message());
                failures += 1;
            }
        }
        info!(
            "Interpreted {} statements with {failures} runtime errors",
            statements.len()
        );
        failures
    }

    /// Evaluates a single expression in the global scope.
    pub fn evaluate_expression(&mut self, expression: &Expression) -> Result<Value, RuntimeError> {
        let globals = self.globals.clone();
        self.evaluate(&globals, expression)
    }
}
