use std::rc::Rc;

use log::trace;

use super::{
    context::SystemContext,
    environment::SharedEnvironment,
    error::RuntimeError,
    value::{Callable, Function, Value},
    Interpreter, ProgramState,
};
use crate::parser::statement::{FunctionDecl, Statement};

// Statement interpreter
impl<C> Interpreter<C>
where
    C: SystemContext,
{
    pub(super) fn interpret_statement(
        &mut self,
        environment: &SharedEnvironment,
        statement: &Statement,
    ) -> Result<ProgramState, RuntimeError> {
        match statement {
            Statement::Expression(expr) => {
                let value = self.evaluate(environment, expr)?;
                if self.repl {
                    self.context.writeln(&value.to_string());
                }
                Ok(ProgramState::Run(value))
            }
            Statement::If {
                condition,
                success,
                failure,
            } => {
                let condition = self.evaluate(environment, condition)?;
                if condition.is_truthy() {
                    self.interpret_statement(environment, success)
                } else if let Some(failure) = failure {
                    self.interpret_statement(environment, failure)
                } else {
                    Ok(ProgramState::Run(Value::Nil))
                }
            }
            Statement::While { condition, body } => {
                while self.evaluate(environment, condition)?.is_truthy() {
                    if let ProgramState::Return(value) = self.interpret_statement(environment, body)? {
                        return Ok(ProgramState::Return(value));
                    }
                }
                Ok(ProgramState::Run(Value::Nil))
            }
            Statement::Function(decl) => {
                self.interpret_function_declaration(environment, decl);
                Ok(ProgramState::Run(Value::Nil))
            }
            Statement::Variable { name, initial } => {
                let initial = match initial {
                    Some(expr) => self.evaluate(environment, expr)?,
                    None => Value::Nil,
                };
                environment.declare(&name.name, initial);
                Ok(ProgramState::Run(Value::Nil))
            }
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(environment, expr)?,
                    None => Value::Nil,
                };
                Ok(ProgramState::Return(value))
            }
            Statement::Block(statements) => {
                self.interpret_block(&environment.new_scope(), statements)
            }
        }
    }

    /// Runs `statements` in `environment`, stopping at the first `return`.
    /// Otherwise the block's value is that of its last statement.
    pub(super) fn interpret_block(
        &mut self,
        environment: &SharedEnvironment,
        statements: &[Statement],
    ) -> Result<ProgramState, RuntimeError> {
        let mut last = Value::Nil;
        for statement in statements {
            match self.interpret_statement(environment, statement)? {
                ProgramState::Run(value) => last = value,
                state @ ProgramState::Return(_) => return Ok(state),
            }
        }
        Ok(ProgramState::Run(last))
    }

    fn interpret_function_declaration(
        &mut self,
        environment: &SharedEnvironment,
        decl: &Rc<FunctionDecl>,
    ) {
        trace!("Declaring function `{}`", decl.name);
        // The function is stored in the scope it captures. That Rc cycle keeps
        // the scope alive until the interpreter exits.
        let function = Function {
            declaration: Rc::clone(decl),
            closure: environment.clone(),
        };
        environment.declare(
            &decl.name.name,
            Value::Callable(Callable::Function(Rc::new(function))),
        );
    }

    pub(super) fn call_function(
        &mut self,
        function: &Function,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let scope = function.closure.new_scope();
        for (parameter, argument) in function.declaration.parameters.iter().zip(arguments) {
            scope.declare(&parameter.name, argument);
        }
        let state = self.interpret_block(&scope, &function.declaration.body)?;
        Ok(state.into_value())
    }
}
