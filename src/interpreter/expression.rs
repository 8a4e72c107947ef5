use log::trace;

use super::{
    context::SystemContext,
    environment::SharedEnvironment,
    error::{RuntimeError, RuntimeErrorKind},
    value::{Callable, Value},
    Interpreter,
};
use crate::parser::expression::{
    BinaryOperator, Expression, ExpressionAtom, ExpressionAtomKind, LogicOperator, UnaryOperator,
};

// Expression evaluator
impl<C> Interpreter<C>
where
    C: SystemContext,
{
    pub(super) fn evaluate(
        &mut self,
        environment: &SharedEnvironment,
        expression: &Expression,
    ) -> Result<Value, RuntimeError> {
        let result = match expression {
            Expression::Atom(atom) => Self::evaluate_atom(atom),
            Expression::Variable(name) => {
                environment.get(&name.name).map_err(|kind| RuntimeError {
                    kind,
                    line: name.line,
                })?
            }
            Expression::Group { inner } => self.evaluate(environment, inner)?,
            Expression::Unary {
                operator,
                rhs,
                line,
            } => {
                let rhs = self.evaluate(environment, rhs)?;
                Self::evaluate_unary(*operator, &rhs)
                    .map_err(|kind| RuntimeError { kind, line: *line })?
            }
            Expression::Binary {
                operator,
                lhs,
                rhs,
                line,
            } => {
                let lhs = self.evaluate(environment, lhs)?;
                let rhs = self.evaluate(environment, rhs)?;
                Self::evaluate_binary(*operator, &lhs, &rhs)
                    .map_err(|kind| RuntimeError { kind, line: *line })?
            }
            Expression::Logic {
                operator, lhs, rhs, ..
            } => self.evaluate_logic(environment, *operator, lhs, rhs)?,
            Expression::Assignment { name, value } => {
                let value = self.evaluate(environment, value)?;
                environment
                    .assign(&name.name, value.clone())
                    .map_err(|kind| RuntimeError {
                        kind,
                        line: name.line,
                    })?;
                value
            }
            Expression::Call {
                callee,
                arguments,
                line,
            } => self.evaluate_call(environment, callee, arguments, *line)?,
        };
        Ok(result)
    }

    fn evaluate_atom(atom: &ExpressionAtom) -> Value {
        match atom.kind {
            ExpressionAtomKind::Number(v) => Value::Number(v),
            ExpressionAtomKind::Bool(v) => Value::Bool(v),
            ExpressionAtomKind::Nil => Value::Nil,
            ExpressionAtomKind::StringLiteral(ref v) => Value::String(v.clone()),
        }
    }

    fn evaluate_unary(operator: UnaryOperator, rhs: &Value) -> Result<Value, RuntimeErrorKind> {
        match operator {
            UnaryOperator::Bang => Ok(Value::Bool(rhs.logical_not())),
            UnaryOperator::Minus => rhs.numeric_negate(),
        }
    }

    fn evaluate_binary(
        operator: BinaryOperator,
        lhs: &Value,
        rhs: &Value,
    ) -> Result<Value, RuntimeErrorKind> {
        match operator {
            BinaryOperator::Add => lhs.add(rhs),
            BinaryOperator::Subtract => lhs.subtract(rhs),
            BinaryOperator::Multiply => lhs.multiply(rhs),
            BinaryOperator::Divide => lhs.divide(rhs),
            BinaryOperator::LessThan => lhs.less_than(rhs),
            BinaryOperator::LessThanEqual => lhs.less_than_or_equal(rhs),
            BinaryOperator::GreaterThan => lhs.greater_than(rhs),
            BinaryOperator::GreaterThanEqual => lhs.greater_than_or_equal(rhs),
            BinaryOperator::EqualEqual => Ok(Value::Bool(lhs.is_equal(rhs))),
            BinaryOperator::BangEqual => Ok(Value::Bool(lhs.is_not_equal(rhs))),
        }
    }

    /// Both operators short-circuit and yield a boolean.
    fn evaluate_logic(
        &mut self,
        environment: &SharedEnvironment,
        operator: LogicOperator,
        lhs: &Expression,
        rhs: &Expression,
    ) -> Result<Value, RuntimeError> {
        let lhs = self.evaluate(environment, lhs)?.is_truthy();
        let result = match operator {
            LogicOperator::And => lhs && self.evaluate(environment, rhs)?.is_truthy(),
            LogicOperator::Or => lhs || self.evaluate(environment, rhs)?.is_truthy(),
        };
        Ok(Value::Bool(result))
    }

    fn evaluate_call(
        &mut self,
        environment: &SharedEnvironment,
        callee: &Expression,
        arguments: &[Expression],
        line: u32,
    ) -> Result<Value, RuntimeError> {
        let callable = match self.evaluate(environment, callee)? {
            Value::Callable(callable) => callable,
            value => {
                return Err(RuntimeError {
                    kind: RuntimeErrorKind::InvalidCallee(value),
                    line,
                })
            }
        };

        let arguments = arguments
            .iter()
            .map(|argument| self.evaluate(environment, argument))
            .collect::<Result<Vec<_>, _>>()?;

        if arguments.len() != callable.arity() {
            return Err(RuntimeError {
                kind: RuntimeErrorKind::InvalidArgumentCount {
                    expected: callable.arity(),
                    actual: arguments.len(),
                },
                line,
            });
        }

        trace!("Calling `{}` with {} arguments", callable.name(), arguments.len());
        match callable {
            Callable::Native(fun) => fun
                .call(&arguments, &mut self.context)
                .map_err(|kind| RuntimeError { kind, line }),
            Callable::Function(fun) => self.call_function(&fun, arguments),
        }
    }
}
