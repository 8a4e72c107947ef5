use std::rc::Rc;

use compact_str::{format_compact, CompactString};

use super::{context::SystemContext, environment::SharedEnvironment, error::RuntimeErrorKind};
use crate::parser::statement::FunctionDecl;

/// A function implemented by the host rather than in script code.
pub trait NativeFunction: std::fmt::Debug {
    fn get_name(&self) -> &'static str;
    fn arity(&self) -> usize;
    fn call(
        &self,
        arguments: &[Value],
        context: &mut dyn SystemContext,
    ) -> Result<Value, RuntimeErrorKind>;
}

/// A script function together with the scope it was declared in.
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: SharedEnvironment,
}

impl Function {
    pub fn name(&self) -> &str {
        &self.declaration.name.name
    }

    pub fn arity(&self) -> usize {
        self.declaration.parameters.len()
    }
}

// The closure usually contains this function, so don't recurse into it.
impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name())
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub enum Callable {
    Native(Rc<dyn NativeFunction>),
    Function(Rc<Function>),
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Self::Native(fun) => fun.get_name(),
            Self::Function(fun) => fun.name(),
        }
    }

    pub fn arity(&self) -> usize {
        match self {
            Self::Native(fun) => fun.arity(),
            Self::Function(fun) => fun.arity(),
        }
    }

    /// Callables are equal only when they are the same object.
    pub fn ptr_eq(&self, other: &Callable) -> bool {
        match (self, other) {
            (Self::Native(lhs), Self::Native(rhs)) => Rc::ptr_eq(lhs, rhs),
            (Self::Function(lhs), Self::Function(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(CompactString),
    Callable(Callable),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Callable(Callable::Native(fun)) => write!(f, "<native fn {}>", fun.get_name()),
            Self::Callable(Callable::Function(fun)) => write!(f, "<fn {}>", fun.name()),
        }
    }
}

// Unary operators
impl Value {
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil | Value::Bool(false) => false,
            Value::Number(v) => *v != 0.0,
            Value::String(v) => !v.is_empty(),
            _ => true,
        }
    }

    pub fn logical_not(&self) -> bool {
        !self.is_truthy()
    }

    pub fn numeric_negate(&self) -> Result<Value, RuntimeErrorKind> {
        match self {
            Value::Number(v) => Ok(Value::Number(-v)),
            v => Err(RuntimeErrorKind::NonNumeric(v.clone())),
        }
    }
}

impl Value {
    fn numeric_operands(&self, other: &Value) -> Result<(f64, f64), RuntimeErrorKind> {
        match (self, other) {
            (Value::Number(lhs), Value::Number(rhs)) => Ok((*lhs, *rhs)),
            (lhs, rhs) if std::mem::discriminant(lhs) == std::mem::discriminant(rhs) => {
                Err(RuntimeErrorKind::NonNumerics(lhs.clone(), rhs.clone()))
            }
            (lhs, rhs) => Err(RuntimeErrorKind::MismatchedOperands(lhs.clone(), rhs.clone())),
        }
    }

    // Arithmetic + string concatenation
    pub fn add(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        if let Value::String(lhs) = self {
            return Ok(Value::String(format_compact!("{lhs}{other}")));
        }
        let (lhs, rhs) = self.numeric_operands(other)?;
        Ok(Value::Number(lhs + rhs))
    }

    pub fn subtract(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(other)?;
        Ok(Value::Number(lhs - rhs))
    }

    pub fn multiply(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(other)?;
        Ok(Value::Number(lhs * rhs))
    }

    pub fn divide(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(other)?;
        if rhs == 0.0 {
            return Err(RuntimeErrorKind::DivisionByZero);
        }
        Ok(Value::Number(lhs / rhs))
    }

    // Comparison
    pub fn less_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(other)?;
        Ok(Value::Bool(lhs < rhs))
    }

    pub fn less_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(other)?;
        Ok(Value::Bool(lhs <= rhs))
    }

    pub fn greater_than(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(other)?;
        Ok(Value::Bool(lhs > rhs))
    }

    pub fn greater_than_or_equal(&self, other: &Value) -> Result<Value, RuntimeErrorKind> {
        let (lhs, rhs) = self.numeric_operands(other)?;
        Ok(Value::Bool(lhs >= rhs))
    }

    // Equality
    pub fn is_equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(lhs), Value::Bool(rhs)) => lhs == rhs,
            (Value::Number(lhs), Value::Number(rhs)) => lhs == rhs,
            (Value::String(lhs), Value::String(rhs)) => lhs == rhs,
            (Value::Callable(lhs), Value::Callable(rhs)) => lhs.ptr_eq(rhs),
            _ => false,
        }
    }

    pub fn is_not_equal(&self, other: &Value) -> bool {
        !self.is_equal(other)
    }
}

