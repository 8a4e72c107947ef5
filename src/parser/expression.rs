use crate::string::Ident;
use compact_str::CompactString;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOperator {
    Bang,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinaryOperator {
    Multiply,
    Divide,
    Add,
    Subtract,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    EqualEqual,
    BangEqual,
}

/// Operators that may skip evaluating their right hand side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogicOperator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionAtomKind {
    Number(f64),
    Bool(bool),
    Nil,
    StringLiteral(CompactString),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionAtom {
    pub kind: ExpressionAtomKind,
    pub line: u32,
}

/// Expression tree. Every node owns its children.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Atom(ExpressionAtom),
    Variable(Ident),
    Group {
        inner: Box<Expression>,
    },
    Unary {
        operator: UnaryOperator,
        rhs: Box<Expression>,
        line: u32,
    },
    Binary {
        operator: BinaryOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        line: u32,
    },
    Logic {
        operator: LogicOperator,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        line: u32,
    },
    Assignment {
        name: Ident,
        value: Box<Expression>,
    },
    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        line: u32,
    },
}

impl Expression {
    pub fn get_l_value(&self) -> Option<&Ident> {
        match self {
            Expression::Variable(name) => Some(name),
            _ => None,
        }
    }
}
