use super::expression::Expression;
use crate::string::Ident;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub parameters: Vec<Ident>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expression(Expression),
    If {
        condition: Expression,
        success: Box<Statement>,
        failure: Option<Box<Statement>>,
    },
    While {
        condition: Expression,
        body: Box<Statement>,
    },
    /// Shared with every function value created from it.
    Function(Rc<FunctionDecl>),
    Variable {
        name: Ident,
        initial: Option<Expression>,
    },
    Return {
        line: u32,
        value: Option<Expression>,
    },
    Block(Vec<Statement>),
}
