use super::{
    expression::{
        BinaryOperator, Expression, ExpressionAtom, ExpressionAtomKind, LogicOperator,
        UnaryOperator,
    },
    statement::Statement,
    ParserError,
};
use crate::report::render;

pub trait ProgramFormatter {
    fn format_statement(&self, statement: &Statement) -> String;
    fn format_expression(&self, expression: &Expression) -> String;
    fn format_error(&self, error: &ParserError) -> String;
}

pub struct DebugFormatter;

impl ProgramFormatter for DebugFormatter {
    fn format_statement(&self, statement: &Statement) -> String {
        format!("{statement:?}")
    }

    fn format_expression(&self, expression: &Expression) -> String {
        format!("{expression:?}")
    }

    fn format_error(&self, error: &ParserError) -> String {
        format!("{error:?}")
    }
}

/// Prints the tree as nested S-expressions, e.g. `(+ 1.0 (* 2.0 3.0))`.
pub struct SExpressionFormatter;

impl SExpressionFormatter {
    fn format_atom(atom: &ExpressionAtom) -> String {
        match atom.kind {
            ExpressionAtomKind::Number(v) => format!("{v:?}"),
            ExpressionAtomKind::Bool(v) => format!("{v}"),
            ExpressionAtomKind::Nil => "nil".into(),
            ExpressionAtomKind::StringLiteral(ref v) => format!("\"{v}\""),
        }
    }

    fn format_node(expression: &Expression) -> String {
        match expression {
            Expression::Atom(atom) => Self::format_atom(atom),
            Expression::Variable(name) => format!("{name}"),
            Expression::Group { inner } => format!("(group {})", Self::format_node(inner)),
            Expression::Unary { operator, rhs, .. } => format!(
                "({} {})",
                Self::format_unary_operator(operator),
                Self::format_node(rhs)
            ),
            Expression::Binary {
                operator, lhs, rhs, ..
            } => format!(
                "({} {} {})",
                Self::format_binary_operator(operator),
                Self::format_node(lhs),
                Self::format_node(rhs)
            ),
            Expression::Logic {
                operator, lhs, rhs, ..
            } => format!(
                "({} {} {})",
                Self::format_logic_operator(operator),
                Self::format_node(lhs),
                Self::format_node(rhs)
            ),
            Expression::Assignment { name, value } => {
                format!("(= {name} {})", Self::format_node(value))
            }
            Expression::Call {
                callee, arguments, ..
            } => {
                let mut buffer = format!("(call {}", Self::format_node(callee));
                for argument in arguments.iter() {
                    buffer.push(' ');
                    buffer.push_str(&Self::format_node(argument));
                }
                buffer.push(')');
                buffer
            }
        }
    }

    fn format_body(buffer: &mut String, statements: &[Statement]) {
        for statement in statements.iter() {
            buffer.push(' ');
            buffer.push_str(&Self::format_tree(statement));
        }
        buffer.push(')');
    }

    fn format_tree(statement: &Statement) -> String {
        match statement {
            Statement::Expression(expr) => format!("(expr {})", Self::format_node(expr)),
            Statement::Variable { name, initial } => match initial {
                Some(initial) => format!("(let {name} {})", Self::format_node(initial)),
                None => format!("(let {name})"),
            },
            Statement::If {
                condition,
                success,
                failure,
            } => match failure {
                Some(failure) => format!(
                    "(if {} {} {})",
                    Self::format_node(condition),
                    Self::format_tree(success),
                    Self::format_tree(failure)
                ),
                None => format!(
                    "(if {} {})",
                    Self::format_node(condition),
                    Self::format_tree(success)
                ),
            },
            Statement::While { condition, body } => format!(
                "(while {} {})",
                Self::format_node(condition),
                Self::format_tree(body)
            ),
            Statement::Function(decl) => {
                let parameters: Vec<&str> =
                    decl.parameters.iter().map(|p| p.name.as_str()).collect();
                let mut buffer = format!("(func {} ({})", decl.name, parameters.join(" "));
                Self::format_body(&mut buffer, &decl.body);
                buffer
            }
            Statement::Return { value, .. } => match value {
                Some(value) => format!("(return {})", Self::format_node(value)),
                None => "(return)".into(),
            },
            Statement::Block(statements) => {
                let mut buffer = String::from("(block");
                Self::format_body(&mut buffer, statements);
                buffer
            }
        }
    }

    fn format_unary_operator(operator: &UnaryOperator) -> &'static str {
        match operator {
            UnaryOperator::Bang => "!",
            UnaryOperator::Minus => "-",
        }
    }

    fn format_binary_operator(operator: &BinaryOperator) -> &'static str {
        match operator {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanEqual => ">=",
            BinaryOperator::EqualEqual => "==",
            BinaryOperator::BangEqual => "!=",
        }
    }

    fn format_logic_operator(operator: &LogicOperator) -> &'static str {
        match operator {
            LogicOperator::And => "and",
            LogicOperator::Or => "or",
        }
    }
}

impl ProgramFormatter for SExpressionFormatter {
    fn format_statement(&self, statement: &Statement) -> String {
        Self::format_tree(statement)
    }

    fn format_expression(&self, expression: &Expression) -> String {
        Self::format_node(expression)
    }

    fn format_error(&self, error: &ParserError) -> String {
        render(error.line, &error.kind.to_string())
    }
}
