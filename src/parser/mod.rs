mod error;
pub mod expression;
pub mod formatter;
pub mod statement;

pub use error::{ParserError, ParserErrorKind};
use expression::{
    BinaryOperator, Expression, ExpressionAtom, ExpressionAtomKind, LogicOperator, UnaryOperator,
};
use log::debug;
use statement::{FunctionDecl, Statement};
use std::rc::Rc;

use crate::{
    lexer::{Literal, Token, TokenKind},
    string::Ident,
};

const EQUALITY_OPERATORS: [(TokenKind, BinaryOperator); 2] = [
    (TokenKind::EqualEqual, BinaryOperator::EqualEqual),
    (TokenKind::BangEqual, BinaryOperator::BangEqual),
];

const COMPARISON_OPERATORS: [(TokenKind, BinaryOperator); 4] = [
    (TokenKind::LessThan, BinaryOperator::LessThan),
    (TokenKind::LessThanEqual, BinaryOperator::LessThanEqual),
    (TokenKind::GreaterThan, BinaryOperator::GreaterThan),
    (TokenKind::GreaterThanEqual, BinaryOperator::GreaterThanEqual),
];

const ADDITIVE_OPERATORS: [(TokenKind, BinaryOperator); 2] = [
    (TokenKind::Plus, BinaryOperator::Add),
    (TokenKind::Minus, BinaryOperator::Subtract),
];

const MULTIPLICATIVE_OPERATORS: [(TokenKind, BinaryOperator); 2] = [
    (TokenKind::Star, BinaryOperator::Multiply),
    (TokenKind::Slash, BinaryOperator::Divide),
];

/// Result of parsing a token stream: the statements that parsed cleanly plus
/// every syntax error encountered.
#[derive(Debug, Clone, Default)]
pub struct Parsed {
    pub statements: Vec<Statement>,
    pub errors: Vec<ParserError>,
}

impl Parsed {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parses a token stream produced by the lexer.
pub fn parse(tokens: Vec<Token>) -> Parsed {
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    block_depth: usize,
    errors: Vec<ParserError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof) {
            let line = tokens.last().map_or(1, |token| token.line);
            tokens.push(Token::new(TokenKind::Eof, "", line));
        }
        Self {
            tokens,
            current: 0,
            block_depth: 0,
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> Parsed {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(statement) = self.parse_statement_or_recover() {
                statements.push(statement);
            }
        }
        debug!(
            "Parsed {} statements with {} errors",
            statements.len(),
            self.errors.len()
        );
        Parsed {
            statements,
            errors: self.errors,
        }
    }
}

// Token navigation
impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous_kind(&self) -> Option<TokenKind> {
        self.current
            .checked_sub(1)
            .map(|index| self.tokens[index].kind)
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn eat_if(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn expect(
        &mut self,
        kind: TokenKind,
        expected: &'static str,
        context: &'static str,
    ) -> Result<Token, ParserError> {
        match self.eat_if(kind) {
            Some(token) => Ok(token),
            None => Err(self.unexpected(expected, context)),
        }
    }

    fn expect_terminator(&mut self, context: &'static str) -> Result<(), ParserError> {
        if self.eat_if(TokenKind::Newline).is_some() || self.eat_if(TokenKind::Semicolon).is_some()
        {
            Ok(())
        } else {
            Err(self.unexpected("';' or new line", context))
        }
    }

    fn unexpected(&self, expected: &'static str, context: &'static str) -> ParserError {
        let token = self.peek();
        ParserError {
            kind: ParserErrorKind::UnexpectedToken {
                expected,
                context,
                actual: token.kind,
            },
            line: token.line,
        }
    }

    /// Skips tokens until the start of something that looks like a new statement.
    /// A block opened by the skipped tokens is skipped whole, through its
    /// closing dedent.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        // A dedent inside a block belongs to the block parser.
        if !(self.block_depth > 0 && self.check(TokenKind::Dedent))
            && self.advance().kind == TokenKind::Indent
        {
            depth += 1;
        }

        while !self.is_at_end() {
            if depth == 0
                && matches!(
                    self.previous_kind(),
                    Some(TokenKind::Newline | TokenKind::Semicolon)
                )
            {
                break;
            }
            match self.peek().kind {
                TokenKind::Indent => {
                    let _ = self.advance();
                    depth += 1;
                }
                TokenKind::Dedent if depth > 0 => {
                    let _ = self.advance();
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                TokenKind::KeywordIf
                | TokenKind::KeywordWhile
                | TokenKind::KeywordFor
                | TokenKind::KeywordFunc
                | TokenKind::KeywordLet
                | TokenKind::KeywordReturn
                | TokenKind::Dedent
                    if depth == 0 =>
                {
                    break
                }
                _ => {
                    let _ = self.advance();
                }
            }
        }
        debug!("Synchronized at line {}", self.peek().line);
    }
}

// Statements
impl Parser {
    fn parse_statement_or_recover(&mut self) -> Option<Statement> {
        match self.parse_statement() {
            Ok(statement) => Some(statement),
            Err(error) => {
                debug!("Syntax error: {error}");
                self.errors.push(error);
                self.synchronize();
                None
            }
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, ParserError> {
        match self.peek().kind {
            TokenKind::KeywordIf => {
                let _ = self.advance();
                self.parse_if()
            }
            TokenKind::KeywordWhile => {
                let _ = self.advance();
                self.parse_while()
            }
            TokenKind::KeywordFor => {
                let _ = self.advance();
                self.parse_for()
            }
            TokenKind::KeywordFunc => {
                let _ = self.advance();
                self.parse_function()
            }
            TokenKind::KeywordLet => {
                let _ = self.advance();
                self.parse_variable()
            }
            TokenKind::KeywordReturn => {
                let _ = self.advance();
                self.parse_return()
            }
            TokenKind::Indent => {
                let _ = self.advance();
                Ok(Statement::Block(self.parse_block()))
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<Statement, ParserError> {
        let expr = self.parse_expression()?;
        self.expect_terminator("after expression")?;
        Ok(Statement::Expression(expr))
    }

    fn parse_if(&mut self) -> Result<Statement, ParserError> {
        let condition = self.parse_expression()?;
        self.expect(TokenKind::KeywordThen, "'then'", "after if condition")?;
        let success = Box::new(self.parse_statement()?);

        let failure = if self.eat_if(TokenKind::KeywordElse).is_some() {
            self.expect(TokenKind::KeywordThen, "'then'", "after 'else'")?;
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            success,
            failure,
        })
    }

    fn parse_while(&mut self) -> Result<Statement, ParserError> {
        let condition = self.parse_expression()?;
        self.expect(TokenKind::KeywordThen, "'then'", "after while condition")?;
        let body = Box::new(self.parse_statement()?);
        Ok(Statement::While { condition, body })
    }

    /// `for` has no statement of its own: it becomes a block holding the
    /// initializer and a `while` whose body runs the increment last.
    fn parse_for(&mut self) -> Result<Statement, ParserError> {
        let parenthesized = self.eat_if(TokenKind::LeftParenthesis).is_some();

        let initializer = if self.eat_if(TokenKind::Semicolon).is_some() {
            None
        } else if self.eat_if(TokenKind::KeywordLet).is_some() {
            Some(self.parse_variable()?)
        } else {
            Some(self.parse_expression_statement()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            Expression::Atom(ExpressionAtom {
                kind: ExpressionAtomKind::Bool(true),
                line: self.peek().line,
            })
        } else {
            self.parse_expression()?
        };
        self.expect(TokenKind::Semicolon, "';'", "after loop condition")?;

        let increment = if self.check(TokenKind::RightParenthesis)
            || self.check(TokenKind::KeywordThen)
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        if parenthesized {
            self.expect(TokenKind::RightParenthesis, "')'", "after for clauses")?;
        }
        self.expect(TokenKind::KeywordThen, "'then'", "after for clauses")?;

        let body = self.parse_statement()?;

        let mut inner = vec![body];
        if let Some(increment) = increment {
            inner.push(Statement::Expression(increment));
        }
        let mut outer = Vec::new();
        if let Some(initializer) = initializer {
            outer.push(initializer);
        }
        outer.push(Statement::While {
            condition,
            body: Box::new(Statement::Block(inner)),
        });
        Ok(Statement::Block(outer))
    }

    fn parse_function(&mut self) -> Result<Statement, ParserError> {
        let name = self.expect(TokenKind::Ident, "function name", "after 'func'")?;
        self.expect(TokenKind::Colon, "':'", "after function name")?;

        let mut parameters = Vec::new();
        if !self.check(TokenKind::Equal) {
            loop {
                let token = self.advance();
                if token.kind != TokenKind::Ident {
                    return Err(ParserError {
                        kind: ParserErrorKind::InvalidParameter(token.kind),
                        line: token.line,
                    });
                }
                parameters.push(Self::ident(token));
                if self.eat_if(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::Equal, "'='", "after parameters")?;
        let _ = self.eat_if(TokenKind::Newline);
        self.expect(TokenKind::Indent, "indented block", "after function header")?;
        let body = self.parse_block();

        Ok(Statement::Function(Rc::new(FunctionDecl {
            name: Self::ident(name),
            parameters,
            body,
        })))
    }

    fn parse_variable(&mut self) -> Result<Statement, ParserError> {
        let name = self.expect(TokenKind::Ident, "variable name", "after 'let'")?;
        let initial = if self.eat_if(TokenKind::Equal).is_some() {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect_terminator("after variable declaration")?;
        Ok(Statement::Variable {
            name: Self::ident(name),
            initial,
        })
    }

    fn parse_return(&mut self) -> Result<Statement, ParserError> {
        let line = self.tokens[self.current - 1].line;
        let value = if self.check(TokenKind::Newline) || self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_terminator("after return value")?;
        Ok(Statement::Return { line, value })
    }

    /// Parses statements up to the closing dedent. Errors inside the block are
    /// recorded and recovered from so the block itself always completes.
    fn parse_block(&mut self) -> Vec<Statement> {
        self.block_depth += 1;
        let mut statements = Vec::new();
        while !self.check(TokenKind::Dedent) && !self.is_at_end() {
            if let Some(statement) = self.parse_statement_or_recover() {
                statements.push(statement);
            }
        }
        self.block_depth -= 1;
        let _ = self.eat_if(TokenKind::Dedent);
        statements
    }

    fn ident(token: Token) -> Ident {
        Ident {
            name: token.lexeme,
            line: token.line,
        }
    }
}

// Expressions, lowest precedence first
impl Parser {
    pub fn parse_expression(&mut self) -> Result<Expression, ParserError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expression, ParserError> {
        let expr = self.parse_or()?;

        if let Some(equals) = self.eat_if(TokenKind::Equal) {
            let value = self.parse_assignment()?;
            let Some(name) = expr.get_l_value() else {
                return Err(ParserError {
                    kind: ParserErrorKind::InvalidAssignmentTarget,
                    line: equals.line,
                });
            };
            return Ok(Expression::Assignment {
                name: name.clone(),
                value: Box::new(value),
            });
        }

        if let Some(operator) = self.eat_if(TokenKind::PlusPlus) {
            return Self::desugar_step(
                expr,
                BinaryOperator::Add,
                operator.line,
                ParserErrorKind::InvalidIncrementTarget,
            );
        }
        if let Some(operator) = self.eat_if(TokenKind::MinusMinus) {
            return Self::desugar_step(
                expr,
                BinaryOperator::Subtract,
                operator.line,
                ParserErrorKind::InvalidDecrementTarget,
            );
        }

        Ok(expr)
    }

    /// Rewrites `x++` into `x = x + 1` (and `x--` into `x = x - 1`).
    fn desugar_step(
        target: Expression,
        operator: BinaryOperator,
        line: u32,
        error: ParserErrorKind,
    ) -> Result<Expression, ParserError> {
        let Some(name) = target.get_l_value().cloned() else {
            return Err(ParserError { kind: error, line });
        };
        let one = Expression::Atom(ExpressionAtom {
            kind: ExpressionAtomKind::Number(1.0),
            line,
        });
        Ok(Expression::Assignment {
            name,
            value: Box::new(Expression::Binary {
                operator,
                lhs: Box::new(target),
                rhs: Box::new(one),
                line,
            }),
        })
    }

    fn parse_or(&mut self) -> Result<Expression, ParserError> {
        let mut lhs = self.parse_and()?;
        while let Some(operator) = self.eat_if(TokenKind::KeywordOr) {
            let rhs = self.parse_and()?;
            lhs = Expression::Logic {
                operator: LogicOperator::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: operator.line,
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Expression, ParserError> {
        let mut lhs = self.parse_equality()?;
        while let Some(operator) = self.eat_if(TokenKind::KeywordAnd) {
            let rhs = self.parse_equality()?;
            lhs = Expression::Logic {
                operator: LogicOperator::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line: operator.line,
            };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary(Self::parse_comparison, &EQUALITY_OPERATORS)
    }

    fn parse_comparison(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary(Self::parse_addition, &COMPARISON_OPERATORS)
    }

    fn parse_addition(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary(Self::parse_multiplication, &ADDITIVE_OPERATORS)
    }

    fn parse_multiplication(&mut self) -> Result<Expression, ParserError> {
        self.parse_binary(Self::parse_unary, &MULTIPLICATIVE_OPERATORS)
    }

    /// One left-associative precedence level.
    fn parse_binary(
        &mut self,
        operand: fn(&mut Self) -> Result<Expression, ParserError>,
        operators: &[(TokenKind, BinaryOperator)],
    ) -> Result<Expression, ParserError> {
        let mut lhs = operand(self)?;
        while let Some(&(_, operator)) = operators.iter().find(|(kind, _)| self.check(*kind)) {
            let line = self.advance().line;
            let rhs = operand(self)?;
            lhs = Expression::Binary {
                operator,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                line,
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expression, ParserError> {
        let operator = match self.peek().kind {
            TokenKind::Bang => UnaryOperator::Bang,
            TokenKind::Minus => UnaryOperator::Minus,
            _ => return self.parse_call(),
        };
        let line = self.advance().line;
        let rhs = self.parse_unary()?;
        Ok(Expression::Unary {
            operator,
            rhs: Box::new(rhs),
            line,
        })
    }

    fn parse_call(&mut self) -> Result<Expression, ParserError> {
        let mut expr = self.parse_primary()?;

        while let Some(paren) = self.eat_if(TokenKind::LeftParenthesis) {
            let mut arguments = Vec::new();
            if !self.check(TokenKind::RightParenthesis) {
                loop {
                    arguments.push(self.parse_expression()?);
                    if self.eat_if(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RightParenthesis, "')'", "after arguments")?;
            expr = Expression::Call {
                callee: Box::new(expr),
                arguments,
                line: paren.line,
            };
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParserError> {
        let token = self.peek();
        let line = token.line;
        let kind = match token.kind {
            TokenKind::KeywordTrue => ExpressionAtomKind::Bool(true),
            TokenKind::KeywordFalse => ExpressionAtomKind::Bool(false),
            TokenKind::KeywordNil => ExpressionAtomKind::Nil,
            TokenKind::NumericLiteral | TokenKind::StringLiteral => match token.literal {
                Some(Literal::Number(v)) => ExpressionAtomKind::Number(v),
                Some(Literal::String(ref v)) => ExpressionAtomKind::StringLiteral(v.clone()),
                None => ExpressionAtomKind::Nil,
            },
            TokenKind::Ident => {
                let token = self.advance();
                return Ok(Expression::Variable(Self::ident(token)));
            }
            TokenKind::LeftParenthesis => {
                let _ = self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParenthesis, "')'", "after expression")?;
                return Ok(Expression::Group {
                    inner: Box::new(inner),
                });
            }
            kind => {
                return Err(ParserError {
                    kind: ParserErrorKind::NonExpression(kind),
                    line,
                })
            }
        };
        let _ = self.advance();
        Ok(Expression::Atom(ExpressionAtom { kind, line }))
    }
}
