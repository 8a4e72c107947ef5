mod cursor;
mod error;
pub mod formatter;
mod token;

use cursor::Cursor;
pub use error::{LexicalError, LexicalErrorKind};
use log::{debug, trace};
pub use token::{Literal, Token, TokenKind, KEYWORD_HASHMAP};

/// Number of spaces making up one level of indentation.
pub const INDENT_WIDTH: usize = 4;

/// Result of a full scan: every token produced plus every error encountered.
#[derive(Debug, Clone, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexicalError>,
}

impl Lexed {
    pub fn had_error(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Scans `source` into tokens, collecting lexical errors along the way.
pub fn scan(source: &str) -> Lexed {
    Lexer::new(source).scan_tokens()
}

#[derive(Debug)]
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    start: usize,
    start_line: u32,
    depth: usize,
    tokens: Vec<Token>,
    errors: Vec<LexicalError>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            start: 0,
            start_line: 1,
            depth: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn scan_tokens(mut self) -> Lexed {
        self.measure_indent();
        while !self.cursor.is_at_end() {
            self.start = self.cursor.offset();
            self.start_line = self.cursor.line();
            self.scan_token();
        }
        self.finish()
    }
}

impl<'src> Lexer<'src> {
    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.cursor.slice(self.start);
        let token = Token::new(kind, lexeme, self.start_line);
        trace!("Scanned {} `{}` on line {}", token.kind, token.lexeme, token.line);
        self.tokens.push(token);
    }

    fn add_layout_token(&mut self, kind: TokenKind, line: u32) {
        trace!("Scanned {kind} on line {line}");
        self.tokens.push(Token::new(kind, "", line));
    }

    fn error(&mut self, kind: LexicalErrorKind, line: u32) {
        debug!("Lexical error on line {line}: {kind}");
        self.errors.push(LexicalError { kind, line });
    }

    fn add_either(&mut self, next: char, matched: TokenKind, unmatched: TokenKind) {
        let kind = if self.cursor.eat(next) {
            matched
        } else {
            unmatched
        };
        self.add_token(kind);
    }

    fn scan_token(&mut self) {
        let Some(c) = self.cursor.advance() else {
            return;
        };

        match c {
            // Single character tokens
            '(' => self.add_token(TokenKind::LeftParenthesis),
            ')' => self.add_token(TokenKind::RightParenthesis),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            ';' => self.add_token(TokenKind::Semicolon),
            ':' => self.add_token(TokenKind::Colon),
            '*' => self.add_token(TokenKind::Star),
            // One or two character tokens
            '+' => self.add_either('+', TokenKind::PlusPlus, TokenKind::Plus),
            '-' => self.add_either('-', TokenKind::MinusMinus, TokenKind::Minus),
            '!' => self.add_either('=', TokenKind::BangEqual, TokenKind::Bang),
            '=' => self.add_either('=', TokenKind::EqualEqual, TokenKind::Equal),
            '<' => self.add_either('=', TokenKind::LessThanEqual, TokenKind::LessThan),
            '>' => self.add_either('=', TokenKind::GreaterThanEqual, TokenKind::GreaterThan),
            '/' => {
                if self.cursor.eat('/') {
                    // The newline itself is left for the layout rules.
                    let _ = self.cursor.eat_while(|c| c != '\n');
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            '"' => self.string(),
            '~' => self.continuation(),
            '\n' => self.newline(),
            ' ' | '\t' | '\r' => {}
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
            c => self.error(LexicalErrorKind::Unrecognized(c), self.start_line),
        }
    }

    fn string(&mut self) {
        let _ = self.cursor.eat_while(|c| c != '"');
        if self.cursor.is_at_end() {
            self.error(LexicalErrorKind::UnclosedString, self.cursor.line());
            return;
        }
        // Closing quote
        let _ = self.cursor.advance();

        let lexeme = self.cursor.slice(self.start);
        let value = &lexeme[1..lexeme.len() - 1];
        let token = Token::new(TokenKind::StringLiteral, lexeme, self.start_line)
            .with_literal(Literal::String(value.into()));
        self.tokens.push(token);
    }

    fn number(&mut self) {
        let _ = self.cursor.eat_while(|c| c.is_ascii_digit());
        let has_fraction = self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit());
        if has_fraction {
            let _ = self.cursor.advance();
            let _ = self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        let lexeme = self.cursor.slice(self.start);
        let value: f64 = lexeme
            .parse()
            .expect("Numeric literals are guaranteed to be parseable into f64.");
        let token = Token::new(TokenKind::NumericLiteral, lexeme, self.start_line)
            .with_literal(Literal::Number(value));
        self.tokens.push(token);
    }

    fn identifier(&mut self) {
        let _ = self
            .cursor
            .eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let lexeme = self.cursor.slice(self.start);
        match KEYWORD_HASHMAP.get(lexeme) {
            Some(kind) => self.add_token(*kind),
            None => {
                let token = Token::new(TokenKind::Ident, lexeme, self.start_line)
                    .with_literal(Literal::String(lexeme.into()));
                self.tokens.push(token);
            }
        }
    }

    /// `~` directly before a line break joins the next line onto this one.
    fn continuation(&mut self) {
        if self.cursor.peek() == Some('\r') && self.cursor.peek_next() == Some('\n') {
            let _ = self.cursor.advance();
        }
        if !self.cursor.eat('\n') {
            self.error(LexicalErrorKind::Unrecognized('~'), self.start_line);
        }
    }

    fn newline(&mut self) {
        let ends_statement = self
            .tokens
            .last()
            .is_some_and(|token| !(token.kind.ends_line() || token.kind.continues_line()));
        if ends_statement {
            self.add_layout_token(TokenKind::Newline, self.start_line);
        }
        self.measure_indent();
    }

    /// Reads the leading spaces of the line under the cursor and emits the
    /// INDENT/DEDENT tokens needed to reach its depth.
    fn measure_indent(&mut self) {
        let spaces = self.cursor.eat_while(|c| c == ' ');
        let is_blank = match self.cursor.peek() {
            None | Some('\n') | Some('\r') => true,
            Some('/') => self.cursor.peek_next() == Some('/'),
            Some(_) => false,
        };
        if is_blank {
            return;
        }

        let line = self.cursor.line();
        if spaces % INDENT_WIDTH != 0 {
            self.error(LexicalErrorKind::MisalignedIndent, line);
            return;
        }

        let depth = spaces / INDENT_WIDTH;
        if depth != self.depth {
            debug!("Indentation depth {} -> {} on line {line}", self.depth, depth);
        }
        while self.depth < depth {
            self.add_layout_token(TokenKind::Indent, line);
            self.depth += 1;
        }
        while self.depth > depth {
            self.add_layout_token(TokenKind::Dedent, line);
            self.depth -= 1;
        }
    }

    fn finish(mut self) -> Lexed {
        let line = self.cursor.line();
        if self
            .tokens
            .last()
            .is_some_and(|token| !token.kind.ends_line())
        {
            self.add_layout_token(TokenKind::Newline, line);
        }
        while self.depth > 0 {
            self.add_layout_token(TokenKind::Dedent, line);
            self.depth -= 1;
        }
        self.add_layout_token(TokenKind::Eof, line);

        debug!(
            "Scanned {} tokens with {} errors",
            self.tokens.len(),
            self.errors.len()
        );
        Lexed {
            tokens: self.tokens,
            errors: self.errors,
        }
    }
}
