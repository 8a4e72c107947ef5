pub mod driver;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod report;
pub mod string;
