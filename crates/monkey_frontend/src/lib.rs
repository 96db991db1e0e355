#[macro_use]
extern crate macro_rules_attribute;

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

use ast::Program;
use lexer::{Lexer, TokenIter};
use parser::{ParseError, Parser};
use token::TokenSource;

derive_alias! {
    #[derive(Syntax!)] = #[derive(Debug, Clone, PartialEq, Eq)];
    #[derive(SyntaxCopy!)] = #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)];
}

pub fn lex(source: &str) -> TokenIter {
    Lexer::new(source).lex()
}

pub fn parse(tokens: impl TokenSource) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.into_errors())
}

/// Lex and parse in a single pass, pulling tokens as the parser needs them.
pub fn parse_source(source: &str) -> (Program, Vec<ParseError>) {
    parse(Lexer::new(source))
}
