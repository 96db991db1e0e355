#[cfg(test)]
mod tests;

mod expr;

use std::collections::HashMap;
use std::fmt;

use monkey_session::diagnostics::prelude::*;

use crate::ast::*;
use crate::token::{Token, TokenKind, TokenSource};
use expr::Prec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,

    /// The opening delimiter a missing closing one would have matched.
    pub unclosed: Option<Span>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("expected next token to be {expected}, got {found} instead")]
    ExpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },

    #[error("no prefix parse function for {0} found")]
    NoPrefixParseFn(TokenKind),

    #[error("could not parse {0:?} as integer")]
    InvalidInteger(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

impl IntoDiagnostic<SourceId> for ParseError {
    fn into_diagnostic(self, source_id: &SourceId) -> Diagnostic {
        let mut diagnostic = Diagnostic::error()
            .with_message("syntax error")
            .with_snippet(Snippet::primary(
                self.kind.to_string(),
                *source_id,
                self.span,
            ));

        if let Some(open) = self.unclosed {
            diagnostic =
                diagnostic.with_snippet(Snippet::secondary("unclosed delimiter", *source_id, open));
        }

        if matches!(self.kind, ParseErrorKind::InvalidInteger(_)) {
            diagnostic = diagnostic.with_note(
                "integers are signed 64-bit; `0x`, `0o` and `0b` select another base",
            );
        }

        diagnostic
    }
}

type PrefixParseFn<T> = fn(&mut Parser<T>) -> Option<Expression>;
type InfixParseFn<T> = fn(&mut Parser<T>, Option<Expression>) -> Option<Expression>;

/// Parse functions keyed by the token kind that starts them.
struct ParseRules<T: TokenSource> {
    prefix: HashMap<TokenKind, PrefixParseFn<T>>,
    infix: HashMap<TokenKind, InfixParseFn<T>>,
}

impl<T: TokenSource> ParseRules<T> {
    fn new() -> Self {
        let mut rules = Self {
            prefix: HashMap::new(),
            infix: HashMap::new(),
        };

        rules.register_prefix(TokenKind::Ident, Parser::parse_identifier);
        rules.register_prefix(TokenKind::Int, Parser::parse_integer_literal);
        rules.register_prefix(TokenKind::Bang, Parser::parse_prefix_expression);
        rules.register_prefix(TokenKind::Minus, Parser::parse_prefix_expression);
        rules.register_prefix(TokenKind::True, Parser::parse_boolean);
        rules.register_prefix(TokenKind::False, Parser::parse_boolean);
        rules.register_prefix(TokenKind::LParen, Parser::parse_grouped_expression);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::Eq,
            TokenKind::NotEq,
            TokenKind::Lt,
            TokenKind::Gt,
        ] {
            rules.register_infix(kind, Parser::parse_infix_expression);
        }
        rules.register_infix(TokenKind::LParen, Parser::parse_call_expression);

        rules
    }

    fn register_prefix(&mut self, kind: TokenKind, f: PrefixParseFn<T>) {
        self.prefix.insert(kind, f);
    }

    fn register_infix(&mut self, kind: TokenKind, f: InfixParseFn<T>) {
        self.infix.insert(kind, f);
    }

    fn prefix(&self, kind: TokenKind) -> Option<PrefixParseFn<T>> {
        self.prefix.get(&kind).copied()
    }

    fn infix(&self, kind: TokenKind) -> Option<InfixParseFn<T>> {
        self.infix.get(&kind).copied()
    }
}

/// Pratt parser over a [`TokenSource`], with one token of lookahead.
///
/// Parsing never stops at an error: errors are collected and the parser
/// carries on with the next statement. Check [`Parser::errors`] before
/// trusting the returned tree.
pub struct Parser<T: TokenSource> {
    tokens: T,
    errors: Vec<ParseError>,

    cur_token: Token,
    peek_token: Token,

    rules: ParseRules<T>,
}

impl<T: TokenSource> Parser<T> {
    pub fn new(mut tokens: T) -> Self {
        let cur_token = tokens.next_token();
        let peek_token = tokens.next_token();

        Self {
            tokens,
            errors: vec![],

            cur_token,
            peek_token,

            rules: ParseRules::new(),
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut statements = vec![];

        while !self.cur_token_is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                statements.push(statement);
            }

            self.next_token();
        }

        Program { statements }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => Some(Statement::Return(self.parse_return_statement())),
            _ => Some(Statement::Expression(self.parse_expression_statement())),
        }
    }

    fn parse_let_statement(&mut self) -> Option<LetStatement> {
        let token = self.cur_token.clone();

        self.expect_peek(TokenKind::Ident)?;
        let name = Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        };

        self.expect_peek(TokenKind::Assign)?;

        // TODO: parse the bound expression once `let` gets evaluation rules.
        self.skip_to_semicolon();

        Some(LetStatement {
            token,
            name,
            value: None,
        })
    }

    fn parse_return_statement(&mut self) -> ReturnStatement {
        let token = self.cur_token.clone();

        self.next_token();
        self.skip_to_semicolon();

        ReturnStatement {
            token,
            return_value: None,
        }
    }

    fn parse_expression_statement(&mut self) -> ExpressionStatement {
        let token = self.cur_token.clone();
        let expression = self.parse_expression(Prec::Lowest);

        if self.peek_token_is(TokenKind::Semicolon) {
            self.next_token();
        }

        ExpressionStatement { token, expression }
    }

    fn next_token(&mut self) {
        let next = self.tokens.next_token();
        self.cur_token = std::mem::replace(&mut self.peek_token, next);
    }

    // without the `Eof` check an unterminated `let x = 5` would never return
    fn skip_to_semicolon(&mut self) {
        while !self.cur_token_is(TokenKind::Semicolon) && !self.cur_token_is(TokenKind::Eof) {
            self.next_token();
        }
    }

    fn cur_token_is(&self, kind: TokenKind) -> bool {
        self.cur_token.kind == kind
    }

    fn peek_token_is(&self, kind: TokenKind) -> bool {
        self.peek_token.kind == kind
    }

    /// Advance if the next token has the given kind, otherwise record an
    /// error and stay put.
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        self.expect_peek_matching(kind, None)
    }

    /// [`Parser::expect_peek`] for a closing delimiter. The error also points
    /// at the opening one.
    fn expect_closing(&mut self, kind: TokenKind, open: Span) -> Option<()> {
        self.expect_peek_matching(kind, Some(open))
    }

    fn expect_peek_matching(&mut self, kind: TokenKind, unclosed: Option<Span>) -> Option<()> {
        if self.peek_token_is(kind) {
            self.next_token();
            return Some(());
        }

        self.errors.push(ParseError {
            kind: ParseErrorKind::ExpectedToken {
                expected: kind,
                found: self.peek_token.kind,
            },
            span: self.peek_token.span,
            unclosed,
        });
        None
    }

    fn report(&mut self, kind: ParseErrorKind, span: Span) {
        self.errors.push(ParseError {
            kind,
            span,
            unclosed: None,
        });
    }
}
