
use std::str::Chars;

use monkey_session::diagnostics::prelude::Span;
use monkey_utils::peek::Peek;

use crate::token::*;

/// Scans source text into tokens on demand.
///
/// Integer literals are kept verbatim, including any `0x`/`0o`/`0b` prefix
/// and `_` separators; converting them is left to the parser. Characters
/// that start no token become [`TokenKind::Illegal`] tokens.
pub struct Lexer<'src> {
    all: &'src str,
    chars: Chars<'src>,

    token_start: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            all: source,
            chars: source.chars(),

            token_start: 0,
        }
    }

    /// Lex the remaining input up front.
    pub fn lex(mut self) -> TokenIter {
        let mut tokens = vec![];

        loop {
            let token = self.lex_token();
            if token.kind == TokenKind::Eof {
                return TokenIter::with_eof(tokens, token);
            }
            tokens.push(token);
        }
    }

    fn lex_token(&mut self) -> Token {
        loop {
            self.token_start = self.byte_pos();

            let Some(ch) = self.chars.next() else {
                return Token::eof(self.token_start);
            };

            let kind = match ch {
                // comment
                '/' if self.chars.eat('/') => {
                    self.chars.eat_while(|&ch| ch != '\n');
                    continue;
                }

                ch if ch.is_ascii_whitespace() => continue,

                '=' if self.chars.eat('=') => TokenKind::Eq,
                '!' if self.chars.eat('=') => TokenKind::NotEq,

                '=' => TokenKind::Assign,
                '!' => TokenKind::Bang,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Asterisk,
                '/' => TokenKind::Slash,
                '<' => TokenKind::Lt,
                '>' => TokenKind::Gt,

                ',' => TokenKind::Comma,
                ';' => TokenKind::Semicolon,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,

                '0'..='9' => {
                    self.chars.eat_while(|&ch| is_ident(ch));
                    TokenKind::Int
                }

                ch if is_ident_start(ch) => {
                    self.chars.eat_while(|&ch| is_ident(ch));
                    TokenKind::lookup_ident(self.token_str())
                }

                _ => TokenKind::Illegal,
            };

            return Token::new(
                kind,
                self.token_str(),
                Span::new(self.token_start, self.byte_pos()),
            );
        }
    }

    fn token_str(&self) -> &'src str {
        &self.all[self.token_start..self.byte_pos()]
    }

    fn byte_pos(&self) -> usize {
        self.all.len() - self.chars.as_str().len()
    }
}

impl TokenSource for Lexer<'_> {
    fn next_token(&mut self) -> Token {
        self.lex_token()
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Already-lexed tokens, replayed as a [`TokenSource`].
#[derive(Debug, Clone)]
pub struct TokenIter {
    tokens: std::vec::IntoIter<Token>,
    eof: Token,
}

impl TokenIter {
    /// The end-of-input token is placed right after the last token.
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.last().map_or(0, |t| t.span.end);
        Self::with_eof(tokens, Token::eof(end))
    }

    fn with_eof(tokens: Vec<Token>, eof: Token) -> Self {
        Self {
            tokens: tokens.into_iter(),
            eof,
        }
    }

    pub fn eof_span(&self) -> Span {
        self.eof.span
    }
}

impl Iterator for TokenIter {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.tokens.next()
    }
}

impl TokenSource for TokenIter {
    fn next_token(&mut self) -> Token {
        self.tokens.next().unwrap_or_else(|| self.eof.clone())
    }
}
