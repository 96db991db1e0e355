use super::{ParseErrorKind, Parser};
use crate::ast::*;
use crate::token::{TokenKind, TokenSource};

/// Binding power, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Prec {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
}

fn token_prec(kind: TokenKind) -> Prec {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Prec::Equals,
        TokenKind::Lt | TokenKind::Gt => Prec::LessGreater,
        TokenKind::Plus | TokenKind::Minus => Prec::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Prec::Product,
        TokenKind::LParen => Prec::Call,
        _ => Prec::Lowest,
    }
}

impl<T: TokenSource> Parser<T> {
    pub(super) fn parse_expression(&mut self, prec: Prec) -> Option<Expression> {
        let Some(prefix) = self.rules.prefix(self.cur_token.kind) else {
            self.report(
                ParseErrorKind::NoPrefixParseFn(self.cur_token.kind),
                self.cur_token.span,
            );
            return None;
        };

        // a failed operand leaves `left` empty, but the operators after it
        // still get parsed
        let mut left = prefix(self);

        // an operator of equal precedence ends the loop, which makes chains
        // of the same operator associate to the left
        while !self.peek_token_is(TokenKind::Semicolon) && prec < self.peek_prec() {
            let Some(infix) = self.rules.infix(self.peek_token.kind) else {
                return left;
            };

            self.next_token();
            left = infix(self, left);
        }

        left
    }

    pub(super) fn parse_identifier(&mut self) -> Option<Expression> {
        Some(Expression::Identifier(Identifier {
            token: self.cur_token.clone(),
            value: self.cur_token.literal.clone(),
        }))
    }

    pub(super) fn parse_integer_literal(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();

        let Some(value) = parse_int(&token.literal) else {
            self.report(ParseErrorKind::InvalidInteger(token.literal), token.span);
            return None;
        };

        Some(Expression::Integer(IntegerLiteral { token, value }))
    }

    pub(super) fn parse_boolean(&mut self) -> Option<Expression> {
        Some(Expression::Boolean(Boolean {
            token: self.cur_token.clone(),
            value: self.cur_token_is(TokenKind::True),
        }))
    }

    pub(super) fn parse_prefix_expression(&mut self) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = PrefixOp::from_token_kind(token.kind)?;

        self.next_token();
        let right = self.parse_expression(Prec::Prefix);

        Some(Expression::Prefix(PrefixExpression {
            token,
            operator,
            right: right.map(Box::new),
        }))
    }

    pub(super) fn parse_infix_expression(
        &mut self,
        left: Option<Expression>,
    ) -> Option<Expression> {
        let token = self.cur_token.clone();
        let operator = InfixOp::from_token_kind(token.kind)?;

        let prec = self.cur_prec();
        self.next_token();
        let right = self.parse_expression(prec);

        Some(Expression::Infix(InfixExpression {
            token,
            left: left.map(Box::new),
            operator,
            right: right.map(Box::new),
        }))
    }

    pub(super) fn parse_grouped_expression(&mut self) -> Option<Expression> {
        let open = self.cur_token.span;
        self.next_token();

        let expr = self.parse_expression(Prec::Lowest);
        self.expect_closing(TokenKind::RParen, open)?;

        expr
    }

    pub(super) fn parse_call_expression(
        &mut self,
        function: Option<Expression>,
    ) -> Option<Expression> {
        let token = self.cur_token.clone();
        let arguments = self.parse_call_arguments().unwrap_or_default();

        Some(Expression::Call(CallExpression {
            token,
            function: function.map(Box::new),
            arguments,
        }))
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Option<Expression>>> {
        let open = self.cur_token.span;

        if self.peek_token_is(TokenKind::RParen) {
            self.next_token();
            return Some(vec![]);
        }

        let mut arguments = vec![];

        self.next_token();
        arguments.push(self.parse_expression(Prec::Lowest));

        while self.peek_token_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            arguments.push(self.parse_expression(Prec::Lowest));
        }

        self.expect_closing(TokenKind::RParen, open)?;

        Some(arguments)
    }

    fn cur_prec(&self) -> Prec {
        token_prec(self.cur_token.kind)
    }

    fn peek_prec(&self) -> Prec {
        token_prec(self.peek_token.kind)
    }
}

/// Converts integer literal text, accepting `0x`, `0o` and `0b` prefixes, a
/// bare leading `0` for octal, and `_` between digits.
fn parse_int(literal: &str) -> Option<i64> {
    let (digits, base) = match literal.get(..2) {
        Some("0x" | "0X") => (&literal[2..], 16),
        Some("0o" | "0O") => (&literal[2..], 8),
        Some("0b" | "0B") => (&literal[2..], 2),
        _ if literal.len() > 1 && literal.starts_with('0') => (&literal[1..], 8),
        _ => (literal, 10),
    };

    // a separator may directly follow a base prefix
    let digits = match digits.strip_prefix('_') {
        Some(rest) if base != 10 => rest,
        _ => digits,
    };

    let well_formed = !digits.is_empty()
        && !digits.starts_with('_')
        && !digits.ends_with('_')
        && !digits.contains("__")
        && digits.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');

    if !well_formed {
        return None;
    }

    let digits: String = digits.chars().filter(|&ch| ch != '_').collect();
    i64::from_str_radix(&digits, base).ok()
}

#[cfg(test)]
mod tests {
    use super::parse_int;

    #[test]
    fn integer_bases() {
        assert_eq!(parse_int("0"), Some(0));
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("0x2A"), Some(42));
        assert_eq!(parse_int("0o52"), Some(42));
        assert_eq!(parse_int("052"), Some(42));
        assert_eq!(parse_int("0b101010"), Some(42));
        assert_eq!(parse_int("9223372036854775807"), Some(i64::MAX));
    }

    #[test]
    fn separators() {
        assert_eq!(parse_int("1_000_000"), Some(1_000_000));
        assert_eq!(parse_int("0x_ff"), Some(255));
        assert_eq!(parse_int("1__0"), None);
        assert_eq!(parse_int("1_"), None);
    }

    #[test]
    fn malformed() {
        assert_eq!(parse_int("0x"), None);
        assert_eq!(parse_int("08"), None);
        assert_eq!(parse_int("12abc"), None);
        assert_eq!(parse_int("9223372036854775808"), None);
    }
}
