use std::fmt;

use crate::token::{Token, TokenKind};
use crate::{Syntax, SyntaxCopy};

/// Any node of the tree. Every node keeps the token that introduced it.
pub trait Node: fmt::Display {
    fn token_literal(&self) -> &str;
}

/// Root of every tree the parser produces.
#[derive(Syntax!, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

#[derive(Syntax!)]
pub enum Statement {
    Let(LetStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

/// `let <name> = <value>;`
///
/// The parser does not parse the bound expression yet: it skips to the next
/// `;`, so `value` is always `None`.
#[derive(Syntax!)]
pub struct LetStatement {
    pub token: Token,
    pub name: Identifier,
    pub value: Option<Expression>,
}

/// `return <value>;`, with the value skipped like [`LetStatement::value`].
#[derive(Syntax!)]
pub struct ReturnStatement {
    pub token: Token,
    pub return_value: Option<Expression>,
}

/// A bare expression used as a statement. The expression is absent if it
/// failed to parse.
#[derive(Syntax!)]
pub struct ExpressionStatement {
    pub token: Token,
    pub expression: Option<Expression>,
}

#[derive(Syntax!)]
pub enum Expression {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    Boolean(Boolean),
    Prefix(PrefixExpression),
    Infix(InfixExpression),
    Call(CallExpression),
}

#[derive(Syntax!)]
pub struct Identifier {
    pub token: Token,
    pub value: String,
}

#[derive(Syntax!)]
pub struct IntegerLiteral {
    pub token: Token,
    pub value: i64,
}

#[derive(Syntax!)]
pub struct Boolean {
    pub token: Token,
    pub value: bool,
}

// Operands below are `None` where they failed to parse. The node itself is
// still built so parsing can carry on past it.

#[derive(Syntax!)]
pub struct PrefixExpression {
    pub token: Token,
    pub operator: PrefixOp,
    pub right: Option<Box<Expression>>,
}

#[derive(Syntax!)]
pub struct InfixExpression {
    pub token: Token,
    pub left: Option<Box<Expression>>,
    pub operator: InfixOp,
    pub right: Option<Box<Expression>>,
}

#[derive(Syntax!)]
pub struct CallExpression {
    /// The `(` token.
    pub token: Token,
    pub function: Option<Box<Expression>>,
    /// Empty if the closing `)` was missing.
    pub arguments: Vec<Option<Expression>>,
}

#[derive(SyntaxCopy!)]
pub enum PrefixOp {
    Not,
    Negate,
}

impl PrefixOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Bang => Some(PrefixOp::Not),
            TokenKind::Minus => Some(PrefixOp::Negate),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOp::Not => "!",
            PrefixOp::Negate => "-",
        }
    }
}

#[derive(SyntaxCopy!)]
pub enum InfixOp {
    Add,
    Sub,
    Mul,
    Div,

    Eq,
    NotEq,
    Lt,
    Gt,
}

impl InfixOp {
    pub fn from_token_kind(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::Plus => InfixOp::Add,
            TokenKind::Minus => InfixOp::Sub,
            TokenKind::Asterisk => InfixOp::Mul,
            TokenKind::Slash => InfixOp::Div,
            TokenKind::Eq => InfixOp::Eq,
            TokenKind::NotEq => InfixOp::NotEq,
            TokenKind::Lt => InfixOp::Lt,
            TokenKind::Gt => InfixOp::Gt,
            _ => return None,
        };

        Some(op)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InfixOp::Add => "+",
            InfixOp::Sub => "-",
            InfixOp::Mul => "*",
            InfixOp::Div => "/",
            InfixOp::Eq => "==",
            InfixOp::NotEq => "!=",
            InfixOp::Lt => "<",
            InfixOp::Gt => ">",
        }
    }
}

impl Node for Program {
    fn token_literal(&self) -> &str {
        self.statements
            .first()
            .map_or("", |statement| statement.token_literal())
    }
}

impl Node for Statement {
    fn token_literal(&self) -> &str {
        match self {
            Statement::Let(s) => &s.token.literal,
            Statement::Return(s) => &s.token.literal,
            Statement::Expression(s) => &s.token.literal,
        }
    }
}

impl Node for Expression {
    fn token_literal(&self) -> &str {
        &self.token().literal
    }
}

impl Expression {
    pub fn token(&self) -> &Token {
        match self {
            Expression::Identifier(e) => &e.token,
            Expression::Integer(e) => &e.token,
            Expression::Boolean(e) => &e.token,
            Expression::Prefix(e) => &e.token,
            Expression::Infix(e) => &e.token,
            Expression::Call(e) => &e.token,
        }
    }
}

// The printed form parenthesises every operator application, which makes
// the tree's shape visible in a single line.

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for statement in &self.statements {
            write!(f, "{statement}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let(s) => {
                write!(f, "{} {} = ", s.token.literal, s.name)?;
                write_opt(f, s.value.as_ref())?;
                write!(f, ";")
            }
            Statement::Return(s) => {
                write!(f, "{} ", s.token.literal)?;
                write_opt(f, s.return_value.as_ref())?;
                write!(f, ";")
            }
            Statement::Expression(s) => write_opt(f, s.expression.as_ref()),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Identifier(ident) => write!(f, "{ident}"),
            Expression::Integer(int) => write!(f, "{}", int.token.literal),
            Expression::Boolean(b) => write!(f, "{}", b.token.literal),
            Expression::Prefix(e) => {
                write!(f, "({}", e.operator.as_str())?;
                write_opt(f, e.right.as_deref())?;
                write!(f, ")")
            }
            Expression::Infix(e) => {
                write!(f, "(")?;
                write_opt(f, e.left.as_deref())?;
                write!(f, " {} ", e.operator.as_str())?;
                write_opt(f, e.right.as_deref())?;
                write!(f, ")")
            }
            Expression::Call(e) => {
                write_opt(f, e.function.as_deref())?;
                write!(f, "(")?;
                for (i, arg) in e.arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_opt(f, arg.as_ref())?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

fn write_opt(f: &mut fmt::Formatter<'_>, expr: Option<&Expression>) -> fmt::Result {
    match expr {
        Some(expr) => write!(f, "{expr}"),
        None => Ok(()),
    }
}
