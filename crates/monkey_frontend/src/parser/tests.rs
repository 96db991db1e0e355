use monkey_session::diagnostics::prelude::Span;
use monkey_utils::assert_snapshot_with_source;

use super::{ParseError, Parser};
use crate::ast::*;
use crate::lexer::{Lexer, TokenIter};
use crate::token::{Token, TokenKind};

fn parse(source: &str) -> (Program, Vec<ParseError>) {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    (program, parser.into_errors())
}

#[track_caller]
fn parse_ok(source: &str) -> Program {
    let (program, errors) = parse(source);
    assert!(errors.is_empty(), "errors parsing {source:?}: {errors:?}");
    program
}

fn error_messages(source: &str) -> Vec<String> {
    parse(source).1.iter().map(ToString::to_string).collect()
}

#[track_caller]
fn single_expression(source: &str) -> Expression {
    let program = parse_ok(source);
    match <[Statement; 1]>::try_from(program.statements) {
        Ok([Statement::Expression(ExpressionStatement {
            expression: Some(expr),
            ..
        })]) => expr,
        other => panic!("expected a single expression statement, got {other:?}"),
    }
}

macro_rules! assert_parse {
    ($source:expr, @$snapshot:literal) => {{
        let source = $source;
        assert_snapshot_with_source!(source => parse_ok(source).to_string(), @$snapshot);
    }};
}

#[test]
fn let_statements() {
    let program = parse_ok("let x = 5; let y = 10; let foobar = 838383;");

    let names: Vec<_> = program
        .statements
        .iter()
        .map(|statement| match statement {
            Statement::Let(stmt) => {
                assert_eq!(stmt.name.token.literal, stmt.name.value);
                assert_eq!(stmt.value, None);
                stmt.name.value.as_str()
            }
            other => panic!("expected a let statement, got {other:?}"),
        })
        .collect();

    assert_eq!(names, ["x", "y", "foobar"]);
    assert_eq!(program.token_literal(), "let");
}

#[test]
fn single_let_statement() {
    let program = parse_ok("let x = 5;");

    assert_eq!(program.statements.len(), 1);
    let Statement::Let(stmt) = &program.statements[0] else {
        panic!("expected a let statement");
    };
    assert_eq!(stmt.name.value, "x");
    assert_eq!(program.to_string(), "let x = ;");
}

#[test]
fn let_value_is_skipped() {
    // the value is never parsed, so nothing in it is reported
    let program = parse_ok("let x = * ) ( ; 1");

    assert_eq!(program.statements.len(), 2);
    assert_eq!(program.to_string(), "let x = ;1");
}

#[test]
fn unterminated_let_stops_at_end_of_input() {
    let program = parse_ok("let x = 5 + 5");
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn let_errors() {
    assert_eq!(
        error_messages("let x 5;"),
        ["expected next token to be =, got INT instead"]
    );

    assert_eq!(
        error_messages("let = 10;"),
        [
            "expected next token to be IDENT, got = instead",
            "no prefix parse function for = found",
        ]
    );
}

#[test]
fn failed_let_produces_no_statement() {
    let (program, errors) = parse("let 838383;");

    assert_eq!(errors.len(), 1);
    // only the integer that followed survives
    assert_eq!(program.statements.len(), 1);
    assert_eq!(program.to_string(), "838383");
}

#[test]
fn return_statements() {
    let program = parse_ok("return 5; return 10; return add(15);");

    assert_eq!(program.statements.len(), 3);
    for statement in &program.statements {
        let Statement::Return(stmt) = statement else {
            panic!("expected a return statement, got {statement:?}");
        };
        assert_eq!(stmt.token.literal, "return");
        assert_eq!(stmt.return_value, None);
    }
}

#[test]
fn identifier_expression() {
    let Expression::Identifier(ident) = single_expression("foobar;") else {
        panic!("expected an identifier");
    };
    assert_eq!(ident.value, "foobar");
    assert_eq!(ident.token.literal, "foobar");
}

#[test]
fn integer_literal_expression() {
    let Expression::Integer(int) = single_expression("5;") else {
        panic!("expected an integer literal");
    };
    assert_eq!(int.value, 5);
    assert_eq!(int.token.literal, "5");
}

#[test]
fn boolean_expressions() {
    for (source, expected) in [("true;", true), ("false", false)] {
        let Expression::Boolean(b) = single_expression(source) else {
            panic!("expected a boolean");
        };
        assert_eq!(b.value, expected);
    }
}

#[test]
fn prefix_expressions() {
    let Expression::Prefix(expr) = single_expression("!5;") else {
        panic!("expected a prefix expression");
    };
    assert_eq!(expr.operator, PrefixOp::Not);
    assert!(matches!(
        expr.right.as_deref(),
        Some(Expression::Integer(IntegerLiteral { value: 5, .. }))
    ));

    let Expression::Prefix(expr) = single_expression("-foobar") else {
        panic!("expected a prefix expression");
    };
    assert_eq!(expr.operator, PrefixOp::Negate);
    assert_eq!(expr.right.unwrap().to_string(), "foobar");
}

#[test]
fn infix_expressions() {
    let cases = [
        ("5 + 5;", InfixOp::Add),
        ("5 - 5;", InfixOp::Sub),
        ("5 * 5;", InfixOp::Mul),
        ("5 / 5;", InfixOp::Div),
        ("5 > 5;", InfixOp::Gt),
        ("5 < 5;", InfixOp::Lt),
        ("5 == 5;", InfixOp::Eq),
        ("5 != 5;", InfixOp::NotEq),
        ("true == false", InfixOp::Eq),
    ];

    for (source, op) in cases {
        let Expression::Infix(expr) = single_expression(source) else {
            panic!("expected an infix expression for {source:?}");
        };
        assert_eq!(expr.operator, op);
        assert_eq!(expr.token.literal, op.as_str());
    }
}

#[test]
fn product_binds_tighter_than_sum() {
    let Expression::Infix(add) = single_expression("1 + 2 * 3") else {
        panic!("expected an infix expression");
    };

    assert_eq!(add.operator, InfixOp::Add);
    assert_eq!(add.left.unwrap().to_string(), "1");

    let Some(Expression::Infix(mul)) = add.right.map(|right| *right) else {
        panic!("expected the product on the right");
    };
    assert_eq!(mul.operator, InfixOp::Mul);
}

#[test]
fn grouping_overrides_precedence() {
    let Expression::Infix(mul) = single_expression("(1 + 2) * 3") else {
        panic!("expected an infix expression");
    };

    assert_eq!(mul.operator, InfixOp::Mul);
    assert!(matches!(
        mul.left.as_deref(),
        Some(Expression::Infix(InfixExpression {
            operator: InfixOp::Add,
            ..
        }))
    ));
}

#[test]
fn same_precedence_associates_left() {
    assert_parse!("a - b - c", @"((a - b) - c)");
    assert_parse!("a + b - c", @"((a + b) - c)");
    assert_parse!("a * b / c", @"((a * b) / c)");
    assert_parse!("1 == 2 != 3", @"((1 == 2) != 3)");
}

#[test]
fn operator_precedence() {
    assert_parse!("-a * b", @"((-a) * b)");
    assert_parse!("!-a", @"(!(-a))");
    assert_parse!("a + b / c", @"(a + (b / c))");
    assert_parse!("a + b * c + d / e - f", @"(((a + (b * c)) + (d / e)) - f)");
    assert_parse!("3 + 4; -5 * 5", @"(3 + 4)((-5) * 5)");
    assert_parse!("5 > 4 == 3 < 4", @"((5 > 4) == (3 < 4))");
    assert_parse!("5 < 4 != 3 > 4", @"((5 < 4) != (3 > 4))");
    assert_parse!("3 + 4 * 5 == 3 * 1 + 4 * 5", @"((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))");
    assert_parse!("3 > 5 == false", @"((3 > 5) == false)");
    assert_parse!("!true != false", @"((!true) != false)");
}

#[test]
fn grouped_expressions() {
    assert_parse!("1 + (2 + 3) + 4", @"((1 + (2 + 3)) + 4)");
    assert_parse!("(5 + 5) * 2", @"((5 + 5) * 2)");
    assert_parse!("2 / (5 + 5)", @"(2 / (5 + 5))");
    assert_parse!("-(5 + 5)", @"(-(5 + 5))");
    assert_parse!("!(true == true)", @"(!(true == true))");
}

#[test]
fn call_expressions() {
    assert_parse!("a + add(b * c) + d", @"((a + add((b * c))) + d)");
    assert_parse!(
        "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
        @"add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))"
    );
    assert_parse!("add(a + b + c * d / f + g)", @"add((((a + b) + ((c * d) / f)) + g))");
    assert_parse!("f()()", @"f()()");

    let Expression::Call(call) = single_expression("add(1, 2 * 3, 4 + 5);") else {
        panic!("expected a call expression");
    };
    assert_eq!(call.token.kind, TokenKind::LParen);
    assert_eq!(call.function.unwrap().to_string(), "add");
    assert_eq!(call.arguments.len(), 3);
}

#[test]
fn missing_prefix_rule_is_reported() {
    let (program, errors) = parse("*5");

    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["no prefix parse function for * found"]
    );
    assert_eq!(errors[0].span.start, 0);

    // the parser carries on after the bad token
    assert_eq!(program.statements.len(), 2);
    assert!(matches!(
        &program.statements[0],
        Statement::Expression(ExpressionStatement {
            expression: None,
            ..
        })
    ));
    assert_eq!(program.statements[1].to_string(), "5");
}

#[test]
fn missing_operand() {
    assert_eq!(
        error_messages("1 + ;"),
        ["no prefix parse function for ; found"]
    );
    assert_eq!(error_messages("-"), ["no prefix parse function for EOF found"]);
}

#[test]
fn failed_operand_keeps_the_expression() {
    let (program, errors) = parse("1 + ) * 3");

    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["no prefix parse function for ) found"]
    );
    assert_eq!(program.statements.len(), 1);
    assert_eq!(program.to_string(), "((1 + ) * 3)");

    let (program, errors) = parse("-) - 2");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.statements.len(), 1);
    assert_eq!(program.to_string(), "((-) - 2)");
}

#[test]
fn failed_prefix_still_takes_operators() {
    let (program, errors) = parse("0b2 * 4 + 1");

    assert_eq!(errors.len(), 1);
    assert_eq!(program.to_string(), "(( * 4) + 1)");
}

#[test]
fn unclosed_delimiters() {
    let (program, errors) = parse("(1 + 2");
    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["expected next token to be ), got EOF instead"]
    );
    assert_eq!(errors[0].span.start, 6);
    assert_eq!(errors[0].unclosed, Some(Span::new(0, 1)));
    assert_eq!(program.to_string(), "");

    let (program, errors) = parse("add(1, 2");
    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        ["expected next token to be ), got EOF instead"]
    );
    assert_eq!(errors[0].unclosed, Some(Span::new(3, 4)));
    // the call survives without its arguments
    assert_eq!(program.to_string(), "add()");
}

#[test]
fn other_expectations_have_no_opening_delimiter() {
    let (_, errors) = parse("let x 5;");
    assert_eq!(errors[0].unclosed, None);
}

#[test]
fn bad_arguments_are_all_reported() {
    let (program, errors) = parse("f(*, 2, /)");

    assert_eq!(
        errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
        [
            "no prefix parse function for * found",
            "no prefix parse function for / found",
        ]
    );

    let [Statement::Expression(ExpressionStatement {
        expression: Some(Expression::Call(call)),
        ..
    })] = &program.statements[..]
    else {
        panic!("expected a single call, got {program:?}");
    };
    assert_eq!(call.arguments.len(), 3);
    assert_eq!(call.arguments[0], None);
    assert_eq!(program.to_string(), "f(, 2, )");
}

#[test]
fn invalid_integer_literals() {
    assert_eq!(
        error_messages("99999999999999999999"),
        [r#"could not parse "99999999999999999999" as integer"#]
    );
    assert_eq!(
        error_messages("0b2;"),
        [r#"could not parse "0b2" as integer"#]
    );
}

#[test]
fn illegal_tokens_have_no_prefix_rule() {
    assert_eq!(
        error_messages("1 + @"),
        ["no prefix parse function for ILLEGAL found"]
    );
}

#[test]
fn empty_token_stream() {
    let mut parser = Parser::new(TokenIter::new(vec![]));
    let program = parser.parse_program();

    assert!(parser.errors().is_empty());
    assert!(program.statements.is_empty());
    assert_eq!(program.token_literal(), "");
    assert_eq!(program.to_string(), "");
}

#[test]
fn parses_a_hand_built_token_stream() {
    let tokens = [
        (TokenKind::Int, "1"),
        (TokenKind::Minus, "-"),
        (TokenKind::Int, "2"),
        (TokenKind::Minus, "-"),
        (TokenKind::Int, "3"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (kind, literal))| Token::new(kind, literal, Span::new(i, i + 1)))
    .collect();

    let mut parser = Parser::new(TokenIter::new(tokens));
    let program = parser.parse_program();

    assert!(parser.errors().is_empty());
    assert_eq!(program.to_string(), "((1 - 2) - 3)");
}
