
use monkey_frontend::ast::*;

use crate::value::{Boolean as BooleanValue, Value};

/// Reduce `node` to a value. `None` means the node has no evaluable form,
/// which is not an error.
pub fn eval(node: &impl Eval) -> Option<Value> {
    node.eval()
}

/// A node the evaluator can reduce.
pub trait Eval {
    fn eval(&self) -> Option<Value>;
}

impl Eval for Program {
    /// Statements run in order and the program's value is that of the last
    /// one.
    fn eval(&self) -> Option<Value> {
        let mut result = None;
        for statement in &self.statements {
            result = statement.eval();
        }
        result
    }
}

impl Eval for Statement {
    fn eval(&self) -> Option<Value> {
        match self {
            Statement::Expression(stmt) => stmt.expression.as_ref().and_then(Eval::eval),

            // not evaluated yet: the parser doesn't capture their values
            Statement::Let(_) | Statement::Return(_) => None,
        }
    }
}

impl Eval for Expression {
    fn eval(&self) -> Option<Value> {
        match self {
            Expression::Integer(int) => Some(Value::Integer(int.value)),
            Expression::Boolean(b) => Some(Value::Boolean(BooleanValue::from_bool(b.value))),

            // TODO: bindings, operators and calls need an environment and
            // an error value first
            Expression::Identifier(_)
            | Expression::Prefix(_)
            | Expression::Infix(_)
            | Expression::Call(_) => None,
        }
    }
}
