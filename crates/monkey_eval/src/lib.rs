mod eval;
pub mod value;

pub use eval::{eval, Eval};
pub use value::{Value, ValueType, FALSE, TRUE};
