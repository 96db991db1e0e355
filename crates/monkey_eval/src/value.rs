use std::fmt;

/// The only two boolean values. Evaluation hands out references to these
/// rather than building new ones.
pub static TRUE: Boolean = Boolean { value: true };
pub static FALSE: Boolean = Boolean { value: false };

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Boolean {
    pub value: bool,
}

impl Boolean {
    pub fn from_bool(value: bool) -> &'static Self {
        if value {
            &TRUE
        } else {
            &FALSE
        }
    }
}

/// A runtime value. Values are never mutated once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Value {
    Integer(i64),
    Boolean(&'static Boolean),
}

impl Value {
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Boolean(_) => ValueType::Boolean,
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(Boolean::from_bool(value))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Boolean(b) => write!(f, "{}", b.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Integer,
    Boolean,
}

impl ValueType {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::Integer => "INTEGER",
            ValueType::Boolean => "BOOLEAN",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
