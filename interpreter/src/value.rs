use std::fmt::{Display, Formatter};

/// Runtime values are dynamically typed: the store holds whatever the last
/// assignment produced. Integer and decimal literals stay distinct so that
/// integer arithmetic prints without a fractional part.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Num(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Truthiness follows the host-language rules the original evaluator
    /// leaned on: null, false, zero and the empty string are falsey.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(val) => *val,
            Value::Int(val) => *val != 0,
            Value::Num(val) => *val != 0.0 && !val.is_nan(),
            Value::Str(val) => !val.is_empty(),
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Int(val) => Some(*val as f64),
            Value::Num(val) => Some(*val),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(String::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(val) => write!(f, "{}", val),
            Value::Int(val) => write!(f, "{}", val),
            Value::Num(val) => write!(f, "{}", val),
            Value::Bool(val) => write!(f, "{}", val),
            Value::Null => write!(f, "null"),
        }
    }
}

/// What evaluating an expression produces: either a plain value, or a slot,
/// an assignable storage location named after the variable it refers to.
/// Only the assignment operator cares about the distinction; everywhere a
/// value is needed, a slot is coerced to the value it currently stores.
#[derive(Debug, Clone, PartialEq)]
pub enum Eval {
    Value(Value),
    Slot(String),
}

impl Default for Eval {
    fn default() -> Self {
        Eval::Value(Value::Null)
    }
}

impl From<Value> for Eval {
    fn from(value: Value) -> Self {
        Eval::Value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.truthy());
        assert!(!Value::Bool(false).truthy());
        assert!(!Value::Int(0).truthy());
        assert!(!Value::Num(0.0).truthy());
        assert!(!Value::from("").truthy());

        assert!(Value::Bool(true).truthy());
        assert!(Value::Int(-1).truthy());
        assert!(Value::Num(0.5).truthy());
        assert!(Value::from("x").truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(14).to_string(), "14");
        assert_eq!(Value::Num(2.5).to_string(), "2.5");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::Null.to_string(), "null");
    }
}
