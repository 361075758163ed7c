use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime value held in constant pools and on the operand stack.
///
/// The set of kinds is closed: every operation that inspects a value matches
/// on all variants, so adding a kind forces each consumer to decide how to
/// handle it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Value {
    /// Signed 64-bit integer (e.g., an integer literal).
    Integer(i64),
    /// Boolean truth value.
    Boolean(bool),
}

impl Value {
    /// Attempt to get the value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(v) => Some(*v),
            Value::Boolean(_) => None,
        }
    }

    /// Whether this value participates in arithmetic.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    /// Short name of the value kind, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "Integer",
            Value::Boolean(_) => "Boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
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
        Value::Boolean(value)
    }
}
