//! Runtime values of the invariant expression language

use std::fmt;
use tenet_core::StructureValue;

/// A value produced by evaluating an expression
///
/// Equality is structural and never coerces across variants:
/// `Int(1) != Bool(true)` and `Str("1") != Int(1)`. `Null` equals only
/// `Null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Absence, and the result of any unresolvable context access
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// UTF-8 string
    Str(String),
}

impl Value {
    /// Truthiness: only `Bool(true)` is truthy
    ///
    /// Everything else, including `Int(1)` and non-empty strings, is
    /// falsy. Logical operators and final invariant verdicts both use
    /// this rule.
    pub fn is_truthy(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// Get the variant name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Str(_) => "Str",
        }
    }
}

impl From<&StructureValue> for Value {
    fn from(v: &StructureValue) -> Self {
        match v {
            StructureValue::Null => Value::Null,
            StructureValue::Bool(b) => Value::Bool(*b),
            StructureValue::Int(i) => Value::Int(*i),
            StructureValue::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Str(s) => write!(f, "'{s}'"),
        }
    }
}
