use std::fmt;

use crate::builtins::BuiltinFunction;

use super::EvalError;

/// Runtime object produced by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Decimal text; parsed to a machine integer only by arithmetic.
    Integer(String),
    String(String),
    Boolean(bool),
    Null,
    Error(EvalError),
    Builtin(BuiltinFunction),
}

impl Value {
    pub fn integer(value: i64) -> Self {
        Value::Integer(value.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::String(_) => "STRING",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::Error(_) => "ERROR",
            Value::Builtin(_) => "BUILTIN",
        }
    }

    /// Human-readable rendering used by `print` and the REPL.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(text) | Value::String(text) => text.clone(),
            Value::Boolean(true) => "true".to_string(),
            Value::Boolean(false) => "false".to_string(),
            Value::Null => "null".to_string(),
            Value::Error(error) => format!("ERROR: {error}"),
            Value::Builtin(_) => "builtin function".to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub(super) fn into_result(self) -> Result<Value, EvalError> {
        match self {
            Value::Error(error) => Err(error),
            value => Ok(value),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.inspect())
    }
}
