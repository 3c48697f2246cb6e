use thiserror::Error;

use crate::ast::InfixOperator;

/// Failure message carried by an Error value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("identifier not found: {name}")]
    IdentifierNotFound { name: String },
    #[error("unknown operator: {left} {operator} {right}")]
    UnknownOperator {
        left: &'static str,
        operator: InfixOperator,
        right: &'static str,
    },
    #[error("unknown operator: {operator}")]
    UnknownIntegerOperator { operator: InfixOperator },
    #[error("invalid integer operation: {left} {operator} {right}")]
    InvalidInteger {
        left: String,
        operator: InfixOperator,
        right: String,
    },
    #[error("integer overflow: {left} {operator} {right}")]
    IntegerOverflow {
        left: String,
        operator: InfixOperator,
        right: String,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("not a function: {kind}")]
    NotAFunction { kind: &'static str },
    #[error("unknown node type: {node}")]
    UnknownNode { node: &'static str },
    #[error("wrong number of arguments to `{function}`: got {found}, want {expected}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("argument to `{function}` not supported, got {kind}")]
    UnsupportedArgument {
        function: &'static str,
        kind: &'static str,
    },
    #[error("failed to write output: {message}")]
    Output { message: String },
}
