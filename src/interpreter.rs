use std::io::{self, Stdout, Write};

use crate::ast::{Expression, InfixOperator, Program, Statement};
use crate::builtins::BuiltinFunction;

mod environment;
mod error;
mod value;

pub use environment::Environment;
pub use error::EvalError;
pub use value::Value;

type EvalResult = Result<Value, EvalError>;

/// Any syntax tree node the interpreter can evaluate.
#[derive(Debug, Clone, Copy)]
pub enum Node<'n> {
    Program(&'n Program),
    Statement(&'n Statement),
    Expression(&'n Expression),
}

impl<'n> From<&'n Program> for Node<'n> {
    fn from(program: &'n Program) -> Self {
        Node::Program(program)
    }
}

impl<'n> From<&'n Statement> for Node<'n> {
    fn from(statement: &'n Statement) -> Self {
        Node::Statement(statement)
    }
}

impl<'n> From<&'n Expression> for Node<'n> {
    fn from(expression: &'n Expression) -> Self {
        Node::Expression(expression)
    }
}

/// Tree-walking evaluator. Builtins that produce output write to `W`.
pub struct Interpreter<W> {
    output: W,
}

impl Interpreter<Stdout> {
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    pub fn with_output(output: W) -> Self {
        Self { output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Evaluates `node` against `environment`.
    ///
    /// Never fails: the first error raised anywhere in the tree stops
    /// evaluation and comes back as [`Value::Error`].
    pub fn evaluate<'n>(
        &mut self,
        node: impl Into<Node<'n>>,
        environment: &mut Environment<'_>,
    ) -> Value {
        let result = match node.into() {
            Node::Program(program) => self.eval_program(program, environment),
            Node::Statement(statement) => self.eval_statement(statement, environment),
            Node::Expression(expression) => self.eval_expression(expression, environment),
        };
        result.unwrap_or_else(Value::Error)
    }

    fn eval_program(&mut self, program: &Program, environment: &mut Environment<'_>) -> EvalResult {
        let mut result = Value::Null;
        for statement in &program.statements {
            result = self.eval_statement(statement, environment)?;
        }
        Ok(result)
    }

    fn eval_statement(
        &mut self,
        statement: &Statement,
        environment: &mut Environment<'_>,
    ) -> EvalResult {
        match statement {
            Statement::Expr(expression) => self.eval_expression(expression, environment),
            Statement::Assign { targets, value } => {
                let value = self.eval_expression(value, environment)?;
                for target in targets {
                    environment.set(target.as_str(), value.clone());
                }
                Ok(value)
            }
            Statement::FunctionDef { .. } => Err(EvalError::UnknownNode {
                node: "function definition",
            }),
            Statement::If { .. } => Err(EvalError::UnknownNode {
                node: "if statement",
            }),
            Statement::Return(_) => Err(EvalError::UnknownNode {
                node: "return statement",
            }),
        }
    }

    fn eval_expression(
        &mut self,
        expression: &Expression,
        environment: &mut Environment<'_>,
    ) -> EvalResult {
        match expression {
            Expression::Integer(text) => Ok(Value::Integer(text.clone())),
            Expression::String(text) => Ok(Value::String(text.clone())),
            Expression::Float(_) => Err(EvalError::UnknownNode {
                node: "float literal",
            }),
            Expression::Identifier(name) => eval_identifier(name, environment),
            Expression::Infix { left, op, right } => {
                let left = self.eval_expression(left, environment)?;
                let right = self.eval_expression(right, environment)?;
                eval_infix(*op, &left, &right)
            }
            Expression::Call { callee, args } => self.eval_call(callee, args, environment),
        }
    }

    fn eval_call(
        &mut self,
        callee: &Expression,
        args: &[Expression],
        environment: &mut Environment<'_>,
    ) -> EvalResult {
        let callee = self.eval_expression(callee, environment)?;
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expression(arg, environment)?);
        }
        match callee {
            Value::Builtin(function) => function.call(&values, &mut self.output).into_result(),
            other => Err(EvalError::NotAFunction {
                kind: other.type_name(),
            }),
        }
    }
}

/// Evaluates `node` with builtin output going to stdout.
pub fn evaluate<'n>(node: impl Into<Node<'n>>, environment: &mut Environment<'_>) -> Value {
    Interpreter::new().evaluate(node, environment)
}

fn eval_identifier(name: &str, environment: &Environment<'_>) -> EvalResult {
    if let Some(function) = BuiltinFunction::from_name(name) {
        return Ok(Value::Builtin(function));
    }
    environment
        .get(name)
        .cloned()
        .ok_or_else(|| EvalError::IdentifierNotFound {
            name: name.to_string(),
        })
}

fn eval_infix(operator: InfixOperator, left: &Value, right: &Value) -> EvalResult {
    match (left, right) {
        (Value::Integer(left), Value::Integer(right)) => {
            eval_integer_infix(operator, left, right)
        }
        (Value::String(left), Value::String(right)) if operator == InfixOperator::Add => {
            Ok(Value::String(format!("{left}{right}")))
        }
        _ => Err(EvalError::UnknownOperator {
            left: left.type_name(),
            operator,
            right: right.type_name(),
        }),
    }
}

fn eval_integer_infix(operator: InfixOperator, left: &str, right: &str) -> EvalResult {
    let (Ok(lhs), Ok(rhs)) = (left.parse::<i64>(), right.parse::<i64>()) else {
        return Err(EvalError::InvalidInteger {
            left: left.to_string(),
            operator,
            right: right.to_string(),
        });
    };
    let result = match operator {
        InfixOperator::Add => lhs.checked_add(rhs),
        InfixOperator::Sub => lhs.checked_sub(rhs),
        InfixOperator::Mul => lhs.checked_mul(rhs),
        InfixOperator::Div if rhs == 0 => return Err(EvalError::DivisionByZero),
        InfixOperator::Div => lhs.checked_div(rhs),
        _ => return Err(EvalError::UnknownIntegerOperator { operator }),
    };
    result.map(Value::integer).ok_or_else(|| EvalError::IntegerOverflow {
        left: left.to_string(),
        operator,
        right: right.to_string(),
    })
}
