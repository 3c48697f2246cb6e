use std::io::Write;

use anyhow::Result;

pub mod ast;
pub mod builtins;
pub mod config;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod token;

use config::Config;
use interpreter::{Environment, Interpreter, Value};

/// Parses and evaluates a whole program in a fresh environment.
///
/// Builtin output goes to `output` as it is produced. Parser errors and an
/// Error result both come back as `Err`.
pub fn run_source<W: Write>(source: &str, config: &Config, output: W) -> Result<()> {
    let program = parser::parse_with_config(source, config)?;
    let mut environment = Environment::new();
    match Interpreter::with_output(output).evaluate(&program, &mut environment) {
        Value::Error(error) => Err(error.into()),
        _ => Ok(()),
    }
}
