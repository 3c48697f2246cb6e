use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::interpreter::{Environment, Interpreter};
use crate::parser::parse_with_config;

pub const PROMPT: &str = ">> ";
pub const CONTINUATION_PROMPT: &str = ".. ";

/// Runs an interactive session until `input` is exhausted.
///
/// One environment lives for the whole session, so bindings made by one entry
/// are visible to the next. An entry whose first line ends in `:` keeps
/// reading continuation lines until an empty one.
pub fn start<R: BufRead, W: Write>(mut input: R, mut output: W, config: &Config) -> Result<()> {
    let mut environment = Environment::new();

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;
        let Some(entry) = read_entry(&mut input, &mut output)? else {
            return Ok(());
        };
        if entry.trim().is_empty() {
            continue;
        }

        match parse_with_config(&entry, config) {
            Err(errors) => writeln!(output, "{errors}")?,
            Ok(program) => {
                let value =
                    Interpreter::with_output(&mut output).evaluate(&program, &mut environment);
                if !value.is_null() {
                    writeln!(output, "{value}")?;
                }
            }
        }
    }
}

fn read_entry<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<String>> {
    let Some(mut entry) = read_line(input)? else {
        return Ok(None);
    };
    if !entry.trim_end().ends_with(':') {
        return Ok(Some(entry));
    }

    loop {
        write!(output, "{CONTINUATION_PROMPT}")?;
        output.flush()?;
        match read_line(input)? {
            Some(line) if !line.trim().is_empty() => {
                entry.push('\n');
                entry.push_str(&line);
            }
            _ => return Ok(Some(entry)),
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("Reading stdin")? == 0 {
        return Ok(None);
    }
    let content_len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(content_len);
    Ok(Some(line))
}
