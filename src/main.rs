use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};

use pyinterp::config::{Config, IndentMode};
use pyinterp::{repl, run_source};

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut config = Config::default();
    let mut input_path: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict-indent" => config.indent_mode = IndentMode::Stack,
            "--parse-all" => config.leading_if_ends_program = false,
            option if option.starts_with("--") => bail!("Unknown option '{option}'"),
            _ => {
                input_path = Some(arg);
                if args.next().is_some() {
                    bail!("Only one input file is supported");
                }
                break;
            }
        }
    }

    let Some(path) = input_path else {
        let user = std::env::var("USER").unwrap_or_else(|_| "there".to_string());
        println!("Hello {user}! This is the Python interpreter!");
        println!("Feel free to type in commands");
        return repl::start(io::stdin().lock(), io::stdout().lock(), &config);
    };

    let source = if path == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Reading stdin")?;
        buffer
    } else {
        fs::read_to_string(&path).with_context(|| format!("Reading {path}"))?
    };

    run_source(&source, &config, io::stdout().lock())
}
