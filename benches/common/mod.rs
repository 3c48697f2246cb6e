use std::fs;
use std::path::Path;

use pyinterp::ast::Program;
use pyinterp::parser;

/// Benchmark-enabled fixture cases as `(label, path)` pairs.
pub fn workloads() -> Vec<(String, String)> {
    test_support::bench_workloads(Path::new("tests/programs"))
        .unwrap_or_else(|err| panic!("load bench workloads: {err:#}"))
        .into_iter()
        .map(|(label, path)| (label, path.display().to_string()))
        .collect()
}

pub fn load_source(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|err| panic!("read {path}: {err}"))
}

#[allow(dead_code)]
pub fn load_program(path: &str) -> Program {
    let source = load_source(path);
    parser::parse(&source).unwrap_or_else(|err| panic!("parse {path}: {err}"))
}
