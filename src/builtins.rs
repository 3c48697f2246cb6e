use std::io::Write;

use crate::interpreter::{EvalError, Value};

/// Natively implemented functions.
///
/// The set is fixed at compile time, so the table is immutable and shared by
/// every interpreter. Names resolve here before any variable binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinFunction {
    Print,
    Len,
}

impl BuiltinFunction {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            "len" => Some(Self::Len),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
            Self::Len => "len",
        }
    }

    pub fn call(self, args: &[Value], output: &mut dyn Write) -> Value {
        match self {
            Self::Print => print(args, output),
            Self::Len => len(args),
        }
    }
}

/// Writes each argument's inspect-text on its own line.
fn print(args: &[Value], output: &mut dyn Write) -> Value {
    for arg in args {
        if let Err(error) = writeln!(output, "{}", arg.inspect()) {
            return Value::Error(EvalError::Output {
                message: error.to_string(),
            });
        }
    }
    Value::Null
}

fn len(args: &[Value]) -> Value {
    let [arg] = args else {
        return Value::Error(EvalError::ArgumentCount {
            function: BuiltinFunction::Len.name(),
            expected: 1,
            found: args.len(),
        });
    };
    match arg {
        Value::String(text) => Value::integer(text.chars().count() as i64),
        other => Value::Error(EvalError::UnsupportedArgument {
            function: BuiltinFunction::Len.name(),
            kind: other.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_names_only() {
        assert_eq!(BuiltinFunction::from_name("print"), Some(BuiltinFunction::Print));
        assert_eq!(BuiltinFunction::from_name("len"), Some(BuiltinFunction::Len));
        assert_eq!(BuiltinFunction::from_name("input"), None);
    }

    #[test]
    fn print_writes_one_line_per_argument() {
        let mut output = Vec::new();
        let result = BuiltinFunction::Print.call(
            &[Value::integer(1), Value::String("two".to_string()), Value::Null],
            &mut output,
        );
        assert_eq!(result, Value::Null);
        assert_eq!(String::from_utf8(output).unwrap(), "1\ntwo\nnull\n");
    }

    #[test]
    fn len_counts_characters_and_checks_arguments() {
        let mut sink = std::io::sink();
        assert_eq!(
            BuiltinFunction::Len.call(&[Value::String("héllo".to_string())], &mut sink),
            Value::integer(5)
        );
        assert_eq!(
            BuiltinFunction::Len.call(&[], &mut sink),
            Value::Error(EvalError::ArgumentCount {
                function: "len",
                expected: 1,
                found: 0,
            })
        );
        assert_eq!(
            BuiltinFunction::Len
                .call(&[Value::integer(3)], &mut sink)
                .inspect(),
            "ERROR: argument to `len` not supported, got INTEGER"
        );
    }
}
