/// How the lexer turns leading-whitespace changes into INDENT/DEDENT tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentMode {
    /// One tracked width; every DEDENT retracts it by [`INDENT_STEP`],
    /// whatever the actual whitespace delta was.
    #[default]
    FixedStep,
    /// Stack of previously opened widths; a dedent closes every level
    /// deeper than the new line.
    Stack,
}

/// Width removed from the tracked indentation by one fixed-step DEDENT.
pub const INDENT_STEP: usize = 4;

/// Width a tab contributes to a line's indentation.
pub const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub indent_mode: IndentMode,
    /// When the first token of a program is `if`, stop after that statement.
    pub leading_if_ends_program: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_mode: IndentMode::FixedStep,
            leading_if_ends_program: true,
        }
    }
}

impl Config {
    pub fn strict() -> Self {
        Self {
            indent_mode: IndentMode::Stack,
            leading_if_ends_program: false,
        }
    }
}
