use std::fmt;

/// Byte range of a token in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,

    // Identifiers and literals
    Ident,
    Int,
    Float,
    String,

    // Operators
    Assign,   // =
    Plus,     // +
    Minus,    // -
    Asterisk, // *
    Slash,    // /
    Eq,       // ==
    NotEq,    // !=
    Lt,       // <
    Gt,       // >
    LtEq,     // <=
    GtEq,     // >=

    // Delimiters
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]

    // Structural
    Indent,
    Dedent,

    // Keywords
    Def,
    Class,
    If,
    Else,
    Elif,
    For,
    While,
    Return,
    Import,
    From,
    As,
    Try,
    Except,
    Finally,
    With,
    Lambda,
    Pass,
    Break,
    Continue,
    True,
    False,
    None,
}

/// How a token kind is written: a fixed spelling, or the name of a class
/// whose literal varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Spelling {
    Symbol(&'static str),
    Class(&'static str),
}

impl TokenKind {
    fn spelling(self) -> Spelling {
        use Spelling::{Class, Symbol};
        match self {
            Self::Illegal => Class("ILLEGAL"),
            Self::Eof => Class("EOF"),
            Self::Ident => Class("IDENT"),
            Self::Int => Class("INT"),
            Self::Float => Class("FLOAT"),
            Self::String => Class("STRING"),
            Self::Indent => Class("INDENT"),
            Self::Dedent => Class("DEDENT"),
            Self::Assign => Symbol("="),
            Self::Plus => Symbol("+"),
            Self::Minus => Symbol("-"),
            Self::Asterisk => Symbol("*"),
            Self::Slash => Symbol("/"),
            Self::Eq => Symbol("=="),
            Self::NotEq => Symbol("!="),
            Self::Lt => Symbol("<"),
            Self::Gt => Symbol(">"),
            Self::LtEq => Symbol("<="),
            Self::GtEq => Symbol(">="),
            Self::Comma => Symbol(","),
            Self::Colon => Symbol(":"),
            Self::Semicolon => Symbol(";"),
            Self::LParen => Symbol("("),
            Self::RParen => Symbol(")"),
            Self::LBrace => Symbol("{"),
            Self::RBrace => Symbol("}"),
            Self::LBracket => Symbol("["),
            Self::RBracket => Symbol("]"),
            Self::Def => Symbol("def"),
            Self::Class => Symbol("class"),
            Self::If => Symbol("if"),
            Self::Else => Symbol("else"),
            Self::Elif => Symbol("elif"),
            Self::For => Symbol("for"),
            Self::While => Symbol("while"),
            Self::Return => Symbol("return"),
            Self::Import => Symbol("import"),
            Self::From => Symbol("from"),
            Self::As => Symbol("as"),
            Self::Try => Symbol("try"),
            Self::Except => Symbol("except"),
            Self::Finally => Symbol("finally"),
            Self::With => Symbol("with"),
            Self::Lambda => Symbol("lambda"),
            Self::Pass => Symbol("pass"),
            Self::Break => Symbol("break"),
            Self::Continue => Symbol("continue"),
            Self::True => Symbol("True"),
            Self::False => Symbol("False"),
            Self::None => Symbol("None"),
        }
    }

    /// Source spelling of operators, delimiters and keywords.
    ///
    /// Token classes whose literal varies (identifiers, literals) and the
    /// synthetic tokens have no fixed spelling.
    pub fn symbol(self) -> Option<&'static str> {
        match self.spelling() {
            Spelling::Symbol(symbol) => Some(symbol),
            Spelling::Class(_) => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spelling() {
            Spelling::Symbol(symbol) => write!(f, "'{symbol}'"),
            Spelling::Class(name) => f.write_str(name),
        }
    }
}

/// Maps an identifier to its keyword kind, or `Ident` for user names.
pub fn lookup_ident(ident: &str) -> TokenKind {
    match ident {
        "def" => TokenKind::Def,
        "class" => TokenKind::Class,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "elif" => TokenKind::Elif,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "return" => TokenKind::Return,
        "import" => TokenKind::Import,
        "from" => TokenKind::From,
        "as" => TokenKind::As,
        "try" => TokenKind::Try,
        "except" => TokenKind::Except,
        "finally" => TokenKind::Finally,
        "with" => TokenKind::With,
        "lambda" => TokenKind::Lambda,
        "pass" => TokenKind::Pass,
        "break" => TokenKind::Break,
        "continue" => TokenKind::Continue,
        "True" => TokenKind::True,
        "False" => TokenKind::False,
        "None" => TokenKind::None,
        _ => TokenKind::Ident,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub literal: &'a str,
    pub span: Span,
    /// First token on its source line, after any INDENT/DEDENT.
    pub starts_line: bool,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind, literal: &'a str, span: Span) -> Self {
        Self {
            kind,
            literal,
            span,
            starts_line: false,
        }
    }

    /// Zero-width token for INDENT, DEDENT and EOF.
    pub fn synthetic(kind: TokenKind, at: usize) -> Self {
        Self::new(kind, "", Span::empty(at))
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
