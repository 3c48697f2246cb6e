use std::{iter::Peekable, str::CharIndices};

use crate::config::{INDENT_STEP, IndentMode, TAB_WIDTH};
use crate::token::{Span, Token, TokenKind, lookup_ident};

/// Indentation-aware tokenizer.
///
/// There is no NEWLINE token: a newline only triggers the indentation check
/// for the following line, which may yield one INDENT or DEDENT. Lexical
/// problems never stop the stream; they come out as ILLEGAL tokens.
pub struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    mode: IndentMode,
    current_indent: usize,
    indent_stack: Vec<usize>,
    pending_tokens: Vec<Token<'a>>,
    at_line_start: bool,
    eof_emitted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_mode(input, IndentMode::default())
    }

    pub fn with_mode(input: &'a str, mode: IndentMode) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            mode,
            current_indent: 0,
            indent_stack: vec![0],
            pending_tokens: Vec::new(),
            at_line_start: true,
            eof_emitted: false,
        }
    }

    /// Returns the next token. Once the input and any pending DEDENTs are
    /// exhausted, every call returns EOF.
    ///
    /// The first non-structural token after a newline has `starts_line` set.
    pub fn next_token(&mut self) -> Token<'a> {
        let mut token = self.scan_token();
        if !matches!(token.kind, TokenKind::Indent | TokenKind::Dedent) {
            token.starts_line = std::mem::take(&mut self.at_line_start);
        }
        token
    }

    fn scan_token(&mut self) -> Token<'a> {
        if let Some(token) = self.pending_tokens.pop() {
            return token;
        }

        loop {
            self.skip_whitespace();
            if !matches!(self.chars.peek(), Some(&(_, '\n'))) {
                break;
            }
            self.advance_char();
            self.at_line_start = true;
            if let Some(token) = self.handle_indentation() {
                return token;
            }
        }

        let Some(&(start, ch)) = self.chars.peek() else {
            return self.end_of_input();
        };

        match ch {
            '=' => self.one_or_two(start, TokenKind::Assign, '=', TokenKind::Eq),
            '!' => self.one_or_two(start, TokenKind::Illegal, '=', TokenKind::NotEq),
            '<' => self.one_or_two(start, TokenKind::Lt, '=', TokenKind::LtEq),
            '>' => self.one_or_two(start, TokenKind::Gt, '=', TokenKind::GtEq),
            '+' => self.single(start, TokenKind::Plus),
            '-' => self.single(start, TokenKind::Minus),
            '*' => self.single(start, TokenKind::Asterisk),
            '/' => self.single(start, TokenKind::Slash),
            ',' => self.single(start, TokenKind::Comma),
            ':' => self.single(start, TokenKind::Colon),
            ';' => self.single(start, TokenKind::Semicolon),
            '(' => self.single(start, TokenKind::LParen),
            ')' => self.single(start, TokenKind::RParen),
            '{' => self.single(start, TokenKind::LBrace),
            '}' => self.single(start, TokenKind::RBrace),
            '[' => self.single(start, TokenKind::LBracket),
            ']' => self.single(start, TokenKind::RBracket),
            '"' | '\'' => self.read_string(start, ch),
            c if is_letter(c) => self.read_identifier(start),
            c if c.is_ascii_digit() => self.read_number(start),
            _ => self.single(start, TokenKind::Illegal),
        }
    }

    fn handle_indentation(&mut self) -> Option<Token<'a>> {
        let width = self.measure_indentation()?;
        let at = self.current_index();
        match self.mode {
            IndentMode::FixedStep => {
                if width > self.current_indent {
                    self.current_indent = width;
                    Some(Token::synthetic(TokenKind::Indent, at))
                } else if width < self.current_indent {
                    self.current_indent = self.current_indent.saturating_sub(INDENT_STEP);
                    Some(Token::synthetic(TokenKind::Dedent, at))
                } else {
                    None
                }
            }
            IndentMode::Stack => self.handle_stack_indentation(width, at),
        }
    }

    fn handle_stack_indentation(&mut self, width: usize, at: usize) -> Option<Token<'a>> {
        let top = self.stack_top();
        if width > top {
            self.indent_stack.push(width);
            return Some(Token::synthetic(TokenKind::Indent, at));
        }
        if width == top {
            return None;
        }

        let mut dedents = 0;
        while self.indent_stack.len() > 1 && self.stack_top() > width {
            self.indent_stack.pop();
            dedents += 1;
        }
        // pending tokens pop from the back, so the ILLEGAL marker goes in first
        if self.stack_top() != width {
            self.pending_tokens
                .push(Token::synthetic(TokenKind::Illegal, at));
        }
        for _ in 1..dedents {
            self.pending_tokens
                .push(Token::synthetic(TokenKind::Dedent, at));
        }
        Some(Token::synthetic(TokenKind::Dedent, at))
    }

    /// Width of the next non-blank line, or `None` when only whitespace
    /// remains. Blank lines are consumed.
    fn measure_indentation(&mut self) -> Option<usize> {
        loop {
            let mut width = 0;
            while let Some(&(_, c)) = self.chars.peek() {
                match c {
                    ' ' => width += 1,
                    '\t' => width += TAB_WIDTH,
                    '\r' => {}
                    _ => break,
                }
                self.advance_char();
            }
            match self.chars.peek() {
                Some(&(_, '\n')) => {
                    self.advance_char();
                }
                Some(_) => return Some(width),
                None => return None,
            }
        }
    }

    fn end_of_input(&mut self) -> Token<'a> {
        let at = self.input.len();
        match self.mode {
            IndentMode::FixedStep if self.current_indent > 0 => {
                self.current_indent = self.current_indent.saturating_sub(INDENT_STEP);
                Token::synthetic(TokenKind::Dedent, at)
            }
            IndentMode::Stack if self.indent_stack.len() > 1 => {
                self.indent_stack.pop();
                Token::synthetic(TokenKind::Dedent, at)
            }
            _ => Token::synthetic(TokenKind::Eof, at),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if matches!(c, ' ' | '\t' | '\r') {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn single(&mut self, start: usize, kind: TokenKind) -> Token<'a> {
        self.advance_char();
        self.token_from(start, kind)
    }

    fn one_or_two(
        &mut self,
        start: usize,
        single: TokenKind,
        second: char,
        double: TokenKind,
    ) -> Token<'a> {
        self.advance_char();
        if matches!(self.chars.peek(), Some(&(_, c)) if c == second) {
            self.advance_char();
            return self.token_from(start, double);
        }
        self.token_from(start, single)
    }

    fn read_identifier(&mut self, start: usize) -> Token<'a> {
        while let Some(&(_, c)) = self.chars.peek() {
            if is_letter(c) {
                self.advance_char();
            } else {
                break;
            }
        }
        let end = self.current_index();
        let ident = &self.input[start..end];
        Token::new(lookup_ident(ident), ident, Span { start, end })
    }

    fn read_number(&mut self, start: usize) -> Token<'a> {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                self.advance_char();
            } else {
                break;
            }
        }
        let end = self.current_index();
        let text = &self.input[start..end];
        // several dots still lex as INT; arithmetic rejects the text later
        let kind = if text.matches('.').count() == 1 {
            TokenKind::Float
        } else {
            TokenKind::Int
        };
        Token::new(kind, text, Span { start, end })
    }

    fn read_string(&mut self, start: usize, quote: char) -> Token<'a> {
        self.advance_char(); // Consume opening quote
        let content_start = start + quote.len_utf8();
        while let Some(&(idx, c)) = self.chars.peek() {
            self.advance_char();
            if c == quote {
                return Token::new(
                    TokenKind::String,
                    &self.input[content_start..idx],
                    Span {
                        start,
                        end: idx + quote.len_utf8(),
                    },
                );
            }
        }
        // Unterminated: the literal runs to the end of input.
        Token::new(
            TokenKind::String,
            &self.input[content_start..],
            Span {
                start,
                end: self.input.len(),
            },
        )
    }

    fn token_from(&mut self, start: usize, kind: TokenKind) -> Token<'a> {
        let end = self.current_index();
        Token::new(kind, &self.input[start..end], Span { start, end })
    }

    fn stack_top(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn advance_char(&mut self) -> Option<(usize, char)> {
        self.chars.next()
    }

    fn current_index(&mut self) -> usize {
        self.chars
            .peek()
            .map(|(idx, _)| *idx)
            .unwrap_or(self.input.len())
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    /// Yields tokens up to and including the first EOF.
    fn next(&mut self) -> Option<Self::Item> {
        if self.eof_emitted {
            return None;
        }
        let token = self.next_token();
        self.eof_emitted = token.is(TokenKind::Eof);
        Some(token)
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    tokenize_with_mode(input, IndentMode::default())
}

pub fn tokenize_with_mode(input: &str, mode: IndentMode) -> Vec<Token<'_>> {
    Lexer::with_mode(input, mode).collect()
}
