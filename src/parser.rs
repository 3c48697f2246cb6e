use thiserror::Error;

use crate::ast::{Expression, InfixOperator, Program, Statement};
use crate::config::Config;
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected {expected}, got {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },
    #[error("expected expression, got {found}")]
    ExpectedExpression { found: TokenKind },
    #[error("failed to parse condition after {keyword}")]
    MissingCondition { keyword: TokenKind },
}

/// Every error recorded while parsing one source, in order.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Parser errors:{}", render_lines(.0))]
pub struct ParseErrors(pub Vec<ParseError>);

fn render_lines(errors: &[ParseError]) -> String {
    errors.iter().map(|error| format!("\n\t{error}")).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Equals,      // == !=
    LessGreater, // < > <= >=
    Sum,         // + -
    Product,     // * /
    Call,        // callee(...)
}

fn precedence_of(kind: TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::NotEq => Precedence::Equals,
        TokenKind::Lt | TokenKind::Gt | TokenKind::LtEq | TokenKind::GtEq => {
            Precedence::LessGreater
        }
        TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
        TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
        TokenKind::LParen => Precedence::Call,
        _ => Precedence::Lowest,
    }
}

fn infix_operator(kind: TokenKind) -> Option<InfixOperator> {
    let op = match kind {
        TokenKind::Plus => InfixOperator::Add,
        TokenKind::Minus => InfixOperator::Sub,
        TokenKind::Asterisk => InfixOperator::Mul,
        TokenKind::Slash => InfixOperator::Div,
        TokenKind::Eq => InfixOperator::Equal,
        TokenKind::NotEq => InfixOperator::NotEqual,
        TokenKind::Lt => InfixOperator::Less,
        TokenKind::Gt => InfixOperator::Greater,
        TokenKind::LtEq => InfixOperator::LessEqual,
        TokenKind::GtEq => InfixOperator::GreaterEqual,
        _ => return None,
    };
    Some(op)
}

fn starts_expression(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::String
            | TokenKind::LParen
    )
}

/// Recursive-descent statement parser with precedence climbing for
/// expressions.
///
/// Every parse routine leaves `current` on the last token of the construct
/// it consumed; statement loops advance once per iteration, which also steps
/// over the offending token after a failed construct.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token<'a>,
    peek: Token<'a>,
    errors: Vec<ParseError>,
    leading_if_ends_program: bool,
}

impl<'a> Parser<'a> {
    pub fn new(mut lexer: Lexer<'a>) -> Self {
        let current = lexer.next_token();
        let peek = lexer.next_token();
        Self {
            lexer,
            current,
            peek,
            errors: Vec::new(),
            leading_if_ends_program: Config::default().leading_if_ends_program,
        }
    }

    pub fn with_config(input: &'a str, config: &Config) -> Self {
        let mut parser = Self::new(Lexer::with_mode(input, config.indent_mode));
        parser.leading_if_ends_program = config.leading_if_ends_program;
        parser
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();

        if self.leading_if_ends_program && self.current.is(TokenKind::If) {
            if let Some(statement) = self.parse_if_statement() {
                program.statements.push(statement);
            }
            return program;
        }

        while !self.current.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                program.statements.push(statement);
            }
            self.advance();
        }
        program
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        match self.current.kind {
            TokenKind::Def => self.parse_function_def(),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Ident if self.peek.is(TokenKind::Assign) => self.parse_assignment(),
            // Block boundaries already handled by a caller.
            TokenKind::Indent | TokenKind::Dedent | TokenKind::Colon | TokenKind::Eof => None,
            _ => self.parse_expression(Precedence::Lowest).map(Statement::Expr),
        }
    }

    fn parse_function_def(&mut self) -> Option<Statement> {
        self.expect_peek(TokenKind::Ident)?;
        let name = self.current.literal.to_string();
        self.expect_peek(TokenKind::LParen)?;
        let params = self.parse_parameters()?;
        self.expect_peek(TokenKind::Colon)?;
        self.advance();
        let body = self.parse_block();
        Some(Statement::FunctionDef { name, params, body })
    }

    fn parse_parameters(&mut self) -> Option<Vec<String>> {
        let mut params = Vec::new();
        if self.peek.is(TokenKind::RParen) {
            self.advance();
            return Some(params);
        }

        self.expect_peek(TokenKind::Ident)?;
        params.push(self.current.literal.to_string());
        while self.peek.is(TokenKind::Comma) {
            self.advance();
            self.expect_peek(TokenKind::Ident)?;
            params.push(self.current.literal.to_string());
        }
        self.expect_peek(TokenKind::RParen)?;
        Some(params)
    }

    /// Statements between an INDENT (the current token) and its DEDENT.
    ///
    /// Without a leading INDENT an error is recorded and nothing is consumed.
    fn parse_block(&mut self) -> Vec<Statement> {
        let mut block = Vec::new();
        if !self.current.is(TokenKind::Indent) {
            self.errors.push(ParseError::UnexpectedToken {
                expected: TokenKind::Indent,
                found: self.current.kind,
            });
            return block;
        }

        self.advance();
        while !self.current.is(TokenKind::Dedent) && !self.current.is(TokenKind::Eof) {
            if let Some(statement) = self.parse_statement() {
                block.push(statement);
            }
            self.advance();
        }
        block
    }

    /// Parses from an `if` or `elif` keyword through its optional branches.
    fn parse_if_statement(&mut self) -> Option<Statement> {
        let keyword = self.current.kind;
        self.advance();
        let Some(condition) = self.parse_expression(Precedence::Lowest) else {
            self.errors.push(ParseError::MissingCondition { keyword });
            return None;
        };
        self.expect_peek(TokenKind::Colon)?;
        self.advance();
        let consequence = self.parse_block();

        let alternative = if self.peek.is(TokenKind::Else) {
            self.advance();
            self.expect_peek(TokenKind::Colon)?;
            self.advance();
            Some(self.parse_block())
        } else if self.peek.is(TokenKind::Elif) {
            self.advance();
            Some(vec![self.parse_if_statement()?])
        } else {
            None
        };

        Some(Statement::If {
            condition,
            consequence,
            alternative,
        })
    }

    fn parse_return(&mut self) -> Option<Statement> {
        if !starts_expression(self.peek.kind) {
            return Some(Statement::Return(None));
        }
        self.advance();
        let value = self.parse_expression(Precedence::Lowest)?;
        Some(Statement::Return(Some(value)))
    }

    fn parse_assignment(&mut self) -> Option<Statement> {
        let (targets, value) = self.parse_assignment_chain()?;
        Some(Statement::Assign { targets, value })
    }

    fn parse_assignment_chain(&mut self) -> Option<(Vec<String>, Expression)> {
        let target = self.current.literal.to_string();
        self.expect_peek(TokenKind::Assign)?;
        self.advance();

        if self.current.is(TokenKind::Ident) && self.peek.is(TokenKind::Assign) {
            let (mut targets, value) = self.parse_assignment_chain()?;
            targets.insert(0, target);
            return Some((targets, value));
        }

        let value = self.parse_expression(Precedence::Lowest)?;
        Some((vec![target], value))
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_primary()?;
        while precedence < self.peek_precedence() {
            self.advance();
            left = if self.current.is(TokenKind::LParen) {
                self.parse_call(left)?
            } else {
                self.parse_infix(left)?
            };
        }
        Some(left)
    }

    fn parse_primary(&mut self) -> Option<Expression> {
        let literal = self.current.literal.to_string();
        let expression = match self.current.kind {
            TokenKind::Ident => Expression::Identifier(literal),
            TokenKind::Int => Expression::Integer(literal),
            TokenKind::Float => Expression::Float(literal),
            TokenKind::String => Expression::String(literal),
            TokenKind::LParen => return self.parse_grouped(),
            found => {
                self.errors.push(ParseError::ExpectedExpression { found });
                return None;
            }
        };
        Some(expression)
    }

    fn parse_grouped(&mut self) -> Option<Expression> {
        self.advance(); // Skip '('
        let expression = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RParen)?;
        Some(expression)
    }

    fn parse_infix(&mut self, left: Expression) -> Option<Expression> {
        let op = infix_operator(self.current.kind)?;
        let precedence = precedence_of(self.current.kind);
        self.advance();
        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn parse_call(&mut self, callee: Expression) -> Option<Expression> {
        let args = self.parse_call_arguments()?;
        Some(Expression::Call {
            callee: Box::new(callee),
            args,
        })
    }

    fn parse_call_arguments(&mut self) -> Option<Vec<Expression>> {
        let mut args = Vec::new();
        if self.peek.is(TokenKind::RParen) {
            self.advance();
            return Some(args);
        }

        self.advance();
        args.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek.is(TokenKind::Comma) {
            self.advance();
            self.advance();
            args.push(self.parse_expression(Precedence::Lowest)?);
        }
        self.expect_peek(TokenKind::RParen)?;
        Some(args)
    }

    /// A `(` opening a new line starts a statement, not a call.
    fn peek_precedence(&self) -> Precedence {
        if self.peek.is(TokenKind::LParen) && self.peek.starts_line {
            return Precedence::Lowest;
        }
        precedence_of(self.peek.kind)
    }

    /// Advances onto the peek token if it has the expected kind; otherwise
    /// records an error and leaves the position unchanged.
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek.is(kind) {
            self.advance();
            Some(())
        } else {
            self.errors.push(ParseError::UnexpectedToken {
                expected: kind,
                found: self.peek.kind,
            });
            None
        }
    }

    fn advance(&mut self) {
        let next = self.lexer.next_token();
        self.current = std::mem::replace(&mut self.peek, next);
    }
}

pub fn parse(input: &str) -> Result<Program, ParseErrors> {
    parse_with_config(input, &Config::default())
}

pub fn parse_with_config(input: &str, config: &Config) -> Result<Program, ParseErrors> {
    let mut parser = Parser::with_config(input, config);
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(ParseErrors(parser.errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn identifier(name: &str) -> Expression {
        Expression::Identifier(name.to_string())
    }

    fn int(text: &str) -> Expression {
        Expression::Integer(text.to_string())
    }

    fn string(text: &str) -> Expression {
        Expression::String(text.to_string())
    }

    fn infix(left: Expression, op: InfixOperator, right: Expression) -> Expression {
        Expression::Infix {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    fn call(name: &str, args: Vec<Expression>) -> Expression {
        Expression::Call {
            callee: Box::new(identifier(name)),
            args,
        }
    }

    fn parse_ok(input: &str) -> Vec<Statement> {
        parse(input).expect("parse failed").statements
    }

    fn parse_errors(input: &str, config: &Config) -> (Program, Vec<String>) {
        let mut parser = Parser::with_config(input, config);
        let program = parser.parse_program();
        (program, parser.error_messages())
    }

    #[test]
    fn parses_integer_literal_statement() {
        assert_eq!(parse_ok("5"), vec![Statement::Expr(int("5"))]);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            parse_ok("5 + 3 * 2"),
            vec![Statement::Expr(infix(
                int("5"),
                InfixOperator::Add,
                infix(int("3"), InfixOperator::Mul, int("2")),
            ))]
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            parse_ok("(5 + 3) * 2"),
            vec![Statement::Expr(infix(
                infix(int("5"), InfixOperator::Add, int("3")),
                InfixOperator::Mul,
                int("2"),
            ))]
        );
    }

    #[test]
    fn same_level_operators_associate_left() {
        assert_eq!(
            parse_ok("1 - 2 - 3"),
            vec![Statement::Expr(infix(
                infix(int("1"), InfixOperator::Sub, int("2")),
                InfixOperator::Sub,
                int("3"),
            ))]
        );
        assert_eq!(
            parse_ok("8 / 4 * 2"),
            vec![Statement::Expr(infix(
                infix(int("8"), InfixOperator::Div, int("4")),
                InfixOperator::Mul,
                int("2"),
            ))]
        );
    }

    #[test]
    fn equality_binds_loosest_then_relational() {
        assert_eq!(
            parse_ok("a + 1 == b < c * 2"),
            vec![Statement::Expr(infix(
                infix(identifier("a"), InfixOperator::Add, int("1")),
                InfixOperator::Equal,
                infix(
                    identifier("b"),
                    InfixOperator::Less,
                    infix(identifier("c"), InfixOperator::Mul, int("2")),
                ),
            ))]
        );
    }

    #[test]
    fn parses_function_definition_with_parameters() {
        let input = "def add(x, y):\n    return x + y";
        assert_eq!(
            parse_ok(input),
            vec![Statement::FunctionDef {
                name: "add".to_string(),
                params: vec!["x".to_string(), "y".to_string()],
                body: vec![Statement::Return(Some(infix(
                    identifier("x"),
                    InfixOperator::Add,
                    identifier("y"),
                )))],
            }]
        );
    }

    #[test]
    fn parses_simple_program() {
        let input = indoc! {"
            def fn():
                n = 4 + 4
                print(n)
            fn()
        "};
        let expected = vec![
            Statement::FunctionDef {
                name: "fn".to_string(),
                params: vec![],
                body: vec![
                    Statement::Assign {
                        targets: vec!["n".to_string()],
                        value: infix(int("4"), InfixOperator::Add, int("4")),
                    },
                    Statement::Expr(call("print", vec![identifier("n")])),
                ],
            },
            Statement::Expr(call("fn", vec![])),
        ];
        assert_eq!(parse_ok(input), expected);
    }

    #[test]
    fn parses_return_with_and_without_value() {
        assert_eq!(
            parse_ok("return 42"),
            vec![Statement::Return(Some(int("42")))]
        );
        assert_eq!(
            parse_ok("def f():\n    return\n"),
            vec![Statement::FunctionDef {
                name: "f".to_string(),
                params: vec![],
                body: vec![Statement::Return(None)],
            }]
        );
    }

    #[test]
    fn parses_assignment_and_chains() {
        assert_eq!(
            parse_ok("x = 42"),
            vec![Statement::Assign {
                targets: vec!["x".to_string()],
                value: int("42"),
            }]
        );
        assert_eq!(
            parse_ok("a = b = 5"),
            vec![Statement::Assign {
                targets: vec!["a".to_string(), "b".to_string()],
                value: int("5"),
            }]
        );
    }

    #[test]
    fn parses_calls_with_arguments_and_chained_calls() {
        assert_eq!(
            parse_ok(r#"print("a", 1 + 2)"#),
            vec![Statement::Expr(call(
                "print",
                vec![string("a"), infix(int("1"), InfixOperator::Add, int("2"))],
            ))]
        );
        assert_eq!(
            parse_ok("f(1)(2)"),
            vec![Statement::Expr(Expression::Call {
                callee: Box::new(call("f", vec![int("1")])),
                args: vec![int("2")],
            })]
        );
    }

    #[test]
    fn parenthesis_on_a_new_line_starts_a_statement() {
        assert_eq!(
            parse_ok("x = 2\n(5 + 3) * x"),
            vec![
                Statement::Assign {
                    targets: vec!["x".to_string()],
                    value: int("2"),
                },
                Statement::Expr(infix(
                    infix(int("5"), InfixOperator::Add, int("3")),
                    InfixOperator::Mul,
                    identifier("x"),
                )),
            ]
        );
        assert_eq!(
            parse_ok("print('a')\n(1 + 2)"),
            vec![
                Statement::Expr(call("print", vec![string("a")])),
                Statement::Expr(infix(int("1"), InfixOperator::Add, int("2"))),
            ]
        );
    }

    #[test]
    fn call_arguments_may_not_start_on_a_new_line() {
        let (program, errors) = parse_errors("f\n(1)", &Config::default());
        assert_eq!(
            program.statements,
            vec![Statement::Expr(identifier("f")), Statement::Expr(int("1"))]
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn parses_if_else_into_two_blocks() {
        let input = "if x > 10:\n    print(\"big\")\nelse:\n    print(\"small\")";
        assert_eq!(
            parse_ok(input),
            vec![Statement::If {
                condition: infix(identifier("x"), InfixOperator::Greater, int("10")),
                consequence: vec![Statement::Expr(call("print", vec![string("big")]))],
                alternative: Some(vec![Statement::Expr(call(
                    "print",
                    vec![string("small")],
                ))]),
            }]
        );
    }

    #[test]
    fn elif_nests_an_if_in_the_alternative() {
        let input = indoc! {"
            if a:
                x
            elif b:
                y
            else:
                z
        "};
        assert_eq!(
            parse_ok(input),
            vec![Statement::If {
                condition: identifier("a"),
                consequence: vec![Statement::Expr(identifier("x"))],
                alternative: Some(vec![Statement::If {
                    condition: identifier("b"),
                    consequence: vec![Statement::Expr(identifier("y"))],
                    alternative: Some(vec![Statement::Expr(identifier("z"))]),
                }]),
            }]
        );
    }

    #[test]
    fn leading_if_ends_the_program_by_default() {
        let input = "if a:\n    b\nc";
        assert_eq!(parse_ok(input).len(), 1);

        let config = Config {
            leading_if_ends_program: false,
            ..Config::default()
        };
        let program = parse_with_config(input, &config).expect("parse failed");
        assert_eq!(
            program.statements[1],
            Statement::Expr(identifier("c"))
        );
    }

    #[test]
    fn reports_missing_paren_and_keeps_parsing_later_statements() {
        let (program, errors) = parse_errors("def f(x:\n    return x", &Config::default());
        assert_eq!(errors, vec!["expected ')', got ':'"]);
        assert_eq!(
            program.statements,
            vec![Statement::Return(Some(identifier("x")))]
        );
    }

    #[test]
    fn reports_bad_definition_header_tokens() {
        let (_, errors) = parse_errors("def (x):\n    x", &Config::default());
        assert_eq!(errors[0], "expected IDENT, got '('");

        let (_, errors) = parse_errors("def f x):\n    x", &Config::default());
        assert_eq!(errors[0], "expected '(', got IDENT");
    }

    #[test]
    fn missing_block_records_error_and_still_terminates() {
        let (program, errors) = parse_errors("def f():\nreturn 1", &Config::default());
        assert_eq!(errors, vec!["expected INDENT, got 'return'"]);
        assert_eq!(
            program.statements,
            vec![
                Statement::FunctionDef {
                    name: "f".to_string(),
                    params: vec![],
                    body: vec![],
                },
                Statement::Expr(int("1")),
            ]
        );
    }

    #[test]
    fn reports_unparseable_if_condition() {
        let (program, errors) = parse_errors("if :\n    x", &Config::default());
        assert!(program.statements.is_empty());
        assert_eq!(
            errors,
            vec![
                "expected expression, got ':'",
                "failed to parse condition after 'if'",
            ]
        );
    }

    #[test]
    fn illegal_token_becomes_parse_error() {
        let (program, errors) = parse_errors("x = 1 @ 2", &Config::default());
        assert_eq!(errors, vec!["expected expression, got ILLEGAL"]);
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn parse_errors_render_with_header() {
        let errors = parse("x = (1").expect_err("expected parse failure");
        assert_eq!(errors.to_string(), "Parser errors:\n\texpected ')', got EOF");
    }

    #[test]
    fn stack_indentation_closes_nested_blocks_before_else() {
        let input = indoc! {"
            if a:
                if b:
                    x
            else:
                y
        "};
        let program = parse_with_config(input, &Config::strict()).expect("parse failed");
        let Statement::If { alternative, consequence, .. } = &program.statements[0] else {
            panic!("expected if statement");
        };
        assert_eq!(alternative, &Some(vec![Statement::Expr(identifier("y"))]));
        assert!(matches!(
            consequence[0],
            Statement::If {
                alternative: None,
                ..
            }
        ));
    }
}
