use crate::ast::{Literal, Mutability, PrintArgument, Program, Stmt};
use crate::error::{OtterError, Span};
use crate::token::{Token, TokenType};
use crate::value::Value;

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// 1-based number of the statement being parsed.
    statement: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            current: 0,
            statement: 0,
        }
    }

    pub fn parse(&mut self) -> Result<Program, OtterError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            // Terminators between statements carry no meaning of their own
            if self.match_type(TokenType::Semicolon) {
                continue;
            }
            self.statement += 1;
            statements.push(self.statement()?);
        }

        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Stmt, OtterError> {
        if self.match_type(TokenType::Let) {
            self.declaration(Mutability::Mutable)
        } else if self.match_type(TokenType::Set) {
            self.declaration(Mutability::Immutable)
        } else if self.match_type(TokenType::Print) {
            self.print_statement()
        } else {
            let token = self.peek().cloned();
            let help = match token.as_ref().map(|t| t.token_type) {
                Some(
                    TokenType::If
                    | TokenType::Else
                    | TokenType::While
                    | TokenType::Return
                    | TokenType::Function,
                ) => "control-flow keywords are reserved and cannot start a statement yet",
                _ => "statements start with 'let', 'set' or 'print'",
            };
            Err(self.unexpected(token.as_ref(), "Unexpected token").with_help(help.to_string()))
        }
    }

    fn declaration(&mut self, mutability: Mutability) -> Result<Stmt, OtterError> {
        let keyword = self.previous().clone();

        let name = match self.advance() {
            Some(token) if token.token_type == TokenType::Identifier => token.lexeme.clone(),
            other => {
                let other = other.cloned();
                return Err(self
                    .unexpected(
                        other.as_ref(),
                        &format!("Expected variable name after '{}'", keyword.lexeme),
                    )
                    .with_help(format!(
                        "declarations look like '{} name = value' or '{} name;int = 5'",
                        keyword.lexeme, keyword.lexeme
                    )));
            }
        };

        let declared_type = if self.check(TokenType::TypeAnnotation) {
            self.advance().map(|token| token.inferred_type)
        } else {
            None
        };

        let initializer = if self.match_type(TokenType::Assign) {
            Some(self.literal("Unsupported value type")?)
        } else {
            None
        };

        let end = self.previous().span.end;
        Ok(Stmt::VariableDeclaration {
            mutability,
            name,
            declared_type,
            initializer,
            span: Span::new(keyword.span.start, end),
        })
    }

    fn print_statement(&mut self) -> Result<Stmt, OtterError> {
        let start = self.previous().span.start;

        let argument = match self.peek().map(|token| token.token_type) {
            Some(token_type) if token_type.is_literal() => {
                PrintArgument::Literal(self.literal("print: unsupported argument type")?)
            }
            Some(TokenType::Identifier | TokenType::VariableReference) => {
                let token = self.advance().cloned();
                match token {
                    Some(token) => PrintArgument::Variable {
                        name: token.lexeme,
                        span: token.span,
                    },
                    None => unreachable!(),
                }
            }
            Some(_) => {
                let token = self.advance().cloned();
                return Err(self
                    .unexpected(token.as_ref(), "print: unsupported argument type")
                    .with_help(
                        "print takes a literal, a variable name or a '?name' reference".to_string(),
                    ));
            }
            None => return Err(self.unexpected(None, "print: missing argument")),
        };

        Ok(Stmt::Print {
            argument,
            span: Span::new(start, self.previous().span.end),
        })
    }

    fn literal(&mut self, message: &str) -> Result<Literal, OtterError> {
        let token = match self.advance() {
            Some(token) if token.token_type.is_literal() => token.clone(),
            other => {
                let other = other.cloned();
                return Err(self
                    .unexpected(other.as_ref(), message)
                    .with_help("supported values are integers, floats, quoted strings, true and false".to_string()));
            }
        };

        let value = match token.token_type {
            TokenType::Number => match token.lexeme.parse::<i64>() {
                Ok(n) => Value::Int(n),
                Err(_) => {
                    return Err(self.unexpected(
                        Some(&token),
                        &format!("Integer literal out of range: {}", token.lexeme),
                    ))
                }
            },
            TokenType::Float => match token.lexeme.parse::<f64>() {
                Ok(n) => Value::Float(n),
                Err(_) => {
                    return Err(self.unexpected(
                        Some(&token),
                        &format!("Invalid float literal: {}", token.lexeme),
                    ))
                }
            },
            TokenType::String => Value::Str(strip_quotes(&token.lexeme)),
            TokenType::True => Value::Bool(true),
            TokenType::False => Value::Bool(false),
            _ => unreachable!(),
        };

        Ok(Literal {
            value,
            span: token.span,
        })
    }

    /// Builds a parse error for `token`, or for the end of the line.
    fn unexpected(&self, token: Option<&Token>, message: &str) -> OtterError {
        match token {
            Some(token) => OtterError::parse_error(
                token.span.clone(),
                Some(token.token_type),
                Some(token.position),
                self.statement,
                format!(
                    "{}: found {} '{}' at position {} (statement {})",
                    message, token.token_type, token.lexeme, token.position, self.statement
                ),
            ),
            None => {
                // Point just past the last token of the line
                let end = self.tokens.last().map(|t| t.span.end).unwrap_or(0);
                OtterError::parse_error(
                    Span::single(end),
                    None,
                    None,
                    self.statement,
                    format!("{}: found end of input (statement {})", message, self.statement),
                )
            }
        }
    }

    fn match_type(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().map(|t| t.token_type == token_type).unwrap_or(false)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.current);
        if token.is_some() {
            self.current += 1;
        }
        token
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }
}

/// Drops exactly one leading and one trailing quote character.
fn strip_quotes(lexeme: &str) -> String {
    let mut chars = lexeme.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}
