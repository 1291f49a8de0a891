use std::fmt;

use crate::error::Span;
use crate::lexer::RawUnit;
use crate::value::TypeName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    // Keywords
    Let,
    Set,
    Print,
    If,
    Else,
    While,
    Return,
    Function,
    True,
    False,

    // Operators
    Plus,
    Minus,
    Multiply,
    Divide,
    Modulo,
    Assign,
    Equals,
    StrictEquals,
    NotEquals,
    StrictNotEquals,
    LessThan,
    LessThanEqual,
    GreaterThan,
    GreaterThanEqual,
    LogicalAnd,
    LogicalOr,
    LogicalNot,

    // Symbols
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Dot,
    Semicolon,

    // Literals
    Number,
    Float,
    String,

    Identifier,
    VariableReference,
    TypeAnnotation,
    Unknown,
}

impl TokenType {
    pub fn name(&self) -> &'static str {
        match self {
            TokenType::Let => "KEYWORD_LET",
            TokenType::Set => "KEYWORD_SET",
            TokenType::Print => "KEYWORD_PRINT",
            TokenType::If => "KEYWORD_IF",
            TokenType::Else => "KEYWORD_ELSE",
            TokenType::While => "KEYWORD_WHILE",
            TokenType::Return => "KEYWORD_RETURN",
            TokenType::Function => "KEYWORD_FUNCTION",
            TokenType::True => "BOOLEAN_TRUE",
            TokenType::False => "BOOLEAN_FALSE",
            TokenType::Plus => "PLUS",
            TokenType::Minus => "MINUS",
            TokenType::Multiply => "MULTIPLY",
            TokenType::Divide => "DIVIDE",
            TokenType::Modulo => "MODULO",
            TokenType::Assign => "ASSIGN",
            TokenType::Equals => "EQUALS",
            TokenType::StrictEquals => "STRICT_EQUALS",
            TokenType::NotEquals => "NOT_EQUALS",
            TokenType::StrictNotEquals => "STRICT_NOT_EQUALS",
            TokenType::LessThan => "LESS_THAN",
            TokenType::LessThanEqual => "LESS_THAN_EQUAL",
            TokenType::GreaterThan => "GREATER_THAN",
            TokenType::GreaterThanEqual => "GREATER_THAN_EQUAL",
            TokenType::LogicalAnd => "LOGICAL_AND",
            TokenType::LogicalOr => "LOGICAL_OR",
            TokenType::LogicalNot => "LOGICAL_NOT",
            TokenType::LeftParen => "PAREN_LEFT",
            TokenType::RightParen => "PAREN_RIGHT",
            TokenType::LeftBrace => "BRACE_LEFT",
            TokenType::RightBrace => "BRACE_RIGHT",
            TokenType::LeftBracket => "BRACKET_LEFT",
            TokenType::RightBracket => "BRACKET_RIGHT",
            TokenType::Comma => "COMMA",
            TokenType::Colon => "COLON",
            TokenType::Dot => "DOT",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Number => "NUMBER_LITERAL",
            TokenType::Float => "FLOAT_LITERAL",
            TokenType::String => "STRING_LITERAL",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::VariableReference => "VARIABLE_REFERENCE",
            TokenType::TypeAnnotation => "TYPE_ANNOTATION",
            TokenType::Unknown => "UNKNOWN_TOKEN",
        }
    }

    /// The five token types accepted as an initializer or print literal.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenType::Number
                | TokenType::Float
                | TokenType::String
                | TokenType::True
                | TokenType::False
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    /// Index of the unit within its line.
    pub position: usize,
    pub span: Span,
    pub inferred_type: TypeName,
}

impl Token {
    pub fn new(
        token_type: TokenType,
        lexeme: String,
        position: usize,
        span: Span,
        inferred_type: TypeName,
    ) -> Self {
        Self {
            token_type,
            lexeme,
            position,
            span,
            inferred_type,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} '{}' : {}",
            self.position, self.token_type, self.lexeme, self.inferred_type
        )
    }
}

fn keyword(text: &str) -> Option<TokenType> {
    let token_type = match text {
        "let" => TokenType::Let,
        "set" => TokenType::Set,
        "if" => TokenType::If,
        "else" => TokenType::Else,
        "while" => TokenType::While,
        "return" => TokenType::Return,
        "function" => TokenType::Function,
        "true" => TokenType::True,
        "false" => TokenType::False,
        "print" | "stdout" => TokenType::Print,
        _ => return None,
    };
    Some(token_type)
}

fn operator(text: &str) -> Option<TokenType> {
    let token_type = match text {
        "+" => TokenType::Plus,
        "-" => TokenType::Minus,
        "*" => TokenType::Multiply,
        "/" => TokenType::Divide,
        "%" => TokenType::Modulo,
        "=" => TokenType::Assign,
        "==" => TokenType::Equals,
        "===" => TokenType::StrictEquals,
        "!=" => TokenType::NotEquals,
        "!==" => TokenType::StrictNotEquals,
        "<" => TokenType::LessThan,
        "<=" => TokenType::LessThanEqual,
        ">" => TokenType::GreaterThan,
        ">=" => TokenType::GreaterThanEqual,
        "&&" => TokenType::LogicalAnd,
        "||" => TokenType::LogicalOr,
        "!" => TokenType::LogicalNot,
        _ => return None,
    };
    Some(token_type)
}

fn symbol(text: &str) -> Option<TokenType> {
    let token_type = match text {
        "(" => TokenType::LeftParen,
        ")" => TokenType::RightParen,
        "{" => TokenType::LeftBrace,
        "}" => TokenType::RightBrace,
        "[" => TokenType::LeftBracket,
        "]" => TokenType::RightBracket,
        "," => TokenType::Comma,
        ":" => TokenType::Colon,
        "." => TokenType::Dot,
        ";" => TokenType::Semicolon,
        _ => return None,
    };
    Some(token_type)
}

pub fn is_valid_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Returns the numeric literal type of `text`, if it is one.
fn numeric(text: &str) -> Option<TokenType> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return None,
        }
    }

    if seen_dot {
        Some(TokenType::Float)
    } else {
        Some(TokenType::Number)
    }
}

fn is_quoted(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) => (open == '"' || open == '\'') && open == close,
        _ => false,
    }
}

/// Maps one raw unit to its token. Never fails: anything unrecognized
/// becomes `UNKNOWN_TOKEN` for the parser to reject.
pub fn classify(unit: RawUnit, position: usize) -> Token {
    let (text, span) = match unit {
        RawUnit::Annotation { type_name, span } => {
            return Token::new(
                TokenType::TypeAnnotation,
                type_name.to_string(),
                position,
                span,
                type_name,
            );
        }
        RawUnit::Text { text, span } => (text, span),
    };

    if let Some(name) = text.strip_prefix('?') {
        if is_valid_identifier(name) {
            return Token::new(
                TokenType::VariableReference,
                name.to_string(),
                position,
                span,
                TypeName::Any,
            );
        }
    }

    let (token_type, inferred_type) = if let Some(token_type) = keyword(&text) {
        let inferred = match token_type {
            TokenType::True | TokenType::False => TypeName::Bool,
            _ => TypeName::Void,
        };
        (token_type, inferred)
    } else if let Some(token_type) = operator(&text).or_else(|| symbol(&text)) {
        (token_type, TypeName::Void)
    } else if let Some(token_type) = numeric(&text) {
        let inferred = if token_type == TokenType::Float {
            TypeName::Float
        } else {
            TypeName::Int
        };
        (token_type, inferred)
    } else if is_quoted(&text) {
        (TokenType::String, TypeName::Str)
    } else if is_valid_identifier(&text) {
        (TokenType::Identifier, TypeName::Void)
    } else {
        (TokenType::Unknown, TypeName::Void)
    };

    Token::new(token_type, text, position, span, inferred_type)
}
