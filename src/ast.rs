use crate::error::Span;
use crate::value::{TypeName, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// Declared with `let`; may be redeclared.
    Mutable,
    /// Declared with `set`; locked after the first declaration.
    Immutable,
}

impl Mutability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutability::Mutable => "mutable",
            Mutability::Immutable => "immutable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    VariableDeclaration {
        mutability: Mutability,
        name: String,
        declared_type: Option<TypeName>,
        initializer: Option<Literal>,
        span: Span,
    },
    Print {
        argument: PrintArgument,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> &Span {
        match self {
            Stmt::VariableDeclaration { span, .. } => span,
            Stmt::Print { span, .. } => span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PrintArgument {
    Literal(Literal),
    /// A bare identifier or a `?name` reference; both resolve against scope.
    Variable { name: String, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    pub value: Value,
    pub span: Span,
}

impl Literal {
    pub fn kind(&self) -> TypeName {
        self.value.type_name()
    }
}
