// OtterScript Interpreter Library
//
// Core pipeline for OtterScript, a tiny typed scripting language: a lexer,
// a token classifier, a recursive-descent parser and a tree-walking
// evaluator, driven one line at a time by a session loop.

// Public modules
pub mod ast;
pub mod error;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod runner;
pub mod token;
pub mod value;

// Re-export commonly used items
pub use ast::{Literal, Mutability, PrintArgument, Program, Stmt};
pub use error::{ErrorKind, OtterError, Span};
pub use evaluator::{Evaluator, Event, Scope, ScopeEntry};
pub use lexer::{tokenize, AnnotationMode, Lexer, RawUnit};
pub use parser::Parser;
pub use repl::{DiagnosticStyle, LineSource, ReaderSource, Session, SessionConfig, SessionEnd};
pub use runner::{interpret_line, LineOutcome};
pub use token::{Token, TokenType};
pub use value::{TypeName, Value};

// Re-export main functions
pub use repl::start as start_repl;
pub use runner::run;
