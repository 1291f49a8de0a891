use crate::error::OtterError;
use crate::evaluator::{Evaluator, Event, Scope};
use crate::lexer::{AnnotationMode, Lexer};
use crate::parser::Parser;
use crate::repl::{ReaderSource, Session, SessionConfig};
use crate::token::Token;
use std::io::{self, Write};

/// What happened to one line on its way through the pipeline.
#[derive(Debug)]
pub enum LineOutcome {
    /// Every statement ran.
    Completed { tokens: Vec<Token>, events: Vec<Event> },
    /// The parser refused the line; nothing was evaluated.
    Rejected { tokens: Vec<Token>, error: OtterError },
    /// Evaluation stopped at `error` after producing `events`.
    Aborted {
        tokens: Vec<Token>,
        events: Vec<Event>,
        error: OtterError,
    },
}

impl LineOutcome {
    pub fn tokens(&self) -> &[Token] {
        match self {
            LineOutcome::Completed { tokens, .. } => tokens,
            LineOutcome::Rejected { tokens, .. } => tokens,
            LineOutcome::Aborted { tokens, .. } => tokens,
        }
    }

    pub fn events(&self) -> &[Event] {
        match self {
            LineOutcome::Completed { events, .. } => events,
            LineOutcome::Rejected { .. } => &[],
            LineOutcome::Aborted { events, .. } => events,
        }
    }

    /// The error that ended the line early, if any.
    pub fn error(&self) -> Option<&OtterError> {
        match self {
            LineOutcome::Completed { .. } => None,
            LineOutcome::Rejected { error, .. } => Some(error),
            LineOutcome::Aborted { error, .. } => Some(error),
        }
    }
}

/// Lexes, classifies, parses and evaluates one line against `scope`.
pub fn interpret_line(source: &str, scope: &mut Scope, mode: AnnotationMode) -> LineOutcome {
    // Lexical analysis and classification
    let tokens = Lexer::new(source, mode).scan_tokens();

    // Parsing
    let mut parser = Parser::new(tokens.clone());
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => return LineOutcome::Rejected { tokens, error },
    };

    // Evaluation
    let mut evaluator = Evaluator::new(scope);
    let result = evaluator.evaluate_program(&program);
    let events = evaluator.into_events();

    match result {
        Ok(()) => LineOutcome::Completed { tokens, events },
        Err(error) => LineOutcome::Aborted {
            tokens,
            events,
            error,
        },
    }
}

/// Runs a whole script line by line through one session and hands back the
/// scope it built.
pub fn run<O: Write, E: Write>(
    source: &str,
    config: SessionConfig,
    scope: Scope,
    out: O,
    err: E,
) -> io::Result<Scope> {
    let config = SessionConfig {
        announce: false,
        ..config
    };
    let mut session = Session::new(ReaderSource::new(source.as_bytes()), out, err, config)
        .with_scope(scope);
    session.run()?;
    Ok(session.into_scope())
}
