use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use std::fmt;
use std::io::Write;

use crate::token::TokenType;

/// Character range within a single source line.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn single(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Grammar violation. `found` is `None` when the line ended early.
    /// Unclassifiable units reach this as `UNKNOWN_TOKEN`.
    ParseError {
        found: Option<TokenType>,
        position: Option<usize>,
        statement: usize,
    },
    /// Redeclaration of a name bound with `set`.
    ImmutabilityViolation { name: String },
    /// `print` of a name that is not in scope.
    UndefinedReference { name: String },
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::ParseError { .. } => "ParseError",
            ErrorKind::ImmutabilityViolation { .. } => "ImmutabilityViolation",
            ErrorKind::UndefinedReference { .. } => "UndefinedReference",
        }
    }
}

#[derive(Debug, Clone)]
pub struct OtterError {
    pub kind: ErrorKind,
    pub span: Span,
    pub message: String,
    pub help: Option<String>,
}

impl OtterError {
    pub fn new(kind: ErrorKind, span: Span, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn with_help(mut self, help: String) -> Self {
        self.help = Some(help);
        self
    }

    pub fn parse_error(
        span: Span,
        found: Option<TokenType>,
        position: Option<usize>,
        statement: usize,
        message: String,
    ) -> Self {
        Self::new(
            ErrorKind::ParseError {
                found,
                position,
                statement,
            },
            span,
            message,
        )
    }

    pub fn immutability_violation(span: Span, name: &str) -> Self {
        Self::new(
            ErrorKind::ImmutabilityViolation {
                name: name.to_string(),
            },
            span,
            format!("cannot redeclare immutable variable '{}'", name),
        )
        .with_help(format!(
            "'{}' was declared with 'set'; use 'let' for bindings that change",
            name
        ))
    }

    pub fn undefined_reference(span: Span, name: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedReference {
                name: name.to_string(),
            },
            span,
            format!("'{}' is not defined", name),
        )
    }

    /// Writes a rich report with a labelled excerpt of `source`.
    pub fn report<W: Write>(
        &self,
        source: &str,
        filename: Option<&str>,
        color: bool,
        out: W,
    ) -> std::io::Result<()> {
        let filename = filename.unwrap_or("<repl>");

        let label_color = match self.kind {
            ErrorKind::ParseError { .. } => Color::Yellow,
            ErrorKind::ImmutabilityViolation { .. } => Color::Magenta,
            ErrorKind::UndefinedReference { .. } => Color::Red,
        };

        let headline = if color {
            format!("{}: {}", self.kind.name().fg(label_color), self.message)
        } else {
            format!("{}: {}", self.kind.name(), self.message)
        };

        let mut report_builder = Report::build(ReportKind::Error, filename, self.span.start)
            .with_config(Config::default().with_color(color))
            .with_message(headline)
            .with_label(
                Label::new((filename, self.span.start..self.span.end))
                    .with_message(&self.message)
                    .with_color(label_color),
            );

        if let Some(ref help_text) = self.help {
            let note = if color {
                format!("{}: {}", "help".fg(Color::Cyan), help_text)
            } else {
                format!("help: {}", help_text)
            };
            report_builder = report_builder.with_note(note);
        }

        report_builder
            .finish()
            .write((filename, Source::from(source)), out)
    }
}

impl fmt::Display for OtterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

impl std::error::Error for OtterError {}
