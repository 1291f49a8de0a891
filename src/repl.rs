use crate::error::OtterError;
use crate::evaluator::{Event, Scope};
use crate::lexer::AnnotationMode;
use crate::runner::{interpret_line, LineOutcome};
use rustyline::error::ReadlineError;
use rustyline::Editor;
use std::io::{self, BufRead, Write};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Line value that ends a session.
pub const STOP_SENTINEL: &str = "stop";

pub const FAREWELL: &str = "OtterScript session ended.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticStyle {
    /// One line per error: `<Kind>: <message>`.
    Plain,
    /// Full report with a labelled excerpt of the offending line.
    Report { color: bool },
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub prompt: String,
    pub mode: AnnotationMode,
    /// Dump the classified tokens of every line.
    pub show_tokens: bool,
    /// Print `Declared name: { ... }` after each declaration.
    pub echo_declarations: bool,
    pub diagnostics: DiagnosticStyle,
    /// Print the banner and the farewell message.
    pub announce: bool,
    /// Script name used to prefix diagnostics; `None` for the interactive session.
    pub origin: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            prompt: ">> ".to_string(),
            mode: AnnotationMode::Annotation,
            show_tokens: false,
            echo_declarations: true,
            diagnostics: DiagnosticStyle::Plain,
            announce: true,
            origin: None,
        }
    }
}

/// Where a session gets its lines from. `Ok(None)` means end of input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;
}

/// Reads lines from any buffered reader; the prompt is not shown.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderSource<R> {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.reader.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line.trim_end_matches(&['\n', '\r'][..]).to_string())),
        }
    }
}

/// Terminal line editor with history.
pub struct EditorSource {
    editor: Editor<()>,
}

impl EditorSource {
    pub fn new() -> Self {
        Self {
            editor: Editor::<()>::new(),
        }
    }
}

impl Default for EditorSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(ReadlineError::Io(error)) => Err(error),
            Err(error) => Err(io::Error::new(io::ErrorKind::Other, error.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The stop sentinel was entered.
    Stopped,
    EndOfInput,
    /// Reading a later line failed; the failure was reported.
    InputFailed,
}

/// One read-evaluate loop. Owns the scope for its whole lifetime.
pub struct Session<S, O, E> {
    source: S,
    out: O,
    err: E,
    scope: Scope,
    config: SessionConfig,
    lines_read: usize,
}

impl<S: LineSource, O: Write, E: Write> Session<S, O, E> {
    pub fn new(source: S, out: O, err: E, config: SessionConfig) -> Self {
        Self {
            source,
            out,
            err,
            scope: Scope::new(),
            config,
            lines_read: 0,
        }
    }

    /// Continues from an existing scope, e.g. one left behind by a script.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn into_scope(self) -> Scope {
        self.scope
    }

    /// Loops until the stop sentinel or end of input. Only a failure to read
    /// the very first line is returned as an error.
    pub fn run(&mut self) -> io::Result<SessionEnd> {
        if self.config.announce {
            writeln!(self.out, "OtterScript v{}", VERSION)?;
            writeln!(self.out, "Type '{}' or press Ctrl+D to quit", STOP_SENTINEL)?;
            writeln!(self.out)?;
        }

        let end = loop {
            let line = match self.source.read_line(&self.config.prompt) {
                Ok(Some(line)) => line,
                Ok(None) => break SessionEnd::EndOfInput,
                Err(error) if self.lines_read == 0 => return Err(error),
                Err(error) => {
                    writeln!(self.err, "Error reading input: {}", error)?;
                    break SessionEnd::InputFailed;
                }
            };
            self.lines_read += 1;

            let trimmed = line.trim();
            if trimmed == STOP_SENTINEL {
                break SessionEnd::Stopped;
            }
            if trimmed.is_empty() {
                continue;
            }

            self.process_line(&line)?;
        };

        if self.config.announce {
            writeln!(self.out, "{}", FAREWELL)?;
        }
        self.out.flush()?;
        Ok(end)
    }

    /// Runs one line through the pipeline and reports the outcome.
    pub fn process_line(&mut self, line: &str) -> io::Result<()> {
        let outcome = interpret_line(line, &mut self.scope, self.config.mode);

        if self.config.show_tokens {
            for token in outcome.tokens() {
                writeln!(self.out, "{}", token)?;
            }
        }

        let (events, error) = match outcome {
            LineOutcome::Completed { events, .. } => (events, None),
            LineOutcome::Rejected { error, .. } => (Vec::new(), Some(error)),
            LineOutcome::Aborted { events, error, .. } => (events, Some(error)),
        };

        for event in events {
            match event {
                Event::Declared { name, entry } => {
                    if self.config.echo_declarations {
                        writeln!(self.out, "Declared {}: {}", name, entry)?;
                    }
                }
                Event::Printed(value) => writeln!(self.out, "{}", value)?,
                Event::Diagnostic(error) => self.diagnostic(line, &error)?,
            }
        }

        if let Some(error) = error {
            self.diagnostic(line, &error)?;
        }
        Ok(())
    }

    fn diagnostic(&mut self, line: &str, error: &OtterError) -> io::Result<()> {
        match self.config.diagnostics {
            DiagnosticStyle::Plain => match self.config.origin {
                Some(ref origin) => writeln!(self.err, "{}:{}: {}", origin, self.lines_read, error),
                None => writeln!(self.err, "{}", error),
            },
            DiagnosticStyle::Report { color } => {
                error.report(line, self.config.origin.as_deref(), color, &mut self.err)
            }
        }
    }
}

/// Starts the interactive session on the terminal, continuing from `scope`.
pub fn start(config: SessionConfig, scope: Scope) -> io::Result<SessionEnd> {
    let mut session = Session::new(EditorSource::new(), io::stdout(), io::stderr(), config)
        .with_scope(scope);
    session.run()
}
