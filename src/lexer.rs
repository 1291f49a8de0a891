use crate::error::Span;
use crate::token::{classify, is_valid_identifier, Token};
use crate::value::TypeName;

/// How the `;` separator is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnnotationMode {
    /// `name;type` marks a type annotation when `type` is a known type name.
    /// Any other `;` terminates a statement.
    #[default]
    Annotation,
    /// `;` always terminates a statement.
    Terminator,
}

/// A lexical unit before classification.
#[derive(Debug, Clone, PartialEq)]
pub enum RawUnit {
    Text { text: String, span: Span },
    /// Produced only by a `;` annotation, already resolved to its type.
    Annotation { type_name: TypeName, span: Span },
}

const SYMBOLS: &[char] = &[
    '(', ')', '{', '}', '[', ']', ',', ':', '.', '+', '-', '*', '/', '%', '=', '<', '>', '!',
];

// Longest first so `===` wins over `==`.
const MULTI_CHAR_OPERATORS: &[&str] = &["===", "!==", "==", "!=", "<=", ">=", "&&", "||"];

pub struct Lexer {
    source: Vec<char>,
    mode: AnnotationMode,
    units: Vec<RawUnit>,
    current: usize,
    pending: String,
    pending_start: usize,
}

impl Lexer {
    pub fn new(source: &str, mode: AnnotationMode) -> Self {
        Self {
            source: source.chars().collect(),
            mode,
            units: Vec::new(),
            current: 0,
            pending: String::new(),
            pending_start: 0,
        }
    }

    /// Splits the line into raw units. Never fails.
    pub fn scan_units(&mut self) -> Vec<RawUnit> {
        while !self.is_at_end() {
            let c = self.advance();

            match c {
                '"' | '\'' => {
                    self.flush();
                    self.string(c);
                }
                c if c.is_whitespace() => self.flush(),
                ';' => self.separator(),
                '.' if self.pending_is_integer() && self.peek().is_ascii_digit() => {
                    self.accumulate(c)
                }
                '-' if self.pending.is_empty() && self.peek().is_ascii_digit() => {
                    self.accumulate(c)
                }
                _ => {
                    if !self.operator() {
                        if SYMBOLS.contains(&c) {
                            self.flush();
                            self.push_text(c.to_string(), Span::single(self.current - 1));
                        } else {
                            self.accumulate(c);
                        }
                    }
                }
            }
        }

        self.flush();
        std::mem::take(&mut self.units)
    }

    /// Splits and classifies the line.
    pub fn scan_tokens(&mut self) -> Vec<Token> {
        self.scan_units()
            .into_iter()
            .enumerate()
            .map(|(position, unit)| classify(unit, position))
            .collect()
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        self.current += 1;
        c
    }

    fn peek(&self) -> char {
        self.source.get(self.current).copied().unwrap_or('\0')
    }

    fn accumulate(&mut self, c: char) {
        if self.pending.is_empty() {
            self.pending_start = self.current - 1;
        }
        self.pending.push(c);
    }

    fn pending_is_integer(&self) -> bool {
        let digits = self.pending.strip_prefix('-').unwrap_or(&self.pending);
        !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
    }

    fn flush(&mut self) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            let span = Span::new(self.pending_start, self.pending_start + text.chars().count());
            self.push_text(text, span);
        }
    }

    fn push_text(&mut self, text: String, span: Span) {
        self.units.push(RawUnit::Text { text, span });
    }

    /// Reads a quoted unit. The opening quote has been consumed. An
    /// unterminated string runs to the end of the line.
    fn string(&mut self, quote: char) {
        let start = self.current - 1;
        let mut text = String::from(quote);

        while !self.is_at_end() {
            let c = self.advance();
            text.push(c);
            if c == quote {
                break;
            }
        }

        self.push_text(text, Span::new(start, self.current));
    }

    fn separator(&mut self) {
        let separator_at = self.current - 1;
        let run_start = self.current;
        while !self.is_at_end() && !self.peek().is_whitespace() {
            self.advance();
        }
        let run: String = self.source[run_start..self.current].iter().collect();

        if self.mode == AnnotationMode::Annotation && is_valid_identifier(&self.pending) {
            if let Some(type_name) = TypeName::from_annotation(&run) {
                self.flush();
                self.units.push(RawUnit::Annotation {
                    type_name,
                    span: Span::new(run_start, self.current),
                });
                return;
            }
        }

        // Not an annotation: `;` stands alone and the run is lexed normally.
        self.current = run_start;
        self.flush();
        self.push_text(";".to_string(), Span::single(separator_at));
    }

    /// Emits a multi-character operator starting at the character just
    /// consumed, if there is one.
    fn operator(&mut self) -> bool {
        let start = self.current - 1;
        for op in MULTI_CHAR_OPERATORS {
            if self.matches_at(start, op) {
                let len = op.chars().count();
                self.flush();
                self.current = start + len;
                self.push_text(op.to_string(), Span::new(start, self.current));
                return true;
            }
        }
        false
    }

    fn matches_at(&self, pos: usize, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.source.get(pos + i) == Some(&c))
    }
}

/// Lexes and classifies one line.
pub fn tokenize(source: &str, mode: AnnotationMode) -> Vec<Token> {
    Lexer::new(source, mode).scan_tokens()
}
