use crate::ast::{Literal, Mutability, PrintArgument, Program, Stmt};
use crate::error::{OtterError, Span};
use crate::value::{TypeName, Value};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct ScopeEntry {
    pub mutability: Mutability,
    pub type_name: TypeName,
    pub value: Value,
}

impl fmt::Display for ScopeEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{{ mutability: {}, type: {}, value: {} }}",
            self.mutability.as_str(),
            self.type_name,
            self.value
        )
    }
}

/// Variable bindings for one session.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    values: HashMap<String, ScopeEntry>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ScopeEntry> {
        self.values.get(name)
    }

    /// Binds `name`, refusing to replace an immutable entry.
    pub fn declare(&mut self, name: &str, entry: ScopeEntry, span: &Span) -> Result<(), OtterError> {
        if let Some(existing) = self.values.get(name) {
            if existing.mutability == Mutability::Immutable {
                return Err(OtterError::immutability_violation(span.clone(), name));
            }
        }
        self.values.insert(name.to_string(), entry);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Something the evaluator produced for the session to report.
#[derive(Debug, Clone)]
pub enum Event {
    Declared { name: String, entry: ScopeEntry },
    Printed(Value),
    /// A recoverable failure; evaluation carried on past it.
    Diagnostic(OtterError),
}

/// Runs one program against a scope it borrows from the session.
pub struct Evaluator<'a> {
    scope: &'a mut Scope,
    events: Vec<Event>,
}

impl<'a> Evaluator<'a> {
    pub fn new(scope: &'a mut Scope) -> Self {
        Self {
            scope,
            events: Vec::new(),
        }
    }

    /// Executes every statement in order. The first immutability violation
    /// stops the program; statements before it keep their effects.
    pub fn evaluate_program(&mut self, program: &Program) -> Result<(), OtterError> {
        for statement in &program.statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn execute_statement(&mut self, stmt: &Stmt) -> Result<(), OtterError> {
        match stmt {
            Stmt::VariableDeclaration {
                mutability,
                name,
                declared_type,
                initializer,
                span,
            } => self.declare(*mutability, name, *declared_type, initializer.as_ref(), span),
            Stmt::Print { argument, .. } => {
                self.print(argument);
                Ok(())
            }
        }
    }

    fn declare(
        &mut self,
        mutability: Mutability,
        name: &str,
        declared_type: Option<TypeName>,
        initializer: Option<&Literal>,
        span: &Span,
    ) -> Result<(), OtterError> {
        let type_name = declared_type
            .or_else(|| initializer.map(Literal::kind))
            .unwrap_or(TypeName::Void);
        let value = initializer
            .map(|literal| literal.value.clone())
            .unwrap_or(Value::Void);

        let entry = ScopeEntry {
            mutability,
            type_name,
            value,
        };
        self.scope.declare(name, entry.clone(), span)?;

        self.events.push(Event::Declared {
            name: name.to_string(),
            entry,
        });
        Ok(())
    }

    fn print(&mut self, argument: &PrintArgument) {
        let event = match argument {
            PrintArgument::Literal(literal) => Event::Printed(literal.value.clone()),
            PrintArgument::Variable { name, span } => match self.scope.get(name) {
                Some(entry) => Event::Printed(entry.value.clone()),
                None => Event::Diagnostic(OtterError::undefined_reference(span.clone(), name)),
            },
        };
        self.events.push(event);
    }
}
