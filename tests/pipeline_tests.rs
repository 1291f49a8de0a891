// Lexer, classifier, evaluator and session tests for OtterScript.

use otter::ast::Mutability;
use otter::error::{ErrorKind, Span};
use otter::evaluator::{Event, Scope, ScopeEntry};
use otter::lexer::{tokenize, AnnotationMode, Lexer, RawUnit};
use otter::repl::{DiagnosticStyle, LineSource, ReaderSource, Session, SessionConfig, SessionEnd};
use otter::runner::{interpret_line, LineOutcome};
use otter::token::TokenType;
use otter::value::{TypeName, Value};
use std::io;

fn types(source: &str, mode: AnnotationMode) -> Vec<TokenType> {
    tokenize(source, mode)
        .into_iter()
        .map(|token| token.token_type)
        .collect()
}

fn run_lines(scope: &mut Scope, lines: &[&str]) -> Vec<LineOutcome> {
    lines
        .iter()
        .map(|line| interpret_line(line, scope, AnnotationMode::Annotation))
        .collect()
}

fn printed(outcome: &LineOutcome) -> Vec<Value> {
    outcome
        .events()
        .iter()
        .filter_map(|event| match event {
            Event::Printed(value) => Some(value.clone()),
            _ => None,
        })
        .collect()
}

fn run_session(input: &str, config: SessionConfig) -> (SessionEnd, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let end = {
        let mut session = Session::new(ReaderSource::new(input.as_bytes()), &mut out, &mut err, config);
        session.run().expect("session should start")
    };
    (
        end,
        String::from_utf8(out).expect("utf8 output"),
        String::from_utf8(err).expect("utf8 diagnostics"),
    )
}

// ============================================================================
// Lexer and classifier
// ============================================================================

#[test]
fn let_statement_lexes_into_four_positioned_tokens() {
    let tokens = tokenize("let x = 5", AnnotationMode::Annotation);

    let summary: Vec<(TokenType, &str, usize)> = tokens
        .iter()
        .map(|t| (t.token_type, t.lexeme.as_str(), t.position))
        .collect();
    assert_eq!(
        summary,
        vec![
            (TokenType::Let, "let", 0),
            (TokenType::Identifier, "x", 1),
            (TokenType::Assign, "=", 2),
            (TokenType::Number, "5", 3),
        ]
    );
    assert_eq!(tokens[0].span, Span::new(0, 3));
    assert_eq!(tokens[3].span, Span::new(8, 9));
    assert_eq!(tokens[3].inferred_type, TypeName::Int);
}

#[test]
fn quoted_text_stays_one_unit() {
    let tokens = tokenize("print \"hello, world; (ok) = 1\"", AnnotationMode::Annotation);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].token_type, TokenType::String);
    assert_eq!(tokens[1].lexeme, "\"hello, world; (ok) = 1\"");
    assert_eq!(tokens[1].inferred_type, TypeName::Str);

    let tokens = tokenize("print 'it is'", AnnotationMode::Annotation);
    assert_eq!(tokens[1].lexeme, "'it is'");
    assert_eq!(tokens[1].token_type, TokenType::String);
}

#[test]
fn mismatched_quotes_do_not_close_a_string() {
    let tokens = tokenize("print \"it's\"", AnnotationMode::Annotation);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[1].lexeme, "\"it's\"");
}

#[test]
fn annotation_separator_produces_tagged_unit() {
    let units = Lexer::new("let x;int = 5", AnnotationMode::Annotation).scan_units();
    assert_eq!(units.len(), 5);
    assert_eq!(
        units[2],
        RawUnit::Annotation {
            type_name: TypeName::Int,
            span: Span::new(6, 9),
        }
    );

    let tokens = tokenize("let x;int = 5", AnnotationMode::Annotation);
    assert_eq!(tokens[2].token_type, TokenType::TypeAnnotation);
    assert_eq!(tokens[2].lexeme, "int");
    assert_eq!(tokens[2].inferred_type, TypeName::Int);
}

#[test]
fn terminator_mode_never_annotates() {
    assert_eq!(
        types("let x;int = 5", AnnotationMode::Terminator),
        vec![
            TokenType::Let,
            TokenType::Identifier,
            TokenType::Semicolon,
            TokenType::Identifier,
            TokenType::Assign,
            TokenType::Number,
        ]
    );
}

#[test]
fn separator_before_non_type_acts_as_terminator() {
    assert_eq!(
        types("let a = 1;print ?a", AnnotationMode::Annotation),
        vec![
            TokenType::Let,
            TokenType::Identifier,
            TokenType::Assign,
            TokenType::Number,
            TokenType::Semicolon,
            TokenType::Print,
            TokenType::VariableReference,
        ]
    );
}

#[test]
fn multi_character_operators_are_greedy() {
    assert_eq!(
        types("a === b !== c <= d && e || f", AnnotationMode::Annotation),
        vec![
            TokenType::Identifier,
            TokenType::StrictEquals,
            TokenType::Identifier,
            TokenType::StrictNotEquals,
            TokenType::Identifier,
            TokenType::LessThanEqual,
            TokenType::Identifier,
            TokenType::LogicalAnd,
            TokenType::Identifier,
            TokenType::LogicalOr,
            TokenType::Identifier,
        ]
    );
    assert_eq!(
        types("x==y", AnnotationMode::Annotation),
        vec![TokenType::Identifier, TokenType::Equals, TokenType::Identifier]
    );
    assert_eq!(
        types("!x", AnnotationMode::Annotation),
        vec![TokenType::LogicalNot, TokenType::Identifier]
    );
}

#[test]
fn symbols_split_accumulated_text() {
    assert_eq!(
        types("f(a,b)", AnnotationMode::Annotation),
        vec![
            TokenType::Identifier,
            TokenType::LeftParen,
            TokenType::Identifier,
            TokenType::Comma,
            TokenType::Identifier,
            TokenType::RightParen,
        ]
    );
}

#[test]
fn numbers_keep_decimal_point_and_sign() {
    let tokens = tokenize("let pi = 3.14", AnnotationMode::Annotation);
    assert_eq!(tokens[3].token_type, TokenType::Float);
    assert_eq!(tokens[3].lexeme, "3.14");
    assert_eq!(tokens[3].inferred_type, TypeName::Float);

    let tokens = tokenize("let n = -7", AnnotationMode::Annotation);
    assert_eq!(tokens.len(), 4);
    assert_eq!(tokens[3].token_type, TokenType::Number);
    assert_eq!(tokens[3].lexeme, "-7");
}

#[test]
fn booleans_and_references_classify_with_their_types() {
    let tokens = tokenize("true false ?name ?1abc stdout", AnnotationMode::Annotation);

    assert_eq!(tokens[0].token_type, TokenType::True);
    assert_eq!(tokens[0].inferred_type, TypeName::Bool);
    assert_eq!(tokens[1].token_type, TokenType::False);
    assert_eq!(tokens[1].inferred_type, TypeName::Bool);

    assert_eq!(tokens[2].token_type, TokenType::VariableReference);
    assert_eq!(tokens[2].lexeme, "name");
    assert_eq!(tokens[2].inferred_type, TypeName::Any);

    assert_eq!(tokens[3].token_type, TokenType::Unknown);
    assert_eq!(tokens[4].token_type, TokenType::Print);
}

#[test]
fn non_literal_tokens_infer_void() {
    let tokens = tokenize("let set print if while ( ) , = < $name", AnnotationMode::Annotation);
    assert!(tokens.iter().all(|t| t.inferred_type == TypeName::Void));
    assert_eq!(tokens.last().map(|t| t.token_type), Some(TokenType::Identifier));
}

// ============================================================================
// Evaluator through the line pipeline
// ============================================================================

#[test]
fn every_literal_kind_round_trips_through_scope() {
    let cases = [
        ("let a = 42", Value::Int(42)),
        ("let b = 2.5", Value::Float(2.5)),
        ("let c = \"otter pup\"", Value::Str("otter pup".to_string())),
        ("let d = false", Value::Bool(false)),
    ];

    let mut scope = Scope::new();
    for (declaration, expected) in cases {
        let name = &declaration[4..5];
        let print_line = format!("print ?{}", name);
        let outcomes = run_lines(&mut scope, &[declaration, print_line.as_str()]);
        assert!(outcomes[0].error().is_none());
        assert_eq!(printed(&outcomes[1]), vec![expected.clone()]);
        assert_eq!(scope.get(name).map(|e| e.type_name), Some(expected.type_name()));
    }
}

#[test]
fn annotation_overrides_literal_kind() {
    let mut scope = Scope::new();
    run_lines(&mut scope, &["let x;int = 5", "let y;float = 5"]);

    assert_eq!(scope.get("x").map(|e| e.type_name), Some(TypeName::Int));
    let y = scope.get("y").expect("y declared");
    assert_eq!(y.type_name, TypeName::Float);
    assert_eq!(y.value, Value::Int(5));
}

#[test]
fn declaration_without_initializer_stores_void() {
    let mut scope = Scope::new();
    let outcomes = run_lines(&mut scope, &["let v", "set w;str", "print ?v"]);

    assert_eq!(
        scope.get("v"),
        Some(&ScopeEntry {
            mutability: Mutability::Mutable,
            type_name: TypeName::Void,
            value: Value::Void,
        })
    );
    let w = scope.get("w").expect("w declared");
    assert_eq!(w.type_name, TypeName::Str);
    assert_eq!(w.mutability, Mutability::Immutable);
    assert_eq!(printed(&outcomes[2]), vec![Value::Void]);
}

#[test]
fn immutable_binding_survives_redeclaration() {
    let mut scope = Scope::new();
    let outcomes = run_lines(&mut scope, &["set y = \"hi\"", "let y = 10", "print ?y"]);

    match outcomes[1].error().map(|e| &e.kind) {
        Some(ErrorKind::ImmutabilityViolation { name }) => assert_eq!(name, "y"),
        other => panic!("expected an immutability violation, got {:?}", other),
    }
    assert_eq!(
        scope.get("y"),
        Some(&ScopeEntry {
            mutability: Mutability::Immutable,
            type_name: TypeName::Str,
            value: Value::Str("hi".to_string()),
        })
    );
    assert_eq!(printed(&outcomes[2]), vec![Value::Str("hi".to_string())]);
}

#[test]
fn immutability_violation_skips_rest_of_line() {
    let mut scope = Scope::new();
    let outcomes = run_lines(
        &mut scope,
        &["let c = 1 set d = 2", "let c = 5 let d = 3 let e = 4"],
    );

    assert!(matches!(outcomes[1], LineOutcome::Aborted { .. }));
    // The statement before the violation keeps its effect
    assert_eq!(scope.get("c").map(|e| e.value.clone()), Some(Value::Int(5)));
    assert_eq!(scope.get("d").map(|e| e.value.clone()), Some(Value::Int(2)));
    assert!(scope.get("e").is_none());
    assert_eq!(outcomes[1].events().len(), 1);
}

#[test]
fn undefined_reference_is_recoverable() {
    let mut scope = Scope::new();
    let outcome = interpret_line("print ?z print 1", &mut scope, AnnotationMode::Annotation);

    assert!(matches!(outcome, LineOutcome::Completed { .. }));
    assert!(scope.is_empty());
    match &outcome.events()[0] {
        Event::Diagnostic(error) => assert_eq!(
            error.kind,
            ErrorKind::UndefinedReference {
                name: "z".to_string()
            }
        ),
        other => panic!("expected a diagnostic, got {:?}", other),
    }
    assert_eq!(printed(&outcome), vec![Value::Int(1)]);
}

#[test]
fn bare_identifier_prints_stored_value() {
    let mut scope = Scope::new();
    let outcomes = run_lines(&mut scope, &["let flag = true", "print flag"]);
    assert_eq!(scope.get("flag").map(|e| e.type_name), Some(TypeName::Bool));
    assert_eq!(printed(&outcomes[1]), vec![Value::Bool(true)]);
}

#[test]
fn mutable_bindings_can_be_redeclared_and_locked() {
    let mut scope = Scope::new();
    run_lines(&mut scope, &["let m = 1", "let m = \"two\"", "set m = 3"]);

    let m = scope.get("m").expect("m declared");
    assert_eq!(m.value, Value::Int(3));
    assert_eq!(m.mutability, Mutability::Immutable);
    assert_eq!(scope.len(), 1);
}

#[test]
fn parse_failure_leaves_scope_untouched() {
    let mut scope = Scope::new();
    let outcome = interpret_line("let q = 1 let = 2", &mut scope, AnnotationMode::Annotation);

    match outcome {
        LineOutcome::Rejected { error, .. } => match error.kind {
            ErrorKind::ParseError {
                found, statement, ..
            } => {
                assert_eq!(found, Some(TokenType::Assign));
                assert_eq!(statement, 2);
            }
            other => panic!("expected a parse error, got {:?}", other),
        },
        other => panic!("expected the line to be rejected, got {:?}", other),
    }
    assert!(scope.is_empty());
}

// ============================================================================
// Session loop
// ============================================================================

#[test]
fn session_runs_until_stop_sentinel() {
    let (end, out, err) = run_session(
        "let x = 5\nprint ?x\nstop\nprint 1\n",
        SessionConfig::default(),
    );

    assert_eq!(end, SessionEnd::Stopped);
    assert!(out.starts_with("OtterScript v"));
    assert!(out.contains("Declared x: { mutability: mutable, type: int, value: 5 }\n"));
    assert!(out.contains("\n5\n"));
    assert!(!out.contains("\n1\n"));
    assert!(out.ends_with("OtterScript session ended.\n"));
    assert!(err.is_empty());
}

#[test]
fn session_ends_cleanly_at_end_of_input() {
    let (end, out, _) = run_session("\n\nprint \"hi\"\n", SessionConfig::default());

    assert_eq!(end, SessionEnd::EndOfInput);
    assert!(out.contains("\nhi\n"));
    assert!(out.ends_with("OtterScript session ended.\n"));
}

#[test]
fn diagnostics_go_to_error_channel_and_session_continues() {
    let config = SessionConfig {
        echo_declarations: false,
        announce: false,
        ..SessionConfig::default()
    };
    let (_, out, err) = run_session("print ?nope\nset a = 1\nlet a = 2\nlet = 3\nprint ?a\n", config);

    let diagnostics: Vec<&str> = err.lines().collect();
    assert_eq!(diagnostics.len(), 3);
    assert_eq!(diagnostics[0], "UndefinedReference: 'nope' is not defined");
    assert_eq!(
        diagnostics[1],
        "ImmutabilityViolation: cannot redeclare immutable variable 'a'"
    );
    assert!(diagnostics[2].starts_with("ParseError: Expected variable name after 'let'"));
    assert_eq!(out, "1\n");
}

#[test]
fn token_dump_lists_classified_tokens() {
    let config = SessionConfig {
        show_tokens: true,
        announce: false,
        ..SessionConfig::default()
    };
    let (_, out, _) = run_session("let x = 5\n", config);

    assert!(out.contains("0 KEYWORD_LET 'let' : void\n"));
    assert!(out.contains("3 NUMBER_LITERAL '5' : int\n"));
}

#[test]
fn terminator_mode_runs_separated_statements() {
    let config = SessionConfig {
        mode: AnnotationMode::Terminator,
        echo_declarations: false,
        announce: false,
        ..SessionConfig::default()
    };
    let (_, out, err) = run_session("let a = 1;print ?a\n", config);

    assert_eq!(out, "1\n");
    assert!(err.is_empty());
}

#[test]
fn report_style_renders_source_excerpt() {
    let config = SessionConfig {
        diagnostics: DiagnosticStyle::Report { color: false },
        announce: false,
        ..SessionConfig::default()
    };
    let (_, _, err) = run_session("set a = 1\nlet a = 2\n", config);

    assert!(err.contains("ImmutabilityViolation: cannot redeclare immutable variable 'a'"));
    assert!(err.contains("let a = 2"));
    assert!(err.contains("help"));
}

struct FailingSource {
    lines: Vec<String>,
}

impl LineSource for FailingSource {
    fn read_line(&mut self, _prompt: &str) -> io::Result<Option<String>> {
        match self.lines.pop() {
            Some(line) => Ok(Some(line)),
            None => Err(io::Error::new(io::ErrorKind::Other, "input closed")),
        }
    }
}

#[test]
fn failure_to_read_first_line_is_fatal() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut session = Session::new(
        FailingSource { lines: Vec::new() },
        &mut out,
        &mut err,
        SessionConfig::default(),
    );

    assert!(session.run().is_err());
}

#[test]
fn later_read_failure_ends_session_cleanly() {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let end = {
        let mut session = Session::new(
            FailingSource {
                lines: vec!["print 7".to_string()],
            },
            &mut out,
            &mut err,
            SessionConfig::default(),
        );
        session.run().expect("first line was read")
    };

    assert_eq!(end, SessionEnd::InputFailed);
    assert!(String::from_utf8_lossy(&out).contains("\n7\n"));
    assert!(String::from_utf8_lossy(&err).contains("Error reading input: input closed"));
}

// ============================================================================
// Script runner
// ============================================================================

#[test]
fn script_runner_reports_line_numbers_and_returns_scope() {
    let config = SessionConfig {
        origin: Some("demo.ot".to_string()),
        ..SessionConfig::default()
    };
    let mut out = Vec::new();
    let mut err = Vec::new();
    let scope = otter::run(
        "let a = 1\nlet = 2\nset b = \"x\"\n",
        config,
        Scope::new(),
        &mut out,
        &mut err,
    )
    .expect("script runs");

    assert_eq!(scope.len(), 2);
    assert_eq!(scope.get("b").map(|e| e.mutability), Some(Mutability::Immutable));

    let out = String::from_utf8(out).expect("utf8 output");
    assert!(!out.contains("OtterScript v"));
    assert!(!out.contains("session ended"));
    assert!(String::from_utf8(err)
        .expect("utf8 diagnostics")
        .starts_with("demo.ot:2: ParseError"));
}
