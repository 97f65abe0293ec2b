//! Scope Rule Integration Tests
//!
//! Declaration conflicts must be rejected by the parser before anything
//! runs; dead-zone reads must fail during evaluation.

use core_types::ErrorKind;
use interpreter::{Interpreter, Value};
use parser::Parser;

fn assert_syntax_error(source: &str) {
    match Parser::new(source).parse_program() {
        Err(e) => assert_eq!(e.kind, ErrorKind::SyntaxError, "{:?}", source),
        Ok(_) => panic!("Expected {:?} to be rejected at parse time", source),
    }
}

fn assert_parses(source: &str) {
    if let Err(e) = Parser::new(source).parse_program() {
        panic!("Expected {:?} to parse, got {}", source, e);
    }
}

/// Test: A side effect before a rejected declaration never happens
#[test]
fn test_rejection_happens_before_evaluation() {
    // If evaluation started, the first statement would fail at runtime instead
    let err = Interpreter::new("undeclared(); let a; let a;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// Test: let/const redeclaration in one scope
#[test]
fn test_lexical_redeclaration() {
    assert_syntax_error("let a; let a;");
    assert_syntax_error("const a = 1; const a = 2;");
    assert_syntax_error("let a; const a = 1;");
    assert_syntax_error("let a, a;");
    assert_syntax_error("var a; let a;");
    assert_syntax_error("function f() {} let f;");
}

/// Test: var conflicting with an existing let/const
#[test]
fn test_var_after_lexical() {
    assert_syntax_error("let a; var a;");
    assert_syntax_error("const a = 1; var a;");
    assert_syntax_error("let a; { var a; }");
    assert_syntax_error("function f(p) { let p; }");
}

/// Test: const needs an initializer
#[test]
fn test_const_without_initializer() {
    assert_syntax_error("const a;");
    assert_syntax_error("const a = 1, b;");
}

/// Test: Allowed redeclarations
#[test]
fn test_allowed_redeclarations() {
    assert_parses("var a; var a;");
    assert_parses("let a; { let a; }");
    assert_parses("let a; function f() { let a; var b; }");
    assert_parses("{ let a; } { let a; }");
    assert_parses("var a; function g() { let a; }");
}

/// Test: Reading a let before its declaration runs
#[test]
fn test_temporal_dead_zone() {
    let err = Interpreter::new("x; let x = 1;").unwrap().execute().unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReferenceError);
    assert_eq!(err.message, "Cannot access 'x' before initialization");
}

/// Test: Inner declaration shadows from block entry, not from its statement
#[test]
fn test_dead_zone_shadows_outer_binding() {
    let source = "let v = 'outer'; { let seen = typeof v; let v = 'inner'; seen }";
    assert_eq!(
        Interpreter::new(source).unwrap().execute().unwrap(),
        Some(Value::from("undefined"))
    );

    let err = Interpreter::new("let v = 1; { v = 2; let v; }")
        .unwrap()
        .execute()
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReferenceError);
}

/// Test: A closure called before the declaration runs hits the dead zone
#[test]
fn test_dead_zone_through_closure() {
    let source = "function read() { return late } read(); let late = 1;";
    let err = Interpreter::new(source).unwrap().execute().unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReferenceError);

    let source = "function read() { return late } let late = 1; read()";
    assert_eq!(
        Interpreter::new(source).unwrap().execute().unwrap(),
        Some(Value::Number(1.0))
    );
}

/// Test: var is visible as Undefined before its declaration runs
#[test]
fn test_var_hoisting() {
    let source = "var before = v; var v = 2; [before, v]";
    let value = Interpreter::new(source).unwrap().execute().unwrap().unwrap();
    assert_eq!(value.to_js_string(), ",2");
}

/// Test: Scope sets recorded on the program
#[test]
fn test_program_scope_sets() {
    let program = Parser::new("var a; { var b; let c; } let d; const e = 1; function f() { var g }")
        .parse_program()
        .unwrap();
    let names = |set: &std::collections::BTreeSet<String>| set.iter().cloned().collect::<Vec<_>>();
    assert_eq!(names(&program.scope.vars), vec!["a", "b", "f"]);
    assert_eq!(names(&program.scope.lets), vec!["d"]);
    assert_eq!(names(&program.scope.consts), vec!["e"]);
}
