//! Contract tests for interpreter API
//!
//! These tests pin down the public API.

use core_types::ErrorKind;
use interpreter::{Environment, Evaluator, Interpreter, InterpreterConfig, Value};
use parser::Parser;

/// Test Interpreter::new() parses eagerly and rejects malformed programs
#[test]
fn test_interpreter_new_contract() {
    assert!(Interpreter::new("1 + 1").is_ok());

    let err = Interpreter::new("let a = 1; let a = 2;").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert!(err.source_position.is_some(), "syntax errors carry a position");
}

/// Test Interpreter::execute() returns the last expression statement value
#[test]
fn test_interpreter_execute_contract() {
    let interpreter = Interpreter::new("1; 'two'; var three = 3;").unwrap();
    assert_eq!(interpreter.execute().unwrap(), Some(Value::from("two")));
}

/// Test Interpreter::execute() returns None when nothing produced a value
#[test]
fn test_interpreter_execute_empty_contract() {
    assert_eq!(Interpreter::new("").unwrap().execute().unwrap(), None);
    assert_eq!(Interpreter::new("var x = 1;").unwrap().execute().unwrap(), None);
}

/// Test runtime failures are distinguishable from syntax failures
#[test]
fn test_runtime_failure_contract() {
    let err = Interpreter::new("{ x; let x; }").unwrap().execute().unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReferenceError);
    assert!(!err.is_syntax_error());
}

/// Test Interpreter::program() exposes the parsed AST
#[test]
fn test_interpreter_program_contract() {
    let interpreter = Interpreter::new("var a; let b; const c = 1;").unwrap();
    let scope = &interpreter.program().scope;
    assert!(scope.vars.contains("a"));
    assert!(scope.lets.contains("b"));
    assert!(scope.consts.contains("c"));
}

/// Test Interpreter::with_config() applies the call depth limit
#[test]
fn test_interpreter_with_config_contract() {
    let config = InterpreterConfig::default().with_max_call_depth(2);
    let interpreter = Interpreter::with_config(
        "function a() { return b() } function b() { return c() } function c() { return 1 } a()",
        config,
    )
    .unwrap();
    let err = interpreter.execute().unwrap_err();
    assert_eq!(err.kind, ErrorKind::RangeError);
    assert_eq!(err.message, "Maximum call stack size exceeded");
}

/// Test runtime errors carry the call stack, innermost first
#[test]
fn test_error_stack_contract() {
    let err = Interpreter::new("function f() { return g() }\nfunction g() { null.x }\nf()")
        .unwrap()
        .execute()
        .unwrap_err();
    let names: Vec<_> = err
        .stack
        .iter()
        .map(|frame| frame.function_name.as_deref().unwrap_or("<anonymous>"))
        .collect();
    assert_eq!(names, vec!["g", "f"]);
}

/// Test Evaluator::run() against a caller-supplied global environment
#[test]
fn test_evaluator_run_contract() {
    let program = Parser::new("answer + 1").parse_program().unwrap();
    let global = Environment::new_global();
    global.borrow_mut().define("answer", Value::Number(41.0));

    let config = InterpreterConfig::default();
    let result = Evaluator::new(&config).run(&program, &global).unwrap();
    assert_eq!(result, Some(Value::Number(42.0)));
}

/// Test Display of runtime errors
#[test]
fn test_error_display_contract() {
    let err = Interpreter::new("missing").unwrap().execute().unwrap_err();
    assert_eq!(err.to_string(), "ReferenceError: missing is not defined at 1:1");
}
