//! Full Pipeline Integration Tests
//!
//! Tests the complete flow: Source -> Parser -> AST -> Evaluator -> Result

use core_types::ErrorKind;
use interpreter::{Interpreter, Value};

/// Helper function to execute source code
fn execute_js(source: &str) -> Result<Option<Value>, String> {
    let interpreter = Interpreter::new(source).map_err(|e| format!("Parse error: {}", e))?;
    interpreter
        .execute()
        .map_err(|e| format!("Execution error: {}", e))
}

fn value(source: &str) -> Value {
    execute_js(source)
        .unwrap_or_else(|e| panic!("{:?}: {}", source, e))
        .unwrap_or(Value::Undefined)
}

fn number(source: &str) -> f64 {
    match value(source) {
        Value::Number(n) => n,
        other => panic!("Expected number from {:?}, got {:?}", source, other),
    }
}

fn string(source: &str) -> String {
    match value(source) {
        Value::String(s) => s,
        other => panic!("Expected string from {:?}, got {:?}", source, other),
    }
}

// ============================================================================
// Precedence
// ============================================================================

/// Test: Multiplication binds tighter than addition
#[test]
fn test_precedence_multiplicative_over_additive() {
    assert_eq!(number("2 + 3 * 4"), 14.0);
    assert_eq!(number("(2 + 3) * 4"), 20.0);
}

/// Test: Exponentiation binds tighter than division
#[test]
fn test_precedence_exponent_over_division() {
    assert_eq!(number("100 ** 1/2"), 50.0);
    assert_eq!(number("100 ** (1/2)"), 10.0);
}

/// Test: Exponentiation is right-associative
#[test]
fn test_exponent_right_associative() {
    assert_eq!(number("2 ** 3 ** 2"), 512.0);
    assert_eq!(number("(2 ** 3) ** 2"), 64.0);
}

/// Test: Assignment is right-associative
#[test]
fn test_assignment_right_associative() {
    assert_eq!(string("var a, b; a = b = 'same'; a + b"), "samesame");
}

/// Test: Full ladder of precedence levels
#[test]
fn test_precedence_ladder() {
    assert_eq!(number("1 + 2 << 1"), 6.0);
    assert_eq!(value("1 << 2 < 5"), Value::Boolean(true));
    assert_eq!(value("1 < 2 == true"), Value::Boolean(true));
    assert_eq!(number("6 & 3 == 3"), 0.0);
    assert_eq!(number("1 | 6 & 3"), 3.0);
    assert_eq!(number("1 ^ 3 | 4"), 6.0);
    assert_eq!(number("1 || 0 && 0"), 1.0);
    assert_eq!(number("0 ? 1 : 0 ? 2 : 3"), 3.0);
}

// ============================================================================
// Arithmetic and coercion
// ============================================================================

/// Test: Wide-range arithmetic without overflow
#[test]
fn test_wide_range_addition() {
    assert_eq!(number("2274827419 + 2020139878"), 4294967297.0);
    assert_eq!(
        value("2274827419 + 2020139878").to_js_string(),
        "4294967297"
    );
}

/// Test: String concatenation wins for +
#[test]
fn test_plus_coercion() {
    assert_eq!(string("\"a\" + 1"), "a1");
    assert_eq!(string("2 + 'b'"), "2b");
    assert_eq!(string("\"3\" + \"4\""), "34");
    assert_eq!(number("'3' * '4'"), 12.0);
    assert_eq!(number("true + 1"), 2.0);
}

/// Test: Invalid arithmetic absorbs into NaN rather than failing
#[test]
fn test_invalid_arithmetic_is_nan() {
    assert!(number("'abc' - 1").is_nan());
    assert!(number("undefined + 1").is_nan());
    assert_eq!(value("NaN == NaN"), Value::Boolean(false));
    assert_eq!(value("NaN < 1 || NaN >= 1"), Value::Boolean(false));
}

/// Test: Relational operators compare strings lexicographically
#[test]
fn test_relational_strings() {
    assert_eq!(value("'apple' < 'banana'"), Value::Boolean(true));
    assert_eq!(value("'10' < '9'"), Value::Boolean(true));
    assert_eq!(value("'10' < 9"), Value::Boolean(false));
}

/// Test: Loose and strict equality
#[test]
fn test_equality() {
    assert_eq!(value("1 == '1'"), Value::Boolean(true));
    assert_eq!(value("1 === '1'"), Value::Boolean(false));
    assert_eq!(value("true == 1"), Value::Boolean(true));
    assert_eq!(value("null == undefined"), Value::Boolean(true));
    assert_eq!(value("null === undefined"), Value::Boolean(false));
    assert_eq!(value("'a' != 'b'"), Value::Boolean(true));
    assert_eq!(value("0 !== -0"), Value::Boolean(false));
}

// ============================================================================
// Short-circuit
// ============================================================================

/// Test: Logical operators yield the decisive operand
#[test]
fn test_logical_yields_operand() {
    assert_eq!(number("0 && 5"), 0.0);
    assert_eq!(number("0 || 5"), 5.0);
    assert_eq!(string("'' || 'fallback'"), "fallback");
    assert_eq!(value("null && 1"), Value::Null);
}

/// Test: Skipped branch has no side effects
#[test]
fn test_short_circuit_side_effects() {
    assert_eq!(number("var i = 0; i && i++; i"), 0.0);
    assert_eq!(number("var j = 1; j || j++; j"), 1.0);
    assert_eq!(number("var k = 0; false ? k++ : 0; k"), 0.0);
}

// ============================================================================
// Bit width
// ============================================================================

/// Test: Bitwise not and signed/unsigned shifts
#[test]
fn test_bit_width_truncation() {
    assert_eq!(number("~0"), -1.0);
    assert_eq!(number("-0b1101 >>> 2"), 1073741820.0);
    assert_eq!(number("-0b1101 >> 2"), -4.0);
    assert_eq!(number("1 << 32"), 1.0);
    assert_eq!(number("1 << 31"), -2147483648.0);
    assert_eq!(number("2147483648 | 0"), -2147483648.0);
    assert_eq!(number("NaN | 0"), 0.0);
    assert_eq!(number("Infinity & 5"), 0.0);
}

// ============================================================================
// Numeric literals and formatting
// ============================================================================

/// Test: Numeric literal forms
#[test]
fn test_numeric_literals() {
    assert_eq!(number("0x1F"), 31.0);
    assert_eq!(number("0b101"), 5.0);
    assert_eq!(number("0o17"), 15.0);
    assert_eq!(number("017"), 15.0);
    assert_eq!(number("1_000_000"), 1000000.0);
    assert_eq!(number("1.5e3"), 1500.0);
    assert_eq!(number(".5"), 0.5);
}

/// Test: Integral numbers format without a fractional part
#[test]
fn test_integral_number_formatting() {
    assert_eq!(string("'' + 4"), "4");
    assert_eq!(string("'' + 4.0"), "4");
    assert_eq!(string("'' + 8 / 2"), "4");
    assert_eq!(string("'' + -0"), "0");
    assert_eq!(string("'' + 0.1 * 3"), "0.30000000000000004");
    assert_eq!(string("'' + 1e21"), "1e+21");
    assert_eq!(string("'' + 1 / 0"), "Infinity");
}

// ============================================================================
// Strings and unary operators
// ============================================================================

/// Test: String escapes
#[test]
fn test_string_escapes() {
    assert_eq!(string(r#"'a\tb'"#), "a\tb");
    assert_eq!(string(r#"'\x41B\u{43}'"#), "ABC");
    assert_eq!(string(r#"'\101'"#), "A");
    assert_eq!(string(r#""it's""#), "it's");
}

/// Test: typeof and void
#[test]
fn test_typeof_and_void() {
    assert_eq!(string("typeof 1"), "number");
    assert_eq!(string("typeof 'x'"), "string");
    assert_eq!(string("typeof true"), "boolean");
    assert_eq!(string("typeof null"), "object");
    assert_eq!(string("typeof {}"), "object");
    assert_eq!(string("typeof function () {}"), "function");
    assert_eq!(string("typeof notDeclared"), "undefined");
    assert_eq!(value("void 0"), Value::Undefined);
}

/// Test: Unary coercions
#[test]
fn test_unary_coercions() {
    assert_eq!(number("+'42'"), 42.0);
    assert_eq!(number("-'3'"), -3.0);
    assert_eq!(value("!''"), Value::Boolean(true));
    assert_eq!(value("!!'0'"), Value::Boolean(true));
}

/// Test: Prefix and postfix update
#[test]
fn test_update_operators() {
    assert_eq!(number("var a = 5; a++"), 5.0);
    assert_eq!(number("var a = 5; ++a"), 6.0);
    assert_eq!(number("var a = '5'; a--; a"), 4.0);
}

// ============================================================================
// Failure classification
// ============================================================================

/// Test: Syntax failures happen before anything runs
#[test]
fn test_syntax_failure_classification() {
    let err = Interpreter::new("var x = 1; x +* 2").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

/// Test: Runtime failures
#[test]
fn test_runtime_failure_classification() {
    let kind = |source: &str| Interpreter::new(source).unwrap().execute().unwrap_err().kind;
    assert_eq!(kind("x"), ErrorKind::ReferenceError);
    assert_eq!(kind("const c = 1; c = 2"), ErrorKind::TypeError);
    assert_eq!(kind("var f = 3; f()"), ErrorKind::TypeError);
}
