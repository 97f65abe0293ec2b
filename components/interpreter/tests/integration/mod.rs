//! Integration tests for interpreter
//!
//! Runs whole programs through parsing, hoisting and evaluation.

use core_types::ErrorKind;
use interpreter::{Interpreter, Value};

fn eval(source: &str) -> Value {
    Interpreter::new(source)
        .unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e))
        .execute()
        .unwrap_or_else(|e| panic!("execution failed for {:?}: {}", source, e))
        .unwrap_or(Value::Undefined)
}

fn eval_string(source: &str) -> String {
    eval(source).to_js_string()
}

fn runtime_error(source: &str) -> ErrorKind {
    Interpreter::new(source)
        .unwrap_or_else(|e| panic!("parse failed for {:?}: {}", source, e))
        .execute()
        .unwrap_err()
        .kind
}

#[test]
fn test_fibonacci() {
    let source = "
        function fib(n) {
            if (n < 2) return n;
            return fib(n - 1) + fib(n - 2);
        }
        fib(15)
    ";
    assert_eq!(eval(source), Value::Number(610.0));
}

#[test]
fn test_iterative_loop_with_accumulator() {
    let source = "
        let total = 0;
        let i = 1;
        while (i <= 100) {
            total += i;
            i++;
        }
        total
    ";
    assert_eq!(eval(source), Value::Number(5050.0));
}

#[test]
fn test_closures_capture_per_invocation_environment() {
    let source = "
        function makeAdder(x) {
            return function (y) { return x + y };
        }
        var add2 = makeAdder(2);
        var add10 = makeAdder(10);
        add2(1) + add10(1)
    ";
    assert_eq!(eval(source), Value::Number(14.0));
}

#[test]
fn test_closure_sees_later_assignment() {
    let source = "
        var x = 1;
        function get() { return x }
        x = 5;
        get()
    ";
    assert_eq!(eval(source), Value::Number(5.0));
}

#[test]
fn test_block_scoping() {
    let source = "
        let a = 1;
        {
            let a = 2;
            var b = a;
        }
        [a, b]
    ";
    assert_eq!(eval_string(source), "1,2");
}

#[test]
fn test_var_hoisting_through_blocks() {
    let source = "
        function f() {
            var before = typeof v;
            if (true) { var v = 3; }
            return before + ':' + v;
        }
        f()
    ";
    assert_eq!(eval_string(source), "undefined:3");
}

#[test]
fn test_return_from_nested_loop() {
    let source = "
        function find(limit) {
            var i = 0;
            while (true) {
                do {
                    if (i * i > limit) { return i; }
                    i++;
                } while (true);
            }
        }
        find(50)
    ";
    assert_eq!(eval(source), Value::Number(8.0));
}

#[test]
fn test_objects_are_shared_by_reference() {
    let source = "
        var a = { n: 1 };
        var b = a;
        b.n = 2;
        function bump(o) { o.n++ }
        bump(a);
        a.n
    ";
    assert_eq!(eval(source), Value::Number(3.0));
}

#[test]
fn test_object_literal_forms() {
    let source = "
        var k = 'dyn';
        var name = 'short';
        var o = {
            plain: 1,
            'quoted key': 2,
            3: 'three',
            [k + 'amic']: 4,
            name,
            twice() { return 2 },
            plain: 5,
        };
        [o.plain, o['quoted key'], o[3], o.dynamic, o.name, typeof o.twice]
    ";
    assert_eq!(eval_string(source), "5,2,three,4,short,function");
}

#[test]
fn test_array_holes_and_length() {
    assert_eq!(eval("[1, , 3].length"), Value::Number(3.0));
    assert_eq!(eval("[1, 2, ].length"), Value::Number(2.0));
    assert_eq!(eval_string("var a = []; a[2] = 'x'; a"), ",,x");
    assert_eq!(eval("var a = [1, 2, 3]; a.length = 1; a.length"), Value::Number(1.0));
}

#[test]
fn test_optional_chaining() {
    assert_eq!(eval("var o = {}; o?.a?.b"), Value::Undefined);
    assert_eq!(eval("var o = null; o?.a.b.c"), Value::Undefined);
    assert_eq!(eval("var o = { f: function () { return 1 } }; o.g?.()"), Value::Undefined);
    assert_eq!(eval("var o = { f: function () { return 1 } }; o.f?.()"), Value::Number(1.0));
    assert_eq!(eval("var o = { a: [7] }; o?.a?.[0]"), Value::Number(7.0));
    assert_eq!(runtime_error("var o = {}; o?.a.b"), ErrorKind::TypeError);
}

#[test]
fn test_optional_chain_skips_argument_evaluation() {
    let source = "
        var called = false;
        function mark() { called = true }
        var o = null;
        o?.f(mark());
        called
    ";
    assert_eq!(eval(source), Value::Boolean(false));
}

#[test]
fn test_template_literals() {
    assert_eq!(eval_string("var a = 2, b = 3; `${a} + ${b} = ${a + b}`"), "2 + 3 = 5");
    assert_eq!(eval_string("`outer ${`inner ${1 + 1}`}`"), "outer inner 2");
    assert_eq!(eval_string("`line1\nline2`"), "line1\nline2");
}

#[test]
fn test_conditional_and_sequence() {
    assert_eq!(eval("var x = 5; x > 3 ? 'big' : 'small'"), Value::from("big"));
    assert_eq!(eval("var a = 1; (a++, a++, a)"), Value::Number(3.0));
}

#[test]
fn test_compound_assignment_operators() {
    let source = "
        var x = 10;
        x -= 3; x *= 2; x /= 7; x %= 3; x **= 3;
        x <<= 2; x |= 1; x ^= 3; x &= 6; x >>= 1; x >>>= 0;
        x
    ";
    assert_eq!(eval(source), Value::Number(1.0));
}

#[test]
fn test_update_on_properties() {
    assert_eq!(eval("var o = { n: 1 }; o.n++ + ++o.n"), Value::Number(4.0));
    assert_eq!(eval("var a = [5]; a[0]--; a[0]"), Value::Number(4.0));
    assert!(matches!(eval("var o = {}; o.n++; o.n"), Value::Number(n) if n.is_nan()));
}

#[test]
fn test_in_operator() {
    assert_eq!(eval("'a' in { a: undefined }"), Value::Boolean(true));
    assert_eq!(eval("1 in [1, 2]"), Value::Boolean(true));
    assert_eq!(eval("5 in [1, 2]"), Value::Boolean(false));
    assert_eq!(runtime_error("'a' in 'abc'"), ErrorKind::TypeError);
}

#[test]
fn test_with_statement_scoping() {
    let source = "
        var settings = { depth: 2 };
        var depth = 9;
        var seen;
        with (settings) { seen = depth; depth = 3 }
        [seen, settings.depth, depth]
    ";
    assert_eq!(eval_string(source), "2,3,9");
}

#[test]
fn test_new_returns_fresh_object() {
    let source = "
        function Point() { return 1 }
        var p = new Point();
        var q = new Point;
        p.x = 1;
        [typeof p, p === q, q.x]
    ";
    assert_eq!(eval_string(source), "object,false,");
}

#[test]
fn test_function_properties_and_source() {
    assert_eq!(eval("function add(a, b) { return a + b } add.length"), Value::Number(2.0));
    assert_eq!(eval("var f = function named() {}; f.name"), Value::from("named"));
    assert_eq!(
        eval_string("var f = function (x) { return x * 2 }; f"),
        "function (x) { return x * 2 }"
    );
}

#[test]
fn test_runtime_errors() {
    assert_eq!(runtime_error("undeclared"), ErrorKind::ReferenceError);
    assert_eq!(runtime_error("undeclared = 1"), ErrorKind::ReferenceError);
    assert_eq!(runtime_error("const c = 1; c = 2"), ErrorKind::TypeError);
    assert_eq!(runtime_error("var n = 1; n()"), ErrorKind::TypeError);
    assert_eq!(runtime_error("null.x"), ErrorKind::TypeError);
    assert_eq!(runtime_error("NaN = 1"), ErrorKind::TypeError);
    assert_eq!(runtime_error("throw 1"), ErrorKind::Uncaught);
}

#[test]
fn test_runtime_error_position() {
    let err = Interpreter::new("var a = 1;\nvar b = a + missing;")
        .unwrap()
        .execute()
        .unwrap_err();
    let position = err.source_position.unwrap();
    assert_eq!(position.line, 2);
    assert_eq!(position.column, 13);
}

#[test]
fn test_deep_recursion_is_range_error() {
    assert_eq!(
        runtime_error("function down(n) { return down(n + 1) } down(0)"),
        ErrorKind::RangeError
    );
}

#[test]
fn test_deep_recursion_within_limit() {
    let source = "function count(n) { return n === 0 ? 0 : 1 + count(n - 1) } count(900)";
    assert_eq!(eval(source), Value::Number(900.0));
}
