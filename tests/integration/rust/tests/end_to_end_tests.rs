//! End-to-end program tests
//!
//! Realistic multi-statement programs exercising functions, closures,
//! loops and data structures together.

use interpreter::{Interpreter, Value};

fn run(source: &str) -> Value {
    Interpreter::new(source)
        .and_then(|i| i.execute())
        .unwrap_or_else(|e| panic!("{}", e))
        .unwrap_or(Value::Undefined)
}

#[test]
fn test_bubble_sort() {
    let source = "
        function sort(items) {
            var n = items.length;
            var swapped = true;
            while (swapped) {
                swapped = false;
                var i = 1;
                while (i < n) {
                    if (items[i - 1] > items[i]) {
                        var t = items[i];
                        items[i] = items[i - 1];
                        items[i - 1] = t;
                        swapped = true;
                    }
                    i++;
                }
                n--;
            }
            return items;
        }
        sort([5, 3, 8, 1, 9, 2])
    ";
    assert_eq!(run(source).to_js_string(), "1,2,3,5,8,9");
}

#[test]
fn test_counter_factory() {
    let source = "
        function makeCounter(step = 1) {
            let count = 0;
            return {
                next() { count += step; return count },
                reset() { count = 0 },
            };
        }
        const a = makeCounter();
        const b = makeCounter(10);
        a.next(); a.next(); b.next();
        const before = [a.next(), b.next()];
        a.reset();
        `${before} ${a.next()}`
    ";
    assert_eq!(run(source), Value::from("3,20 1"));
}

#[test]
fn test_linked_list() {
    let source = "
        function cons(head, tail) { return { head, tail } }
        function sum(list) {
            var total = 0;
            while (list !== null) {
                total += list.head;
                list = list.tail;
            }
            return total;
        }
        var list = cons(1, cons(2, cons(3, null)));
        sum(list)
    ";
    assert_eq!(run(source), Value::Number(6.0));
}

#[test]
fn test_mutual_recursion_with_hoisting() {
    let source = "
        var result = isEven(10) && !isEven(7);
        function isEven(n) { return n === 0 ? true : isOdd(n - 1) }
        function isOdd(n) { return n === 0 ? false : isEven(n - 1) }
        result
    ";
    assert_eq!(run(source), Value::Boolean(true));
}

#[test]
fn test_higher_order_functions() {
    let source = "
        function map(items, f) {
            var out = [];
            var i = 0;
            while (i < items.length) { out[i] = f(items[i], i); i++ }
            return out;
        }
        function compose(f, g) { return function (x) { return f(g(x)) } }
        var inc = function (x) { return x + 1 };
        var dbl = function (x) { return x * 2 };
        map([1, 2, 3], compose(inc, dbl))
    ";
    assert_eq!(run(source).to_js_string(), "3,5,7");
}

#[test]
fn test_string_building() {
    let source = "
        function repeat(s, n) {
            let out = '';
            do { out += s } while (--n > 0);
            return out;
        }
        let word = 'ab';
        repeat(word, 3) + ':' + word.length + ':' + word[1]
    ";
    assert_eq!(run(source), Value::from("ababab:2:b"));
}

#[test]
fn test_asi_across_lines() {
    let source = "
        var a = 1
        var b = a
        ++b
        a + b
    ";
    assert_eq!(run(source), Value::Number(3.0));
}

#[test]
fn test_return_without_value_on_new_line() {
    let source = "
        function f() {
            return
            42
        }
        f()
    ";
    assert_eq!(run(source), Value::Undefined);
}

#[test]
fn test_with_and_debugger() {
    let source = "
        var config = { retries: 3 };
        var attempts = 0;
        debugger;
        with (config) {
            while (attempts < retries) attempts++;
        }
        attempts
    ";
    assert_eq!(run(source), Value::Number(3.0));
}

#[test]
fn test_labeled_style_search_with_break() {
    let source = "
        var grid = [[1, 2], [3, 4], [5, 6]];
        var found = null;
        var r = 0;
        while (r < grid.length) {
            var c = 0;
            while (c < grid[r].length) {
                if (grid[r][c] === 4) { found = [r, c]; break; }
                c++;
            }
            if (found) break;
            r++;
        }
        found
    ";
    assert_eq!(run(source).to_js_string(), "1,1");
}
