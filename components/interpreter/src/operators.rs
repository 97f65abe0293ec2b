//! Operator semantics over evaluated operands
//!
//! Every function here takes values that are already evaluated. Operators
//! that need their operand unevaluated (`&&`, `||`, `typeof name`, `++`,
//! `--` and assignment) are handled by the evaluator, which calls back in
//! here for the arithmetic.

use crate::value::Value;
use core_types::{string_to_number, to_int32, to_uint32, JsError, SourcePosition};
use parser::ast::{BinaryOperator, UnaryOperator, UpdateOperator};

/// Apply a binary operator
pub fn binary(
    operator: BinaryOperator,
    left: &Value,
    right: &Value,
    position: SourcePosition,
) -> Result<Value, JsError> {
    let value = match operator {
        BinaryOperator::Add => add(left, right),
        BinaryOperator::Sub => Value::Number(left.to_number() - right.to_number()),
        BinaryOperator::Mul => Value::Number(left.to_number() * right.to_number()),
        BinaryOperator::Div => Value::Number(left.to_number() / right.to_number()),
        BinaryOperator::Mod => Value::Number(left.to_number() % right.to_number()),
        BinaryOperator::Exp => Value::Number(exponentiate(left.to_number(), right.to_number())),

        BinaryOperator::Eq => Value::Boolean(loose_equals(left, right)),
        BinaryOperator::NotEq => Value::Boolean(!loose_equals(left, right)),
        BinaryOperator::StrictEq => Value::Boolean(strict_equals(left, right)),
        BinaryOperator::StrictNotEq => Value::Boolean(!strict_equals(left, right)),

        BinaryOperator::Lt => Value::Boolean(less_than(left, right) == Some(true)),
        BinaryOperator::Gt => Value::Boolean(less_than(right, left) == Some(true)),
        BinaryOperator::LtEq => Value::Boolean(less_than(right, left) == Some(false)),
        BinaryOperator::GtEq => Value::Boolean(less_than(left, right) == Some(false)),

        BinaryOperator::BitwiseAnd => int32(left, right, |a, b| a & b),
        BinaryOperator::BitwiseOr => int32(left, right, |a, b| a | b),
        BinaryOperator::BitwiseXor => int32(left, right, |a, b| a ^ b),
        BinaryOperator::LeftShift => {
            let count = shift_count(right);
            Value::Number(to_int32(left.to_number()).wrapping_shl(count) as f64)
        }
        BinaryOperator::RightShift => {
            let count = shift_count(right);
            Value::Number((to_int32(left.to_number()) >> count) as f64)
        }
        BinaryOperator::UnsignedRightShift => {
            let count = shift_count(right);
            Value::Number((to_uint32(left.to_number()) >> count) as f64)
        }

        BinaryOperator::In => {
            if !right.is_object_like() {
                return Err(JsError::type_error(
                    format!(
                        "Cannot use 'in' operator to search for '{}' in {}",
                        left.to_js_string(),
                        right.to_js_string()
                    ),
                    Some(position),
                ));
            }
            Value::Boolean(right.has_own_property(&left.to_property_key()))
        }
    };
    Ok(value)
}

/// Apply a unary operator to an evaluated operand
pub fn unary(operator: UnaryOperator, operand: &Value) -> Value {
    match operator {
        UnaryOperator::Minus => Value::Number(-operand.to_number()),
        UnaryOperator::Plus => Value::Number(operand.to_number()),
        UnaryOperator::Not => Value::Boolean(!operand.is_truthy()),
        UnaryOperator::BitwiseNot => Value::Number(!to_int32(operand.to_number()) as f64),
        UnaryOperator::Typeof => Value::String(operand.type_of().to_string()),
        UnaryOperator::Void => Value::Undefined,
    }
}

/// `++` / `--`: returns the old value as a number and the new value
pub fn update(operator: UpdateOperator, operand: &Value) -> (f64, f64) {
    let old = operand.to_number();
    let new = match operator {
        UpdateOperator::Increment => old + 1.0,
        UpdateOperator::Decrement => old - 1.0,
    };
    (old, new)
}

/// `+`: string concatenation if either primitive operand is a string,
/// numeric addition otherwise
pub fn add(left: &Value, right: &Value) -> Value {
    let left = left.to_primitive();
    let right = right.to_primitive();
    match (&left, &right) {
        (Value::String(a), b) => Value::String(format!("{}{}", a, b.to_js_string())),
        (a, Value::String(b)) => Value::String(format!("{}{}", a.to_js_string(), b)),
        _ => Value::Number(left.to_number() + right.to_number()),
    }
}

/// `**`, which differs from `powf` for a NaN exponent and for `±1 ** ±Infinity`
pub fn exponentiate(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// `===`
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    left == right
}

/// `==`
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
        (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            *n == string_to_number(s)
        }
        (Value::Boolean(_), _) => loose_equals(&Value::Number(left.to_number()), right),
        (_, Value::Boolean(_)) => loose_equals(left, &Value::Number(right.to_number())),
        (a, b) if a.is_object_like() && !b.is_object_like() => loose_equals(&a.to_primitive(), b),
        (a, b) if !a.is_object_like() && b.is_object_like() => loose_equals(a, &b.to_primitive()),
        _ => strict_equals(left, right),
    }
}

/// Abstract relational comparison `left < right`. `None` when either side
/// is NaN, which makes every relational operator false.
fn less_than(left: &Value, right: &Value) -> Option<bool> {
    let left = left.to_primitive();
    let right = right.to_primitive();
    if let (Value::String(a), Value::String(b)) = (&left, &right) {
        // Code-unit order, as the language compares strings
        return Some(a.encode_utf16().lt(b.encode_utf16()));
    }
    let (a, b) = (left.to_number(), right.to_number());
    if a.is_nan() || b.is_nan() {
        None
    } else {
        Some(a < b)
    }
}

fn int32(left: &Value, right: &Value, op: impl Fn(i32, i32) -> i32) -> Value {
    let a = to_int32(left.to_number());
    let b = to_int32(right.to_number());
    Value::Number(op(a, b) as f64)
}

fn shift_count(value: &Value) -> u32 {
    to_uint32(value.to_number()) & 31
}
