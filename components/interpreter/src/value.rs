//! Runtime values
//!
//! Primitives are stored inline. Objects, arrays and functions are shared
//! references, so assignment through one alias is visible through all of them.

use crate::environment::EnvRef;
use core_types::{number_to_string, string_to_number, JsError, SourcePosition};
use indexmap::IndexMap;
use parser::FunctionDefinition;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Largest number of holes a single write may add to an array
const MAX_ARRAY_GROWTH: usize = 1 << 24;

/// Represents any script value.
///
/// # Examples
///
/// ```
/// use interpreter::Value;
///
/// let number = Value::Number(4.0);
/// assert!(number.is_truthy());
/// assert_eq!(number.type_of(), "number");
/// assert_eq!(number.to_js_string(), "4");
/// ```
#[derive(Clone)]
pub enum Value {
    /// undefined
    Undefined,
    /// null
    Null,
    /// true or false
    Boolean(bool),
    /// IEEE 754 double-precision number
    Number(f64),
    /// String
    String(String),
    /// Insertion-ordered property map
    Object(Rc<RefCell<JsObject>>),
    /// Array with possible holes
    Array(Rc<RefCell<JsArray>>),
    /// Function with its captured environment
    Function(Rc<JsFunction>),
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::Number(n) => write!(f, "Number({})", number_to_string(*n)),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Object(o) => {
                write!(f, "Object ")?;
                f.debug_set().entries(o.borrow().keys()).finish()
            }
            Value::Array(a) => write!(f, "Array({})", a.borrow().len()),
            Value::Function(func) => write!(f, "Function({})", func.name()),
        }
    }
}

/// Identity for references, value equality for primitives (NaN is never equal)
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl Value {
    /// Wrap an object
    pub fn new_object(object: JsObject) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// Wrap array elements; `None` is a hole
    pub fn new_array(elements: Vec<Option<Value>>) -> Self {
        Value::Array(Rc::new(RefCell::new(JsArray::new(elements))))
    }

    /// The `typeof` tag
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Object(_) | Value::Array(_) => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    /// Null or Undefined
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Object, Array or Function
    pub fn is_object_like(&self) -> bool {
        matches!(self, Value::Object(_) | Value::Array(_) | Value::Function(_))
    }

    /// Truthiness: false for undefined, null, false, 0, -0, NaN and "".
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => !n.is_nan() && *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Object(_) | Value::Array(_) | Value::Function(_) => true,
        }
    }

    /// Numeric conversion
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Object(_) | Value::Array(_) | Value::Function(_) => {
                self.to_primitive().to_number()
            }
        }
    }

    /// String conversion. Arrays join their elements with `,`; a function
    /// converts to its source text.
    pub fn to_js_string(&self) -> String {
        let mut visiting = Vec::new();
        self.stringify(&mut visiting)
    }

    fn stringify(&self, visiting: &mut Vec<*const RefCell<JsArray>>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(func) => func.definition.source.clone(),
            Value::Array(array) => {
                // A cyclic reference joins as the empty string
                let ptr = Rc::as_ptr(array);
                if visiting.contains(&ptr) {
                    return String::new();
                }
                visiting.push(ptr);
                let parts: Vec<String> = array
                    .borrow()
                    .elements
                    .iter()
                    .map(|element| match element {
                        None | Some(Value::Undefined) | Some(Value::Null) => String::new(),
                        Some(value) => value.stringify(visiting),
                    })
                    .collect();
                visiting.pop();
                parts.join(",")
            }
        }
    }

    /// Primitive conversion: reference values become their string form
    pub fn to_primitive(&self) -> Value {
        if self.is_object_like() {
            Value::String(self.to_js_string())
        } else {
            self.clone()
        }
    }

    /// Property key for computed access
    pub fn to_property_key(&self) -> String {
        self.to_js_string()
    }

    /// Read a property. Missing properties are Undefined; reading from
    /// null or undefined is a TypeError.
    pub fn get_property(&self, key: &str, position: SourcePosition) -> Result<Value, JsError> {
        match self {
            Value::Undefined | Value::Null => Err(JsError::type_error(
                format!(
                    "Cannot read properties of {} (reading '{}')",
                    self.to_js_string(),
                    key
                ),
                Some(position),
            )),
            Value::Object(object) => {
                Ok(object.borrow().get(key).cloned().unwrap_or(Value::Undefined))
            }
            Value::Array(array) => Ok(array.borrow().get_property(key)),
            Value::String(s) => Ok(string_property(s, key)),
            Value::Function(func) => Ok(match key {
                "name" => Value::String(func.name().to_string()),
                "length" => Value::Number(func.definition.params.len() as f64),
                _ => Value::Undefined,
            }),
            Value::Boolean(_) | Value::Number(_) => Ok(Value::Undefined),
        }
    }

    /// Write a property. Writes to primitives and functions are ignored;
    /// writing to null or undefined is a TypeError.
    pub fn set_property(
        &self,
        key: &str,
        value: Value,
        position: SourcePosition,
    ) -> Result<(), JsError> {
        match self {
            Value::Undefined | Value::Null => Err(JsError::type_error(
                format!(
                    "Cannot set properties of {} (setting '{}')",
                    self.to_js_string(),
                    key
                ),
                Some(position),
            )),
            Value::Object(object) => {
                object.borrow_mut().set(key, value);
                Ok(())
            }
            Value::Array(array) => array.borrow_mut().set_property(key, value, position),
            _ => Ok(()),
        }
    }

    /// Whether the value has the named property of its own
    pub fn has_own_property(&self, key: &str) -> bool {
        match self {
            Value::Object(object) => object.borrow().contains(key),
            Value::Array(array) => array.borrow().has_property(key),
            Value::String(s) => {
                key == "length" || array_index(key).is_some_and(|i| i < s.chars().count())
            }
            Value::Function(_) => key == "name" || key == "length",
            _ => false,
        }
    }
}

fn string_property(s: &str, key: &str) -> Value {
    if key == "length" {
        return Value::Number(s.chars().count() as f64);
    }
    match array_index(key).and_then(|i| s.chars().nth(i)) {
        Some(c) => Value::String(c.to_string()),
        None => Value::Undefined,
    }
}

/// Parse a canonical array index ("0", "17", never "01" or "-1")
pub fn array_index(key: &str) -> Option<usize> {
    let index: u32 = key.parse().ok()?;
    if index == u32::MAX || index.to_string() != key {
        return None;
    }
    Some(index as usize)
}

/// Insertion-ordered string-keyed property map
#[derive(Debug, Clone, Default)]
pub struct JsObject {
    properties: IndexMap<String, Value>,
}

impl JsObject {
    /// Create an empty object
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a property
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Add or overwrite a property; an overwrite keeps the original position
    pub fn set(&mut self, key: &str, value: Value) {
        match self.properties.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.properties.insert(key.to_string(), value);
            }
        }
    }

    /// Whether the property exists
    pub fn contains(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    /// Property names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }
}

/// Array storage: dense elements with holes, plus any named properties
#[derive(Debug, Clone, Default)]
pub struct JsArray {
    /// Elements; `None` is a hole
    pub elements: Vec<Option<Value>>,
    /// Non-index properties
    pub properties: JsObject,
}

impl JsArray {
    /// Create an array from elements
    pub fn new(elements: Vec<Option<Value>>) -> Self {
        Self {
            elements,
            properties: JsObject::new(),
        }
    }

    /// The `length` property
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the array has length 0
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at an index; holes and out-of-range reads are Undefined
    pub fn get(&self, index: usize) -> Value {
        self.elements
            .get(index)
            .cloned()
            .flatten()
            .unwrap_or(Value::Undefined)
    }

    fn get_property(&self, key: &str) -> Value {
        if key == "length" {
            return Value::Number(self.len() as f64);
        }
        match array_index(key) {
            Some(index) => self.get(index),
            None => self.properties.get(key).cloned().unwrap_or(Value::Undefined),
        }
    }

    fn has_property(&self, key: &str) -> bool {
        if key == "length" {
            return true;
        }
        match array_index(key) {
            Some(index) => matches!(self.elements.get(index), Some(Some(_))),
            None => self.properties.contains(key),
        }
    }

    fn set_property(
        &mut self,
        key: &str,
        value: Value,
        position: SourcePosition,
    ) -> Result<(), JsError> {
        if key == "length" {
            let n = value.to_number();
            let length = n as usize;
            if n < 0.0 || n.fract() != 0.0 || n > u32::MAX as f64 {
                return Err(JsError::range("Invalid array length", Some(position)));
            }
            self.resize(length, position)?;
            return Ok(());
        }
        match array_index(key) {
            Some(index) => {
                if index >= self.elements.len() {
                    self.resize(index + 1, position)?;
                }
                self.elements[index] = Some(value);
            }
            None => self.properties.set(key, value),
        }
        Ok(())
    }

    fn resize(&mut self, length: usize, position: SourcePosition) -> Result<(), JsError> {
        if length > self.elements.len() + MAX_ARRAY_GROWTH {
            return Err(JsError::range("Invalid array length", Some(position)));
        }
        self.elements.resize(length, None);
        Ok(())
    }
}

/// A function value: its definition and the environment it closes over
pub struct JsFunction {
    /// Parsed definition shared with the AST
    pub definition: Rc<FunctionDefinition>,
    /// Environment captured when the function was created
    pub closure: EnvRef,
}

impl JsFunction {
    /// Declared name, or the empty string
    pub fn name(&self) -> &str {
        self.definition.name.as_deref().unwrap_or("")
    }
}

impl fmt::Debug for JsFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsFunction")
            .field("name", &self.name())
            .field("params", &self.definition.params.len())
            .finish()
    }
}
