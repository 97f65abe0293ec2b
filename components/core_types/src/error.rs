//! Script error types and error handling.
//!
//! This module provides the error taxonomy shared by the parser and the
//! interpreter, along with stack trace information for runtime failures.

use crate::{SourcePosition, StackFrame};
use std::fmt;

/// The kind of script error.
///
/// `SyntaxError` is the only kind produced before evaluation starts; every
/// other kind is a runtime failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed program text (lexing or parsing failure)
    SyntaxError,
    /// Reference to an undeclared or not-yet-initialized binding
    ReferenceError,
    /// Invalid operation on a value (e.g., calling a non-function, assigning to a constant)
    TypeError,
    /// Value out of allowed range (e.g., call depth exceeded)
    RangeError,
    /// A `throw` statement whose value reached the top level
    Uncaught,
    /// Internal interpreter error
    InternalError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::Uncaught => "Uncaught",
            ErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// A script error with message and stack trace.
///
/// # Examples
///
/// ```
/// use core_types::{JsError, ErrorKind};
///
/// let error = JsError::type_error("x is not a function", None);
///
/// assert_eq!(error.kind, ErrorKind::TypeError);
/// assert_eq!(error.to_string(), "TypeError: x is not a function");
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}: {}{}", .kind, .message, .source_position.as_ref().map(|p| format!(" at {p}")).unwrap_or_default())]
pub struct JsError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Call stack at the time of the error, innermost frame first
    pub stack: Vec<StackFrame>,
    /// Source position where the error occurred
    pub source_position: Option<SourcePosition>,
}

impl JsError {
    /// Create an error of the given kind with no stack trace.
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        position: Option<SourcePosition>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            stack: vec![],
            source_position: position,
        }
    }

    /// Create a syntax error.
    pub fn syntax(message: impl Into<String>, position: Option<SourcePosition>) -> Self {
        Self::new(ErrorKind::SyntaxError, message, position)
    }

    /// Create a reference error.
    pub fn reference(message: impl Into<String>, position: Option<SourcePosition>) -> Self {
        Self::new(ErrorKind::ReferenceError, message, position)
    }

    /// Create a type error.
    pub fn type_error(message: impl Into<String>, position: Option<SourcePosition>) -> Self {
        Self::new(ErrorKind::TypeError, message, position)
    }

    /// Create a range error.
    pub fn range(message: impl Into<String>, position: Option<SourcePosition>) -> Self {
        Self::new(ErrorKind::RangeError, message, position)
    }

    /// Create the error raised when a thrown value escapes the program.
    pub fn uncaught(message: impl Into<String>, position: Option<SourcePosition>) -> Self {
        Self::new(ErrorKind::Uncaught, message, position)
    }

    /// Whether this error was detected before evaluation.
    pub fn is_syntax_error(&self) -> bool {
        self.kind == ErrorKind::SyntaxError
    }
}
