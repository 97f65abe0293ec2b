//! Core types shared by the parser and the interpreter.
//!
//! This crate provides the error taxonomy, source location tracking and the
//! language-level number conversions that both the lexer and the evaluator
//! depend on.
//!
//! # Overview
//!
//! - [`JsError`] - Script errors with stack traces
//! - [`ErrorKind`] - Types of script errors
//! - [`SourcePosition`] - Source code location
//! - [`StackFrame`] - Call stack frame information
//! - [`number_to_string`] / [`string_to_number`] - Number <-> String conversions
//! - [`to_int32`] / [`to_uint32`] - 32-bit integer views for bitwise operators
//! - [`ensure_sufficient_stack`] - Stack growth for deep recursion
//!
//! # Examples
//!
//! ```
//! use core_types::{number_to_string, ErrorKind, JsError};
//!
//! assert_eq!(number_to_string(2274827419.0 + 2020139878.0), "4294967297");
//!
//! let error = JsError::reference("x is not defined", None);
//! assert_eq!(error.kind, ErrorKind::ReferenceError);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod number;
mod source;
mod stack;

pub use error::{ErrorKind, JsError};
pub use number::{
    number_to_string, parse_radix_digits, string_to_number, to_int32, to_uint32,
};
pub use source::{SourcePosition, StackFrame};
pub use stack::ensure_sufficient_stack;
