//! Tree-walking interpreter for the script language
//!
//! This crate provides:
//! - The runtime value model (primitives plus shared objects, arrays and functions)
//! - Operator dispatch with the language's coercion rules
//! - Environment chains with hoisting and temporal dead zones
//! - A statement executor that threads abrupt completions to the function boundary
//!
//! # Example
//!
//! ```
//! use interpreter::{Interpreter, Value};
//!
//! let interpreter = Interpreter::new("let x = 2; x + 3 * 4").unwrap();
//! assert_eq!(interpreter.execute().unwrap(), Some(Value::Number(14.0)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod call_frame;
pub mod completion;
pub mod config;
pub mod environment;
pub mod evaluator;
pub mod operators;
pub mod value;

// Re-export main types at crate root
pub use call_frame::CallFrame;
pub use completion::Completion;
pub use config::InterpreterConfig;
pub use environment::{Binding, EnvRef, Environment};
pub use evaluator::Evaluator;
pub use value::{JsArray, JsFunction, JsObject, Value};

use core_types::JsError;
use parser::{Parser, Program};
use tracing::instrument;

/// A parsed program ready to run
///
/// Parsing happens eagerly, so a malformed program fails at construction
/// and never reaches evaluation.
#[derive(Debug)]
pub struct Interpreter {
    program: Program,
    config: InterpreterConfig,
}

impl Interpreter {
    /// Parse `source` with the default configuration
    #[instrument(level = "debug", skip(source), fields(len = source.len()))]
    pub fn new(source: &str) -> Result<Self, JsError> {
        Self::with_config(source, InterpreterConfig::default())
    }

    /// Parse `source` with an explicit configuration
    pub fn with_config(source: &str, config: InterpreterConfig) -> Result<Self, JsError> {
        let program = Parser::new(source).parse_program()?;
        Ok(Self { program, config })
    }

    /// Run the program from a fresh root environment.
    ///
    /// Returns the value of the last expression statement executed, or
    /// `None` when no expression statement produced one.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&self) -> Result<Option<Value>, JsError> {
        let global = Environment::new_global();
        Evaluator::new(&self.config).run(&self.program, &global)
    }

    /// The parsed program
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Active configuration
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }
}
