//! Runtime orchestration for script execution
//!
//! The Runtime reads source, hands it to the interpreter and sorts failures
//! into syntax and runtime errors for reporting.

use crate::error::{CliError, CliResult};
use interpreter::{Interpreter, InterpreterConfig, Value};
use std::io::{self, Write};
use tracing::info;

/// Runs programs with a fixed configuration
pub struct Runtime {
    /// Interpreter settings applied to every program
    config: InterpreterConfig,
    /// Whether to print AST before execution
    print_ast: bool,
}

impl Runtime {
    /// Create a new runtime instance
    ///
    /// # Example
    /// ```
    /// use js_cli::Runtime;
    ///
    /// let runtime = Runtime::new();
    /// ```
    pub fn new() -> Self {
        Self {
            config: InterpreterConfig::default(),
            print_ast: false,
        }
    }

    /// Use an explicit interpreter configuration
    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable AST printing
    pub fn with_print_ast(mut self, enabled: bool) -> Self {
        self.print_ast = enabled;
        self
    }

    /// Execute a script file
    ///
    /// # Errors
    /// Returns `CliError` if the file cannot be read or execution fails
    ///
    /// # Example
    /// ```no_run
    /// use js_cli::Runtime;
    ///
    /// let runtime = Runtime::new();
    /// let result = runtime.execute_file("example.js").unwrap();
    /// ```
    pub fn execute_file(&self, path: &str) -> CliResult<Option<Value>> {
        let source = read_script(path)?;
        self.execute_string(&source)
    }

    /// Execute a source string
    ///
    /// Returns the value of the last expression statement, or `None`.
    ///
    /// # Example
    /// ```
    /// use js_cli::Runtime;
    /// use interpreter::Value;
    ///
    /// let runtime = Runtime::new();
    /// let result = runtime.execute_string("6 * 7").unwrap();
    /// assert_eq!(result, Some(Value::Number(42.0)));
    /// ```
    pub fn execute_string(&self, source: &str) -> CliResult<Option<Value>> {
        self.execute_to(source, &mut io::stdout().lock())
    }

    /// Execute `source` and write its result line to `out`, if it has one
    pub fn run_and_print(&self, source: &str, out: &mut impl Write) -> CliResult<()> {
        if let Some(value) = self.execute_to(source, out)? {
            check_write(writeln!(out, "{}", format_result(&value)))?;
        }
        Ok(())
    }

    /// Parse and run `source`, sending any AST dump to `out`
    fn execute_to(&self, source: &str, out: &mut impl Write) -> CliResult<Option<Value>> {
        let interpreter =
            Interpreter::with_config(source, self.config.clone()).map_err(CliError::Syntax)?;

        if self.print_ast {
            check_write(writeln!(out, "AST: {:#?}", interpreter.program()))?;
        }

        interpreter.execute().map_err(CliError::Runtime)
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// A reader that went away (`corten-js ... | head`) ends output quietly
fn check_write(result: io::Result<()>) -> CliResult<()> {
    match result {
        Err(err) if err.kind() != io::ErrorKind::BrokenPipe => Err(CliError::Output(err)),
        _ => Ok(()),
    }
}

/// Read a script file
pub fn read_script(path: &str) -> CliResult<String> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })?;
    info!(path, bytes = source.len(), "loaded script");
    Ok(source)
}

/// Display form of a result value. Strings print bare; `undefined` prints
/// like any other value.
pub fn format_result(value: &Value) -> String {
    value.to_js_string()
}
