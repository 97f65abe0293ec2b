//! Error types for the CLI

use core_types::JsError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// The script file could not be read
    #[error("Could not read '{path}': {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output stream failed
    #[error("Could not write output: {0}")]
    Output(#[source] std::io::Error),

    /// The program failed to parse
    #[error("{0}")]
    Syntax(JsError),

    /// The program failed while running
    #[error("{0}")]
    Runtime(JsError),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } | CliError::Output(_) => 2,
            CliError::Syntax(_) | CliError::Runtime(_) => 1,
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
