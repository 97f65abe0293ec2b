//! Script Runtime CLI Library
//!
//! Provides the argument definitions and the Runtime used by the
//! `corten-js` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod runtime;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use runtime::{format_result, read_script, Runtime};
