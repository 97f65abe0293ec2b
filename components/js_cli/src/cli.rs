//! Command-line arguments

use clap::Parser;

/// Run a script file or an inline program
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "corten-js", version, about, long_about = None)]
pub struct Cli {
    /// Script file to execute
    #[arg(short, long, conflicts_with = "eval")]
    pub file: Option<String>,

    /// Inline source to evaluate
    #[arg(short, long)]
    pub eval: Option<String>,

    /// Print the parsed AST before executing
    #[arg(long)]
    pub print_ast: bool,

    /// Nested calls allowed before a RangeError
    #[arg(long, default_value_t = interpreter::config::DEFAULT_MAX_CALL_DEPTH)]
    pub max_call_depth: usize,

    /// Log filter (e.g. `debug`, `interpreter=trace`); overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,
}
