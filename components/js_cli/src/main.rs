//! Corten script runtime CLI
//!
//! Entry point. Parses CLI arguments, installs logging and delegates to
//! the Runtime for execution.

use clap::Parser as ClapParser;
use interpreter::InterpreterConfig;
use js_cli::{read_script, Cli, Runtime};
use std::io::Read;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let runtime = Runtime::new()
        .with_config(InterpreterConfig::default().with_max_call_depth(cli.max_call_depth))
        .with_print_ast(cli.print_ast);

    let source = match (&cli.file, &cli.eval) {
        (Some(path), _) => match read_script(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("Error: {}", err);
                return ExitCode::from(err.exit_code() as u8);
            }
        },
        (None, Some(code)) => code.clone(),
        (None, None) => {
            // No script given: read the program from stdin
            let mut source = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut source) {
                eprintln!("Error: Could not read stdin: {}", e);
                return ExitCode::from(2);
            }
            source
        }
    };

    match runtime.run_and_print(&source, &mut std::io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
