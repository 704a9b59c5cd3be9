//! Mortab CLI - statistics extraction for mortality workbooks.

mod cli;
mod commands;

use clap::Parser;
use colored::Colorize;
use mortab::{ErrorReport, MortabError};
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version print to stdout and exit 0.
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => fail(&usage_error(&e)),
    };
    init_logging(cli.verbose);

    if let Err(e) = commands::analyze::run(&cli) {
        fail(&e);
    }
}

/// Print the error report on stdout and exit 1.
fn fail(error: &MortabError) -> ! {
    match serde_json::to_string_pretty(&ErrorReport::from_error(error)) {
        Ok(json) => println!("{}", json),
        Err(_) => println!("{{\"error\": {:?}}}", error.to_string()),
    }
    eprintln!("{} {}", "Error:".red().bold(), error);
    std::process::exit(1);
}

/// Condense a clap failure into a configuration error.
fn usage_error(error: &clap::Error) -> MortabError {
    let rendered = error.to_string();
    let message = rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ");
    MortabError::Config(format!("invalid arguments: {}", message))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "mortab=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
