//! clinlookup CLI - gene-aware ClinVar variant resolution.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match cli.resolver_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Single {
            gene,
            variant,
            json,
        } => commands::single::run(&gene, &variant, json, config),

        Commands::Batch {
            input,
            output,
            format,
            delay_ms,
        } => commands::batch::run(input, output, format, delay_ms, config, cli.verbose),

        Commands::Interactive => commands::interactive::run(config, cli.verbose),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `-v` enables debug output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "clinlookup=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
