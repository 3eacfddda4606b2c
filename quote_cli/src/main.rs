//! # Interior Quote CLI
//!
//! Terminal front end for `quote_core`: manage the material inventory,
//! price a quotation request, or run the interactive console estimator.

mod cli;
mod commands;
mod config;
mod format;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use quote_core::QuoteError;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::Context;
use config::QuoteConfig;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&e, json);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    // RUST_LOG wins over -v flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let mut config = QuoteConfig::load(cli.config.as_deref())
        .map_err(|e| anyhow::anyhow!("loading configuration: {e}"))?;
    if let Some(path) = cli.inventory {
        config.inventory_path = path;
    }
    debug!(inventory = %config.inventory_path.display(), "configuration loaded");

    let ctx = Context::new(&config, cli.json);
    match cli.command {
        Command::Inventory { action } => commands::inventory::run(&ctx, action),
        Command::Estimate {
            request,
            save_new,
            output,
        } => commands::estimate::run(&ctx, &request, save_new, output),
        Command::Console { catalog } => commands::console::run(&ctx, catalog.as_deref()),
    }
}

fn report(error: &anyhow::Error, json: bool) {
    match error.downcast_ref::<QuoteError>() {
        Some(quote_error) if json => {
            if let Ok(body) = serde_json::to_string_pretty(quote_error) {
                eprintln!("{body}");
                return;
            }
            eprintln!("Error: {error:#}");
        }
        Some(quote_error) if quote_error.is_input_error() => {
            eprintln!("Invalid input: {quote_error}");
        }
        _ => eprintln!("Error: {error:#}"),
    }
}
