//! `OpenWatt` CLI - Command-line interface for `OpenWatt` remote devices
//!
//! Provides commands for registering endpoints, selecting the current one,
//! testing reachability, running commands one-shot or in an interactive
//! console, and watching an endpoint's status.

mod cli;
mod commands;
mod error;
mod format;
mod util;

use std::path::PathBuf;

use clap::Parser;
use cli::Cli;
use openwatt_core::AppSettings;
use openwatt_core::tracing::{TracingConfig, init_tracing};

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    if !cli.quiet {
        // A broken config file is reported by the command itself
        let settings = util::load_settings(config_path).unwrap_or_default();
        init_logging(&settings, cli.verbose, cli.log_file.clone());
    }

    let result = commands::dispatch(config_path, !cli.no_color, cli.command);

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(e.exit_code());
    }
}

/// Starts logging from `[logging]`, raised by `-v` flags
fn init_logging(settings: &AppSettings, verbose: u8, log_file: Option<PathBuf>) {
    let config = TracingConfig::from_settings(&settings.logging, verbose, log_file);
    if let Err(e) = init_tracing(&config) {
        eprintln!("Failed to initialize logging: {e}");
    }
}
