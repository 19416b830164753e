//! List endpoints command.

use std::path::Path;

use openwatt_core::EndpointRegistry;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{format_json, format_table};
use crate::util::open_store;

/// List endpoints command handler
pub fn cmd_list(config_path: Option<&Path>, format: OutputFormat) -> Result<(), CliError> {
    let store = open_store(config_path)?;
    let endpoints = store.list_all();
    let current = store.current_id();

    match format {
        OutputFormat::Table => println!("{}", format_table(&endpoints, current)),
        OutputFormat::Json => println!("{}", format_json(&endpoints, current)?),
    }

    Ok(())
}
