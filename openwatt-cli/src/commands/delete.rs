//! Delete endpoint command.

use std::path::Path;

use openwatt_core::EndpointRegistry;

use crate::error::CliError;
use crate::util::{find_endpoint, open_store};

/// Delete endpoint command handler
pub fn cmd_delete(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let store = open_store(config_path)?;
    let endpoints = store.list_all();
    let endpoint = find_endpoint(&endpoints, name)?;
    let was_current = store.current_id() == Some(endpoint.id);

    let removed = store
        .delete(endpoint.id)?
        .ok_or_else(|| CliError::EndpointNotFound(name.to_string()))?;

    println!("Deleted endpoint '{}' (ID: {})", removed.name, removed.id);
    if was_current {
        println!("No endpoint is current now; select one with `openwatt use NAME`");
    }

    Ok(())
}
