//! Select the current endpoint.

use std::path::Path;

use openwatt_core::EndpointRegistry;

use crate::error::CliError;
use crate::util::{find_endpoint, open_store};

/// `use` command handler
pub fn cmd_use(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let store = open_store(config_path)?;
    let endpoints = store.list_all();
    let endpoint = find_endpoint(&endpoints, name)?;

    store.set_current(endpoint.id)?;
    println!("Now using '{}' ({})", endpoint.name, endpoint.base_url());

    Ok(())
}
