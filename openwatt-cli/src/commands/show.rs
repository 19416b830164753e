//! Show endpoint details command.

use std::path::Path;

use openwatt_core::EndpointRegistry;

use crate::error::CliError;
use crate::util::{find_endpoint, open_store};

/// Show endpoint details command handler
pub fn cmd_show(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let store = open_store(config_path)?;
    let endpoints = store.list_all();
    let endpoint = find_endpoint(&endpoints, name)?;

    println!("Endpoint Details:");
    println!("  ID:       {}", endpoint.id);
    println!("  Name:     {}", endpoint.name);
    println!("  Host:     {}", endpoint.host);
    println!("  Port:     {}", endpoint.port);
    println!("  Scheme:   {}", endpoint.scheme);
    println!("  URL:      {}", endpoint.base_url());
    if store.current_id() == Some(endpoint.id) {
        println!("  Current:  yes");
    }

    Ok(())
}
