//! Update endpoint command.

use std::path::Path;

use openwatt_core::{EndpointDraft, EndpointRegistry, Scheme};

use crate::error::CliError;
use crate::util::{find_endpoint, open_store};

/// Parameters for the `update` command
pub struct UpdateParams<'a> {
    pub name: &'a str,
    pub new_name: Option<&'a str>,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    /// `Some(true)` for HTTPS, `Some(false)` for HTTP
    pub https: Option<bool>,
}

/// Update endpoint command handler
pub fn cmd_update(config_path: Option<&Path>, params: UpdateParams<'_>) -> Result<(), CliError> {
    let store = open_store(config_path)?;
    let endpoints = store.list_all();
    let mut endpoint = find_endpoint(&endpoints, params.name)?.clone();

    if let Some(new_name) = params.new_name {
        endpoint.name = new_name.trim().to_string();
    }
    if let Some(host) = params.host {
        endpoint.host = host.trim().to_string();
    }
    if let Some(port) = params.port {
        endpoint.port = port;
    }
    if let Some(https) = params.https {
        endpoint.scheme = Scheme::from_https(https);
    }

    EndpointDraft::new(endpoint.name.as_str(), endpoint.host.as_str())
        .with_port(endpoint.port)
        .with_scheme(endpoint.scheme)
        .validate()?;

    if !store.update(endpoint.clone())? {
        return Err(CliError::EndpointNotFound(params.name.to_string()));
    }

    println!(
        "Updated endpoint '{}' ({}) with ID {}",
        endpoint.name,
        endpoint.base_url(),
        endpoint.id
    );

    Ok(())
}
