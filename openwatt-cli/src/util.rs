//! Shared utility functions used across command modules.

use std::path::Path;
use std::time::Duration;

use openwatt_core::transport::TransportConfig;
use openwatt_core::{
    AppSettings, ConfigManager, Endpoint, EndpointRegistry, EndpointStore, HttpTransport,
};
use tokio::runtime::Runtime;

use crate::error::CliError;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads `config.toml`, falling back to defaults when it does not exist
pub fn load_settings(config_path: Option<&Path>) -> Result<AppSettings, CliError> {
    create_config_manager(config_path)?
        .load_settings()
        .map_err(|e| CliError::Config(format!("Failed to load settings: {e}")))
}

/// Opens the endpoint store
pub fn open_store(config_path: Option<&Path>) -> Result<EndpointStore, CliError> {
    EndpointStore::open(create_config_manager(config_path)?)
        .map_err(|e| CliError::Config(format!("Failed to load endpoints: {e}")))
}

/// Builds the HTTP transport from settings
///
/// `timeout_secs` overrides every request phase when given.
pub fn build_transport(
    settings: &AppSettings,
    timeout_secs: Option<u64>,
) -> Result<HttpTransport, CliError> {
    let config = timeout_secs.map_or_else(
        || settings.transport.to_transport_config(),
        |secs| {
            let timeout = Duration::from_secs(secs.max(1));
            TransportConfig {
                connect_timeout: timeout,
                read_timeout: timeout,
                write_timeout: timeout,
            }
        },
    );
    HttpTransport::new(config).map_err(CliError::from)
}

/// Creates the runtime async commands are driven on
pub fn create_runtime() -> Result<Runtime, CliError> {
    Runtime::new()
        .map_err(|e| CliError::Config(format!("Failed to create async runtime: {e}")))
}

/// Find an endpoint by name or UUID
pub fn find_endpoint<'a>(
    endpoints: &'a [Endpoint],
    name_or_id: &str,
) -> Result<&'a Endpoint, CliError> {
    // First try to find by exact name match
    if let Some(endpoint) = endpoints.iter().find(|e| e.name == name_or_id) {
        return Ok(endpoint);
    }

    if let Ok(uuid) = uuid::Uuid::parse_str(name_or_id)
        && let Some(endpoint) = endpoints.iter().find(|e| e.id == uuid)
    {
        return Ok(endpoint);
    }

    if let Some(endpoint) = endpoints
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(name_or_id))
    {
        return Ok(endpoint);
    }

    // Unique prefix
    let needle = name_or_id.to_lowercase();
    let matches: Vec<_> = endpoints
        .iter()
        .filter(|e| e.name.to_lowercase().starts_with(&needle))
        .collect();

    match matches.as_slice() {
        [] => Err(CliError::EndpointNotFound(name_or_id.to_string())),
        [only] => Ok(only),
        _ => {
            let names: Vec<_> = matches.iter().map(|e| e.name.as_str()).collect();
            Err(CliError::Validation(format!(
                "Ambiguous endpoint name '{}'. Matches: {}",
                name_or_id,
                names.join(", ")
            )))
        }
    }
}

/// Resolves the endpoint a command targets: the named one, else the current one
pub fn resolve_target(store: &EndpointStore, name: Option<&str>) -> Result<Endpoint, CliError> {
    match name {
        Some(name) => find_endpoint(&store.list_all(), name).cloned(),
        None => store.current().ok_or_else(|| {
            CliError::Config(
                "No current endpoint. Pass a name or select one with `openwatt use NAME`"
                    .to_string(),
            )
        }),
    }
}
