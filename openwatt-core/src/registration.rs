//! Registering new endpoints
//!
//! Validates user input, optionally checks that the device answers its
//! health probe, and stores the endpoint as the current one.

use crate::error::{ConfigError, ConfigResult};
use crate::models::{DEFAULT_PORT, Endpoint, Scheme};
use crate::registry::{EndpointRegistry, EndpointStore};
use crate::tracing::span_names;
use crate::transport::{CommandTransport, TransportResult};

/// User input for a new endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDraft {
    /// Display name
    pub name: String,
    /// Hostname or IP address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// Transport scheme
    pub scheme: Scheme,
}

impl EndpointDraft {
    /// Creates a draft on the default port with plain HTTP
    #[must_use]
    pub fn new(name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port: DEFAULT_PORT,
            scheme: Scheme::Http,
        }
    }

    /// Sets the port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the scheme
    #[must_use]
    pub const fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Checks the draft before it is stored
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for a blank name or host, a host
    /// containing whitespace or a scheme prefix, or port 0.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("name must not be empty".to_string()));
        }
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::Validation("host must not be empty".to_string()));
        }
        if host.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "host '{host}' must not contain whitespace"
            )));
        }
        if host.contains("://") {
            return Err(ConfigError::Validation(format!(
                "host '{host}' must not include a scheme; use the https flag instead"
            )));
        }
        if self.port == 0 {
            return Err(ConfigError::Validation("port must be between 1 and 65535".to_string()));
        }
        Ok(())
    }

    /// Builds the unregistered endpoint used for a connection test
    #[must_use]
    pub fn to_transient(&self) -> Endpoint {
        Endpoint::transient(self.host.trim(), self.port, self.scheme)
    }
}

/// Probes a host before it is registered
///
/// # Errors
///
/// Returns the transport failure if the health probe does not succeed.
pub async fn test_connection(
    transport: &dyn CommandTransport,
    host: &str,
    port: u16,
    scheme: Scheme,
) -> TransportResult<()> {
    let endpoint = Endpoint::transient(host.trim(), port, scheme);
    let result = transport.probe(&endpoint).await;
    match &result {
        Ok(()) => tracing::info!(url = %endpoint.base_url(), "Connection test succeeded"),
        Err(e) => tracing::info!(url = %endpoint.base_url(), %e, "Connection test failed"),
    }
    result
}

/// Validates and stores a draft, then marks it as the current endpoint
///
/// # Errors
///
/// Returns a validation error for bad input or a persistence error if the
/// store cannot be written.
pub fn register(store: &EndpointStore, draft: &EndpointDraft) -> ConfigResult<Endpoint> {
    let _span = tracing::info_span!(span_names::ENDPOINT_REGISTER, name = %draft.name).entered();

    draft.validate()?;
    let endpoint = store.add(draft.name.trim(), draft.host.trim(), draft.port, draft.scheme)?;
    store.set_current(endpoint.id)?;
    Ok(endpoint)
}
