//! Endpoint registry
//!
//! The registry maps endpoint identifiers to connection parameters and
//! remembers which endpoint is current. The monitor and console only read
//! from it; the one exception is clearing the current marker when the
//! endpoint it points to has disappeared.

mod memory;
mod store;

use uuid::Uuid;

use crate::config::EndpointFile;
use crate::error::{ConfigError, ConfigResult};
use crate::models::Endpoint;

pub use memory::InMemoryRegistry;
pub use store::EndpointStore;

/// Read access to registered endpoints plus the current-endpoint marker
///
/// Implementations use interior mutability so they can be shared behind an
/// `Arc` between the monitor, console and the consumer that edits them.
pub trait EndpointRegistry: Send + Sync {
    /// Looks up an endpoint by identifier
    fn resolve(&self, id: Uuid) -> Option<Endpoint>;

    /// Returns all endpoints in registration order
    fn list_all(&self) -> Vec<Endpoint>;

    /// Returns the identifier of the current endpoint
    fn current_id(&self) -> Option<Uuid>;

    /// Marks an endpoint as current
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the endpoint is not registered, or
    /// a persistence error for file-backed registries.
    fn set_current(&self, id: Uuid) -> ConfigResult<()>;

    /// Clears the current marker
    ///
    /// # Errors
    ///
    /// Returns a persistence error for file-backed registries.
    fn clear_current(&self) -> ConfigResult<()>;

    /// Returns the current endpoint, if the marker points at a registered one
    fn current(&self) -> Option<Endpoint> {
        self.current_id().and_then(|id| self.resolve(id))
    }
}

impl EndpointFile {
    fn find(&self, id: Uuid) -> Option<&Endpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    fn insert(&mut self, endpoint: Endpoint) {
        if let Some(existing) = self.endpoints.iter_mut().find(|e| e.id == endpoint.id) {
            *existing = endpoint;
        } else {
            self.endpoints.push(endpoint);
        }
    }

    /// Replaces the endpoint with the same id; returns false if unknown
    fn replace(&mut self, endpoint: Endpoint) -> bool {
        match self.endpoints.iter_mut().find(|e| e.id == endpoint.id) {
            Some(existing) => {
                *existing = endpoint;
                true
            }
            None => false,
        }
    }

    /// Removes an endpoint and drops the current marker if it pointed there
    fn remove(&mut self, id: Uuid) -> Option<Endpoint> {
        let index = self.endpoints.iter().position(|e| e.id == id)?;
        if self.current == Some(id) {
            self.current = None;
        }
        Some(self.endpoints.remove(index))
    }

    fn mark_current(&mut self, id: Uuid) -> ConfigResult<()> {
        if self.find(id).is_none() {
            return Err(ConfigError::NotFound(format!("endpoint {id}")));
        }
        self.current = Some(id);
        Ok(())
    }
}
