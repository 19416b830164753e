//! Registry kept only in memory

use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::EndpointRegistry;
use crate::config::EndpointFile;
use crate::error::ConfigResult;
use crate::models::Endpoint;

/// In-memory endpoint registry, used for embedding and tests
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    records: RwLock<EndpointFile>,
}

impl InMemoryRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the given endpoints
    #[must_use]
    pub fn with_endpoints(endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        let registry = Self::new();
        for endpoint in endpoints {
            registry.insert(endpoint);
        }
        registry
    }

    /// Adds an endpoint, replacing any with the same id
    pub fn insert(&self, endpoint: Endpoint) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(endpoint);
    }

    /// Removes an endpoint; clears the current marker if it pointed there
    pub fn remove(&self, id: Uuid) -> Option<Endpoint> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }
}

impl EndpointRegistry for InMemoryRegistry {
    fn resolve(&self, id: Uuid) -> Option<Endpoint> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .find(id)
            .cloned()
    }

    fn list_all(&self) -> Vec<Endpoint> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .endpoints
            .clone()
    }

    fn current_id(&self) -> Option<Uuid> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .current
    }

    fn set_current(&self, id: Uuid) -> ConfigResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .mark_current(id)
    }

    fn clear_current(&self) -> ConfigResult<()> {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .current = None;
        Ok(())
    }
}
