//! File-backed endpoint registry
//!
//! Mirrors `endpoints.toml` in memory and writes it back after every
//! mutation. This is the consumer-facing store: besides the read-only
//! [`EndpointRegistry`] surface it offers add/update/delete.

use std::sync::{PoisonError, RwLock};

use uuid::Uuid;

use super::EndpointRegistry;
use crate::config::{ConfigManager, EndpointFile};
use crate::error::ConfigResult;
use crate::models::{Endpoint, Scheme};

/// Endpoint registry persisted through [`ConfigManager`]
#[derive(Debug)]
pub struct EndpointStore {
    manager: ConfigManager,
    records: RwLock<EndpointFile>,
}

impl EndpointStore {
    /// Loads the store from the manager's configuration directory
    ///
    /// # Errors
    ///
    /// Returns an error if `endpoints.toml` exists but cannot be read.
    pub fn open(manager: ConfigManager) -> ConfigResult<Self> {
        let mut records = manager.load_endpoints()?;

        // A stale marker can be left behind by hand edits
        if let Some(current) = records.current
            && records.find(current).is_none()
        {
            tracing::warn!(%current, "Current endpoint missing from endpoints file, clearing");
            records.current = None;
        }

        tracing::debug!(count = records.endpoints.len(), "Loaded endpoints");
        Ok(Self {
            manager,
            records: RwLock::new(records),
        })
    }

    /// Registers a new endpoint with a fresh identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints file cannot be written.
    pub fn add(&self, name: &str, host: &str, port: u16, scheme: Scheme) -> ConfigResult<Endpoint> {
        let endpoint = Endpoint::new(name, host, port, scheme);
        self.commit(|records| {
            records.insert(endpoint.clone());
            Ok(((), true))
        })?;

        tracing::info!(endpoint = %endpoint.name, id = %endpoint.id, "Endpoint added");
        Ok(endpoint)
    }

    /// Replaces the stored endpoint that has the same identifier
    ///
    /// Unknown identifiers are ignored and `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints file cannot be written.
    pub fn update(&self, endpoint: Endpoint) -> ConfigResult<bool> {
        self.commit(|records| {
            let replaced = records.replace(endpoint);
            Ok((replaced, replaced))
        })
    }

    /// Deletes an endpoint, clearing the current marker if it pointed there
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoints file cannot be written.
    pub fn delete(&self, id: Uuid) -> ConfigResult<Option<Endpoint>> {
        self.commit(|records| {
            let removed = records.remove(id);
            let changed = removed.is_some();
            Ok((removed, changed))
        })
    }

    /// Applies `change` to a copy of the records and swaps it in once saved
    ///
    /// `change` returns its result and whether it modified anything.
    /// Unmodified copies are not written. If saving fails the in-memory
    /// records stay as they were.
    fn commit<T>(
        &self,
        change: impl FnOnce(&mut EndpointFile) -> ConfigResult<(T, bool)>,
    ) -> ConfigResult<T> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = records.clone();
        let (value, changed) = change(&mut next)?;
        if changed {
            self.manager.save_endpoints(&next)?;
            *records = next;
        }
        Ok(value)
    }
}

impl EndpointRegistry for EndpointStore {
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
        self.commit(|records| {
            records.mark_current(id)?;
            Ok(((), true))
        })
    }

    fn clear_current(&self) -> ConfigResult<()> {
        self.commit(|records| Ok(((), records.current.take().is_some())))
    }
}
