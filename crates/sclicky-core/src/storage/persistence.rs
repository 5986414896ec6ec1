//! Link record persistence
//!
//! Serializes the full record sequence as a JSON array under a single key.
//! Loading never fails: a missing, unreadable or corrupt value degrades to
//! an empty sequence. Saving reports failures back to the caller.

use tracing::{debug, error};

use super::error::StorageResult;
use super::kv::KeyValueStore;
use crate::models::LinkRecord;

/// Durable store adapter over a `KeyValueStore`
#[derive(Debug)]
pub struct LinkStorage<S> {
    store: S,
}

impl<S: KeyValueStore> LinkStorage<S> {
    /// Wrap a raw store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get mutable access to the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the underlying store
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Load the record sequence stored at `key`
    pub fn load(&self, key: &str) -> Vec<LinkRecord> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "No saved links found");
                return Vec::new();
            }
            Err(e) => {
                error!(key, error = %e, "Error reading saved links");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<LinkRecord>>(&raw) {
            Ok(records) => {
                debug!(key, count = records.len(), "Loaded saved links");
                records
            }
            Err(e) => {
                error!(key, error = %e, "Saved links are corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the value at `key` with the full record sequence
    pub fn save(&mut self, key: &str, records: &[LinkRecord]) -> StorageResult<()> {
        let result = serde_json::to_string(records)
            .map_err(Into::into)
            .and_then(|json| self.store.set(key, &json));

        match &result {
            Ok(()) => debug!(key, count = records.len(), "Saved links"),
            Err(e) => error!(key, error = %e, "Error writing saved links"),
        }

        result
    }
}
