//! Link registry
//!
//! The `LinkRegistry` owns the canonical, ordered sequence of link records
//! and routes every mutation through the storage adapter.
//!
//! ## Write-through
//!
//! Each successful add, click or delete is followed by a full-state save.
//! A failed save is logged and recorded (see `is_durable`), but the
//! in-memory change stays: memory remains the source of truth until the next
//! successful save.
//!
//! ## Usage
//!
//! ```ignore
//! let mut registry = LinkRegistry::open(MemoryStore::new(), "sclicky_links");
//!
//! let link = registry.add_link("https://twitter.com/alice", Some(Platform::Twitter))?;
//! registry.record_click(&link.id)?;
//!
//! let hits = registry.search("twitter");
//! ```

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{LinkId, LinkRecord, Platform};
use crate::storage::{KeyValueStore, LinkStorage, StorageError};
use crate::validation::{validate_url, ValidationError};

/// Errors returned by registry lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No record with this id
    #[error("Link not found: {0}")]
    NotFound(LinkId),
}

/// Notifications emitted after state changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A link was added; views should switch to the list
    LinkAdded(LinkRecord),
    /// A click was recorded; carries the updated record
    LinkClicked(LinkRecord),
    /// A link was removed
    LinkDeleted(LinkId),
    /// A write-through failed; carries the error message
    PersistFailed(String),
}

/// Issues numeric ids from the wall clock, never repeating
///
/// Each id is the current time in milliseconds or one past the previous id,
/// whichever is larger. Once the numeric range is used up, ids fall back to
/// `link-<n>` text ids.
#[derive(Debug, Default)]
struct IdGenerator {
    last: u64,
    overflow: u64,
}

impl IdGenerator {
    /// Make sure future ids stay above `id`
    fn observe(&mut self, id: &LinkId) {
        if let Some(n) = id.as_number() {
            self.last = self.last.max(n);
        }
    }

    fn next(&mut self) -> LinkId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        match self.last.checked_add(1) {
            Some(after) => {
                self.last = now.max(after);
                LinkId::Number(self.last)
            }
            None => {
                self.overflow += 1;
                LinkId::Text(format!("link-{}", self.overflow))
            }
        }
    }
}

/// The in-memory link registry
pub struct LinkRegistry<S> {
    storage: LinkStorage<S>,
    key: String,
    links: Vec<LinkRecord>,
    ids: IdGenerator,
    subscribers: Vec<Sender<RegistryEvent>>,
    persist_error: Option<StorageError>,
}

impl<S: KeyValueStore> LinkRegistry<S> {
    /// Open the registry, loading any saved links from `store` under `key`
    ///
    /// A missing or unreadable value yields an empty registry. Records whose
    /// id repeats an earlier one are dropped.
    pub fn open(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let storage = LinkStorage::new(store);
        let loaded = storage.load(&key);

        let mut seen = HashSet::new();
        let mut ids = IdGenerator::default();
        let mut links = Vec::with_capacity(loaded.len());
        for record in loaded {
            if !seen.insert(record.id.clone()) {
                warn!(id = %record.id, url = %record.url, "Dropping link with duplicate id");
                continue;
            }
            ids.observe(&record.id);
            links.push(record);
        }

        debug!(key = %key, count = links.len(), "Opened link registry");

        Self {
            storage,
            key,
            links,
            ids,
            subscribers: Vec::new(),
            persist_error: None,
        }
    }

    // ==================== Mutations ====================

    /// Validate and append a new link
    ///
    /// `platform` defaults to `Other`. On validation failure nothing changes
    /// and nothing is written.
    pub fn add_link(
        &mut self,
        url: &str,
        platform: Option<Platform>,
    ) -> Result<LinkRecord, ValidationError> {
        let url = validate_url(url)?;
        let record = LinkRecord::new(self.fresh_id(), url, platform.unwrap_or_default());

        self.links.push(record.clone());
        debug!(id = %record.id, url = %record.url, platform = %record.platform, "Added link");

        self.persist();
        self.emit(RegistryEvent::LinkAdded(record.clone()));
        Ok(record)
    }

    /// Like `add_link`, with the platform given as a label
    pub fn add_link_labeled(
        &mut self,
        url: &str,
        platform: Option<&str>,
    ) -> Result<LinkRecord, ValidationError> {
        let platform = platform.map(str::parse::<Platform>).transpose()?;
        self.add_link(url, platform)
    }

    /// Count one click on the link with `id`
    ///
    /// Callers open the link right after this returns.
    pub fn record_click(&mut self, id: &LinkId) -> Result<LinkRecord, RegistryError> {
        let record = self
            .links
            .iter_mut()
            .find(|l| &l.id == id)
            .ok_or_else(|| RegistryError::NotFound(id.clone()))?;

        record.clicks = record.clicks.saturating_add(1);
        let updated = record.clone();
        debug!(id = %updated.id, clicks = updated.clicks, "Recorded click");

        self.persist();
        self.emit(RegistryEvent::LinkClicked(updated.clone()));
        Ok(updated)
    }

    /// Delete the link with `id`
    ///
    /// An unknown id is a silent no-op: no error, no save.
    pub fn delete_link(&mut self, id: &LinkId) -> Result<(), RegistryError> {
        self.remove_link(id);
        Ok(())
    }

    /// Delete the link with `id`, returning it if it existed
    pub fn remove_link(&mut self, id: &LinkId) -> Option<LinkRecord> {
        let Some(pos) = self.links.iter().position(|l| &l.id == id) else {
            debug!(id = %id, "Delete ignored, no such link");
            return None;
        };

        let removed = self.links.remove(pos);
        debug!(id = %removed.id, "Deleted link");

        self.persist();
        self.emit(RegistryEvent::LinkDeleted(removed.id.clone()));
        Some(removed)
    }

    // ==================== Queries ====================

    /// Links whose url or platform contains `query`, ignoring case
    ///
    /// An empty query returns everything. Insertion order is kept.
    pub fn search(&self, query: &str) -> Vec<LinkRecord> {
        let needle = query.to_lowercase();
        self.links
            .iter()
            .filter(|l| needle.is_empty() || l.matches(&needle))
            .cloned()
            .collect()
    }

    /// All links in insertion order
    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    /// Get a link by id
    pub fn get(&self, id: &LinkId) -> Option<&LinkRecord> {
        self.links.iter().find(|l| &l.id == id)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Sum of click counters across all links
    pub fn total_clicks(&self) -> u64 {
        self.links.iter().map(|l| l.clicks).sum()
    }

    /// The storage key this registry writes to
    pub fn key(&self) -> &str {
        &self.key
    }

    // ==================== Durability ====================

    /// False while the latest write-through has failed
    pub fn is_durable(&self) -> bool {
        self.persist_error.is_none()
    }

    /// Error from the latest failed write-through, if any
    pub fn last_persist_error(&self) -> Option<&StorageError> {
        self.persist_error.as_ref()
    }

    /// Retry writing the current state
    ///
    /// Returns whether the write succeeded.
    pub fn flush(&mut self) -> bool {
        self.persist();
        self.is_durable()
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        self.storage.store()
    }

    /// Get mutable access to the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        self.storage.store_mut()
    }

    /// Give back the underlying store
    pub fn into_store(self) -> S {
        self.storage.into_inner()
    }

    // ==================== Events ====================

    /// Receive events for every subsequent change
    pub fn subscribe(&mut self) -> Receiver<RegistryEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: RegistryEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn persist(&mut self) {
        match self.storage.save(&self.key, &self.links) {
            Ok(()) => self.persist_error = None,
            Err(e) => {
                let message = e.to_string();
                self.persist_error = Some(e);
                self.emit(RegistryEvent::PersistFailed(message));
            }
        }
    }

    /// An id no current record uses
    fn fresh_id(&mut self) -> LinkId {
        loop {
            let id = self.ids.next();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
