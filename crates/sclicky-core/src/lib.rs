//! Sclicky Core Library
//!
//! This crate provides the core of Sclicky, a local-first personal link
//! registry: saved URLs tagged with a platform label, each with a counter of
//! how many times it was opened through the app.
//!
//! # Architecture
//!
//! - **LinkRegistry**: the in-memory, validated, ordered list of links
//! - **LinkStorage**: write-through persistence of the whole list as JSON
//! - **KeyValueStore**: the synchronous storage primitive underneath
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let mut registry = LinkRegistry::open(config.file_store(), &config.storage_key);
//!
//! let link = registry.add_link("https://twitter.com/alice", Some(Platform::Twitter))?;
//! registry.record_click(&link.id)?;
//!
//! let hits = registry.search("twitter");
//! ```
//!
//! # Modules
//!
//! - `registry`: link registry (main entry point)
//! - `models`: link record, id and platform types
//! - `validation`: URL shape checks
//! - `storage`: key-value stores and the persistence adapter
//! - `config`: application configuration

pub mod config;
pub mod models;
pub mod registry;
pub mod storage;
pub mod validation;

pub use config::Config;
pub use models::{LinkId, LinkRecord, Platform};
pub use registry::{LinkRegistry, RegistryError, RegistryEvent};
pub use storage::{FileStore, KeyValueStore, LinkStorage, MemoryStore, StorageError};
pub use validation::{validate_url, ValidationError};
