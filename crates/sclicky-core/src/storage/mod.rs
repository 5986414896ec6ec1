//! Storage layer
//!
//! ## Architecture
//!
//! - **KeyValueStore**: raw synchronous `get`/`set` primitive
//! - **LinkStorage**: serializes the whole record sequence on every save and
//!   deserializes it once at startup
//!
//! Every save overwrites the entire value under the key.

pub mod error;
pub mod kv;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use persistence::LinkStorage;
