//! # Storage: engine state persistence
//!
//! The engine persists its state through the [`StorageAdapter`] trait and
//! never assumes a particular backing store. Each adapter instance is
//! addressed by a single key; distinct keys never interfere, while two
//! adapters sharing a key are last-write-wins.
//!
//! ## Implementations
//!
//! | Type            | Persistence | Use case                | Feature  |
//! |-----------------|-------------|-------------------------|----------|
//! | [`MemoryStorage`] | In-memory | Dev, tests              | —        |
//! | [`SqliteStorage`] | SQLite file | Single-node, production | `sqlite` |
//!
//! State is stored as a JSON blob; `completed_steps` serializes as an
//! ordered sequence, so blobs are portable across backends.

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::engine::EngineState;

pub use memory::MemoryStorage;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStorage;

/// Storage key used when the caller does not supply one.
pub const DEFAULT_STORAGE_KEY: &str = "formgraph-state";

/// Failure in a storage adapter.
///
/// The engine propagates save/clear failures to the caller and absorbs load
/// failures as "no saved state".
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store failed (I/O, database error).
    #[error("storage backend failed: {0}")]
    Backend(String),

    /// The state blob could not be serialized or deserialized.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Opaque persistence of serialized engine state, keyed per adapter
/// instance.
///
/// **Interaction**: held by the engine as `Arc<dyn StorageAdapter>`; `save`
/// runs after every committed mutation, `load` once at `start`, `clear` at
/// `reset`.
#[async_trait]
pub trait StorageAdapter: Send + Sync {
    async fn save(&self, state: &EngineState) -> Result<(), StorageError>;
    async fn load(&self) -> Result<Option<EngineState>, StorageError>;
    async fn clear(&self) -> Result<(), StorageError>;
}
