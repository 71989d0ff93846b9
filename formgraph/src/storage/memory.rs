//! In-memory storage adapter.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::engine::EngineState;

use super::{StorageAdapter, StorageError, DEFAULT_STORAGE_KEY};

/// Pure in-memory storage for dev and tests.
///
/// Clones share one backend, so two engines can point at the same slot map
/// (same key: last-write-wins; distinct keys: isolated). All data is lost
/// when the last clone is dropped.
#[derive(Clone)]
pub struct MemoryStorage {
    slots: Arc<DashMap<String, Vec<u8>>>,
    key: String,
}

impl MemoryStorage {
    /// A fresh backend addressed by `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
            key: key.into(),
        }
    }

    /// Another handle on this backend, addressed by a different key.
    pub fn with_key(&self, key: impl Into<String>) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
            key: key.into(),
        }
    }

    /// The key this handle reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_KEY)
    }
}

#[async_trait]
impl StorageAdapter for MemoryStorage {
    async fn save(&self, state: &EngineState) -> Result<(), StorageError> {
        let blob =
            serde_json::to_vec(state).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.slots.insert(self.key.clone(), blob);
        Ok(())
    }

    async fn load(&self) -> Result<Option<EngineState>, StorageError> {
        match self.slots.get(&self.key) {
            Some(blob) => {
                let state = serde_json::from_slice(&blob)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.slots.remove(&self.key);
        Ok(())
    }
}
