//! SQLite-backed storage adapter (feature `sqlite`).

use std::path::Path;

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension};
use tokio::sync::Mutex;

use crate::engine::EngineState;

use super::{StorageAdapter, StorageError};

fn backend(e: rusqlite::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

/// Persistent storage in a single SQLite key-value table.
///
/// One row per storage key, state as a JSON blob. The connection is
/// serialized behind a mutex; rusqlite is synchronous and the engine issues
/// one operation at a time anyway.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
    key: String,
}

impl SqliteStorage {
    /// Opens (creating if needed) the database at `path`, addressed by `key`.
    pub fn open(path: impl AsRef<Path>, key: impl Into<String>) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(backend)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS form_state (
                key   TEXT PRIMARY KEY,
                state TEXT NOT NULL
            )",
            [],
        )
        .map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: key.into(),
        })
    }

    /// In-memory database, for tests without a file.
    pub fn open_in_memory(key: impl Into<String>) -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(backend)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS form_state (
                key   TEXT PRIMARY KEY,
                state TEXT NOT NULL
            )",
            [],
        )
        .map_err(backend)?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: key.into(),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn save(&self, state: &EngineState) -> Result<(), StorageError> {
        let blob = serde_json::to_string(state)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO form_state (key, state) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET state = excluded.state",
            (&self.key, &blob),
        )
        .map_err(backend)?;
        Ok(())
    }

    async fn load(&self) -> Result<Option<EngineState>, StorageError> {
        let conn = self.conn.lock().await;
        let blob: Option<String> = conn
            .query_row(
                "SELECT state FROM form_state WHERE key = ?1",
                [&self.key],
                |row| row.get(0),
            )
            .optional()
            .map_err(backend)?;
        match blob {
            Some(blob) => {
                let state = serde_json::from_str(&blob)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM form_state WHERE key = ?1", [&self.key])
            .map_err(backend)?;
        Ok(())
    }
}
