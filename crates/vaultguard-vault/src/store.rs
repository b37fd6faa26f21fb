// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`EnvelopeStore`] implementations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, OptionalExtension};
use tracing::debug;
use vaultguard_config::model::{StorageBackend, StorageConfig};
use vaultguard_core::{EnvelopeStore, VaultError};

/// Process-local store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, VaultError> {
        self.values
            .lock()
            .map_err(|_| VaultError::Internal("memory store mutex poisoned".to_string()))
    }
}

#[async_trait]
impl EnvelopeStore for MemoryStore {
    async fn get(&self, name: &str) -> Result<Option<String>, VaultError> {
        Ok(self.lock()?.get(name).cloned())
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), VaultError> {
        self.lock()?.insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), VaultError> {
        self.lock()?.remove(name);
        Ok(())
    }
}

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS vault_blobs (
    name TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);";

/// SQLite-backed store.
///
/// All operations go through the single tokio-rusqlite background thread.
/// Each `set` runs in its own transaction, so a crash mid-write leaves the
/// previous value intact.
pub struct SqliteStore {
    conn: tokio_rusqlite::Connection,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

impl SqliteStore {
    /// Wrap an existing connection, creating the table if needed.
    pub async fn from_connection(conn: tokio_rusqlite::Connection) -> Result<Self, VaultError> {
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        Ok(Self { conn })
    }

    /// Open (or create) a database file.
    pub async fn open(path: impl AsRef<std::path::Path>) -> Result<Self, VaultError> {
        let conn = tokio_rusqlite::Connection::open(path.as_ref())
            .await
            .map_err(VaultError::storage)?;
        Self::from_connection(conn).await
    }

    /// Open a private in-memory database.
    pub async fn open_in_memory() -> Result<Self, VaultError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(VaultError::storage)?;
        Self::from_connection(conn).await
    }
}

#[async_trait]
impl EnvelopeStore for SqliteStore {
    async fn get(&self, name: &str) -> Result<Option<String>, VaultError> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM vault_blobs WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), VaultError> {
        let name = name.to_string();
        let value = value.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR REPLACE INTO vault_blobs (name, value) VALUES (?1, ?2)",
                    params![name, value],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn remove(&self, name: &str) -> Result<(), VaultError> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute("DELETE FROM vault_blobs WHERE name = ?1", params![name])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// The store selected by the `[storage]` config section.
#[derive(Debug)]
pub enum ConfiguredStore {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl ConfiguredStore {
    /// Build the configured backend. For SQLite the parent directory of
    /// `database_path` is created if missing.
    pub async fn open(config: &StorageConfig) -> Result<Self, VaultError> {
        match config.backend {
            StorageBackend::Memory => Ok(Self::Memory(MemoryStore::new())),
            StorageBackend::Sqlite => {
                let path = std::path::Path::new(&config.database_path);
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(VaultError::storage)?;
                }
                debug!(path = %path.display(), "opening sqlite envelope store");
                Ok(Self::Sqlite(SqliteStore::open(path).await?))
            }
        }
    }
}

#[async_trait]
impl EnvelopeStore for ConfiguredStore {
    async fn get(&self, name: &str) -> Result<Option<String>, VaultError> {
        match self {
            Self::Memory(store) => store.get(name).await,
            Self::Sqlite(store) => store.get(name).await,
        }
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), VaultError> {
        match self {
            Self::Memory(store) => store.set(name, value).await,
            Self::Sqlite(store) => store.set(name, value).await,
        }
    }

    async fn remove(&self, name: &str) -> Result<(), VaultError> {
        match self {
            Self::Memory(store) => store.remove(name).await,
            Self::Sqlite(store) => store.remove(name).await,
        }
    }
}

fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> VaultError {
    VaultError::storage(e)
}
