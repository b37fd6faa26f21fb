// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock envelope store for deterministic testing.
//!
//! `MockStore` implements `EnvelopeStore` over a shared map, keeps every
//! value ever written for later assertions, and can be told to reject
//! writes to simulate a failing backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use vaultguard_core::{EnvelopeStore, VaultError};

/// Error surfaced when writes are switched off.
#[derive(Debug, Error)]
#[error("injected storage failure")]
pub struct InjectedFailure;

/// An in-memory envelope store for tests. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<Vec<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MockStore {
    /// Create an empty store that accepts writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` and `remove` fail with a storage error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Overwrite a value directly, bypassing failure injection and history.
    pub async fn put_raw(&self, name: &str, value: &str) {
        self.values
            .lock()
            .await
            .insert(name.to_string(), value.to_string());
    }

    /// Current value under `name`.
    pub async fn raw(&self, name: &str) -> Option<String> {
        self.values.lock().await.get(name).cloned()
    }

    /// Every value accepted by `set`, oldest first.
    pub async fn written(&self) -> Vec<String> {
        self.writes.lock().await.clone()
    }

    /// Number of accepted `set` calls.
    pub async fn write_count(&self) -> usize {
        self.writes.lock().await.len()
    }

    fn check_writable(&self) -> Result<(), VaultError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VaultError::storage(InjectedFailure));
        }
        Ok(())
    }
}

#[async_trait]
impl EnvelopeStore for MockStore {
    async fn get(&self, name: &str) -> Result<Option<String>, VaultError> {
        Ok(self.raw(name).await)
    }

    async fn set(&self, name: &str, value: &str) -> Result<(), VaultError> {
        self.check_writable()?;
        self.values
            .lock()
            .await
            .insert(name.to_string(), value.to_string());
        self.writes.lock().await.push(value.to_string());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<(), VaultError> {
        self.check_writable()?;
        self.values.lock().await.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_writes_and_injects_failures() {
        let store = MockStore::new();
        store.set("k", "one").await.unwrap();
        store.set("k", "two").await.unwrap();
        assert_eq!(store.written().await, vec!["one", "two"]);

        store.fail_writes(true);
        let err = store.set("k", "three").await.unwrap_err();
        assert!(matches!(err, VaultError::Storage { .. }));
        assert!(err.to_string().contains("injected storage failure"));
        assert!(store.remove("k").await.is_err());
        assert_eq!(store.raw("k").await.as_deref(), Some("two"));
        assert_eq!(store.write_count().await, 2);
    }
}
