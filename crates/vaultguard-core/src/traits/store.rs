// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence boundary for the encoded vault envelope.

use async_trait::async_trait;

use crate::error::VaultError;

/// A get/set/remove store for named opaque strings.
///
/// The engine keeps exactly one value in it. Implementations must make `set`
/// replace the whole value atomically: a reader observes either the previous
/// value or the new one, never a mix.
#[async_trait]
pub trait EnvelopeStore: Send + Sync {
    /// Read the value stored under `name`, if any.
    async fn get(&self, name: &str) -> Result<Option<String>, VaultError>;

    /// Replace the value stored under `name`.
    async fn set(&self, name: &str, value: &str) -> Result<(), VaultError>;

    /// Remove the value stored under `name`. Removing an absent name succeeds.
    async fn remove(&self, name: &str) -> Result<(), VaultError>;
}
