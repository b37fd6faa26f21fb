// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for VaultGuard integration tests.
//!
//! Deterministic stand-ins for the collaborators the vault engine consumes.
//!
//! # Components
//!
//! - [`MockStore`] - In-memory envelope store that records writes and can fail on demand
//! - [`FixedClock`] - Controllable timestamps

pub mod mock_clock;
pub mod mock_store;

pub use mock_clock::FixedClock;
pub use mock_store::MockStore;

use vaultguard_config::model::VaultConfig;

/// KDF rounds used by tests. Far below the production floor.
pub const TEST_KDF_ITERATIONS: u32 = 1_000;

/// Store key used by tests.
pub const TEST_STORAGE_KEY: &str = "vaultguard_test";

/// Vault configuration with a cheap KDF for fast tests.
pub fn test_vault_config() -> VaultConfig {
    VaultConfig {
        kdf_iterations: TEST_KDF_ITERATIONS,
        storage_key: TEST_STORAGE_KEY.to_string(),
    }
}
