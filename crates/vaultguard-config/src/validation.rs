// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the KDF work-factor floor and generator length bounds.

use crate::diagnostic::ConfigError;
use crate::model::{StorageBackend, VaultGuardConfig, AUTO_LOCK_CHOICES, MAX_KDF_ITERATIONS, MIN_KDF_ITERATIONS};

/// Inclusive bounds for generated password length.
pub const GENERATOR_LENGTH_RANGE: std::ops::RangeInclusive<usize> = 4..=64;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &VaultGuardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !(MIN_KDF_ITERATIONS..=MAX_KDF_ITERATIONS).contains(&config.vault.kdf_iterations) {
        fail(format!(
            "vault.kdf_iterations must be between {MIN_KDF_ITERATIONS} and {MAX_KDF_ITERATIONS}, got {}",
            config.vault.kdf_iterations
        ));
    }

    if config.vault.storage_key.trim().is_empty() {
        fail("vault.storage_key must not be empty".to_string());
    }

    if !GENERATOR_LENGTH_RANGE.contains(&config.generator.length) {
        fail(format!(
            "generator.length must be between {} and {}, got {}",
            GENERATOR_LENGTH_RANGE.start(),
            GENERATOR_LENGTH_RANGE.end(),
            config.generator.length
        ));
    }

    if !AUTO_LOCK_CHOICES.contains(&config.session.auto_lock_secs) {
        fail(format!(
            "session.auto_lock_secs must be one of {AUTO_LOCK_CHOICES:?}, got {}",
            config.session.auto_lock_secs
        ));
    }

    if config.storage.backend == StorageBackend::Sqlite
        && config.storage.database_path.trim().is_empty()
    {
        fail("storage.database_path must not be empty for the sqlite backend".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
