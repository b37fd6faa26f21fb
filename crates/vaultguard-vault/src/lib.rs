// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted credential vault engine for VaultGuard.
//!
//! A master passphrase is stretched with PBKDF2-HMAC-SHA256 and split by
//! HKDF into an AES-256-GCM key and an independent verification value. The
//! credential collection is sealed as one JSON payload and persisted, with
//! the salt and verification value, as a single text envelope in an
//! injected [`EnvelopeStore`](vaultguard_core::EnvelopeStore).
//!
//! Also provides the password generator and strength estimator, which need
//! nothing but a random source.

pub mod crypto;
pub mod envelope;
pub mod generator;
pub mod kdf;
pub mod random;
pub mod records;
pub mod store;
pub mod strength;
pub mod vault;

pub use envelope::StoredEnvelope;
pub use generator::GeneratorOptions;
pub use random::{RngSource, SystemClock, SystemRandomSource};
pub use records::VaultStatistics;
pub use store::{ConfiguredStore, MemoryStore, SqliteStore};
pub use strength::{StrengthLabel, StrengthReport};
pub use vault::{Vault, VaultSettings};

use vaultguard_core::VaultError;

/// Generate a password from the OS random source.
pub fn generate_password(options: &GeneratorOptions) -> Result<String, VaultError> {
    generator::generate(options, &SystemRandomSource::new())
}

/// Score a password. See [`strength::estimate`].
pub fn estimate_strength(password: &str) -> StrengthReport {
    strength::estimate(password)
}

/// Fresh record id from the OS random source.
pub fn new_record_id() -> Result<String, VaultError> {
    records::new_record_id(&SystemRandomSource::new())
}
