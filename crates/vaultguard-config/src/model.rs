// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for VaultGuard.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// PBKDF2-HMAC-SHA256 rounds used when nothing else is configured.
pub const DEFAULT_KDF_ITERATIONS: u32 = 600_000;

/// Lowest iteration count accepted by validation.
pub const MIN_KDF_ITERATIONS: u32 = 600_000;

/// Highest iteration count accepted anywhere, including stored envelopes.
///
/// Bounds how long an unlock can spend in PBKDF2 on a corrupt envelope.
pub const MAX_KDF_ITERATIONS: u32 = 10_000_000;

/// Auto-lock timeouts (seconds) the host timer understands. `0` disables it.
pub const AUTO_LOCK_CHOICES: &[u64] = &[0, 60, 300, 900, 1800];

/// Top-level VaultGuard configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultGuardConfig {
    /// Key derivation and envelope settings.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Default password generator options.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Unlocked session settings.
    #[serde(default)]
    pub session: SessionConfig,

    /// Envelope persistence settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Key derivation and envelope settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iteration count for new envelopes (default: 600000).
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Name of the single persisted blob (default: "vaultguard_vault").
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

fn default_storage_key() -> String {
    "vaultguard_vault".to_string()
}

/// Default password generator options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Generated password length (default: 16).
    #[serde(default = "default_length")]
    pub length: usize,

    #[serde(default = "default_true")]
    pub uppercase: bool,

    #[serde(default = "default_true")]
    pub lowercase: bool,

    #[serde(default = "default_true")]
    pub numbers: bool,

    #[serde(default = "default_true")]
    pub symbols: bool,

    /// Drop the visually ambiguous characters `I l 1 O 0`.
    #[serde(default = "default_true")]
    pub exclude_ambiguous: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
            exclude_ambiguous: true,
        }
    }
}

fn default_length() -> usize {
    16
}

fn default_true() -> bool {
    true
}

/// Unlocked session settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Inactivity timeout in seconds before the host locks the vault (0 = never).
    ///
    /// The engine holds no timers; the host's timer calls `lock()`.
    #[serde(default = "default_auto_lock_secs")]
    pub auto_lock_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            auto_lock_secs: default_auto_lock_secs(),
        }
    }
}

fn default_auto_lock_secs() -> u64 {
    300
}

/// Which envelope store the host should construct.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local, lost on exit.
    Memory,
    /// Single-table SQLite database.
    #[default]
    Sqlite,
}

/// Envelope persistence settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path to the SQLite database file (sqlite backend only).
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("vaultguard").join("vault.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("vaultguard.db"))
        .display()
        .to_string()
}
