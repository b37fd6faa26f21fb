// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./vaultguard.toml` > `~/.config/vaultguard/vaultguard.toml`
//! > `/etc/vaultguard/vaultguard.toml` with environment variable overrides via the
//! `VAULTGUARD_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::VaultGuardConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/vaultguard/vaultguard.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "vaultguard.toml";

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "VAULTGUARD_";

/// Sections that env var names are mapped onto, e.g. `VAULTGUARD_VAULT_KDF_ITERATIONS`.
const SECTIONS: &[&str] = &["vault", "generator", "session", "storage"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/vaultguard/vaultguard.toml` (system-wide)
/// 3. `~/.config/vaultguard/vaultguard.toml` (user XDG config)
/// 4. `./vaultguard.toml` (local directory)
/// 5. `VAULTGUARD_*` environment variables
pub fn load_config() -> Result<VaultGuardConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<VaultGuardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VaultGuardConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VaultGuardConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VaultGuardConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the layered Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VaultGuardConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// `~/.config/vaultguard/vaultguard.toml`, if the platform has a config dir.
pub fn user_config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|d| d.join("vaultguard").join(LOCAL_CONFIG_FILE))
}

/// Map `VAULTGUARD_<SECTION>_<KEY>` onto `<section>.<key>`.
///
/// Uses an explicit section list instead of `Env::split("_")` because keys
/// such as `kdf_iterations` contain underscores themselves. Keys reach the
/// closure in their original case, so they are lowercased before matching.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| {
        let key_str = key.as_str().to_ascii_lowercase();
        for section in SECTIONS {
            if let Some(rest) = key_str
                .strip_prefix(section)
                .and_then(|r| r.strip_prefix('_'))
            {
                return format!("{section}.{rest}").into();
            }
        }
        key_str.into()
    })
}
