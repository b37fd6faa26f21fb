// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the VaultGuard configuration system.

use vaultguard_config::diagnostic::ConfigError;
use vaultguard_config::{load_and_validate_str, load_config_from_str, StorageBackend};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[vault]
kdf_iterations = 650000
storage_key = "my_vault"

[generator]
length = 24
symbols = false
exclude_ambiguous = false

[session]
auto_lock_secs = 900

[storage]
backend = "memory"
database_path = "/tmp/vault.db"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.vault.kdf_iterations, 650_000);
    assert_eq!(config.vault.storage_key, "my_vault");
    assert_eq!(config.generator.length, 24);
    assert!(!config.generator.symbols);
    assert!(config.generator.numbers);
    assert!(!config.generator.exclude_ambiguous);
    assert_eq!(config.session.auto_lock_secs, 900);
    assert_eq!(config.storage.backend, StorageBackend::Memory);
    assert_eq!(config.storage.database_path, "/tmp/vault.db");
}

/// Empty input yields the compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_and_validate_str("").expect("defaults validate");
    assert_eq!(config.vault.kdf_iterations, 600_000);
    assert_eq!(config.vault.storage_key, "vaultguard_vault");
}

/// A misspelled key becomes an UnknownKey diagnostic with a suggestion.
#[test]
fn typo_in_vault_section_suggests_correction() {
    let toml = r#"
[vault]
kdf_iteratons = 700000
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion: Some(s), .. }
            if key == "kdf_iteratons" && s == "kdf_iterations"
    )));
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[sync]\nenabled = true\n").expect_err("no sync section");
    assert!(!errors.is_empty());
}

/// Wrong value type surfaces as InvalidType.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[generator]\nlength = \"long\"\n")
        .expect_err("length must be an integer");
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })));
}

/// Values that parse but break constraints fail validation.
#[test]
fn weak_kdf_fails_validation() {
    let errors = load_and_validate_str("[vault]\nkdf_iterations = 1000\n")
        .expect_err("below the work-factor floor");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("kdf_iterations"))
    ));
}
