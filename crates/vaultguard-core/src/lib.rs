// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the VaultGuard credential store.
//!
//! This crate provides the error taxonomy, the collaborator traits the vault
//! engine consumes (store, random source, clock), and the credential data
//! model that lives inside the encrypted payload.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{FailureKind, VaultError, GENERIC_UNLOCK_MESSAGE};
pub use traits::{Clock, EnvelopeStore, RandomSource};
pub use types::{Category, CredentialRecord, VaultContents, SCHEMA_VERSION};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_collapse_to_closed_set() {
        assert_eq!(VaultError::NotFound.kind(), FailureKind::NoVault);
        assert_eq!(VaultError::InvalidPassphrase.kind(), FailureKind::WrongPassphrase);
        assert_eq!(VaultError::Authentication.kind(), FailureKind::CorruptVault);
        assert_eq!(VaultError::Format("bad".into()).kind(), FailureKind::CorruptVault);
        assert_eq!(VaultError::Derivation("x".into()).kind(), FailureKind::Fatal);
        assert_eq!(VaultError::Random("x".into()).kind(), FailureKind::Fatal);
        assert_eq!(
            VaultError::storage(std::io::Error::other("disk")).kind(),
            FailureKind::Fatal
        );
        assert_eq!(VaultError::Locked.kind(), FailureKind::Fatal);
    }

    #[test]
    fn unlock_failures_share_one_user_message() {
        let messages = [
            VaultError::NotFound.user_message(),
            VaultError::InvalidPassphrase.user_message(),
            VaultError::Authentication.user_message(),
            VaultError::Format("missing salt".into()).user_message(),
        ];
        for m in &messages {
            assert_eq!(m, GENERIC_UNLOCK_MESSAGE);
        }
    }

    #[test]
    fn fatal_errors_keep_their_detail() {
        let msg = VaultError::Derivation("primitive failed".into()).user_message();
        assert!(msg.contains("primitive failed"));
    }

    #[test]
    fn empty_contents_start_at_current_schema() {
        let contents = VaultContents::new();
        assert!(contents.is_empty());
        assert_eq!(contents.schema_version, SCHEMA_VERSION);
    }

    proptest::proptest! {
        #[test]
        fn contents_json_round_trips(titles in proptest::collection::vec("[a-zA-Z0-9 ]{0,12}", 0..8)) {
            let mut contents = VaultContents::new();
            for (i, title) in titles.iter().enumerate() {
                contents.entries.push(CredentialRecord {
                    id: format!("id{i}"),
                    title: title.clone(),
                    username: String::new(),
                    secret: title.repeat(2),
                    url: String::new(),
                    notes: String::new(),
                    category: Category::Work,
                    created_at: i as i64,
                    updated_at: i as i64,
                });
            }
            let json = serde_json::to_string(&contents).unwrap();
            let back: VaultContents = serde_json::from_str(&json).unwrap();
            proptest::prop_assert_eq!(back, contents);
        }
    }
}
