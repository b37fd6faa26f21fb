// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the VaultGuard engine.

use thiserror::Error;

/// Generic rejection shown to the end user for any unlock or rotation failure.
pub const GENERIC_UNLOCK_MESSAGE: &str = "cannot unlock vault";

/// The primary error type used across the vault engine and its collaborators.
///
/// Variants are deliberately fine-grained for internal diagnosis. Callers
/// outside the engine should branch on [`VaultError::kind`] instead.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No envelope is present in the store.
    #[error("no vault found")]
    NotFound,

    /// The supplied passphrase did not produce the stored verification value.
    #[error("invalid passphrase")]
    InvalidPassphrase,

    /// The ciphertext failed tag verification although the passphrase checked out.
    #[error("vault ciphertext failed authentication")]
    Authentication,

    /// The stored envelope or decrypted payload is malformed.
    #[error("malformed vault envelope: {0}")]
    Format(String),

    /// The key derivation primitive failed.
    #[error("key derivation failed: {0}")]
    Derivation(String),

    /// The secure random source failed.
    #[error("random source failure: {0}")]
    Random(String),

    /// The persistence backend failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Contents could not be serialized for sealing.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The operation needs an unlocked session.
    #[error("vault is locked")]
    Locked,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Closed set of failure outcomes exposed to code outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Unlock attempted before the vault was initialized.
    NoVault,
    /// The passphrase was rejected.
    WrongPassphrase,
    /// The stored data is damaged or was tampered with.
    CorruptVault,
    /// Primitive, storage, or programming failure. Not recoverable by retrying.
    Fatal,
}

impl VaultError {
    /// Wrap a storage backend error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }

    /// Collapse this error into the outward-facing outcome set.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound => FailureKind::NoVault,
            Self::InvalidPassphrase => FailureKind::WrongPassphrase,
            Self::Authentication | Self::Format(_) => FailureKind::CorruptVault,
            Self::Derivation(_)
            | Self::Random(_)
            | Self::Storage { .. }
            | Self::Serialization(_)
            | Self::Locked
            | Self::Internal(_) => FailureKind::Fatal,
        }
    }

    /// Message safe to show the end user.
    ///
    /// Every recoverable unlock failure renders identically so the cause is
    /// never revealed.
    pub fn user_message(&self) -> String {
        match self.kind() {
            FailureKind::Fatal => self.to_string(),
            _ => GENERIC_UNLOCK_MESSAGE.to_string(),
        }
    }
}
