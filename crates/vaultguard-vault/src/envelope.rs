// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stored envelope codec.
//!
//! The envelope is the only thing persisted. On the wire it is a JSON object
//! with base64 binary fields:
//!
//! ```json
//! {"salt":"...","verificationValue":"...","ciphertext":"...","kdfIterations":600000}
//! ```
//!
//! `kdfIterations` is optional and defaults to the standard work factor, so
//! blobs written before the field existed still decode. It must lie in
//! `1..=MAX_KDF_ITERATIONS`; anything else is rejected before a KDF runs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use vaultguard_config::model::{DEFAULT_KDF_ITERATIONS, MAX_KDF_ITERATIONS};
use vaultguard_core::VaultError;

use crate::crypto::MIN_SEALED_LEN;
use crate::kdf::{KEY_LEN, SALT_LEN};

/// Decoded form of the persisted blob.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredEnvelope {
    pub salt: [u8; SALT_LEN],
    pub verification_value: [u8; KEY_LEN],
    /// `nonce ‖ ciphertext ‖ tag`.
    pub ciphertext: Vec<u8>,
    pub kdf_iterations: u32,
}

impl std::fmt::Debug for StoredEnvelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredEnvelope")
            .field("salt", &"[REDACTED]")
            .field("verification_value", &"[REDACTED]")
            .field("ciphertext_len", &self.ciphertext.len())
            .field("kdf_iterations", &self.kdf_iterations)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope {
    salt: String,
    verification_value: String,
    ciphertext: String,
    #[serde(default = "default_kdf_iterations")]
    kdf_iterations: u32,
}

fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}

impl StoredEnvelope {
    /// Encode into the single string value written to the store.
    pub fn encode(&self) -> Result<String, VaultError> {
        let wire = WireEnvelope {
            salt: STANDARD.encode(self.salt),
            verification_value: STANDARD.encode(self.verification_value),
            ciphertext: STANDARD.encode(&self.ciphertext),
            kdf_iterations: self.kdf_iterations,
        };
        serde_json::to_string(&wire).map_err(|e| VaultError::Serialization(e.to_string()))
    }

    /// Decode a stored string.
    ///
    /// Every failure, from non-JSON input to a wrong-length salt, is a
    /// [`VaultError::Format`]; nothing here is an authentication failure.
    pub fn decode(blob: &str) -> Result<Self, VaultError> {
        let wire: WireEnvelope = serde_json::from_str(blob)
            .map_err(|e| VaultError::Format(format!("envelope is not valid JSON: {e}")))?;

        let salt = decode_fixed::<SALT_LEN>("salt", &wire.salt)?;
        let verification_value =
            decode_fixed::<KEY_LEN>("verificationValue", &wire.verification_value)?;
        let ciphertext = decode_field("ciphertext", &wire.ciphertext)?;
        if ciphertext.len() < MIN_SEALED_LEN {
            return Err(VaultError::Format(format!(
                "ciphertext is {} bytes, shorter than nonce and tag",
                ciphertext.len()
            )));
        }
        check_iterations(wire.kdf_iterations)?;

        Ok(Self {
            salt,
            verification_value,
            ciphertext,
            kdf_iterations: wire.kdf_iterations,
        })
    }
}

/// Reject work factors of zero or above [`MAX_KDF_ITERATIONS`].
pub fn check_iterations(iterations: u32) -> Result<(), VaultError> {
    if iterations == 0 || iterations > MAX_KDF_ITERATIONS {
        return Err(VaultError::Format(format!(
            "kdfIterations must be between 1 and {MAX_KDF_ITERATIONS}, got {iterations}"
        )));
    }
    Ok(())
}

fn decode_field(field: &str, value: &str) -> Result<Vec<u8>, VaultError> {
    STANDARD
        .decode(value)
        .map_err(|e| VaultError::Format(format!("{field} is not valid base64: {e}")))
}

fn decode_fixed<const N: usize>(field: &str, value: &str) -> Result<[u8; N], VaultError> {
    let bytes = decode_field(field, value)?;
    let len = bytes.len();
    bytes
        .try_into()
        .map_err(|_| VaultError::Format(format!("{field} must be {N} bytes, got {len}")))
}
