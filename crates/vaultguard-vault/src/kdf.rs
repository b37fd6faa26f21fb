// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase stretching and domain-separated key material.
//!
//! The passphrase is stretched once with PBKDF2-HMAC-SHA256 over a 256-bit
//! salt. The stretched secret is then expanded with HKDF-SHA256 under two
//! distinct info labels, one producing the AES-256-GCM key and one the
//! stored verification value. Neither output reveals the other.

use std::num::NonZeroU32;

use ring::{hkdf, pbkdf2};
use subtle::ConstantTimeEq;
use vaultguard_core::{RandomSource, VaultError};
use zeroize::Zeroizing;

use crate::random::random_array;

/// Salt length in bytes.
pub const SALT_LEN: usize = 32;

/// Length of the encryption key and of the verification value.
pub const KEY_LEN: usize = 32;

const ENCRYPTION_KEY_LABEL: &[u8] = b"vaultguard/v1/encryption-key";
const VERIFICATION_LABEL: &[u8] = b"vaultguard/v1/verification";

/// A 256-bit AES-GCM key, zeroed when dropped.
///
/// Not `Clone`: the unlocked session is the only owner.
pub struct VaultKey(Zeroizing<[u8; KEY_LEN]>);

impl VaultKey {
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VaultKey([REDACTED])")
    }
}

/// Output of [`derive`]: the session key plus the value stored for unlock checks.
pub struct DerivedKeyMaterial {
    pub key: VaultKey,
    pub verification_value: [u8; KEY_LEN],
}

impl DerivedKeyMaterial {
    /// Constant-time comparison against a stored verification value.
    pub fn verifies(&self, stored: &[u8]) -> bool {
        self.verification_value[..].ct_eq(stored).into()
    }
}

impl std::fmt::Debug for DerivedKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeyMaterial")
            .field("key", &"[REDACTED]")
            .field("verification_value", &"[REDACTED]")
            .finish()
    }
}

/// Derive the key and verification value from `passphrase` and `salt`.
///
/// Deterministic for a given (passphrase, salt, iterations). CPU-bound by
/// design; async callers should run it on a blocking thread.
pub fn derive(
    passphrase: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<DerivedKeyMaterial, VaultError> {
    let rounds = NonZeroU32::new(iterations)
        .ok_or_else(|| VaultError::Derivation("iteration count must be non-zero".to_string()))?;

    let mut stretched = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        rounds,
        salt,
        passphrase,
        &mut stretched[..],
    );

    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, salt).extract(&stretched[..]);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    expand(&prk, ENCRYPTION_KEY_LABEL, &mut key[..])?;

    let mut verification_value = [0u8; KEY_LEN];
    expand(&prk, VERIFICATION_LABEL, &mut verification_value)?;

    Ok(DerivedKeyMaterial {
        key: VaultKey(key),
        verification_value,
    })
}

fn expand(prk: &hkdf::Prk, label: &[u8], out: &mut [u8]) -> Result<(), VaultError> {
    let info = [label];
    prk.expand(&info, hkdf::HKDF_SHA256)
        .and_then(|okm| okm.fill(out))
        .map_err(|_| VaultError::Derivation("HKDF expansion failed".to_string()))
}

/// Draw a fresh random salt.
pub fn generate_salt(random: &dyn RandomSource) -> Result<[u8; SALT_LEN], VaultError> {
    random_array(random)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SystemRandomSource;

    // Low cost for fast tests.
    const ROUNDS: u32 = 1_000;

    #[test]
    fn derive_is_deterministic() {
        let salt = [1u8; SALT_LEN];
        let a = derive(b"test passphrase", &salt, ROUNDS).unwrap();
        let b = derive(b"test passphrase", &salt, ROUNDS).unwrap();

        assert_eq!(a.key.as_bytes(), b.key.as_bytes());
        assert_eq!(a.verification_value, b.verification_value);
    }

    #[test]
    fn key_and_verification_value_are_independent() {
        let m = derive(b"passphrase", &[3u8; SALT_LEN], ROUNDS).unwrap();
        assert_ne!(m.key.as_bytes(), &m.verification_value);
    }

    #[test]
    fn different_passphrase_changes_both_outputs() {
        let salt = [2u8; SALT_LEN];
        let a = derive(b"passphrase one", &salt, ROUNDS).unwrap();
        let b = derive(b"passphrase two", &salt, ROUNDS).unwrap();

        assert_ne!(a.key.as_bytes(), b.key.as_bytes());
        assert_ne!(a.verification_value, b.verification_value);
    }

    #[test]
    fn different_salt_changes_output() {
        let a = derive(b"same", &[1u8; SALT_LEN], ROUNDS).unwrap();
        let b = derive(b"same", &[2u8; SALT_LEN], ROUNDS).unwrap();
        assert_ne!(a.verification_value, b.verification_value);
    }

    #[test]
    fn different_iterations_change_output() {
        let salt = [4u8; SALT_LEN];
        let a = derive(b"same", &salt, ROUNDS).unwrap();
        let b = derive(b"same", &salt, ROUNDS + 1).unwrap();
        assert_ne!(a.verification_value, b.verification_value);
    }

    #[test]
    fn zero_iterations_is_a_derivation_error() {
        let err = derive(b"x", &[0u8; SALT_LEN], 0).unwrap_err();
        assert!(matches!(err, VaultError::Derivation(_)));
    }

    #[test]
    fn verifies_matches_only_the_same_value() {
        let m = derive(b"pw", &[5u8; SALT_LEN], ROUNDS).unwrap();
        let stored = m.verification_value;
        assert!(m.verifies(&stored));

        let mut flipped = stored;
        flipped[31] ^= 0x80;
        assert!(!m.verifies(&flipped));
        assert!(!m.verifies(&stored[..16]));
    }

    #[test]
    fn debug_output_is_redacted() {
        let m = derive(b"pw", &[6u8; SALT_LEN], ROUNDS).unwrap();
        assert_eq!(format!("{:?}", m.key), "VaultKey([REDACTED])");
        assert_eq!(
            format!("{m:?}"),
            "DerivedKeyMaterial { key: \"[REDACTED]\", verification_value: \"[REDACTED]\" }"
        );
    }

    #[test]
    fn generated_salts_differ() {
        let random = SystemRandomSource::new();
        let a = generate_salt(&random).unwrap();
        let b = generate_salt(&random).unwrap();
        assert_ne!(a, b);
    }
}
