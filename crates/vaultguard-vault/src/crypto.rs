// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Low-level AES-256-GCM seal/open operations.
//!
//! Every call to [`seal`] draws a fresh random 96-bit nonce from the supplied
//! [`RandomSource`] and prepends it to the output. Nonce reuse under one key
//! would be catastrophic for GCM security.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM, NONCE_LEN};
use vaultguard_core::{RandomSource, VaultError};
use zeroize::Zeroizing;

use crate::kdf::VaultKey;
use crate::random::random_array;

/// GCM authentication tag length.
pub const TAG_LEN: usize = 16;

/// Shortest blob [`open`] will attempt: a nonce and an empty payload's tag.
pub const MIN_SEALED_LEN: usize = NONCE_LEN + TAG_LEN;

fn aead_key(key: &VaultKey) -> Result<LessSafeKey, VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes())
        .map_err(|_| VaultError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext`, returning `nonce ‖ ciphertext ‖ tag`.
pub fn seal(
    key: &VaultKey,
    plaintext: &[u8],
    random: &dyn RandomSource,
) -> Result<Vec<u8>, VaultError> {
    let less_safe = aead_key(key)?;
    let nonce_bytes: [u8; NONCE_LEN] = random_array(random)?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + plaintext.len() + TAG_LEN);
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(plaintext);

    // Seal in place after the nonce prefix; the tag is appended.
    let mut body = sealed.split_off(NONCE_LEN);
    less_safe
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::empty(),
            &mut body,
        )
        .map_err(|_| VaultError::Internal("AES-256-GCM encryption failed".to_string()))?;
    sealed.extend_from_slice(&body);

    Ok(sealed)
}

/// Split a sealed blob into nonce and ciphertext and decrypt it.
///
/// Any tag mismatch, truncation, or wrong key is reported as
/// [`VaultError::Authentication`]. No partial plaintext is ever returned.
pub fn open(key: &VaultKey, sealed: &[u8]) -> Result<Zeroizing<Vec<u8>>, VaultError> {
    if sealed.len() < MIN_SEALED_LEN {
        return Err(VaultError::Authentication);
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
    let nonce =
        Nonce::try_assume_unique_for_key(nonce_bytes).map_err(|_| VaultError::Authentication)?;

    let less_safe = aead_key(key)?;
    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext_len = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::Authentication)?
        .len();
    in_out.truncate(plaintext_len);

    Ok(in_out)
}

/// Nonce prefix of a sealed blob, if it is long enough to carry one.
pub fn nonce_of(sealed: &[u8]) -> Option<[u8; NONCE_LEN]> {
    sealed.get(..NONCE_LEN)?.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf;
    use crate::random::SystemRandomSource;

    fn test_key(seed: u8) -> VaultKey {
        kdf::derive(b"cipher test", &[seed; kdf::SALT_LEN], 1_000)
            .unwrap()
            .key
    }

    #[test]
    fn seal_open_roundtrip() {
        let random = SystemRandomSource::new();
        let key = test_key(1);
        let sealed = seal(&key, b"{\"entries\":[],\"version\":1}", &random).unwrap();
        let opened = open(&key, &sealed).unwrap();
        assert_eq!(opened.as_slice(), b"{\"entries\":[],\"version\":1}");
    }

    #[test]
    fn output_layout_is_nonce_ciphertext_tag() {
        let random = SystemRandomSource::new();
        let sealed = seal(&test_key(1), b"hello", &random).unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + 5 + TAG_LEN);
    }

    #[test]
    fn same_plaintext_seals_differently() {
        let random = SystemRandomSource::new();
        let key = test_key(1);
        let a = seal(&key, b"same input twice", &random).unwrap();
        let b = seal(&key, b"same input twice", &random).unwrap();

        assert_ne!(nonce_of(&a), nonce_of(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn wrong_key_is_an_authentication_error() {
        let random = SystemRandomSource::new();
        let sealed = seal(&test_key(1), b"secret data", &random).unwrap();
        let err = open(&test_key(2), &sealed).unwrap_err();
        assert!(matches!(err, VaultError::Authentication));
    }

    #[test]
    fn every_single_byte_flip_is_detected() {
        let random = SystemRandomSource::new();
        let key = test_key(1);
        let sealed = seal(&key, b"do not tamper", &random).unwrap();

        for i in 0..sealed.len() {
            let mut tampered = sealed.clone();
            tampered[i] ^= 0x01;
            assert!(
                matches!(open(&key, &tampered), Err(VaultError::Authentication)),
                "flip at byte {i} went undetected"
            );
        }
    }

    #[test]
    fn truncation_is_detected() {
        let random = SystemRandomSource::new();
        let key = test_key(1);
        let sealed = seal(&key, b"payload", &random).unwrap();

        assert!(matches!(
            open(&key, &sealed[..sealed.len() - 1]),
            Err(VaultError::Authentication)
        ));
        assert!(matches!(open(&key, &sealed[..5]), Err(VaultError::Authentication)));
        assert!(matches!(open(&key, &[]), Err(VaultError::Authentication)));
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let random = SystemRandomSource::new();
        let key = test_key(1);
        let sealed = seal(&key, b"", &random).unwrap();
        assert_eq!(sealed.len(), MIN_SEALED_LEN);
        assert!(open(&key, &sealed).unwrap().is_empty());
    }
}
