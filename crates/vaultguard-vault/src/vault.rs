// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault lifecycle: initialize, unlock, save, rotate, lock, and destroy.
//!
//! The vault is one encoded [`StoredEnvelope`] under a single store key.
//! Uninitialized is observed from the store (no envelope). Locked and
//! Unlocked are tracked in memory; the unlocked session alone owns the key
//! and the decrypted contents, and both are dropped (the key zeroized) on
//! lock.
//!
//! Every write builds the complete envelope in memory first and persists it
//! with one `set`, so the stored salt, verification value, and ciphertext
//! always belong together.

use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, error, info, warn};
use vaultguard_config::model::{VaultConfig, VaultGuardConfig};
use vaultguard_core::{
    Clock, CredentialRecord, EnvelopeStore, RandomSource, VaultContents, VaultError,
};
use zeroize::Zeroizing;

use crate::crypto;
use crate::envelope::{self, StoredEnvelope};
use crate::kdf::{self, DerivedKeyMaterial, VaultKey, KEY_LEN, SALT_LEN};
use crate::random::{SystemClock, SystemRandomSource};
use crate::records;

/// Engine settings, usually built from [`VaultConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultSettings {
    /// Name of the single blob in the store.
    pub storage_key: String,
    /// PBKDF2 rounds for newly written envelopes.
    pub kdf_iterations: u32,
    /// Inactivity timeout the host's timer should arm; `None` disables it.
    ///
    /// The engine never locks on its own.
    pub auto_lock: Option<Duration>,
}

impl From<&VaultConfig> for VaultSettings {
    fn from(config: &VaultConfig) -> Self {
        Self {
            storage_key: config.storage_key.clone(),
            kdf_iterations: config.kdf_iterations,
            auto_lock: None,
        }
    }
}

impl From<&VaultGuardConfig> for VaultSettings {
    fn from(config: &VaultGuardConfig) -> Self {
        let secs = config.session.auto_lock_secs;
        Self {
            auto_lock: (secs > 0).then(|| Duration::from_secs(secs)),
            ..Self::from(&config.vault)
        }
    }
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self::from(&VaultGuardConfig::default())
    }
}

struct UnlockedSession {
    key: VaultKey,
    salt: [u8; SALT_LEN],
    verification_value: [u8; KEY_LEN],
    kdf_iterations: u32,
    contents: VaultContents,
}

/// The vault engine over an injected [`EnvelopeStore`].
///
/// Debug output intentionally omits key material and contents.
pub struct Vault<S> {
    store: S,
    random: Arc<dyn RandomSource>,
    clock: Arc<dyn Clock>,
    settings: VaultSettings,
    /// `None` while locked.
    session: Option<UnlockedSession>,
}

impl<S> std::fmt::Debug for Vault<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("settings", &self.settings)
            .field("unlocked", &self.is_unlocked())
            .field("session", &"[REDACTED]")
            .finish()
    }
}

impl<S: EnvelopeStore> Vault<S> {
    /// Create a locked vault using the OS random source and wall clock.
    pub fn new(store: S, settings: VaultSettings) -> Self {
        Self::with_sources(
            store,
            settings,
            Arc::new(SystemRandomSource::new()),
            Arc::new(SystemClock),
        )
    }

    /// Create a locked vault with explicit randomness and time sources.
    pub fn with_sources(
        store: S,
        settings: VaultSettings,
        random: Arc<dyn RandomSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            random,
            clock,
            settings,
            session: None,
        }
    }

    /// Whether an envelope exists in the store.
    pub async fn is_initialized(&self) -> Result<bool, VaultError> {
        Ok(self.store.get(&self.settings.storage_key).await?.is_some())
    }

    /// Create a new, empty vault protected by `passphrase` and unlock it.
    ///
    /// Refuses to overwrite an existing envelope; call [`Vault::destroy`]
    /// first to start over.
    pub async fn initialize(
        &mut self,
        passphrase: &SecretString,
    ) -> Result<&VaultContents, VaultError> {
        if self.is_initialized().await? {
            return Err(VaultError::Internal("vault already initialized".to_string()));
        }

        let iterations = self.write_iterations()?;
        let salt = kdf::generate_salt(self.random.as_ref())?;
        let material = derive_blocking(passphrase, salt, iterations).await?;

        let contents = VaultContents::new();
        let envelope = seal_envelope(
            self.random.as_ref(),
            &material.key,
            salt,
            material.verification_value,
            iterations,
            &contents,
        )?;
        self.store
            .set(&self.settings.storage_key, &envelope.encode()?)
            .await?;

        info!(kdf_iterations = iterations, "vault initialized");
        Ok(self.enter_session(UnlockedSession {
            key: material.key,
            salt,
            verification_value: material.verification_value,
            kdf_iterations: iterations,
            contents,
        }))
    }

    /// Unlock the stored vault.
    ///
    /// Nothing is exposed unless every step (decode, verify, decrypt, parse)
    /// succeeds. On failure an existing session is left untouched.
    pub async fn unlock(&mut self, passphrase: &SecretString) -> Result<&VaultContents, VaultError> {
        let session = self.open_session(passphrase).await?;
        debug!(entries = session.contents.len(), "vault unlocked");
        Ok(self.enter_session(session))
    }

    /// Persist `contents` under the session key and salt.
    ///
    /// A fresh nonce is drawn for every call. The in-memory contents are
    /// replaced only after the store accepted the new envelope.
    pub async fn save(&mut self, contents: VaultContents) -> Result<(), VaultError> {
        let Some(session) = self.session.as_mut() else {
            return Err(VaultError::Locked);
        };

        let envelope = seal_envelope(
            self.random.as_ref(),
            &session.key,
            session.salt,
            session.verification_value,
            session.kdf_iterations,
            &contents,
        )?;
        self.store
            .set(&self.settings.storage_key, &envelope.encode()?)
            .await?;

        session.contents = contents;
        debug!(entries = session.contents.len(), "vault saved");
        Ok(())
    }

    /// Re-key the vault under `new_passphrase`.
    ///
    /// `current` is checked against the stored envelope exactly as in
    /// [`Vault::unlock`]. The replacement envelope (new salt, verification
    /// value, and ciphertext) is written with a single `set`; if that fails
    /// the old envelope and the current session both stay in place. Works
    /// from the locked state too, leaving the vault unlocked on success.
    pub async fn rotate_passphrase(
        &mut self,
        current: &SecretString,
        new_passphrase: &SecretString,
    ) -> Result<(), VaultError> {
        let iterations = self.write_iterations()?;
        let authorized = self.open_session(current).await?;

        let salt = kdf::generate_salt(self.random.as_ref())?;
        let material = derive_blocking(new_passphrase, salt, iterations).await?;

        let envelope = seal_envelope(
            self.random.as_ref(),
            &material.key,
            salt,
            material.verification_value,
            iterations,
            &authorized.contents,
        )?;
        self.store
            .set(&self.settings.storage_key, &envelope.encode()?)
            .await?;

        self.enter_session(UnlockedSession {
            key: material.key,
            salt,
            verification_value: material.verification_value,
            kdf_iterations: iterations,
            contents: authorized.contents,
        });
        info!(kdf_iterations = iterations, "vault passphrase rotated");
        Ok(())
    }

    /// Discard the session key and contents. Infallible.
    pub fn lock(&mut self) {
        if self.session.take().is_some() {
            debug!("vault locked");
        }
    }

    /// Lock and remove the stored envelope. Irreversible and idempotent.
    ///
    /// Only a storage backend failure can make this return an error.
    pub async fn destroy(&mut self) -> Result<(), VaultError> {
        self.lock();
        self.store.remove(&self.settings.storage_key).await?;
        info!("vault destroyed");
        Ok(())
    }

    /// Build a new `Login` record with a fresh id, stamped with the vault's clock.
    ///
    /// The record is not stored until it is upserted and saved.
    pub fn new_record(&self, title: impl Into<String>) -> Result<CredentialRecord, VaultError> {
        let id = records::new_record_id(self.random.as_ref())?;
        Ok(CredentialRecord::new(id, title, self.clock.as_ref()))
    }

    /// Decode, verify, and decrypt the stored envelope without touching state.
    async fn open_session(&self, passphrase: &SecretString) -> Result<UnlockedSession, VaultError> {
        let blob = self
            .store
            .get(&self.settings.storage_key)
            .await?
            .ok_or(VaultError::NotFound)?;
        let envelope = StoredEnvelope::decode(&blob)?;

        let material = derive_blocking(passphrase, envelope.salt, envelope.kdf_iterations).await?;
        if !material.verifies(&envelope.verification_value) {
            warn!("vault unlock rejected");
            return Err(VaultError::InvalidPassphrase);
        }

        let plaintext = crypto::open(&material.key, &envelope.ciphertext).inspect_err(|e| {
            if matches!(e, VaultError::Authentication) {
                error!(
                    ciphertext_len = envelope.ciphertext.len(),
                    "vault ciphertext failed authentication"
                );
            }
        })?;
        let contents: VaultContents = serde_json::from_slice(&plaintext)
            .map_err(|e| VaultError::Format(format!("vault payload is not valid: {e}")))?;

        Ok(UnlockedSession {
            key: material.key,
            salt: envelope.salt,
            verification_value: envelope.verification_value,
            kdf_iterations: envelope.kdf_iterations,
            contents,
        })
    }

    /// Configured work factor, refused if no envelope written with it could
    /// be decoded again.
    fn write_iterations(&self) -> Result<u32, VaultError> {
        let iterations = self.settings.kdf_iterations;
        envelope::check_iterations(iterations).map_err(|_| {
            VaultError::Internal(format!("kdf_iterations {iterations} is out of range"))
        })?;
        Ok(iterations)
    }

    fn enter_session(&mut self, session: UnlockedSession) -> &VaultContents {
        &self.session.insert(session).contents
    }
}

impl<S> Vault<S> {
    /// Decrypted contents of the unlocked session.
    pub fn contents(&self) -> Option<&VaultContents> {
        self.session.as_ref().map(|session| &session.contents)
    }

    pub fn is_unlocked(&self) -> bool {
        self.session.is_some()
    }

    pub fn settings(&self) -> &VaultSettings {
        &self.settings
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// The underlying store handle.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Run the KDF on the blocking pool.
///
/// The task runs to completion even if the awaiting future is dropped.
async fn derive_blocking(
    passphrase: &SecretString,
    salt: [u8; SALT_LEN],
    iterations: u32,
) -> Result<DerivedKeyMaterial, VaultError> {
    let secret = Zeroizing::new(passphrase.expose_secret().as_bytes().to_vec());
    tokio::task::spawn_blocking(move || kdf::derive(&secret, &salt, iterations))
        .await
        .map_err(|e| VaultError::Internal(format!("key derivation task failed: {e}")))?
}

fn seal_envelope(
    random: &dyn RandomSource,
    key: &VaultKey,
    salt: [u8; SALT_LEN],
    verification_value: [u8; KEY_LEN],
    kdf_iterations: u32,
    contents: &VaultContents,
) -> Result<StoredEnvelope, VaultError> {
    let plaintext = Zeroizing::new(
        serde_json::to_vec(contents).map_err(|e| VaultError::Serialization(e.to_string()))?,
    );
    Ok(StoredEnvelope {
        salt,
        verification_value,
        ciphertext: crypto::seal(key, &plaintext, random)?,
        kdf_iterations,
    })
}
