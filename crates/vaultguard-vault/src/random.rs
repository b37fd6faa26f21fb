// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Production random and clock sources.

use rand::{CryptoRng, RngCore};
use ring::rand::{SecureRandom, SystemRandom};
use std::sync::Mutex;
use vaultguard_core::{Clock, RandomSource, VaultError};

/// OS CSPRNG via `ring::rand::SystemRandom`.
#[derive(Debug, Clone)]
pub struct SystemRandomSource {
    rng: SystemRandom,
}

impl SystemRandomSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandomSource {
    fn fill(&self, dest: &mut [u8]) -> Result<(), VaultError> {
        self.rng
            .fill(dest)
            .map_err(|_| VaultError::Random("system random source failed".to_string()))
    }
}

/// Adapts any `rand` cryptographic RNG into a [`RandomSource`].
///
/// Handy for deterministic tests with a seeded `StdRng`.
#[derive(Debug)]
pub struct RngSource<R> {
    rng: Mutex<R>,
}

impl<R: RngCore + CryptoRng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl<R: RngCore + CryptoRng + Send> RandomSource for RngSource<R> {
    fn fill(&self, dest: &mut [u8]) -> Result<(), VaultError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| VaultError::Random("rng mutex poisoned".to_string()))?;
        rng.try_fill_bytes(dest)
            .map_err(|e| VaultError::Random(format!("rng failed: {e}")))
    }
}

/// Draw a fixed-size random array.
pub fn random_array<const N: usize>(random: &dyn RandomSource) -> Result<[u8; N], VaultError> {
    let mut out = [0u8; N];
    random.fill(&mut out)?;
    Ok(out)
}

/// Wall clock backed by `chrono::Utc`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
