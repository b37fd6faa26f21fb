// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record identifiers and aggregate statistics.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use vaultguard_core::{RandomSource, VaultContents, VaultError};

use crate::random::random_array;
use crate::strength::{self, StrengthLabel};

const ID_BYTES: usize = 16;
const ID_LEN: usize = 20;

/// Fresh opaque record id: 16 random bytes, base64 with the non-alphanumeric
/// characters stripped, truncated to 20 characters.
pub fn new_record_id(random: &dyn RandomSource) -> Result<String, VaultError> {
    loop {
        let bytes: [u8; ID_BYTES] = random_array(random)?;
        let id: String = STANDARD
            .encode(bytes)
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(ID_LEN)
            .collect();
        if !id.is_empty() {
            return Ok(id);
        }
    }
}

/// Strength breakdown across the stored secrets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VaultStatistics {
    pub total: usize,
    /// Score at least 0.75.
    pub strong: usize,
    /// Score from 0.3 up to 0.75.
    pub medium: usize,
    /// Score below 0.3.
    pub weak: usize,
}

impl VaultStatistics {
    pub fn from_contents(contents: &VaultContents) -> Self {
        contents
            .entries
            .iter()
            .fold(Self::default(), |mut stats, record| {
                stats.total += 1;
                match strength::estimate(&record.secret).label {
                    StrengthLabel::Strong => stats.strong += 1,
                    StrengthLabel::Weak => stats.weak += 1,
                    StrengthLabel::Fair | StrengthLabel::Good => stats.medium += 1,
                }
                stats
            })
    }
}
