// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generator.
//!
//! Characters are drawn uniformly from the union of the enabled classes, not
//! per class, so no class is favored. Indices come from rejection sampling
//! over `u32` draws to avoid modulo bias.

use vaultguard_config::model::GeneratorConfig;
use vaultguard_config::validation::GENERATOR_LENGTH_RANGE;
use vaultguard_core::{RandomSource, VaultError};

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// Characters dropped when `exclude_ambiguous` is set.
pub const AMBIGUOUS: &[u8] = b"Il1O0";

/// Options for [`generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    pub exclude_ambiguous: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self::from(&GeneratorConfig::default())
    }
}

impl From<&GeneratorConfig> for GeneratorOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            length: config.length,
            uppercase: config.uppercase,
            lowercase: config.lowercase,
            numbers: config.numbers,
            symbols: config.symbols,
            exclude_ambiguous: config.exclude_ambiguous,
        }
    }
}

impl GeneratorOptions {
    /// Copy with `length` clamped into the supported 4..=64 range.
    pub fn clamped(self) -> Self {
        Self {
            length: self
                .length
                .clamp(*GENERATOR_LENGTH_RANGE.start(), *GENERATOR_LENGTH_RANGE.end()),
            ..self
        }
    }

    /// The combined character set for these options.
    ///
    /// Falls back to lowercase when every class is disabled.
    pub fn charset(&self) -> Vec<u8> {
        let mut charset = Vec::new();
        for (enabled, class) in [
            (self.uppercase, UPPERCASE),
            (self.lowercase, LOWERCASE),
            (self.numbers, DIGITS),
            (self.symbols, SYMBOLS),
        ] {
            if enabled {
                charset.extend_from_slice(class);
            }
        }
        if charset.is_empty() {
            charset.extend_from_slice(LOWERCASE);
        }
        if self.exclude_ambiguous {
            charset.retain(|c| !AMBIGUOUS.contains(c));
        }
        charset
    }
}

/// Generate a password of exactly `options.clamped().length` characters.
pub fn generate(options: &GeneratorOptions, random: &dyn RandomSource) -> Result<String, VaultError> {
    let options = options.clamped();
    let charset = options.charset();
    let n = charset.len() as u32;
    // Largest multiple of n that fits; draws at or above it are rejected.
    let limit = u32::MAX - (u32::MAX % n);

    let mut out = String::with_capacity(options.length);
    let mut buf = vec![0u8; options.length * 4];
    while out.len() < options.length {
        random.fill(&mut buf)?;
        for chunk in buf.chunks_exact(4) {
            if out.len() == options.length {
                break;
            }
            let draw = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            if draw < limit {
                out.push(charset[(draw % n) as usize] as char);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SystemRandomSource};
    use rand::SeedableRng;

    fn all_on(length: usize) -> GeneratorOptions {
        GeneratorOptions {
            length,
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
            exclude_ambiguous: true,
        }
    }

    #[test]
    fn output_has_exact_length() {
        let random = SystemRandomSource::new();
        for len in [4, 5, 16, 33, 64] {
            assert_eq!(generate(&all_on(len), &random).unwrap().len(), len);
        }
    }

    #[test]
    fn length_is_clamped() {
        let random = SystemRandomSource::new();
        assert_eq!(generate(&all_on(0), &random).unwrap().len(), 4);
        assert_eq!(generate(&all_on(1000), &random).unwrap().len(), 64);
    }

    #[test]
    fn never_ambiguous_and_covers_every_class() {
        let random = SystemRandomSource::new();
        let (mut upper, mut lower, mut digit, mut symbol) = (false, false, false, false);

        for _ in 0..1_000 {
            let pw = generate(&all_on(64), &random).unwrap();
            assert!(
                !pw.bytes().any(|c| AMBIGUOUS.contains(&c)),
                "ambiguous character in {pw}"
            );
            upper |= pw.bytes().any(|c| c.is_ascii_uppercase());
            lower |= pw.bytes().any(|c| c.is_ascii_lowercase());
            digit |= pw.bytes().any(|c| c.is_ascii_digit());
            symbol |= pw.bytes().any(|c| SYMBOLS.contains(&c));
        }

        assert!(upper && lower && digit && symbol);
    }

    #[test]
    fn all_classes_off_falls_back_to_lowercase() {
        let options = GeneratorOptions {
            length: 32,
            uppercase: false,
            lowercase: false,
            numbers: false,
            symbols: false,
            exclude_ambiguous: false,
        };
        let pw = generate(&options, &SystemRandomSource::new()).unwrap();
        assert_eq!(pw.len(), 32);
        assert!(pw.bytes().all(|c| c.is_ascii_lowercase()));
    }

    #[test]
    fn digits_only_with_ambiguous_excluded() {
        let options = GeneratorOptions {
            length: 64,
            uppercase: false,
            lowercase: false,
            numbers: true,
            symbols: false,
            exclude_ambiguous: true,
        };
        assert_eq!(options.charset(), b"23456789");
        let pw = generate(&options, &SystemRandomSource::new()).unwrap();
        assert!(pw.bytes().all(|c| b"23456789".contains(&c)));
    }

    #[test]
    fn charset_is_a_union_without_duplicates() {
        let charset = all_on(16).charset();
        assert_eq!(charset.len(), 26 + 26 + 10 + SYMBOLS.len() - AMBIGUOUS.len());
        let mut sorted = charset.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), charset.len());
    }

    #[test]
    fn seeded_source_is_reproducible() {
        let a = RngSource::new(rand::rngs::StdRng::seed_from_u64(42));
        let b = RngSource::new(rand::rngs::StdRng::seed_from_u64(42));
        assert_eq!(
            generate(&all_on(24), &a).unwrap(),
            generate(&all_on(24), &b).unwrap()
        );
    }

    #[test]
    fn options_follow_config_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.length, 16);
        assert!(options.uppercase && options.lowercase && options.numbers && options.symbols);
        assert!(options.exclude_ambiguous);
    }
}
