// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Additive password strength heuristic.
//!
//! Eight one-point checks: length of at least 8, 12, 16 and 20 characters,
//! plus the presence of a lowercase letter, an uppercase letter, a digit, and
//! anything else. The total is normalized by 8.

use strum::Display;

const MAX_SCORE: f64 = 8.0;
const LENGTH_THRESHOLDS: [usize; 4] = [8, 12, 16, 20];

/// Coarse strength bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum StrengthLabel {
    Weak,
    Fair,
    Good,
    Strong,
}

impl StrengthLabel {
    fn from_score(score: f64) -> Self {
        if score < 0.3 {
            Self::Weak
        } else if score < 0.5 {
            Self::Fair
        } else if score < 0.75 {
            Self::Good
        } else {
            Self::Strong
        }
    }

    /// Presentation-neutral style token for this label.
    pub fn style_hint(self) -> &'static str {
        match self {
            Self::Weak => "danger",
            Self::Fair => "caution",
            Self::Good => "notice",
            Self::Strong => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthReport {
    /// Normalized score in `[0, 1]`.
    pub score: f64,
    pub label: StrengthLabel,
    pub style_hint: &'static str,
}

/// Score `password`. Pure and deterministic.
pub fn estimate(password: &str) -> StrengthReport {
    let length = password.chars().count();
    let length_points = LENGTH_THRESHOLDS.iter().filter(|&&t| length >= t).count();

    let class_points = [
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ]
    .into_iter()
    .filter(|&present| present)
    .count();

    let score = ((length_points + class_points) as f64 / MAX_SCORE).min(1.0);
    let label = StrengthLabel::from_score(score);
    StrengthReport {
        score,
        label,
        style_hint: label.style_hint(),
    }
}
