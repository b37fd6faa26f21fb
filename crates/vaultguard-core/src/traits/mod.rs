// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits the engine consumes from its host.
//!
//! The store is async and uses `#[async_trait]` for dynamic dispatch
//! compatibility. Randomness and time are synchronous.

pub mod entropy;
pub mod store;

pub use entropy::{Clock, RandomSource};
pub use store::EnvelopeStore;
