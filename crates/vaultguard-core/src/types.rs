// SPDX-FileCopyrightText: 2026 VaultGuard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential data model held inside the encrypted vault payload.
//!
//! Field names serialize in camelCase with the stored secret under
//! `password`, matching the layout of existing vault blobs.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::traits::Clock;

/// Current schema version written into new vault payloads.
pub const SCHEMA_VERSION: u32 = 1;

/// Fixed set of credential categories.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Category {
    #[default]
    Login,
    Finance,
    Social,
    Email,
    Work,
    /// Also absorbs unrecognized category names from older payloads.
    #[serde(other)]
    Other,
}

/// A single stored credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// Opaque identifier, generated once and never reused.
    pub id: String,
    pub title: String,
    pub username: String,
    /// The stored secret.
    #[serde(rename = "password")]
    pub secret: String,
    pub url: String,
    pub notes: String,
    pub category: Category,
    /// Milliseconds since the Unix epoch.
    pub created_at: i64,
    /// Milliseconds since the Unix epoch.
    pub updated_at: i64,
}

impl CredentialRecord {
    /// Build an empty `Login` record stamped with the current time.
    pub fn new(id: impl Into<String>, title: impl Into<String>, clock: &dyn Clock) -> Self {
        let now = clock.now_millis();
        Self {
            id: id.into(),
            title: title.into(),
            username: String::new(),
            secret: String::new(),
            url: String::new(),
            notes: String::new(),
            category: Category::default(),
            created_at: now,
            updated_at: now,
        }
    }

    fn matches_query(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.username.to_lowercase().contains(needle)
            || self.url.to_lowercase().contains(needle)
    }
}

/// The decrypted vault payload.
///
/// Entries are kept most-recent-first: new records go to the front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultContents {
    pub entries: Vec<CredentialRecord>,
    #[serde(rename = "version")]
    pub schema_version: u32,
}

impl Default for VaultContents {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            schema_version: SCHEMA_VERSION,
        }
    }
}

impl VaultContents {
    /// Create an empty payload at the current schema version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record at the front, or replace an existing one in place.
    ///
    /// On replace, `updated_at` is refreshed and the original `created_at`
    /// is preserved.
    pub fn upsert(&mut self, mut record: CredentialRecord, clock: &dyn Clock) {
        match self.entries.iter().position(|e| e.id == record.id) {
            Some(idx) => {
                record.created_at = self.entries[idx].created_at;
                record.updated_at = clock.now_millis();
                self.entries[idx] = record;
            }
            None => self.entries.insert(0, record),
        }
    }

    /// Remove a record by id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<CredentialRecord> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    /// Look up a record by id.
    pub fn get(&self, id: &str) -> Option<&CredentialRecord> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Case-insensitive substring search over title, username, and url.
    ///
    /// An empty query matches every record.
    pub fn search(&self, query: &str) -> Vec<&CredentialRecord> {
        let needle = query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.matches_query(&needle))
            .collect()
    }

    /// Records in the given category, in stored order.
    pub fn filter_category(&self, category: Category) -> Vec<&CredentialRecord> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .collect()
    }

    /// Per-category record counts, omitting empty categories.
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        Category::iter()
            .map(|c| (c, self.entries.iter().filter(|e| e.category == c).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct StepClock(AtomicI64);

    impl Clock for StepClock {
        fn now_millis(&self) -> i64 {
            self.0.fetch_add(1000, Ordering::SeqCst)
        }
    }

    fn record(id: &str, title: &str, clock: &dyn Clock) -> CredentialRecord {
        CredentialRecord::new(id, title, clock)
    }

    #[test]
    fn upsert_inserts_new_records_at_front() {
        let clock = StepClock(AtomicI64::new(0));
        let mut contents = VaultContents::new();
        contents.upsert(record("a", "first", &clock), &clock);
        contents.upsert(record("b", "second", &clock), &clock);

        assert_eq!(contents.entries[0].id, "b");
        assert_eq!(contents.entries[1].id, "a");
    }

    #[test]
    fn upsert_replaces_in_place_and_refreshes_updated_at() {
        let clock = StepClock(AtomicI64::new(0));
        let mut contents = VaultContents::new();
        contents.upsert(record("a", "first", &clock), &clock);
        contents.upsert(record("b", "second", &clock), &clock);
        let created = contents.get("a").unwrap().created_at;

        let mut edited = contents.get("a").unwrap().clone();
        edited.title = "renamed".into();
        contents.upsert(edited, &clock);

        let stored = contents.get("a").unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents.entries[1].id, "a");
        assert_eq!(stored.title, "renamed");
        assert_eq!(stored.created_at, created);
        assert!(stored.updated_at > created);
    }

    #[test]
    fn remove_by_id() {
        let clock = StepClock(AtomicI64::new(0));
        let mut contents = VaultContents::new();
        contents.upsert(record("a", "first", &clock), &clock);

        assert!(contents.remove("missing").is_none());
        assert_eq!(contents.remove("a").unwrap().title, "first");
        assert!(contents.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_title_username_url() {
        let clock = StepClock(AtomicI64::new(0));
        let mut contents = VaultContents::new();
        let mut bank = record("1", "My Bank", &clock);
        bank.url = "https://bank.example".into();
        let mut mail = record("2", "Mail", &clock);
        mail.username = "Alice@Example.com".into();
        contents.upsert(bank, &clock);
        contents.upsert(mail, &clock);

        assert_eq!(contents.search("BANK").len(), 1);
        assert_eq!(contents.search("alice").len(), 1);
        assert_eq!(contents.search("example").len(), 2);
        assert_eq!(contents.search("").len(), 2);
        assert!(contents.search("zzz").is_empty());
    }

    #[test]
    fn category_filter_and_counts() {
        let clock = StepClock(AtomicI64::new(0));
        let mut contents = VaultContents::new();
        let mut a = record("1", "a", &clock);
        a.category = Category::Finance;
        let mut b = record("2", "b", &clock);
        b.category = Category::Finance;
        let c = record("3", "c", &clock);
        contents.upsert(a, &clock);
        contents.upsert(b, &clock);
        contents.upsert(c, &clock);

        assert_eq!(contents.filter_category(Category::Finance).len(), 2);
        assert_eq!(
            contents.category_counts(),
            vec![(Category::Login, 1), (Category::Finance, 2)]
        );
    }

    #[test]
    fn payload_uses_stored_field_names() {
        let clock = StepClock(AtomicI64::new(5));
        let mut contents = VaultContents::new();
        let mut r = record("id1", "t", &clock);
        r.secret = "hunter2".into();
        contents.upsert(r, &clock);

        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["entries"][0]["password"], "hunter2");
        assert_eq!(json["entries"][0]["createdAt"], 5);
        assert_eq!(json["entries"][0]["category"], "Login");
    }

    #[test]
    fn unknown_category_deserializes_as_other() {
        let json = r#"{"id":"x","title":"t","username":"","password":"","url":"","notes":"",
            "category":"Gaming","createdAt":1,"updatedAt":2}"#;
        let r: CredentialRecord = serde_json::from_str(json).unwrap();
        assert_eq!(r.category, Category::Other);
    }

    #[test]
    fn category_display_round_trips() {
        use std::str::FromStr;
        for c in Category::iter() {
            assert_eq!(Category::from_str(&c.to_string()).unwrap(), c);
        }
    }
}
