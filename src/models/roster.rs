use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Normalize a name into its lookup key: trimmed and uppercased
pub fn normalize_key(name: &str) -> String {
    name.trim().to_uppercase()
}

/// One entry from the canonical roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterRow {
    /// Uppercased, trimmed alias as it may appear in the document
    pub raw_key: String,
    /// Exact display form to write into the document
    pub canonical_name: String,
    /// Regional tag to apply when a record has none (may be empty)
    pub accent: String,
}

impl RosterRow {
    pub fn new(
        raw_name: impl AsRef<str>,
        canonical_name: impl Into<String>,
        accent: impl Into<String>,
    ) -> Self {
        Self {
            raw_key: normalize_key(raw_name.as_ref()),
            canonical_name: canonical_name.into(),
            accent: accent.into(),
        }
    }
}

/// The `(canonical_name, accent)` pair a lookup resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub canonical_name: String,
    pub accent: String,
}

/// Which lookup table produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// The record name is a known raw alias
    Alias,
    /// The record name is a canonical name, but not an alias
    Canonical,
}

/// Case-insensitive, bidirectional lookup built once from the roster rows
#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    by_raw_key: HashMap<String, RosterEntry>,
    by_canonical_key: HashMap<String, RosterEntry>,
}

impl RosterIndex {
    /// Build both lookup tables in a single pass.
    ///
    /// Repeated keys are accepted: the later row overwrites the earlier one.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RosterRow>,
    {
        let mut index = Self::default();

        for row in rows {
            let entry = RosterEntry {
                canonical_name: row.canonical_name,
                accent: row.accent,
            };
            index
                .by_canonical_key
                .insert(normalize_key(&entry.canonical_name), entry.clone());
            index.by_raw_key.insert(row.raw_key, entry);
        }

        index
    }

    /// Resolve a document name, alias table first
    pub fn lookup(&self, name: &str) -> Option<(MatchKind, &RosterEntry)> {
        self.get_raw(name)
            .map(|entry| (MatchKind::Alias, entry))
            .or_else(|| {
                self.get_canonical(name)
                    .map(|entry| (MatchKind::Canonical, entry))
            })
    }

    pub fn get_raw(&self, name: &str) -> Option<&RosterEntry> {
        self.by_raw_key.get(&normalize_key(name))
    }

    pub fn get_canonical(&self, name: &str) -> Option<&RosterEntry> {
        self.by_canonical_key.get(&normalize_key(name))
    }

    /// Number of distinct raw aliases
    pub fn alias_count(&self) -> usize {
        self.by_raw_key.len()
    }

    /// Number of distinct canonical names
    pub fn canonical_count(&self) -> usize {
        self.by_canonical_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_raw_key.is_empty()
    }
}
