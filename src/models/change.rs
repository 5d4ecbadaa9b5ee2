use std::fmt;

use serde::{Deserialize, Serialize};

use super::MatchKind;

/// A name rewrite decided for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub old: String,
    pub new: String,
}

/// An accent to write into a record that has none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentFill {
    /// Name of the speaker after any rename
    pub owner: String,
    pub value: String,
}

/// What the resolver decided for a single record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decision {
    pub matched: Option<MatchKind>,
    pub rename: Option<Rename>,
    pub accent_fill: Option<AccentFill>,
}

impl Decision {
    pub fn no_match() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.rename.is_none() && self.accent_fill.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameChange {
    /// Position of the record in the speaker collection
    pub position: usize,
    pub old: String,
    pub new: String,
}

impl fmt::Display for NameChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Updated speaker '{}' to '{}'", self.old, self.new)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccentChange {
    pub position: usize,
    pub speaker: String,
    pub accent: String,
}

impl fmt::Display for AccentChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Set accent of '{}' to '{}'", self.speaker, self.accent)
    }
}

/// A record that was uppercased but matched nothing further in the roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UppercaseOnly {
    pub position: usize,
    pub original: String,
    pub uppercased: String,
}

impl fmt::Display for UppercaseOnly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Uppercased speaker '{}' to '{}' (no roster correction)",
            self.original, self.uppercased
        )
    }
}

/// Ordered change log, grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLog {
    pub names: Vec<NameChange>,
    pub accents: Vec<AccentChange>,
    pub uppercased_only: Vec<UppercaseOnly>,
}

impl ChangeLog {
    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.accents.is_empty() && self.uppercased_only.is_empty()
    }

    /// Plain lines for console output, names first, then accents, then
    /// uppercased-only records
    pub fn lines(&self) -> Vec<String> {
        self.names
            .iter()
            .map(ToString::to_string)
            .chain(self.accents.iter().map(ToString::to_string))
            .chain(self.uppercased_only.iter().map(ToString::to_string))
            .collect()
    }
}

/// Per-field mutation counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub names_changed: usize,
    pub accents_changed: usize,
    pub uppercased_only: usize,
}

impl ChangeCounts {
    pub fn total(&self) -> usize {
        self.names_changed + self.accents_changed + self.uppercased_only
    }
}
