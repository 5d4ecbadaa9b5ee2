use serde::{Deserialize, Serialize};

pub const NAME_ATTR: &str = "name";
pub const ACCENT_ATTR: &str = "accent";

/// A speaker entry from the document's speaker collection
///
/// All attributes are kept in source order so untouched ones are written back
/// exactly as they were read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpeakerRecord {
    attributes: Vec<(String, String)>,
    #[serde(skip)]
    modified: bool,
}

impl SpeakerRecord {
    /// Create a record with a name and an optional accent
    pub fn new(name: impl Into<String>, accent: Option<&str>) -> Self {
        let mut attributes = vec![(NAME_ATTR.to_string(), name.into())];
        if let Some(accent) = accent {
            attributes.push((ACCENT_ATTR.to_string(), accent.to_string()));
        }
        Self {
            attributes,
            modified: false,
        }
    }

    pub fn from_attributes(attributes: Vec<(String, String)>) -> Self {
        Self {
            attributes,
            modified: false,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, appending it when absent
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key.to_string(), value)),
        }
        self.modified = true;
    }

    /// The speaker name, if present and non-blank
    pub fn name(&self) -> Option<&str> {
        self.get(NAME_ATTR).filter(|n| !n.trim().is_empty())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.set(NAME_ATTR, name);
    }

    /// The accent tag, empty when absent
    pub fn accent(&self) -> &str {
        self.get(ACCENT_ATTR).unwrap_or("")
    }

    pub fn set_accent(&mut self, accent: impl Into<String>) {
        self.set(ACCENT_ATTR, accent);
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id")
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Whether any attribute was set since the record was read
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}
