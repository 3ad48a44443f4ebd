//! Resolved configuration entries

use std::fmt;

use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

/// Placeholder shown instead of a secret value
pub const REDACTED: &str = "[redacted]";

/// A single `section/key = value` assignment.
///
/// Secret values are hidden from `Debug`, `Display` and serialization.
/// Only [`ConfigEntry::value`] hands out the raw text.
#[derive(Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    section: String,
    key: String,
    value: String,
    secret: bool,
}

impl ConfigEntry {
    pub fn new(section: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
            value: value.into(),
            secret: false,
        }
    }

    pub fn secret(section: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            secret: true,
            ..Self::new(section, key, value)
        }
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The raw value. Callers must not log this for secret entries.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }

    /// `section/key`, e.g. `database/connection`
    pub fn name(&self) -> String {
        format!("{}/{}", self.section, self.key)
    }

    /// The value as it may be shown to a user.
    pub fn display_value(&self) -> &str {
        if self.secret { REDACTED } else { &self.value }
    }
}

impl fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigEntry")
            .field("section", &self.section)
            .field("key", &self.key)
            .field("value", &self.display_value())
            .field("secret", &self.secret)
            .finish()
    }
}

impl fmt::Display for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} = {}", self.section, self.key, self.display_value())
    }
}

impl Serialize for ConfigEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ConfigEntry", 3)?;
        state.serialize_field("name", &self.name())?;
        state.serialize_field("value", self.display_value())?;
        state.serialize_field("secret", &self.secret)?;
        state.end()
    }
}

/// Ordered set of configuration entries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigOutput {
    entries: Vec<ConfigEntry>,
}

impl ConfigOutput {
    pub fn new(entries: Vec<ConfigEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConfigEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by its `section/key` name.
    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        let (section, key) = name.split_once('/')?;
        self.entries
            .iter()
            .find(|e| e.section == section && e.key == key)
    }
}

impl<'a> IntoIterator for &'a ConfigOutput {
    type Item = &'a ConfigEntry;
    type IntoIter = std::slice::Iter<'a, ConfigEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl fmt::Display for ConfigOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// The result of resolving one parameter set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub output: ConfigOutput,
    /// Whether the caller must run the database sync step
    pub should_sync: bool,
}
