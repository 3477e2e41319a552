//! The merged, read-only property table.

use indexmap::IndexMap;
use serde::Serialize;

use super::{ParseError, parser};

/// Immutable key → value mapping produced by merging properties files.
///
/// Built through [`TableBuilder`]; nothing on this type mutates it.
/// Iteration follows the order in which each key was first defined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyTable {
    entries: IndexMap<String, String>,
}

impl PropertyTable {
    /// Parse a single properties document into a table.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut builder = TableBuilder::new();
        builder.merge_str(input)?;
        Ok(builder.build())
    }

    /// Look up a key. `None` means absent; an empty value is `Some("")`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for PropertyTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut builder = TableBuilder::new();
        builder.merge(iter);
        builder.build()
    }
}

/// Mutable accumulator used while loading; frozen by [`TableBuilder::build`].
#[derive(Debug, Default)]
pub struct TableBuilder {
    entries: IndexMap<String, String>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every pair, overwriting existing keys. Returns how many
    /// pairs were applied.
    pub fn merge(&mut self, pairs: impl IntoIterator<Item = (String, String)>) -> usize {
        let mut applied = 0;
        for (key, value) in pairs {
            self.entries.insert(key, value);
            applied += 1;
        }
        applied
    }

    /// Parse `input` as a properties document and merge it.
    pub fn merge_str(&mut self, input: &str) -> Result<usize, ParseError> {
        Ok(self.merge(parser::parse(input)?))
    }

    /// Decode raw file bytes (UTF-8, else ISO-8859-1) and merge them.
    pub fn merge_bytes(&mut self, bytes: &[u8]) -> Result<usize, ParseError> {
        self.merge_str(&parser::decode(bytes))
    }

    pub fn build(self) -> PropertyTable {
        PropertyTable {
            entries: self.entries,
        }
    }
}
