//! BibTeX entry model

use serde::{Deserialize, Serialize};

/// A single `name = value` field within an entry.
///
/// Values are stored with their outer delimiters stripped but inner
/// LaTeX markup (braces, macros) preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// A parsed BibTeX entry.
///
/// `key` is the citation key, `kind` the lowercased entry type
/// (`article`, `misc`, ...). Field order is preserved so a
/// parse/format round trip keeps the file readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub kind: String,
    pub fields: Vec<Field>,
}

impl Entry {
    pub fn new(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind: kind.into().to_lowercase(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field insertion, mostly for tests and fixtures.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Append a field, keeping any existing field with the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Look up a field value by name, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
            .map(|f| f.value.as_str())
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title")
    }

    pub fn year(&self) -> Option<&str> {
        self.get("year")
    }

    pub fn doi(&self) -> Option<&str> {
        self.get("doi")
    }
}
