//! Citation-key rename map
//!
//! Old local key to new canonical key, insertion-ordered, with a
//! first-writer-wins guarantee per old key. Persisted as one
//! `old --> new` line per mapping; the log from one run can drive the
//! rewriting step of a later run.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

pub const LOG_SEPARATOR: &str = "-->";

#[derive(Debug, Clone, Default)]
pub struct RenameMap {
    order: Vec<String>,
    map: HashMap<String, String>,
}

impl RenameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rename. The first value recorded for an old key wins;
    /// later inserts for the same key are ignored and return `false`.
    pub fn insert(&mut self, old: impl Into<String>, new: impl Into<String>) -> bool {
        let old = old.into();
        if self.map.contains_key(&old) {
            return false;
        }
        self.order.push(old.clone());
        self.map.insert(old, new.into());
        true
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.map.get(old).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Mappings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(move |old| (old.as_str(), self.map[old].as_str()))
    }

    /// Load a persisted log. A missing file is an empty map. Lines
    /// that are blank, lack the separator, or have an empty side are
    /// skipped silently.
    pub fn load(path: &Path) -> io::Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = fs::read_to_string(path)?;
        let mut map = Self::new();
        for line in text.lines() {
            let line = line.trim();
            let Some((old, new)) = line.split_once(LOG_SEPARATOR) else {
                continue;
            };
            let (old, new) = (old.trim(), new.trim());
            if old.is_empty() || new.is_empty() {
                continue;
            }
            map.insert(old, new);
        }
        Ok(map)
    }

    /// Write the log, one `old --> new` line per mapping, insertion
    /// order preserved.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = String::new();
        for (old, new) in self.iter() {
            out.push_str(old);
            out.push_str(" --> ");
            out.push_str(new);
            out.push('\n');
        }
        fs::write(path, out)
    }
}
