//! Bibliography file I/O
//!
//! Loading is the one fatal step of a run: an unreadable or
//! unparseable input fails before any remote query is issued. Writing
//! is non-destructive: the previous file moves to `<name>-old<ext>`
//! before the new version lands at the original path.

use std::fs;
use std::path::{Path, PathBuf};

use imcite_bibtex::Entry;

use crate::error::{Error, Result};
use crate::rewrite::backup_path;

/// Rename log filename, written next to the bibliography.
pub const RENAME_LOG_NAME: &str = "citation_key_changes.log";

pub fn load_bibliography(path: &Path) -> Result<Vec<Entry>> {
    let text = fs::read_to_string(path).map_err(|source| Error::BibliographyRead {
        path: path.to_path_buf(),
        source,
    })?;
    imcite_bibtex::parse(&text).map_err(|source| Error::BibliographyParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the updated bibliography, preserving the previous version at
/// the backup path. A stale backup from an earlier run is replaced.
pub fn write_bibliography(path: &Path, entries: &[Entry]) -> Result<()> {
    if path.exists() {
        let previous = backup_path(path);
        if previous.exists() {
            fs::remove_file(&previous).map_err(|e| Error::io(&previous, e))?;
        }
        fs::rename(path, &previous).map_err(|e| Error::io(path, e))?;
        tracing::debug!(backup = %previous.display(), "previous bibliography preserved");
    }
    fs::write(path, imcite_bibtex::format_entries(entries)).map_err(|e| Error::io(path, e))
}

/// Where the rename log for a given bibliography lives: same
/// directory, fixed name.
pub fn rename_log_path(bib_path: &Path) -> PathBuf {
    match bib_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(RENAME_LOG_NAME),
        _ => PathBuf::from(RENAME_LOG_NAME),
    }
}
