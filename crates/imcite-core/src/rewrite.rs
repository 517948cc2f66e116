//! Citation-key rewriting in LaTeX sources
//!
//! Recognizes a fixed, closed set of citation commands (optionally
//! starred, with up to two bracketed optional arguments) and rewrites
//! the comma-separated key list inside the braces according to a
//! [`RenameMap`]. Keys are trimmed and rejoined with `", "`; the
//! command, star, and optional arguments pass through untouched.
//!
//! This is best-effort pattern recognition over a constrained grammar,
//! not a LaTeX parser: a key list containing braces will not be
//! recognized. The invocation grammar is externally fixed and simple
//! enough that the trade-off is acceptable.
//!
//! A changed file is backed up first: any stale `<name>-old.<ext>`
//! backup is removed, the original is moved to the backup path, then
//! the rewritten content is written. The backup therefore always holds
//! the true pre-rewrite state. A crash between the move and the write
//! leaves the content only in the backup; that window is documented
//! and accepted.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::rename::RenameMap;

/// Suffix inserted before the extension for pre-image backups.
pub const BACKUP_SUFFIX: &str = "-old";

/// Extension of documents eligible for rewriting.
pub const TEX_EXTENSION: &str = "tex";

lazy_static! {
    static ref CITE_COMMAND: Regex = Regex::new(
        r"\\(cite|citet|citep|citealp|citealt|parencite|textcite|autocite|footcite|footcitetext|nocite)\*?\s*(?:\[[^\]]*\]\s*){0,2}\{([^}]*)\}"
    )
    .unwrap();
}

/// Per-file outcomes of a rewrite run.
#[derive(Debug, Default)]
pub struct RewriteSummary {
    pub modified: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Backup path for a document: `paper.tex` -> `paper-old.tex`.
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let mut name = format!("{stem}{BACKUP_SUFFIX}");
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(ext);
    }
    path.with_file_name(name)
}

/// Whether a path already follows the backup naming convention.
pub fn is_backup_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(BACKUP_SUFFIX))
}

fn rewrite_key_list(block: &str, map: &RenameMap) -> (String, bool) {
    let mut changed = false;
    let rewritten: Vec<&str> = block
        .split(',')
        .map(str::trim)
        .map(|key| match map.get(key) {
            Some(new) => {
                if new != key {
                    changed = true;
                }
                new
            }
            None => key,
        })
        .collect();
    (rewritten.join(", "), changed)
}

/// Apply the rename map to every recognized citation invocation.
/// Invocations whose key list is unaffected keep their original
/// spacing; returns the rewritten text and whether anything changed.
pub fn rewrite_text(text: &str, map: &RenameMap) -> (String, bool) {
    let mut changed_any = false;
    let result = CITE_COMMAND.replace_all(text, |caps: &Captures| {
        let full = caps.get(0).unwrap().as_str();
        let (new_block, changed) = rewrite_key_list(&caps[2], map);
        if !changed {
            return full.to_string();
        }
        changed_any = true;
        // The key list holds no braces, so the last `{` opens it.
        let open = full.rfind('{').unwrap();
        format!("{}{}}}", &full[..open + 1], new_block)
    });
    (result.into_owned(), changed_any)
}

/// Rewrite one document in place, backup first. Returns `false` when
/// the map touches nothing in the file and the file is left alone.
pub fn rewrite_file(path: &Path, map: &RenameMap) -> Result<bool> {
    let original = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let (updated, changed) = rewrite_text(&original, map);
    if !changed {
        tracing::debug!(path = %path.display(), "no citation key changes needed");
        return Ok(false);
    }

    let backup = backup_path(path);
    if backup.exists() {
        fs::remove_file(&backup).map_err(|e| Error::io(&backup, e))?;
    }
    fs::rename(path, &backup).map_err(|e| Error::io(path, e))?;
    fs::write(path, updated).map_err(|e| Error::io(path, e))?;

    tracing::info!(path = %path.display(), backup = %backup.display(), "updated citations");
    Ok(true)
}

/// Rewrite a single `.tex` file or every `.tex` file under a
/// directory. Files already named as backups are skipped; one file's
/// failure is recorded and does not stop the others. An empty map
/// skips the whole step with a notice.
pub fn rewrite_target(target: &Path, map: &RenameMap) -> RewriteSummary {
    let mut summary = RewriteSummary::default();

    if map.is_empty() {
        tracing::warn!("no citation key changes available, skipping replacement");
        return summary;
    }

    if target.is_file() {
        if has_tex_extension(target) {
            apply_one(target, map, &mut summary);
        } else {
            tracing::warn!(path = %target.display(), "not a .tex file, skipping");
        }
        return summary;
    }

    for entry in WalkDir::new(target).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if entry.file_type().is_file() && has_tex_extension(path) && !is_backup_file(path) {
            apply_one(path, map, &mut summary);
        }
    }

    if summary.modified.is_empty() && summary.unchanged.is_empty() && summary.failed.is_empty() {
        tracing::warn!(path = %target.display(), "no .tex files found");
    }
    summary
}

fn has_tex_extension(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TEX_EXTENSION)
}

fn apply_one(path: &Path, map: &RenameMap, summary: &mut RewriteSummary) {
    match rewrite_file(path, map) {
        Ok(true) => summary.modified.push(path.to_path_buf()),
        Ok(false) => summary.unchanged.push(path.to_path_buf()),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "failed to update");
            summary.failed.push((path.to_path_buf(), err.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> RenameMap {
        let mut m = RenameMap::new();
        for (old, new) in pairs {
            m.insert(*old, *new);
        }
        m
    }

    #[test]
    fn replaces_single_key() {
        let m = map(&[("smith99", "Smith:1999abc")]);
        let (out, changed) = rewrite_text(r"See \citep{smith99}.", &m);
        assert!(changed);
        assert_eq!(out, r"See \citep{Smith:1999abc}.");
    }

    #[test]
    fn normalizes_spacing_in_changed_lists() {
        let m = map(&[("b", "B")]);
        let (out, changed) = rewrite_text(r"\cite{a,  b , c}", &m);
        assert!(changed);
        assert_eq!(out, r"\cite{a, B, c}");
    }

    #[test]
    fn untouched_invocations_keep_spacing() {
        let m = map(&[("elsewhere", "x")]);
        let text = r"\cite{a,  b , c}";
        let (out, changed) = rewrite_text(text, &m);
        assert!(!changed);
        assert_eq!(out, text);
    }

    #[test]
    fn optional_arguments_and_star_preserved() {
        let m = map(&[("old", "New:2020")]);
        let (out, changed) = rewrite_text(r"\citep*[see][p.~4]{old} and \citet[cf.]{old}", &m);
        assert!(changed);
        assert_eq!(out, r"\citep*[see][p.~4]{New:2020} and \citet[cf.]{New:2020}");
    }

    #[test]
    fn all_command_variants_recognized() {
        let m = map(&[("k", "K")]);
        for cmd in [
            "cite",
            "citet",
            "citep",
            "citealp",
            "citealt",
            "parencite",
            "textcite",
            "autocite",
            "footcite",
            "footcitetext",
            "nocite",
        ] {
            let text = format!(r"\{cmd}{{k}}");
            let (out, changed) = rewrite_text(&text, &m);
            assert!(changed, "command {cmd} not rewritten");
            assert_eq!(out, format!(r"\{cmd}{{K}}"));
        }
    }

    #[test]
    fn unknown_commands_left_alone() {
        let m = map(&[("k", "K")]);
        let text = r"\citefancy{k} and \mycite{k}";
        let (out, changed) = rewrite_text(text, &m);
        assert!(!changed);
        assert_eq!(out, text);
    }

    #[test]
    fn backup_path_inserts_suffix_before_extension() {
        assert_eq!(
            backup_path(Path::new("/tmp/paper.tex")),
            PathBuf::from("/tmp/paper-old.tex")
        );
        assert!(is_backup_file(Path::new("paper-old.tex")));
        assert!(!is_backup_file(Path::new("paper.tex")));
    }
}
