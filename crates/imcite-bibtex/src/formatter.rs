//! BibTeX formatting
//!
//! Serializes [`Entry`] values back to BibTeX text. Output shape is
//! stable: four-space field indentation, braced values, bare numeric
//! values left unbraced, entries separated by a blank line.

use crate::entry::Entry;

/// Format a single entry.
pub fn format_entry(entry: &Entry) -> String {
    let mut out = String::new();
    out.push('@');
    out.push_str(&entry.kind);
    out.push('{');
    out.push_str(&entry.key);
    out.push_str(",\n");

    for field in &entry.fields {
        out.push_str("    ");
        out.push_str(&field.name);
        out.push_str(" = ");
        if field.value.chars().all(|c| c.is_ascii_digit()) && !field.value.is_empty() {
            out.push_str(&field.value);
        } else {
            out.push('{');
            out.push_str(&field.value);
            out.push('}');
        }
        out.push_str(",\n");
    }

    out.push('}');
    out
}

/// Format a whole bibliography, blank line between entries,
/// trailing newline at the end of the file.
pub fn format_entries(entries: &[Entry]) -> String {
    let mut out = entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n");
    if !out.is_empty() {
        out.push('\n');
    }
    out
}
