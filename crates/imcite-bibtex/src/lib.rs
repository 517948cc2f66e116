//! BibTeX parsing and formatting for imcite
//!
//! A small, self-contained BibTeX toolkit: an entry model with
//! case-insensitive field access, a parser that tolerates junk between
//! entries, and a formatter that writes entries back out in a stable
//! shape. Field values keep their inner LaTeX markup untouched.

pub mod entry;
pub mod formatter;
pub mod parser;

pub use entry::{Entry, Field};
pub use formatter::{format_entries, format_entry};
pub use parser::{parse, ParseError};
