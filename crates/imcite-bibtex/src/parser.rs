//! BibTeX parser
//!
//! Parses a complete `.bib` file (or a fragment returned by a
//! literature API) into [`Entry`] values. Supported syntax:
//!
//! - braced, quoted, and bare numeric field values
//! - nested braces and backslash escapes inside values
//! - `@string` abbreviations with `#` concatenation
//! - `@comment` and `@preamble` blocks (skipped)
//! - arbitrary text between entries (ignored, as BibTeX does)
//!
//! Parsing is strict within an entry: a malformed entry fails the
//! whole parse rather than being silently dropped, since a truncated
//! bibliography is worse than an error.

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    IResult,
};
use std::collections::HashMap;
use thiserror::Error;

use crate::entry::Entry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed entry near byte offset {0}")]
    Malformed(usize),
}

/// Parse a BibTeX document into its entries, in file order.
pub fn parse(input: &str) -> Result<Vec<Entry>, ParseError> {
    let mut entries = Vec::new();
    let mut strings: HashMap<String, String> = HashMap::new();
    let mut rest = input;

    while let Some(pos) = rest.find('@') {
        let offset = input.len() - rest.len() + pos;
        rest = &rest[pos + 1..];

        let (after_kind, kind) =
            identifier(rest).map_err(|_| ParseError::Malformed(offset))?;

        match kind.to_ascii_lowercase().as_str() {
            "comment" | "preamble" => {
                rest = skip_block(after_kind);
            }
            "string" => {
                let (r, (name, value)) = string_definition(after_kind, &strings)
                    .map_err(|_| ParseError::Malformed(offset))?;
                strings.insert(name, value);
                rest = r;
            }
            _ => {
                let (r, entry) = entry_body(after_kind, kind, &strings)
                    .map_err(|_| ParseError::Malformed(offset))?;
                entries.push(entry);
                rest = r;
            }
        }
    }

    Ok(entries)
}

type NomErr<'a> = nom::Err<nom::error::Error<&'a str>>;

fn parse_failure(input: &str) -> NomErr<'_> {
    nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Char))
}

/// Identifier characters valid in entry types, cite keys, and field
/// names. Cite keys in the wild use `:`, `/`, `.`, `+`, and `-`.
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || "_-:./+".contains(c))(input)
}

/// Skip a `@comment`/`@preamble` block: a balanced brace group if one
/// follows, otherwise the remainder of the line.
fn skip_block(input: &str) -> &str {
    let trimmed = input.trim_start();
    if trimmed.starts_with('{') {
        if let Ok((rest, _)) = braced_value(trimmed) {
            return rest;
        }
    }
    match input.find('\n') {
        Some(pos) => &input[pos..],
        None => &input[input.len()..],
    }
}

/// `@string{name = value}`
fn string_definition<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, name) = identifier(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, value) = field_value(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('}')(rest)?;
    Ok((rest, (name.to_ascii_lowercase(), value)))
}

/// `{key, field = value, ...}` following the entry type.
fn entry_body<'a>(
    input: &'a str,
    kind: &str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Entry> {
    let (rest, _) = multispace0(input)?;
    let (rest, _) = char('{')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, key) = identifier(rest)?;

    let mut entry = Entry::new(kind, key);
    let mut rest = rest;

    loop {
        let (r, _) = multispace0(rest)?;
        if let Some(r) = r.strip_prefix('}') {
            return Ok((r, entry));
        }
        let r = r.strip_prefix(',').unwrap_or(r);
        let (r, _) = multispace0(r)?;
        if let Some(r) = r.strip_prefix('}') {
            return Ok((r, entry));
        }

        let (r, name) = identifier(r)?;
        let (r, _) = multispace0(r)?;
        let (r, _) = char('=')(r)?;
        let (r, value) = field_value(r, strings)?;
        entry.set(name, value);
        rest = r;
    }
}

/// A field value: one or more pieces joined with `#`.
fn field_value<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let mut out = String::new();
    let mut rest = input;

    loop {
        let (r, _) = multispace0(rest)?;
        let (r, piece) = value_piece(r, strings)?;
        out.push_str(&piece);

        let (r, _) = multispace0(r)?;
        match r.strip_prefix('#') {
            Some(r) => rest = r,
            None => return Ok((r, out)),
        }
    }
}

fn value_piece<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    if input.starts_with('{') {
        return braced_value(input);
    }
    if input.starts_with('"') {
        return quoted_value(input);
    }
    // Bare token: a number, or an @string abbreviation.
    let (rest, word) = identifier(input)?;
    let resolved = if word.chars().all(|c| c.is_ascii_digit()) {
        word.to_string()
    } else {
        strings
            .get(&word.to_ascii_lowercase())
            .cloned()
            .unwrap_or_else(|| word.to_string())
    };
    Ok((rest, resolved))
}

/// `{...}` with nested braces; returns the content without the outer
/// pair. Backslash-escaped braces do not affect nesting depth.
fn braced_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('{') {
        return Err(parse_failure(input));
    }
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[i + 1..], input[1..i].to_string()));
                }
            }
            b'\\' => i += 1,
            _ => {}
        }
        i += 1;
    }
    Err(parse_failure(input))
}

/// `"..."`; braces inside protect quotes, as in standard BibTeX.
fn quoted_value(input: &str) -> IResult<&str, String> {
    if !input.starts_with('"') {
        return Err(parse_failure(input));
    }
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut i = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if depth == 0 => {
                return Ok((&input[i + 1..], input[1..i].to_string()));
            }
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b'\\' => i += 1,
            _ => {}
        }
        i += 1;
    }
    Err(parse_failure(input))
}
