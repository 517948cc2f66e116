//! Record matching against the remote database
//!
//! For one bibliography entry: derive candidate queries, try them in
//! order, decide whether a returned record is acceptable. arXiv and
//! DOI queries are definitive identifiers and their hits are trusted
//! outright; a title query is a free-text ranked search, so its hits
//! must additionally agree on normalized title and year.
//!
//! [`match_entry`] never fails: transport errors count as a non-match
//! for that query, and exhausting all queries returns the original
//! entry unchanged, flagged unmatched.

use imcite_bibtex::Entry;

use crate::inspire::{LiteratureSource, RECORD_START};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Arxiv,
    Doi,
    Title,
}

impl QueryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryKind::Arxiv => "arxiv",
            QueryKind::Doi => "doi",
            QueryKind::Title => "title",
        }
    }
}

/// One remote lookup derived from a local entry. For `Arxiv` and
/// `Doi` the value is the bare identifier; for `Title` it is the
/// normalized title text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateQuery {
    pub kind: QueryKind,
    pub value: String,
}

/// Outcome of matching one entry.
#[derive(Debug, Clone)]
pub struct MatchReport {
    /// The accepted remote record, or the original entry when nothing
    /// matched.
    pub entry: Entry,
    /// `(old, new)` when the remote record carries a different key.
    pub rename: Option<(String, String)>,
    /// Which query kind produced the match; `None` means unmatched.
    pub matched_via: Option<QueryKind>,
}

/// Strip braces and newlines, trim, lowercase. Both sides of a title
/// comparison go through this.
pub fn normalize_title(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '{' | '}' | '\n'))
        .collect::<String>()
        .trim()
        .to_lowercase()
}

/// The arXiv identifier of an entry, if any: `arxiv` field preferred
/// over `eprint`, `arXiv:` prefix stripped, first whitespace-delimited
/// token only.
fn arxiv_id(entry: &Entry) -> Option<String> {
    let raw = entry.get("arxiv").or_else(|| entry.get("eprint"))?;
    raw.replace("arXiv:", "")
        .split_whitespace()
        .next()
        .map(str::to_string)
}

/// Ordered candidate queries for an entry. Identifier queries come
/// before the title query because they need no secondary check.
pub fn candidate_queries(entry: &Entry) -> Vec<CandidateQuery> {
    let mut queries = Vec::new();
    if let Some(id) = arxiv_id(entry) {
        queries.push(CandidateQuery {
            kind: QueryKind::Arxiv,
            value: id,
        });
    }
    if let Some(doi) = entry.doi() {
        queries.push(CandidateQuery {
            kind: QueryKind::Doi,
            value: doi.to_string(),
        });
    }
    let title = normalize_title(entry.title().unwrap_or(""));
    if !title.is_empty() {
        queries.push(CandidateQuery {
            kind: QueryKind::Title,
            value: title,
        });
    }
    queries
}

/// Match one entry against the remote database. See module docs for
/// the acceptance rules.
pub async fn match_entry<S>(source: &S, entry: Entry) -> MatchReport
where
    S: LiteratureSource + ?Sized,
{
    let key = entry.key.clone();
    let local_year = entry.year().unwrap_or("").trim().to_string();
    let local_title = normalize_title(entry.title().unwrap_or(""));

    for query in candidate_queries(&entry) {
        tracing::debug!(key = %key, kind = query.kind.as_str(), "trying remote query");

        let response = match source.search(&query).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(key = %key, kind = query.kind.as_str(), %err, "query failed");
                continue;
            }
        };
        if !response.is_success() {
            continue;
        }
        let body = response.body.trim();
        if !body.starts_with(RECORD_START) {
            continue;
        }
        let records = match imcite_bibtex::parse(body) {
            Ok(records) => records,
            Err(err) => {
                tracing::debug!(key = %key, %err, "unparseable response body");
                continue;
            }
        };

        for record in records {
            let accepted = match query.kind {
                QueryKind::Arxiv | QueryKind::Doi => true,
                QueryKind::Title => {
                    normalize_title(record.title().unwrap_or("")) == local_title
                        && record.year().unwrap_or("").trim() == local_year
                }
            };
            if !accepted {
                continue;
            }

            let rename =
                (record.key != key).then(|| (key.clone(), record.key.clone()));
            if let Some((old, new)) = &rename {
                tracing::debug!(old = %old, new = %new, "citation key changed");
            }
            return MatchReport {
                entry: record,
                rename,
                matched_via: Some(query.kind),
            };
        }
    }

    tracing::debug!(key = %key, "not found, keeping original entry");
    MatchReport {
        entry,
        rename: None,
        matched_via: None,
    }
}
