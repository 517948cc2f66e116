//! INSPIRE-HEP literature endpoint
//!
//! Read-only GET interface: `/api/literature?q=<expr>&format=bibtex`,
//! where the query expression is `arxiv:<id>`, `doi:<doi>`, or
//! `title:"<urlencoded text>"`. A usable response body is BibTeX and
//! begins with `@`; anything else means "no record for this query".

use async_trait::async_trait;

use crate::http::{HttpClient, HttpError, HttpResponse};
use crate::matcher::{CandidateQuery, QueryKind};

/// First character of a BibTeX record; gates response usability.
pub const RECORD_START: char = '@';

/// Seam for the remote database so tests and alternative backends can
/// substitute their own transport.
#[async_trait]
pub trait LiteratureSource: Send + Sync {
    async fn search(&self, query: &CandidateQuery) -> Result<HttpResponse, HttpError>;
}

pub struct InspireSource {
    client: HttpClient,
    base_url: String,
}

impl InspireSource {
    pub fn new() -> Self {
        Self::with_base_url("https://inspirehep.net")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: HttpClient::new("imcite/0.1"),
            base_url: base_url.into(),
        }
    }

    /// Build the `q=` expression for a candidate query. Titles are
    /// quoted and percent-encoded; identifiers pass through as-is.
    fn query_expression(query: &CandidateQuery) -> String {
        match query.kind {
            QueryKind::Arxiv => format!("arxiv:{}", query.value),
            QueryKind::Doi => format!("doi:{}", query.value),
            QueryKind::Title => format!("title:\"{}\"", urlencoding::encode(&query.value)),
        }
    }
}

impl Default for InspireSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LiteratureSource for InspireSource {
    async fn search(&self, query: &CandidateQuery) -> Result<HttpResponse, HttpError> {
        let url = format!(
            "{}/api/literature?q={}&format=bibtex",
            self.base_url,
            Self::query_expression(query)
        );
        self.client.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_expressions_pass_through() {
        let q = CandidateQuery {
            kind: QueryKind::Arxiv,
            value: "1234.5678".into(),
        };
        assert_eq!(InspireSource::query_expression(&q), "arxiv:1234.5678");

        let q = CandidateQuery {
            kind: QueryKind::Doi,
            value: "10.1103/PhysRevLett.19.1264".into(),
        };
        assert_eq!(
            InspireSource::query_expression(&q),
            "doi:10.1103/PhysRevLett.19.1264"
        );
    }

    #[test]
    fn title_expression_is_quoted_and_encoded() {
        let q = CandidateQuery {
            kind: QueryKind::Title,
            value: "a model of leptons".into(),
        };
        assert_eq!(
            InspireSource::query_expression(&q),
            "title:\"a%20model%20of%20leptons\""
        );
    }
}
