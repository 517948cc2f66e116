//! Shared test doubles: an in-memory literature source.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use imcite_core::http::{HttpError, HttpResponse};
use imcite_core::{CandidateQuery, LiteratureSource, QueryKind};

/// Canned-response literature source. Records every query it sees so
/// tests can assert on lookup order; unknown queries get the JSON
/// body INSPIRE returns for zero hits, which is not a BibTeX record.
#[derive(Default)]
pub struct FakeSource {
    responses: HashMap<(QueryKind, String), HttpResponse>,
    errors: Vec<(QueryKind, String)>,
    pub seen: Mutex<Vec<(QueryKind, String)>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, kind: QueryKind, value: &str, status: u16, body: &str) -> Self {
        self.responses.insert(
            (kind, value.to_string()),
            HttpResponse {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Make a particular query fail at the transport level.
    pub fn fail(mut self, kind: QueryKind, value: &str) -> Self {
        self.errors.push((kind, value.to_string()));
        self
    }

    pub fn seen_kinds(&self) -> Vec<QueryKind> {
        self.seen.lock().unwrap().iter().map(|(k, _)| *k).collect()
    }
}

#[async_trait]
impl LiteratureSource for FakeSource {
    async fn search(&self, query: &CandidateQuery) -> Result<HttpResponse, HttpError> {
        self.seen
            .lock()
            .unwrap()
            .push((query.kind, query.value.clone()));

        if self
            .errors
            .iter()
            .any(|(k, v)| *k == query.kind && v == &query.value)
        {
            return Err(HttpError::RetriesExhausted {
                attempts: 3,
                last: "connection refused".to_string(),
            });
        }

        Ok(self
            .responses
            .get(&(query.kind, query.value.clone()))
            .cloned()
            .unwrap_or(HttpResponse {
                status: 200,
                body: "[]".to_string(),
            }))
    }
}
