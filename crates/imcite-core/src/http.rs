//! HTTP transport with timeout and retry
//!
//! Thin wrapper over reqwest carrying the retry policy the remote
//! service expects of clients: a 10 second per-request timeout and up
//! to 3 attempts with exponential backoff on transient statuses
//! (500, 502, 503, 504) and connection-level failures. A transient
//! status that survives all attempts is returned as an ordinary
//! non-success response; callers treat it as "no usable answer".

use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

/// Bound on a single request, including connect and body read.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_ATTEMPTS: u32 = 3;
const BACKOFF_BASE_MS: u64 = 300;
const RETRYABLE_STATUSES: [u16; 4] = [500, 502, 503, 504];

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: String },
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .expect("failed to build reqwest client");
        Self { client }
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        let mut attempt = 1u32;
        loop {
            match self.client.get(url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if RETRYABLE_STATUSES.contains(&status) && attempt < MAX_ATTEMPTS {
                        tracing::debug!(url, status, attempt, "transient status, retrying");
                        sleep(backoff(attempt)).await;
                        attempt += 1;
                        continue;
                    }
                    let body = response
                        .text()
                        .await
                        .map_err(|e| HttpError::Request(e.to_string()))?;
                    return Ok(HttpResponse { status, body });
                }
                Err(err) if attempt < MAX_ATTEMPTS => {
                    tracing::debug!(url, attempt, %err, "request error, retrying");
                    sleep(backoff(attempt)).await;
                    attempt += 1;
                }
                Err(err) => {
                    return Err(HttpError::RetriesExhausted {
                        attempts: attempt,
                        last: err.to_string(),
                    });
                }
            }
        }
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new("imcite/0.1")
    }
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BACKOFF_BASE_MS * 2u64.pow(attempt - 1))
}
