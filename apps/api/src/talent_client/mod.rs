//! Talent Client: the single point of entry for fetching candidate lists from
//! the upstream talent source (sourcing webhooks in front of the graph store).
//!
//! The upstream contract is opaque; the only assumption is that a campaign's
//! candidates come back as a JSON array, either bare or under `candidates`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Candidate;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected payload: {0}")]
    Payload(String),
}

/// Outcome of a single request that did not produce candidates.
enum AttemptError {
    Retryable(SourceError),
    Fatal(SourceError),
}

/// 429 and 5xx are worth another attempt; any other failure status is final.
fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// Where candidate lists come from. Carried in `AppState` as
/// `Arc<dyn CandidateSource>` so tests can swap in a stub.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self, campaign_id: &str) -> Result<Vec<Candidate>, SourceError>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CandidatePayload {
    Bare(Vec<Value>),
    Wrapped { candidates: Vec<Value> },
}

#[derive(Clone)]
pub struct WebhookCandidateSource {
    client: Client,
    base_url: String,
}

impl WebhookCandidateSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn candidates_url(&self) -> String {
        format!("{}/candidates", self.base_url)
    }

    async fn attempt(&self, campaign_id: &str) -> Result<Vec<Candidate>, AttemptError> {
        let response = self
            .client
            .get(self.candidates_url())
            .query(&[("campaign_id", campaign_id)])
            .send()
            .await
            .map_err(|e| AttemptError::Retryable(SourceError::Http(e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let error = SourceError::Api {
                status: status.as_u16(),
                message,
            };
            if is_retryable(status) {
                warn!("Talent source returned {status}: {error}");
                return Err(AttemptError::Retryable(error));
            }
            return Err(AttemptError::Fatal(error));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| AttemptError::Fatal(SourceError::Http(e)))?;
        parse_candidates(payload).map_err(AttemptError::Fatal)
    }
}

#[async_trait]
impl CandidateSource for WebhookCandidateSource {
    /// Retries on transport errors, 429 and 5xx with exponential backoff. The
    /// last attempt's error is returned as is.
    async fn fetch_candidates(&self, campaign_id: &str) -> Result<Vec<Candidate>, SourceError> {
        let mut attempt = 0;
        loop {
            match self.attempt(campaign_id).await {
                Ok(candidates) => {
                    debug!(
                        "Fetched {} candidates for campaign {}",
                        candidates.len(),
                        campaign_id
                    );
                    return Ok(candidates);
                }
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Retryable(e)) if attempt + 1 >= MAX_RETRIES => return Err(e),
                Err(AttemptError::Retryable(_)) => {
                    attempt += 1;
                    // 500ms, 1s
                    let delay = std::time::Duration::from_millis(500 * (1 << (attempt - 1)));
                    warn!(
                        "Candidate fetch attempt {} failed, retrying after {}ms...",
                        attempt,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

/// Accepts a bare array or `{ "candidates": [...] }`. Records that are not
/// objects are skipped rather than failing the whole list.
pub fn parse_candidates(payload: Value) -> Result<Vec<Candidate>, SourceError> {
    let records = match serde_json::from_value::<CandidatePayload>(payload) {
        Ok(CandidatePayload::Bare(records)) => records,
        Ok(CandidatePayload::Wrapped { candidates }) => candidates,
        Err(e) => return Err(SourceError::Payload(e.to_string())),
    };

    let total = records.len();
    let candidates: Vec<Candidate> = records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Candidate>(record) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!("Skipping malformed candidate record: {e}");
                None
            }
        })
        .collect();

    if candidates.len() < total {
        debug!("Kept {} of {} candidate records", candidates.len(), total);
    }
    Ok(candidates)
}
