//! Client for the remote progress-persistence service.
//!
//! The service tracks per-question attempt counts and solved status, keyed by
//! course/exercise/question plus a category pair. A 403-style "limit reached"
//! rejection is a distinct, expected failure mode and is surfaced as its own
//! variant with the server's message intact.

use async_trait::async_trait;
use exercise::Language;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Identifies one question's progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressKey {
    pub course_id: String,
    pub exercise_id: String,
    pub question_id: String,
    pub category: String,
    pub subcategory: String,
}

/// Server-side progress state for one question.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgressRecord {
    pub attempts: u32,
    pub status: String,
}

/// Body of one submission persistence call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub course_id: String,
    pub exercise_id: String,
    pub question_id: String,
    pub code: String,
    pub score: u8,
    pub status: String,
    pub category: String,
    pub subcategory: String,
    /// Absent for skip records, which carry no code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    pub attempt_limit_enabled: bool,
    pub max_attempts: u32,
    /// Strategy-specific verdict detail, forwarded opaquely.
    pub evaluation_details: serde_json::Value,
}

#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// The server explicitly rejected the submission due to the attempt cap.
    #[error("{message}")]
    LimitReached { message: String },

    #[error("Progress service request failed: {0}")]
    Transport(String),

    #[error("Unexpected progress service response: {0}")]
    Malformed(String),
}

/// Remote progress collaborator. `fetch` failures are treated as fail-open by
/// the ledger; `submit` failures block ledger updates.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn fetch(&self, key: &ProgressKey) -> Result<ProgressRecord, ProgressError>;
    async fn submit(&self, record: &SubmissionRecord) -> Result<(), ProgressError>;
}

/// Error body shape the service uses for rejections.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Reqwest-backed [`ProgressStore`].
pub struct HttpProgressStore {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpProgressStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Build a store from the global [`common::config::AppConfig`]. An empty
    /// auth token is passed through; the service's rejection is then handled
    /// as a normal failure.
    pub fn from_config() -> Self {
        Self::new(
            common::config::progress_base_url(),
            common::config::auth_token(),
        )
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.token)
        }
    }
}

#[async_trait]
impl ProgressStore for HttpProgressStore {
    async fn fetch(&self, key: &ProgressKey) -> Result<ProgressRecord, ProgressError> {
        debug!(question = %key.question_id, "fetching progress record");

        let response = self
            .authorized(self.client.get(format!("{}/progress", self.base_url)))
            .query(key)
            .send()
            .await
            .map_err(|e| ProgressError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ProgressError::Transport(format!(
                "HTTP {}",
                response.status()
            )));
        }

        response
            .json::<ProgressRecord>()
            .await
            .map_err(|e| ProgressError::Malformed(e.to_string()))
    }

    async fn submit(&self, record: &SubmissionRecord) -> Result<(), ProgressError> {
        debug!(question = %record.question_id, status = %record.status, "persisting submission");

        let response = self
            .authorized(self.client.post(format!("{}/progress", self.base_url)))
            .json(record)
            .send()
            .await
            .map_err(|e| ProgressError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "Attempt limit reached".to_string());
            return Err(ProgressError::LimitReached { message });
        }

        if !status.is_success() {
            return Err(ProgressError::Transport(format!("HTTP {status}")));
        }

        Ok(())
    }
}
