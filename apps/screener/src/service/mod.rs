//! Boundary to the remote screening service.
//!
//! The workflow only talks to the service through [`ScreeningService`], so the
//! HTTP client can be swapped for an in-memory double in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::candidates::models::Candidate;
use crate::workflow::staging::UploadFile;

pub mod http;

#[cfg(test)]
pub(crate) mod fake;

pub use http::HttpScreeningService;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

impl ServiceError {
    /// The message carried forward into user-facing errors.
    pub fn detail(&self) -> String {
        match self {
            ServiceError::Api { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

/// Acknowledgement of a batch upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Files the service ingested.
    pub successful: usize,
    /// Files sent in the batch.
    pub total: usize,
    pub detail: Option<String>,
    /// Handle for the ingested batch, when the service issues one.
    /// Threaded into the following match request.
    pub batch_id: Option<String>,
}

impl UploadReceipt {
    pub fn failed(&self) -> usize {
        self.total.saturating_sub(self.successful)
    }
}

/// Response envelope of the match endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    #[serde(default)]
    pub shortlisted_candidates: Vec<Candidate>,
}

/// The four remote operations the screening workflow depends on.
#[async_trait]
pub trait ScreeningService: Send + Sync {
    /// Sends every file as one multipart batch.
    async fn upload_batch(&self, files: &[UploadFile]) -> Result<UploadReceipt, ServiceError>;

    /// Evaluates uploaded resumes against a job description. Without a
    /// `batch_id` the service scores whatever it currently holds.
    async fn match_candidates(
        &self,
        job_description: &str,
        batch_id: Option<&str>,
    ) -> Result<MatchResult, ServiceError>;

    async fn delete_resume(&self, resume_id: &str) -> Result<(), ServiceError>;

    async fn delete_all_resumes(&self) -> Result<(), ServiceError>;
}
