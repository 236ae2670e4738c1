use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::service::{MatchResult, ScreeningService, ServiceError, UploadReceipt};
use crate::workflow::staging::UploadFile;

const PDF_MIME: &str = "application/pdf";
const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    successful: usize,
    #[serde(default, alias = "total_files")]
    total: Option<usize>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    batch_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<Value>,
}

/// [`ScreeningService`] over HTTP against the configured base URL.
#[derive(Clone)]
pub struct HttpScreeningService {
    client: Client,
    base_url: String,
}

impl HttpScreeningService {
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/resumes/{resume_id}` with the id percent-encoded as one path segment.
    fn resume_url(&self, resume_id: &str) -> Result<Url, ServiceError> {
        let mut url = Url::parse(&self.endpoint("/resumes"))
            .map_err(|e| ServiceError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.clone()))?
            .push(resume_id);
        Ok(url)
    }
}

#[async_trait]
impl ScreeningService for HttpScreeningService {
    async fn upload_batch(&self, files: &[UploadFile]) -> Result<UploadReceipt, ServiceError> {
        let mut form = Form::new();
        for file in files {
            let part = Part::stream_with_length(Body::from(file.content()), file.byte_size())
                .file_name(file.name().to_string())
                .mime_str(PDF_MIME)?;
            form = form.part("files", part);
        }

        let response = self
            .client
            .post(self.endpoint("/batch-upload"))
            .multipart(form)
            .send()
            .await?;
        let response = ensure_success(response, "batch-upload").await?;
        let body: UploadResponse = read_json(response).await?;

        debug!(
            successful = body.successful,
            sent = files.len(),
            "Batch upload acknowledged"
        );

        Ok(UploadReceipt {
            successful: body.successful,
            total: body.total.unwrap_or(files.len()),
            detail: body.detail,
            batch_id: body.batch_id,
        })
    }

    async fn match_candidates(
        &self,
        job_description: &str,
        batch_id: Option<&str>,
    ) -> Result<MatchResult, ServiceError> {
        let mut form = Form::new().text("job_description", job_description.to_string());
        if let Some(batch_id) = batch_id {
            form = form.text("batch_id", batch_id.to_string());
        }

        let response = self
            .client
            .post(self.endpoint("/match"))
            .multipart(form)
            .send()
            .await?;
        let response = ensure_success(response, "match").await?;
        let result: MatchResult = read_json(response).await?;

        debug!(
            candidates = result.shortlisted_candidates.len(),
            "Match completed"
        );
        Ok(result)
    }

    async fn delete_resume(&self, resume_id: &str) -> Result<(), ServiceError> {
        let url = self.resume_url(resume_id)?;
        let response = self.client.delete(url).send().await?;
        ensure_success(response, "delete-resume").await?;
        debug!(resume_id, "Resume deleted");
        Ok(())
    }

    async fn delete_all_resumes(&self) -> Result<(), ServiceError> {
        let response = self.client.delete(self.endpoint("/resumes")).send().await?;
        ensure_success(response, "delete-all-resumes").await?;
        debug!("All resumes deleted");
        Ok(())
    }
}

/// Passes 2xx responses through; turns anything else into `ServiceError::Api`
/// carrying the body's `detail` field.
async fn ensure_success(response: Response, operation: &str) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = extract_detail(&body);
    warn!(
        operation,
        status = status.as_u16(),
        %detail,
        "Screening service returned an error"
    );
    Err(ServiceError::Api {
        status: status.as_u16(),
        detail,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let body = response.bytes().await?;
    decode(&body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    Ok(serde_json::from_slice(body)?)
}

/// Reads `{ "detail": ... }` from an error body. Structured details (e.g. a
/// list of validation errors) are rendered as compact JSON.
fn extract_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.detail)
        .map(|detail| match detail {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}
