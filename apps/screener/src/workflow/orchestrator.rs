//! Workflow orchestrator: drives the stage machine and the two-phase
//! upload → match protocol.
//!
//! Upload always resolves before match is issued. Only one submission can be
//! in flight: a second `submit` while Submitting is skipped without touching
//! the network. Every failure is mapped to one [`ScreeningError`], recorded as
//! the active error, and leaves the stage at Collecting with files still staged.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::candidates::collection::RankedCandidate;
use crate::candidates::manager::CandidateManager;
use crate::candidates::models::{Candidate, SortKey};
use crate::candidates::stats::CollectionStats;
use crate::config::Config;
use crate::errors::{Outcome, Rejection, ScreeningError};
use crate::service::{HttpScreeningService, ScreeningService, ServiceError};
use crate::state::Shared;
use crate::workflow::stage::{Transition, WorkflowStage};
use crate::workflow::staging::UploadFile;

/// Read-only picture of the workflow for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub stage: WorkflowStage,
    pub staged_files: Vec<StagedFile>,
    pub job_description_chars: usize,
    pub sort_key: SortKey,
    pub candidates: Vec<RankedCandidate>,
    pub stats: CollectionStats,
    /// True once a match result arrived, even if all candidates were deleted since.
    pub analyzed: bool,
    pub analyzed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StagedFile {
    pub name: String,
    pub byte_size: u64,
}

/// Handle to one screening session. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct Orchestrator {
    shared: Arc<Shared>,
}

impl Orchestrator {
    pub fn new(service: Arc<dyn ScreeningService>) -> Self {
        Self {
            shared: Shared::new(service),
        }
    }

    /// Orchestrator backed by the HTTP service at `config.api_url`.
    pub fn from_config(config: &Config) -> Result<Self, ServiceError> {
        let service = HttpScreeningService::new(config)?;
        info!(api_url = %config.api_url, "Screening client initialized");
        Ok(Self::new(Arc::new(service)))
    }

    /// Collection manager sharing this session's state.
    pub fn candidates(&self) -> CandidateManager {
        CandidateManager::new(self.shared.clone())
    }

    pub async fn stage(&self) -> WorkflowStage {
        self.shared.state.lock().await.stage
    }

    pub async fn error(&self) -> Option<ScreeningError> {
        self.shared.state.lock().await.error.clone()
    }

    pub async fn dismiss_error(&self) {
        self.shared.state.lock().await.error = None;
    }

    /// Idle/Reviewing → Collecting. Clears the active error.
    pub async fn start(&self) -> Result<(), Rejection> {
        let mut state = self.shared.state.lock().await;
        state.transition(Transition::Start)?;
        state.error = None;
        Ok(())
    }

    pub async fn stage_file(&self, file: UploadFile) -> Result<(), Rejection> {
        let mut state = self.shared.state.lock().await;
        ensure_collecting(state.stage)?;
        state.staging.add_file(file)
    }

    /// Stages every file it can; returns the rejection for each one it could not.
    pub async fn stage_files(
        &self,
        files: impl IntoIterator<Item = UploadFile>,
    ) -> Result<Vec<Rejection>, Rejection> {
        let mut state = self.shared.state.lock().await;
        ensure_collecting(state.stage)?;
        Ok(files
            .into_iter()
            .filter_map(|file| state.staging.add_file(file).err())
            .collect())
    }

    pub async fn remove_file(&self, index: usize) -> Result<UploadFile, Rejection> {
        let mut state = self.shared.state.lock().await;
        ensure_collecting(state.stage)?;
        state.staging.remove_file(index)
    }

    pub async fn set_job_description(&self, text: impl Into<String>) -> Result<(), Rejection> {
        let mut state = self.shared.state.lock().await;
        ensure_collecting(state.stage)?;
        state.staging.set_job_description(text);
        Ok(())
    }

    pub async fn staged_files(&self) -> Vec<UploadFile> {
        self.shared.state.lock().await.staging.files().to_vec()
    }

    pub async fn job_description(&self) -> String {
        self.shared
            .state
            .lock()
            .await
            .staging
            .job_description()
            .to_string()
    }

    /// Replaces the staged files and job description, then submits.
    pub async fn submit_batch(
        &self,
        files: Vec<UploadFile>,
        job_description: impl Into<String>,
    ) -> Result<Outcome<usize>, ScreeningError> {
        {
            let mut state = self.shared.state.lock().await;
            if state.stage != WorkflowStage::Collecting {
                return Ok(Outcome::Skipped(stage_rejection(state.stage)));
            }
            if let Err(reason) = state.staging.replace(files, job_description) {
                return Ok(Outcome::Skipped(reason));
            }
        }
        self.submit().await
    }

    /// Uploads the staged files, then matches them against the staged job
    /// description. On success the collection is seeded, the buffer cleared and
    /// the stage becomes Reviewing; the completed value is the candidate count.
    pub async fn submit(&self) -> Result<Outcome<usize>, ScreeningError> {
        let (files, job_description, epoch) = {
            let mut state = self.shared.state.lock().await;
            if state.stage != WorkflowStage::Collecting {
                return Ok(Outcome::Skipped(stage_rejection(state.stage)));
            }
            if let Err(reason) = state.staging.validate() {
                return Ok(Outcome::Skipped(reason));
            }
            if let Err(reason) = state.transition(Transition::Submit) {
                return Ok(Outcome::Skipped(reason));
            }
            state.error = None;
            (
                state.staging.files().to_vec(),
                state.staging.job_description().to_string(),
                state.epoch,
            )
        };

        let _ops = self.shared.ops.lock().await;
        info!(files = files.len(), "Submitting resumes for screening");
        let result = self.run_protocol(&files, &job_description, epoch).await;

        let mut state = self.shared.state.lock().await;
        if state.epoch != epoch {
            info!("Workflow was reset during submission; discarding result");
            return Ok(Outcome::Skipped(Rejection::Superseded));
        }

        match result {
            Ok(Outcome::Completed(candidates)) => {
                let count = state.collection.seed(candidates);
                state.staging.clear();
                if let Err(reason) = state.transition(Transition::Analyzed) {
                    warn!(%reason, "Unexpected stage after a successful match");
                }
                info!(candidates = count, "Screening complete");
                Ok(Outcome::Completed(count))
            }
            Ok(Outcome::Skipped(reason)) => Ok(Outcome::Skipped(reason)),
            Err(err) => {
                if let Err(reason) = state.transition(Transition::Abort) {
                    warn!(%reason, "Unexpected stage after a failed submission");
                }
                warn!(error = %err, "Screening submission failed");
                Err(state.fail(err))
            }
        }
    }

    /// Upload, then match. Stops without calling the service again once
    /// `epoch` is no longer current.
    async fn run_protocol(
        &self,
        files: &[UploadFile],
        job_description: &str,
        epoch: u64,
    ) -> Result<Outcome<Vec<Candidate>>, ScreeningError> {
        let service = &self.shared.service;

        if !self.shared.is_current(epoch).await {
            return Ok(Outcome::Skipped(Rejection::Superseded));
        }
        let receipt = service
            .upload_batch(files)
            .await
            .map_err(|e| ScreeningError::UploadFailed(e.detail()))?;
        info!(
            successful = receipt.successful,
            total = receipt.total,
            "Upload phase finished"
        );
        if receipt.successful == 0 {
            return Err(ScreeningError::NoFilesIngested);
        }
        if receipt.failed() > 0 {
            warn!(
                failed = receipt.failed(),
                detail = receipt.detail.as_deref().unwrap_or(""),
                "Some resumes were not ingested"
            );
        }

        if !self.shared.is_current(epoch).await {
            info!("Workflow was reset after upload; skipping match");
            return Ok(Outcome::Skipped(Rejection::Superseded));
        }
        let result = service
            .match_candidates(job_description, receipt.batch_id.as_deref())
            .await
            .map_err(|e| ScreeningError::MatchFailed(e.detail()))?;
        if result.shortlisted_candidates.is_empty() {
            return Err(ScreeningError::NoCandidatesAnalyzed);
        }

        Ok(Outcome::Completed(result.shortlisted_candidates))
    }

    /// Returns to Idle from any stage.
    ///
    /// A submission in flight is stopped at its next phase boundary and
    /// waited out. Then the service is asked to delete every stored resume;
    /// that request is best-effort and its failure is only logged. Local
    /// state is cleared either way.
    pub async fn reset(&self) {
        let _ops = self.shared.quiesce().await;
        if let Err(err) = self.shared.service.delete_all_resumes().await {
            warn!(error = %err, "Best-effort delete of remote resumes failed during reset");
        }
        self.shared.state.lock().await.reset_local();
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.shared.state.lock().await;
        WorkflowSnapshot {
            stage: state.stage,
            staged_files: state
                .staging
                .files()
                .iter()
                .map(|f| StagedFile {
                    name: f.name().to_string(),
                    byte_size: f.byte_size(),
                })
                .collect(),
            job_description_chars: state.staging.job_description_chars(),
            sort_key: state.collection.sort_key(),
            candidates: state.collection.view(),
            stats: state.collection.stats(),
            analyzed: state.collection.is_seeded(),
            analyzed_at: state.collection.analyzed_at(),
            error: state.error.as_ref().map(ToString::to_string),
        }
    }
}

fn ensure_collecting(stage: WorkflowStage) -> Result<(), Rejection> {
    if stage == WorkflowStage::Collecting {
        Ok(())
    } else {
        Err(stage_rejection(stage))
    }
}

fn stage_rejection(stage: WorkflowStage) -> Rejection {
    if stage == WorkflowStage::Submitting {
        Rejection::SubmissionInFlight
    } else {
        Rejection::WrongStage(stage)
    }
}
