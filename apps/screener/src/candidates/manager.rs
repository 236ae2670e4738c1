//! Candidate collection manager: reads and mutates the post-match working set.
//!
//! Deletes are optimistic-then-reconciled: the entry is marked Deleting, the
//! remote delete runs without holding the state lock, and the outcome decides
//! whether the entry is removed or returned to Idle. Deletes for different ids
//! may overlap. `clear_all` is exclusive and always ends with a full reset.

use std::sync::Arc;

use tracing::{info, warn};

use crate::candidates::collection::{DeletionState, RankedCandidate};
use crate::candidates::models::{Candidate, SortKey};
use crate::candidates::stats::CollectionStats;
use crate::errors::{Outcome, Rejection, ScreeningError};
use crate::state::Shared;

#[derive(Clone)]
pub struct CandidateManager {
    shared: Arc<Shared>,
}

impl CandidateManager {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    pub async fn len(&self) -> usize {
        self.shared.state.lock().await.collection.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.shared.state.lock().await.collection.is_empty()
    }

    /// Whether a match result has been received since the last reset.
    pub async fn is_seeded(&self) -> bool {
        self.shared.state.lock().await.collection.is_seeded()
    }

    pub async fn get(&self, resume_id: &str) -> Option<Candidate> {
        self.shared
            .state
            .lock()
            .await
            .collection
            .get(resume_id)
            .cloned()
    }

    /// Candidates in the order the service returned them.
    pub async fn candidates(&self) -> Vec<Candidate> {
        self.shared
            .state
            .lock()
            .await
            .collection
            .candidates()
            .cloned()
            .collect()
    }

    pub async fn sorted_view(&self, key: SortKey) -> Vec<RankedCandidate> {
        self.shared.state.lock().await.collection.sorted_view(key)
    }

    /// Ranked by the selected sort key.
    pub async fn view(&self) -> Vec<RankedCandidate> {
        self.shared.state.lock().await.collection.view()
    }

    pub async fn sort_key(&self) -> SortKey {
        self.shared.state.lock().await.collection.sort_key()
    }

    pub async fn set_sort_key(&self, key: SortKey) {
        self.shared.state.lock().await.collection.set_sort_key(key);
    }

    pub async fn toggle_expanded(&self, resume_id: &str) -> Result<bool, Rejection> {
        self.shared
            .state
            .lock()
            .await
            .collection
            .toggle_expanded(resume_id)
    }

    pub async fn deletion_state(&self, resume_id: &str) -> Option<DeletionState> {
        self.shared
            .state
            .lock()
            .await
            .collection
            .deletion_state(resume_id)
    }

    pub async fn stats(&self) -> CollectionStats {
        self.shared.state.lock().await.collection.stats()
    }

    /// Deletes one candidate remotely, then locally. The completed value is
    /// the number of candidates left.
    ///
    /// On remote failure the collection is left exactly as it was and
    /// `DeleteFailed` becomes the active error.
    pub async fn delete_one(&self, resume_id: &str) -> Result<Outcome<usize>, ScreeningError> {
        let epoch = {
            let mut state = self.shared.state.lock().await;
            if state.clearing {
                return Ok(Outcome::Skipped(Rejection::ClearInProgress));
            }
            if let Err(reason) = state.collection.begin_delete(resume_id) {
                return Ok(Outcome::Skipped(reason));
            }
            state.error = None;
            state.epoch
        };

        let result = self.shared.service.delete_resume(resume_id).await;

        let mut state = self.shared.state.lock().await;
        if state.epoch != epoch {
            info!(resume_id, "Collection was reset while deleting; ignoring result");
            return Ok(Outcome::Skipped(Rejection::Superseded));
        }

        match result {
            Ok(()) => {
                state.collection.finish_delete(resume_id, true);
                let remaining = state.collection.len();
                info!(resume_id, remaining, "Candidate deleted");
                Ok(Outcome::Completed(remaining))
            }
            Err(err) => {
                state.collection.finish_delete(resume_id, false);
                warn!(resume_id, error = %err, "Candidate delete failed");
                Err(state.fail(ScreeningError::DeleteFailed {
                    resume_id: resume_id.to_string(),
                }))
            }
        }
    }

    /// Deletes every resume on the service and resets the whole workflow to
    /// Idle. The local reset happens whatever the remote outcome; a remote
    /// failure is reported as `ClearFailed` and left as the active error.
    ///
    /// Skipped while single deletes are pending. A submission in flight is
    /// stopped and waited out before the service is called.
    pub async fn clear_all(&self) -> Result<Outcome<()>, ScreeningError> {
        {
            let mut state = self.shared.state.lock().await;
            if state.clearing {
                return Ok(Outcome::Skipped(Rejection::ClearInProgress));
            }
            if state.collection.has_pending_deletes() {
                return Ok(Outcome::Skipped(Rejection::DeletesInFlight));
            }
            state.clearing = true;
            state.error = None;
        }

        let _ops = self.shared.quiesce().await;
        let result = self.shared.service.delete_all_resumes().await;

        let mut state = self.shared.state.lock().await;
        state.reset_local();
        match result {
            Ok(()) => {
                info!("All screening data cleared");
                Ok(Outcome::Completed(()))
            }
            Err(err) => {
                warn!(error = %err, "Clearing remote resumes failed");
                Err(state.fail(ScreeningError::ClearFailed))
            }
        }
    }
}
