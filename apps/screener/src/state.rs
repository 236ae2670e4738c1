use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::candidates::collection::CandidateCollection;
use crate::errors::{Rejection, ScreeningError};
use crate::service::ScreeningService;
use crate::workflow::stage::{Transition, WorkflowStage};
use crate::workflow::staging::StagingBuffer;

/// Everything the workflow knows locally. Owned by [`Shared`] and only ever
/// touched under its lock; the lock is never held across a remote call.
#[derive(Debug, Default)]
pub(crate) struct ScreeningState {
    pub stage: WorkflowStage,
    pub staging: StagingBuffer,
    pub collection: CandidateCollection,
    /// The single active user-facing error, if any.
    pub error: Option<ScreeningError>,
    /// Bumped on every reset. Remote calls capture it before suspending and
    /// drop their result if it changed in the meantime.
    pub epoch: u64,
    /// Set while a clear-all is in flight; single-resume deletes are refused.
    pub clearing: bool,
}

impl ScreeningState {
    pub fn transition(&mut self, transition: Transition) -> Result<WorkflowStage, Rejection> {
        let next = self
            .stage
            .next(transition)
            .ok_or(Rejection::WrongStage(self.stage))?;
        if next != self.stage {
            info!(from = %self.stage, to = %next, "Workflow stage changed");
        }
        self.stage = next;
        Ok(next)
    }

    /// Records `error` as the active message, replacing any previous one.
    pub fn fail(&mut self, error: ScreeningError) -> ScreeningError {
        self.error = Some(error.clone());
        error
    }

    /// Invalidates every remote call currently in flight without touching
    /// anything the user can see.
    pub fn supersede(&mut self) {
        self.epoch += 1;
        debug!(epoch = self.epoch, "Superseding in-flight remote calls");
    }

    /// Returns to Idle with an empty buffer, collection and error.
    pub fn reset_local(&mut self) {
        let stage = self.transition(Transition::Reset).unwrap_or_default();
        let epoch = self.epoch + 1;
        debug!(epoch, "Resetting local screening state");
        *self = ScreeningState {
            stage,
            epoch,
            ..ScreeningState::default()
        };
        info!("Workflow reset to idle");
    }
}

/// State shared by the [`crate::Orchestrator`] and [`crate::CandidateManager`] handles.
pub(crate) struct Shared {
    pub service: Arc<dyn ScreeningService>,
    pub state: Mutex<ScreeningState>,
    /// Held across the remote calls of a submission and of a remote wipe, so
    /// the two never interleave on the service. Always taken without `state`
    /// held.
    pub ops: Mutex<()>,
}

impl Shared {
    pub fn new(service: Arc<dyn ScreeningService>) -> Arc<Self> {
        Arc::new(Self {
            service,
            state: Mutex::new(ScreeningState::default()),
            ops: Mutex::new(()),
        })
    }

    pub async fn is_current(&self, epoch: u64) -> bool {
        self.state.lock().await.epoch == epoch
    }

    /// Supersedes in-flight work, then waits for a running submission to
    /// wind down. A submission sees the new epoch at its next phase boundary
    /// and stops before calling the service again.
    pub async fn quiesce(&self) -> MutexGuard<'_, ()> {
        self.state.lock().await.supersede();
        self.ops.lock().await
    }
}
