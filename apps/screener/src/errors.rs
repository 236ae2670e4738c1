use thiserror::Error;

use crate::workflow::stage::WorkflowStage;

/// User-facing failure of a screening action.
///
/// Every remote-call failure is converted into exactly one of these at the call
/// site. The orchestrator keeps at most one of them as the active error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScreeningError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("No files were successfully uploaded")]
    NoFilesIngested,

    #[error("Matching failed: {0}")]
    MatchFailed(String),

    #[error("No candidates were analyzed successfully")]
    NoCandidatesAnalyzed,

    #[error("Error deleting resume {resume_id}. Please try again.")]
    DeleteFailed { resume_id: String },

    #[error("Error clearing data. Please try again.")]
    ClearFailed,
}

/// Fieldless discriminant of [`ScreeningError`], for callers that branch on
/// the kind of failure rather than its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UploadFailed,
    NoFilesIngested,
    MatchFailed,
    NoCandidatesAnalyzed,
    DeleteFailed,
    ClearFailed,
}

const SUBMIT_CHECKLIST: &[&str] = &[
    "The screening service is running and reachable",
    "Resumes are valid PDF files",
    "The job description is not empty",
];

impl ScreeningError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScreeningError::UploadFailed(_) => ErrorKind::UploadFailed,
            ScreeningError::NoFilesIngested => ErrorKind::NoFilesIngested,
            ScreeningError::MatchFailed(_) => ErrorKind::MatchFailed,
            ScreeningError::NoCandidatesAnalyzed => ErrorKind::NoCandidatesAnalyzed,
            ScreeningError::DeleteFailed { .. } => ErrorKind::DeleteFailed,
            ScreeningError::ClearFailed => ErrorKind::ClearFailed,
        }
    }

    /// True for failures raised by the upload/match sequence of a submission.
    pub fn is_submission_failure(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UploadFailed
                | ErrorKind::NoFilesIngested
                | ErrorKind::MatchFailed
                | ErrorKind::NoCandidatesAnalyzed
        )
    }

    /// Troubleshooting hints a UI can show next to a submission failure.
    /// Empty for delete/clear failures, which are plain retry prompts.
    pub fn checklist(&self) -> &'static [&'static str] {
        if self.is_submission_failure() {
            SUBMIT_CHECKLIST
        } else {
            &[]
        }
    }
}

/// Why an action was ignored without touching local or remote state.
///
/// Rejections are not failures: they never become the active error message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    #[error("action not available while {0}")]
    WrongStage(WorkflowStage),

    #[error("no resumes are staged")]
    NoFilesStaged,

    #[error("job description is blank")]
    BlankJobDescription,

    #[error("{0} is not a PDF file")]
    UnsupportedFile(String),

    #[error("no staged file at position {0}")]
    NoSuchFile(usize),

    #[error("no candidate with resume id {0}")]
    UnknownCandidate(String),

    #[error("resume {0} is already being deleted")]
    DeleteInFlight(String),

    #[error("all data is being cleared")]
    ClearInProgress,

    #[error("resumes are still being deleted")]
    DeletesInFlight,

    #[error("workflow was reset before the request completed")]
    Superseded,
}

/// Result of an action that either ran or was skipped as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    Skipped(Rejection),
}

impl<T> Outcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Skipped(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Outcome::Completed(_) => None,
            Outcome::Skipped(reason) => Some(reason),
        }
    }
}
