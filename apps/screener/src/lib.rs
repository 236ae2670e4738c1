//! Client-side workflow for batch resume screening.
//!
//! Resumes and a job description are staged locally, uploaded to a remote
//! screening service, matched, and the returned candidate evaluations are kept
//! in an in-memory collection that can be ranked, expanded, pruned, or cleared.
//! All scoring happens on the service.
//!
//! ```no_run
//! use screener::{Config, Orchestrator, SortKey, UploadFile};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! screener::telemetry::init_tracing(&config);
//!
//! let orchestrator = Orchestrator::from_config(&config)?;
//! orchestrator.start().await?;
//! let resume = UploadFile::from_path("resumes/jane_doe.pdf").await?;
//! orchestrator
//!     .submit_batch(vec![resume], "Senior Rust engineer, distributed systems")
//!     .await?;
//!
//! for ranked in orchestrator.candidates().sorted_view(SortKey::OverallScore).await {
//!     println!("{} {:.1}", ranked.candidate.candidate_name, ranked.candidate.overall_score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod candidates;
pub mod config;
pub mod errors;
pub mod service;
mod state;
pub mod telemetry;
pub mod workflow;

pub use candidates::collection::{DeletionState, RankedCandidate};
pub use candidates::manager::CandidateManager;
pub use candidates::models::{Candidate, Recommendation, ScoreTier, SortKey};
pub use candidates::stats::CollectionStats;
pub use config::Config;
pub use errors::{ErrorKind, Outcome, Rejection, ScreeningError};
pub use service::{
    HttpScreeningService, MatchResult, ScreeningService, ServiceError, UploadReceipt,
};
pub use workflow::orchestrator::{Orchestrator, StagedFile, WorkflowSnapshot};
pub use workflow::stage::WorkflowStage;
pub use workflow::staging::{StagingBuffer, UploadFile};
