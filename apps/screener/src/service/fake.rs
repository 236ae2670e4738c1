//! Scriptable in-memory [`ScreeningService`] for unit tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::candidates::models::Candidate;
use crate::service::{MatchResult, ScreeningService, ServiceError, UploadReceipt};
use crate::workflow::staging::UploadFile;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload(Vec<String>),
    Match {
        job_description: String,
        batch_id: Option<String>,
    },
    Delete(String),
    DeleteAll,
}

#[derive(Default)]
struct Script {
    upload: Option<Result<UploadReceipt, String>>,
    matched: Option<Result<Vec<Candidate>, String>>,
    failing_deletes: HashSet<String>,
    delete_all_fails: bool,
    hold_uploads: Option<Arc<Notify>>,
    hold_deletes: Option<Arc<Notify>>,
    hold_delete_all: Option<Arc<Notify>>,
}

#[derive(Default)]
pub struct FakeService {
    script: Mutex<Script>,
    calls: Mutex<Vec<Call>>,
}

fn api_error(detail: &str) -> ServiceError {
    ServiceError::Api {
        status: 500,
        detail: detail.to_string(),
    }
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Upload acknowledges every file and match returns `candidates`.
    pub fn succeeding(candidates: Vec<Candidate>) -> Arc<Self> {
        let fake = Self::new();
        fake.match_returns(Ok(candidates));
        fake
    }

    pub fn upload_returns(&self, reply: Result<UploadReceipt, String>) {
        self.script.lock().unwrap().upload = Some(reply);
    }

    pub fn match_returns(&self, reply: Result<Vec<Candidate>, String>) {
        self.script.lock().unwrap().matched = Some(reply);
    }

    pub fn fail_delete_of(&self, resume_id: &str) {
        self.script
            .lock()
            .unwrap()
            .failing_deletes
            .insert(resume_id.to_string());
    }

    pub fn fail_delete_all(&self) {
        self.script.lock().unwrap().delete_all_fails = true;
    }

    /// Uploads park until the returned handle is notified.
    pub fn hold_uploads(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.script.lock().unwrap().hold_uploads = Some(gate.clone());
        gate
    }

    /// Single-resume deletes park until the returned handle is notified.
    pub fn hold_deletes(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.script.lock().unwrap().hold_deletes = Some(gate.clone());
        gate
    }

    /// Delete-all requests park until the returned handle is notified.
    pub fn hold_delete_all(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.script.lock().unwrap().hold_delete_all = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    /// Yields until at least `n` calls matching `predicate` were recorded.
    pub async fn wait_for(&self, n: usize, predicate: impl Fn(&Call) -> bool) {
        while self.count(&predicate) < n {
            tokio::task::yield_now().await;
        }
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ScreeningService for FakeService {
    async fn upload_batch(&self, files: &[UploadFile]) -> Result<UploadReceipt, ServiceError> {
        self.record(Call::Upload(
            files.iter().map(|f| f.name().to_string()).collect(),
        ));
        let (reply, gate) = {
            let script = self.script.lock().unwrap();
            (script.upload.clone(), script.hold_uploads.clone())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match reply {
            Some(Ok(receipt)) => Ok(receipt),
            Some(Err(detail)) => Err(api_error(&detail)),
            None => Ok(UploadReceipt {
                successful: files.len(),
                total: files.len(),
                detail: None,
                batch_id: None,
            }),
        }
    }

    async fn match_candidates(
        &self,
        job_description: &str,
        batch_id: Option<&str>,
    ) -> Result<MatchResult, ServiceError> {
        self.record(Call::Match {
            job_description: job_description.to_string(),
            batch_id: batch_id.map(String::from),
        });
        let reply = self.script.lock().unwrap().matched.clone();
        match reply {
            Some(Ok(candidates)) => Ok(MatchResult {
                shortlisted_candidates: candidates,
            }),
            Some(Err(detail)) => Err(api_error(&detail)),
            None => Ok(MatchResult {
                shortlisted_candidates: vec![],
            }),
        }
    }

    async fn delete_resume(&self, resume_id: &str) -> Result<(), ServiceError> {
        self.record(Call::Delete(resume_id.to_string()));
        let (fails, gate) = {
            let script = self.script.lock().unwrap();
            (
                script.failing_deletes.contains(resume_id),
                script.hold_deletes.clone(),
            )
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if fails {
            Err(api_error("Resume not found"))
        } else {
            Ok(())
        }
    }

    async fn delete_all_resumes(&self) -> Result<(), ServiceError> {
        self.record(Call::DeleteAll);
        let (fails, gate) = {
            let script = self.script.lock().unwrap();
            (script.delete_all_fails, script.hold_delete_all.clone())
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if fails {
            Err(api_error("Storage unavailable"))
        } else {
            Ok(())
        }
    }
}
