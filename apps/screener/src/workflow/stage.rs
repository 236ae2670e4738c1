use std::fmt;

use serde::Serialize;

/// Where the user is in the screening workflow.
///
/// ```text
/// Idle ──start──▶ Collecting ──submit──▶ Submitting ──analyzed──▶ Reviewing
///                     ▲                      │                        │
///                     └───────abort──────────┘                        │
///                     ▲                                               │
///                     └──────────────────start────────────────────────┘
/// any ──reset──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    #[default]
    Idle,
    Collecting,
    Submitting,
    Reviewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Start,
    Submit,
    Analyzed,
    Abort,
    Reset,
}

impl WorkflowStage {
    /// The stage reached by applying `transition`, or `None` when the
    /// transition is not valid from here.
    pub fn next(self, transition: Transition) -> Option<WorkflowStage> {
        use Transition::*;
        use WorkflowStage::*;

        match (self, transition) {
            (_, Reset) => Some(Idle),
            (Idle | Collecting | Reviewing, Start) => Some(Collecting),
            (Collecting, Submit) => Some(Submitting),
            (Submitting, Analyzed) => Some(Reviewing),
            (Submitting, Abort) => Some(Collecting),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStage::Idle => "idle",
            WorkflowStage::Collecting => "collecting",
            WorkflowStage::Submitting => "submitting",
            WorkflowStage::Reviewing => "reviewing",
        }
    }
}

impl fmt::Display for WorkflowStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
