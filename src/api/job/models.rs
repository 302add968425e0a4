use serde::{Deserialize, Serialize};

/// Lifecycle status of a job
///
/// New jobs start WAITING (or PAUSED when created with the pause flag).
/// The transition table in [`JobStatus::can_transition_to`] is the
/// contract for the worker that will eventually consume WAITING jobs;
/// nothing in this service drives it yet, and the generic job-update
/// endpoint deliberately bypasses it as an administrative override.
//
// TODO: add the worker loop that claims WAITING jobs and advances them
// through this table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Waiting,
    Paused,
    Running,
    Failed,
    Finished,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Waiting => "WAITING",
            JobStatus::Paused => "PAUSED",
            JobStatus::Running => "RUNNING",
            JobStatus::Failed => "FAILED",
            JobStatus::Finished => "FINISHED",
        }
    }

    /// FINISHED and FAILED are terminal; no transition leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Failed | JobStatus::Finished)
    }

    /// The fixed transition table a conforming worker must follow
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Waiting, Running) | (Paused, Waiting) | (Running, Finished) | (Running, Failed)
        )
    }
}
