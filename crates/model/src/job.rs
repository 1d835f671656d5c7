use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Background analysis job status.
///
/// `Pending` is the only initial state. `Completed` and `Failed` are
/// terminal: once reached, no further transition is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether the state machine accepts a transition to `next`
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match self {
            JobStatus::Pending => next != JobStatus::Pending,
            JobStatus::Processing => next.is_terminal(),
            JobStatus::Completed | JobStatus::Failed => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

/// One background ingest job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Human-readable progress or error detail, updated on every transition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Filesystem anchor of the located project root for this job
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_path: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Job {
    /// Fresh pending job
    pub fn new(id: impl Into<String>, extract_path: Option<String>) -> Self {
        let now = unix_millis();
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            message: None,
            extract_path,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Current wall-clock time as unix milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_is_pending() {
        let job = Job::new("j1", None);
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.message.is_none());
        assert_eq!(job.created_at, job.updated_at);
    }

    #[test]
    fn terminal_states_are_frozen() {
        for terminal in [JobStatus::Completed, JobStatus::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                JobStatus::Pending,
                JobStatus::Processing,
                JobStatus::Completed,
                JobStatus::Failed,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn pending_and_processing_can_progress() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Processing));
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Processing.can_transition_to(JobStatus::Failed));
        assert!(!JobStatus::Processing.can_transition_to(JobStatus::Pending));
    }
}
