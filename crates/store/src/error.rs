use codemap_model::JobStatus;
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur against the persistence collaborator
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unknown job id; distinct from a transient failure
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// Unknown file path; distinct from a transient failure
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// Rejected job state transition
    #[error("invalid job transition: {from:?} -> {to:?}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    /// Record that violates a structural constraint
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Generic backend failure
    #[error("{0}")]
    Other(String),
}

impl StoreError {
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }
}
