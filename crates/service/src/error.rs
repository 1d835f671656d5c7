use codemap_store::StoreError;
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Caller-visible outcomes that are not plain successes.
///
/// Not-found and no-data conditions are distinct variants, never folded
/// into a generic failure.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Unknown job id
    #[error("job not found: {0}")]
    JobNotFound(String),

    /// Unknown file path
    #[error("file not found: {0}")]
    FileNotFound(String),

    /// No analyzed data persisted yet; distinct from an empty success
    #[error("no analyzed data available yet")]
    NoData,

    /// Synchronous ingest rejection (oversized or unreadable archive)
    #[error(transparent)]
    Ingest(#[from] codemap_ingest::IngestError),

    /// Store failure
    #[error("store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::JobNotFound(id) => ServiceError::JobNotFound(id),
            StoreError::FileNotFound(path) => ServiceError::FileNotFound(path),
            other => ServiceError::Store(other),
        }
    }
}
