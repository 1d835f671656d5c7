use thiserror::Error;

/// Result type for walk operations
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors that can occur while walking or merging trees
#[derive(Error, Debug)]
pub enum WalkError {
    /// The walk root itself could not be read
    #[error("unreadable root {path}: {source}")]
    UnreadableRoot {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
