use thiserror::Error;

/// Result type for ingest operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors that can occur while ingesting an archive
#[derive(Error, Debug)]
pub enum IngestError {
    /// Archive over the accepted size limit; reported synchronously,
    /// before any job exists
    #[error("archive is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    /// Not a readable ZIP archive
    #[error("bad archive: {0}")]
    BadArchive(String),

    /// Parse failure from the structural fact extractor
    #[error("parse error: {0}")]
    ParseError(String),

    /// Store error
    #[error(transparent)]
    Store(#[from] codemap_store::StoreError),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IngestError {
    pub fn bad_archive(msg: impl Into<String>) -> Self {
        Self::BadArchive(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }
}
