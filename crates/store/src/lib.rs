//! # Codemap Store
//!
//! The abstract persistence collaborator behind the ingest pipeline and the
//! read endpoints. The [`CodeStore`] trait is the whole contract; the
//! in-memory [`MemoryStore`] stands in for a relational backend and is what
//! the service and the tests run against.
//!
//! All mutations are record-level upserts scoped to one job's analysis run.
//! File paths are globally unique across jobs (single-tenant model):
//! concurrent ingests that share paths overwrite each other's rows.

mod error;
mod memory;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;

use async_trait::async_trait;
use codemap_model::{
    CallEdge, FileRecord, FolderRecord, FunctionRecord, ImportEdge, Job, JobStatus, Language,
};

/// Partial update applied to a job row.
///
/// A `None` field leaves the current value untouched; `message` set alongside
/// a status carries the human-readable progress/error detail.
#[derive(Debug, Clone, Default)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub message: Option<String>,
}

impl JobUpdate {
    pub fn status(status: JobStatus, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: Some(message.into()),
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: Some(message.into()),
        }
    }
}

/// Repository operations the core consumes.
///
/// Job transitions are validated here: updating a terminal job yields
/// [`StoreError::InvalidTransition`]. Edge inserts are idempotent on the
/// (from, to) pair.
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Create a fresh pending job
    async fn create_job(&self, extract_path: Option<String>) -> Result<Job>;

    /// Apply a partial update, enforcing the state machine
    async fn update_job(&self, id: &str, update: JobUpdate) -> Result<Job>;

    /// Look up a job by id
    async fn get_job(&self, id: &str) -> Result<Job>;

    /// Insert or update the file row for `path`
    async fn upsert_file(
        &self,
        path: &str,
        lang: Language,
        size: u64,
        summary: Option<String>,
    ) -> Result<FileRecord>;

    /// Insert or update a function row, unique on (file_id, name, start_line)
    async fn upsert_function(
        &self,
        file_id: u64,
        name: &str,
        start_line: u32,
        end_line: u32,
        summary: Option<String>,
    ) -> Result<FunctionRecord>;

    /// Insert or update the folder row for `path`
    async fn upsert_folder(&self, path: &str, summary: Option<String>) -> Result<FolderRecord>;

    /// Record a file-level import edge; a no-op if already present
    async fn add_import_edge(&self, from: &str, to: &str) -> Result<()>;

    /// Record a function-level call edge; a no-op if already present
    async fn add_call_edge(&self, from: &str, to: &str) -> Result<()>;

    /// All file rows, optionally with their function rows attached
    async fn list_files(&self, with_functions: bool) -> Result<Vec<FileRecord>>;

    /// All folder rows
    async fn list_folders(&self) -> Result<Vec<FolderRecord>>;

    /// Import edges, optionally filtered to those touching `path`
    async fn list_import_edges(&self, filter: Option<&str>) -> Result<Vec<ImportEdge>>;

    /// Call edges, optionally filtered to those touching `path`
    async fn list_call_edges(&self, filter: Option<&str>) -> Result<Vec<CallEdge>>;

    /// One file row (with functions) by path
    async fn get_file(&self, path: &str) -> Result<FileRecord>;
}
