//! # Codemap Model
//!
//! Shared data model for the codemap pipeline.
//!
//! ## Pieces
//!
//! ```text
//! Archive
//!     │
//!     ├──> TreeNode hierarchy (dirs / files / functions)
//!     │
//!     ├──> Persisted facts (FileRecord, FunctionRecord, FolderRecord)
//!     │      └─> ImportEdge / CallEdge relationship sets
//!     │
//!     └──> Job (background analysis lifecycle)
//! ```
//!
//! Everything here is plain data: no I/O, no async, no hidden state.

mod complexity;
mod job;
mod language;
mod records;
mod tree;

pub use complexity::Complexity;
pub use job::{unix_millis, Job, JobStatus};
pub use language::Language;
pub use records::{CallEdge, FileRecord, FolderRecord, FunctionRecord, ImportEdge};
pub use tree::{NodeKind, NodeMetadata, TreeNode};
