//! # Codemap Ingest
//!
//! Everything between an uploaded archive and persisted analysis facts.
//!
//! ## Pipeline
//!
//! ```text
//! archive.zip
//!     │
//!     ├──> Unpacker (size cap, zip-slip guard, scratch dir)
//!     │
//!     ├──> Source Scanner (noise-filtered flat walk)
//!     │
//!     └──> Background pipeline (detached task per job)
//!            ├─ analyze:   per-language function facts -> store
//!            ├─ summarize: Summarizer boundary -> file/folder summaries
//!            └─ link:      import + call edges -> store
//! ```
//!
//! The background pipeline is fire and forget: the submitting request holds
//! no channel to it, and observes progress only through the job row.

mod error;
mod extract;
mod link;
mod pipeline;
mod scanner;
mod summarize;
mod unpack;

pub use error::{IngestError, Result};
pub use extract::{extract_functions, FunctionFact};
pub use link::{extract_import_specifiers, resolve_import, same_file_calls};
pub use pipeline::IngestPipeline;
pub use scanner::scan_source_files;
pub use summarize::{HeuristicSummarizer, Summarizer};
pub use unpack::{unpack_archive, unpack_to_temp, MAX_ARCHIVE_BYTES};
