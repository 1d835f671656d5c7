//! # Codemap Walk
//!
//! The tree side of the pipeline:
//!
//! ```text
//! Extraction dir
//!     │
//!     ├──> Root Locator (heuristic scoring, skips wrapper folders)
//!     │      └─> project root path
//!     │
//!     ├──> Tree Builder (recursive walk, noise filtered)
//!     │      └─> immediate TreeNode hierarchy
//!     │
//!     └──> Tree Reconciler (persisted facts -> merged hierarchy)
//!            └─> deterministic, duplicate-free tree
//! ```
//!
//! The locator and the builder touch the filesystem fail-soft: a bad entry
//! is skipped, never fatal. The reconciler is a pure in-memory transform.

mod builder;
mod error;
mod locate;
mod reconcile;

pub use builder::{build_tree, is_excluded_name};
pub use error::{Result, WalkError};
pub use locate::{locate_root, score_dir, RootScore, ScoreFactor, MAX_LOCATE_DEPTH, ROOT_SCORE_THRESHOLD};
pub use reconcile::{reconcile, ReconciledTree};
