//! # Codemap Service
//!
//! The operations the core exposes to callers (a web layer, the CLI, or
//! tests):
//!
//! - submit an archive → immediate tree plus a job id
//! - poll a job by id
//! - request the reconciled tree once facts are persisted
//! - request per-file node detail with edges
//!
//! The service owns no state of its own: everything flows through the
//! shared [`CodeStore`] handle, which the detached ingest pipeline also
//! writes to.

mod error;
mod views;

pub use error::{Result, ServiceError};
pub use views::{FunctionDetail, IngestReceipt, JobView, NodeDetail, TreeOverview};

use codemap_ingest::{unpack_to_temp, HeuristicSummarizer, IngestPipeline, Summarizer};
use codemap_model::{NodeKind, TreeNode};
use codemap_store::CodeStore;
use codemap_walk::{build_tree, locate_root, reconcile};
use std::path::Path;
use std::sync::Arc;

/// Facade over the ingest pipeline and the read endpoints
pub struct Codemap {
    store: Arc<dyn CodeStore>,
    pipeline: IngestPipeline,
}

impl Codemap {
    /// Service with the default offline summarizer
    pub fn new(store: Arc<dyn CodeStore>) -> Self {
        Self::with_summarizer(store, Arc::new(HeuristicSummarizer))
    }

    pub fn with_summarizer(store: Arc<dyn CodeStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        let pipeline = IngestPipeline::new(Arc::clone(&store), summarizer);
        Self { store, pipeline }
    }

    /// Submit an archive for extraction and background analysis.
    ///
    /// Synchronous part: size check, extraction, root detection, immediate
    /// tree. The analysis itself is spawned fire-and-forget; this returns
    /// as soon as the job row exists. Input errors (oversized or unreadable
    /// archives) are reported here and create no job.
    pub async fn submit_archive(&self, archive: &Path) -> Result<IngestReceipt> {
        let scratch = unpack_to_temp(archive)?;
        let root = locate_root(scratch.path());

        let tree = match build_tree(&root) {
            Ok(tree) => tree,
            Err(e) => {
                // only a totally unreadable root lands here; degrade to an
                // empty tree rather than failing the submission
                log::error!("tree build failed for {}: {e}", root.display());
                TreeNode::new(NodeKind::Dir, "", "root")
            }
        };

        let job = self
            .store
            .create_job(Some(root.display().to_string()))
            .await?;
        log::info!("job {} created for {}", job.id, root.display());

        self.pipeline.spawn(job.id.clone(), root, Some(scratch));

        Ok(IngestReceipt {
            job_id: job.id,
            tree,
        })
    }

    /// Current job state for polling callers
    pub async fn job_status(&self, id: &str) -> Result<JobView> {
        let job = self.store.get_job(id).await?;
        Ok(JobView::from(job))
    }

    /// The merged tree over all persisted facts, plus aggregate counts.
    /// Yields [`ServiceError::NoData`] while nothing is persisted yet.
    pub async fn reconciled_tree(&self) -> Result<TreeOverview> {
        let files = self.store.list_files(true).await?;
        if files.is_empty() {
            return Err(ServiceError::NoData);
        }
        let folders = self.store.list_folders().await?;
        let merged = reconcile(&files, &folders);
        Ok(TreeOverview {
            tree: merged.root,
            files: merged.files,
            folders: merged.folders,
            functions: merged.functions,
        })
    }

    /// One file's record, its functions with complexity, and its direct
    /// import / imported-by edge lists
    pub async fn node_detail(&self, path: &str) -> Result<NodeDetail> {
        let file = self.store.get_file(path).await?;
        let edges = self.store.list_import_edges(Some(path)).await?;

        let mut imports = Vec::new();
        let mut imported_by = Vec::new();
        for edge in edges {
            if edge.from == path {
                imports.push(edge.to);
            } else {
                imported_by.push(edge.from);
            }
        }

        Ok(NodeDetail::new(file, imports, imported_by))
    }
}
