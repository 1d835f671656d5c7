use crate::error::Result;
use crate::extract::{extract_functions, FunctionFact};
use crate::link::{extract_import_specifiers, resolve_import, same_file_calls};
use crate::scanner::scan_source_files;
use crate::summarize::Summarizer;
use codemap_model::{JobStatus, Language};
use codemap_store::{CodeStore, JobUpdate};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Background fact-extraction pipeline.
///
/// One detached task per ingest job, fire and forget: the submitting
/// request holds no channel to it. Progress and failure surface only
/// through the job row. Stages run sequentially; a stage failure moves the
/// job to `failed` with the error detail in its message, and facts already
/// persisted by earlier stages are retained.
pub struct IngestPipeline {
    store: Arc<dyn CodeStore>,
    summarizer: Arc<dyn Summarizer>,
}

struct AnalyzedFile {
    file_id: u64,
    rel_path: String,
    language: Language,
    size: u64,
    content: String,
    functions: Vec<FunctionFact>,
}

impl IngestPipeline {
    pub fn new(store: Arc<dyn CodeStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { store, summarizer }
    }

    /// Detach the pipeline for `job_id` over the project at `root`.
    ///
    /// `scratch` keeps the extraction directory alive for the lifetime of
    /// the task. The handle is returned for tests; production callers drop
    /// it (cancellation is not supported).
    pub fn spawn(&self, job_id: String, root: PathBuf, scratch: Option<TempDir>) -> JoinHandle<()> {
        let pipeline = Self {
            store: Arc::clone(&self.store),
            summarizer: Arc::clone(&self.summarizer),
        };
        tokio::spawn(async move {
            let _scratch = scratch;
            if let Err(e) = pipeline.run(&job_id, &root).await {
                log::error!("job {job_id} failed: {e}");
                let update = JobUpdate::status(JobStatus::Failed, e.to_string());
                if let Err(update_err) = pipeline.store.update_job(&job_id, update).await {
                    log::error!("could not record failure of job {job_id}: {update_err}");
                }
            }
        })
    }

    /// Run all stages to completion. Exposed for tests and synchronous
    /// callers; `spawn` is the production entry point.
    pub async fn run(&self, job_id: &str, root: &Path) -> Result<()> {
        self.store
            .update_job(
                job_id,
                JobUpdate::status(JobStatus::Processing, "analyzing source files"),
            )
            .await?;
        let analyzed = self.stage_analyze(root).await?;

        self.store
            .update_job(job_id, JobUpdate::message("summarizing files and folders"))
            .await?;
        self.stage_summarize(&analyzed).await?;

        self.store
            .update_job(job_id, JobUpdate::message("linking imports and calls"))
            .await?;
        self.stage_link(&analyzed).await?;

        let function_total: usize = analyzed.iter().map(|f| f.functions.len()).sum();
        self.store
            .update_job(
                job_id,
                JobUpdate::status(
                    JobStatus::Completed,
                    format!(
                        "analyzed {} files, {function_total} functions",
                        analyzed.len()
                    ),
                ),
            )
            .await?;
        Ok(())
    }

    /// Stage 1: persist file rows and structural function facts.
    /// Per-file problems are logged and skipped, never fatal to the batch.
    async fn stage_analyze(&self, root: &Path) -> Result<Vec<AnalyzedFile>> {
        let mut analyzed = Vec::new();

        for path in scan_source_files(root) {
            let rel_path = match relative_path(root, &path) {
                Some(p) => p,
                None => continue,
            };
            let content = match std::fs::read_to_string(&path) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("skipping unreadable file {rel_path}: {e}");
                    continue;
                }
            };
            let language = Language::from_path(&path);
            let size = content.len() as u64;

            let record = self
                .store
                .upsert_file(&rel_path, language, size, None)
                .await?;

            let functions = match extract_functions(language, &content) {
                Ok(facts) => facts,
                Err(e) => {
                    log::warn!("no structural facts for {rel_path}: {e}");
                    Vec::new()
                }
            };
            for fact in &functions {
                self.store
                    .upsert_function(record.id, &fact.name, fact.start_line, fact.end_line, None)
                    .await?;
            }

            analyzed.push(AnalyzedFile {
                file_id: record.id,
                rel_path,
                language,
                size,
                content,
                functions,
            });
        }

        log::info!("analyzed {} files under {}", analyzed.len(), root.display());
        Ok(analyzed)
    }

    /// Stage 2: file summaries plus folder rows for every ancestor dir
    async fn stage_summarize(&self, analyzed: &[AnalyzedFile]) -> Result<()> {
        for file in analyzed {
            match self
                .summarizer
                .summarize_file(&file.rel_path, file.language, &file.content)
                .await
            {
                Ok(Some(summary)) => {
                    self.store
                        .upsert_file(&file.rel_path, file.language, file.size, Some(summary))
                        .await?;
                }
                Ok(None) => {}
                Err(e) => log::warn!("summarization failed for {}: {e}", file.rel_path),
            }
        }

        // every ancestor directory of an analyzed file gets a folder row
        let mut folder_files: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for file in analyzed {
            for ancestor in ancestors(&file.rel_path) {
                folder_files
                    .entry(ancestor)
                    .or_default()
                    .push(file.rel_path.clone());
            }
        }
        for (folder, files) in &folder_files {
            match self.summarizer.summarize_folder(folder, files).await {
                Ok(summary) => {
                    self.store.upsert_folder(folder, summary).await?;
                }
                Err(e) => {
                    log::warn!("summarization failed for folder {folder}: {e}");
                    self.store.upsert_folder(folder, None).await?;
                }
            }
        }
        Ok(())
    }

    /// Stage 3: import edges between known files, call edges within files
    async fn stage_link(&self, analyzed: &[AnalyzedFile]) -> Result<()> {
        let known: HashSet<String> = analyzed.iter().map(|f| f.rel_path.clone()).collect();
        let mut resolved: BTreeSet<(String, String)> = BTreeSet::new();

        for file in analyzed {
            for spec in extract_import_specifiers(file.language, &file.content) {
                if let Some(target) = resolve_import(file.language, &file.rel_path, &spec, &known)
                {
                    if target != file.rel_path {
                        resolved.insert((file.rel_path.clone(), target));
                    }
                }
            }
            for (from, to) in same_file_calls(&file.rel_path, &file.content, &file.functions) {
                self.store.add_call_edge(&from, &to).await?;
            }
        }

        for (from, to) in &resolved {
            self.store.add_import_edge(from, to).await?;
        }
        Ok(())
    }
}

/// Repository-relative path with forward slashes
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(parts.join("/"))
}

/// Proper ancestor directories of a relative file path, nearest last
fn ancestors(rel_path: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut prefix = String::new();
    let segments: Vec<&str> = rel_path.split('/').collect();
    for segment in &segments[..segments.len().saturating_sub(1)] {
        if !prefix.is_empty() {
            prefix.push('/');
        }
        prefix.push_str(segment);
        out.push(prefix.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::HeuristicSummarizer;
    use codemap_store::MemoryStore;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn pipeline(store: &Arc<MemoryStore>) -> IngestPipeline {
        let store: Arc<dyn CodeStore> = Arc::clone(store) as Arc<dyn CodeStore>;
        IngestPipeline::new(store, Arc::new(HeuristicSummarizer))
    }

    fn fixture() -> tempfile::TempDir {
        let temp = tempdir().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("main.ts"),
            "import { helper } from './util';\nexport function main() {\n  return helper();\n}\n",
        )
        .unwrap();
        fs::write(
            src.join("util.ts"),
            "// Small helper.\nexport function helper() {\n  return 1;\n}\n",
        )
        .unwrap();
        temp
    }

    #[tokio::test]
    async fn full_run_persists_facts_and_completes_job() {
        let store = Arc::new(MemoryStore::new());
        let temp = fixture();
        let job = store.create_job(None).await.unwrap();

        pipeline(&store).run(&job.id, temp.path()).await.unwrap();

        let job = store.get_job(&job.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(
            job.message.as_deref(),
            Some("analyzed 2 files, 2 functions")
        );

        let files = store.list_files(true).await.unwrap();
        assert_eq!(files.len(), 2);
        let util = files.iter().find(|f| f.path == "src/util.ts").unwrap();
        assert_eq!(util.functions.len(), 1);
        assert_eq!(util.summary.as_deref(), Some("Small helper."));

        let folders = store.list_folders().await.unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].path, "src");

        let edges = store.list_import_edges(None).await.unwrap();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].from, "src/main.ts");
        assert_eq!(edges[0].to, "src/util.ts");
    }

    #[tokio::test]
    async fn spawn_is_detached_and_observable_via_job() {
        let store = Arc::new(MemoryStore::new());
        let temp = fixture();
        let job = store.create_job(None).await.unwrap();

        let handle = pipeline(&store).spawn(job.id.clone(), temp.path().to_path_buf(), None);
        handle.await.unwrap();

        let job = store.get_job(&job.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test]
    async fn empty_project_completes_with_zero_counts() {
        let store = Arc::new(MemoryStore::new());
        let temp = tempdir().unwrap();
        let job = store.create_job(None).await.unwrap();

        pipeline(&store).run(&job.id, temp.path()).await.unwrap();

        let job = store.get_job(&job.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.message.as_deref(), Some("analyzed 0 files, 0 functions"));
    }

    #[tokio::test]
    async fn failure_is_recorded_on_the_job() {
        let store = Arc::new(MemoryStore::new());
        let temp = fixture();

        // unknown job id: the first transition fails, spawn records nothing
        // more but the run error carries the not-found detail
        let err = pipeline(&store).run("missing", temp.path()).await.unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn ancestors_are_ordered_prefixes() {
        assert_eq!(
            ancestors("a/b/c.ts"),
            vec!["a".to_string(), "a/b".to_string()]
        );
        assert!(ancestors("top.ts").is_empty());
    }
}
