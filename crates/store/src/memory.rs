use crate::error::{Result, StoreError};
use crate::{CodeStore, JobUpdate};
use async_trait::async_trait;
use codemap_model::{
    unix_millis, CallEdge, FileRecord, FolderRecord, FunctionRecord, ImportEdge, Job, Language,
};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

/// In-memory repository.
///
/// Stands in for the relational backend: rows live in maps keyed the same
/// way the real schema would be (files and folders by unique path, jobs by
/// id, edge sets as ordered pairs). Shared via `Arc` between the request
/// side and the background pipeline.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    jobs: HashMap<String, Job>,
    files: BTreeMap<String, FileRecord>,
    folders: BTreeMap<String, FolderRecord>,
    import_edges: BTreeSet<ImportEdge>,
    call_edges: BTreeSet<CallEdge>,
    next_id: u64,
    job_seq: u64,
}

impl Inner {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::Other("store lock poisoned".to_string())
    }
}

/// Short stable job id: hex prefix of a hash over sequence and clock
fn job_id(seq: u64, now_ms: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seq.to_le_bytes());
    hasher.update(now_ms.to_le_bytes());
    let digest = hasher.finalize();
    digest[..6].iter().map(|b| format!("{b:02x}")).collect()
}

fn touches(edge_from: &str, edge_to: &str, filter: Option<&str>) -> bool {
    match filter {
        Some(path) => edge_from == path || edge_to == path,
        None => true,
    }
}

#[async_trait]
impl CodeStore for MemoryStore {
    async fn create_job(&self, extract_path: Option<String>) -> Result<Job> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.job_seq += 1;
        let id = job_id(inner.job_seq, unix_millis());
        let job = Job::new(id.clone(), extract_path);
        inner.jobs.insert(id, job.clone());
        log::debug!("created job {}", job.id);
        Ok(job)
    }

    async fn update_job(&self, id: &str, update: JobUpdate) -> Result<Job> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let job = inner
            .jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))?;

        if let Some(next) = update.status {
            if next != job.status && !job.status.can_transition_to(next) {
                return Err(StoreError::InvalidTransition {
                    from: job.status,
                    to: next,
                });
            }
            job.status = next;
        }
        if let Some(message) = update.message {
            job.message = Some(message);
        }
        job.updated_at = unix_millis();
        Ok(job.clone())
    }

    async fn get_job(&self, id: &str) -> Result<Job> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        inner
            .jobs
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))
    }

    async fn upsert_file(
        &self,
        path: &str,
        lang: Language,
        size: u64,
        summary: Option<String>,
    ) -> Result<FileRecord> {
        if path.is_empty() {
            return Err(StoreError::invalid_record("empty file path"));
        }
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        if let Some(existing) = inner.files.get_mut(path) {
            existing.lang = lang;
            existing.size = size;
            if summary.is_some() {
                existing.summary = summary;
            }
            return Ok(existing.clone());
        }
        let id = inner.next_id();
        let record = FileRecord {
            id,
            path: path.to_string(),
            lang,
            size,
            summary,
            functions: Vec::new(),
        };
        inner.files.insert(path.to_string(), record.clone());
        Ok(record)
    }

    async fn upsert_function(
        &self,
        file_id: u64,
        name: &str,
        start_line: u32,
        end_line: u32,
        summary: Option<String>,
    ) -> Result<FunctionRecord> {
        if name.is_empty() {
            return Err(StoreError::invalid_record("empty function name"));
        }
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        let id = inner.next_id();
        let file = inner
            .files
            .values_mut()
            .find(|f| f.id == file_id)
            .ok_or_else(|| StoreError::FileNotFound(format!("file id {file_id}")))?;

        // (file_id, name, start_line) is the uniqueness key
        if let Some(existing) = file
            .functions
            .iter_mut()
            .find(|f| f.name == name && f.start_line == start_line)
        {
            existing.end_line = end_line;
            if summary.is_some() {
                existing.summary = summary;
            }
            return Ok(existing.clone());
        }

        let record = FunctionRecord {
            id,
            file_id,
            name: name.to_string(),
            start_line,
            end_line,
            summary,
        };
        file.functions.push(record.clone());
        Ok(record)
    }

    async fn upsert_folder(&self, path: &str, summary: Option<String>) -> Result<FolderRecord> {
        if path.is_empty() {
            return Err(StoreError::invalid_record("empty folder path"));
        }
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        if let Some(existing) = inner.folders.get_mut(path) {
            if summary.is_some() {
                existing.summary = summary;
            }
            return Ok(existing.clone());
        }
        let id = inner.next_id();
        let record = FolderRecord {
            id,
            path: path.to_string(),
            summary,
        };
        inner.folders.insert(path.to_string(), record.clone());
        Ok(record)
    }

    async fn add_import_edge(&self, from: &str, to: &str) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.import_edges.insert(ImportEdge {
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }

    async fn add_call_edge(&self, from: &str, to: &str) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_poisoned())?;
        inner.call_edges.insert(CallEdge {
            from: from.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }

    async fn list_files(&self, with_functions: bool) -> Result<Vec<FileRecord>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner
            .files
            .values()
            .map(|f| {
                let mut record = f.clone();
                if !with_functions {
                    record.functions.clear();
                }
                record
            })
            .collect())
    }

    async fn list_folders(&self) -> Result<Vec<FolderRecord>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner.folders.values().cloned().collect())
    }

    async fn list_import_edges(&self, filter: Option<&str>) -> Result<Vec<ImportEdge>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner
            .import_edges
            .iter()
            .filter(|e| touches(&e.from, &e.to, filter))
            .cloned()
            .collect())
    }

    async fn list_call_edges(&self, filter: Option<&str>) -> Result<Vec<CallEdge>> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        Ok(inner
            .call_edges
            .iter()
            .filter(|e| touches(&e.from, &e.to, filter))
            .cloned()
            .collect())
    }

    async fn get_file(&self, path: &str) -> Result<FileRecord> {
        let inner = self.inner.read().map_err(|_| Self::lock_poisoned())?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| StoreError::FileNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codemap_model::JobStatus;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn job_lifecycle_enforced() {
        let store = MemoryStore::new();
        let job = store.create_job(None).await.unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        let job = store
            .update_job(&job.id, JobUpdate::status(JobStatus::Processing, "working"))
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.message.as_deref(), Some("working"));

        let job = store
            .update_job(&job.id, JobUpdate::status(JobStatus::Completed, "done"))
            .await
            .unwrap();
        assert_eq!(job.status, JobStatus::Completed);

        // terminal states are frozen
        let err = store
            .update_job(&job.id, JobUpdate::status(JobStatus::Processing, "again"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let store = MemoryStore::new();
        let err = store.get_job("missing").await.unwrap_err();
        assert!(matches!(err, StoreError::JobNotFound(_)));
    }

    #[tokio::test]
    async fn upsert_file_is_keyed_by_path() {
        let store = MemoryStore::new();
        let first = store
            .upsert_file("src/a.ts", Language::TypeScript, 10, None)
            .await
            .unwrap();
        let second = store
            .upsert_file("src/a.ts", Language::TypeScript, 42, Some("updated".into()))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.size, 42);
        assert_eq!(second.summary.as_deref(), Some("updated"));
        assert_eq!(store.list_files(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn upsert_function_unique_on_name_and_start() {
        let store = MemoryStore::new();
        let file = store
            .upsert_file("src/a.ts", Language::TypeScript, 10, None)
            .await
            .unwrap();

        store
            .upsert_function(file.id, "run", 1, 5, None)
            .await
            .unwrap();
        // same name, same start: updates in place
        store
            .upsert_function(file.id, "run", 1, 9, None)
            .await
            .unwrap();
        // same name, different start: a second record
        store
            .upsert_function(file.id, "run", 20, 30, None)
            .await
            .unwrap();

        let files = store.list_files(true).await.unwrap();
        assert_eq!(files[0].functions.len(), 2);
        assert_eq!(files[0].functions[0].end_line, 9);
    }

    #[tokio::test]
    async fn edges_are_idempotent() {
        let store = MemoryStore::new();
        store.add_import_edge("a.ts", "b.ts").await.unwrap();
        store.add_import_edge("a.ts", "b.ts").await.unwrap();
        store.add_import_edge("b.ts", "a.ts").await.unwrap();

        assert_eq!(store.list_import_edges(None).await.unwrap().len(), 2);
        assert_eq!(store.list_import_edges(Some("a.ts")).await.unwrap().len(), 2);
        assert_eq!(
            store.list_import_edges(Some("c.ts")).await.unwrap().len(),
            0
        );
    }

    #[tokio::test]
    async fn list_files_can_strip_functions() {
        let store = MemoryStore::new();
        let file = store
            .upsert_file("src/a.ts", Language::TypeScript, 10, None)
            .await
            .unwrap();
        store
            .upsert_function(file.id, "run", 1, 5, None)
            .await
            .unwrap();

        let bare = store.list_files(false).await.unwrap();
        assert!(bare[0].functions.is_empty());
        let full = store.list_files(true).await.unwrap();
        assert_eq!(full[0].functions.len(), 1);
    }
}
