use codemap_model::{Complexity, FileRecord, Job, JobStatus, TreeNode};
use serde::Serialize;

/// Immediate response to an archive submission
#[derive(Debug, Serialize)]
pub struct IngestReceipt {
    pub job_id: String,
    pub tree: TreeNode,
}

/// Poll view of one job
#[derive(Debug, Clone, Serialize)]
pub struct JobView {
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<Job> for JobView {
    fn from(job: Job) -> Self {
        Self {
            id: job.id,
            status: job.status,
            message: job.message,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

/// Reconciled tree with aggregate counts
#[derive(Debug, Serialize)]
pub struct TreeOverview {
    pub tree: TreeNode,
    pub files: usize,
    pub folders: usize,
    pub functions: usize,
}

/// One function row with its derived complexity class
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDetail {
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub complexity: Complexity,
}

/// Per-file detail: record, functions, and direct edge lists
#[derive(Debug, Serialize)]
pub struct NodeDetail {
    pub path: String,
    pub lang: String,
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub functions: Vec<FunctionDetail>,
    pub imports: Vec<String>,
    pub imported_by: Vec<String>,
}

impl NodeDetail {
    pub fn new(file: FileRecord, imports: Vec<String>, imported_by: Vec<String>) -> Self {
        let functions = file
            .functions
            .iter()
            .map(|f| FunctionDetail {
                name: f.name.clone(),
                start_line: f.start_line,
                end_line: f.end_line,
                summary: f.summary.clone(),
                complexity: Complexity::from_lines(f.start_line, f.end_line),
            })
            .collect();
        Self {
            path: file.path,
            lang: file.lang.as_str().to_string(),
            size: file.size,
            summary: file.summary,
            functions,
            imports,
            imported_by,
        }
    }
}
