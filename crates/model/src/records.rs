use crate::Language;
use serde::{Deserialize, Serialize};

/// Persisted fact about one analyzed source file.
///
/// `path` is unique across the store. Functions are lifecycle-bound to the
/// file: they live inside the record and disappear with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: u64,
    pub path: String,
    pub lang: Language,
    /// Size in bytes
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub functions: Vec<FunctionRecord>,
}

/// Persisted fact about one function inside a file.
///
/// Unique on (file_id, name, start_line): the same name may recur in a file
/// only at a different start line. Line numbers are 1-indexed and inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub id: u64,
    pub file_id: u64,
    pub name: String,
    pub start_line: u32,
    pub end_line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl FunctionRecord {
    /// Tree path for this function under its owning file
    pub fn tree_path(&self, file_path: &str) -> String {
        format!("{file_path}#{}", self.name)
    }
}

/// Persisted fact about one folder, independent of file records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: u64,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// Directed file-granularity import relationship.
///
/// The edge set is a simple directed graph: unique on (from, to).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ImportEdge {
    pub from: String,
    pub to: String,
}

/// Directed function-granularity call relationship, unique on (from, to)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CallEdge {
    pub from: String,
    pub to: String,
}
