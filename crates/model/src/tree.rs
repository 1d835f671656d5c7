use crate::Complexity;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Node kind in a codemap tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Dir,
    File,
    Function,
}

impl NodeKind {
    /// Sort rank: directories before files before functions
    fn rank(self) -> u8 {
        match self {
            NodeKind::Dir => 0,
            NodeKind::File => 1,
            NodeKind::Function => 2,
        }
    }
}

/// Derived attributes attached to a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Language tag for file nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Size in bytes for file nodes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// Direct or aggregate file count, depending on the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir_count: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_count: Option<usize>,

    /// Line span for function nodes (1-indexed, inclusive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
}

/// One node of the hierarchical code tree.
///
/// Invariants within a single tree:
/// - `path` is unique across dir/file nodes; the root has `path == ""`
/// - no two siblings share an `id`
/// - sorted children order dirs before files before functions, then by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NodeMetadata>,
}

impl TreeNode {
    /// Create a node with a deterministic id derived from kind and path
    pub fn new(kind: NodeKind, path: impl Into<String>, name: impl Into<String>) -> Self {
        let path = path.into();
        let id = Self::node_id(kind, &path);
        Self {
            id,
            name: name.into(),
            kind,
            path,
            children: Vec::new(),
            metadata: None,
        }
    }

    /// Deterministic node id for a (kind, path) pair
    pub fn node_id(kind: NodeKind, path: &str) -> String {
        match kind {
            NodeKind::Dir => format!("dir:{path}"),
            NodeKind::File => format!("file:{path}"),
            NodeKind::Function => format!("fn:{path}"),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Append `child` unless a child with the same id is already present.
    ///
    /// Returns true if the child was inserted. This is the insert-if-absent
    /// primitive the reconciler relies on for idempotent linking.
    pub fn push_child_unique(&mut self, child: TreeNode) -> bool {
        if self.children.iter().any(|c| c.id == child.id) {
            return false;
        }
        self.children.push(child);
        true
    }

    /// Sort this node's children recursively: dirs, then files, then
    /// functions, name ties broken by case-sensitive byte order.
    pub fn sort_recursive(&mut self) {
        self.children.sort_by(Self::sibling_order);
        for child in &mut self.children {
            child.sort_recursive();
        }
    }

    fn sibling_order(a: &TreeNode, b: &TreeNode) -> Ordering {
        a.kind
            .rank()
            .cmp(&b.kind.rank())
            .then_with(|| a.name.cmp(&b.name))
    }

    /// Total node count including self
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Depth-first search by path
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}
