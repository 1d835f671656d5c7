use codemap_model::{
    Complexity, FileRecord, FolderRecord, NodeKind, NodeMetadata, TreeNode,
};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Output of a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconciledTree {
    pub root: TreeNode,
    pub files: usize,
    pub folders: usize,
    pub functions: usize,
}

/// Merge persisted file and folder facts into one hierarchical tree.
///
/// Pure in-memory transform: registers one node per record keyed by path,
/// synthesizes placeholder directories for missing ancestors, links every
/// node under its parent idempotently, and sorts the result
/// deterministically. Explicit records win over synthesized placeholders.
/// Records with malformed paths (empty segments) are skipped, never fatal.
pub fn reconcile(files: &[FileRecord], folders: &[FolderRecord]) -> ReconciledTree {
    let mut registry: HashMap<String, TreeNode> = HashMap::new();
    let mut union: BTreeSet<String> = BTreeSet::new();

    let (files, skipped_files): (Vec<&FileRecord>, Vec<&FileRecord>) =
        files.iter().partition(|f| valid_path(&f.path));
    let (folders, skipped_folders): (Vec<&FolderRecord>, Vec<&FolderRecord>) =
        folders.iter().partition(|f| valid_path(&f.path));
    for skipped in &skipped_files {
        log::warn!("skipping file record with malformed path {:?}", skipped.path);
    }
    for skipped in &skipped_folders {
        log::warn!("skipping folder record with malformed path {:?}", skipped.path);
    }

    // explicit folder records first so they win over synthesized dirs
    let mut folder_count = 0usize;
    for folder in &folders {
        if registry.contains_key(&folder.path) {
            log::warn!("duplicate folder record for {:?}", folder.path);
            continue;
        }
        let node = TreeNode::new(NodeKind::Dir, folder.path.clone(), last_segment(&folder.path))
            .with_metadata(NodeMetadata {
                summary: folder.summary.clone(),
                ..Default::default()
            });
        registry.insert(folder.path.clone(), node);
        union.insert(folder.path.clone());
        folder_count += 1;
    }

    // counts reflect records that actually become nodes, not raw input
    let mut file_count = 0usize;
    let mut function_total = 0usize;
    for file in &files {
        if registry.contains_key(&file.path) {
            log::warn!("path {:?} already registered, skipping file record", file.path);
            continue;
        }
        function_total += file.functions.len();
        registry.insert(file.path.clone(), file_node(file));
        union.insert(file.path.clone());
        file_count += 1;
    }

    let root = TreeNode::new(NodeKind::Dir, "", "root").with_metadata(NodeMetadata {
        file_count: Some(file_count),
        function_count: Some(function_total),
        ..Default::default()
    });
    registry.insert(String::new(), root);

    // walk each known path left to right, synthesizing missing ancestors
    // and linking children under parents exactly once
    let mut links: HashMap<String, Vec<String>> = HashMap::new();
    let mut linked: HashSet<(String, String)> = HashSet::new();
    for path in &union {
        let mut parent = String::new();
        let mut prefix = String::new();
        for segment in path.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);

            registry.entry(prefix.clone()).or_insert_with(|| {
                TreeNode::new(NodeKind::Dir, prefix.clone(), segment)
            });

            let key = (parent.clone(), prefix.clone());
            if linked.insert(key) {
                links.entry(parent.clone()).or_default().push(prefix.clone());
            }
            parent.clone_from(&prefix);
        }
    }

    let mut root = assemble(String::new(), &mut registry, &links);
    root.sort_recursive();

    ReconciledTree {
        root,
        files: file_count,
        folders: folder_count,
        functions: function_total,
    }
}

/// Build the file node with its function children attached
fn file_node(file: &FileRecord) -> TreeNode {
    let mut node = TreeNode::new(NodeKind::File, file.path.clone(), last_segment(&file.path))
        .with_metadata(NodeMetadata {
            summary: file.summary.clone(),
            language: Some(file.lang.as_str().to_string()),
            size: Some(file.size),
            function_count: Some(file.functions.len()),
            ..Default::default()
        });

    for function in &file.functions {
        if function.name.is_empty() {
            log::warn!("skipping unnamed function record in {:?}", file.path);
            continue;
        }
        let path = function.tree_path(&file.path);
        let mut child = TreeNode::new(NodeKind::Function, path, format!("ƒ {}", function.name));
        // names may recur at different start lines; keep ids distinct
        child.id = format!("fn:{}:{}", child.path, function.start_line);
        child.metadata = Some(NodeMetadata {
            summary: function.summary.clone(),
            start_line: Some(function.start_line),
            end_line: Some(function.end_line),
            complexity: Some(Complexity::from_lines(
                function.start_line,
                function.end_line,
            )),
            ..Default::default()
        });
        node.push_child_unique(child);
    }

    node
}

fn assemble(
    path: String,
    registry: &mut HashMap<String, TreeNode>,
    links: &HashMap<String, Vec<String>>,
) -> TreeNode {
    let mut node = registry
        .remove(&path)
        .unwrap_or_else(|| TreeNode::new(NodeKind::Dir, path.clone(), last_segment(&path)));
    if let Some(children) = links.get(&path) {
        for child_path in children {
            if registry.contains_key(child_path) {
                let child = assemble(child_path.clone(), registry, links);
                node.push_child_unique(child);
            }
        }
    }
    node
}

fn valid_path(path: &str) -> bool {
    !path.is_empty() && !path.split('/').any(str::is_empty)
}

fn last_segment(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_string()
}
