use crate::error::{Result, WalkError};
use codemap_model::{Language, NodeKind, NodeMetadata, TreeNode};
use std::fs;
use std::path::Path;

/// Directory names excluded at every level of the walk
const EXCLUDED_DIRS: &[&str] = &[
    "__MACOSX",
    "Thumbs.db",
    "node_modules",
    ".git",
    "dist",
    "build",
];

/// True if a filesystem entry name should be filtered out of the tree.
/// Dotfiles and dot-directories are excluded wholesale.
pub fn is_excluded_name(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

/// Recursively mirror a directory into a [`TreeNode`] hierarchy.
///
/// Paths are relative to `root`, which becomes the tree root with
/// `path == ""`. Children are sorted dirs-first then by name. Individual
/// unreadable entries are skipped with a warning; only an unreadable root
/// is an error.
pub fn build_tree(root: &Path) -> Result<TreeNode> {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());

    let mut node = TreeNode::new(NodeKind::Dir, "", name);
    node.children = walk_dir(root, "").map_err(|e| WalkError::UnreadableRoot {
        path: root.display().to_string(),
        source: e,
    })?;
    annotate_dir(&mut node);
    node.sort_recursive();
    Ok(node)
}

fn walk_dir(dir: &Path, rel_prefix: &str) -> std::io::Result<Vec<TreeNode>> {
    let mut children = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_excluded_name(&name) {
            continue;
        }
        let file_type = match entry.file_type() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("skipping unstattable entry {name}: {e}");
                continue;
            }
        };

        let rel_path = if rel_prefix.is_empty() {
            name.clone()
        } else {
            format!("{rel_prefix}/{name}")
        };

        if file_type.is_dir() {
            let mut node = TreeNode::new(NodeKind::Dir, rel_path.clone(), name);
            match walk_dir(&entry.path(), &rel_path) {
                Ok(grandchildren) => node.children = grandchildren,
                Err(e) => {
                    log::warn!("skipping unreadable subtree {rel_path}: {e}");
                    continue;
                }
            }
            annotate_dir(&mut node);
            children.push(node);
        } else if file_type.is_file() {
            let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
            let language = Language::from_path(&name);
            let metadata = NodeMetadata {
                size: Some(size),
                language: language.is_source().then(|| language.as_str().to_string()),
                ..Default::default()
            };
            children.push(TreeNode::new(NodeKind::File, rel_path, name).with_metadata(metadata));
        } else {
            // broken symlinks and other oddities do not abort the walk
            log::debug!("skipping non-regular entry {rel_path}");
        }
    }

    Ok(children)
}

fn annotate_dir(node: &mut TreeNode) {
    let dirs = node
        .children
        .iter()
        .filter(|c| c.kind == NodeKind::Dir)
        .count();
    let files = node.children.len() - dirs;
    node.metadata = Some(NodeMetadata {
        dir_count: Some(dirs),
        file_count: Some(files),
        ..Default::default()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    fn collect_paths(node: &TreeNode, out: &mut Vec<String>) {
        out.push(node.path.clone());
        for child in &node.children {
            collect_paths(child, out);
        }
    }

    #[test]
    fn excludes_noise_directories() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::create_dir_all(temp.path().join("node_modules").join("react")).unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src").join("a.ts"), b"export {}").unwrap();
        fs::write(temp.path().join(".env"), b"secret").unwrap();

        let tree = build_tree(temp.path()).unwrap();
        let mut paths = Vec::new();
        collect_paths(&tree, &mut paths);

        assert_eq!(paths, vec!["", "src", "src/a.ts"]);
    }

    #[test]
    fn paths_are_unique_and_parent_joined() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("a").join("b")).unwrap();
        fs::write(temp.path().join("a").join("x.rs"), b"fn x() {}").unwrap();
        fs::write(temp.path().join("a").join("b").join("y.rs"), b"fn y() {}").unwrap();

        let tree = build_tree(temp.path()).unwrap();
        let mut paths = Vec::new();
        collect_paths(&tree, &mut paths);

        let unique: HashSet<&String> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len());

        fn check_join(node: &TreeNode) {
            for child in &node.children {
                let expected = if node.path.is_empty() {
                    child.name.clone()
                } else {
                    format!("{}/{}", node.path, child.name)
                };
                assert_eq!(child.path, expected);
                check_join(child);
            }
        }
        check_join(&tree);
    }

    #[test]
    fn dirs_sort_before_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("aaa.rs"), b"").unwrap();
        fs::create_dir(temp.path().join("zzz")).unwrap();

        let tree = build_tree(temp.path()).unwrap();
        assert_eq!(tree.children[0].name, "zzz");
        assert_eq!(tree.children[1].name, "aaa.rs");
    }

    #[test]
    fn file_nodes_carry_language_and_size() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.py"), b"print(1)\n").unwrap();
        fs::write(temp.path().join("README"), b"hello").unwrap();

        let tree = build_tree(temp.path()).unwrap();
        let py = tree.find("main.py").unwrap();
        let meta = py.metadata.as_ref().unwrap();
        assert_eq!(meta.language.as_deref(), Some("python"));
        assert_eq!(meta.size, Some(9));

        let readme = tree.find("README").unwrap();
        assert!(readme.metadata.as_ref().unwrap().language.is_none());
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let temp = tempdir().unwrap();
        let ghost = temp.path().join("missing");
        assert!(build_tree(&ghost).is_err());
    }
}
