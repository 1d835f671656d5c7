use codemap_model::Language;
use codemap_walk::is_excluded_name;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Per-file analysis cap; larger files are indexed as tree nodes only
const MAX_FILE_SIZE_BYTES: u64 = 1_048_576;

/// Flat scan of the analyzable source files under a project root.
///
/// Applies the same exclusion set as the tree builder, skips oversized
/// files, and keeps only recognized source languages. Paths come back
/// sorted for deterministic processing order.
pub fn scan_source_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(false);
    builder.filter_entry(|entry| {
        // the root itself is always kept, whatever its name
        entry.depth() == 0
            || entry
                .file_name()
                .to_str()
                .map(|name| !is_excluded_name(name))
                .unwrap_or(true)
    });

    for result in builder.build() {
        match result {
            Ok(entry) => {
                let Some(file_type) = entry.file_type() else {
                    continue;
                };
                if !file_type.is_file() {
                    continue;
                }
                let path = entry.path();

                if let Ok(meta) = entry.metadata() {
                    if meta.len() > MAX_FILE_SIZE_BYTES {
                        log::debug!(
                            "skipping large file {} ({} bytes)",
                            path.display(),
                            meta.len()
                        );
                        continue;
                    }
                }

                if !Language::from_path(path).is_source() {
                    continue;
                }

                files.push(path.to_path_buf());
            }
            Err(e) => log::warn!("failed to read entry: {e}"),
        }
    }

    files.sort();
    log::info!("found {} source files under {}", files.len(), root.display());
    files
}
