use crate::error::{IngestError, Result};
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tempfile::TempDir;
use zip::ZipArchive;

/// Maximum accepted archive size: 25 MB
pub const MAX_ARCHIVE_BYTES: u64 = 25 * 1024 * 1024;

/// Extract a ZIP archive into `dest`.
///
/// Oversized archives are rejected before any byte is extracted. Entries
/// whose names escape the destination (zip-slip) are skipped with a
/// warning rather than aborting the whole extraction.
pub fn unpack_archive(archive: &Path, dest: &Path) -> Result<()> {
    let size = fs::metadata(archive)?.len();
    if size > MAX_ARCHIVE_BYTES {
        return Err(IngestError::TooLarge {
            size,
            limit: MAX_ARCHIVE_BYTES,
        });
    }

    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|e| IngestError::bad_archive(e.to_string()))?;

    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| IngestError::bad_archive(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            log::warn!("skipping archive entry escaping the root: {}", entry.name());
            continue;
        };
        let target = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&target)?;
        io::copy(&mut entry, &mut out)?;
    }

    log::info!(
        "extracted {} ({size} bytes) into {}",
        archive.display(),
        dest.display()
    );
    Ok(())
}

/// Extract into a fresh scratch directory.
///
/// The returned [`TempDir`] owns the extraction; dropping it removes the
/// files, so callers keep it alive for as long as the paths are in use.
pub fn unpack_to_temp(archive: &Path) -> Result<TempDir> {
    let scratch = TempDir::new()?;
    unpack_archive(archive, scratch.path())?;
    Ok(scratch)
}
