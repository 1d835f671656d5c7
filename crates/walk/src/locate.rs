use codemap_model::Language;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Depth bound guaranteeing termination of the locator
pub const MAX_LOCATE_DEPTH: usize = 10;

/// Score at or above which a directory is accepted as the project root
pub const ROOT_SCORE_THRESHOLD: u32 = 3;

/// Filenames that mark a directory as a project top level
const PROJECT_INDICATORS: &[&str] = &[
    "package.json",
    "tsconfig.json",
    "pyproject.toml",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
];

/// Descent priority when a wrapper level holds several candidate dirs
const COMMON_PROJECT_DIRS: &[&str] = &["src", "app", "lib", "components", "pages", "api"];

/// Directories never worth descending into
const NOISE_DIRS: &[&str] = &["node_modules", "dist", "build"];

/// Packaging junk discarded before any scoring
const PLATFORM_JUNK: &[&str] = &["__MACOSX", "Thumbs.db"];

/// One contribution to a directory's root score
#[derive(Debug, Clone, Serialize)]
pub struct ScoreFactor {
    pub points: u32,
    pub reason: String,
}

/// Root score with its contributing factors, kept explicit so the
/// heuristic stays auditable and tunable.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RootScore {
    pub total: u32,
    pub factors: Vec<ScoreFactor>,
}

impl RootScore {
    fn add(&mut self, points: u32, reason: impl Into<String>) {
        self.total += points;
        self.factors.push(ScoreFactor {
            points,
            reason: reason.into(),
        });
    }
}

#[derive(Debug)]
struct VisibleEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

/// List a directory with hidden entries and platform junk discarded.
/// Individual unreadable entries are skipped, not fatal.
fn list_visible(dir: &Path) -> std::io::Result<Vec<VisibleEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                log::warn!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || PLATFORM_JUNK.contains(&name.as_str()) {
            continue;
        }
        let is_dir = match entry.file_type() {
            Ok(t) => t.is_dir(),
            Err(e) => {
                log::warn!("skipping unstattable entry {name}: {e}");
                continue;
            }
        };
        entries.push(VisibleEntry {
            path: entry.path(),
            name,
            is_dir,
        });
    }
    // deterministic scoring and descent regardless of readdir order
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn has_source_extension(name: &str) -> bool {
    Language::from_path(name).is_source()
}

fn has_preferred_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_lowercase();
            Language::preferred_extensions().iter().any(|p| *p == e)
        })
        .unwrap_or(false)
}

/// Compute the root score of a directory.
///
/// On any read failure the returned score is whatever was accumulated so
/// far (usually zero); the locator treats that as "not a root".
pub fn score_dir(dir: &Path) -> RootScore {
    let mut score = RootScore::default();
    let entries = match list_visible(dir) {
        Ok(e) => e,
        Err(e) => {
            log::warn!("cannot score {}: {e}", dir.display());
            return score;
        }
    };

    for entry in &entries {
        if entry.is_dir {
            continue;
        }
        if has_source_extension(&entry.name) {
            score.add(2, format!("source file {}", entry.name));
            if has_preferred_extension(&entry.name) {
                score.add(3, format!("typed-language file {}", entry.name));
            }
        }
        if PROJECT_INDICATORS.contains(&entry.name.as_str()) {
            score.add(1, format!("project indicator {}", entry.name));
        }
    }

    if let Some(src) = entries.iter().find(|e| e.is_dir && e.name == "src") {
        score.add(1, "project indicator src directory");
        score.add(5, "src directory present");
        match list_visible(&src.path) {
            Ok(src_entries) => {
                for inner in src_entries.iter().filter(|e| !e.is_dir) {
                    if has_source_extension(&inner.name) {
                        score.add(2, format!("source file src/{}", inner.name));
                    }
                }
            }
            Err(e) => log::warn!("cannot inspect src under {}: {e}", dir.display()),
        }
    }

    score
}

/// Heuristically find the real project root inside an extraction directory.
///
/// Walks downward past wrapper folders (archives that wrap everything in a
/// single top-level dir) until a directory scores at or above
/// [`ROOT_SCORE_THRESHOLD`], bounded by [`MAX_LOCATE_DEPTH`]. Best effort:
/// where no descent rule applies the current directory is returned as-is,
/// and any filesystem error falls back to the original input path.
pub fn locate_root(start: &Path) -> PathBuf {
    let mut current = start.to_path_buf();

    for depth in 0..MAX_LOCATE_DEPTH {
        let entries = match list_visible(&current) {
            Ok(e) => e,
            Err(e) => {
                log::warn!(
                    "root detection stopped at {} (depth {depth}): {e}",
                    current.display()
                );
                return start.to_path_buf();
            }
        };

        let score = score_dir(&current);
        if score.total >= ROOT_SCORE_THRESHOLD {
            log::debug!(
                "root detected at {} (score {}, depth {depth})",
                current.display(),
                score.total
            );
            return current;
        }

        let dirs: Vec<&VisibleEntry> = entries.iter().filter(|e| e.is_dir).collect();
        let source_files = entries
            .iter()
            .filter(|e| !e.is_dir && has_source_extension(&e.name))
            .count();

        if source_files > 0 {
            // mixed content below threshold: stop, best effort
            return current;
        }

        let next = match dirs.len() {
            0 => return current,
            1 => Some(dirs[0].path.clone()),
            _ => pick_descent_target(&dirs),
        };
        match next {
            Some(path) => current = path,
            None => return current,
        }
    }

    current
}

/// Choose which of several subdirectories to descend into: a well-known
/// project dir name first, then the first non-noise candidate.
fn pick_descent_target(dirs: &[&VisibleEntry]) -> Option<PathBuf> {
    for known in COMMON_PROJECT_DIRS {
        if let Some(hit) = dirs.iter().find(|d| d.name == *known) {
            return Some(hit.path.clone());
        }
    }
    dirs.iter()
        .find(|d| !NOISE_DIRS.contains(&d.name.as_str()))
        .map(|d| d.path.clone())
}
