use crate::error::Result;
use async_trait::async_trait;
use codemap_model::Language;

/// Boundary to the external summarization collaborator (an LLM in the real
/// deployment). Implementations must be shareable across the background
/// pipeline tasks.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short description of one source file
    async fn summarize_file(
        &self,
        path: &str,
        language: Language,
        content: &str,
    ) -> Result<Option<String>>;

    /// Short description of one folder given its analyzed files
    async fn summarize_folder(&self, path: &str, file_paths: &[String])
        -> Result<Option<String>>;
}

/// Deterministic offline summarizer.
///
/// Takes the first doc or comment line when one exists, else a counts-based
/// sentence. Keeps the pipeline complete without any network collaborator.
#[derive(Debug, Default, Clone)]
pub struct HeuristicSummarizer;

impl HeuristicSummarizer {
    fn leading_comment(language: Language, content: &str) -> Option<String> {
        let prefixes: &[&str] = match language {
            Language::Python => &["#", "\"\"\"", "'''"],
            Language::Unknown => &[],
            _ => &["///", "//!", "//", "/*"],
        };

        for line in content.lines().take(10) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            for prefix in prefixes {
                if let Some(rest) = line.strip_prefix(prefix) {
                    let text = rest.trim_start_matches(['*', '!', '/']).trim();
                    if !text.is_empty() {
                        return Some(text.to_string());
                    }
                }
            }
            // first non-empty line is code: no leading comment
            return None;
        }
        None
    }
}

#[async_trait]
impl Summarizer for HeuristicSummarizer {
    async fn summarize_file(
        &self,
        _path: &str,
        language: Language,
        content: &str,
    ) -> Result<Option<String>> {
        if let Some(comment) = Self::leading_comment(language, content) {
            return Ok(Some(comment));
        }
        let lines = content.lines().count();
        Ok(Some(format!("{} source, {lines} lines", language.as_str())))
    }

    async fn summarize_folder(
        &self,
        _path: &str,
        file_paths: &[String],
    ) -> Result<Option<String>> {
        if file_paths.is_empty() {
            return Ok(None);
        }
        Ok(Some(format!("contains {} source files", file_paths.len())))
    }
}
