use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported source language, derived from a file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Python,
    Java,
    Go,
    Rust,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "js" | "jsx" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "py" => Language::Python,
            "java" => Language::Java,
            "go" => Language::Go,
            "rs" => Language::Rust,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Language name as a stable string tag
    pub fn as_str(self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Python => "python",
            Language::Java => "java",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Unknown => "unknown",
        }
    }

    /// True for any recognized source language
    pub fn is_source(self) -> bool {
        self != Language::Unknown
    }

    /// Check if this language is supported for AST parsing
    pub fn supports_ast(self) -> bool {
        matches!(
            self,
            Language::Rust | Language::Python | Language::JavaScript | Language::TypeScript
        )
    }

    /// Get import/use statement prefixes for this language
    pub fn import_patterns(self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["use ", "mod "],
            Language::Python => &["import ", "from "],
            Language::JavaScript | Language::TypeScript => &["import ", "export ", "require("],
            Language::Go | Language::Java => &["import "],
            Language::Unknown => &[],
        }
    }
}

/// Recognized source extensions, used by the root locator for scoring.
pub(crate) const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "py", "java", "go", "rs"];

/// Typed-language markers that score extra during root detection.
pub(crate) const PREFERRED_EXTENSIONS: &[&str] = &["ts", "tsx", "rs", "go", "java"];

impl Language {
    /// All extensions recognized as source code
    pub fn source_extensions() -> &'static [&'static str] {
        SOURCE_EXTENSIONS
    }

    /// Extensions that get the typed-language scoring bonus
    pub fn preferred_extensions() -> &'static [&'static str] {
        PREFERRED_EXTENSIONS
    }
}
