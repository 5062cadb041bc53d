// src/lang.rs
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Language tag derived from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    JavaScript,
    TypeScript,
    Python,
    Rust,
    Go,
    Java,
    Kotlin,
    Scala,
    C,
    Cpp,
    Ruby,
    Php,
}

impl Lang {
    #[must_use]
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            "py" | "pyi" => Some(Self::Python),
            "rs" => Some(Self::Rust),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            "kt" | "kts" => Some(Self::Kotlin),
            "scala" => Some(Self::Scala),
            "c" | "h" => Some(Self::C),
            "cc" | "cpp" | "cxx" | "hh" | "hpp" | "hxx" => Some(Self::Cpp),
            "rb" => Some(Self::Ruby),
            "php" => Some(Self::Php),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_ext)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Python => "python",
            Self::Rust => "rust",
            Self::Go => "go",
            Self::Java => "java",
            Self::Kotlin => "kotlin",
            Self::Scala => "scala",
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Ruby => "ruby",
            Self::Php => "php",
        }
    }

    /// Parses an editor-style language identifier (`"typescriptreact"`, `"py"`, ...).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "javascript" | "javascriptreact" => Some(Self::JavaScript),
            "typescript" | "typescriptreact" => Some(Self::TypeScript),
            "python" => Some(Self::Python),
            "rust" => Some(Self::Rust),
            "go" => Some(Self::Go),
            "java" => Some(Self::Java),
            "kotlin" => Some(Self::Kotlin),
            "scala" => Some(Self::Scala),
            "c" => Some(Self::C),
            "cpp" | "c++" => Some(Self::Cpp),
            "ruby" => Some(Self::Ruby),
            "php" => Some(Self::Php),
            other => Self::from_ext(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ext() {
        assert_eq!(Lang::from_ext("rs"), Some(Lang::Rust));
        assert_eq!(Lang::from_ext("TSX"), Some(Lang::TypeScript));
        assert_eq!(Lang::from_ext("md"), None);
    }

    #[test]
    fn test_from_tag() {
        assert_eq!(Lang::from_tag("typescriptreact"), Some(Lang::TypeScript));
        assert_eq!(Lang::from_tag("py"), Some(Lang::Python));
        assert_eq!(Lang::from_tag("cobol"), None);
    }
}
