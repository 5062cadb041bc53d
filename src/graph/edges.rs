// src/graph/edges.rs
//! Edge collection.
//!
//! Encapsulates import extraction and resolution so callers don't need
//! to reach into graph internals.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::graph::imports::ExtractorRegistry;
use crate::graph::resolver;
use crate::lang::Lang;
use crate::source::FileSystem;

/// An import statement found in `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportEdge {
    pub owner: PathBuf,
    /// The import text as written.
    pub raw: String,
    pub offset: usize,
    pub length: usize,
    /// `None` means unresolved or external.
    pub resolved: Option<PathBuf>,
}

impl ImportEdge {
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.resolved.is_none()
    }
}

/// Extracts and resolves every import of one file.
#[must_use]
pub fn collect_file_edges(
    fs: &dyn FileSystem,
    registry: &ExtractorRegistry,
    file: &Path,
    content: &str,
) -> Vec<ImportEdge> {
    registry
        .parse(content, Lang::from_path(file))
        .iter()
        .map(|record| ImportEdge {
            owner: file.to_path_buf(),
            resolved: resolver::resolve(fs, file, &record.path),
            raw: record.path,
            offset: record.index,
            length: record.length,
        })
        .collect()
}

/// Resolved targets in document order, first occurrence only.
#[must_use]
pub fn resolved_targets(edges: &[ImportEdge]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for target in edges.iter().filter_map(|e| e.resolved.as_ref()) {
        if !out.contains(target) {
            out.push(target.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFs;

    #[test]
    fn test_collect_marks_externals() {
        let fs = MemoryFs::new();
        fs.insert("/p/b.ts", "");
        let text = "import b from './b';\nimport r from 'react';\nimport again from './b.ts';";
        let edges = collect_file_edges(
            &fs,
            &ExtractorRegistry::default(),
            Path::new("/p/a.ts"),
            text,
        );

        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].resolved, Some(PathBuf::from("/p/b.ts")));
        assert!(edges[1].is_external());
        assert_eq!(&text[edges[1].offset..edges[1].offset + edges[1].length], "react");
        assert_eq!(resolved_targets(&edges), vec![PathBuf::from("/p/b.ts")]);
    }
}
