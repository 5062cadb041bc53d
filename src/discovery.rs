// src/discovery.rs
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::lang::Lang;

/// Directories never descended into.
pub const PRUNE_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "bower_components",
    "dist",
    "build",
    "out",
    "target",
    ".next",
    ".nuxt",
    ".venv",
    "venv",
    "__pycache__",
    ".tox",
    ".cache",
    "coverage",
    "vendor",
    "third_party",
];

#[must_use]
pub fn should_prune(name: &str) -> bool {
    PRUNE_DIRS.contains(&name)
}

/// Walks `root` and returns every file in a supported language, sorted.
#[must_use]
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !should_prune(&e.file_name().to_string_lossy()));

    let (mut paths, error_count) = accumulate_walker(walker);
    if error_count > 0 {
        warn!(errors = error_count, "some entries could not be read during file walk");
    }
    paths.sort();
    debug!(root = %root.display(), files = paths.len(), "discovery finished");
    paths
}

fn accumulate_walker<I>(walker: I) -> (Vec<PathBuf>, usize)
where
    I: Iterator<Item = walkdir::Result<walkdir::DirEntry>>,
{
    let mut paths = Vec::new();
    let mut errors = 0;
    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file() && Lang::from_path(entry.path()).is_some() {
                    paths.push(entry.into_path());
                }
            }
            Err(_) => errors += 1,
        }
    }
    (paths, errors)
}
