// src/graph/cycles/mod.rs
//! Circular dependency detection.
//!
//! Dependency cycles are architectural errors. [`direct`] answers "does the
//! file I'm importing import me back?" from a per-file cache; [`deep`] walks
//! the whole graph with a bounded depth-first search.

pub mod deep;
pub mod direct;

use serde::Serialize;
use std::path::{Path, PathBuf};

pub use deep::{all_cycles, detect_deep_cycle, DepthLimit};
pub use direct::DirectCycleChecker;

/// A closed walk: the last element equals the first element of the loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub path: Vec<PathBuf>,
    /// Edge count.
    pub depth: usize,
}

impl Cycle {
    #[must_use]
    pub fn new(path: Vec<PathBuf>) -> Self {
        let depth = path.len().saturating_sub(1);
        Self { path, depth }
    }

    /// The loop itself, without any lead-in from the search start.
    #[must_use]
    pub fn closed_loop(&self) -> Self {
        Self::new(deep::closed_loop(&self.path))
    }

    /// True when `path` is one of the files on the loop.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.path.iter().any(|p| crate::graph::paths::same_file(p, path))
    }

    /// Renders `a -> b -> a` with file names only.
    #[must_use]
    pub fn chain(&self) -> String {
        self.path
            .iter()
            .map(|p| {
                p.file_name()
                    .map_or_else(|| p.display().to_string(), |n| n.to_string_lossy().into_owned())
            })
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
