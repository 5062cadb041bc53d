// src/graph/cycles/direct.rs
//! One-hop back-reference check.
//!
//! Only the target's own imports are needed, so this reads from a bounded
//! per-file cache instead of the full graph. Entries are keyed by path and
//! validated against the file's current stamp.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::trace;

use super::Cycle;
use crate::graph::cache::StampedCache;
use crate::graph::imports::ExtractorRegistry;
use crate::graph::{paths, resolver};
use crate::lang::Lang;
use crate::source::{self, FileRead, FileSystem};

pub struct DirectCycleChecker {
    fs: Arc<dyn FileSystem>,
    registry: Arc<ExtractorRegistry>,
    max_file_size: u64,
    cache: Mutex<StampedCache<Arc<[PathBuf]>>>,
}

impl DirectCycleChecker {
    #[must_use]
    pub fn new(
        fs: Arc<dyn FileSystem>,
        registry: Arc<ExtractorRegistry>,
        max_file_size: u64,
        capacity: usize,
    ) -> Self {
        Self {
            fs,
            registry,
            max_file_size,
            cache: Mutex::new(StampedCache::lru(capacity)),
        }
    }

    /// Reports `source -> target -> source`, or `source -> source` for a
    /// self-import. A missing or unreadable target yields `None`.
    #[must_use]
    pub fn check(&self, source: &Path, target: &Path) -> Option<Cycle> {
        if paths::same_file(source, target) {
            return Some(Cycle::new(vec![source.to_path_buf(), source.to_path_buf()]));
        }
        let imports = self.imports_of(target)?;
        imports
            .iter()
            .any(|candidate| paths::same_file(candidate, source))
            .then(|| {
                Cycle::new(vec![
                    source.to_path_buf(),
                    target.to_path_buf(),
                    source.to_path_buf(),
                ])
            })
    }

    /// Relative imports of `file`, resolved where possible and otherwise
    /// joined lexically so extension-less specifiers still compare.
    pub fn imports_of(&self, file: &Path) -> Option<Arc<[PathBuf]>> {
        let stamp = self.fs.stat(file)?;
        let key = paths::key(file);
        if let Some(hit) = self.cache.lock().get(&key, stamp) {
            trace!(path = %file.display(), "import cache hit");
            return Some(hit);
        }

        let FileRead::Loaded { file: loaded, content } =
            source::load(self.fs.as_ref(), file, self.max_file_size)
        else {
            return None;
        };
        let dir = file.parent().unwrap_or(Path::new(""));
        let candidates: Arc<[PathBuf]> = self
            .registry
            .parse(&content, Lang::from_path(file))
            .iter()
            .filter_map(|record| {
                resolver::resolve(self.fs.as_ref(), file, &record.path).or_else(|| {
                    resolver::is_relative(&record.path)
                        .then(|| paths::clean(&dir.join(&record.path)))
                })
            })
            .collect();

        self.cache
            .lock()
            .put(&key, loaded.stamp, Arc::clone(&candidates));
        Some(candidates)
    }

    /// Forgets the cached import list for `file`.
    pub fn invalidate(&self, file: &Path) {
        self.cache.lock().invalidate(&paths::key(file));
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }
}
