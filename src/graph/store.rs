// src/graph/store.rs
//! The dependency graph and its cache-coherent store.
//!
//! [`DependencyGraph`] is an immutable snapshot. [`GraphStore`] builds a new
//! snapshot off to the side and publishes it with a single pointer swap, so
//! readers holding an `Arc` never observe a half-built graph.

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

use crate::flight::{FlightGuard, Outcome};
use crate::graph::edges::{collect_file_edges, resolved_targets};
use crate::graph::imports::ExtractorRegistry;
use crate::graph::paths;
use crate::source::{self, FileRead, FileStamp, FileSystem, SkipReason};

/// Size limits for one analysis pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    pub max_files: usize,
    pub max_file_size: u64,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_files: 5000,
            max_file_size: 1024 * 1024,
        }
    }
}

impl ScanLimits {
    /// Deduplicates `files` (by cleaned path) and splits them at the file
    /// cap. Files past the cap come back as `OverFileLimit` skips.
    #[must_use]
    pub fn admit(&self, files: &[PathBuf]) -> (Vec<PathBuf>, Vec<(PathBuf, SkipReason)>) {
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        let mut skipped = Vec::new();
        for file in files {
            let path = paths::clean(file);
            if !seen.insert(path.clone()) {
                continue;
            }
            if accepted.len() >= self.max_files {
                skipped.push((path, SkipReason::OverFileLimit));
            } else {
                accepted.push(path);
            }
        }
        (accepted, skipped)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GraphStats {
    pub total_files: usize,
    pub total_dependencies: usize,
    pub average_dependencies: f64,
}

/// Adjacency (file -> resolved dependencies) plus the derived reverse map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyGraph {
    adjacency: BTreeMap<PathBuf, Vec<PathBuf>>,
    reverse: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    index: HashMap<String, PathBuf>,
}

impl DependencyGraph {
    /// Builds a graph; the reverse map and lookup index are derived here and
    /// nowhere else.
    #[must_use]
    pub fn from_adjacency(adjacency: BTreeMap<PathBuf, Vec<PathBuf>>) -> Self {
        let mut reverse: BTreeMap<PathBuf, BTreeSet<PathBuf>> = BTreeMap::new();
        let mut index = HashMap::new();

        for (from, targets) in &adjacency {
            for to in targets {
                reverse.entry(to.clone()).or_default().insert(from.clone());
            }
        }
        for node in adjacency.keys().chain(reverse.keys()) {
            let key = paths::key(node);
            index
                .entry(paths::strip_ext(&key).to_string())
                .or_insert_with(|| node.clone());
            index.entry(key).or_insert_with(|| node.clone());
        }

        Self {
            adjacency,
            reverse,
            index,
        }
    }

    /// Convenience for tests and hosts that already know their edges.
    #[must_use]
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a Path, &'a Path)>,
    {
        let mut adjacency: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
        for (from, to) in edges {
            let targets = adjacency.entry(from.to_path_buf()).or_default();
            if !targets.iter().any(|t| t == to) {
                targets.push(to.to_path_buf());
            }
            adjacency.entry(to.to_path_buf()).or_default();
        }
        Self::from_adjacency(adjacency)
    }

    /// Maps any spelling of a path (case, slashes, missing extension) to
    /// the node stored in the graph.
    #[must_use]
    pub fn lookup(&self, path: &Path) -> Option<&PathBuf> {
        let key = paths::key(path);
        self.index
            .get(&key)
            .or_else(|| self.index.get(paths::strip_ext(&key)))
    }

    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    /// Direct dependencies, in import order.
    #[must_use]
    pub fn dependencies(&self, path: &Path) -> &[PathBuf] {
        self.lookup(path)
            .and_then(|node| self.adjacency.get(node))
            .map_or(&[], Vec::as_slice)
    }

    /// Files that import `path`, sorted.
    #[must_use]
    pub fn dependents(&self, path: &Path) -> Vec<PathBuf> {
        self.lookup(path)
            .and_then(|node| self.reverse.get(node))
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Scanned files, sorted.
    pub fn files(&self) -> impl Iterator<Item = &PathBuf> {
        self.adjacency.keys()
    }

    pub fn edges(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.adjacency
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from.as_path(), to.as_path())))
    }

    #[must_use]
    pub fn adjacency(&self) -> &BTreeMap<PathBuf, Vec<PathBuf>> {
        &self.adjacency
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> GraphStats {
        let total_files = self.adjacency.len();
        let total_dependencies = self.adjacency.values().map(Vec::len).sum();
        let average_dependencies = if total_files == 0 {
            0.0
        } else {
            total_dependencies as f64 / total_files as f64
        };
        GraphStats {
            total_files,
            total_dependencies,
            average_dependencies,
        }
    }
}

/// What one build pass did with its input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildReport {
    pub supplied: usize,
    pub processed: usize,
    /// Files whose cached edges were reused.
    pub reused: usize,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    /// False when the pass produced the same graph as before.
    pub changed: bool,
}

impl BuildReport {
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.skipped
            .iter()
            .any(|(_, r)| matches!(r, SkipReason::OverFileLimit | SkipReason::TooLarge { .. }))
    }
}

#[derive(Debug, Clone)]
struct FileEntry {
    stamp: FileStamp,
    targets: Arc<[PathBuf]>,
}

enum Scan {
    Fresh(FileEntry),
    Reused(FileEntry),
    Skipped(SkipReason),
}

/// Owns the published graph and the per-file edge cache.
pub struct GraphStore {
    fs: Arc<dyn FileSystem>,
    registry: Arc<ExtractorRegistry>,
    limits: ScanLimits,
    snapshot: RwLock<Arc<DependencyGraph>>,
    entries: Mutex<HashMap<PathBuf, FileEntry>>,
    building: AtomicBool,
    last_report: RwLock<Option<BuildReport>>,
}

impl GraphStore {
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, registry: Arc<ExtractorRegistry>, limits: ScanLimits) -> Self {
        Self {
            fs,
            registry,
            limits,
            snapshot: RwLock::new(Arc::new(DependencyGraph::default())),
            entries: Mutex::new(HashMap::new()),
            building: AtomicBool::new(false),
            last_report: RwLock::new(None),
        }
    }

    /// The currently published graph.
    #[must_use]
    pub fn graph(&self) -> Arc<DependencyGraph> {
        Arc::clone(&self.snapshot.read())
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        self.graph().stats()
    }

    #[must_use]
    pub fn last_report(&self) -> Option<BuildReport> {
        self.last_report.read().clone()
    }

    /// Scans `files` and publishes a new graph. Returns `Declined` if a build
    /// is already in progress.
    pub fn build_graph(&self, files: &[PathBuf]) -> Outcome<BuildReport> {
        let Some(_guard) = FlightGuard::claim(&self.building) else {
            debug!("graph build already running; request dropped");
            return Outcome::Declined;
        };

        let (accepted, skipped) = self.limits.admit(files);
        let mut report = BuildReport {
            supplied: files.len(),
            skipped,
            ..BuildReport::default()
        };
        let cached = self.entries.lock().clone();

        let scans: Vec<(PathBuf, Scan)> = accepted
            .into_par_iter()
            .map(|path| {
                let scan = self.scan(&path, cached.get(&path));
                (path, scan)
            })
            .collect();

        let mut entries = HashMap::new();
        let mut adjacency = BTreeMap::new();
        for (path, scan) in scans {
            let entry = match scan {
                Scan::Fresh(entry) => entry,
                Scan::Reused(entry) => {
                    report.reused += 1;
                    entry
                }
                Scan::Skipped(reason) => {
                    report.skipped.push((path, reason));
                    continue;
                }
            };
            report.processed += 1;
            adjacency.insert(path.clone(), entry.targets.to_vec());
            entries.insert(path, entry);
        }

        let graph = DependencyGraph::from_adjacency(adjacency);
        report.changed = self.publish(graph);
        *self.entries.lock() = entries;

        info!(
            supplied = report.supplied,
            processed = report.processed,
            reused = report.reused,
            skipped = report.skipped.len(),
            "dependency graph built"
        );
        *self.last_report.write() = Some(report.clone());
        Outcome::Completed(report)
    }

    /// Re-scans a single file in place if its stamp changed. Returns whether
    /// the published graph changed.
    pub fn refresh_file(&self, path: &Path) -> Outcome<bool> {
        let Some(_guard) = FlightGuard::claim(&self.building) else {
            return Outcome::Declined;
        };
        let path = paths::clean(path);
        let current = self.graph();
        if !current.adjacency.contains_key(&path) {
            return Outcome::Completed(false);
        }

        let cached = self.entries.lock().get(&path).cloned();
        let mut adjacency = current.adjacency.clone();
        match self.scan(&path, cached.as_ref()) {
            Scan::Reused(_) => return Outcome::Completed(false),
            Scan::Fresh(entry) => {
                adjacency.insert(path.clone(), entry.targets.to_vec());
                self.entries.lock().insert(path, entry);
            }
            Scan::Skipped(reason) => {
                debug!(path = %path.display(), %reason, "file dropped from graph");
                adjacency.remove(&path);
                self.entries.lock().remove(&path);
            }
        }
        Outcome::Completed(self.publish(DependencyGraph::from_adjacency(adjacency)))
    }

    /// Forgets cached edges for one file; the next build re-reads it.
    pub fn invalidate(&self, path: &Path) {
        self.entries.lock().remove(&paths::clean(path));
    }

    /// Forgets every cached edge list.
    pub fn invalidate_all(&self) {
        self.entries.lock().clear();
    }

    fn scan(&self, path: &Path, cached: Option<&FileEntry>) -> Scan {
        if let (Some(entry), Some(stamp)) = (cached, self.fs.stat(path)) {
            if entry.stamp == stamp {
                return Scan::Reused(entry.clone());
            }
        }
        match source::load(self.fs.as_ref(), path, self.limits.max_file_size) {
            FileRead::Loaded { file, content } => {
                let edges = collect_file_edges(self.fs.as_ref(), &self.registry, path, &content);
                let targets: Vec<PathBuf> = resolved_targets(&edges)
                    .into_iter()
                    .map(|t| paths::clean(&t))
                    .collect();
                debug!(path = %path.display(), deps = targets.len(), "scanned");
                Scan::Fresh(FileEntry {
                    stamp: file.stamp,
                    targets: targets.into(),
                })
            }
            FileRead::Skipped(reason) => Scan::Skipped(reason),
        }
    }

    /// Swaps in `graph` unless it equals the published one.
    fn publish(&self, graph: DependencyGraph) -> bool {
        let mut slot = self.snapshot.write();
        if **slot == graph {
            return false;
        }
        *slot = Arc::new(graph);
        true
    }
}
