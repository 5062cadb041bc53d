// src/metrics/engine.rs
//! Per-file coupling and maintainability, plus a project summary.
//!
//! Independent of the graph store: raw import strings are cached per file
//! and associated with known files by whole-segment suffix match, so
//! package-style imports that name a project file still count.

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::coupling::{calculate_instability, Coupling, CouplingMetric, InstabilityMetric};
use super::maintainability::{analyze_text, Grade, Maintainability};
use crate::graph::cache::StampedCache;
use crate::graph::imports::ExtractorRegistry;
use crate::graph::{paths, resolver, ScanLimits};
use crate::lang::Lang;
use crate::source::{self, FileRead, FileSystem, SkipReason};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileMetrics {
    pub path: PathBuf,
    pub instability: InstabilityMetric,
    pub coupling: CouplingMetric,
    pub maintainability: Maintainability,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub files: usize,
    pub average_instability: f64,
    pub average_maintainability: f64,
    /// 0.6 x mean maintainability + 0.4 x 100 x (1 - mean instability).
    pub health_score: f64,
    pub grades: BTreeMap<Grade, usize>,
}

impl ProjectSummary {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_metrics<'a>(metrics: impl IntoIterator<Item = &'a FileMetrics>) -> Self {
        let mut summary = Self::default();
        let (mut instability, mut maintainability) = (0.0, 0.0);
        for m in metrics {
            summary.files += 1;
            instability += m.instability.value;
            maintainability += m.maintainability.index;
            *summary.grades.entry(m.maintainability.grade).or_insert(0) += 1;
        }
        if summary.files == 0 {
            return summary;
        }
        let n = summary.files as f64;
        summary.average_instability = instability / n;
        summary.average_maintainability = maintainability / n;
        summary.health_score = 0.6 * summary.average_maintainability
            + 0.4 * (100.0 * (1.0 - summary.average_instability));
        summary
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsReport {
    pub supplied: usize,
    pub processed: usize,
    pub reused: usize,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

#[derive(Debug)]
struct FileFacts {
    imports: Vec<String>,
    maintainability: Maintainability,
}

#[derive(Debug, Default)]
struct MetricsSnapshot {
    files: BTreeMap<PathBuf, FileMetrics>,
    summary: ProjectSummary,
}

pub struct MetricsEngine {
    fs: Arc<dyn FileSystem>,
    registry: Arc<ExtractorRegistry>,
    limits: ScanLimits,
    cache: Mutex<StampedCache<Arc<FileFacts>>>,
    snapshot: RwLock<Arc<MetricsSnapshot>>,
}

impl MetricsEngine {
    #[must_use]
    pub fn new(
        fs: Arc<dyn FileSystem>,
        registry: Arc<ExtractorRegistry>,
        limits: ScanLimits,
        capacity: usize,
    ) -> Self {
        Self {
            fs,
            registry,
            limits,
            cache: Mutex::new(StampedCache::lru(capacity)),
            snapshot: RwLock::new(Arc::new(MetricsSnapshot::default())),
        }
    }

    /// Rebuilds the dependency and dependent maps for `files` from scratch
    /// and publishes fresh metrics.
    pub fn analyze(&self, files: &[PathBuf]) -> MetricsReport {
        let (accepted, skipped) = self.limits.admit(files);
        let mut report = MetricsReport {
            supplied: files.len(),
            skipped,
            ..MetricsReport::default()
        };

        let scans: Vec<(PathBuf, Result<(Arc<FileFacts>, bool), SkipReason>)> = accepted
            .into_par_iter()
            .map(|path| {
                let scan = self.facts(&path);
                (path, scan)
            })
            .collect();

        let mut facts: BTreeMap<PathBuf, Arc<FileFacts>> = BTreeMap::new();
        for (path, scan) in scans {
            match scan {
                Ok((f, reused)) => {
                    report.reused += usize::from(reused);
                    facts.insert(path, f);
                }
                Err(reason) => report.skipped.push((path, reason)),
            }
        }
        report.processed = facts.len();

        let index = ModuleIndex::new(facts.keys());
        let mut dependents: HashMap<&PathBuf, usize> = HashMap::new();
        let mut efferent: HashMap<&PathBuf, usize> = HashMap::new();
        for (path, f) in &facts {
            let distinct: BTreeSet<&str> = f.imports.iter().map(String::as_str).collect();
            efferent.insert(path, distinct.len());
            let targets: BTreeSet<&PathBuf> = distinct
                .iter()
                .filter_map(|raw| index.associate(path, raw))
                .filter(|target| *target != path)
                .collect();
            for target in targets {
                *dependents.entry(target).or_insert(0) += 1;
            }
        }

        let metrics: BTreeMap<PathBuf, FileMetrics> = facts
            .iter()
            .map(|(path, f)| {
                let ca = dependents.get(path).copied().unwrap_or(0);
                let ce = efferent.get(path).copied().unwrap_or(0);
                let m = FileMetrics {
                    path: path.clone(),
                    instability: calculate_instability(ca, ce),
                    coupling: Coupling::new(ca, ce).into(),
                    maintainability: f.maintainability.clone(),
                };
                (path.clone(), m)
            })
            .collect();

        let summary = ProjectSummary::from_metrics(metrics.values());
        info!(
            files = summary.files,
            health = summary.health_score,
            reused = report.reused,
            "metrics analyzed"
        );
        *self.snapshot.write() = Arc::new(MetricsSnapshot {
            files: metrics,
            summary,
        });
        report
    }

    #[must_use]
    pub fn file_metrics(&self, path: &Path) -> Option<FileMetrics> {
        let snapshot = Arc::clone(&self.snapshot.read());
        if let Some(m) = snapshot.files.get(&paths::clean(path)) {
            return Some(m.clone());
        }
        let key = paths::key(path);
        snapshot
            .files
            .iter()
            .find(|(p, _)| paths::keys_match(&paths::key(p), &key))
            .map(|(_, m)| m.clone())
    }

    #[must_use]
    pub fn project_summary(&self) -> ProjectSummary {
        self.snapshot.read().summary.clone()
    }

    /// All analyzed files, sorted by path.
    #[must_use]
    pub fn all_metrics(&self) -> Vec<FileMetrics> {
        self.snapshot.read().files.values().cloned().collect()
    }

    fn facts(&self, path: &Path) -> Result<(Arc<FileFacts>, bool), SkipReason> {
        let key = paths::key(path);
        if let Some(stamp) = self.fs.stat(path) {
            if let Some(hit) = self.cache.lock().get(&key, stamp) {
                return Ok((hit, true));
            }
        }
        match source::load(self.fs.as_ref(), path, self.limits.max_file_size) {
            FileRead::Loaded { file, content } => {
                let imports = self
                    .registry
                    .parse(&content, file.lang)
                    .iter()
                    .map(|r| r.path)
                    .collect();
                let facts = Arc::new(FileFacts {
                    imports,
                    maintainability: analyze_text(&content),
                });
                debug!(path = %path.display(), "metrics facts computed");
                self.cache.lock().put(&key, file.stamp, Arc::clone(&facts));
                Ok((facts, false))
            }
            FileRead::Skipped(reason) => Err(reason),
        }
    }
}

/// Known files addressable by their extension-less, lowercased segments.
struct ModuleIndex<'a> {
    by_key: HashMap<String, &'a PathBuf>,
    by_stem: HashMap<String, Vec<(Vec<String>, &'a PathBuf)>>,
}

impl<'a> ModuleIndex<'a> {
    fn new(files: impl Iterator<Item = &'a PathBuf>) -> Self {
        let mut by_key = HashMap::new();
        let mut by_stem: HashMap<String, Vec<(Vec<String>, &'a PathBuf)>> = HashMap::new();
        for file in files {
            let key = paths::key(file);
            let stripped = paths::strip_ext(&key).to_string();
            let segments: Vec<String> = stripped
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if let Some(stem) = segments.last() {
                by_stem.entry(stem.clone()).or_default().push((segments.clone(), file));
            }
            by_key.entry(stripped).or_insert(file);
        }
        Self { by_key, by_stem }
    }

    /// Maps a raw import in `from` to a known file.
    fn associate(&self, from: &Path, raw: &str) -> Option<&'a PathBuf> {
        if let Some(relative) = resolver::relative_form(from, raw) {
            let dir = from.parent()?;
            let key = paths::key(&dir.join(relative));
            return self
                .by_key
                .get(&key)
                .or_else(|| self.by_key.get(&format!("{key}/index")))
                .or_else(|| self.by_key.get(source_stem(&key)?))
                .copied();
        }

        let wanted = import_segments(raw, Lang::from_path(from));
        let stem = wanted.last()?;
        self.by_stem
            .get(stem)?
            .iter()
            .find(|(segments, file)| segments.ends_with(&wanted) && file.as_path() != from)
            .map(|(_, file)| *file)
    }
}

/// `key` without its final extension, when that extension names a source
/// language. `user.service` keeps its suffix; `user.js` loses it.
fn source_stem(key: &str) -> Option<&str> {
    let stem = paths::strip_ext(key);
    let ext = key.get(stem.len() + 1..)?;
    Lang::from_ext(ext).map(|_| stem)
}

/// Lowercased module segments of a package-style import.
fn import_segments(raw: &str, lang: Option<Lang>) -> Vec<String> {
    let spelled = match lang {
        Some(Lang::Rust) => raw.replace("::", "/"),
        Some(Lang::Python | Lang::Java | Lang::Kotlin | Lang::Scala) => raw.replace('.', "/"),
        _ => raw.to_string(),
    };
    let lowered = spelled.to_lowercase();
    source_stem(&lowered)
        .unwrap_or(lowered.as_str())
        .split('/')
        .filter(|s| !matches!(*s, "" | "." | ".." | "crate" | "self" | "super" | "*" | "_" | "{"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFs;

    fn engine(fs: &Arc<MemoryFs>) -> MetricsEngine {
        let fs: Arc<dyn FileSystem> = fs.clone();
        MetricsEngine::new(fs, Arc::new(ExtractorRegistry::default()), ScanLimits::default(), 16)
    }

    fn files(list: &[&str]) -> Vec<PathBuf> {
        list.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_hub_and_leaf_coupling() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import { h } from './hub';");
        fs.insert("/p/b.ts", "import { h } from './hub';\nimport React from 'react';");
        fs.insert("/p/hub.ts", "export const h = 1;");
        let e = engine(&fs);
        let report = e.analyze(&files(&["/p/a.ts", "/p/b.ts", "/p/hub.ts"]));
        assert_eq!(report.processed, 3);

        let hub = e.file_metrics(Path::new("/p/hub.ts")).map(|m| m.coupling);
        assert_eq!(hub.map(|c| (c.afferent, c.efferent)), Some((2, 0)));
        let b = e.file_metrics(Path::new("/P/B")).map(|m| m.instability.value);
        assert_eq!(b, Some(1.0));
    }

    #[test]
    fn test_dotted_relative_import_keeps_its_suffix() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import { S } from './user.service';");
        fs.insert("/p/b.ts", "import { U } from './user.ts';");
        fs.insert("/p/user.service.ts", "export class S {}");
        fs.insert("/p/user.ts", "export class U {}");
        let e = engine(&fs);
        let _ = e.analyze(&files(&["/p/a.ts", "/p/b.ts", "/p/user.service.ts", "/p/user.ts"]));

        let svc = e.file_metrics(Path::new("/p/user.service.ts"));
        assert_eq!(svc.map(|m| m.coupling.afferent), Some(1));
        let user = e.file_metrics(Path::new("/p/user.ts"));
        assert_eq!(user.map(|m| m.coupling.afferent), Some(1));
    }

    #[test]
    fn test_source_stem() {
        assert_eq!(source_stem("/p/user.js"), Some("/p/user"));
        assert_eq!(source_stem("/p/user.service"), None);
        assert_eq!(source_stem("/p/user"), None);
    }

    #[test]
    fn test_suffix_association_is_segment_based() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/app/models/user.py", "");
        fs.insert("/p/app/models/user_profile.py", "");
        fs.insert("/p/app/views.py", "from app.models.user import User");
        let e = engine(&fs);
        let _ = e.analyze(&files(&[
            "/p/app/models/user.py",
            "/p/app/models/user_profile.py",
            "/p/app/views.py",
        ]));

        let user = e.file_metrics(Path::new("/p/app/models/user.py"));
        assert_eq!(user.map(|m| m.coupling.afferent), Some(1));
        let profile = e.file_metrics(Path::new("/p/app/models/user_profile.py"));
        assert_eq!(profile.map(|m| m.coupling.afferent), Some(0));
    }

    #[test]
    fn test_summary_health_score() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "export const a = 1;");
        let e = engine(&fs);
        let _ = e.analyze(&files(&["/p/a.ts"]));
        let summary = e.project_summary();
        assert_eq!(summary.files, 1);
        assert_eq!(summary.average_instability, 0.0);
        assert_eq!(summary.average_maintainability, 100.0);
        assert!((summary.health_score - 100.0).abs() < 1e-9);
        assert_eq!(summary.grades.get(&Grade::A), Some(&1));
    }

    #[test]
    fn test_unchanged_files_reuse_cache() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import b from './b';");
        fs.insert("/p/b.ts", "");
        let e = engine(&fs);
        let input = files(&["/p/a.ts", "/p/b.ts", "/p/missing.ts"]);
        let first = e.analyze(&input);
        assert_eq!(first.reused, 0);
        assert_eq!(first.skipped.len(), 1);

        let second = e.analyze(&input);
        assert_eq!(second.reused, 2);
    }

    #[test]
    fn test_import_segments() {
        assert_eq!(import_segments("crate::graph::store", Some(Lang::Rust)), vec!["graph", "store"]);
        assert_eq!(import_segments("com.acme.Billing", Some(Lang::Java)), vec!["com", "acme", "billing"]);
        assert_eq!(import_segments("lib/util.h", Some(Lang::C)), vec!["lib", "util"]);
    }
}
