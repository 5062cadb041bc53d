// src/stats/learner.rs
//! Learns the project's vocabulary and import-count distribution.
//!
//! Same publication discipline as the graph store: a learning pass builds a
//! fresh [`Learned`] snapshot and swaps it in whole.

use parking_lot::RwLock;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

use super::model::{count_imports, AnomalyResult, StatsModel};
use super::vector::{cosine, TermVector};
use crate::flight::{FlightGuard, Outcome};
use crate::graph::{paths, ScanLimits};
use crate::source::{self, FileRead, FileSystem, SkipReason};

/// Minimum cosine similarity for [`StatisticalModel::classify_layer`].
pub const SIMILARITY_THRESHOLD: f64 = 0.85;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LearnReport {
    pub supplied: usize,
    pub processed: usize,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarFile {
    pub most_similar_file: PathBuf,
    pub similarity: f64,
}

/// One published learning result.
#[derive(Debug, Default)]
pub struct Learned {
    vectors: BTreeMap<PathBuf, TermVector>,
    model: Option<StatsModel>,
}

impl Learned {
    #[must_use]
    pub fn model(&self) -> Option<&StatsModel> {
        self.model.as_ref()
    }

    #[must_use]
    pub fn files(&self) -> usize {
        self.vectors.len()
    }

    fn vector_of(&self, path: &Path) -> Option<(&PathBuf, &TermVector)> {
        let key = paths::key(path);
        self.vectors
            .iter()
            .find(|(p, _)| paths::keys_match(&paths::key(p), &key))
    }
}

pub struct StatisticalModel {
    fs: Arc<dyn FileSystem>,
    limits: ScanLimits,
    snapshot: RwLock<Arc<Learned>>,
    learning: AtomicBool,
}

impl StatisticalModel {
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>, limits: ScanLimits) -> Self {
        Self {
            fs,
            limits,
            snapshot: RwLock::new(Arc::new(Learned::default())),
            learning: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn learned(&self) -> Arc<Learned> {
        Arc::clone(&self.snapshot.read())
    }

    /// Reads `files`, builds term vectors and the import-count model, and
    /// publishes them. Returns `Declined` if a pass is already running.
    pub fn learn(&self, files: &[PathBuf]) -> Outcome<LearnReport> {
        let Some(_guard) = FlightGuard::claim(&self.learning) else {
            debug!("learning already running; request dropped");
            return Outcome::Declined;
        };

        let (accepted, skipped) = self.limits.admit(files);
        let mut report = LearnReport {
            supplied: files.len(),
            skipped,
            ..LearnReport::default()
        };

        let reads: Vec<(PathBuf, Result<(TermVector, usize), SkipReason>)> = accepted
            .into_par_iter()
            .map(|path| {
                let read = match source::load(self.fs.as_ref(), &path, self.limits.max_file_size) {
                    FileRead::Loaded { content, .. } => {
                        Ok((TermVector::from_text(&content), count_imports(&content)))
                    }
                    FileRead::Skipped(reason) => Err(reason),
                };
                (path, read)
            })
            .collect();

        let mut vectors = BTreeMap::new();
        let mut counts = Vec::new();
        for (path, read) in reads {
            match read {
                Ok((vector, imports)) => {
                    vectors.insert(path, vector);
                    counts.push(imports);
                }
                Err(reason) => report.skipped.push((path, reason)),
            }
        }
        report.processed = vectors.len();

        let model = StatsModel::from_counts(&counts);
        if let Some(m) = &model {
            info!(
                files = report.processed,
                mean = m.mean,
                std_dev = m.std_dev,
                "import model learned"
            );
        }
        *self.snapshot.write() = Arc::new(Learned { vectors, model });
        Outcome::Completed(report)
    }

    /// Z-score of `text`'s import count. Neutral until something is learned.
    #[must_use]
    pub fn detect_anomaly(&self, text: &str) -> AnomalyResult {
        let imports = count_imports(text);
        match self.learned().model() {
            Some(model) => AnomalyResult::evaluate(model, imports),
            None => AnomalyResult::neutral(imports),
        }
    }

    /// Most similar other learned file, if above [`SIMILARITY_THRESHOLD`].
    /// Files that were not learned are read from the file system.
    #[must_use]
    pub fn classify_layer(&self, path: &Path) -> Option<SimilarFile> {
        let learned = self.learned();
        if let Some((_, vector)) = learned.vector_of(path) {
            return nearest(&learned, path, vector);
        }
        match source::load(self.fs.as_ref(), path, self.limits.max_file_size) {
            FileRead::Loaded { content, .. } => {
                nearest(&learned, path, &TermVector::from_text(&content))
            }
            FileRead::Skipped(_) => None,
        }
    }

    /// Like [`classify_layer`](Self::classify_layer) for unsaved content.
    #[must_use]
    pub fn classify_text(&self, path: &Path, text: &str) -> Option<SimilarFile> {
        nearest(&self.learned(), path, &TermVector::from_text(text))
    }
}

fn nearest(learned: &Learned, path: &Path, vector: &TermVector) -> Option<SimilarFile> {
    let mut best: Option<(&PathBuf, f64)> = None;
    for (other, other_vec) in &learned.vectors {
        if paths::same_file(other, path) {
            continue;
        }
        let sim = cosine(vector, other_vec);
        if best.map_or(true, |(_, b)| sim > b) {
            best = Some((other, sim));
        }
    }
    best.filter(|(_, sim)| *sim > SIMILARITY_THRESHOLD)
        .map(|(file, similarity)| SimilarFile {
            most_similar_file: file.clone(),
            similarity,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemoryFs;

    fn model(fs: &Arc<MemoryFs>) -> StatisticalModel {
        let fs: Arc<dyn FileSystem> = fs.clone();
        StatisticalModel::new(fs, ScanLimits::default())
    }

    fn imports(n: usize) -> String {
        (0..n).map(|i| format!("import m{i} from './m{i}';\n")).collect()
    }

    #[test]
    fn test_neutral_before_learning() {
        let fs = Arc::new(MemoryFs::new());
        let m = model(&fs);
        let result = m.detect_anomaly(&imports(80));
        assert!(!result.is_anomaly);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_outlier_among_uniform_project() {
        let fs = Arc::new(MemoryFs::new());
        let mut files = Vec::new();
        for i in 0..20 {
            let path = format!("/p/f{i}.ts");
            fs.insert(&path, imports(2));
            files.push(PathBuf::from(path));
        }
        fs.insert("/p/big.ts", imports(50));
        files.push(PathBuf::from("/p/big.ts"));

        let m = model(&fs);
        let report = m.learn(&files).completed().unwrap_or_default();
        assert_eq!(report.processed, 21);

        let big = m.detect_anomaly(&imports(50));
        assert!(big.is_anomaly);
        assert!(big.score > 3.0);
        assert!(!m.detect_anomaly(&imports(2)).is_anomaly);
    }

    #[test]
    fn test_unreadable_files_are_reported_not_fatal() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import x from 'x';");
        let m = model(&fs);
        let report = m
            .learn(&[PathBuf::from("/p/a.ts"), PathBuf::from("/p/gone.ts")])
            .completed()
            .unwrap_or_default();
        assert_eq!(report.supplied, 2);
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, vec![(PathBuf::from("/p/gone.ts"), SkipReason::Missing)]);
    }

    #[test]
    fn test_classify_layer_nearest_neighbour() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/data/user_repo.ts", "query table rows insert update select rows table");
        fs.insert("/p/data/order_repo.ts", "query table rows insert update select rows table order");
        fs.insert("/p/ui/button.ts", "render button click style theme");
        let m = model(&fs);
        let _ = m.learn(&[
            PathBuf::from("/p/data/user_repo.ts"),
            PathBuf::from("/p/data/order_repo.ts"),
            PathBuf::from("/p/ui/button.ts"),
        ]);

        let hit = m.classify_layer(Path::new("/p/data/user_repo.ts"));
        assert_eq!(
            hit.map(|h| h.most_similar_file),
            Some(PathBuf::from("/p/data/order_repo.ts"))
        );
        assert!(m.classify_layer(Path::new("/p/ui/button.ts")).is_none());
    }

    #[test]
    fn test_learn_declined_while_running() {
        let fs = Arc::new(MemoryFs::new());
        let m = model(&fs);
        let _held = FlightGuard::claim(&m.learning);
        assert!(m.learn(&[]).is_declined());
    }
}
