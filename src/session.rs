// src/session.rs
//! The analysis session: one owned object holding the graph, the learned
//! model, the metrics snapshot and the validation result cache.
//!
//! Build and learn passes swap in fresh snapshots; every query below reads
//! whichever snapshot is current when it starts.

use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::flight::Outcome;
use crate::graph::cache::{BoundedCache, LruStore};
use crate::graph::cycles::{self, Cycle, DirectCycleChecker};
use crate::graph::imports::{ExtractorRegistry, ImportRecord};
use crate::graph::{paths, resolver, BuildReport, DependencyGraph, GraphStats, GraphStore};
use crate::lang::Lang;
use crate::metrics::{FileMetrics, MetricsEngine, MetricsReport, ProjectSummary};
use crate::rules::{self, ConfigIssue, RuleSet};
use crate::semantic::{self, Concept, SemanticFinding};
use crate::source::{self, DiskFs, FileRead, FileSystem};
use crate::stats::{AnomalyResult, LearnReport, SimilarFile, StatisticalModel};
use crate::types::{FileReport, Violation, ViolationKind};

type ResultCache = LruStore<String, (u64, Arc<[Violation]>)>;

pub struct AnalysisSession {
    config: Config,
    fs: Arc<dyn FileSystem>,
    registry: Arc<ExtractorRegistry>,
    graph: GraphStore,
    direct: DirectCycleChecker,
    rules: RuleSet,
    stats: StatisticalModel,
    metrics: MetricsEngine,
    results: Mutex<ResultCache>,
}

/// Everything one whole-project pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectScan {
    pub build: Option<BuildReport>,
    pub learn: Option<LearnReport>,
    pub config_issues: Vec<ConfigIssue>,
    pub files: Vec<FileReport>,
}

impl ProjectScan {
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.files.iter().map(|f| f.violations.len()).sum()
    }
}

impl AnalysisSession {
    #[must_use]
    pub fn new(config: Config, fs: Arc<dyn FileSystem>) -> Self {
        let registry = Arc::new(ExtractorRegistry::default());
        let limits = config.scan_limits();
        let capacity = config.limits.cache_capacity;
        Self {
            graph: GraphStore::new(Arc::clone(&fs), Arc::clone(&registry), limits),
            direct: DirectCycleChecker::new(
                Arc::clone(&fs),
                Arc::clone(&registry),
                limits.max_file_size,
                capacity,
            ),
            rules: RuleSet::compile(&config.rules, &config.layers),
            stats: StatisticalModel::new(Arc::clone(&fs), limits),
            metrics: MetricsEngine::new(Arc::clone(&fs), Arc::clone(&registry), limits, capacity),
            results: Mutex::new(LruStore::new(capacity)),
            config,
            fs,
            registry,
        }
    }

    /// A session over the real disk with patterns anchored at `root`.
    #[must_use]
    pub fn on_disk(config: Config, root: &Path) -> Self {
        Self::new(config, Arc::new(DiskFs)).with_root(root)
    }

    #[must_use]
    pub fn with_root(mut self, root: &Path) -> Self {
        self.rules = RuleSet::compile(&self.config.rules, &self.config.layers).with_root(root);
        self
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn config_issues(&self) -> &[ConfigIssue] {
        self.rules.issues()
    }

    // ---- extraction & resolution ----

    /// Imports in `text`, for an editor-style language tag (`"typescript"`,
    /// `"py"`, ...). An unknown tag yields nothing.
    #[must_use]
    pub fn parse_imports(&self, text: &str, language: &str) -> Vec<ImportRecord> {
        self.registry.parse(text, Lang::from_tag(language)).iter().collect()
    }

    #[must_use]
    pub fn resolve_relative_import(&self, from_dir: &Path, raw: &str) -> Option<PathBuf> {
        resolver::resolve_relative(self.fs.as_ref(), from_dir, raw)
    }

    // ---- graph ----

    pub fn build_graph(&self, files: &[PathBuf]) -> Outcome<BuildReport> {
        self.graph.build_graph(files)
    }

    #[must_use]
    pub fn graph_stats(&self) -> GraphStats {
        self.graph.stats()
    }

    #[must_use]
    pub fn graph(&self) -> Arc<DependencyGraph> {
        self.graph.graph()
    }

    #[must_use]
    pub fn dependencies(&self, path: &Path) -> Vec<PathBuf> {
        self.graph.graph().dependencies(path).to_vec()
    }

    #[must_use]
    pub fn dependents(&self, path: &Path) -> Vec<PathBuf> {
        self.graph.graph().dependents(path)
    }

    // ---- cycles ----

    #[must_use]
    pub fn check_direct_cycle(&self, source: &Path, target: &Path) -> Option<Violation> {
        let cycle = self.direct.check(source, target)?;
        let message = if cycle.depth == 1 {
            "File imports itself".to_string()
        } else {
            format!("Circular import: {}", cycle.chain())
        };
        Some(
            Violation::new(ViolationKind::DirectCycle, source, message)
                .with_target(target)
                .with_suggestion("Move the shared code into a third module both can import"),
        )
    }

    #[must_use]
    pub fn detect_deep_cycle(&self, start: &Path) -> Option<Cycle> {
        cycles::detect_deep_cycle(&self.graph.graph(), start, self.config.depth_limit())
    }

    #[must_use]
    pub fn get_all_cycles(&self) -> Vec<Cycle> {
        cycles::all_cycles(&self.graph.graph(), self.config.depth_limit())
    }

    // ---- rules & layers ----

    #[must_use]
    pub fn validate_rules_and_layers(&self, source: &Path, target: &Path) -> Option<Violation> {
        self.rules.validate(source, target)
    }

    #[must_use]
    pub fn check_encapsulation(&self, source: &Path, target: &Path) -> Option<Violation> {
        rules::encapsulation_violation(self.fs.as_ref(), source, target)
    }

    // ---- statistics ----

    pub fn learn(&self, files: &[PathBuf]) -> Outcome<LearnReport> {
        self.stats.learn(files)
    }

    #[must_use]
    pub fn detect_anomaly(&self, text: &str) -> AnomalyResult {
        self.stats.detect_anomaly(text)
    }

    #[must_use]
    pub fn classify_layer(&self, path: &Path) -> Option<SimilarFile> {
        self.stats.classify_layer(path)
    }

    // ---- semantics ----

    #[must_use]
    pub fn classify_concept(&self, path: &Path) -> Concept {
        semantic::classify(path)
    }

    #[must_use]
    pub fn analyze_semantic_flow(&self, source: &Path, target: &Path) -> Option<SemanticFinding> {
        semantic::analyze(source, target)
    }

    // ---- metrics ----

    pub fn analyze_metrics(&self, files: &[PathBuf]) -> MetricsReport {
        self.metrics.analyze(files)
    }

    #[must_use]
    pub fn get_file_metrics(&self, path: &Path) -> Option<FileMetrics> {
        self.metrics.file_metrics(path)
    }

    #[must_use]
    pub fn get_project_summary(&self) -> ProjectSummary {
        self.metrics.project_summary()
    }

    #[must_use]
    pub fn all_file_metrics(&self) -> Vec<FileMetrics> {
        self.metrics.all_metrics()
    }

    // ---- validation ----

    /// Runs every enabled check on `text` as the content of `path`. The
    /// same `Arc` is returned for repeated calls with an unchanged
    /// `version`.
    pub fn validate_file(&self, path: &Path, version: u64, text: &str) -> Arc<[Violation]> {
        let key = paths::key(path);
        if let Some((cached_version, hit)) = self.results.lock().get(&key) {
            if *cached_version == version {
                debug!(path = %path.display(), version, "validation cache hit");
                return Arc::clone(hit);
            }
        }

        let violations: Arc<[Violation]> = self.run_checks(path, text).into();
        self.results
            .lock()
            .put(key, (version, Arc::clone(&violations)));
        violations
    }

    /// Drops every cached validation result.
    pub fn clear_results(&self) {
        self.results.lock().clear();
    }

    /// Forgets everything cached for `path`: its graph entry, its import
    /// list and its validation result. The next build re-reads the file even
    /// if its stamp is unchanged.
    pub fn invalidate_file(&self, path: &Path) {
        self.graph.invalidate(path);
        self.direct.invalidate(path);
        self.results.lock().remove(&paths::key(path));
    }

    /// Forgets every cached entry. Published snapshots stay until the next
    /// build or learn pass.
    pub fn invalidate_all(&self) {
        self.graph.invalidate_all();
        self.direct.clear();
        self.clear_results();
    }

    fn run_checks(&self, path: &Path, text: &str) -> Vec<Violation> {
        let features = self.config.features;
        let mut out = Vec::new();
        let imports: Vec<ImportRecord> = self.registry.parse(text, Lang::from_path(path)).iter().collect();

        for record in &imports {
            let Some(target) = self.import_target(path, &record.path) else {
                continue;
            };
            let checks = [
                features
                    .direct_cycles
                    .then(|| self.check_direct_cycle(path, &target))
                    .flatten(),
                self.rules
                    .validate_with(path, &target, features.rules, features.layers),
                features
                    .encapsulation
                    .then(|| self.check_encapsulation(path, &target))
                    .flatten(),
                features
                    .semantic
                    .then(|| self.semantic_violation(path, &target))
                    .flatten(),
            ];
            out.extend(
                checks
                    .into_iter()
                    .flatten()
                    .map(|v| v.with_span(record.index, record.length)),
            );
        }

        if features.deep_cycles {
            out.extend(self.deep_cycle_violation(path));
        }
        if features.anomaly {
            let anomaly = self.detect_anomaly(text);
            if let (true, Some(message)) = (anomaly.is_anomaly, anomaly.message) {
                out.push(
                    Violation::new(ViolationKind::ImportAnomaly, path, message)
                        .with_score(anomaly.score)
                        .with_suggestion("Check whether this file has taken on too many roles"),
                );
            }
        }
        if features.max_imports && imports.len() > self.config.max_imports {
            out.push(
                Violation::new(
                    ViolationKind::ExcessiveImports,
                    path,
                    format!(
                        "{} imports (limit {})",
                        imports.len(),
                        self.config.max_imports
                    ),
                )
                .with_suggestion("Split the file or introduce a facade module"),
            );
        }
        if features.similarity {
            out.extend(self.misplaced_violation(path, text));
        }
        out
    }

    /// Resolved target, or the lexical path for relative imports of files
    /// that don't exist yet.
    fn import_target(&self, path: &Path, raw: &str) -> Option<PathBuf> {
        resolver::resolve(self.fs.as_ref(), path, raw).or_else(|| {
            let relative = resolver::relative_form(path, raw)?;
            Some(paths::clean(&path.parent()?.join(relative)))
        })
    }

    fn semantic_violation(&self, source: &Path, target: &Path) -> Option<Violation> {
        let finding = self.analyze_semantic_flow(source, target)?;
        Some(
            Violation::new(ViolationKind::SuspiciousDependency, source, finding.message)
                .with_target(target)
                .with_score(f64::from(finding.score)),
        )
    }

    fn deep_cycle_violation(&self, path: &Path) -> Option<Violation> {
        let cycle = self.detect_deep_cycle(path)?.closed_loop();
        if !cycle.contains(path) {
            return None;
        }
        // Two-file loops are already reported per import.
        if self.config.features.direct_cycles && cycle.depth <= 2 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let depth = cycle.depth as f64;
        Some(
            Violation::new(
                ViolationKind::DeepCycle,
                path,
                format!("Dependency loop of {} files: {}", cycle.depth, cycle.chain()),
            )
            .with_score(depth)
            .with_suggestion("Break the loop by inverting one of the dependencies"),
        )
    }

    /// Flags a file whose nearest neighbour lives in a different layer.
    fn misplaced_violation(&self, path: &Path, text: &str) -> Option<Violation> {
        let own = self.rules.layer_of(path)?;
        let similar = self.stats.classify_text(path, text)?;
        let other = self.rules.layer_of(&similar.most_similar_file)?;
        if own.name == other.name {
            return None;
        }
        Some(
            Violation::new(
                ViolationKind::MisplacedFile,
                path,
                format!(
                    "Reads like '{}' ({:.0}% similar), which is in layer '{}' not '{}'",
                    similar.most_similar_file.display(),
                    similar.similarity * 100.0,
                    other.name,
                    own.name
                ),
            )
            .with_target(similar.most_similar_file.clone())
            .with_score(similar.similarity)
            .with_suggestion(format!("Consider moving this file into layer '{}'", other.name)),
        )
    }

    /// Builds the graph, learns the model, computes metrics and validates
    /// every readable file.
    pub fn analyze_project(&self, files: &[PathBuf]) -> ProjectScan {
        let build = self.build_graph(files).completed();
        let learn = self.learn(files).completed();
        let _ = self.analyze_metrics(files);

        let (accepted, over_limit) = self.config.scan_limits().admit(files);
        if !over_limit.is_empty() {
            warn!(
                skipped = over_limit.len(),
                max_files = self.config.limits.max_files,
                "file limit reached; remaining files not validated"
            );
        }
        let mut reports: Vec<FileReport> = accepted
            .par_iter()
            .filter_map(|path| {
                match source::load(self.fs.as_ref(), path, self.config.limits.max_file_size) {
                    FileRead::Loaded { file, content } => Some(FileReport {
                        path: path.clone(),
                        violations: self.validate_file(path, file.stamp.version(), &content).to_vec(),
                    }),
                    FileRead::Skipped(_) => None,
                }
            })
            .collect();
        reports.sort_by(|a, b| a.path.cmp(&b.path));

        let scan = ProjectScan {
            build,
            learn,
            config_issues: self.config_issues().to_vec(),
            files: reports,
        };
        info!(
            files = scan.files.len(),
            violations = scan.violation_count(),
            "project analyzed"
        );
        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Layer, Rule};
    use crate::source::MemoryFs;

    fn session(fs: &Arc<MemoryFs>, config: Config) -> AnalysisSession {
        let fs: Arc<dyn FileSystem> = fs.clone();
        AnalysisSession::new(config, fs)
    }

    fn kinds(v: &[Violation]) -> Vec<ViolationKind> {
        v.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_direct_cycle_reported_with_span() {
        let fs = Arc::new(MemoryFs::new());
        let a = "import { b } from './b';\n";
        fs.insert("/p/a.ts", a);
        fs.insert("/p/b.ts", "import { a } from './a';\n");
        let s = session(&fs, Config::default());

        let v = s.validate_file(Path::new("/p/a.ts"), 1, a);
        assert_eq!(kinds(&v), vec![ViolationKind::DirectCycle]);
        let span = v[0].span.unwrap_or_else(|| panic!("span"));
        assert_eq!(&a[span.offset..span.offset + span.length], "./b");
    }

    #[test]
    fn test_same_version_returns_cached_arc() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "");
        let s = session(&fs, Config::default());
        let first = s.validate_file(Path::new("/p/a.ts"), 7, "import x from './a';");
        let again = s.validate_file(Path::new("/p/a.ts"), 7, "completely different");
        assert!(Arc::ptr_eq(&first, &again));

        let next = s.validate_file(Path::new("/p/a.ts"), 8, "");
        assert!(next.is_empty());
    }

    #[test]
    fn test_parse_imports_by_language_tag() {
        let fs = Arc::new(MemoryFs::new());
        let s = session(&fs, Config::default());
        let text = "import React from 'react';\nimport { b } from './b';";
        let paths: Vec<String> = s
            .parse_imports(text, "typescriptreact")
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(paths, vec!["react", "./b"]);
        assert_eq!(s.parse_imports("from . import models", "py").len(), 1);
        assert!(s.parse_imports(text, "plaintext").is_empty());
    }

    #[test]
    fn test_invalidate_file_forgets_cached_result() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "");
        let s = session(&fs, Config::default());
        let first = s.validate_file(Path::new("/p/a.ts"), 3, "import x from './a';");
        assert_eq!(kinds(&first), vec![ViolationKind::DirectCycle]);

        s.invalidate_file(Path::new("/P/A.ts"));
        let again = s.validate_file(Path::new("/p/a.ts"), 3, "");
        assert!(again.is_empty());

        s.invalidate_all();
        let third = s.validate_file(Path::new("/p/a.ts"), 3, "import x from './a';");
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(kinds(&third), vec![ViolationKind::DirectCycle]);
    }

    #[test]
    fn test_feature_toggles_disable_checks() {
        let fs = Arc::new(MemoryFs::new());
        let a = "import { b } from './b';\n";
        fs.insert("/p/a.ts", a);
        fs.insert("/p/b.ts", "import { a } from './a';\n");
        let mut config = Config::default();
        config.features.direct_cycles = false;
        config.features.deep_cycles = false;
        let s = session(&fs, config);
        assert!(s.validate_file(Path::new("/p/a.ts"), 1, a).is_empty());
    }

    #[test]
    fn test_deep_cycle_found_after_build() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import './b';");
        fs.insert("/p/b.ts", "import './c';");
        fs.insert("/p/c.ts", "import './a';");
        let s = session(&fs, Config::default());
        let files: Vec<PathBuf> = ["/p/a.ts", "/p/b.ts", "/p/c.ts"].iter().map(PathBuf::from).collect();
        let _ = s.build_graph(&files);

        let cycle = s.detect_deep_cycle(Path::new("/p/a.ts"));
        assert_eq!(cycle.map(|c| c.depth), Some(3));
        assert_eq!(s.get_all_cycles().len(), 1);

        let v = s.validate_file(Path::new("/p/a.ts"), 1, "import './b';");
        assert_eq!(kinds(&v), vec![ViolationKind::DeepCycle]);
    }

    #[test]
    fn test_deep_cycle_reported_only_on_the_loop() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import './b';");
        fs.insert("/p/b.ts", "import './c';");
        fs.insert("/p/c.ts", "import './b';");
        let s = session(&fs, Config::default());
        let files: Vec<PathBuf> = ["/p/a.ts", "/p/b.ts", "/p/c.ts"].iter().map(PathBuf::from).collect();
        let _ = s.build_graph(&files);

        assert!(s.validate_file(Path::new("/p/a.ts"), 1, "import './b';").is_empty());
        let b = s.validate_file(Path::new("/p/b.ts"), 1, "import './c';");
        assert_eq!(kinds(&b), vec![ViolationKind::DirectCycle]);

        let mut config = Config::default();
        config.features.direct_cycles = false;
        let s = session(&fs, config);
        let _ = s.build_graph(&files);
        let b = s.validate_file(Path::new("/p/b.ts"), 1, "import './c';");
        assert_eq!(kinds(&b), vec![ViolationKind::DeepCycle]);
        assert_eq!(b[0].message, "Dependency loop of 2 files: b.ts -> c.ts -> b.ts");
    }

    #[test]
    fn test_rules_layers_and_semantics_per_import() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/src/repository/UserRepo.ts", "");
        fs.insert("/p/src/pages/UserPage.ts", "");
        let config = Config {
            rules: vec![Rule {
                source: "**/repository/**".into(),
                disallow: vec!["**/pages/**".into()],
                message: "Repositories must not import pages".into(),
            }],
            layers: vec![
                Layer {
                    name: "Data".into(),
                    pattern: "**/repository/**".into(),
                    order: None,
                },
                Layer {
                    name: "Ui".into(),
                    pattern: "**/pages/**".into(),
                    order: None,
                },
            ],
            ..Config::default()
        };
        let s = session(&fs, config);
        let text = "import { UserPage } from '../pages/UserPage';";
        let v = s.validate_file(Path::new("/p/src/repository/UserRepo.ts"), 1, text);
        assert_eq!(
            kinds(&v),
            vec![ViolationKind::RuleBreach, ViolationKind::SuspiciousDependency]
        );
    }

    #[test]
    fn test_point_queries() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/src/ui/index.ts", "export * from './button';");
        fs.insert("/p/src/ui/button.ts", "");
        fs.insert("/p/src/services/auth.ts", "");
        let s = session(&fs, Config::default());

        assert_eq!(
            s.resolve_relative_import(Path::new("/p/src/services"), "../ui/button"),
            Some(PathBuf::from("/p/src/ui/button.ts"))
        );
        assert_eq!(
            s.resolve_relative_import(Path::new("/p/src/services"), "../ui"),
            Some(PathBuf::from("/p/src/ui/index.ts"))
        );
        assert_eq!(s.resolve_relative_import(Path::new("/p/src"), "react"), None);

        assert_eq!(s.classify_concept(Path::new("/p/src/services/auth.ts")), Concept::Business);
        assert_eq!(s.classify_concept(Path::new("/p/src/misc/x.ts")), Concept::Unknown);

        let auth = Path::new("/p/src/services/auth.ts");
        let button = Path::new("/p/src/ui/button.ts");
        let breach = s.check_encapsulation(auth, button);
        assert_eq!(breach.map(|v| v.kind), Some(ViolationKind::EncapsulationBreach));
        assert!(s.check_encapsulation(Path::new("/p/src/ui/index.ts"), button).is_none());
        assert!(s.validate_rules_and_layers(auth, button).is_none());
    }

    #[test]
    fn test_excessive_imports() {
        let fs = Arc::new(MemoryFs::new());
        let mut config = Config::default();
        config.max_imports = 2;
        let s = session(&fs, config);
        let text = "import 'a';\nimport 'b';\nimport 'c';\n";
        let v = s.validate_file(Path::new("/p/x.ts"), 1, text);
        assert_eq!(kinds(&v), vec![ViolationKind::ExcessiveImports]);
    }

    #[test]
    fn test_misplaced_file_by_similarity() {
        let fs = Arc::new(MemoryFs::new());
        let repo_body = "query table rows insert update select rows table";
        fs.insert("/p/data/orders.ts", repo_body);
        fs.insert("/p/ui/button.ts", "render button click style theme");
        let config = Config {
            layers: vec![
                Layer {
                    name: "Data".into(),
                    pattern: "**/data/**".into(),
                    order: None,
                },
                Layer {
                    name: "Ui".into(),
                    pattern: "**/ui/**".into(),
                    order: None,
                },
            ],
            ..Config::default()
        };
        let s = session(&fs, config);
        let _ = s.learn(&[PathBuf::from("/p/data/orders.ts"), PathBuf::from("/p/ui/button.ts")]);

        let v = s.validate_file(Path::new("/p/ui/grid.ts"), 1, repo_body);
        assert_eq!(kinds(&v), vec![ViolationKind::MisplacedFile]);
        assert_eq!(v[0].target.as_deref(), Some(Path::new("/p/data/orders.ts")));
    }

    #[test]
    fn test_analyze_project_end_to_end() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import { b } from './b';");
        fs.insert("/p/b.ts", "import { a } from './a';");
        fs.insert("/p/c.ts", "export const c = 1;");
        let s = session(&fs, Config::default());
        let files: Vec<PathBuf> = ["/p/a.ts", "/p/b.ts", "/p/c.ts", "/p/gone.ts"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let scan = s.analyze_project(&files);
        assert_eq!(scan.files.len(), 3);
        assert_eq!(scan.violation_count(), 2);
        assert!(scan.build.is_some_and(|b| b.processed == 3));
        assert_eq!(s.get_project_summary().files, 3);
        assert_eq!(s.dependents(Path::new("/p/b.ts")), vec![PathBuf::from("/p/a.ts")]);
    }

    #[test]
    fn test_analyze_project_honors_file_cap() {
        let fs = Arc::new(MemoryFs::new());
        fs.insert("/p/a.ts", "import { b } from './b';");
        fs.insert("/p/b.ts", "import { a } from './a';");
        fs.insert("/p/c.ts", "import { c } from './c';");
        let mut config = Config::default();
        config.limits.max_files = 2;
        let s = session(&fs, config);
        let files: Vec<PathBuf> = ["/p/a.ts", "/p/b.ts", "/p/c.ts", "/p/a.ts"]
            .iter()
            .map(PathBuf::from)
            .collect();

        let scan = s.analyze_project(&files);
        let validated: Vec<&Path> = scan.files.iter().map(|f| f.path.as_path()).collect();
        assert_eq!(validated, vec![Path::new("/p/a.ts"), Path::new("/p/b.ts")]);
        assert!(scan.build.is_some_and(|b| b.processed == 2 && b.is_truncated()));
        assert!(scan.files.iter().all(|f| !f.is_clean()));
    }
}
