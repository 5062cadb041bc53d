// src/types.rs
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Categories of architectural violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Target imports the source back (or the file imports itself).
    DirectCycle,
    /// Multi-hop loop through the graph.
    DeepCycle,
    /// An explicit rule disallows this import.
    RuleBreach,
    /// Inner layer depends on an outer layer.
    LayerBreach,
    /// Importing a module's internal file instead of its index.
    EncapsulationBreach,
    /// Too many imports in one file.
    ExcessiveImports,
    /// Import count is a statistical outlier for this project.
    ImportAnomaly,
    /// Concept-level flow that the flow matrix does not allow.
    SuspiciousDependency,
    /// File content resembles a file in a different layer.
    MisplacedFile,
}

impl ViolationKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::DirectCycle => "DIRECT_CYCLE",
            Self::DeepCycle => "DEEP_CYCLE",
            Self::RuleBreach => "RULE_BREACH",
            Self::LayerBreach => "LAYER_BREACH",
            Self::EncapsulationBreach => "ENCAPSULATION_BREACH",
            Self::ExcessiveImports => "EXCESSIVE_IMPORTS",
            Self::ImportAnomaly => "IMPORT_ANOMALY",
            Self::SuspiciousDependency => "SUSPICIOUS_DEPENDENCY",
            Self::MisplacedFile => "MISPLACED_FILE",
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::DirectCycle => "Two files import each other",
            Self::DeepCycle => "Dependency loop spanning several files",
            Self::RuleBreach => "Import forbidden by an architecture rule",
            Self::LayerBreach => "Inner layer depends on an outer layer",
            Self::EncapsulationBreach => "Importing internal file instead of module API",
            Self::ExcessiveImports => "File depends on too many modules",
            Self::ImportAnomaly => "Import count far above the project norm",
            Self::SuspiciousDependency => "Dependency direction contradicts file roles",
            Self::MisplacedFile => "File reads like code from another layer",
        }
    }

    #[must_use]
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::DirectCycle | Self::DeepCycle | Self::RuleBreach | Self::LayerBreach => {
                Severity::Error
            }
            Self::EncapsulationBreach
            | Self::ExcessiveImports
            | Self::ImportAnomaly
            | Self::SuspiciousDependency => Severity::Warning,
            Self::MisplacedFile => Severity::Info,
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// Byte range of the offending import in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub offset: usize,
    pub length: usize,
}

/// A single violation detected during analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    pub file: PathBuf,
    pub target: Option<PathBuf>,
    pub span: Option<Span>,
    pub message: String,
    pub suggestion: Option<String>,
    /// Heuristic strength (Z-score, similarity, confidence) where one applies.
    pub score: Option<f64>,
}

impl Violation {
    /// Creates a violation with the kind's default severity.
    #[must_use]
    pub fn new(kind: ViolationKind, file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            file: file.into(),
            target: None,
            span: None,
            message: message.into(),
            suggestion: None,
            score: None,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<PathBuf>) -> Self {
        self.target = Some(target.into());
        self
    }

    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.span = Some(Span { offset, length });
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Analysis results for a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub violations: Vec<Violation>,
}

impl FileReport {
    /// Returns true if no violations were found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.violations.iter().filter(|v| v.severity == severity).count()
    }
}
