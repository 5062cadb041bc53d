// src/stats/model.rs
//! Import-count distribution and Z-score anomaly test.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Z-score above which a file is flagged (~99.7th percentile).
pub const ANOMALY_THRESHOLD: f64 = 3.0;

/// Standard deviation floor, so uniform projects don't divide by zero.
pub const MIN_STD_DEV: f64 = 1.0;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:import|from|use|#[ \t]*include)\b|\brequire(?:_relative)?[ \t]*\(")
        .unwrap_or_else(|e| panic!("invalid import counter: {e}"))
});

/// Language-agnostic count of import statements and `require()` calls.
#[must_use]
pub fn count_imports(text: &str) -> usize {
    IMPORT_RE.find_iter(text).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsModel {
    pub mean: f64,
    pub std_dev: f64,
    pub samples: usize,
}

impl StatsModel {
    /// Population mean and standard deviation; `None` for no samples.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(counts: &[usize]) -> Option<Self> {
        if counts.is_empty() {
            return None;
        }
        let n = counts.len() as f64;
        let mean = counts.iter().map(|&c| c as f64).sum::<f64>() / n;
        let variance = counts
            .iter()
            .map(|&c| {
                let d = c as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / n;
        Some(Self {
            mean,
            std_dev: variance.sqrt().max(MIN_STD_DEV),
            samples: counts.len(),
        })
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn z_score(&self, count: usize) -> f64 {
        (count as f64 - self.mean) / self.std_dev
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyResult {
    pub is_anomaly: bool,
    pub score: f64,
    pub imports: usize,
    /// Only set when `is_anomaly` is true.
    pub message: Option<String>,
}

impl AnomalyResult {
    #[must_use]
    pub fn neutral(imports: usize) -> Self {
        Self {
            is_anomaly: false,
            score: 0.0,
            imports,
            message: None,
        }
    }

    #[must_use]
    pub fn evaluate(model: &StatsModel, imports: usize) -> Self {
        let score = model.z_score(imports);
        let is_anomaly = score > ANOMALY_THRESHOLD;
        let message = is_anomaly.then(|| {
            format!(
                "{imports} imports is unusual for this project (mean {:.1}, Z-score {score:.2})",
                model.mean
            )
        });
        Self {
            is_anomaly,
            score,
            imports,
            message,
        }
    }
}
