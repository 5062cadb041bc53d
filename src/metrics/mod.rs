// src/metrics/mod.rs
//! Architecture metrics: coupling, instability and maintainability.

pub mod coupling;
pub mod engine;
pub mod maintainability;

pub use coupling::{
    calculate_instability, Coupling, CouplingMetric, CouplingQuality, InstabilityBand,
    InstabilityMetric,
};
pub use engine::{FileMetrics, MetricsEngine, MetricsReport, ProjectSummary};
pub use maintainability::{analyze_text, Grade, Maintainability};
