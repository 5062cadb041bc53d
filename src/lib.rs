// src/lib.rs
//! Dependency-graph analysis and architectural rule enforcement.
//!
//! [`session::AnalysisSession`] is the entry point: it owns the graph
//! store, the statistical model and the metrics engine, and validates
//! individual files against the configured rules and layers.

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod exit;
pub mod flight;
pub mod graph;
pub mod lang;
pub mod metrics;
pub mod reporting;
pub mod rules;
pub mod semantic;
pub mod session;
pub mod source;
pub mod stats;
pub mod types;

pub use config::Config;
pub use error::{DepwardenError, Result};
pub use flight::Outcome;
pub use session::{AnalysisSession, ProjectScan};
pub use types::{Severity, Violation, ViolationKind};
