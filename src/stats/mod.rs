// src/stats/mod.rs
//! Statistical view of the project: term vectors for nearest-neighbour
//! layer guesses and an import-count model for anomaly detection.

pub mod learner;
pub mod model;
pub mod vector;

pub use learner::{LearnReport, Learned, SimilarFile, StatisticalModel, SIMILARITY_THRESHOLD};
pub use model::{count_imports, AnomalyResult, StatsModel, ANOMALY_THRESHOLD};
pub use vector::{cosine, tokenize, TermVector};
