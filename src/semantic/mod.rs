// src/semantic/mod.rs
//! Path-based role classification and the concept flow matrix.

pub mod concept;
pub mod flow;

pub use concept::{classify, Concept};
pub use flow::{allowed_targets, analyze, SemanticFinding};
