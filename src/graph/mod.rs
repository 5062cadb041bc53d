// src/graph/mod.rs
//! Dependency graph: extraction, resolution, storage and cycle detection.

pub mod cache;
pub mod cycles;
pub mod edges;
pub mod imports;
pub mod paths;
pub mod resolver;
pub mod store;

pub use cycles::{Cycle, DepthLimit, DirectCycleChecker};
pub use edges::ImportEdge;
pub use store::{BuildReport, DependencyGraph, GraphStats, GraphStore, ScanLimits};
