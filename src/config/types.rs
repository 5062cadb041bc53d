// src/config/types.rs
use serde::{Deserialize, Serialize};

/// Forbids imports from files matching `source` into files matching any of
/// the `disallow` globs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub source: String,
    #[serde(default)]
    pub disallow: Vec<String>,
    #[serde(default)]
    pub message: String,
}

/// An architectural ring. Lower order is further inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub pattern: String,
    /// Overrides the list position as the layer's ordinal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_files: usize,
    pub max_file_size: u64,
    pub cache_capacity: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_files: 5000,
            max_file_size: 1024 * 1024,
            cache_capacity: 500,
        }
    }
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub direct_cycles: bool,
    pub deep_cycles: bool,
    pub rules: bool,
    pub layers: bool,
    pub encapsulation: bool,
    pub semantic: bool,
    pub anomaly: bool,
    pub similarity: bool,
    pub max_imports: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            direct_cycles: true,
            deep_cycles: true,
            rules: true,
            layers: true,
            encapsulation: true,
            semantic: true,
            anomaly: true,
            similarity: true,
            max_imports: true,
        }
    }
}

/// Contents of `depwarden.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default = "default_max_imports")]
    pub max_imports: usize,
    #[serde(default = "default_max_cycle_depth")]
    pub max_cycle_depth: usize,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub features: Features,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            layers: Vec::new(),
            max_imports: default_max_imports(),
            max_cycle_depth: default_max_cycle_depth(),
            limits: Limits::default(),
            features: Features::default(),
        }
    }
}

const fn default_max_imports() -> usize { 15 }
const fn default_max_cycle_depth() -> usize { 10 }
