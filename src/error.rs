// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DepwardenError {
    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid glob pattern '{pattern}': {source}")]
    Glob {
        pattern: String,
        source: globset::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, DepwardenError>;
