// src/config/mod.rs
pub mod types;

pub use self::types::{Config, Features, Layer, Limits, Rule};

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DepwardenError, Result};
use crate::graph::{DepthLimit, ScanLimits};

pub const CONFIG_FILE: &str = "depwarden.toml";

impl Config {
    /// Loads `depwarden.toml` from `root`. A missing file yields defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_from(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        match fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(DepwardenError::Io { source, path }),
        }
    }

    /// Parses TOML content; `origin` is only used for error messages.
    ///
    /// # Errors
    /// Returns error if `content` is not a valid config document.
    pub fn parse(content: &str, origin: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| DepwardenError::Config {
            path: PathBuf::from(origin),
            source,
        })
    }

    #[must_use]
    pub fn depth_limit(&self) -> DepthLimit {
        DepthLimit::new(self.max_cycle_depth)
    }

    #[must_use]
    pub fn scan_limits(&self) -> ScanLimits {
        ScanLimits {
            max_files: self.limits.max_files,
            max_file_size: self.limits.max_file_size,
        }
    }
}
