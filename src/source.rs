// src/source.rs
//! File-system boundary.
//!
//! The engine never touches `std::fs` directly. Everything goes through
//! [`FileSystem`] so hosts can overlay unsaved buffers and tests can run
//! against [`MemoryFs`]. Reads never fail loudly: they produce a
//! [`FileRead::Skipped`] with an inspectable reason.

use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::graph::paths;
use crate::lang::Lang;

/// Modification token used for cache validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileStamp {
    pub modified: SystemTime,
    pub size: u64,
}

impl FileStamp {
    /// A version number for callers that track files by stamp rather than
    /// by an editor's change counter.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn version(&self) -> u64 {
        let nanos = self
            .modified
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64);
        nanos ^ self.size.rotate_left(32)
    }
}

/// A file read fresh for one analysis pass.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub lang: Option<Lang>,
    pub stamp: FileStamp,
}

/// Why a file contributed nothing to an analysis pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    Missing,
    TooLarge { size: u64, limit: u64 },
    Unreadable { detail: String },
    OverFileLimit,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "file not found"),
            Self::TooLarge { size, limit } => {
                write!(f, "file is {size} bytes (limit {limit})")
            }
            Self::Unreadable { detail } => write!(f, "unreadable: {detail}"),
            Self::OverFileLimit => write!(f, "beyond the file-count limit"),
        }
    }
}

/// Outcome of loading one file.
#[derive(Debug, Clone)]
pub enum FileRead {
    Loaded { file: SourceFile, content: String },
    Skipped(SkipReason),
}

/// Existence, stat and read access.
pub trait FileSystem: Send + Sync {
    /// Returns `None` when the path is not a readable regular file.
    fn stat(&self, path: &Path) -> Option<FileStamp>;

    /// Reads the file as UTF-8 text.
    ///
    /// # Errors
    /// Returns the underlying I/O error.
    fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool {
        self.stat(path).is_some()
    }
}

/// Stats and reads a file, enforcing the size limit.
#[must_use]
pub fn load(fs: &dyn FileSystem, path: &Path, max_size: u64) -> FileRead {
    let Some(stamp) = fs.stat(path) else {
        return FileRead::Skipped(SkipReason::Missing);
    };
    if stamp.size > max_size {
        return FileRead::Skipped(SkipReason::TooLarge {
            size: stamp.size,
            limit: max_size,
        });
    }
    match fs.read_to_string(path) {
        Ok(content) => FileRead::Loaded {
            file: SourceFile {
                path: path.to_path_buf(),
                lang: Lang::from_path(path),
                stamp,
            },
            content,
        },
        Err(e) => FileRead::Skipped(SkipReason::Unreadable {
            detail: e.to_string(),
        }),
    }
}

/// The real disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl FileSystem for DiskFs {
    fn stat(&self, path: &Path) -> Option<FileStamp> {
        let meta = std::fs::metadata(path).ok()?;
        if !meta.is_file() {
            return None;
        }
        Some(FileStamp {
            modified: meta.modified().unwrap_or(UNIX_EPOCH),
            size: meta.len(),
        })
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// In-memory file system. Each write advances a logical clock so the
/// modification stamp changes exactly when content is replaced.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RwLock<HashMap<PathBuf, (String, SystemTime)>>,
    clock: RwLock<u64>,
}

impl MemoryFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes (or replaces) a file and bumps its modification stamp.
    pub fn insert(&self, path: impl AsRef<Path>, content: impl Into<String>) {
        let tick = {
            let mut clock = self.clock.write();
            *clock += 1;
            *clock
        };
        let modified = UNIX_EPOCH + Duration::from_secs(tick);
        self.files
            .write()
            .insert(paths::clean(path.as_ref()), (content.into(), modified));
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.write().remove(&paths::clean(path.as_ref()));
    }
}

impl FileSystem for MemoryFs {
    fn stat(&self, path: &Path) -> Option<FileStamp> {
        let files = self.files.read();
        let (content, modified) = files.get(&paths::clean(path))?;
        Some(FileStamp {
            modified: *modified,
            size: content.len() as u64,
        })
    }

    fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        self.files
            .read()
            .get(&paths::clean(path))
            .map(|(content, _)| content.clone())
            .ok_or_else(|| std::io::Error::from(std::io::ErrorKind::NotFound))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let dir = paths::clean(path);
        self.files
            .read()
            .keys()
            .any(|p| p != &dir && p.starts_with(&dir))
    }
}
