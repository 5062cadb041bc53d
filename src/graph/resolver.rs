// src/graph/resolver.rs
//! Resolves relative import strings to files on disk.
//!
//! Only `./` and `../` style imports are resolved. Package-style specifiers
//! are external by definition and always come back as `None`.

use std::path::{Path, PathBuf};

use crate::graph::paths;
use crate::lang::Lang;
use crate::source::FileSystem;

/// Extensions tried, in order, when the literal path is not a file.
pub const RESOLVE_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "vue", "py", "rs", "go", "json",
];

/// True for `.`/`..` prefixed specifiers.
#[must_use]
pub fn is_relative(import: &str) -> bool {
    import == "."
        || import == ".."
        || import.starts_with("./")
        || import.starts_with("../")
        || import.starts_with(".\\")
        || import.starts_with("..\\")
}

/// Resolves `import` against the importing file's directory.
#[must_use]
pub fn resolve_relative(fs: &dyn FileSystem, from_dir: &Path, import: &str) -> Option<PathBuf> {
    if !is_relative(import) {
        return None;
    }
    let base = paths::clean(&from_dir.join(import));
    check_file(fs, &base).or_else(|| check_index(fs, &base))
}

/// Resolves an import found in `current_file`, translating language-specific
/// relative forms (Python's `.models`) first.
#[must_use]
pub fn resolve(fs: &dyn FileSystem, current_file: &Path, import: &str) -> Option<PathBuf> {
    let dir = current_file.parent()?;
    resolve_relative(fs, dir, &relative_form(current_file, import)?)
}

/// The `./`-style spelling of a relative import, or `None` for package
/// imports.
#[must_use]
pub fn relative_form(current_file: &Path, import: &str) -> Option<String> {
    if is_relative(import) {
        return Some(import.to_string());
    }
    match Lang::from_path(current_file) {
        Some(Lang::Python) => python_relative(import),
        _ => None,
    }
}

/// `.models` -> `./models`, `..core.db` -> `../core/db`.
fn python_relative(import: &str) -> Option<String> {
    let rest = import.trim_start_matches('.');
    let dots = import.len() - rest.len();
    if dots == 0 {
        return None;
    }
    let mut out = if dots == 1 {
        String::from(".")
    } else {
        vec![".."; dots - 1].join("/")
    };
    if !rest.is_empty() {
        out.push('/');
        out.push_str(&rest.replace('.', "/"));
    }
    Some(out)
}

fn check_file(fs: &dyn FileSystem, path: &Path) -> Option<PathBuf> {
    if fs.is_file(path) {
        return Some(path.to_path_buf());
    }
    let raw = path.as_os_str().to_string_lossy();
    RESOLVE_EXTENSIONS
        .iter()
        .map(|ext| PathBuf::from(format!("{raw}.{ext}")))
        .find(|p| fs.is_file(p))
}

fn check_index(fs: &dyn FileSystem, path: &Path) -> Option<PathBuf> {
    RESOLVE_EXTENSIONS
        .iter()
        .map(|ext| path.join(format!("index.{ext}")))
        .find(|p| fs.is_file(p))
}
