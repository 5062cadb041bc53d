// src/rules/encapsulation.rs
//! Module boundary check: a directory with an index file is a module, and
//! every other file in it is internal.

use std::path::{Path, PathBuf};

use crate::graph::paths;
use crate::source::FileSystem;
use crate::types::{Violation, ViolationKind};

pub const INDEX_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "mjs", "cjs"];

fn is_index(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().eq_ignore_ascii_case("index"))
}

/// Returns the index file of `target`'s directory when `target` is an
/// internal file of that module.
#[must_use]
pub fn check_encapsulation(fs: &dyn FileSystem, target: &Path) -> Option<PathBuf> {
    if is_index(target) {
        return None;
    }
    let dir = target.parent()?;
    INDEX_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("index.{ext}")))
        .find(|candidate| fs.is_file(candidate))
}

/// Builds the violation for `importer -> target`. Files inside the module
/// itself may reach its internals.
#[must_use]
pub fn encapsulation_violation(
    fs: &dyn FileSystem,
    importer: &Path,
    target: &Path,
) -> Option<Violation> {
    let index = check_encapsulation(fs, target)?;
    let module = index.parent()?;
    let module_key = paths::key(module);
    if importer.parent().is_some_and(|dir| {
        let dir_key = paths::key(dir);
        dir_key == module_key || dir_key.starts_with(&format!("{module_key}/"))
    }) {
        return None;
    }
    let name = module
        .file_name()
        .map_or_else(|| paths::slashed(module), |n| n.to_string_lossy().into_owned());
    Some(
        Violation::new(
            ViolationKind::EncapsulationBreach,
            importer,
            format!(
                "'{}' is internal to module '{name}'",
                target.file_name().map_or_else(String::new, |n| n.to_string_lossy().into_owned())
            ),
        )
        .with_target(target)
        .with_suggestion(format!("Import the directory '{name}' instead of the internal file")),
    )
}
