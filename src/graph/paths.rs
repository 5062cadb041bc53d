// src/graph/paths.rs
//! Path identity.
//!
//! Two paths denote the same file when their normalized keys (forward
//! slashes, lexical `.`/`..` removal, lowercase) are equal, or when one key
//! equals the other with its extension stripped. Matching is whole-string:
//! `user` never matches `user-profile`.

use std::path::{Component, Path, PathBuf};

/// Lexically normalizes a path without touching the disk.
#[must_use]
pub fn clean(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(comp),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Forward-slash rendering used for glob matching and display.
#[must_use]
pub fn slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Case-insensitive identity key.
#[must_use]
pub fn key(path: &Path) -> String {
    slashed(&clean(path)).to_lowercase()
}

/// Removes the extension of the final segment, if any.
#[must_use]
pub fn strip_ext(key: &str) -> &str {
    let seg_start = key.rfind('/').map_or(0, |i| i + 1);
    match key[seg_start..].rfind('.') {
        Some(dot) if dot > 0 => &key[..seg_start + dot],
        _ => key,
    }
}

/// True when `a` and `b` denote the same file.
#[must_use]
pub fn same_file(a: &Path, b: &Path) -> bool {
    keys_match(&key(a), &key(b))
}

#[must_use]
pub fn keys_match(a: &str, b: &str) -> bool {
    a == b || strip_ext(a) == b || a == strip_ext(b)
}
