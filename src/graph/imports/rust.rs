// src/graph/imports/rust.rs
use super::PatternExtractor;
use crate::lang::Lang;

pub(super) fn extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::Rust],
        &[
            r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?use[ \t]+(?P<path>\w+(?:::\w+)*)",
            r"(?m)^[ \t]*(?:pub(?:\([^)]*\))?[ \t]+)?mod[ \t]+(?P<path>\w+)[ \t]*;",
        ],
    )
}
