// src/graph/imports/python.rs
use super::PatternExtractor;
use crate::lang::Lang;

pub(super) fn extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::Python],
        &[
            r"(?m)^[ \t]*from[ \t]+(?P<path>\.+[\w.]*|\w[\w.]*)[ \t]+import\b",
            r"(?m)^[ \t]*import[ \t]+(?P<path>\w[\w.]*)",
        ],
    )
}
