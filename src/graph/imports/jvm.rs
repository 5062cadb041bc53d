// src/graph/imports/jvm.rs
use super::PatternExtractor;
use crate::lang::Lang;

pub(super) fn extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::Java, Lang::Kotlin, Lang::Scala],
        &[r"(?m)^[ \t]*import[ \t]+(?:static[ \t]+)?(?P<path>\w+(?:\.\w+)*(?:\.\*|\._)?)"],
    )
}
