// src/graph/imports/go.rs
use super::PatternExtractor;
use crate::lang::Lang;

pub(super) fn extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::Go],
        &[
            r#"(?m)^import[ \t]+(?:[\w.]+[ \t]+)?"(?P<path>[^"\n]+)""#,
            // Lines inside an `import ( ... )` block.
            r#"(?m)^[ \t]+(?:[\w.]+[ \t]+)?"(?P<path>[^"\n]+)"[ \t]*$"#,
        ],
    )
}
