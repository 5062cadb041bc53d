// src/graph/imports/c_family.rs
use super::PatternExtractor;
use crate::lang::Lang;

pub(super) fn extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::C, Lang::Cpp],
        &[r#"(?m)^[ \t]*#[ \t]*include[ \t]*[<"](?P<path>[^>"\n]+)[>"]"#],
    )
}
