// src/graph/imports/scripting.rs
use super::PatternExtractor;
use crate::lang::Lang;

pub(super) fn ruby_extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::Ruby],
        &[r#"\brequire(?:_relative)?[ \t]*\(?[ \t]*['"](?P<path>[^'"\n]+)['"]"#],
    )
}

pub(super) fn php_extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::Php],
        &[
            r#"\b(?:require|include)(?:_once)?[ \t]*\(?[ \t]*['"](?P<path>[^'"\n]+)['"]"#,
            r"(?m)^[ \t]*use[ \t]+(?P<path>[\w\\]+)",
        ],
    )
}
