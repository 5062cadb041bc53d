// src/graph/imports/ecmascript.rs
use super::PatternExtractor;
use crate::lang::Lang;

// The clause between keyword and `from` is bindings only, so a `=`, `(` or
// quote ends the attempt instead of running on into later statements.
const STATIC_FROM: &str = r#"\b(?:import|export)\s[\w\s{},*$]*?\bfrom\s*['"](?P<path>[^'"\n]+)['"]"#;
const SIDE_EFFECT: &str = r#"\bimport\s*['"](?P<path>[^'"\n]+)['"]"#;
const DYNAMIC: &str = r#"\bimport\s*\(\s*['"](?P<path>[^'"\n]+)['"]\s*\)"#;
const REQUIRE: &str = r#"\brequire\s*\(\s*['"](?P<path>[^'"\n]+)['"]\s*\)"#;

// `import fs = require("fs")` also satisfies REQUIRE; the merge drops the repeat.
const IMPORT_EQUALS: &str = r#"\bimport\s+\w+\s*=\s*require\s*\(\s*['"](?P<path>[^'"\n]+)['"]"#;

pub(super) fn extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::JavaScript],
        &[STATIC_FROM, SIDE_EFFECT, DYNAMIC, REQUIRE],
    )
}

pub(super) fn typescript_extractor() -> PatternExtractor {
    PatternExtractor::from_table(
        &[Lang::TypeScript],
        &[STATIC_FROM, SIDE_EFFECT, DYNAMIC, REQUIRE, IMPORT_EQUALS],
    )
}
