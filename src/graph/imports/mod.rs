// src/graph/imports/mod.rs
//! Import extraction.
//!
//! Each language family contributes a [`LanguageExtractor`]: an ordered list
//! of regexes with a `path` capture group. The [`ExtractorRegistry`] picks the
//! extractor by [`Lang`]. Extraction is a pure function of `(text, lang)`.

mod c_family;
mod ecmascript;
mod go;
mod jvm;
mod python;
mod rust;
mod scripting;

use regex::{CaptureMatches, Regex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::iter::Peekable;
use std::sync::{Arc, LazyLock};

use crate::lang::Lang;

/// One recognized import construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRecord {
    /// The imported module string, quotes removed.
    pub path: String,
    /// Byte offset of `path` in the source text.
    pub index: usize,
    /// Byte length of `path`.
    pub length: usize,
}

/// A pluggable per-language import recognizer.
pub trait LanguageExtractor: Send + Sync {
    /// Languages this extractor handles.
    fn languages(&self) -> &[Lang];

    /// Rules in priority order. Each must define a `path` capture group.
    fn patterns(&self) -> &[Regex];
}

/// Extractor backed by a fixed regex table.
#[derive(Debug)]
pub struct PatternExtractor {
    languages: Vec<Lang>,
    patterns: Vec<Regex>,
}

impl PatternExtractor {
    /// Compiles a built-in pattern table.
    ///
    /// # Panics
    /// Panics if a built-in pattern is invalid or lacks a `path` group.
    #[must_use]
    pub fn from_table(languages: &[Lang], table: &[&str]) -> Self {
        let patterns = table.iter().map(|p| compile_pattern(p)).collect();
        Self {
            languages: languages.to_vec(),
            patterns,
        }
    }
}

impl LanguageExtractor for PatternExtractor {
    fn languages(&self) -> &[Lang] {
        &self.languages
    }

    fn patterns(&self) -> &[Regex] {
        &self.patterns
    }
}

fn compile_pattern(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(re) if re.capture_names().flatten().any(|n| n == "path") => re,
        Ok(_) => panic!("Import pattern has no `path` group: {pattern}"),
        Err(e) => panic!("Invalid import pattern: {e}"),
    }
}

/// Maps languages to extractors.
#[derive(Clone)]
pub struct ExtractorRegistry {
    by_lang: HashMap<Lang, Arc<dyn LanguageExtractor>>,
}

impl ExtractorRegistry {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            by_lang: HashMap::new(),
        }
    }

    /// Registers an extractor, replacing any previous one for its languages.
    pub fn register(&mut self, extractor: Arc<dyn LanguageExtractor>) {
        for lang in extractor.languages() {
            self.by_lang.insert(*lang, Arc::clone(&extractor));
        }
    }

    #[must_use]
    pub fn get(&self, lang: Lang) -> Option<&dyn LanguageExtractor> {
        self.by_lang.get(&lang).map(Arc::as_ref)
    }

    /// Returns the import sequence for `text`. Unsupported languages yield
    /// an empty sequence.
    #[must_use]
    pub fn parse<'a>(&'a self, text: &'a str, lang: Option<Lang>) -> ImportSeq<'a> {
        ImportSeq {
            text,
            extractor: lang.and_then(|l| self.get(l)),
        }
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(ecmascript::extractor()));
        registry.register(Arc::new(ecmascript::typescript_extractor()));
        registry.register(Arc::new(python::extractor()));
        registry.register(Arc::new(rust::extractor()));
        registry.register(Arc::new(go::extractor()));
        registry.register(Arc::new(jvm::extractor()));
        registry.register(Arc::new(c_family::extractor()));
        registry.register(Arc::new(scripting::ruby_extractor()));
        registry.register(Arc::new(scripting::php_extractor()));
        registry
    }
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut langs: Vec<_> = self.by_lang.keys().collect();
        langs.sort();
        f.debug_struct("ExtractorRegistry").field("langs", &langs).finish()
    }
}

static DEFAULT_REGISTRY: LazyLock<ExtractorRegistry> = LazyLock::new(ExtractorRegistry::default);

/// The built-in registry.
#[must_use]
pub fn registry() -> &'static ExtractorRegistry {
    &DEFAULT_REGISTRY
}

/// Extracts imports with the built-in registry.
#[must_use]
pub fn parse(text: &str, lang: Option<Lang>) -> ImportSeq<'_> {
    DEFAULT_REGISTRY.parse(text, lang)
}

/// A restartable, lazily evaluated import sequence.
#[derive(Clone, Copy)]
pub struct ImportSeq<'a> {
    text: &'a str,
    extractor: Option<&'a dyn LanguageExtractor>,
}

impl<'a> ImportSeq<'a> {
    #[must_use]
    pub fn iter(&self) -> Imports<'a> {
        let streams = self
            .extractor
            .map(|ex| {
                ex.patterns()
                    .iter()
                    .map(|re| re.captures_iter(self.text).peekable())
                    .collect()
            })
            .unwrap_or_default();
        Imports {
            streams,
            seen: HashSet::new(),
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.iter().count()
    }
}

impl<'a> IntoIterator for &ImportSeq<'a> {
    type Item = ImportRecord;
    type IntoIter = Imports<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Merges every rule's matches into document order, dropping repeated
/// `(offset, path)` pairs produced by overlapping rules.
pub struct Imports<'a> {
    streams: Vec<Peekable<CaptureMatches<'a, 'a>>>,
    seen: HashSet<(usize, String)>,
}

impl Iterator for Imports<'_> {
    type Item = ImportRecord;

    fn next(&mut self) -> Option<ImportRecord> {
        loop {
            let idx = self.earliest_stream()?;
            let caps = self.streams.get_mut(idx)?.next()?;
            let Some(m) = caps.name("path") else {
                continue;
            };
            let record = ImportRecord {
                path: m.as_str().to_string(),
                index: m.start(),
                length: m.len(),
            };
            if self.seen.insert((record.index, record.path.clone())) {
                return Some(record);
            }
        }
    }
}

impl Imports<'_> {
    fn earliest_stream(&mut self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (i, stream) in self.streams.iter_mut().enumerate() {
            let Some(caps) = stream.peek() else { continue };
            let offset = caps.name("path").map_or(0, |m| m.start());
            if best.map_or(true, |(_, b)| offset < b) {
                best = Some((i, offset));
            }
        }
        best.map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(text: &str, lang: Lang) -> Vec<String> {
        parse(text, Some(lang)).iter().map(|r| r.path).collect()
    }

    #[test]
    fn test_ts_imports_in_document_order() {
        let code = r#"
            import { Foo } from "./components";
            const fs = require('fs');
            export * from "./utils";
            import "./side-effect.css";
            const lazy = await import('./lazy');
        "#;
        assert_eq!(
            paths(code, Lang::TypeScript),
            vec!["./components", "fs", "./utils", "./side-effect.css", "./lazy"]
        );
    }

    #[test]
    fn test_offsets_point_at_path() {
        let code = "import a from './a';";
        let records: Vec<_> = parse(code, Some(Lang::JavaScript)).iter().collect();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(&code[r.index..r.index + r.length], "./a");
    }

    #[test]
    fn test_overlapping_rules_are_deduplicated() {
        let code = "import fs = require('fs');";
        let found = paths(code, Lang::TypeScript);
        assert_eq!(found, vec!["fs"]);
    }

    #[test]
    fn test_multiline_named_import() {
        let code = "import {\n  a,\n  b,\n} from '../shared/x';\n";
        assert_eq!(paths(code, Lang::TypeScript), vec!["../shared/x"]);
    }

    #[test]
    fn test_export_statement_does_not_swallow_later_text() {
        let code = "export const greeting = 'hi'\nconst label = pick(items, x => x.name)\nlog(`read from 'cache'`)\nexport { a } from './a'\n";
        assert_eq!(paths(code, Lang::JavaScript), vec!["./a"]);

        let code = "export default App\nimport b from './b'\n";
        let found = parse(code, Some(Lang::TypeScript)).iter().collect::<Vec<_>>();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, code.find("./b").unwrap_or_default());
    }

    #[test]
    fn test_sequence_is_restartable() {
        let seq = parse("import a from './a';\nimport b from './b';", Some(Lang::JavaScript));
        let first: Vec<_> = seq.iter().collect();
        let second: Vec<_> = seq.iter().collect();
        assert_eq!(first, second);
        assert_eq!(seq.count(), 2);
    }

    #[test]
    fn test_unsupported_language_is_empty() {
        assert_eq!(parse("import x from './x'", None).count(), 0);
        assert_eq!(ExtractorRegistry::empty().parse("import x", Some(Lang::Python)).count(), 0);
    }

    #[test]
    fn test_python_imports() {
        let code = "import os\nfrom sys import path\nimport numpy as np\nfrom .models import User\nfrom .. import base\n";
        assert_eq!(paths(code, Lang::Python), vec!["os", "sys", "numpy", ".models", ".."]);
    }

    #[test]
    fn test_rust_imports() {
        let code = "use std::io;\npub use crate::config::Config;\nuse crate::{a, b};\nmod tests;\n";
        assert_eq!(
            paths(code, Lang::Rust),
            vec!["std::io", "crate::config::Config", "crate", "tests"]
        );
    }

    #[test]
    fn test_go_imports() {
        let code = "package main\n\nimport \"fmt\"\nimport (\n\t\"os\"\n\tlog \"github.com/x/log\"\n)\n";
        assert_eq!(paths(code, Lang::Go), vec!["fmt", "os", "github.com/x/log"]);
    }

    #[test]
    fn test_other_families() {
        assert_eq!(
            paths("import java.util.List;\nimport static org.junit.Assert.*;", Lang::Java),
            vec!["java.util.List", "org.junit.Assert.*"]
        );
        assert_eq!(
            paths("#include <stdio.h>\n#include \"util/log.h\"\n", Lang::C),
            vec!["stdio.h", "util/log.h"]
        );
        assert_eq!(
            paths("require 'json'\nrequire_relative './helper'\n", Lang::Ruby),
            vec!["json", "./helper"]
        );
        assert_eq!(
            paths("<?php\nrequire_once './db.php';\nuse App\\Models\\User;\n", Lang::Php),
            vec!["./db.php", "App\\Models\\User"]
        );
    }

    #[test]
    fn test_custom_extractor_registration() {
        let mut registry = ExtractorRegistry::empty();
        registry.register(Arc::new(PatternExtractor::from_table(
            &[Lang::Go],
            &[r#"load\("(?P<path>[^"]+)"\)"#],
        )));
        let found: Vec<_> = registry
            .parse("load(\"a\")\nimport \"fmt\"", Some(Lang::Go))
            .iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(found, vec!["a"]);
    }
}
