// src/rules/mod.rs
//! Explicit import rules and layer ordering.
//!
//! Rules are checked before layers and the first hit wins, so one import
//! never carries more than one rule or layer violation.

pub mod encapsulation;

pub use encapsulation::{check_encapsulation, encapsulation_violation, INDEX_EXTENSIONS};

use globset::{Glob, GlobBuilder, GlobMatcher, GlobSet, GlobSetBuilder};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::config::{Layer, Rule};
use crate::error::DepwardenError;
use crate::graph::paths;
use crate::types::{Violation, ViolationKind};

/// A pattern that failed to compile. The rule or layer it belongs to is
/// skipped; everything else stays active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigIssue {
    /// Where the pattern came from, e.g. `rules[2].disallow[0]`.
    pub origin: String,
    pub pattern: String,
    pub message: String,
}

struct CompiledRule {
    source: GlobMatcher,
    disallow: GlobSet,
    message: String,
}

#[derive(Debug, Clone)]
pub struct CompiledLayer {
    pub name: String,
    pub ordinal: usize,
    matcher: GlobMatcher,
}

/// Compiled rules and layers, optionally anchored at a project root so
/// root-relative patterns like `src/domain/**` also match absolute paths.
pub struct RuleSet {
    rules: Vec<CompiledRule>,
    layers: Vec<CompiledLayer>,
    issues: Vec<ConfigIssue>,
    root: Option<PathBuf>,
}

fn glob(pattern: &str) -> Result<Glob, DepwardenError> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|source| DepwardenError::Glob {
            pattern: pattern.to_string(),
            source,
        })
}

/// On failure, names the offending entry, or `None` when the patterns were
/// individually valid but the combined set could not be built.
fn compile_globset(globs: &[String]) -> Result<GlobSet, (Option<usize>, DepwardenError)> {
    let mut builder = GlobSetBuilder::new();
    for (i, g) in globs.iter().enumerate() {
        builder.add(glob(g).map_err(|e| (Some(i), e))?);
    }
    builder.build().map_err(|source| {
        (
            None,
            DepwardenError::Glob {
                pattern: globs.join(", "),
                source,
            },
        )
    })
}

/// Origin label and pattern text for a failed `disallow` list.
fn disallow_issue(rule: usize, globs: &[String], failed: Option<usize>) -> (String, String) {
    match failed.and_then(|j| globs.get(j).map(|g| (j, g))) {
        Some((j, g)) => (format!("rules[{rule}].disallow[{j}]"), g.clone()),
        None => (format!("rules[{rule}].disallow"), globs.join(", ")),
    }
}

impl RuleSet {
    /// Compiles every rule and layer independently. Bad patterns are logged
    /// once here and kept in [`RuleSet::issues`].
    #[must_use]
    pub fn compile(rules: &[Rule], layers: &[Layer]) -> Self {
        let mut issues = Vec::new();
        let mut report = |origin: String, pattern: &str, err: &DepwardenError| {
            warn!(%origin, "{err}; entry disabled");
            issues.push(ConfigIssue {
                origin,
                pattern: pattern.to_string(),
                message: err.to_string(),
            });
        };

        let mut compiled_rules = Vec::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            let source = match glob(&rule.source) {
                Ok(g) => g.compile_matcher(),
                Err(e) => {
                    report(format!("rules[{i}].source"), &rule.source, &e);
                    continue;
                }
            };
            let disallow = match compile_globset(&rule.disallow) {
                Ok(set) => set,
                Err((failed, e)) => {
                    let (origin, pattern) = disallow_issue(i, &rule.disallow, failed);
                    report(origin, &pattern, &e);
                    continue;
                }
            };
            compiled_rules.push(CompiledRule {
                source,
                disallow,
                message: rule.message.clone(),
            });
        }

        let mut compiled_layers = Vec::with_capacity(layers.len());
        for (i, layer) in layers.iter().enumerate() {
            match glob(&layer.pattern) {
                Ok(g) => compiled_layers.push(CompiledLayer {
                    name: layer.name.clone(),
                    ordinal: layer.order.unwrap_or(i),
                    matcher: g.compile_matcher(),
                }),
                Err(e) => report(format!("layers[{i}].pattern"), &layer.pattern, &e),
            }
        }

        Self {
            rules: compiled_rules,
            layers: compiled_layers,
            issues,
            root: None,
        }
    }

    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn issues(&self) -> &[ConfigIssue] {
        &self.issues
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.layers.is_empty()
    }

    /// Spellings of `path` that patterns are matched against.
    fn candidates(&self, path: &Path) -> Vec<String> {
        let cleaned = paths::clean(path);
        let mut out = vec![paths::slashed(&cleaned)];
        if let Some(rel) = self.root.as_deref().and_then(|r| cleaned.strip_prefix(r).ok()) {
            out.push(paths::slashed(rel));
        }
        out
    }

    /// First layer, in list order, whose pattern matches `path`.
    #[must_use]
    pub fn layer_of(&self, path: &Path) -> Option<&CompiledLayer> {
        let candidates = self.candidates(path);
        self.layers
            .iter()
            .find(|layer| candidates.iter().any(|c| layer.matcher.is_match(c)))
    }

    /// Checks one import. Pass `check_rules`/`check_layers` as false to
    /// skip either half.
    #[must_use]
    pub fn validate_with(
        &self,
        source: &Path,
        target: &Path,
        check_rules: bool,
        check_layers: bool,
    ) -> Option<Violation> {
        if check_rules {
            if let Some(v) = self.check_rules(source, target) {
                return Some(v);
            }
        }
        if check_layers {
            return self.check_layers(source, target);
        }
        None
    }

    #[must_use]
    pub fn validate(&self, source: &Path, target: &Path) -> Option<Violation> {
        self.validate_with(source, target, true, true)
    }

    fn check_rules(&self, source: &Path, target: &Path) -> Option<Violation> {
        let from = self.candidates(source);
        let to = self.candidates(target);
        let rule = self.rules.iter().find(|rule| {
            from.iter().any(|c| rule.source.is_match(c)) && to.iter().any(|c| rule.disallow.is_match(c))
        })?;

        let message = if rule.message.is_empty() {
            format!(
                "Import of '{}' is not allowed from '{}'",
                paths::slashed(target),
                paths::slashed(source)
            )
        } else {
            rule.message.clone()
        };
        Some(
            Violation::new(ViolationKind::RuleBreach, source, message)
                .with_target(target)
                .with_suggestion("Route this dependency through an allowed module"),
        )
    }

    fn check_layers(&self, source: &Path, target: &Path) -> Option<Violation> {
        let from = self.layer_of(source)?;
        let to = self.layer_of(target)?;
        if from.ordinal >= to.ordinal {
            return None;
        }
        Some(
            Violation::new(
                ViolationKind::LayerBreach,
                source,
                format!(
                    "Layer '{}' ({}) must not depend on outer layer '{}' ({})",
                    from.name, from.ordinal, to.name, to.ordinal
                ),
            )
            .with_target(target)
            .with_suggestion(format!(
                "Define an abstraction in '{}' and implement it in '{}'",
                from.name, to.name
            )),
        )
    }
}

/// One-shot convenience: compiles `rules` and `layers` and checks a single
/// import.
#[must_use]
pub fn validate_rules_and_layers(
    source: &Path,
    target: &Path,
    rules: &[Rule],
    layers: &[Layer],
) -> Option<Violation> {
    RuleSet::compile(rules, layers).validate(source, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer(name: &str, pattern: &str) -> Layer {
        Layer {
            name: name.into(),
            pattern: pattern.into(),
            order: None,
        }
    }

    fn onion() -> Vec<Layer> {
        vec![
            layer("Domain", "**/domain/**"),
            layer("Application", "**/application/**"),
            layer("Infrastructure", "**/infrastructure/**"),
            layer("Presentation", "**/presentation/**"),
        ]
    }

    fn pages_rule() -> Rule {
        Rule {
            source: "**/pages/**".into(),
            disallow: vec!["**/database/**".into()],
            message: "Pages must not touch the database".into(),
        }
    }

    #[test]
    fn test_inner_layer_may_not_depend_on_outer() {
        let set = RuleSet::compile(&[], &onion());
        let domain = Path::new("/p/src/domain/user.ts");
        let ui = Path::new("/p/src/presentation/user_view.ts");

        let v = set.validate(domain, ui);
        assert_eq!(v.as_ref().map(|v| v.kind), Some(ViolationKind::LayerBreach));
        assert!(set.validate(ui, domain).is_none());
    }

    #[test]
    fn test_same_layer_and_unlayered_files_are_exempt() {
        let set = RuleSet::compile(&[], &onion());
        let a = Path::new("/p/src/domain/a.ts");
        let b = Path::new("/p/src/domain/b.ts");
        let free = Path::new("/p/src/misc/helpers.ts");
        assert!(set.validate(a, b).is_none());
        assert!(set.validate(a, free).is_none());
        assert!(set.validate(free, Path::new("/p/src/presentation/x.ts")).is_none());
    }

    #[test]
    fn test_rule_fires_only_for_matching_paths() {
        let set = RuleSet::compile(&[pages_rule()], &[]);
        let page = Path::new("/p/src/pages/Home.tsx");
        let db = Path::new("/p/src/database/client.ts");

        let v = set.validate(page, db);
        assert_eq!(v.map(|v| v.message), Some("Pages must not touch the database".to_string()));
        assert!(set.validate(Path::new("/p/src/services/a.ts"), db).is_none());
        assert!(set.validate(page, Path::new("/p/src/services/a.ts")).is_none());
    }

    #[test]
    fn test_rule_wins_over_layer() {
        let layers = vec![layer("Pages", "**/pages/**"), layer("Data", "**/database/**")];
        let set = RuleSet::compile(&[pages_rule()], &layers);
        let v = set.validate(Path::new("/p/pages/a.ts"), Path::new("/p/database/b.ts"));
        assert_eq!(v.map(|v| v.kind), Some(ViolationKind::RuleBreach));

        let v = set.validate_with(Path::new("/p/pages/a.ts"), Path::new("/p/database/b.ts"), false, true);
        assert_eq!(v.map(|v| v.kind), Some(ViolationKind::LayerBreach));
    }

    #[test]
    fn test_first_matching_layer_and_explicit_order() {
        let layers = vec![
            Layer {
                name: "Core".into(),
                pattern: "**/core/**".into(),
                order: Some(5),
            },
            layer("Everything", "**"),
        ];
        let set = RuleSet::compile(&[], &layers);
        let core = set.layer_of(Path::new("/p/core/x.ts")).map(|l| (l.name.as_str(), l.ordinal));
        assert_eq!(core, Some(("Core", 5)));
        let other = set.layer_of(Path::new("/p/app/x.ts")).map(|l| l.ordinal);
        assert_eq!(other, Some(1));
    }

    #[test]
    fn test_root_relative_patterns() {
        let layers = vec![layer("Domain", "src/domain/**"), layer("Web", "src/web/**")];
        let set = RuleSet::compile(&[], &layers).with_root("/p");
        assert!(set
            .validate(Path::new("/p/src/domain/a.ts"), Path::new("/p/src/web/b.ts"))
            .is_some());
    }

    #[test]
    fn test_bad_glob_is_isolated() {
        let rules = vec![
            Rule {
                source: "**/[oops".into(),
                disallow: vec!["**".into()],
                message: String::new(),
            },
            pages_rule(),
        ];
        let set = RuleSet::compile(&rules, &onion());
        assert_eq!(set.issues().len(), 1);
        assert_eq!(set.issues()[0].origin, "rules[0].source");
        assert!(set
            .validate(Path::new("/p/pages/a.ts"), Path::new("/p/database/b.ts"))
            .is_some());
    }

    #[test]
    fn test_bad_disallow_entry_is_named() {
        let rules = vec![Rule {
            source: "**/pages/**".into(),
            disallow: vec!["**/database/**".into(), "**/[oops".into()],
            message: String::new(),
        }];
        let set = RuleSet::compile(&rules, &[]);
        assert_eq!(set.issues()[0].origin, "rules[0].disallow[1]");
        assert_eq!(set.issues()[0].pattern, "**/[oops");
    }

    #[test]
    fn test_set_level_failure_names_the_whole_list() {
        let globs: Vec<String> = vec!["**/a/**".into(), "**/b/**".into()];
        assert_eq!(
            disallow_issue(3, &globs, None),
            ("rules[3].disallow".to_string(), "**/a/**, **/b/**".to_string())
        );
        assert_eq!(
            disallow_issue(3, &globs, Some(1)),
            ("rules[3].disallow[1]".to_string(), "**/b/**".to_string())
        );
    }

    #[test]
    fn test_default_rule_message() {
        let mut rule = pages_rule();
        rule.message.clear();
        let v = validate_rules_and_layers(
            Path::new("/p/pages/a.ts"),
            Path::new("/p/database/b.ts"),
            &[rule],
            &[],
        );
        assert!(v.is_some_and(|v| v.message.contains("/p/database/b.ts")));
    }
}
