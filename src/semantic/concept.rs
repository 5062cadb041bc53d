// src/semantic/concept.rs
use serde::Serialize;
use std::fmt;
use std::path::{Component, Path};

/// Architectural role guessed from a file's location and name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Concept {
    Presentation,
    Business,
    Data,
    Utility,
    Unknown,
}

/// Checked in this order; the first concept with a hit wins.
const KNOWN: [Concept; 4] = [
    Concept::Presentation,
    Concept::Business,
    Concept::Data,
    Concept::Utility,
];

/// Only the innermost segments describe the file's role.
const SEGMENTS: usize = 3;

impl Concept {
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Presentation => &[
                "component", "view", "page", "screen", "widget", "layout", "controller",
            ],
            Self::Business => &["service", "usecase", "domain", "business", "logic", "manager"],
            Self::Data => &[
                "repository", "repo", "dao", "database", "db", "model", "entity", "schema",
                "store", "migration",
            ],
            Self::Utility => &["util", "helper", "common", "shared", "lib"],
            Self::Unknown => &[],
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Presentation => "Presentation",
            Self::Business => "Business",
            Self::Data => "Data",
            Self::Utility => "Utility",
            Self::Unknown => "Unknown",
        }
    }

    /// True if `segment` (already lowercased) contains one of the keywords.
    #[must_use]
    pub fn mentioned_in(self, segment: &str) -> bool {
        self.keywords().iter().any(|k| segment.contains(k))
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercased trailing path segments, outermost first.
fn tail_segments(path: &Path) -> Vec<String> {
    let segments: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().to_lowercase()),
            _ => None,
        })
        .collect();
    let skip = segments.len().saturating_sub(SEGMENTS);
    segments.into_iter().skip(skip).collect()
}

/// Classifies `path` by keyword hits in its last three segments.
#[must_use]
pub fn classify(path: &Path) -> Concept {
    let segments = tail_segments(path);
    KNOWN
        .into_iter()
        .find(|concept| segments.iter().any(|s| concept.mentioned_in(s)))
        .unwrap_or(Concept::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_directory_and_name() {
        assert_eq!(classify(Path::new("src/pages/UserPage.js")), Concept::Presentation);
        assert_eq!(classify(Path::new("src/repository/UserRepo.js")), Concept::Data);
        assert_eq!(classify(Path::new("src/services/billing.ts")), Concept::Business);
        assert_eq!(classify(Path::new("src/utils/format.ts")), Concept::Utility);
        assert_eq!(classify(Path::new("src/main.ts")), Concept::Unknown);
    }

    #[test]
    fn test_only_last_three_segments_count() {
        // `components` is the fourth segment from the end.
        let p = Path::new("/repo/components/a/b/main.ts");
        assert_eq!(classify(p), Concept::Unknown);
    }

    #[test]
    fn test_earlier_concept_wins() {
        assert_eq!(classify(Path::new("src/services/UserView.ts")), Concept::Presentation);
    }
}
