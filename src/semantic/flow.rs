// src/semantic/flow.rs
//! Allowed dependency directions between concepts.

use serde::Serialize;
use std::path::Path;

use super::concept::{classify, Concept};

/// Pairs that invert the architecture outright.
const SEVERE: &[(Concept, Concept)] = &[
    (Concept::Data, Concept::Presentation),
    (Concept::Utility, Concept::Presentation),
];

const SEVERE_SCORE: u8 = 95;
const BASE_SCORE: u8 = 70;
const NAME_BONUS: u8 = 5;
const MAX_SCORE: u8 = 100;

/// Concepts that `from` may depend on.
#[must_use]
pub fn allowed_targets(from: Concept) -> &'static [Concept] {
    match from {
        Concept::Presentation => &[
            Concept::Presentation,
            Concept::Business,
            Concept::Data,
            Concept::Utility,
        ],
        Concept::Business => &[Concept::Business, Concept::Data, Concept::Utility],
        Concept::Data => &[Concept::Data, Concept::Utility],
        Concept::Utility => &[Concept::Utility],
        Concept::Unknown => &[],
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticFinding {
    pub is_suspicious: bool,
    /// Advisory confidence, 0-100.
    pub score: u8,
    pub message: String,
    pub source_concept: Concept,
    pub target_concept: Concept,
}

fn file_name_mentions(path: &Path, concept: Concept) -> bool {
    path.file_name()
        .is_some_and(|n| concept.mentioned_in(&n.to_string_lossy().to_lowercase()))
}

/// Classifies both ends of `source -> target`. Returns `None` when the flow
/// is allowed or either side is unknown.
#[must_use]
pub fn analyze(source: &Path, target: &Path) -> Option<SemanticFinding> {
    let from = classify(source);
    let to = classify(target);
    if from == Concept::Unknown || to == Concept::Unknown {
        return None;
    }
    if allowed_targets(from).contains(&to) {
        return None;
    }

    let score = if SEVERE.contains(&(from, to)) {
        SEVERE_SCORE
    } else {
        let mut score = BASE_SCORE;
        if file_name_mentions(source, from) {
            score += NAME_BONUS;
        }
        if file_name_mentions(target, to) {
            score += NAME_BONUS;
        }
        score.min(MAX_SCORE)
    };

    Some(SemanticFinding {
        is_suspicious: true,
        score,
        message: format!("{from} code should not depend on {to} code"),
        source_concept: from,
        target_concept: to,
    })
}
