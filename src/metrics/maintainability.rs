// src/metrics/maintainability.rs
//! Approximate maintainability index from token-level Halstead counts.
//!
//! MI = 171 − 5.2·ln(N + 1) − 0.23·C − 16.2·ln(LOC + 1), clamped to 0..=100,
//! where N is operators plus operands and C counts decision points.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Line count above which splitting the file is suggested.
pub const MAX_LOC: usize = 300;

/// Decision-point count above which simplifying control flow is suggested.
pub const MAX_COMPLEXITY: usize = 20;

static OPERATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+*/%=<>!&|^~?:.,;]+|\(").unwrap_or_else(|e| panic!("invalid operator regex: {e}"))
});

static OPERAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[A-Za-z_$][A-Za-z0-9_$]*|\d+(?:\.\d+)?|"(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'"#)
        .unwrap_or_else(|e| panic!("invalid operand regex: {e}"))
});

static DECISION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:if|elif|for|while|case|catch|except|and|or)\b|&&|\|\|")
        .unwrap_or_else(|e| panic!("invalid decision regex: {e}"))
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub fn of(index: f64) -> Self {
        if index >= 80.0 {
            Self::A
        } else if index >= 60.0 {
            Self::B
        } else if index >= 40.0 {
            Self::C
        } else if index >= 20.0 {
            Self::D
        } else {
            Self::F
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    #[must_use]
    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            Self::A => &["Highly maintainable; keep functions small as it grows"],
            Self::B => &[
                "Extract long functions into smaller helpers",
                "Document the non-obvious parts",
            ],
            Self::C => &[
                "Split the file into focused modules",
                "Reduce nesting and branching",
                "Add tests before refactoring",
            ],
            Self::D => &[
                "Refactor soon: this file is hard to change safely",
                "Separate unrelated responsibilities",
                "Replace nested conditionals with early returns or lookup tables",
            ],
            Self::F => &[
                "Decompose this file; it is very hard to maintain",
                "Pin current behaviour with tests first",
                "Schedule it at the top of the refactoring backlog",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Maintainability {
    pub index: f64,
    pub grade: Grade,
    pub lines_of_code: usize,
    pub operators: usize,
    pub operands: usize,
    pub complexity: usize,
    pub suggestions: Vec<String>,
}

/// Non-blank lines.
fn lines_of_code(text: &str) -> usize {
    text.lines().filter(|l| !l.trim().is_empty()).count()
}

#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn maintainability_index(volume: usize, complexity: usize, loc: usize) -> f64 {
    let mi = 171.0
        - 5.2 * ((volume + 1) as f64).ln()
        - 0.23 * complexity as f64
        - 16.2 * ((loc + 1) as f64).ln();
    mi.clamp(0.0, 100.0)
}

#[must_use]
pub fn analyze_text(text: &str) -> Maintainability {
    let operators = OPERATOR_RE.find_iter(text).count();
    let operands = OPERAND_RE.find_iter(text).count();
    let complexity = DECISION_RE.find_iter(text).count();
    let loc = lines_of_code(text);

    let index = maintainability_index(operators + operands, complexity, loc);
    let grade = Grade::of(index);
    let mut suggestions: Vec<String> = grade.suggestions().iter().map(|s| (*s).to_string()).collect();
    if loc > MAX_LOC {
        suggestions.push(format!("{loc} lines of code; aim for under {MAX_LOC} per file"));
    }
    if complexity > MAX_COMPLEXITY {
        suggestions.push(format!(
            "{complexity} decision points; simplify control flow (target {MAX_COMPLEXITY} or fewer)"
        ));
    }

    Maintainability {
        index,
        grade,
        lines_of_code: loc,
        operators,
        operands,
        complexity,
        suggestions,
    }
}
