// src/stats/vector.rs
//! Term-frequency vectors and cosine similarity.

use std::collections::HashMap;

/// Tokens shorter than this are ignored.
pub const MIN_TOKEN_LEN: usize = 3;

/// Keywords common to the supported languages. They say nothing about what
/// a file does, only what it is written in.
const STOP_WORDS: &[&str] = &[
    "abstract", "and", "any", "as", "async", "await", "boolean", "break", "case", "catch",
    "class", "const", "constructor", "continue", "def", "default", "del", "delete", "do", "elif",
    "else", "enum", "except", "export", "extends", "false", "final", "finally", "fn", "for",
    "from", "func", "function", "get", "global", "if", "impl", "implements", "import", "in",
    "instanceof", "interface", "lambda", "let", "match", "mod", "module", "mut", "new", "none",
    "not", "null", "number", "object", "or", "package", "pass", "private", "protected", "pub",
    "public", "raise", "readonly", "require", "return", "self", "set", "static", "string",
    "struct", "super", "switch", "this", "throw", "trait", "true", "try", "type", "typeof",
    "undefined", "use", "var", "void", "where", "while", "with", "yield",
];

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.binary_search(&token).is_ok()
}

/// Splits on anything that cannot appear in an identifier, lowercases, and
/// drops short tokens and keywords.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_lowercase)
        .filter(|t| !is_stop_word(t))
}

/// Token counts for one file, with the squared norm precomputed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    terms: HashMap<String, u32>,
    norm_sq: f64,
}

impl TermVector {
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut terms: HashMap<String, u32> = HashMap::new();
        for token in tokenize(text) {
            *terms.entry(token).or_insert(0) += 1;
        }
        Self::from_terms(terms)
    }

    #[must_use]
    pub fn from_terms(terms: HashMap<String, u32>) -> Self {
        let norm_sq = terms.values().map(|&n| f64::from(n) * f64::from(n)).sum();
        Self { terms, norm_sq }
    }

    #[must_use]
    pub fn get(&self, term: &str) -> u32 {
        self.terms.get(term).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Dot product over the product of norms; 0 if either side is empty.
#[must_use]
pub fn cosine(a: &TermVector, b: &TermVector) -> f64 {
    if a.norm_sq == 0.0 || b.norm_sq == 0.0 {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .terms
        .iter()
        .map(|(term, &n)| f64::from(n) * f64::from(large.get(term)))
        .sum();
    if dot == 0.0 {
        return 0.0;
    }
    // One sqrt over the product keeps identical vectors at exactly 1.
    (dot / (a.norm_sq * b.norm_sq).sqrt()).min(1.0)
}
