//! Input validation.
//!
//! The only hard rule on a problem tree is a non-blank title. Difficulty
//! input from the command line is normalised with a small synonym table:
//! exact match → synonym lookup → error with suggestion.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::{Difficulty, Problem};

pub static DIFFICULTY_SYNONYMS: LazyLock<HashMap<&str, Difficulty>> = LazyLock::new(|| {
    [
        ("e", Difficulty::Easy),
        ("simple", Difficulty::Easy),
        ("beginner", Difficulty::Easy),
        ("m", Difficulty::Medium),
        ("med", Difficulty::Medium),
        ("normal", Difficulty::Medium),
        ("intermediate", Difficulty::Medium),
        ("h", Difficulty::Hard),
        ("difficult", Difficulty::Hard),
        ("advanced", Difficulty::Hard),
        ("none", Difficulty::Unset),
        ("unset", Difficulty::Unset),
        ("-", Difficulty::Unset),
    ]
    .into_iter()
    .collect()
});

/// Reject a problem tree that may not be written.
///
/// # Errors
///
/// Returns [`Error::RequiredField`] when the title is blank.
pub fn validate_problem(problem: &Problem) -> Result<()> {
    if problem.title.trim().is_empty() {
        return Err(Error::RequiredField { field: "title" });
    }
    Ok(())
}

/// Normalize user-typed difficulty.
///
/// # Errors
///
/// Returns [`Error::InvalidDifficulty`] with the closest known value, if any.
pub fn normalize_difficulty(input: &str) -> Result<Difficulty> {
    // Tier 1: canonical names
    if let Some(d) = Difficulty::parse(input) {
        return Ok(d);
    }

    let lower = input.trim().to_lowercase();

    // Tier 2: synonym lookup
    if let Some(&d) = DIFFICULTY_SYNONYMS.get(lower.as_str()) {
        return Ok(d);
    }

    // Tier 3: closest suggestion
    Err(Error::InvalidDifficulty {
        value: input.to_string(),
        suggestion: find_closest_difficulty(&lower),
    })
}

fn find_closest_difficulty(input: &str) -> Option<String> {
    let canonical = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
        .into_iter()
        .map(|d| (d.as_str().to_lowercase(), d));
    let synonyms = DIFFICULTY_SYNONYMS
        .iter()
        .filter(|(k, _)| k.len() > 2)
        .map(|(k, d)| ((*k).to_string(), *d));

    canonical
        .chain(synonyms)
        .map(|(word, d)| (levenshtein_distance(input, &word), d))
        .filter(|(dist, _)| *dist <= 3)
        .min_by_key(|(dist, d)| (*dist, *d))
        .map(|(_, d)| d.label().to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // Single-row optimization
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
