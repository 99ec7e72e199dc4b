//! Input validation.
//!
//! Todo text is validated here before it can reach the patch store.
//! Status names from the command line resolve in three tiers:
//! exact match → synonym lookup → error with suggestion.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::error::{Error, Result};
use crate::model::StatusFilter;

const VALID_STATUSES: [&str; 3] = ["all", "completed", "pending"];

pub static STATUS_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("any", "all"),
        ("everything", "all"),
        ("done", "completed"),
        ("complete", "completed"),
        ("finished", "completed"),
        ("closed", "completed"),
        ("open", "pending"),
        ("todo", "pending"),
        ("active", "pending"),
        ("incomplete", "pending"),
        ("remaining", "pending"),
    ]
    .into_iter()
    .collect()
});

/// Trim todo text, rejecting empty or whitespace-only input.
///
/// # Errors
///
/// Returns `Error::Validation` if nothing is left after trimming.
pub fn normalize_text(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("todo text cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

/// Resolve a status name from user input.
///
/// # Errors
///
/// Returns `Error::InvalidArgument` naming the closest valid status
/// when the input matches neither a status nor a synonym.
pub fn normalize_status(input: &str) -> Result<StatusFilter> {
    let lower = input.trim().to_lowercase();

    if VALID_STATUSES.contains(&lower.as_str()) {
        return lower.parse();
    }

    if let Some(&canonical) = STATUS_SYNONYMS.get(lower.as_str()) {
        return canonical.parse();
    }

    let message = match find_closest_status(&lower) {
        Some(suggestion) => format!("unknown status '{input}' (did you mean '{suggestion}'?)"),
        None => format!("unknown status '{input}'"),
    };
    Err(Error::InvalidArgument(message))
}

/// Find the closest status across valid names and synonyms.
fn find_closest_status(input: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, usize)> = None;

    for &candidate in VALID_STATUSES.iter().chain(STATUS_SYNONYMS.keys()) {
        let dist = levenshtein_distance(input, candidate);
        if dist <= 3 && best.is_none_or(|(_, d)| dist < d) {
            let canonical = STATUS_SYNONYMS.get(candidate).copied().unwrap_or(candidate);
            best = Some((canonical, dist));
        }
    }

    best.map(|(status, _)| status)
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

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1)
                .min(curr[j - 1] + 1)
                .min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
