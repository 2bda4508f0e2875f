//! # Diagnostic Utilities
//!
//! Helpers for friendlier grammar error reports:
//! - "Did you mean?" suggestions for misspelled rule and token names
//! - The offending source line with a caret under the reported column

use crate::error::GrammarError;
use std::fmt::Write;

/// Suggest the closest candidate to `actual`, if any is similar enough.
///
/// # Example
///
/// ```rust,no_run
/// use pgen::error::diagnostics::did_you_mean;
///
/// let rules = vec!["expr".to_string(), "term".to_string()];
/// assert_eq!(did_you_mean("exrp", &rules), Some("expr".to_string()));
/// ```
pub fn did_you_mean(actual: &str, candidates: &[String]) -> Option<String> {
    let actual_lower = actual.to_lowercase();
    let mut best_match: Option<(&String, f64)> = None;
    let threshold = 0.5;

    for candidate in candidates {
        let similarity = string_similarity(&actual_lower, &candidate.to_lowercase());
        if similarity < threshold {
            continue;
        }
        match best_match {
            Some((_, best_sim)) if similarity <= best_sim => {}
            _ => best_match = Some((candidate, similarity)),
        }
    }

    best_match.map(|(suggestion, _)| suggestion.clone())
}

/// Render a grammar error followed by the source line it points at.
///
/// Errors without a position render as their message alone.
pub fn format_error_with_context(error: &GrammarError, source: &str) -> String {
    let mut result = String::new();
    let _ = write!(result, "error: {error}");

    if let Some(position) = error.position()
        && let Some(line) = source
            .lines()
            .nth((position.line as usize).saturating_sub(1))
    {
        let gutter = position.line.to_string();
        let pad = " ".repeat(gutter.len());
        let _ = write!(result, "\n{pad} |\n{gutter} | {line}\n{pad} | ");
        let column = (position.column as usize).min(line.len());
        result.push_str(&" ".repeat(column));
        result.push('^');
    }

    if let GrammarError::UndefinedSymbol {
        suggestion: Some(suggestion),
        ..
    } = error
    {
        let _ = write!(result, "\nhelp: did you mean `{suggestion}`?");
    }

    result
}

/// Similarity between two strings from Levenshtein distance.
///
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub fn string_similarity(s1: &str, s2: &str) -> f64 {
    if s1 == s2 {
        return 1.0;
    }

    if s1.is_empty() || s2.is_empty() {
        return 0.0;
    }

    let distance = levenshtein_distance(s1, s2);
    let max_len = s1.chars().count().max(s2.chars().count());
    1.0 - (distance as f64 / max_len as f64)
}

fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();

    let mut previous: Vec<usize> = (0..=s2_chars.len()).collect();
    let mut current = vec![0; s2_chars.len() + 1];

    for (i, c1) in s1_chars.iter().enumerate() {
        current[0] = i + 1;
        for (j, c2) in s2_chars.iter().enumerate() {
            let cost = usize::from(c1 != c2);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_chars.len()]
}
