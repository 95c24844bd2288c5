//! Near-miss name suggestions for failed searches.

use strsim::jaro_winkler;

/// Maximum suggestions returned.
const MAX_SUGGESTIONS: usize = 3;

/// Minimum Jaro-Winkler similarity for a suggestion.
const MIN_SIMILARITY: f64 = 0.85;

/// Stored names similar to `query`, best first, without duplicates.
///
/// Comparison is case-insensitive. Exact matches are not expected here since
/// the caller already tried them.
pub fn suggest_names(query: &str, names: &[&str]) -> Vec<String> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f64, String, &str)> = names
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| {
            let folded = name.to_lowercase();
            (jaro_winkler(&needle, &folded), folded, *name)
        })
        .filter(|(score, _, _)| *score >= MIN_SIMILARITY)
        .collect();

    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let mut seen: Vec<String> = Vec::new();
    let mut suggestions: Vec<String> = Vec::new();
    for (_, folded, name) in scored {
        if seen.contains(&folded) {
            continue;
        }
        seen.push(folded);
        suggestions.push(name.to_string());
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}
