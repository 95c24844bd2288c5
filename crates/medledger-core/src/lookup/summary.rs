//! Statistics and the recent-entries view.

use crate::codec;
use crate::models::{RecentEntry, Statistics};

/// Number of entries shown in the recent view.
pub const RECENT_LIMIT: usize = 5;

/// Composition length, in characters, before the preview is cut.
pub const PREVIEW_CHARS: usize = 50;

/// Count medicines and present generic slots across raw rows.
pub fn statistics<S: AsRef<str>>(rows: &[Vec<S>]) -> Statistics {
    let total_generics = rows
        .iter()
        .map(|row| codec::count_present_generics(row))
        .sum();
    Statistics::from_totals(rows.len(), total_generics)
}

/// The last [`RECENT_LIMIT`] rows, newest first.
pub fn recent_entries<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<RecentEntry> {
    rows.iter()
        .rev()
        .take(RECENT_LIMIT)
        .map(|row| {
            let cell = |idx: usize| row.get(idx).map(|c| c.as_ref()).unwrap_or("");
            RecentEntry {
                name: cell(0).to_string(),
                composition_preview: preview(cell(1)),
            }
        })
        .collect()
}

/// Cut `text` to [`PREVIEW_CHARS`] characters, marking the cut with `...`.
pub fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, generics: &[&str]) -> Vec<String> {
        let mut row = vec![name.to_string(), "comp".to_string(), "t".to_string()];
        for g in generics {
            row.extend([g.to_string(), String::new(), String::new(), String::new()]);
        }
        row
    }

    #[test]
    fn test_statistics_empty() {
        let rows: Vec<Vec<String>> = Vec::new();
        let stats = statistics(&rows);
        assert_eq!(stats, Statistics::from_totals(0, 0));
        assert_eq!(stats.average_generics, 0.0);
    }

    #[test]
    fn test_statistics_ignores_blank_slots() {
        let rows = vec![
            row("A", &["G1", "  ", "G3"]),
            row("B", &[]),
            row("C", &["G1"]),
        ];
        let stats = statistics(&rows);
        assert_eq!(stats.total_medicines, 3);
        assert_eq!(stats.total_generics, 3);
        assert_eq!(stats.average_generics, 1.0);
    }

    #[test]
    fn test_recent_newest_first_and_limited() {
        let rows: Vec<_> = (1..=7).map(|i| row(&format!("M{}", i), &[])).collect();
        let recent = recent_entries(&rows);
        let names: Vec<_> = recent.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["M7", "M6", "M5", "M4", "M3"]);
    }

    #[test]
    fn test_recent_empty() {
        let rows: Vec<Vec<String>> = Vec::new();
        assert!(recent_entries(&rows).is_empty());
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview("Paracetamol"), "Paracetamol");

        let exact = "x".repeat(PREVIEW_CHARS);
        assert_eq!(preview(&exact), exact);

        let long = "é".repeat(PREVIEW_CHARS + 1);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
    }
}
