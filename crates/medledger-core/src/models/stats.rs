//! Summary statistics and list-view models.

use serde::{Deserialize, Serialize};

/// Aggregate counts over every stored medicine.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Statistics {
    pub total_medicines: usize,
    pub total_generics: usize,
    /// `total_generics / total_medicines` rounded to 2 decimals, 0 when empty
    pub average_generics: f64,
}

impl Statistics {
    /// Build statistics from raw totals.
    pub fn from_totals(total_medicines: usize, total_generics: usize) -> Self {
        let average_generics = if total_medicines == 0 {
            0.0
        } else {
            let raw = total_generics as f64 / total_medicines as f64;
            (raw * 100.0).round() / 100.0
        };
        Self {
            total_medicines,
            total_generics,
            average_generics,
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One line of the "recent medicines" view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecentEntry {
    pub name: String,
    /// Composition, cut to a short preview for list display
    pub composition_preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_totals() {
        let stats = Statistics::from_totals(0, 0);
        assert_eq!(stats.total_medicines, 0);
        assert_eq!(stats.total_generics, 0);
        assert_eq!(stats.average_generics, 0.0);
    }

    #[test]
    fn test_average_rounded_to_two_places() {
        let stats = Statistics::from_totals(3, 2);
        assert_eq!(stats.average_generics, 0.67);

        let stats = Statistics::from_totals(4, 10);
        assert_eq!(stats.average_generics, 2.5);
    }
}
