//! Medicine and generic-alternative models.

use serde::{Deserialize, Serialize};

/// Maximum number of generic alternatives recorded per medicine.
pub const MAX_GENERICS: usize = 5;

/// Format used for `date_added` timestamps.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text shown in place of an optional field that was left blank.
pub const NOT_SPECIFIED: &str = "Not specified";

/// A medicine with its generic alternatives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicineRecord {
    /// Lookup key, compared case-insensitively
    pub name: String,
    /// Free-text composition
    pub composition: String,
    /// Creation timestamp, formatted per [`DATE_FORMAT`]
    pub date_added: String,
    /// Generic alternatives in entry order (at most [`MAX_GENERICS`])
    pub generics: Vec<GenericEntry>,
}

/// One generic alternative. Blank optional fields mean "not specified".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GenericEntry {
    pub name: String,
    pub composition: String,
    pub price: String,
    pub side_effects: String,
}

impl MedicineRecord {
    /// Create a record with no generics.
    pub fn new(name: String, composition: String, date_added: String) -> Self {
        Self {
            name,
            composition,
            date_added,
            generics: Vec::new(),
        }
    }

    /// Generics whose name is non-blank, in entry order.
    pub fn present_generics(&self) -> impl Iterator<Item = &GenericEntry> {
        self.generics.iter().filter(|g| g.is_present())
    }

    /// Case-insensitive whole-name comparison.
    pub fn matches_name(&self, query: &str) -> bool {
        self.name.to_lowercase() == query.to_lowercase()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl GenericEntry {
    /// Create a generic entry from its four fields.
    pub fn new(
        name: impl Into<String>,
        composition: impl Into<String>,
        price: impl Into<String>,
        side_effects: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            composition: composition.into(),
            price: price.into(),
            side_effects: side_effects.into(),
        }
    }

    /// A slot is present iff its name is non-empty after trimming.
    pub fn is_present(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn composition_or_default(&self) -> &str {
        or_not_specified(&self.composition)
    }

    pub fn price_or_default(&self) -> &str {
        or_not_specified(&self.price)
    }

    pub fn side_effects_or_default(&self) -> &str {
        or_not_specified(&self.side_effects)
    }
}

fn or_not_specified(value: &str) -> &str {
    if value.is_empty() {
        NOT_SPECIFIED
    } else {
        value
    }
}
