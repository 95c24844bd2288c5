//! Read-side queries over the store.
//!
//! Every query re-reads the backing file: records are never cached between
//! calls.

mod suggest;
mod summary;

pub use suggest::*;
pub use summary::*;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::models::{MedicineRecord, RecentEntry, Statistics};
use crate::store::{Store, StoreResult};

/// Delay before a front end opens the add form after a miss.
pub const ADD_FORM_DELAY: Duration = Duration::from_secs(1);

/// Result of a name search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SearchOutcome {
    /// First stored record whose name matches, in file order
    Found(MedicineRecord),
    /// No stored name matches; `suggestions` holds near misses
    NotFound {
        query: String,
        suggestions: Vec<String>,
    },
    /// Query was empty or whitespace; the store was not read
    BlankQuery,
}

/// First row whose name equals `query` case-insensitively, decoded.
///
/// Returns `None` for a blank query without scanning.
pub fn find_by_name<S: AsRef<str>>(rows: &[Vec<S>], query: &str) -> Option<MedicineRecord> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }
    let needle = query.to_lowercase();
    rows.iter()
        .find(|row| {
            row.first()
                .is_some_and(|name| name.as_ref().to_lowercase() == needle)
        })
        .map(|row| codec::decode(row))
}

/// Query interface bound to one store.
pub struct Lookup<'a> {
    store: &'a Store,
}

impl<'a> Lookup<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Look up a medicine by exact, case-insensitive name.
    pub fn search(&self, query: &str) -> StoreResult<SearchOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::BlankQuery);
        }

        let rows = self.store.read_all_rows()?;
        if let Some(record) = find_by_name(&rows, query) {
            tracing::debug!(query, "medicine found");
            return Ok(SearchOutcome::Found(record));
        }

        let names: Vec<&str> = rows
            .iter()
            .filter_map(|row| row.first().map(String::as_str))
            .collect();
        let suggestions = suggest_names(query, &names);
        tracing::debug!(query, suggestions = suggestions.len(), "medicine not found");

        Ok(SearchOutcome::NotFound {
            query: query.to_string(),
            suggestions,
        })
    }

    /// Totals over every stored medicine.
    pub fn statistics(&self) -> StoreResult<Statistics> {
        Ok(statistics(&self.store.read_all_rows()?))
    }

    /// Newest entries first, at most [`RECENT_LIMIT`].
    pub fn recent(&self) -> StoreResult<Vec<RecentEntry>> {
        Ok(recent_entries(&self.store.read_all_rows()?))
    }
}
