//! Fixed-width row codec.
//!
//! A medicine occupies one flat row of [`ROW_WIDTH`] cells:
//!
//! ```text
//! | name | composition | date_added | g1.name | g1.comp | g1.price | g1.side | ... | g5.side |
//!   0      1             2            3         4         5          6               22
//! ```
//!
//! Unused generic slots are written as four empty strings. On decode a slot
//! is kept only when its name cell is non-blank, and cells past the end of a
//! short row read as empty.

use crate::models::{GenericEntry, MedicineRecord, MAX_GENERICS};

/// Cells before the first generic slot.
pub const BASE_CELLS: usize = 3;

/// Cells per generic slot.
pub const CELLS_PER_GENERIC: usize = 4;

/// Total cells in an encoded row.
pub const ROW_WIDTH: usize = BASE_CELLS + MAX_GENERICS * CELLS_PER_GENERIC;

/// Column labels for the header row.
pub fn header() -> Vec<String> {
    let mut labels = vec![
        "Medicine Name".to_string(),
        "Composition".to_string(),
        "Date Added".to_string(),
    ];
    for slot in 1..=MAX_GENERICS {
        labels.push(format!("Generic {} Name", slot));
        labels.push(format!("Generic {} Composition", slot));
        labels.push(format!("Generic {} Price", slot));
        labels.push(format!("Generic {} Side Effects", slot));
    }
    labels
}

/// Offset of the name cell for generic slot `slot` (0-indexed).
pub fn slot_offset(slot: usize) -> usize {
    BASE_CELLS + slot * CELLS_PER_GENERIC
}

/// Pack a record into exactly [`ROW_WIDTH`] cells.
///
/// Generics beyond [`MAX_GENERICS`] are not written.
pub fn encode(record: &MedicineRecord) -> Vec<String> {
    let mut row = Vec::with_capacity(ROW_WIDTH);
    row.push(record.name.clone());
    row.push(record.composition.clone());
    row.push(record.date_added.clone());

    for generic in record.generics.iter().take(MAX_GENERICS) {
        row.push(generic.name.clone());
        row.push(generic.composition.clone());
        row.push(generic.price.clone());
        row.push(generic.side_effects.clone());
    }

    row.resize(ROW_WIDTH, String::new());
    row
}

/// Unpack a row into a record. Never fails.
pub fn decode<S: AsRef<str>>(row: &[S]) -> MedicineRecord {
    let cell = |idx: usize| row.get(idx).map(|c| c.as_ref().to_string()).unwrap_or_default();

    let generics = (0..MAX_GENERICS)
        .filter_map(|slot| {
            let base = slot_offset(slot);
            let name = cell(base);
            if name.trim().is_empty() {
                return None;
            }
            Some(GenericEntry {
                name,
                composition: cell(base + 1),
                price: cell(base + 2),
                side_effects: cell(base + 3),
            })
        })
        .collect();

    MedicineRecord {
        name: cell(0),
        composition: cell(1),
        date_added: cell(2),
        generics,
    }
}

/// Number of present generic slots in a raw row, without building a record.
pub fn count_present_generics<S: AsRef<str>>(row: &[S]) -> usize {
    (0..MAX_GENERICS)
        .filter(|&slot| {
            row.get(slot_offset(slot))
                .is_some_and(|name| !name.as_ref().trim().is_empty())
        })
        .count()
}
