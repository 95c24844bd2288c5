//! Data-entry form for a new medicine.
//!
//! The form owns an ordered list of generic sub-entries. Each sub-entry has a
//! stable id; its display label ("Generic N") is derived from its position
//! every time it is asked for, so removing an entry renumbers the rest
//! without touching their data.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codec;
use crate::models::{GenericEntry, MedicineRecord, DATE_FORMAT, MAX_GENERICS};
use crate::store::{Store, StoreError};

/// Form errors.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Medicine Name and Composition are required")]
    MissingRequired,

    #[error("Maximum {} generics allowed", MAX_GENERICS)]
    TooManyGenerics,

    #[error("No generic entry with id {0}")]
    UnknownGeneric(String),

    #[error("Error saving medicine: {0}")]
    Store(#[from] StoreError),
}

impl FormError {
    /// Whether this is a local validation failure (nothing was written).
    pub fn is_validation(&self) -> bool {
        !matches!(self, FormError::Store(_))
    }
}

pub type FormResult<T> = Result<T, FormError>;

/// One generic sub-entry being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericDraft {
    /// Stable identity, independent of position
    pub id: String,
    pub name: String,
    pub composition: String,
    pub price: String,
    pub side_effects: String,
}

impl GenericDraft {
    fn blank() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: String::new(),
            composition: String::new(),
            price: String::new(),
            side_effects: String::new(),
        }
    }

    fn to_entry(&self) -> GenericEntry {
        GenericEntry::new(
            self.name.trim(),
            self.composition.trim(),
            self.price.trim(),
            self.side_effects.trim(),
        )
    }
}

/// Label shown for the sub-entry at `position` (0-indexed).
pub fn generic_label(position: usize) -> String {
    format!("Generic {}", position + 1)
}

/// In-memory state of the add-medicine form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineForm {
    pub name: String,
    pub composition: String,
    generics: Vec<GenericDraft>,
}

impl MedicineForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sub-entries in display order.
    pub fn generics(&self) -> &[GenericDraft] {
        &self.generics
    }

    pub fn can_add_generic(&self) -> bool {
        self.generics.len() < MAX_GENERICS
    }

    /// Append a blank sub-entry and return its id.
    pub fn add_generic(&mut self) -> FormResult<String> {
        if !self.can_add_generic() {
            return Err(FormError::TooManyGenerics);
        }
        let draft = GenericDraft::blank();
        let id = draft.id.clone();
        self.generics.push(draft);
        Ok(id)
    }

    /// Remove a sub-entry by id.
    pub fn remove_generic(&mut self, id: &str) -> FormResult<GenericDraft> {
        let position = self
            .generics
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| FormError::UnknownGeneric(id.to_string()))?;
        Ok(self.generics.remove(position))
    }

    pub fn generic_mut(&mut self, id: &str) -> FormResult<&mut GenericDraft> {
        self.generics
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| FormError::UnknownGeneric(id.to_string()))
    }

    /// `(id, label)` pairs, numbered by current position.
    pub fn labels(&self) -> Vec<(String, String)> {
        self.generics
            .iter()
            .enumerate()
            .map(|(i, g)| (g.id.clone(), generic_label(i)))
            .collect()
    }

    /// Name and composition must be non-blank.
    pub fn validate(&self) -> FormResult<()> {
        if self.name.trim().is_empty() || self.composition.trim().is_empty() {
            return Err(FormError::MissingRequired);
        }
        Ok(())
    }

    /// Build the record to store, with every field trimmed.
    pub fn to_record<Tz>(&self, now: &DateTime<Tz>) -> FormResult<MedicineRecord>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        self.validate()?;
        Ok(MedicineRecord {
            name: self.name.trim().to_string(),
            composition: self.composition.trim().to_string(),
            date_added: now.format(DATE_FORMAT).to_string(),
            generics: self.generics.iter().map(GenericDraft::to_entry).collect(),
        })
    }

    /// Validate, then append to the store stamped with the local time.
    ///
    /// Returns the record as it reads back from the store, so blank-named
    /// sub-entries are dropped. The form is left as-is on failure so the
    /// caller can retry.
    pub fn save(&self, store: &Store) -> FormResult<MedicineRecord> {
        let row = codec::encode(&self.to_record(&Local::now())?);
        store.append_row(&row)?;
        let saved = codec::decode(&row);
        tracing::info!(name = %saved.name, generics = saved.generics.len(), "saved medicine");
        Ok(saved)
    }
}
