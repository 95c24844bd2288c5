//! MedLedger Core Library
//!
//! Records medicines and up to five generic alternatives per medicine in a
//! flat spreadsheet file.
//!
//! # Architecture
//!
//! ```text
//!   Presentation layer (CLI / desktop shell via FFI)
//!        │                               ▲
//!        │ MedicineForm                  │ SearchOutcome / Statistics / RecentEntry
//!        ▼                               │
//!   ┌──────────┐   encode    ┌──────────────────┐   decode   ┌──────────┐
//!   │   form   │────────────▶│  codec (23 cells) │◀───────────│  lookup  │
//!   └──────────┘             └────────┬─────────┘            └────▲─────┘
//!                                     │ append_row                │ read_all_rows
//!                                     ▼                           │
//!                            ┌─────────────────────────────────────┐
//!                            │     store (CSV: header + rows)      │
//!                            └─────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`codec`]: fixed-width row layout, encode/decode
//! - [`store`]: backing file, append, full scan, external viewer
//! - [`lookup`]: search, suggestions, statistics, recent entries
//! - [`form`]: add-medicine form with dynamic generic sub-entries
//! - [`models`]: domain types
//! - [`config`]: data file resolution

pub mod codec;
pub mod config;
pub mod form;
pub mod lookup;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::LedgerConfig;
pub use form::{FormError, GenericDraft, MedicineForm};
pub use lookup::{Lookup, SearchOutcome, ADD_FORM_DELAY};
pub use models::{GenericEntry, MedicineRecord, RecentEntry, Statistics, MAX_GENERICS};
pub use store::{LaunchError, Store, StoreError};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedLedgerError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Launch error: {0}")]
    Launch(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<StoreError> for MedLedgerError {
    fn from(e: StoreError) -> Self {
        MedLedgerError::Store(e.to_string())
    }
}

impl From<FormError> for MedLedgerError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::Store(inner) => inner.into(),
            FormError::UnknownGeneric(id) => MedLedgerError::NotFound(id),
            other => MedLedgerError::Validation(other.to_string()),
        }
    }
}

impl From<LaunchError> for MedLedgerError {
    fn from(e: LaunchError) -> Self {
        MedLedgerError::Launch(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedLedgerError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedLedgerError::InvalidInput(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the ledger at the given path, creating the data file if needed.
#[uniffi::export]
pub fn open_ledger(path: String) -> Result<Arc<MedLedgerCore>, MedLedgerError> {
    if path.trim().is_empty() {
        return Err(MedLedgerError::InvalidInput("path cannot be empty".into()));
    }
    let store = Store::open(&path)?;
    Ok(Arc::new(MedLedgerCore { store }))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Ledger handle for FFI. Every call opens and releases the data file.
#[derive(uniffi::Object)]
pub struct MedLedgerCore {
    store: Store,
}

#[uniffi::export]
impl MedLedgerCore {
    /// Path of the backing data file.
    pub fn data_file(&self) -> String {
        self.store.path().display().to_string()
    }

    /// Search by exact, case-insensitive name.
    pub fn search_medicine(&self, query: String) -> Result<FfiSearchOutcome, MedLedgerError> {
        let outcome = Lookup::new(&self.store).search(&query)?;
        Ok(outcome.into())
    }

    /// Totals across all stored medicines.
    pub fn statistics(&self) -> Result<FfiStatistics, MedLedgerError> {
        let stats = Lookup::new(&self.store).statistics()?;
        Ok(stats.into())
    }

    /// Most recent medicines, newest first.
    pub fn recent_medicines(&self) -> Result<Vec<FfiRecentEntry>, MedLedgerError> {
        let recent = Lookup::new(&self.store).recent()?;
        Ok(recent.into_iter().map(|r| r.into()).collect())
    }

    /// Validate and store a medicine in one call.
    pub fn save_medicine(
        &self,
        input: FfiMedicineInput,
    ) -> Result<FfiMedicineRecord, MedLedgerError> {
        let form = MedicineForm::try_from(input)?;
        let record = form.save(&self.store)?;
        Ok(record.into())
    }

    /// Open the data file in the host's default application.
    pub fn view_database(&self) -> Result<(), MedLedgerError> {
        self.store.open_externally()?;
        Ok(())
    }

    /// Milliseconds a front end should wait before opening the add form
    /// after a not-found search.
    pub fn add_form_delay_ms(&self) -> u64 {
        ADD_FORM_DELAY.as_millis() as u64
    }
}

// =========================================================================
// Form Object
// =========================================================================

/// Add-medicine form state owned by the foreign UI.
#[derive(uniffi::Object)]
pub struct MedicineFormHandle {
    form: Mutex<MedicineForm>,
}

#[uniffi::export]
impl MedicineFormHandle {
    #[uniffi::constructor]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            form: Mutex::new(MedicineForm::new()),
        })
    }

    pub fn set_name(&self, name: String) -> Result<(), MedLedgerError> {
        self.form.lock()?.name = name;
        Ok(())
    }

    pub fn set_composition(&self, composition: String) -> Result<(), MedLedgerError> {
        self.form.lock()?.composition = composition;
        Ok(())
    }

    /// Add a blank generic sub-entry, returning its id.
    pub fn add_generic(&self) -> Result<String, MedLedgerError> {
        Ok(self.form.lock()?.add_generic()?)
    }

    pub fn remove_generic(&self, id: String) -> Result<(), MedLedgerError> {
        self.form.lock()?.remove_generic(&id)?;
        Ok(())
    }

    pub fn update_generic(
        &self,
        id: String,
        entry: FfiGenericEntry,
    ) -> Result<(), MedLedgerError> {
        let mut form = self.form.lock()?;
        let draft = form.generic_mut(&id)?;
        draft.name = entry.name;
        draft.composition = entry.composition;
        draft.price = entry.price;
        draft.side_effects = entry.side_effects;
        Ok(())
    }

    /// Current sub-entries with position-derived labels.
    pub fn generic_slots(&self) -> Result<Vec<FfiGenericSlot>, MedLedgerError> {
        let form = self.form.lock()?;
        Ok(form
            .generics()
            .iter()
            .enumerate()
            .map(|(i, draft)| FfiGenericSlot {
                id: draft.id.clone(),
                label: crate::form::generic_label(i),
                entry: FfiGenericEntry {
                    name: draft.name.clone(),
                    composition: draft.composition.clone(),
                    price: draft.price.clone(),
                    side_effects: draft.side_effects.clone(),
                },
            })
            .collect())
    }

    pub fn can_add_generic(&self) -> Result<bool, MedLedgerError> {
        Ok(self.form.lock()?.can_add_generic())
    }

    /// Validate and append to the ledger. Form state is kept on failure.
    pub fn save(&self, ledger: Arc<MedLedgerCore>) -> Result<FfiMedicineRecord, MedLedgerError> {
        let form = self.form.lock()?;
        let record = form.save(&ledger.store)?;
        Ok(record.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe generic entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGenericEntry {
    pub name: String,
    pub composition: String,
    pub price: String,
    pub side_effects: String,
}

impl From<GenericEntry> for FfiGenericEntry {
    fn from(entry: GenericEntry) -> Self {
        Self {
            name: entry.name,
            composition: entry.composition,
            price: entry.price,
            side_effects: entry.side_effects,
        }
    }
}

/// FFI-safe generic sub-entry of a form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGenericSlot {
    pub id: String,
    pub label: String,
    pub entry: FfiGenericEntry,
}

/// FFI-safe medicine record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineRecord {
    pub name: String,
    pub composition: String,
    pub date_added: String,
    pub generics: Vec<FfiGenericEntry>,
}

impl From<MedicineRecord> for FfiMedicineRecord {
    fn from(record: MedicineRecord) -> Self {
        Self {
            name: record.name,
            composition: record.composition,
            date_added: record.date_added,
            generics: record.generics.into_iter().map(|g| g.into()).collect(),
        }
    }
}

/// FFI-safe input for a one-shot save.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicineInput {
    pub name: String,
    pub composition: String,
    pub generics: Vec<FfiGenericEntry>,
}

impl TryFrom<FfiMedicineInput> for MedicineForm {
    type Error = FormError;

    fn try_from(input: FfiMedicineInput) -> Result<Self, Self::Error> {
        let mut form = MedicineForm::new();
        form.name = input.name;
        form.composition = input.composition;
        for entry in input.generics {
            let id = form.add_generic()?;
            let draft = form.generic_mut(&id)?;
            draft.name = entry.name;
            draft.composition = entry.composition;
            draft.price = entry.price;
            draft.side_effects = entry.side_effects;
        }
        Ok(form)
    }
}

/// FFI-safe search outcome.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiSearchOutcome {
    Found { record: FfiMedicineRecord },
    NotFound { query: String, suggestions: Vec<String> },
    BlankQuery,
}

impl From<SearchOutcome> for FfiSearchOutcome {
    fn from(outcome: SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Found(record) => FfiSearchOutcome::Found {
                record: record.into(),
            },
            SearchOutcome::NotFound { query, suggestions } => {
                FfiSearchOutcome::NotFound { query, suggestions }
            }
            SearchOutcome::BlankQuery => FfiSearchOutcome::BlankQuery,
        }
    }
}

/// FFI-safe statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStatistics {
    pub total_medicines: u32,
    pub total_generics: u32,
    pub average_generics: f64,
}

impl From<Statistics> for FfiStatistics {
    fn from(stats: Statistics) -> Self {
        Self {
            total_medicines: stats.total_medicines as u32,
            total_generics: stats.total_generics as u32,
            average_generics: stats.average_generics,
        }
    }
}

/// FFI-safe recent entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecentEntry {
    pub name: String,
    pub composition_preview: String,
}

impl From<RecentEntry> for FfiRecentEntry {
    fn from(entry: RecentEntry) -> Self {
        Self {
            name: entry.name,
            composition_preview: entry.composition_preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, Arc<MedLedgerCore>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medicines.csv").display().to_string();
        let core = open_ledger(path).unwrap();
        (dir, core)
    }

    fn generic(name: &str) -> FfiGenericEntry {
        FfiGenericEntry {
            name: name.into(),
            composition: String::new(),
            price: String::new(),
            side_effects: String::new(),
        }
    }

    #[test]
    fn test_open_ledger_rejects_blank_path() {
        assert!(matches!(
            open_ledger("  ".into()),
            Err(MedLedgerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_save_and_search_through_ffi() {
        let (_dir, core) = open_temp();
        core.save_medicine(FfiMedicineInput {
            name: "Panadol".into(),
            composition: "Paracetamol".into(),
            generics: vec![generic("Calpol"), generic("")],
        })
        .unwrap();

        match core.search_medicine("panadol".into()).unwrap() {
            FfiSearchOutcome::Found { record } => {
                assert_eq!(record.generics.len(), 1);
                assert_eq!(record.generics[0].name, "Calpol");
            }
            other => panic!("expected Found, got {:?}", other),
        }

        let stats = core.statistics().unwrap();
        assert_eq!(stats.total_medicines, 1);
        assert_eq!(stats.total_generics, 1);
    }

    #[test]
    fn test_save_medicine_validation() {
        let (_dir, core) = open_temp();
        let err = core
            .save_medicine(FfiMedicineInput {
                name: "Panadol".into(),
                composition: " ".into(),
                generics: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, MedLedgerError::Validation(_)));

        let err = core
            .save_medicine(FfiMedicineInput {
                name: "Panadol".into(),
                composition: "Paracetamol".into(),
                generics: (0..6).map(|i| generic(&format!("G{}", i))).collect(),
            })
            .unwrap_err();
        assert!(matches!(err, MedLedgerError::Validation(_)));
        assert_eq!(core.statistics().unwrap().total_medicines, 0);
    }

    #[test]
    fn test_form_handle_flow() {
        let (_dir, core) = open_temp();
        let handle = MedicineFormHandle::new();
        handle.set_name("Brufen".into()).unwrap();
        handle.set_composition("Ibuprofen".into()).unwrap();

        let a = handle.add_generic().unwrap();
        let b = handle.add_generic().unwrap();
        handle.update_generic(b.clone(), generic("Nurofen")).unwrap();
        handle.remove_generic(a).unwrap();

        let slots = handle.generic_slots().unwrap();
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].id, b);
        assert_eq!(slots[0].label, "Generic 1");

        let record = handle.save(core.clone()).unwrap();
        assert_eq!(record.generics[0].name, "Nurofen");

        let recent = core.recent_medicines().unwrap();
        assert_eq!(recent[0].name, "Brufen");
    }

    #[test]
    fn test_unknown_generic_maps_to_not_found() {
        let handle = MedicineFormHandle::new();
        assert!(matches!(
            handle.remove_generic("missing".into()),
            Err(MedLedgerError::NotFound(_))
        ));
    }
}
