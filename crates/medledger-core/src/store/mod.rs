//! Flat-file store for medicine rows.
//!
//! The backing file is CSV: one header row followed by one row per medicine.
//! Every operation opens the file, does its work, and drops the handle before
//! returning.

mod viewer;

pub use viewer::*;

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::codec;
use crate::config::LedgerConfig;
use crate::models::MedicineRecord;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data file not found: {}", .0.display())]
    Missing(PathBuf),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Handle to the backing file. Holds only the path.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Create a store for the configured data file.
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            path: config.data_file().to_path_buf(),
        }
    }

    /// Open the store at path, creating the file if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.initialize()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with the header row if it does not exist.
    ///
    /// Returns `true` when a header was written. A zero-length file counts as
    /// uninitialised and gets the header; any other existing file is never
    /// touched.
    pub fn initialize(&self) -> StoreResult<bool> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let len = fs::metadata(&self.path).map_err(|e| self.io_error(e))?.len();
                if len > 0 {
                    return Ok(false);
                }
                tracing::warn!(path = %self.path.display(), "data file is empty, writing header");
                OpenOptions::new()
                    .write(true)
                    .open(&self.path)
                    .map_err(|e| self.io_error(e))?
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let mut buf = Vec::new();
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            writer.write_record(codec::header())?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }

        if let Err(e) = file.write_all(&buf).and_then(|_| file.sync_all()) {
            self.truncate_to(&file, 0);
            return Err(self.io_error(e));
        }

        tracing::info!(path = %self.path.display(), "created data file");
        Ok(true)
    }

    /// Append one encoded row.
    ///
    /// The row is serialized in memory and written in one call. If the write
    /// fails the file is truncated back to its previous length.
    pub fn append_row<S: AsRef<str>>(&self, row: &[S]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .map_err(|e| self.open_error(e))?;

        let original_len = file.metadata().map_err(|e| self.io_error(e))?.len();
        let needs_newline =
            original_len > 0 && !ends_with_newline(&mut file).map_err(|e| self.io_error(e))?;

        let mut buf = Vec::new();
        if needs_newline {
            buf.push(b'\n');
        }
        {
            let mut writer = csv::Writer::from_writer(&mut buf);
            writer.write_record(row.iter().map(|c| c.as_ref()))?;
            writer.flush().map_err(|e| self.io_error(e))?;
        }

        let result = file
            .seek(SeekFrom::End(0))
            .and_then(|_| file.write_all(&buf))
            .and_then(|_| file.sync_all());

        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "append failed, rolling back");
            self.truncate_to(&file, original_len);
            return Err(self.io_error(e));
        }

        tracing::debug!(path = %self.path.display(), bytes = buf.len(), "appended row");
        Ok(())
    }

    /// Encode and append a record.
    pub fn append_record(&self, record: &MedicineRecord) -> StoreResult<()> {
        self.append_row(&codec::encode(record))
    }

    /// Read every data row, header excluded, in file order.
    pub fn read_all_rows(&self) -> StoreResult<Vec<Vec<String>>> {
        let file = File::open(&self.path).map_err(|e| self.open_error(e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let expected = codec::header();
        let headers = reader.headers()?;
        if !headers.is_empty() && headers.iter().ne(expected.iter().map(String::as_str)) {
            tracing::warn!(
                path = %self.path.display(),
                columns = headers.len(),
                "header row does not match the medicine schema"
            );
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "read data rows");
        Ok(rows)
    }

    /// Read and decode every stored medicine.
    pub fn read_all_records(&self) -> StoreResult<Vec<MedicineRecord>> {
        Ok(self
            .read_all_rows()?
            .iter()
            .map(|row| codec::decode(row))
            .collect())
    }

    /// Hand the file to the host's default application.
    pub fn open_externally(&self) -> Result<(), LaunchError> {
        open_with_default_app(&self.path)
    }

    fn truncate_to(&self, file: &File, len: u64) {
        if let Err(e) = file.set_len(len) {
            tracing::error!(
                path = %self.path.display(),
                len,
                error = %e,
                "rollback failed, data file may hold a partial row"
            );
        }
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn open_error(&self, source: io::Error) -> StoreError {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::Missing(self.path.clone())
        } else {
            self.io_error(source)
        }
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GenericEntry;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("medicines.csv")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_initialize_writes_header() {
        let (_dir, store) = temp_store();
        let contents = fs::read_to_string(store.path()).unwrap();
        let first_line = contents.lines().next().unwrap();
        assert!(first_line.starts_with("Medicine Name,Composition,Date Added,Generic 1 Name"));
        assert_eq!(first_line.split(',').count(), codec::ROW_WIDTH);
        assert!(store.read_all_rows().unwrap().is_empty());
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_dir, store) = temp_store();
        store.append_row(&["Panadol", "Paracetamol", "t"]).unwrap();

        assert!(!store.initialize().unwrap());
        assert_eq!(store.read_all_rows().unwrap().len(), 1);
    }

    #[test]
    fn test_initialize_fills_empty_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medicines.csv");
        fs::write(&path, "").unwrap();

        let store = Store::new(&LedgerConfig::new(path.clone()));
        assert!(store.initialize().unwrap());
        assert!(!store.initialize().unwrap());

        let record = MedicineRecord::new("Panadol".into(), "Paracetamol".into(), "t".into());
        store.append_record(&record).unwrap();
        assert_eq!(store.read_all_records().unwrap(), vec![record]);
    }

    #[test]
    fn test_initialize_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("nested").join("data.csv")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_append_and_read_in_order() {
        let (_dir, store) = temp_store();
        let mut first = MedicineRecord::new("Panadol".into(), "Paracetamol".into(), "t1".into());
        first.generics = vec![GenericEntry::new("Calpol", "Paracetamol", "5.00", "None")];
        let second = MedicineRecord::new("Brufen".into(), "Ibuprofen, 400mg".into(), "t2".into());

        store.append_record(&first).unwrap();
        store.append_record(&second).unwrap();

        let rows = store.read_all_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), codec::ROW_WIDTH);
        assert_eq!(rows[1][1], "Ibuprofen, 400mg");

        let records = store.read_all_records().unwrap();
        assert_eq!(records, vec![first, second]);
    }

    #[test]
    fn test_append_repairs_missing_trailing_newline() {
        let (_dir, store) = temp_store();
        let mut contents = fs::read_to_string(store.path()).unwrap();
        contents.push_str("Legacy,Old formula,t0");
        fs::write(store.path(), contents).unwrap();

        store.append_row(&["Panadol", "Paracetamol", "t1"]).unwrap();

        let rows = store.read_all_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], "Legacy");
        assert_eq!(rows[1][0], "Panadol");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig::new(dir.path().join("absent.csv"));
        let store = Store::new(&config);

        assert!(matches!(store.read_all_rows(), Err(StoreError::Missing(_))));
        assert!(matches!(
            store.append_row(&["a", "b", "c"]),
            Err(StoreError::Missing(_))
        ));
        assert!(!store.path().exists());
    }
}
