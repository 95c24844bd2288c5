//! Ledger configuration.
//!
//! Resolved once at startup and handed to [`crate::Store`]. Nothing in the
//! library reads the environment after that point.

use std::path::{Path, PathBuf};

/// Environment variable naming the data file.
pub const DATA_FILE_ENV: &str = "MEDLEDGER_FILE";

/// Data file used when neither an override nor the environment names one.
pub const DEFAULT_DATA_FILE: &str = "medicines.csv";

/// Configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    data_file: PathBuf,
}

impl LedgerConfig {
    pub fn new(data_file: impl Into<PathBuf>) -> Self {
        Self {
            data_file: data_file.into(),
        }
    }

    /// Resolve from an explicit override, then `MEDLEDGER_FILE`, then the default.
    pub fn resolve(override_file: Option<PathBuf>) -> Self {
        let env_file = std::env::var_os(DATA_FILE_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_from(override_file, env_file)
    }

    /// Resolution without touching the process environment.
    pub fn resolve_from(override_file: Option<PathBuf>, env_file: Option<PathBuf>) -> Self {
        let data_file = override_file
            .or(env_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
        Self { data_file }
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_wins() {
        let config = LedgerConfig::resolve_from(
            Some(PathBuf::from("override.csv")),
            Some(PathBuf::from("env.csv")),
        );
        assert_eq!(config.data_file(), Path::new("override.csv"));
    }

    #[test]
    fn test_env_before_default() {
        let config = LedgerConfig::resolve_from(None, Some(PathBuf::from("env.csv")));
        assert_eq!(config.data_file(), Path::new("env.csv"));
    }

    #[test]
    fn test_default() {
        let config = LedgerConfig::resolve_from(None, None);
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.data_file(), Path::new(DEFAULT_DATA_FILE));
    }
}
