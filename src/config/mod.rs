//! Configuration management.
//!
//! The store file location is resolved once, at the edge of the program,
//! and handed to [`SqliteStorage::open`] explicitly. Nothing below the CLI
//! reads a global path.
//!
//! Priority:
//! 1. `--db <path>` flag
//! 2. `CPCAT_DB` environment variable
//! 3. Platform data directory: `<data_dir>/cpcat/cp_dataset.db`

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::storage::SqliteStorage;

/// Environment variable overriding the store path.
pub const DB_ENV_VAR: &str = "CPCAT_DB";

/// File name used inside the data directory.
pub const DB_FILE_NAME: &str = "cp_dataset.db";

/// Platform data directory for cpcat.
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "cpcat").map(|d| d.data_dir().to_path_buf())
}

/// Resolve the database path.
///
/// Returns `None` only when no explicit path or env var is given and the
/// platform has no home directory.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(db_path) = std::env::var(DB_ENV_VAR) {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    data_dir().map(|dir| dir.join(DB_FILE_NAME))
}

/// Resolve the database path, failing if it cannot be determined.
///
/// # Errors
///
/// Returns [`Error::Config`] if no location can be determined.
pub fn require_db_path(explicit_path: Option<&Path>) -> Result<PathBuf> {
    resolve_db_path(explicit_path).ok_or_else(|| {
        Error::Config(format!(
            "Could not determine a data directory; pass --db or set {DB_ENV_VAR}"
        ))
    })
}

/// Open the catalogue at the resolved path.
///
/// # Errors
///
/// Returns [`Error::NotInitialized`] if the file does not exist yet, or
/// any error from opening and checking the schema.
pub fn open_storage(explicit_path: Option<&Path>) -> Result<SqliteStorage> {
    let db_path = require_db_path(explicit_path)?;

    if !db_path.exists() {
        return Err(Error::NotInitialized);
    }

    SqliteStorage::open(&db_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/elsewhere.db");
        assert_eq!(resolve_db_path(Some(path)), Some(path.to_path_buf()));
    }

    #[test]
    fn test_open_missing_store_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        let result = open_storage(Some(&dir.path().join("missing.db")));
        assert!(matches!(result, Err(Error::NotInitialized)));
        assert!(!dir.path().join("missing.db").exists());
    }

    #[test]
    fn test_open_existing_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cat.db");
        SqliteStorage::open(&path).unwrap();

        assert!(open_storage(Some(&path)).is_ok());
    }
}
