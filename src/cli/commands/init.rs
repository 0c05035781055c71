//! Initialize the problem database.
//!
//! Creates the parent directory and the SQLite file with the full schema.
//! The file lives at the resolved store path (`--db`, `CPCAT_DB`, or the
//! platform data directory).

use crate::config::require_db_path;
use crate::error::{Error, Result};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    database: PathBuf,
    recreated: bool,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] if the file exists and `force` is
/// not set, or an error if the directory or database cannot be created.
pub fn execute(force: bool, db_path: Option<&Path>, json: bool) -> Result<()> {
    let db_path = require_db_path(db_path)?;
    let existed = db_path.exists();

    if existed && !force {
        return Err(Error::AlreadyInitialized { path: db_path });
    }

    if crate::is_dry_run() {
        let verb = if existed { "recreate" } else { "create" };
        println!("Would {verb} database: {}", db_path.display());
        return Ok(());
    }

    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }

    if existed {
        SqliteStorage::reset(&db_path)?;
    } else {
        SqliteStorage::open(&db_path)?;
    }

    if crate::is_silent() {
        println!("{}", db_path.display());
        return Ok(());
    }

    if json {
        let output = InitOutput {
            database: db_path,
            recreated: existed,
        };
        let payload = serde_json::to_string(&output)?;
        println!("{payload}");
    } else {
        println!("Initialized cpcat database");
        println!("  Database: {}", db_path.display());
        println!();
        println!("Next: 'cpcat add --title ...' or 'cpcat import problems.jsonl'");
    }

    Ok(())
}
