//! Schema integrity check and destructive reset.

use crate::config::require_db_path;
use crate::error::{Error, Result};
use crate::storage::{SchemaReport, SqliteStorage};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use tracing::warn;

#[derive(Serialize)]
struct CheckOutput {
    path: String,
    healthy: bool,
    reset: bool,
    report: SchemaReport,
}

/// Execute the check command.
///
/// Without `--reset` the store is inspected read-only. With `--reset` the
/// file is deleted and recreated empty, whatever its state.
///
/// # Errors
///
/// Returns [`Error::NotInitialized`] when there is no store to check, or
/// [`Error::SchemaMismatch`] when the check finds unrecoverable damage.
pub fn execute(reset: bool, db_path: Option<&Path>, json: bool) -> Result<()> {
    let path = require_db_path(db_path)?;

    if reset {
        return execute_reset(&path, json);
    }

    if !path.exists() {
        return Err(Error::NotInitialized);
    }

    let report = SqliteStorage::inspect(&path)?;
    let healthy = report.is_healthy();

    if json {
        let output = CheckOutput {
            path: path.display().to_string(),
            healthy,
            reset: false,
            report: report.clone(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        print_report(&path, &report);
    }

    if report.needs_reset() {
        return Err(Error::SchemaMismatch {
            missing: report.missing_key_columns,
        });
    }

    Ok(())
}

fn execute_reset(path: &Path, json: bool) -> Result<()> {
    if crate::is_dry_run() {
        println!("Would delete and recreate {}", path.display());
        return Ok(());
    }

    warn!(path = %path.display(), "Resetting database; all rows are discarded");
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    SqliteStorage::reset(path)?;
    let report = SqliteStorage::inspect(path)?;

    if json {
        let output = CheckOutput {
            path: path.display().to_string(),
            healthy: report.is_healthy(),
            reset: true,
            report,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Recreated empty database: {}", path.display());
    }

    Ok(())
}

fn print_report(path: &Path, report: &SchemaReport) {
    println!("Database: {}", path.display());

    if report.is_healthy() {
        println!("  {} schema is complete", "OK".green().bold());
        return;
    }

    for table in &report.missing_tables {
        println!("  {} missing table {table}", "FIX".yellow().bold());
    }
    for column in &report.migratable_columns {
        println!("  {} missing column {column} (added on next open)", "FIX".yellow().bold());
    }
    for column in &report.missing_key_columns {
        println!("  {} missing key column {column}", "BROKEN".red().bold());
    }
    if report.needs_reset() {
        println!();
        println!("Run 'cpcat check --reset' to recreate the database (all data is lost).");
    }
}
