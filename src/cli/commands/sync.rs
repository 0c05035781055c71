//! Export and import command implementations.
//!
//! Export writes the selected problem trees as JSONL (lossless) or CSV (one
//! row per implementation, export-only). Import appends every JSONL line as
//! a new problem; it never merges with existing rows.

use crate::cli::ExportFormat;
use crate::config::open_storage;
use crate::error::Result;
use crate::sync::{count_lines, Exporter, Importer};
use std::path::Path;

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the selection is empty or the file cannot be written.
pub fn export(
    format: ExportFormat,
    path: &Path,
    ids: &[i64],
    db_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let storage = open_storage(db_path)?;
    let selection = (!ids.is_empty()).then_some(ids);
    let exporter = Exporter::new(&storage);

    let stats = match format {
        ExportFormat::Jsonl => exporter.export_jsonl(path, selection)?,
        ExportFormat::Csv => exporter.export_csv(path, selection)?,
    };

    if crate::is_silent() {
        println!("{}", path.display());
        return Ok(());
    }

    if json {
        let output = serde_json::json!({
            "success": true,
            "format": format_name(format),
            "path": path.display().to_string(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("Export complete: {}", path.display());
        println!();
        println!("  Problems:        {}", stats.problems);
        println!("  Solutions:       {}", stats.solutions);
        println!("  Implementations: {}", stats.implementations);
        if format == ExportFormat::Csv {
            println!("  Rows:            {}", stats.rows);
        }
        if stats.skipped > 0 {
            println!("  Skipped:         {} (no longer exist)", stats.skipped);
        }
    }

    Ok(())
}

/// Execute the import command.
///
/// # Errors
///
/// Returns an error if the file is missing, or a line fails; lines before
/// the failing one stay imported.
pub fn import(path: &Path, db_path: Option<&Path>, json: bool) -> Result<()> {
    let mut storage = open_storage(db_path)?;
    let dry_run = crate::is_dry_run();

    if !json && !crate::is_silent() {
        let lines = count_lines(path)?;
        let action = if dry_run { "Checking" } else { "Importing" };
        println!("{action} {lines} document(s) from {}", path.display());
    }

    let stats = Importer::new(&mut storage)
        .dry_run(dry_run)
        .import_file(path)?;

    if crate::is_silent() {
        println!("{}", stats.problems);
        return Ok(());
    }

    if json {
        let output = serde_json::json!({
            "success": true,
            "path": path.display().to_string(),
            "stats": stats,
        });
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!();
        let verb = if dry_run { "Would import" } else { "Imported" };
        println!("  {verb}:");
        println!("    Problems:        {}", stats.problems);
        println!("    Solutions:       {}", stats.solutions);
        println!("    Implementations: {}", stats.implementations);
        if stats.blank_lines > 0 {
            println!("    Blank lines:     {}", stats.blank_lines);
        }
    }

    Ok(())
}

const fn format_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Jsonl => "jsonl",
        ExportFormat::Csv => "csv",
    }
}
