//! Additive column migrations.
//!
//! Older databases may lack nullable data columns (the first releases
//! had no `difficulty` or `tags`). Any such column listed in
//! [`EXPECTED_COLUMNS`] is added in place. Nothing is ever dropped or
//! renamed; missing key columns are left for the integrity check.

use rusqlite::{Connection, Result};
use tracing::{info, warn};

use super::schema::{column_exists, table_exists, EXPECTED_COLUMNS};

/// Add every missing additive column and record it in `schema_migrations`.
///
/// Returns the `table.column` entries that were added. Idempotent and
/// safe to call on every open.
///
/// # Errors
///
/// Returns an error if an `ALTER TABLE` fails for a reason other than the
/// column already existing.
pub fn run_migrations(conn: &Connection) -> Result<Vec<String>> {
    let mut added = Vec::new();

    for spec in EXPECTED_COLUMNS.iter().filter(|c| c.additive) {
        if !table_exists(conn, spec.table)? || column_exists(conn, spec.table, spec.name)? {
            continue;
        }

        let version = format!("add_column:{}.{}", spec.table, spec.name);
        info!(version = %version, "Applying migration");

        let sql = format!(
            "ALTER TABLE {} ADD COLUMN {} {}",
            spec.table, spec.name, spec.decl
        );
        if let Err(e) = conn.execute_batch(&sql) {
            if e.to_string().contains("duplicate column name") {
                warn!(version = %version, "Column already present, marking complete");
            } else {
                return Err(e);
            }
        }

        conn.execute(
            "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
            rusqlite::params![version, chrono::Utc::now().timestamp_millis()],
        )?;

        added.push(format!("{}.{}", spec.table, spec.name));
    }

    Ok(added)
}
