//! Database schema definitions and integrity checks.
//!
//! Column names match the established `cp_dataset.db` layout so existing
//! databases open without conversion.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

/// Current schema version for migration tracking.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Tables owned by the catalogue, parents first.
pub const TABLES: [&str; 3] = ["problems", "solutions", "implementations"];

/// The base SQL schema.
///
/// Every statement is idempotent; indexes are created separately in
/// [`INDEX_SQL`] once key columns have been verified.
pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS problems (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    platform TEXT,
    title TEXT,
    problem_description TEXT,
    url TEXT,
    difficulty TEXT,
    tags TEXT,
    created_at INTEGER,
    updated_at INTEGER
);

CREATE TABLE IF NOT EXISTS solutions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    problem_id INTEGER,
    language TEXT,
    FOREIGN KEY (problem_id) REFERENCES problems(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS implementations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    solution_id INTEGER,
    method_name TEXT,
    explanation TEXT,
    url TEXT,
    code TEXT,
    notes TEXT,
    FOREIGN KEY (solution_id) REFERENCES solutions(id) ON DELETE CASCADE
);
";

/// Indexes on parent keys.
pub const INDEX_SQL: &str = r"
CREATE INDEX IF NOT EXISTS idx_solutions_problem ON solutions(problem_id);
CREATE INDEX IF NOT EXISTS idx_implementations_solution ON implementations(solution_id);
";

/// An expected column and whether it can be added to an existing table.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub table: &'static str,
    pub name: &'static str,
    /// Declaration used by `ALTER TABLE ... ADD COLUMN`.
    pub decl: &'static str,
    /// Identity and parent-key columns cannot be migrated in place.
    pub additive: bool,
}

const fn key(table: &'static str, name: &'static str) -> ColumnSpec {
    ColumnSpec {
        table,
        name,
        decl: "",
        additive: false,
    }
}

const fn data(table: &'static str, name: &'static str, decl: &'static str) -> ColumnSpec {
    ColumnSpec {
        table,
        name,
        decl,
        additive: true,
    }
}

/// Every column the store reads or writes.
pub const EXPECTED_COLUMNS: &[ColumnSpec] = &[
    key("problems", "id"),
    data("problems", "platform", "TEXT"),
    data("problems", "title", "TEXT"),
    data("problems", "problem_description", "TEXT"),
    data("problems", "url", "TEXT"),
    data("problems", "difficulty", "TEXT"),
    data("problems", "tags", "TEXT"),
    data("problems", "created_at", "INTEGER"),
    data("problems", "updated_at", "INTEGER"),
    key("solutions", "id"),
    key("solutions", "problem_id"),
    data("solutions", "language", "TEXT"),
    key("implementations", "id"),
    key("implementations", "solution_id"),
    data("implementations", "method_name", "TEXT"),
    data("implementations", "explanation", "TEXT"),
    data("implementations", "url", "TEXT"),
    data("implementations", "code", "TEXT"),
    data("implementations", "notes", "TEXT"),
];

/// Result of inspecting a database without modifying it.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct SchemaReport {
    pub missing_tables: Vec<String>,
    /// `table.column` entries that can be added in place.
    pub migratable_columns: Vec<String>,
    /// `table.column` entries that require a reset.
    pub missing_key_columns: Vec<String>,
}

impl SchemaReport {
    /// True when the store can be opened as-is.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.missing_tables.is_empty()
            && self.migratable_columns.is_empty()
            && self.missing_key_columns.is_empty()
    }

    /// True when opening would fail even after additive migration.
    #[must_use]
    pub fn needs_reset(&self) -> bool {
        !self.missing_key_columns.is_empty()
    }
}

/// Apply the schema to a database connection.
///
/// Sets pragmas, creates missing tables, adds missing nullable columns and
/// verifies key columns before creating indexes.
///
/// # Errors
///
/// Returns [`Error::SchemaMismatch`] if an existing table lacks an identity
/// or parent-key column, or a database error if any statement fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    conn.execute_batch(SCHEMA_SQL)?;

    super::migrations::run_migrations(conn)?;

    let report = check_schema(conn)?;
    if report.needs_reset() {
        return Err(Error::SchemaMismatch {
            missing: report.missing_key_columns,
        });
    }

    conn.execute_batch(INDEX_SQL)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        rusqlite::params![
            format!("v{CURRENT_SCHEMA_VERSION}"),
            chrono::Utc::now().timestamp_millis()
        ],
    )?;

    debug!("Schema verified");
    Ok(())
}

/// Inspect tables and columns without changing anything.
///
/// # Errors
///
/// Returns an error if the catalog queries fail.
pub fn check_schema(conn: &Connection) -> Result<SchemaReport> {
    let mut report = SchemaReport::default();

    for table in TABLES {
        if !table_exists(conn, table)? {
            report.missing_tables.push(table.to_string());
            continue;
        }
        for spec in EXPECTED_COLUMNS.iter().filter(|c| c.table == table) {
            if column_exists(conn, spec.table, spec.name)? {
                continue;
            }
            let entry = format!("{}.{}", spec.table, spec.name);
            if spec.additive {
                report.migratable_columns.push(entry);
            } else {
                report.missing_key_columns.push(entry);
            }
        }
    }

    Ok(report)
}

/// Check if a table exists.
pub(crate) fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")?
        .exists([table])
}

/// Check if a column exists in a table.
pub(crate) fn column_exists(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    conn.prepare("SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2")?
        .exists([table, column])
}
