//! JSONL and CSV export.
//!
//! Both formats export a selection of problems (all of them by default).
//! JSONL keeps the full tree per line; CSV flattens to one row per
//! implementation, which drops problems and solutions with no
//! implementation underneath.

use std::path::Path;

use tracing::{info, warn};

use crate::csv_escape;
use crate::model::Problem;
use crate::storage::sqlite::SqliteStorage;
use crate::sync::file::{atomic_write, write_jsonl};
use crate::sync::types::{csv_rows, ExportStats, ProblemDocument, SyncError, SyncResult, CSV_HEADER};

/// Exporter for JSONL and CSV files.
pub struct Exporter<'a> {
    storage: &'a SqliteStorage,
}

impl<'a> Exporter<'a> {
    #[must_use]
    pub fn new(storage: &'a SqliteStorage) -> Self {
        Self { storage }
    }

    /// Export the selection as one JSON document per line.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NothingToExport`] for an empty selection, or an
    /// error if reading the store or writing the file fails.
    pub fn export_jsonl(&self, path: &Path, ids: Option<&[i64]>) -> SyncResult<ExportStats> {
        let (problems, mut stats) = self.collect(ids)?;

        let documents: Vec<ProblemDocument> = problems.iter().map(ProblemDocument::from).collect();
        write_jsonl(path, &documents)?;
        stats.rows = documents.len();

        info!(path = %path.display(), problems = stats.problems, "Exported JSONL");
        Ok(stats)
    }

    /// Export the selection as a flattened CSV table.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NothingToExport`] for an empty selection, or an
    /// error if reading the store or writing the file fails.
    pub fn export_csv(&self, path: &Path, ids: Option<&[i64]>) -> SyncResult<ExportStats> {
        let (problems, mut stats) = self.collect(ids)?;

        let (content, rows) = render_csv(&problems);
        atomic_write(path, &content)?;
        stats.rows = rows;

        info!(path = %path.display(), rows, "Exported CSV");
        Ok(stats)
    }

    /// Load the selected trees, skipping ids that vanished.
    fn collect(&self, ids: Option<&[i64]>) -> SyncResult<(Vec<Problem>, ExportStats)> {
        let ids = match ids {
            Some(ids) => ids.to_vec(),
            None => self.storage.problem_ids()?,
        };

        let mut stats = ExportStats::default();
        let mut problems = Vec::with_capacity(ids.len());
        for id in ids {
            match self.storage.get_problem(id)? {
                Some(problem) => {
                    stats.problems += 1;
                    stats.solutions += problem.solutions.len();
                    stats.implementations += problem.implementation_count();
                    problems.push(problem);
                }
                None => {
                    warn!(id, "Problem not found, skipping");
                    stats.skipped += 1;
                }
            }
        }

        if problems.is_empty() {
            return Err(SyncError::NothingToExport);
        }
        Ok((problems, stats))
    }
}

/// Render problems as CSV text with a header row.
///
/// Returns the text and the number of data rows.
#[must_use]
pub fn render_csv(problems: &[Problem]) -> (String, usize) {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push('\n');

    let mut rows = 0;
    for problem in problems {
        for row in csv_rows(problem) {
            let line: Vec<String> = row.iter().map(|v| csv_escape(v)).collect();
            out.push_str(&line.join(","));
            out.push('\n');
            rows += 1;
        }
    }
    (out, rows)
}
