//! JSONL import.
//!
//! Each non-blank line is one problem document and goes through the same
//! insert path as `cpcat add`, in its own transaction. Nothing is matched
//! against existing rows, so importing a file twice duplicates it. The
//! first bad line stops the import; lines before it stay committed.

use std::io::BufRead;
use std::path::Path;

use tracing::{debug, info};

use crate::model::Problem;
use crate::storage::sqlite::SqliteStorage;
use crate::sync::file::open_jsonl;
use crate::sync::types::{ImportStats, ProblemDocument, SyncError, SyncResult};
use crate::validate::validate_problem;

/// Importer for JSONL files.
pub struct Importer<'a> {
    storage: &'a mut SqliteStorage,
    dry_run: bool,
}

impl<'a> Importer<'a> {
    #[must_use]
    pub fn new(storage: &'a mut SqliteStorage) -> Self {
        Self {
            storage,
            dry_run: false,
        }
    }

    /// Parse and validate every line without writing.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Import a JSONL file.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::FileNotFound`] for a missing file and
    /// [`SyncError::ImportAborted`] for the first line that cannot be
    /// parsed or written.
    pub fn import_file(&mut self, path: &Path) -> SyncResult<ImportStats> {
        let reader = open_jsonl(path)?;
        info!(path = %path.display(), dry_run = self.dry_run, "Importing JSONL");
        self.import_reader(reader)
    }

    /// Import from any line-oriented reader.
    ///
    /// # Errors
    ///
    /// See [`Importer::import_file`].
    pub fn import_reader<R: BufRead>(&mut self, reader: R) -> SyncResult<ImportStats> {
        let mut stats = ImportStats {
            dry_run: self.dry_run,
            ..ImportStats::default()
        };

        for (idx, line) in reader.lines().enumerate() {
            let line_no = idx + 1;
            let imported = if self.dry_run { 0 } else { stats.problems };
            let abort = |message: String| SyncError::ImportAborted {
                line: line_no,
                imported,
                message,
            };

            let line = line.map_err(|e| abort(e.to_string()))?;
            if line.trim().is_empty() {
                stats.blank_lines += 1;
                continue;
            }

            let document: ProblemDocument =
                serde_json::from_str(&line).map_err(|e| abort(e.to_string()))?;
            let problem = Problem::from(document);

            if self.dry_run {
                validate_problem(&problem).map_err(|e| abort(e.to_string()))?;
            } else {
                let id = self
                    .storage
                    .add_problem(&problem)
                    .map_err(|e| abort(e.to_string()))?;
                debug!(line = line_no, id, "Imported problem");
            }

            stats.problems += 1;
            stats.solutions += problem.solutions.len();
            stats.implementations += problem.implementation_count();
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Difficulty;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    const TWO_PROBLEMS: &str = r#"{"platform":"LeetCode","title":"Two Sum","problem_description":"","url":"","difficulty":"Easy","tags":["array"],"solutions":[{"language":"Rust","implementations":[{"method_name":"map","Explanation":"","url":"","code":"fn f(){}","notes":""}]}]}

{"title":"Knapsack","tags":"dp, , optimization","difficulty":"medium"}
"#;

    #[test]
    fn test_import_creates_trees() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let stats = Importer::new(&mut storage)
            .import_reader(Cursor::new(TWO_PROBLEMS))
            .unwrap();

        assert_eq!(stats.problems, 2);
        assert_eq!(stats.solutions, 1);
        assert_eq!(stats.implementations, 1);
        assert_eq!(stats.blank_lines, 1);

        let ids = storage.problem_ids().unwrap();
        let knapsack = storage.get_problem(ids[1]).unwrap().unwrap();
        assert_eq!(knapsack.tags, vec!["dp", "optimization"]);
        assert_eq!(knapsack.difficulty, Difficulty::Medium);

        let two_sum = storage.get_problem(ids[0]).unwrap().unwrap();
        assert_eq!(two_sum.solutions[0].implementations[0].code, "fn f(){}");
    }

    #[test]
    fn test_list_tag_containing_delimiter_round_trips() {
        let line = r#"{"title":"Edit Distance","tags":["dp,strings","dp"]}"#;
        let expected = Problem::from(serde_json::from_str::<ProblemDocument>(line).unwrap());
        assert_eq!(expected.tags, vec!["dp", "strings"]);

        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage)
            .import_reader(Cursor::new(line))
            .unwrap();

        let id = storage.problem_ids().unwrap()[0];
        assert_eq!(storage.get_problem(id).unwrap().unwrap(), expected);
    }

    #[test]
    fn test_import_twice_duplicates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dataset.jsonl");
        fs::write(&path, TWO_PROBLEMS).unwrap();

        let mut storage = SqliteStorage::open_memory().unwrap();
        Importer::new(&mut storage).import_file(&path).unwrap();
        Importer::new(&mut storage).import_file(&path).unwrap();

        assert_eq!(storage.problem_ids().unwrap().len(), 4);
    }

    #[test]
    fn test_malformed_line_keeps_earlier_rows() {
        let input = format!("{TWO_PROBLEMS}{{not json\n{{\"title\":\"never\"}}\n");
        let mut storage = SqliteStorage::open_memory().unwrap();

        let err = Importer::new(&mut storage)
            .import_reader(Cursor::new(input))
            .unwrap_err();

        match err {
            SyncError::ImportAborted { line, imported, .. } => {
                assert_eq!(line, 4);
                assert_eq!(imported, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(storage.problem_ids().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_utf8_line_aborts_with_position() {
        let mut input = b"{\"title\":\"ok\"}\n{\"title\":\"".to_vec();
        input.extend_from_slice(&[0xff, 0xfe]);
        input.extend_from_slice(b"\"}\n");
        let mut storage = SqliteStorage::open_memory().unwrap();

        let err = Importer::new(&mut storage)
            .import_reader(Cursor::new(input))
            .unwrap_err();
        assert!(matches!(err, SyncError::ImportAborted { line: 2, imported: 1, .. }));
        assert_eq!(storage.problem_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_title_aborts() {
        let input = "{\"title\":\"ok\"}\n{\"title\":\"  \"}\n";
        let mut storage = SqliteStorage::open_memory().unwrap();

        let err = Importer::new(&mut storage)
            .import_reader(Cursor::new(input))
            .unwrap_err();
        assert!(matches!(err, SyncError::ImportAborted { line: 2, imported: 1, .. }));
        assert_eq!(storage.problem_ids().unwrap().len(), 1);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let stats = Importer::new(&mut storage)
            .dry_run(true)
            .import_reader(Cursor::new(TWO_PROBLEMS))
            .unwrap();

        assert!(stats.dry_run);
        assert_eq!(stats.problems, 2);
        assert!(storage.problem_ids().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let result = Importer::new(&mut storage).import_file(Path::new("/nonexistent/x.jsonl"));
        assert!(matches!(result, Err(SyncError::FileNotFound(_))));
    }
}
