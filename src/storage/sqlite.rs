//! SQLite storage implementation.
//!
//! Every write goes through [`SqliteStorage::mutate`], which wraps the
//! closure in an IMMEDIATE transaction. A problem tree is always written
//! whole: insert allocates new ids for the problem and every child, and
//! replace drops the existing children before re-inserting the submitted
//! ones.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, Row, Transaction};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{join_tags, parse_tags, Difficulty, Implementation, Problem, Solution};
use crate::storage::schema::{apply_schema, check_schema, SchemaReport};
use crate::validate::validate_problem;

/// How long a write waits on another connection's lock.
const BUSY_TIMEOUT: Duration = Duration::from_millis(5000);

/// SQLite-based storage backend.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
}

/// Counters for a single mutation, logged after commit.
#[derive(Debug, Default)]
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    pub problems_written: usize,
    pub problems_deleted: usize,
    pub solutions_written: usize,
    pub implementations_written: usize,
}

impl MutationContext {
    /// Create a new mutation context.
    #[must_use]
    pub fn new(op_name: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            ..Self::default()
        }
    }
}

/// One row of `cpcat list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemSummary {
    pub id: i64,
    pub platform: String,
    pub title: String,
    pub url: String,
    pub difficulty: Difficulty,
    pub tags: Vec<String>,
    pub solution_count: usize,
    pub implementation_count: usize,
    pub updated_at: Option<i64>,
}

/// Filters for [`SqliteStorage::list_problems`].
#[derive(Debug, Clone, Default)]
pub struct ProblemFilter {
    /// Exact platform match, case-insensitive.
    pub platform: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// Problem must carry this tag, case-insensitive.
    pub tag: Option<String>,
    /// Substring of title or description.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

/// Aggregate counts feeding the charts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogCounts {
    pub problems: usize,
    pub solutions: usize,
    pub implementations: usize,
    /// Every difficulty, including zero counts, in display order.
    pub by_difficulty: Vec<(Difficulty, usize)>,
    /// Sorted by count descending, then name.
    pub by_tag: Vec<(String, usize)>,
    /// Solutions per language label, sorted by count descending, then name.
    pub by_language: Vec<(String, usize)>,
}

impl SqliteStorage {
    /// Open a database at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the
    /// schema check fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        apply_schema(&conn)?;
        debug!(path = %path.display(), "Opened catalogue");
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Inspect a database file without migrating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or queried.
    pub fn inspect(path: &Path) -> Result<SchemaReport> {
        let conn = Connection::open(path)?;
        check_schema(&conn)
    }

    /// Delete the database file (with WAL side files) and recreate it empty.
    ///
    /// All data is lost.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be removed or the new database
    /// cannot be created.
    pub fn reset(path: &Path) -> Result<Self> {
        for file in store_files(path) {
            if file.exists() {
                fs::remove_file(&file)?;
                info!(path = %file.display(), "Removed store file");
            }
        }
        Self::open(path)
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Execute a mutation inside an IMMEDIATE transaction.
    ///
    /// The transaction commits only if the closure succeeds; any error
    /// drops it, which rolls back every statement it ran.
    ///
    /// # Errors
    ///
    /// Returns the closure's error or a database error from begin/commit.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op);
        let result = f(&tx, &mut ctx)?;
        tx.commit()?;

        debug!(
            op = %ctx.op_name,
            problems = ctx.problems_written,
            deleted = ctx.problems_deleted,
            solutions = ctx.solutions_written,
            implementations = ctx.implementations_written,
            "Mutation committed"
        );
        Ok(result)
    }

    // ==================
    // Problem Tree Writes
    // ==================

    /// Insert a complete problem tree, returning the new problem id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredField`] for a blank title (nothing is
    /// written), or a database error.
    pub fn add_problem(&mut self, problem: &Problem) -> Result<i64> {
        validate_problem(problem)?;
        let now = chrono::Utc::now().timestamp_millis();

        self.mutate("add_problem", |tx, ctx| {
            tx.execute(
                "INSERT INTO problems (platform, title, problem_description, url, difficulty, tags, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
                rusqlite::params![
                    problem.platform,
                    problem.title,
                    problem.description,
                    problem.url,
                    problem.difficulty.as_str(),
                    join_tags(&problem.tags),
                    now,
                ],
            )?;
            let id = tx.last_insert_rowid();
            ctx.problems_written += 1;

            insert_solutions(tx, id, &problem.solutions, ctx)?;
            Ok(id)
        })
    }

    /// Replace a problem's scalars and regenerate its whole subtree.
    ///
    /// Existing solutions are deleted (implementations cascade) and the
    /// submitted ones are inserted with fresh ids.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredField`] for a blank title,
    /// [`Error::ProblemNotFound`] if `id` does not exist, or a database
    /// error. In every error case the stored tree is unchanged.
    pub fn replace_problem(&mut self, id: i64, problem: &Problem) -> Result<()> {
        validate_problem(problem)?;
        let now = chrono::Utc::now().timestamp_millis();

        self.mutate("replace_problem", |tx, ctx| {
            let updated = tx.execute(
                "UPDATE problems
                 SET platform = ?1, title = ?2, problem_description = ?3, url = ?4,
                     difficulty = ?5, tags = ?6, updated_at = ?7
                 WHERE id = ?8",
                rusqlite::params![
                    problem.platform,
                    problem.title,
                    problem.description,
                    problem.url,
                    problem.difficulty.as_str(),
                    join_tags(&problem.tags),
                    now,
                    id,
                ],
            )?;
            if updated == 0 {
                return Err(Error::ProblemNotFound { id });
            }
            ctx.problems_written += 1;

            let dropped = tx.execute("DELETE FROM solutions WHERE problem_id = ?1", [id])?;
            debug!(problem_id = id, dropped, "Cleared solution subtree");

            insert_solutions(tx, id, &problem.solutions, ctx)?;
            Ok(())
        })
    }

    /// Delete problems by id; solutions and implementations cascade.
    ///
    /// Unknown ids are ignored. Returns the number of problems removed.
    ///
    /// # Errors
    ///
    /// Returns a database error; no problem is removed in that case.
    pub fn delete_problems(&mut self, ids: &[i64]) -> Result<usize> {
        self.mutate("delete_problems", |tx, ctx| {
            let mut stmt = tx.prepare("DELETE FROM problems WHERE id = ?1")?;
            for id in ids {
                ctx.problems_deleted += stmt.execute([id])?;
            }
            Ok(ctx.problems_deleted)
        })
    }

    // ==================
    // Problem Reads
    // ==================

    /// Load a full problem tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn get_problem(&self, id: i64) -> Result<Option<Problem>> {
        let problem = self
            .conn
            .query_row(
                "SELECT platform, title, problem_description, url, difficulty, tags
                 FROM problems WHERE id = ?1",
                [id],
                |row| {
                    Ok(Problem {
                        platform: text(row, 0)?,
                        title: text(row, 1)?,
                        description: text(row, 2)?,
                        url: text(row, 3)?,
                        difficulty: stored_difficulty(row.get(4)?),
                        tags: parse_tags(&text(row, 5)?),
                        solutions: Vec::new(),
                    })
                },
            )
            .optional()?;

        let Some(mut problem) = problem else {
            return Ok(None);
        };

        let mut sol_stmt = self
            .conn
            .prepare("SELECT id, language FROM solutions WHERE problem_id = ?1 ORDER BY id")?;
        let mut impl_stmt = self.conn.prepare(
            "SELECT method_name, explanation, url, code, notes
             FROM implementations WHERE solution_id = ?1 ORDER BY id",
        )?;

        let solutions = sol_stmt
            .query_map([id], |row| Ok((row.get::<_, i64>(0)?, text(row, 1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (solution_id, language) in solutions {
            let implementations = impl_stmt
                .query_map([solution_id], |row| {
                    Ok(Implementation {
                        method_name: text(row, 0)?,
                        explanation: text(row, 1)?,
                        url: text(row, 2)?,
                        code: text(row, 3)?,
                        notes: text(row, 4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            problem.solutions.push(Solution {
                language,
                implementations,
            });
        }

        Ok(Some(problem))
    }

    /// Check whether a problem id exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn problem_exists(&self, id: i64) -> Result<bool> {
        Ok(self
            .conn
            .prepare("SELECT 1 FROM problems WHERE id = ?1")?
            .exists([id])?)
    }

    /// All problem ids in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn problem_ids(&self) -> Result<Vec<i64>> {
        let ids = self
            .conn
            .prepare("SELECT id FROM problems ORDER BY id")?
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Solution ids owned by a problem, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn solution_ids(&self, problem_id: i64) -> Result<Vec<i64>> {
        let ids = self
            .conn
            .prepare("SELECT id FROM solutions WHERE problem_id = ?1 ORDER BY id")?
            .query_map([problem_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Implementation ids owned by a solution, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn implementation_ids(&self, solution_id: i64) -> Result<Vec<i64>> {
        let ids = self
            .conn
            .prepare("SELECT id FROM implementations WHERE solution_id = ?1 ORDER BY id")?
            .query_map([solution_id], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn solution_exists(&self, id: i64) -> Result<bool> {
        Ok(self
            .conn
            .prepare("SELECT 1 FROM solutions WHERE id = ?1")?
            .exists([id])?)
    }

    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn implementation_exists(&self, id: i64) -> Result<bool> {
        Ok(self
            .conn
            .prepare("SELECT 1 FROM implementations WHERE id = ?1")?
            .exists([id])?)
    }

    /// List problem summaries with optional filters, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_problems(&self, filter: &ProblemFilter) -> Result<Vec<ProblemSummary>> {
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();
        let mut param_idx = 1;

        if let Some(platform) = &filter.platform {
            conditions.push(format!("COALESCE(p.platform, '') = ?{param_idx} COLLATE NOCASE"));
            params.push(platform.clone());
            param_idx += 1;
        }

        if let Some(difficulty) = filter.difficulty {
            conditions.push(format!("COALESCE(p.difficulty, '') = ?{param_idx}"));
            params.push(difficulty.as_str().to_string());
            param_idx += 1;
        }

        if let Some(search) = &filter.search {
            conditions.push(format!(
                "(p.title LIKE ?{param_idx} COLLATE NOCASE OR p.problem_description LIKE ?{param_idx} COLLATE NOCASE)"
            ));
            params.push(format!("%{search}%"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT p.id, p.platform, p.title, p.url, p.difficulty, p.tags, p.updated_at,
                    (SELECT COUNT(*) FROM solutions s WHERE s.problem_id = p.id),
                    (SELECT COUNT(*) FROM implementations i
                       JOIN solutions s ON i.solution_id = s.id
                      WHERE s.problem_id = p.id)
             FROM problems p{where_clause}
             ORDER BY p.id"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params.iter()), |row| {
            Ok(ProblemSummary {
                id: row.get(0)?,
                platform: text(row, 1)?,
                title: text(row, 2)?,
                url: text(row, 3)?,
                difficulty: stored_difficulty(row.get(4)?),
                tags: parse_tags(&text(row, 5)?),
                updated_at: row.get(6)?,
                solution_count: row.get::<_, i64>(7)?.try_into().unwrap_or(0),
                implementation_count: row.get::<_, i64>(8)?.try_into().unwrap_or(0),
            })
        })?;

        let tag = filter.tag.as_deref().map(str::to_lowercase);
        let mut out = Vec::new();
        for row in rows {
            if filter.limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
            let summary = row?;
            if let Some(tag) = &tag {
                if !summary.tags.iter().any(|t| t.to_lowercase() == *tag) {
                    continue;
                }
            }
            out.push(summary);
        }

        Ok(out)
    }

    // ==================
    // Aggregates
    // ==================

    /// Read-only counts by difficulty, tag and language.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn counts(&self) -> Result<CatalogCounts> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n.try_into().unwrap_or(0))
        };

        let mut counts = CatalogCounts {
            problems: count("SELECT COUNT(*) FROM problems")?,
            solutions: count("SELECT COUNT(*) FROM solutions")?,
            implementations: count("SELECT COUNT(*) FROM implementations")?,
            ..CatalogCounts::default()
        };

        let mut by_difficulty: HashMap<Difficulty, usize> = HashMap::new();
        let mut by_tag: HashMap<String, usize> = HashMap::new();
        {
            let mut stmt = self.conn.prepare("SELECT difficulty, tags FROM problems")?;
            let rows = stmt.query_map([], |row| {
                Ok((stored_difficulty(row.get(0)?), text(row, 1)?))
            })?;
            for row in rows {
                let (difficulty, tags) = row?;
                *by_difficulty.entry(difficulty).or_default() += 1;
                for tag in parse_tags(&tags) {
                    *by_tag.entry(tag).or_default() += 1;
                }
            }
        }
        counts.by_difficulty = Difficulty::ALL
            .iter()
            .map(|d| (*d, by_difficulty.get(d).copied().unwrap_or(0)))
            .collect();
        counts.by_tag = sorted_counts(by_tag);

        let mut by_language: HashMap<String, usize> = HashMap::new();
        {
            let mut stmt = self.conn.prepare("SELECT language FROM solutions")?;
            let rows = stmt.query_map([], |row| text(row, 0))?;
            for language in rows {
                *by_language.entry(language?.trim().to_string()).or_default() += 1;
            }
        }
        counts.by_language = sorted_counts(by_language);

        Ok(counts)
    }
}

/// Insert solutions (and their implementations) under `problem_id`.
fn insert_solutions(
    tx: &Transaction,
    problem_id: i64,
    solutions: &[Solution],
    ctx: &mut MutationContext,
) -> Result<()> {
    let mut sol_stmt = tx.prepare("INSERT INTO solutions (problem_id, language) VALUES (?1, ?2)")?;
    let mut impl_stmt = tx.prepare(
        "INSERT INTO implementations (solution_id, method_name, explanation, url, code, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for solution in solutions {
        sol_stmt.execute(rusqlite::params![problem_id, solution.language])?;
        let solution_id = tx.last_insert_rowid();
        ctx.solutions_written += 1;

        for imp in &solution.implementations {
            impl_stmt.execute(rusqlite::params![
                solution_id,
                imp.method_name,
                imp.explanation,
                imp.url,
                imp.code,
                imp.notes,
            ])?;
            ctx.implementations_written += 1;
        }
    }

    Ok(())
}

/// Read a nullable TEXT column as a string (NULL becomes empty).
fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

/// Map a stored difficulty to the enum; unknown values read as unset.
fn stored_difficulty(value: Option<String>) -> Difficulty {
    let value = value.unwrap_or_default();
    Difficulty::parse(&value).unwrap_or_else(|| {
        warn!(value = %value, "Unrecognised stored difficulty, treating as unset");
        Difficulty::Unset
    })
}

fn sorted_counts(map: HashMap<String, usize>) -> Vec<(String, usize)> {
    let mut out: Vec<(String, usize)> = map.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// The database file plus the side files WAL mode creates.
fn store_files(path: &Path) -> [PathBuf; 3] {
    let with_suffix = |suffix: &str| {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        PathBuf::from(name)
    };
    [path.to_path_buf(), with_suffix("-wal"), with_suffix("-shm")]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_problem() -> Problem {
        Problem {
            platform: "LeetCode".to_string(),
            title: "Two Sum".to_string(),
            description: "Find two numbers adding up to target.".to_string(),
            url: "https://leetcode.com/problems/two-sum/".to_string(),
            difficulty: Difficulty::Easy,
            tags: vec!["array".to_string(), "hash table".to_string()],
            solutions: vec![
                Solution {
                    language: "Rust".to_string(),
                    implementations: vec![
                        Implementation {
                            method_name: "hash map".to_string(),
                            explanation: "One pass with a map of complements.".to_string(),
                            url: "https://example.com/rust-map".to_string(),
                            code: "fn two_sum() {}".to_string(),
                            notes: "O(n)".to_string(),
                        },
                        Implementation {
                            method_name: "brute force".to_string(),
                            explanation: "Check every pair.".to_string(),
                            url: String::new(),
                            code: "fn two_sum_slow() {}".to_string(),
                            notes: "O(n^2)".to_string(),
                        },
                    ],
                },
                Solution::new("Python"),
            ],
        }
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_round_trip() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let problem = sample_problem();

        let id = storage.add_problem(&problem).unwrap();
        let loaded = storage.get_problem(id).unwrap().unwrap();

        assert_eq!(loaded, problem);
        assert_eq!(loaded.tags, vec!["array", "hash table"]);
    }

    #[test]
    fn test_get_missing_problem() {
        let storage = SqliteStorage::open_memory().unwrap();
        assert!(storage.get_problem(42).unwrap().is_none());
    }

    #[test]
    fn test_empty_title_rejected_without_write() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut problem = sample_problem();
        problem.title = "   ".to_string();

        let err = storage.add_problem(&problem).unwrap_err();
        assert!(matches!(err, Error::RequiredField { field: "title" }));
        assert!(storage.problem_ids().unwrap().is_empty());
    }

    #[test]
    fn test_cascade_delete() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = storage.add_problem(&sample_problem()).unwrap();

        let solution_ids = storage.solution_ids(id).unwrap();
        assert_eq!(solution_ids.len(), 2);
        let impl_ids = storage.implementation_ids(solution_ids[0]).unwrap();
        assert_eq!(impl_ids.len(), 2);

        assert_eq!(storage.delete_problems(&[id]).unwrap(), 1);

        assert!(storage.get_problem(id).unwrap().is_none());
        for sid in &solution_ids {
            assert!(!storage.solution_exists(*sid).unwrap());
        }
        for iid in &impl_ids {
            assert!(!storage.implementation_exists(*iid).unwrap());
        }
    }

    #[test]
    fn test_delete_ignores_unknown_ids() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = storage.add_problem(&sample_problem()).unwrap();
        assert_eq!(storage.delete_problems(&[id, 999]).unwrap(), 1);
    }

    #[test]
    fn test_replace_with_fewer_solutions() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = storage.add_problem(&sample_problem()).unwrap();
        let old_solution_ids = storage.solution_ids(id).unwrap();
        let old_impl_ids = storage.implementation_ids(old_solution_ids[0]).unwrap();

        let mut edited = sample_problem();
        edited.title = "Two Sum II".to_string();
        edited.solutions = vec![Solution {
            language: "Go".to_string(),
            implementations: vec![Implementation::new("two pointers", "func main() {}")],
        }];
        storage.replace_problem(id, &edited).unwrap();

        let loaded = storage.get_problem(id).unwrap().unwrap();
        assert_eq!(loaded, edited);

        let new_solution_ids = storage.solution_ids(id).unwrap();
        assert_eq!(new_solution_ids.len(), 1);
        for sid in &old_solution_ids {
            assert!(!storage.solution_exists(*sid).unwrap());
        }
        for iid in &old_impl_ids {
            assert!(!storage.implementation_exists(*iid).unwrap());
        }

        let orphans: i64 = storage
            .conn()
            .query_row(
                "SELECT COUNT(*) FROM implementations WHERE solution_id NOT IN (SELECT id FROM solutions)",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(orphans, 0);
    }

    #[test]
    fn test_replace_keeps_problem_id_and_created_at() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = storage.add_problem(&sample_problem()).unwrap();
        let created: i64 = storage
            .conn()
            .query_row("SELECT created_at FROM problems WHERE id = ?1", [id], |r| r.get(0))
            .unwrap();

        storage.replace_problem(id, &Problem::new("Renamed")).unwrap();

        assert_eq!(storage.problem_ids().unwrap(), vec![id]);
        let after: i64 = storage
            .conn()
            .query_row("SELECT created_at FROM problems WHERE id = ?1", [id], |r| r.get(0))
            .unwrap();
        assert_eq!(after, created);
        assert!(storage.solution_ids(id).unwrap().is_empty());
    }

    #[test]
    fn test_replace_missing_problem() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let err = storage.replace_problem(7, &sample_problem()).unwrap_err();
        assert!(matches!(err, Error::ProblemNotFound { id: 7 }));
        assert!(storage.problem_ids().unwrap().is_empty());
    }

    #[test]
    fn test_replace_with_empty_title_leaves_tree() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let id = storage.add_problem(&sample_problem()).unwrap();

        let mut edited = sample_problem();
        edited.title = String::new();
        edited.solutions.clear();
        assert!(storage.replace_problem(id, &edited).is_err());

        assert_eq!(storage.get_problem(id).unwrap().unwrap(), sample_problem());
    }

    #[test]
    fn test_duplicate_language_labels_allowed() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let mut problem = Problem::new("Dup");
        problem.solutions = vec![Solution::new("C++"), Solution::new("C++")];

        let id = storage.add_problem(&problem).unwrap();
        assert_eq!(storage.get_problem(id).unwrap().unwrap().solutions.len(), 2);
    }

    #[test]
    fn test_null_columns_read_as_empty() {
        let storage = SqliteStorage::open_memory().unwrap();
        storage
            .conn()
            .execute("INSERT INTO problems (title) VALUES ('Legacy')", [])
            .unwrap();
        storage
            .conn()
            .execute("INSERT INTO problems (title, difficulty) VALUES ('Odd', 'Impossible')", [])
            .unwrap();

        let legacy = storage.get_problem(1).unwrap().unwrap();
        assert_eq!(legacy.title, "Legacy");
        assert_eq!(legacy.platform, "");
        assert_eq!(legacy.difficulty, Difficulty::Unset);
        assert!(legacy.tags.is_empty());

        let odd = storage.get_problem(2).unwrap().unwrap();
        assert_eq!(odd.difficulty, Difficulty::Unset);
    }

    #[test]
    fn test_list_filters() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add_problem(&sample_problem()).unwrap();

        let mut other = Problem::new("Shortest Path");
        other.platform = "Codeforces".to_string();
        other.difficulty = Difficulty::Hard;
        other.tags = vec!["graphs".to_string()];
        storage.add_problem(&other).unwrap();

        let all = storage.list_problems(&ProblemFilter::default()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].solution_count, 2);
        assert_eq!(all[0].implementation_count, 2);

        let hard = storage
            .list_problems(&ProblemFilter {
                difficulty: Some(Difficulty::Hard),
                ..ProblemFilter::default()
            })
            .unwrap();
        assert_eq!(hard.len(), 1);
        assert_eq!(hard[0].title, "Shortest Path");

        let tagged = storage
            .list_problems(&ProblemFilter {
                tag: Some("HASH TABLE".to_string()),
                ..ProblemFilter::default()
            })
            .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].title, "Two Sum");

        let searched = storage
            .list_problems(&ProblemFilter {
                search: Some("numbers".to_string()),
                platform: Some("leetcode".to_string()),
                ..ProblemFilter::default()
            })
            .unwrap();
        assert_eq!(searched.len(), 1);

        let limited = storage
            .list_problems(&ProblemFilter {
                limit: Some(1),
                ..ProblemFilter::default()
            })
            .unwrap();
        assert_eq!(limited.len(), 1);

        let none = storage
            .list_problems(&ProblemFilter {
                limit: Some(0),
                ..ProblemFilter::default()
            })
            .unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_counts() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        storage.add_problem(&sample_problem()).unwrap();
        let mut other = Problem::new("Knapsack");
        other.difficulty = Difficulty::Medium;
        other.tags = vec!["dp".to_string(), "array".to_string()];
        other.solutions = vec![Solution::new("Rust")];
        storage.add_problem(&other).unwrap();

        let counts = storage.counts().unwrap();
        assert_eq!(counts.problems, 2);
        assert_eq!(counts.solutions, 3);
        assert_eq!(counts.implementations, 2);
        assert_eq!(
            counts.by_difficulty,
            vec![
                (Difficulty::Unset, 0),
                (Difficulty::Easy, 1),
                (Difficulty::Medium, 1),
                (Difficulty::Hard, 0),
            ]
        );
        assert_eq!(counts.by_tag[0], ("array".to_string(), 2));
        assert_eq!(counts.by_language[0], ("Rust".to_string(), 2));
        assert_eq!(counts.by_language[1], ("Python".to_string(), 1));
    }

    #[test]
    fn test_reset_recreates_empty_store() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("catalogue.db");
        {
            let mut storage = SqliteStorage::open(&path).unwrap();
            storage.add_problem(&sample_problem()).unwrap();
        }

        let storage = SqliteStorage::reset(&path).unwrap();
        assert!(storage.problem_ids().unwrap().is_empty());
        assert!(SqliteStorage::inspect(&path).unwrap().is_healthy());
    }
}
