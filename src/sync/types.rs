//! Document types for JSONL and CSV exchange.
//!
//! A [`ProblemDocument`] is the nested, self-contained form of one problem
//! tree, written as one JSON line. Field names follow the historical file
//! format (note the capitalised `Explanation`). Reading is lenient: missing
//! fields and `null` become empty, and `tags` may be a list or a
//! comma-delimited string.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{join_tags, normalize_tags, parse_tags, Difficulty, Implementation, Problem, Solution};

/// One problem tree as a nested document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDocument {
    #[serde(default, deserialize_with = "nullable_string")]
    pub platform: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub problem_description: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default, deserialize_with = "tags_field")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub solutions: Vec<SolutionDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolutionDocument {
    #[serde(default, deserialize_with = "nullable_string")]
    pub language: String,
    #[serde(default, deserialize_with = "nullable_vec")]
    pub implementations: Vec<ImplementationDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationDocument {
    #[serde(default, deserialize_with = "nullable_string")]
    pub method_name: String,
    #[serde(rename = "Explanation", default, deserialize_with = "nullable_string")]
    pub explanation: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub url: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub code: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub notes: String,
}

impl From<&Problem> for ProblemDocument {
    fn from(p: &Problem) -> Self {
        Self {
            platform: p.platform.clone(),
            title: p.title.clone(),
            problem_description: p.description.clone(),
            url: p.url.clone(),
            difficulty: p.difficulty,
            tags: normalize_tags(&p.tags),
            solutions: p
                .solutions
                .iter()
                .map(|s| SolutionDocument {
                    language: s.language.clone(),
                    implementations: s
                        .implementations
                        .iter()
                        .map(|i| ImplementationDocument {
                            method_name: i.method_name.clone(),
                            explanation: i.explanation.clone(),
                            url: i.url.clone(),
                            code: i.code.clone(),
                            notes: i.notes.clone(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl From<ProblemDocument> for Problem {
    fn from(doc: ProblemDocument) -> Self {
        Self {
            platform: doc.platform,
            title: doc.title,
            description: doc.problem_description,
            url: doc.url,
            difficulty: doc.difficulty,
            tags: normalize_tags(doc.tags),
            solutions: doc
                .solutions
                .into_iter()
                .map(|s| Solution {
                    language: s.language,
                    implementations: s
                        .implementations
                        .into_iter()
                        .map(|i| Implementation {
                            method_name: i.method_name,
                            explanation: i.explanation,
                            url: i.url,
                            code: i.code,
                            notes: i.notes,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

// ── CSV flattening ───────────────────────────────────────────

/// Fixed CSV header, one column per flattened field.
pub const CSV_HEADER: [&str; 12] = [
    "platform",
    "title",
    "problem_description",
    "url",
    "difficulty",
    "tags",
    "language",
    "method_name",
    "Explanation",
    "impl_url",
    "code",
    "notes",
];

/// Flatten a tree to one row per (solution, implementation) pair.
///
/// Problem and solution fields repeat on every row. A problem without
/// solutions, or a solution without implementations, yields no row.
#[must_use]
pub fn csv_rows(problem: &Problem) -> Vec<[String; 12]> {
    let tags = join_tags(&problem.tags);
    let mut rows = Vec::new();
    for solution in &problem.solutions {
        for imp in &solution.implementations {
            rows.push([
                problem.platform.clone(),
                problem.title.clone(),
                problem.description.clone(),
                problem.url.clone(),
                problem.difficulty.as_str().to_string(),
                tags.clone(),
                solution.language.clone(),
                imp.method_name.clone(),
                imp.explanation.clone(),
                imp.url.clone(),
                imp.code.clone(),
                imp.notes.clone(),
            ]);
        }
    }
    rows
}

// ── Lenient field readers ────────────────────────────────────

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_difficulty<'de, D>(deserializer: D) -> Result<Difficulty, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    Difficulty::parse(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "unknown difficulty `{raw}`, expected Easy, Medium, Hard or empty"
        ))
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsField {
    List(Vec<Option<String>>),
    Text(String),
}

fn tags_field<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<TagsField>::deserialize(deserializer)? {
        Some(TagsField::List(items)) => normalize_tags(items.into_iter().flatten()),
        Some(TagsField::Text(text)) => parse_tags(&text),
        None => Vec::new(),
    })
}

// ── Stats ────────────────────────────────────────────────────

/// Statistics for an export operation.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ExportStats {
    pub problems: usize,
    pub solutions: usize,
    pub implementations: usize,
    /// Data rows written (CSV only; equals `problems` for JSONL).
    pub rows: usize,
    /// Requested ids that no longer exist.
    pub skipped: usize,
}

/// Statistics for an import operation.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImportStats {
    /// Problems created (or validated, in dry-run mode).
    pub problems: usize,
    pub solutions: usize,
    pub implementations: usize,
    pub blank_lines: usize,
    pub dry_run: bool,
}

// ── Errors ───────────────────────────────────────────────────

/// Sync-specific errors.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// The selection contained no problems.
    #[error("No problems to export")]
    NothingToExport,

    /// Input file not found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// A line failed to parse or was rejected; earlier lines stay imported.
    #[error("Import stopped at line {line} ({imported} problem(s) already imported): {message}")]
    ImportAborted {
        /// Line number (1-indexed).
        line: usize,
        /// Problems committed before the failing line.
        imported: usize,
        message: String,
    },
}

impl From<rusqlite::Error> for SyncError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<crate::error::Error> for SyncError {
    fn from(err: crate::error::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn two_branch_problem() -> Problem {
        Problem {
            platform: "AtCoder".into(),
            title: "ABC 001 A".into(),
            description: "Compute a, b".into(),
            url: "https://atcoder.jp".into(),
            difficulty: Difficulty::Medium,
            tags: vec!["math".into(), "implementation".into()],
            solutions: vec![
                Solution {
                    language: "Rust".into(),
                    implementations: vec![
                        Implementation::new("direct", "fn main() {}"),
                        Implementation::new("iterative", "fn main() { loop {} }"),
                    ],
                },
                Solution::new("Python"),
            ],
        }
    }

    #[test]
    fn test_document_field_names() {
        let doc = ProblemDocument::from(&two_branch_problem());
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["problem_description"], "Compute a, b");
        assert_eq!(json["difficulty"], "Medium");
        assert_eq!(json["tags"], serde_json::json!(["math", "implementation"]));
        let imp = &json["solutions"][0]["implementations"][0];
        assert_eq!(imp["method_name"], "direct");
        assert!(imp.get("Explanation").is_some());
        assert!(imp.get("explanation").is_none());
    }

    #[test]
    fn test_unset_difficulty_serializes_empty() {
        let doc = ProblemDocument::from(&Problem::new("x"));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["difficulty"], "");
    }

    #[test]
    fn test_tags_accepted_as_string() {
        let doc: ProblemDocument =
            serde_json::from_str(r#"{"title":"t","tags":"a, b ,,c"}"#).unwrap();
        assert_eq!(doc.tags, vec!["a", "b", "c"]);
        assert_eq!(join_tags(&doc.tags), "a, b, c");
    }

    #[test]
    fn test_missing_and_null_fields_default() {
        let doc: ProblemDocument = serde_json::from_str(
            r#"{"title":"t","url":null,"difficulty":null,"tags":null,
                "solutions":[{"language":"C","implementations":[{"code":"int main(){}","notes":null}]}]}"#,
        )
        .unwrap();
        assert_eq!(doc.url, "");
        assert_eq!(doc.platform, "");
        assert_eq!(doc.difficulty, Difficulty::Unset);
        assert!(doc.tags.is_empty());
        let imp = &doc.solutions[0].implementations[0];
        assert_eq!(imp.code, "int main(){}");
        assert_eq!(imp.notes, "");
        assert_eq!(imp.explanation, "");
    }

    #[test]
    fn test_difficulty_case_insensitive_and_unknown_rejected() {
        let doc: ProblemDocument = serde_json::from_str(r#"{"difficulty":"hard"}"#).unwrap();
        assert_eq!(doc.difficulty, Difficulty::Hard);

        let err = serde_json::from_str::<ProblemDocument>(r#"{"difficulty":"Legendary"}"#);
        assert!(err.unwrap_err().to_string().contains("unknown difficulty"));
    }

    #[test]
    fn test_document_converts_to_same_tree() {
        let problem = two_branch_problem();
        let back: Problem = ProblemDocument::from(&problem).into();
        assert_eq!(back, problem);
    }

    #[test]
    fn test_csv_rows_skip_empty_branches() {
        let rows = csv_rows(&two_branch_problem());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][6], "Rust");
        assert_eq!(rows[0][5], "math, implementation");
        assert_eq!(rows[1][7], "iterative");

        assert!(csv_rows(&Problem::new("lonely")).is_empty());
    }
}
