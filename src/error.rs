//! Error types for cpcat.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

use crate::sync::SyncError;

/// Result type alias for cpcat operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts can match on either.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    SchemaMismatch,
    DatabaseError,

    // Not Found (exit 3)
    ProblemNotFound,

    // Validation (exit 4)
    InvalidDifficulty,
    InvalidArgument,
    RequiredField,

    // Sync (exit 6)
    SyncError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::SchemaMismatch => "SCHEMA_MISMATCH",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::ProblemNotFound => "PROBLEM_NOT_FOUND",
            Self::InvalidDifficulty => "INVALID_DIFFICULTY",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::RequiredField => "REQUIRED_FIELD",
            Self::SyncError => "SYNC_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
        }
    }

    /// Category-based exit code (2-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::NotInitialized
            | Self::AlreadyInitialized
            | Self::SchemaMismatch
            | Self::DatabaseError => 2,
            Self::ProblemNotFound => 3,
            Self::InvalidDifficulty | Self::InvalidArgument | Self::RequiredField => 4,
            Self::SyncError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether the same command could succeed with corrected input.
    ///
    /// Nothing is retried automatically; this only informs the caller.
    #[must_use]
    pub const fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            Self::InvalidDifficulty | Self::InvalidArgument | Self::RequiredField
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in cpcat operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `cpcat init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Schema mismatch: missing {}", missing.join(", "))]
    SchemaMismatch {
        /// `table.column` entries that could not be migrated.
        missing: Vec<String>,
    },

    #[error("Problem not found: {id}")]
    ProblemNotFound { id: i64 },

    #[error("Required field is empty: {field}")]
    RequiredField { field: &'static str },

    #[error("Invalid difficulty: {value}")]
    InvalidDifficulty {
        value: String,
        suggestion: Option<String>,
    },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Sync(#[from] SyncError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::SchemaMismatch { .. } => ErrorCode::SchemaMismatch,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::ProblemNotFound { .. } => ErrorCode::ProblemNotFound,
            Self::RequiredField { .. } => ErrorCode::RequiredField,
            Self::InvalidDifficulty { .. } => ErrorCode::InvalidDifficulty,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Sync(_) => ErrorCode::SyncError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => Some("Run `cpcat init` to create the database".to_string()),

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to recreate it (all data is lost).",
                path.display()
            )),

            Self::SchemaMismatch { .. } => Some(
                "The database was created by an incompatible version.\n  \
                 Export what you can, then run `cpcat check --reset` to delete and recreate it.\n  \
                 Re-import afterwards with `cpcat import <file.jsonl>`."
                    .to_string(),
            ),

            Self::ProblemNotFound { id } => Some(format!(
                "No problem with ID {id}. Use `cpcat list` to see available problems."
            )),

            Self::RequiredField { field } => Some(format!("Provide a non-empty {field}.")),

            Self::InvalidDifficulty { suggestion, .. } => Some(match suggestion {
                Some(s) => format!("Did you mean: {s}? Valid difficulties: Easy, Medium, Hard"),
                None => "Valid difficulties: Easy, Medium, Hard (or empty for unset)".to_string(),
            }),

            Self::Sync(SyncError::ImportAborted { imported, .. }) if *imported > 0 => Some(format!(
                "{imported} problem(s) before the failing line were already imported. \
                 Fix the line and import only the remaining lines to avoid duplicates."
            )),

            Self::Sync(SyncError::NothingToExport) => {
                Some("Add problems with `cpcat add` or `cpcat import` first.".to_string())
            }

            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Sync(_)
            | Self::InvalidArgument(_)
            | Self::Config(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "correctable": code.is_user_correctable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        assert_eq!(Error::NotInitialized.exit_code(), 2);
        assert_eq!(Error::SchemaMismatch { missing: vec![] }.exit_code(), 2);
        assert_eq!(Error::ProblemNotFound { id: 7 }.exit_code(), 3);
        assert_eq!(Error::RequiredField { field: "title" }.exit_code(), 4);
        assert_eq!(Error::Sync(SyncError::NothingToExport).exit_code(), 6);
    }

    #[test]
    fn test_schema_mismatch_message_and_hint() {
        let err = Error::SchemaMismatch {
            missing: vec!["solutions.problem_id".into(), "implementations.id".into()],
        };
        assert_eq!(
            err.to_string(),
            "Schema mismatch: missing solutions.problem_id, implementations.id"
        );
        assert!(err.hint().unwrap().contains("cpcat check --reset"));
    }

    #[test]
    fn test_structured_json() {
        let err = Error::RequiredField { field: "title" };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "REQUIRED_FIELD");
        assert_eq!(json["error"]["exit_code"], 4);
        assert_eq!(json["error"]["correctable"], true);
        assert!(json["error"]["hint"].is_string());
    }

    #[test]
    fn test_import_abort_hint_only_after_progress() {
        let none_committed = Error::Sync(SyncError::ImportAborted {
            line: 1,
            imported: 0,
            message: "bad".into(),
        });
        assert!(none_committed.hint().is_none());

        let some_committed = Error::Sync(SyncError::ImportAborted {
            line: 4,
            imported: 3,
            message: "bad".into(),
        });
        assert!(some_committed.hint().unwrap().contains("3 problem(s)"));
    }
}
