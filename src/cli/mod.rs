//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// cpcat - Catalogue competitive programming problems and their solutions
#[derive(Parser, Debug)]
#[command(name = "cpcat", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: <data dir>/cpcat/cp_dataset.db)
    #[arg(long, global = true, env = "CPCAT_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output only the affected ID(s)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Preview changes without writing to the database
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the problem database
    Init {
        /// Delete and recreate an existing database (all data is lost)
        #[arg(long)]
        force: bool,
    },

    /// Print version information
    Version,

    /// Add a problem
    Add(ProblemArgs),

    /// Replace a problem and its whole solution tree
    Edit {
        /// Problem ID
        id: i64,

        #[command(flatten)]
        args: ProblemArgs,
    },

    /// Show a problem with its solutions and implementations
    Show {
        /// Problem ID
        id: i64,
    },

    /// List problems
    List(ListArgs),

    /// Delete problems (solutions and implementations go with them)
    Delete {
        /// Problem IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Export problems to a file
    Export {
        /// File format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file
        path: PathBuf,

        /// Only these problem IDs (comma-separated; default: all)
        #[arg(long, value_delimiter = ',')]
        ids: Vec<i64>,
    },

    /// Import problems from a JSONL file (always appends)
    Import {
        /// Input JSONL file
        path: PathBuf,
    },

    /// Show counts by difficulty, tag and language as bar charts
    Stats {
        /// Which breakdown to show
        #[arg(long, value_enum, default_value_t)]
        by: StatsDimension,

        /// Maximum bars per chart for tags and languages
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// Verify the database schema
    Check {
        /// Delete the database file and recreate empty tables (all data is lost)
        #[arg(long)]
        reset: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Export file formats.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// One nested JSON document per line
    Jsonl,
    /// One row per implementation
    Csv,
}

/// Breakdown selector for `stats`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StatsDimension {
    #[default]
    All,
    Difficulty,
    Tag,
    Language,
}

// ============================================================================
// Problem Fields
// ============================================================================

/// Problem fields for `add` and `edit`.
///
/// `--file` supplies a whole document (including solutions); the scalar
/// flags override individual fields on top of it.
#[derive(Args, Debug, Default, Clone)]
pub struct ProblemArgs {
    /// Read a problem document (JSON object) from a file, or `-` for stdin
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Problem title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Judge or platform name (e.g. LeetCode, Codeforces)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Problem statement
    #[arg(short, long, alias = "problem-description")]
    pub description: Option<String>,

    /// Problem URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Easy, Medium, Hard, or empty to unset
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Comma-separated tags (replaces existing tags)
    #[arg(long)]
    pub tags: Option<String>,
}

impl ProblemArgs {
    /// True when no scalar override is present.
    #[must_use]
    pub fn has_field_overrides(&self) -> bool {
        self.title.is_some()
            || self.platform.is_some()
            || self.description.is_some()
            || self.url.is_some()
            || self.difficulty.is_some()
            || self.tags.is_some()
    }
}

// ============================================================================
// List
// ============================================================================

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Filter by platform
    #[arg(long)]
    pub platform: Option<String>,

    /// Filter by difficulty
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Search title and description
    #[arg(short, long)]
    pub search: Option<String>,

    /// Maximum problems to return
    #[arg(short, long)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_ids() {
        let cli = Cli::parse_from(["cpcat", "export", "csv", "out.csv", "--ids", "1,3"]);
        match cli.command {
            Commands::Export { format, ids, .. } => {
                assert_eq!(format, ExportFormat::Csv);
                assert_eq!(ids, vec![1, 3]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_edit_with_fields() {
        let cli = Cli::parse_from(["cpcat", "edit", "4", "--title", "New", "--tags", "a,b"]);
        match cli.command {
            Commands::Edit { id, args } => {
                assert_eq!(id, 4);
                assert_eq!(args.title.as_deref(), Some("New"));
                assert!(args.has_field_overrides());
                assert!(args.file.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
