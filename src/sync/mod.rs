//! JSONL and CSV exchange.
//!
//! - **Export**: problem trees → JSONL (one nested document per line) or
//!   CSV (one row per implementation)
//! - **Import**: JSONL → new problem trees, appended one transaction per line
//!
//! # File Format
//!
//! ```json
//! {"platform":"LeetCode","title":"Two Sum","problem_description":"...","url":"...","difficulty":"Easy","tags":["array"],"solutions":[{"language":"Rust","implementations":[{"method_name":"map","Explanation":"...","url":"","code":"...","notes":""}]}]}
//! ```
//!
//! # Example
//!
//! ```ignore
//! use cpcat::sync::{Exporter, Importer};
//!
//! let stats = Exporter::new(&storage).export_jsonl(&path, None)?;
//! let stats = Importer::new(&mut storage).import_file(&path)?;
//! ```

mod export;
mod file;
mod import;
mod types;

pub use export::{render_csv, Exporter};
pub use file::{atomic_write, count_lines, open_jsonl, render_jsonl, write_jsonl};
pub use import::Importer;
pub use types::{
    csv_rows, ExportStats, ImplementationDocument, ImportStats, ProblemDocument,
    SolutionDocument, SyncError, SyncResult, CSV_HEADER,
};
