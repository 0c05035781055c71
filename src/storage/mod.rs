//! SQLite storage layer for cpcat.
//!
//! This module provides the persistence layer using SQLite with:
//! - Foreign keys with cascade delete from problems down to implementations
//! - Transaction discipline for whole-tree writes
//! - Additive column migrations and a schema integrity check
//!
//! # Submodules
//!
//! - [`migrations`] - Additive column migrations
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod migrations;
pub mod schema;
pub mod sqlite;

pub use schema::SchemaReport;
pub use sqlite::{CatalogCounts, MutationContext, ProblemFilter, ProblemSummary, SqliteStorage};
