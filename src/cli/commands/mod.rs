//! Command implementations.

pub mod check;
pub mod completions;
pub mod init;
pub mod problem;
pub mod stats;
pub mod sync;
pub mod version;
