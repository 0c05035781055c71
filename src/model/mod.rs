//! Data models for cpcat.
//!
//! This module contains the domain tree:
//! - Problem
//! - Solution
//! - Implementation

pub mod problem;

pub use problem::{
    join_tags, normalize_tags, parse_tags, Difficulty, Implementation, Problem, Solution,
    TAG_SEPARATOR,
};
