//! Problem tree model.
//!
//! A [`Problem`] owns its [`Solution`]s, and each solution owns its
//! [`Implementation`]s. The whole tree is always written as a unit, so
//! child records carry no identity of their own in memory.

use serde::{Deserialize, Serialize};

/// Separator used when tags are flattened to text.
pub const TAG_SEPARATOR: &str = ", ";

/// Problem difficulty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "")]
    Unset,
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All variants in display order.
    pub const ALL: [Self; 4] = [Self::Unset, Self::Easy, Self::Medium, Self::Hard];

    /// Get the string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Label for human output (unset shows as a dash).
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unset => "-",
            other => other.as_str(),
        }
    }

    /// Parse a canonical value, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything that is not empty, Easy, Medium or Hard.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "" => Some(Self::Unset),
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A catalogued problem with its full solution tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Problem {
    pub platform: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub difficulty: Difficulty,
    /// Ordered, trimmed, non-empty, without duplicates.
    pub tags: Vec<String>,
    pub solutions: Vec<Solution>,
}

/// All implementations written in one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    /// Free text; several solutions under one problem may share a label.
    pub language: String,
    pub implementations: Vec<Implementation>,
}

/// One concrete coded approach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Implementation {
    pub method_name: String,
    pub explanation: String,
    pub url: String,
    pub code: String,
    pub notes: String,
}

impl Problem {
    /// Create a problem with only a title set.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Tags joined for storage.
    #[must_use]
    pub fn tags_text(&self) -> String {
        join_tags(&self.tags)
    }

    /// Number of implementations across every solution.
    #[must_use]
    pub fn implementation_count(&self) -> usize {
        self.solutions.iter().map(|s| s.implementations.len()).sum()
    }
}

impl Solution {
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            implementations: Vec::new(),
        }
    }
}

impl Implementation {
    #[must_use]
    pub fn new(method_name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            method_name: method_name.into(),
            code: code.into(),
            ..Self::default()
        }
    }
}

/// Split delimited tag text into a clean ordered list.
///
/// Entries are trimmed, empty entries are dropped and repeats keep their
/// first position.
#[must_use]
pub fn parse_tags(text: &str) -> Vec<String> {
    normalize_tags(text.split(','))
}

/// Trim, drop empties and de-duplicate an arbitrary tag sequence.
///
/// An entry containing the delimiter is split, so the result always reads
/// back unchanged from stored text.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for entry in tags {
        for tag in entry.as_ref().split(',') {
            let tag = tag.trim();
            if !tag.is_empty() && !out.iter().any(|t| t == tag) {
                out.push(tag.to_string());
            }
        }
    }
    out
}

/// Join tags back into stored text.
#[must_use]
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    normalize_tags(tags).join(TAG_SEPARATOR)
}
