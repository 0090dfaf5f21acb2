use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single canned SQL query parsed out of a library file.
///
/// Immutable once created; a reload replaces the whole catalog rather than
/// mutating existing records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Unique within a loaded catalog.
    pub id: String,
    /// `<int>.<int>` from the header, or `<index>.0` for auto-extracted queries.
    pub number: String,
    pub title: String,
    /// Never empty for a stored query; lines are newline-terminated.
    pub sql: String,
    /// Topical category derived from the source filename.
    pub section: String,
    pub filename: String,
    /// First qualifying comment line after the header, possibly empty.
    pub description: String,
}

/// Monotonic counter providing the per-record uniqueness token in query ids.
///
/// One sequence is shared across a whole catalog load so that ids stay unique
/// across files. Injected by the caller, which keeps `parse` deterministic.
#[derive(Debug, Default)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_token(&mut self) -> u64 {
        let token = self.next;
        self.next += 1;
        token
    }
}

/// Ordered filename-substring to section-label table.
///
/// Matching is case-insensitive, first match wins, and a miss falls back to
/// the `Other` label.
#[derive(Debug, Clone)]
pub struct SectionMap {
    entries: Vec<(String, String)>,
    fallback: String,
}

impl SectionMap {
    pub fn new(entries: Vec<(String, String)>, fallback: impl Into<String>) -> Self {
        Self {
            entries,
            fallback: fallback.into(),
        }
    }

    pub fn section_for(&self, source_name: &str) -> &str {
        let lowered = source_name.to_lowercase();
        for (needle, label) in &self.entries {
            if lowered.contains(needle.as_str()) {
                return label;
            }
        }
        &self.fallback
    }
}

impl Default for SectionMap {
    fn default() -> Self {
        let entries = [
            ("demographics", "Demographics"),
            ("mental_health", "Mental Health"),
            ("criminal_history", "Criminal History"),
            ("performance", "Performance"),
            ("analytics", "Analytics"),
        ]
        .into_iter()
        .map(|(needle, label)| (needle.to_string(), label.to_string()))
        .collect();
        Self::new(entries, "Other")
    }
}
