//! # beacon-types
//!
//! **Tier 0 (Core Types)**
//!
//! Pure data model for beacon: the commit/file-change shapes produced by the
//! Repository Access Layer and the Commit Dataset, and the closed set of
//! analyzer-output value types consumed by the Risk Assessor, Section
//! Renderers, and the Report Formatter.
//!
//! ## Stability Policy
//!
//! **JSON-first stability**: the JSON schema (see `beacon-format`) is the
//! primary contract. New fields get sensible defaults; removed/renamed
//! fields bump [`SCHEMA_VERSION`].
//!
//! ## What belongs here
//! * Pure data structs and enums (Commit, FileChange, analyzer outputs)
//! * Serde derives
//!
//! ## What does NOT belong here
//! * Analysis computation (use `beacon-analysis-*`)
//! * Git I/O (use `beacon-git`)
//! * Rendering (use `beacon-chart` / `beacon-sections` / `beacon-format`)

pub mod analysis;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// The current schema version for all report types.
pub const SCHEMA_VERSION: u32 = 1;

/// UTC instant with second precision, stored as a Unix timestamp.
pub type UnixSeconds = i64;

/// A UTC civil date (`YYYY-MM-DD`), stored as days since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CivilDate(pub i64);

impl CivilDate {
    pub const SECONDS_PER_DAY: i64 = 86_400;

    /// The UTC civil date containing `timestamp`.
    #[must_use]
    pub fn from_unix(timestamp: UnixSeconds) -> Self {
        Self(timestamp.div_euclid(Self::SECONDS_PER_DAY))
    }

    /// The instant at 00:00:00 UTC on this date.
    #[must_use]
    pub fn start_of_day(&self) -> UnixSeconds {
        self.0 * Self::SECONDS_PER_DAY
    }
}

/// How a file was touched by a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A single file touched by a commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub status: ChangeStatus,
    /// Present only when `status == Renamed`.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub old_path: Option<String>,
    pub lines_added: usize,
    pub lines_deleted: usize,
}

impl FileChange {
    /// File extension derived from `path`, lowercase, without the leading dot.
    #[must_use]
    pub fn extension(&self) -> String {
        Path::new(&self.path)
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Logical bucket derived from the path's leading component.
    ///
    /// Matches the lineage's "path prefix -> logical bucket" convention
    /// (see `beacon-dataset`); unmatched paths fall back to `"other"`.
    #[must_use]
    pub fn component(&self) -> String {
        component_for_path(&self.path)
    }
}

/// Derive a logical component bucket from a repo-relative path.
///
/// Shared by `FileChange::component` and the single-commit report so both
/// agree on the same bucket rules.
#[must_use]
pub fn component_for_path(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let lower = normalized.to_lowercase();
    if lower.contains("/tests/") || lower.starts_with("tests/") || lower.ends_with("_test.rs") {
        "tests".to_string()
    } else if lower.ends_with(".md") || lower.contains("/docs/") || lower.starts_with("docs/") {
        "docs".to_string()
    } else if lower.ends_with(".toml")
        || lower.ends_with(".yml")
        || lower.ends_with(".yaml")
        || lower.ends_with(".json")
    {
        "config".to_string()
    } else if lower.contains("/ci/") || lower.starts_with(".github/") {
        "ci".to_string()
    } else {
        "other".to_string()
    }
}

/// Display identity of a commit's author.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

impl Author {
    /// The identity used to group commits by author across this crate family.
    ///
    /// Uses the display name; email is carried for reports but not used as
    /// the grouping key (two commits from the same person under slightly
    /// different emails still count as one author, matching how the
    /// lineage's git adapter already keys by its one identity field).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.name
    }
}

/// An atomic commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub parents: Vec<String>,
    pub author: Author,
    pub committed_at: UnixSeconds,
    pub message: String,
    pub files: Vec<FileChange>,
}

impl Commit {
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    #[must_use]
    pub fn short_hash(&self) -> &str {
        &self.hash[..self.hash.len().min(8)]
    }

    #[must_use]
    pub fn lines_added_total(&self) -> usize {
        self.files.iter().map(|f| f.lines_added).sum()
    }

    #[must_use]
    pub fn lines_deleted_total(&self) -> usize {
        self.files.iter().map(|f| f.lines_deleted).sum()
    }

    #[must_use]
    pub fn message_subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    #[must_use]
    pub fn civil_date(&self) -> CivilDate {
        CivilDate::from_unix(self.committed_at)
    }
}

/// A half-open UTC window `[since, until)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub since: UnixSeconds,
    pub until: UnixSeconds,
}

impl Window {
    #[must_use]
    pub fn contains(&self, instant: UnixSeconds) -> bool {
        instant >= self.since && instant < self.until
    }

    /// Whether `self` is a superset of `other` (used by the window-monotonicity law).
    #[must_use]
    pub fn is_superset_of(&self, other: &Window) -> bool {
        self.since <= other.since && self.until >= other.until
    }
}

/// Per-dimension indexes over a [`CommitDataset`](https://docs.rs/beacon-dataset), built once.
///
/// Lives here (rather than in `beacon-dataset`) so analyzer-output types and
/// the dataset can both depend on it without a cycle; `beacon-dataset` owns
/// *construction* of a `CommitIndexes`, this crate only owns the shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitIndexes {
    pub by_author: BTreeMap<String, Vec<usize>>,
    pub by_day: BTreeMap<CivilDate, Vec<usize>>,
    pub by_file: BTreeMap<String, Vec<usize>>,
    pub by_extension: BTreeMap<String, Vec<usize>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_change_extension_is_lowercased() {
        let fc = FileChange {
            path: "src/Lib.RS".to_string(),
            status: ChangeStatus::Modified,
            old_path: None,
            lines_added: 1,
            lines_deleted: 0,
        };
        assert_eq!(fc.extension(), "rs");
    }

    #[test]
    fn component_for_path_matches_expected_buckets() {
        assert_eq!(component_for_path("tests/foo.rs"), "tests");
        assert_eq!(component_for_path("docs/README.md"), "docs");
        assert_eq!(component_for_path("Cargo.toml"), "config");
        assert_eq!(component_for_path("src/lib.rs"), "other");
    }

    #[test]
    fn commit_is_merge_when_multiple_parents() {
        let commit = Commit {
            hash: "abc123".to_string(),
            parents: vec!["a".to_string(), "b".to_string()],
            author: Author {
                name: "alice".to_string(),
                email: "alice@example.com".to_string(),
            },
            committed_at: 0,
            message: String::new(),
            files: vec![],
        };
        assert!(commit.is_merge());
    }

    #[test]
    fn commit_totals_sum_file_changes() {
        let commit = Commit {
            hash: "deadbeef".to_string(),
            parents: vec![],
            author: Author {
                name: "alice".to_string(),
                email: "alice@example.com".to_string(),
            },
            committed_at: 0,
            message: "hello\nbody".to_string(),
            files: vec![
                FileChange {
                    path: "a.rs".to_string(),
                    status: ChangeStatus::Added,
                    old_path: None,
                    lines_added: 10,
                    lines_deleted: 2,
                },
                FileChange {
                    path: "b.rs".to_string(),
                    status: ChangeStatus::Modified,
                    old_path: None,
                    lines_added: 3,
                    lines_deleted: 1,
                },
            ],
        };
        assert_eq!(commit.lines_added_total(), 13);
        assert_eq!(commit.lines_deleted_total(), 3);
        assert_eq!(commit.message_subject(), "hello");
    }

    #[test]
    fn window_contains_is_half_open() {
        let window = Window {
            since: 100,
            until: 200,
        };
        assert!(window.contains(100));
        assert!(!window.contains(200));
        assert!(window.contains(199));
    }

    #[test]
    fn window_superset_matches_spec_monotonicity_law() {
        let wide = Window {
            since: 0,
            until: 1000,
        };
        let narrow = Window {
            since: 100,
            until: 200,
        };
        assert!(wide.is_superset_of(&narrow));
        assert!(!narrow.is_superset_of(&wide));
    }

    #[test]
    fn serde_roundtrip_commit() {
        let commit = Commit {
            hash: "abc".to_string(),
            parents: vec![],
            author: Author {
                name: "alice".to_string(),
                email: "a@example.com".to_string(),
            },
            committed_at: 42,
            message: "msg".to_string(),
            files: vec![],
        };
        let json = serde_json::to_string(&commit).unwrap();
        let back: Commit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, commit);
    }
}
