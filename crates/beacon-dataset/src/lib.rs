//! # beacon-dataset
//!
//! **Tier 1 (Parsing / Assembly)**
//!
//! Builds an immutable `CommitDataset` from the Repository Access Layer's
//! raw records: orders commits, enforces the window-membership invariant,
//! and builds the by-author/by-day/by-file/by-extension indexes analyzers
//! read from.
//!
//! ## What belongs here
//! * Dataset construction and index building
//!
//! ## What does NOT belong here
//! * Git I/O (use `beacon-git`)
//! * Analysis computation (use `beacon-analysis-*`)

use beacon_git::{RawChangeStatus, RawGitCommit};
use beacon_types::{Author, ChangeStatus, Commit, CommitIndexes, FileChange, Window};

/// An immutable snapshot of every commit in one query window.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitDataset {
    pub window: Window,
    pub commits: Vec<Commit>,
    pub indexes: CommitIndexes,
}

impl CommitDataset {
    /// Build a dataset from raw git records, keeping only commits whose
    /// `committed_at` falls within `window` (defensive: RAL already filters
    /// at the source, but the invariant is re-checked here rather than
    /// trusted blindly).
    #[must_use]
    pub fn build(window: Window, raw_commits: Vec<RawGitCommit>) -> Self {
        let mut commits: Vec<Commit> = raw_commits
            .into_iter()
            .filter(|c| window.contains(c.timestamp))
            .map(convert_commit)
            .collect();

        commits.sort_by(|a, b| a.committed_at.cmp(&b.committed_at).then(a.hash.cmp(&b.hash)));

        let indexes = build_indexes(&commits);

        Self {
            window,
            commits,
            indexes,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    #[must_use]
    pub fn total_lines_added(&self) -> usize {
        self.commits.iter().map(Commit::lines_added_total).sum()
    }

    #[must_use]
    pub fn total_lines_deleted(&self) -> usize {
        self.commits.iter().map(Commit::lines_deleted_total).sum()
    }

    #[must_use]
    pub fn total_files_changed(&self) -> usize {
        self.indexes.by_file.len()
    }
}

/// Convert one raw git record into the public [`Commit`] shape, without
/// requiring a whole dataset. Used by single-commit report lookups, which
/// never build a [`CommitDataset`] (there's no window to index).
#[must_use]
pub fn commit_from_raw(raw: RawGitCommit) -> Commit {
    convert_commit(raw)
}

fn convert_commit(raw: RawGitCommit) -> Commit {
    let files = raw
        .files
        .into_iter()
        .map(|f| FileChange {
            path: f.path,
            status: convert_status(f.status),
            old_path: f.old_path,
            lines_added: f.lines_added,
            lines_deleted: f.lines_deleted,
        })
        .collect();

    Commit {
        hash: raw.hash,
        parents: raw.parents,
        author: Author {
            name: raw.author_name,
            email: raw.author_email,
        },
        committed_at: raw.timestamp,
        message: raw.message,
        files,
    }
}

fn convert_status(status: RawChangeStatus) -> ChangeStatus {
    match status {
        RawChangeStatus::Added => ChangeStatus::Added,
        RawChangeStatus::Modified => ChangeStatus::Modified,
        RawChangeStatus::Deleted => ChangeStatus::Deleted,
        RawChangeStatus::Renamed => ChangeStatus::Renamed,
    }
}

fn build_indexes(commits: &[Commit]) -> CommitIndexes {
    let mut indexes = CommitIndexes::default();
    for (idx, commit) in commits.iter().enumerate() {
        indexes
            .by_author
            .entry(commit.author.key().to_string())
            .or_default()
            .push(idx);
        indexes
            .by_day
            .entry(commit.civil_date())
            .or_default()
            .push(idx);
        for file in &commit.files {
            indexes
                .by_file
                .entry(file.path.clone())
                .or_default()
                .push(idx);
            indexes
                .by_extension
                .entry(file.extension())
                .or_default()
                .push(idx);
        }
    }
    indexes
}
