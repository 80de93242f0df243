//! # beacon-git
//!
//! **Tier 2 (Utilities)**
//!
//! Repository Access Layer: a streaming git log adapter that collects commit
//! history, with full per-file numstat (added/deleted/status), without
//! loading the entire history into memory at once.
//!
//! ## What belongs here
//! * Git history collection
//! * Commit and numstat parsing
//! * Streaming interface
//!
//! ## What does NOT belong here
//! * Dataset construction, indexing (use `beacon-dataset`)
//! * Analysis computation
//! * Git history modification

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

/// Record start sentinel: not valid UTF-8 text a commit message would contain.
const RECORD_START: u8 = 0x01;
/// Field separator within the header portion of a record.
const FIELD_SEP: char = '\u{1f}';
/// Marks the end of the (possibly multi-line) commit message.
const MESSAGE_END: char = '\u{02}';

/// How a file was touched, as reported by `git log --numstat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A single file entry from one commit's numstat block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFileChange {
    pub path: String,
    pub old_path: Option<String>,
    pub status: RawChangeStatus,
    pub lines_added: usize,
    pub lines_deleted: usize,
}

/// One commit as read directly off `git log`, before dataset construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGitCommit {
    pub hash: String,
    pub parents: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: i64,
    pub message: String,
    pub files: Vec<RawFileChange>,
}

impl RawGitCommit {
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

pub fn repo_root(path: &Path) -> Option<PathBuf> {
    let output = Command::new("git")
        .arg("-C")
        .arg(path)
        .arg("rev-parse")
        .arg("--show-toplevel")
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        None
    } else {
        Some(PathBuf::from(root))
    }
}

/// Collect every commit reachable from any local branch whose `committer date`
/// falls within `[since, until)` (both Unix seconds, UTC).
///
/// Filtering happens at the source via git's own `--since`/`--until`, not by
/// re-filtering the parsed stream. `max_commits` stops collection once that
/// many commits have been read off the stream (the caller is expected to
/// treat a truncated result as `WindowTooLarge`, per the Analytics Engine's
/// `max_commits` guard).
pub fn collect_history(
    repo_root: &Path,
    since: i64,
    until: i64,
    max_commits: Option<usize>,
) -> Result<Vec<RawGitCommit>> {
    let pretty = "format:%x01%H%x1f%P%x1f%an%x1f%ae%x1f%ct%x1f%B%x02";
    let mut child = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .arg("log")
        .arg("--all")
        .arg("--date=unix")
        .arg("--no-color")
        .arg("--numstat")
        // A merge commit's files are the diff against its first parent (§4.1),
        // not the default "no diff at all" or the `-m` per-parent duplication.
        .arg("--diff-merges=first-parent")
        .arg(format!("--since={since}"))
        .arg(format!("--until={until}"))
        .arg(format!("--pretty={pretty}"))
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .context("failed to spawn git log")?;

    let stdout = child.stdout.take().context("missing git log stdout")?;
    let reader = BufReader::new(stdout);
    let commits = parse_git_log(reader, max_commits)?;

    let status = child.wait().context("git log did not exit cleanly")?;
    if !status.success() {
        anyhow::bail!("git log exited with a non-zero status");
    }
    Ok(commits)
}

/// Look up a single commit by hash prefix or any other `git rev-parse`-able
/// reference. Returns `Ok(None)` when the reference doesn't resolve to a
/// commit, distinguishing "not found" from an I/O failure (§6's
/// `InvalidCommitRef` vs `RepoAccessError`).
pub fn show_commit(repo_root: &Path, commit_ref: &str) -> Result<Option<RawGitCommit>> {
    let pretty = "format:%x01%H%x1f%P%x1f%an%x1f%ae%x1f%ct%x1f%B%x02";
    let output = Command::new("git")
        .arg("-C")
        .arg(repo_root)
        .arg("show")
        .arg("--no-color")
        .arg("--numstat")
        .arg("--diff-merges=first-parent")
        .arg(format!("--pretty={pretty}"))
        .arg(commit_ref)
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .context("failed to spawn git show")?;

    if !output.status.success() {
        return Ok(None);
    }

    let commits = parse_git_log(output.stdout.as_slice(), Some(1))?;
    Ok(commits.into_iter().next())
}

/// Parse sentinel-delimited `git log --numstat` output from a reader.
///
/// Exposed so the adapter's parsing logic can be exercised without shelling
/// out to git, matching how this lineage tests its log adapter against a
/// literal in-memory fixture.
pub fn parse_git_log<R: BufRead>(
    mut reader: R,
    max_commits: Option<usize>,
) -> Result<Vec<RawGitCommit>> {
    let mut raw = Vec::new();
    reader
        .read_to_end(&mut raw)
        .context("failed to read git log output")?;

    let mut commits = Vec::new();
    for record in raw.split(|&b| b == RECORD_START) {
        if record.is_empty() {
            continue;
        }
        if let Some(limit) = max_commits {
            if commits.len() >= limit {
                break;
            }
        }
        let text = String::from_utf8_lossy(record);
        if let Some(commit) = parse_record(&text) {
            commits.push(commit);
        }
    }
    Ok(commits)
}

fn parse_record(text: &str) -> Option<RawGitCommit> {
    let (header_and_message, rest) = text.split_once(MESSAGE_END)?;
    let mut fields = header_and_message.splitn(6, FIELD_SEP);
    let hash = fields.next()?.trim().to_string();
    if hash.is_empty() {
        return None;
    }
    let parents = fields
        .next()
        .unwrap_or_default()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    let author_name = fields.next().unwrap_or_default().to_string();
    let author_email = fields.next().unwrap_or_default().to_string();
    let timestamp = fields.next().unwrap_or("0").trim().parse().unwrap_or(0);
    let message = fields
        .next()
        .unwrap_or_default()
        .trim_start_matches('\n')
        .trim_end()
        .to_string();

    let files = rest
        .lines()
        .filter_map(parse_numstat_line)
        .collect();

    Some(RawGitCommit {
        hash,
        parents,
        author_name,
        author_email,
        timestamp,
        message,
        files,
    })
}

/// Parse one `--numstat` line: `<added>\t<deleted>\t<path>`, where `added`
/// and `deleted` are `-` for binary files, and `path` may contain a rename
/// in `old => new` or `prefix/{old => new}/suffix` form.
fn parse_numstat_line(line: &str) -> Option<RawFileChange> {
    let line = line.trim_end_matches('\r');
    if line.is_empty() {
        return None;
    }
    let mut parts = line.splitn(3, '\t');
    let added = parts.next()?;
    let deleted = parts.next()?;
    let path_field = parts.next()?;

    let lines_added = added.parse().unwrap_or(0);
    let lines_deleted = deleted.parse().unwrap_or(0);

    let (path, old_path) = split_rename(path_field);
    let status = if old_path.is_some() {
        RawChangeStatus::Renamed
    } else if added == "-" && deleted == "-" {
        // Binary file: git reports `-\t-\tpath`; we can't tell added vs.
        // modified vs. deleted from numstat alone, so treat as modified.
        RawChangeStatus::Modified
    } else if lines_deleted == 0 && lines_added > 0 {
        RawChangeStatus::Added
    } else if lines_added == 0 && lines_deleted > 0 {
        RawChangeStatus::Deleted
    } else {
        RawChangeStatus::Modified
    };

    Some(RawFileChange {
        path,
        old_path,
        status,
        lines_added,
        lines_deleted,
    })
}

/// Split a numstat path field into `(new_path, Some(old_path))` when it
/// encodes a rename, or `(path, None)` otherwise.
fn split_rename(field: &str) -> (String, Option<String>) {
    if let Some(brace_start) = field.find('{') {
        if let Some(brace_end) = field.find('}') {
            if brace_end > brace_start {
                let prefix = &field[..brace_start];
                let suffix = &field[brace_end + 1..];
                let inner = &field[brace_start + 1..brace_end];
                if let Some((old, new)) = inner.split_once(" => ") {
                    let old_path = format!("{prefix}{old}{suffix}");
                    let new_path = format!("{prefix}{new}{suffix}");
                    return (new_path, Some(old_path));
                }
            }
        }
    }
    if let Some((old, new)) = field.split_once(" => ") {
        return (new.to_string(), Some(old.to_string()));
    }
    (field.to_string(), None)
}
