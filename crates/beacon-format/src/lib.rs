//! # beacon-format
//!
//! **Tier 5 (Report Formatter)**
//!
//! Report Formatter: the single-commit report, the range report (glue over
//! `beacon-sections`), the JSON serializer for both, and the `BeaconError`
//! taxonomy (§7) that every public entry point in this workspace returns.
//! JSON rendering serializes the report struct directly rather than
//! building an ad hoc `Value` tree, and errors use a closed error-code
//! enum with named constructors instead of ad hoc strings.
//!
//! ## What belongs here
//! * Single-commit and range report text/JSON assembly
//! * The `BeaconError`/`ErrorCode`/`ResponseEnvelope` boundary types
//!
//! ## What does NOT belong here
//! * Analyzer computation, section rendering (use `beacon-sections`)
//! * Orchestration, caching (use `beacon-engine`)

pub mod error;

use std::collections::BTreeMap;
use std::fmt::Write as _;

use beacon_dateparse::to_iso8601;
use beacon_sections::enabled_sections;
use beacon_settings::BeaconConfig;
use beacon_types::analysis::{ImpactLevel, ReportBundle};
use beacon_types::{Commit, component_for_path};
use serde::Serialize;

pub use error::{BeaconError, ErrorCode, ResponseEnvelope};

/// A single file entry within the JSON single-commit schema (§6).
#[derive(Debug, Clone, Serialize)]
pub struct FileJson {
    pub path: String,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub status: beacon_types::ChangeStatus,
    pub extension: String,
    pub component: String,
    /// Copies the commit-level impact (§9's open-question decision: impact
    /// is computed once, at the commit level, never independently per file).
    pub impact: ImpactLevel,
}

/// The JSON single-commit schema (§6).
#[derive(Debug, Clone, Serialize)]
pub struct CommitJson {
    pub hash: String,
    pub short_hash: String,
    pub author: String,
    pub date: String,
    pub message: String,
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub net_change: i64,
    pub files: Vec<FileJson>,
}

/// Impact label per §4.8: high if `files_changed>10` or `lines_changed>500`,
/// medium if `>3` or `>100`, else low. Commit-level only (§9).
#[must_use]
pub fn impact_level(files_changed: usize, lines_changed: usize) -> ImpactLevel {
    if files_changed > 10 || lines_changed > 500 {
        ImpactLevel::High
    } else if files_changed > 3 || lines_changed > 100 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

/// Build the JSON-ready shape for a single commit.
#[must_use]
pub fn commit_to_json(commit: &Commit) -> CommitJson {
    let lines_added = commit.lines_added_total();
    let lines_deleted = commit.lines_deleted_total();
    let files_changed = commit.files.len();
    let impact = impact_level(files_changed, lines_added + lines_deleted);

    let files = commit
        .files
        .iter()
        .map(|f| FileJson {
            path: f.path.clone(),
            lines_added: f.lines_added,
            lines_deleted: f.lines_deleted,
            status: f.status,
            extension: f.extension(),
            component: f.component(),
            impact,
        })
        .collect();

    CommitJson {
        hash: commit.hash.clone(),
        short_hash: commit.short_hash().to_string(),
        author: commit.author.name.clone(),
        date: to_iso8601(commit.committed_at),
        message: commit.message.clone(),
        files_changed,
        lines_added,
        lines_deleted,
        net_change: lines_added as i64 - lines_deleted as i64,
        files,
    }
}

/// Serialize a single commit to the stable JSON schema.
///
/// # Errors
/// Returns [`BeaconError`] if serialization fails (it shouldn't, for a
/// plain-data struct, but the boundary always returns this type).
pub fn commit_report_json(commit: &Commit) -> Result<String, BeaconError> {
    Ok(serde_json::to_string_pretty(&commit_to_json(commit))?)
}

/// Format a single commit as line-oriented text (§4.8).
///
/// `extended` adds a file-type histogram and per-commit impact label.
#[must_use]
pub fn format_commit_report(commit: &Commit, extended: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "commit {}", commit.hash);
    let _ = writeln!(out, "author: {} <{}>", commit.author.name, commit.author.email);
    let _ = writeln!(out, "date: {}", to_iso8601(commit.committed_at));
    if commit.is_merge() {
        let _ = writeln!(out, "merge: {}", commit.parents.join(" "));
    }
    let _ = writeln!(out);
    for line in commit.message.lines() {
        let _ = writeln!(out, "    {line}");
    }
    let _ = writeln!(out);

    let lines_added = commit.lines_added_total();
    let lines_deleted = commit.lines_deleted_total();
    let _ = writeln!(
        out,
        "{} file(s) changed, +{lines_added} -{lines_deleted}",
        commit.files.len()
    );
    for file in &commit.files {
        let _ = writeln!(
            out,
            "  {:?} {} (+{} -{})",
            file.status, file.path, file.lines_added, file.lines_deleted
        );
    }

    if extended {
        let _ = writeln!(out);
        let impact = impact_level(commit.files.len(), lines_added + lines_deleted);
        let _ = writeln!(out, "impact: {impact:?}");

        let mut by_extension: BTreeMap<String, usize> = BTreeMap::new();
        let mut by_component: BTreeMap<String, usize> = BTreeMap::new();
        for file in &commit.files {
            *by_extension.entry(file.extension()).or_insert(0) += 1;
            *by_component.entry(component_for_path(&file.path)).or_insert(0) += 1;
        }
        let _ = writeln!(out, "file types:");
        for (ext, count) in &by_extension {
            let label = if ext.is_empty() { "(none)" } else { ext.as_str() };
            let _ = writeln!(out, "  .{label}: {count}");
        }
        let _ = writeln!(out, "components:");
        for (component, count) in &by_component {
            let _ = writeln!(out, "  {component}: {count}");
        }
    }

    out.trim_end().to_string()
}

/// Assemble the range report from whatever sections are enabled, separated
/// by one blank line, per §4.8.
#[must_use]
pub fn format_range_report(bundle: &ReportBundle, config: &BeaconConfig) -> String {
    enabled_sections(config)
        .iter()
        .filter_map(|section| section.render(bundle, config))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Serialize a [`ReportBundle`] to the stable range-report JSON schema.
///
/// # Errors
/// Returns [`BeaconError`] if serialization fails.
pub fn range_report_json(bundle: &ReportBundle) -> Result<String, BeaconError> {
    Ok(serde_json::to_string_pretty(bundle)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_types::{Author, ChangeStatus, FileChange, Window};

    fn sample_commit() -> Commit {
        Commit {
            hash: "abcdef1234567890".to_string(),
            parents: vec![],
            author: Author {
                name: "alice".to_string(),
                email: "alice@example.com".to_string(),
            },
            committed_at: 1_700_000_000,
            message: "fix bug\n\nlonger body".to_string(),
            files: vec![FileChange {
                path: "src/a.py".to_string(),
                status: ChangeStatus::Modified,
                old_path: None,
                lines_added: 10,
                lines_deleted: 2,
            }],
        }
    }

    #[test]
    fn impact_level_thresholds_match_spec() {
        assert_eq!(impact_level(11, 0), ImpactLevel::High);
        assert_eq!(impact_level(0, 501), ImpactLevel::High);
        assert_eq!(impact_level(4, 0), ImpactLevel::Medium);
        assert_eq!(impact_level(0, 101), ImpactLevel::Medium);
        assert_eq!(impact_level(1, 10), ImpactLevel::Low);
    }

    #[test]
    fn commit_json_copies_commit_level_impact_into_every_file() {
        let commit = sample_commit();
        let json = commit_to_json(&commit);
        assert_eq!(json.net_change, 8);
        assert_eq!(json.files[0].impact, ImpactLevel::Low);
    }

    #[test]
    fn commit_report_json_round_trips_through_serde_value() {
        let commit = sample_commit();
        let json = commit_report_json(&commit).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["hash"], "abcdef1234567890");
        assert_eq!(value["short_hash"], "abcdef12");
    }

    #[test]
    fn standard_commit_report_lists_file_breakdown() {
        let commit = sample_commit();
        let out = format_commit_report(&commit, false);
        assert!(out.contains("src/a.py"));
        assert!(out.contains("+10 -2"));
        assert!(!out.contains("impact:"));
    }

    #[test]
    fn extended_commit_report_adds_histogram_and_impact() {
        let commit = sample_commit();
        let out = format_commit_report(&commit, true);
        assert!(out.contains("impact:"));
        assert!(out.contains("file types:"));
        assert!(out.contains(".py: 1"));
    }

    #[test]
    fn range_report_joins_sections_with_blank_line() {
        let bundle = ReportBundle {
            window: Window { since: 0, until: 1 },
            totals: beacon_types::analysis::Totals::default(),
            authors: BTreeMap::new(),
            time: None,
            team: None,
            quality: None,
            risk: None,
        };
        let config = BeaconConfig::default();
        let out = format_range_report(&bundle, &config);
        assert!(out.contains("\n\n"));
        assert!(out.contains("Overview"));
    }

    #[test]
    fn range_report_json_matches_schema_keys() {
        let bundle = ReportBundle {
            window: Window { since: 10, until: 20 },
            totals: beacon_types::analysis::Totals {
                commits: 1,
                files_changed: 1,
                lines_added: 5,
                lines_deleted: 1,
            },
            authors: BTreeMap::from([("alice".to_string(), 1)]),
            time: None,
            team: None,
            quality: None,
            risk: None,
        };
        let json = range_report_json(&bundle).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["window"]["since"], 10);
        assert_eq!(value["totals"]["commits"], 1);
        assert_eq!(value["authors"]["alice"], 1);
        assert!(value.get("time").is_none());
    }
}
