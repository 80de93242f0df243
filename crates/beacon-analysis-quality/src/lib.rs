//! # beacon-analysis-quality
//!
//! **Tier 3 (Analyzers)**
//!
//! QualityAnalyzer: churn ratios, a per-file complexity-trend proxy, large-
//! change detection, and message/shape-based refactor classification.
//!
//! ## What belongs here
//! * Pure functions over `&CommitDataset` producing `beacon-types::analysis` output
//!
//! ## What does NOT belong here
//! * Git I/O, dataset construction
//! * Rendering

use std::collections::BTreeMap;

use beacon_dataset::CommitDataset;
use beacon_math::{linear_regression, percentile, safe_ratio};
use beacon_settings::QualityConfig;
use beacon_types::analysis::{ChangeClassification, ChurnMetrics, FileChurn, LargeChange, QualityReport};

const TOP_K_HOTSPOTS: usize = 10;

/// Run the full QualityAnalyzer pipeline.
#[must_use]
pub fn analyze(dataset: &CommitDataset, config: &QualityConfig) -> QualityReport {
    let churn = churn_metrics(dataset, config);
    let large_changes = large_changes(dataset, config);
    let refactoring_signals = refactoring_signals(dataset, config);

    QualityReport {
        churn,
        large_changes,
        refactoring_signals,
    }
}

/// Global and per-file churn, plus the files crossing the high-churn threshold.
#[must_use]
pub fn churn_metrics(dataset: &CommitDataset, config: &QualityConfig) -> ChurnMetrics {
    let mut per_file_totals: BTreeMap<&str, (usize, usize, usize)> = BTreeMap::new();
    // (path, timestamp) -> cumulative net lines, built incrementally below.
    let mut series: BTreeMap<&str, Vec<(f64, f64)>> = BTreeMap::new();
    let mut cumulative: BTreeMap<&str, f64> = BTreeMap::new();

    let mut total_added = 0usize;
    let mut total_deleted = 0usize;

    for commit in &dataset.commits {
        for file in &commit.files {
            total_added += file.lines_added;
            total_deleted += file.lines_deleted;

            let entry = per_file_totals.entry(&file.path).or_insert((0, 0, 0));
            entry.0 += 1;
            entry.1 += file.lines_added;
            entry.2 += file.lines_deleted;

            let net = file.lines_added as f64 - file.lines_deleted as f64;
            let running = cumulative.entry(&file.path).or_insert(0.0);
            *running += net;
            series
                .entry(&file.path)
                .or_default()
                .push((commit.committed_at as f64 / 86_400.0, *running));
        }
    }

    let churn_ratio = safe_ratio(total_deleted, total_added + total_deleted);

    let mut per_file = Vec::new();
    for (path, (touches, added, deleted)) in &per_file_totals {
        let file_ratio = safe_ratio(*deleted, *added + *deleted);
        let growth_rate = series
            .get(path)
            .map(|points| linear_regression(points).0)
            .unwrap_or(0.0);
        per_file.push(FileChurn {
            path: (*path).to_string(),
            commits_touching: *touches,
            lines_added: *added,
            lines_deleted: *deleted,
            churn_ratio: file_ratio,
            complexity_growth_rate: growth_rate,
        });
    }
    per_file.sort_by(|a, b| a.path.cmp(&b.path));

    let mut high_churn_files: Vec<String> = per_file
        .iter()
        .filter(|f| f.commits_touching >= config.high_churn_min_changes && f.churn_ratio >= config.churn_threshold)
        .map(|f| f.path.clone())
        .collect();
    high_churn_files.sort();

    let mut hotspots: Vec<&FileChurn> = per_file
        .iter()
        .filter(|f| f.complexity_growth_rate > 0.0)
        .collect();
    hotspots.sort_by(|a, b| {
        b.complexity_growth_rate
            .partial_cmp(&a.complexity_growth_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    let complexity_hotspots = hotspots
        .into_iter()
        .take(TOP_K_HOTSPOTS)
        .map(|f| f.path.clone())
        .collect();

    ChurnMetrics {
        churn_ratio,
        per_file,
        high_churn_files,
        complexity_hotspots,
    }
}

/// Commits whose size crosses the window's empirical 95th percentile or the
/// configured absolute threshold, classified by message keywords.
#[must_use]
pub fn large_changes(dataset: &CommitDataset, config: &QualityConfig) -> Vec<LargeChange> {
    if dataset.commits.is_empty() {
        return Vec::new();
    }

    let mut sizes: Vec<usize> = dataset
        .commits
        .iter()
        .map(|c| c.lines_added_total() + c.lines_deleted_total())
        .collect();
    sizes.sort_unstable();
    let p95 = percentile(&sizes, 0.95);
    let threshold = p95.max(config.large_change_lines as f64).max(1.0);

    let mut out = Vec::new();
    for commit in &dataset.commits {
        let total_lines = commit.lines_added_total() + commit.lines_deleted_total();
        let files_changed = commit.files.len();
        let crosses_percentile = (total_lines as f64) >= p95 && p95 > 0.0;
        let crosses_absolute = total_lines >= config.large_change_lines;
        if !crosses_percentile && !crosses_absolute {
            continue;
        }
        let size_score = (total_lines as f64 / threshold).min(1.0);
        let classification = classify_commit(&commit.message, commit.is_merge(), config);
        out.push(LargeChange {
            hash: commit.hash.clone(),
            committed_at: commit.committed_at,
            files_changed,
            total_lines,
            size_score,
            classification,
        });
    }
    out
}

fn classify_commit(message: &str, is_merge: bool, config: &QualityConfig) -> ChangeClassification {
    let lower = message.to_lowercase();
    if message.trim().is_empty() || is_merge {
        return ChangeClassification::Unknown;
    }
    if ["fix", "bug", "hotfix"].iter().any(|kw| lower.contains(kw)) {
        return ChangeClassification::Fix;
    }
    if config
        .refactor_keywords
        .iter()
        .any(|kw| lower.contains(kw.as_str()))
    {
        return ChangeClassification::Refactor;
    }
    ChangeClassification::Feature
}

/// Commit hashes flagged as refactors by churn shape or message keyword.
#[must_use]
pub fn refactoring_signals(dataset: &CommitDataset, config: &QualityConfig) -> Vec<String> {
    let mut out = Vec::new();
    for commit in &dataset.commits {
        let added = commit.lines_added_total();
        let deleted = commit.lines_deleted_total();
        let total = added + deleted;
        let by_shape = if total > 0 {
            let ratio = deleted as f64 / total as f64;
            let net = (added as i64 - deleted as i64).unsigned_abs() as f64;
            ratio >= 0.5 && net <= 0.1 * total as f64
        } else {
            false
        };
        let lower = commit.message.to_lowercase();
        let by_keyword = config
            .refactor_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()));
        if by_shape || by_keyword {
            out.push(commit.hash.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_git::{RawChangeStatus, RawFileChange, RawGitCommit};
    use beacon_types::Window;

    fn commit(hash: &str, ts: i64, message: &str, path: &str, added: usize, deleted: usize) -> RawGitCommit {
        RawGitCommit {
            hash: hash.to_string(),
            parents: vec![],
            author_name: "alice".to_string(),
            author_email: "alice@example.com".to_string(),
            timestamp: ts,
            message: message.to_string(),
            files: vec![RawFileChange {
                path: path.to_string(),
                old_path: None,
                status: RawChangeStatus::Modified,
                lines_added: added,
                lines_deleted: deleted,
            }],
        }
    }

    #[test]
    fn global_churn_ratio_matches_definition() {
        let window = Window {
            since: 0,
            until: 100 * 86_400,
        };
        let raw = vec![commit("a", 0, "add feature", "x.rs", 10, 2)];
        let dataset = beacon_dataset::CommitDataset::build(window, raw);
        let churn = churn_metrics(&dataset, &QualityConfig::default());
        assert!((churn.churn_ratio - (2.0 / 12.0)).abs() < 1e-3);
    }

    #[test]
    fn refactor_message_keyword_is_flagged() {
        let window = Window {
            since: 0,
            until: 100 * 86_400,
        };
        let raw = vec![commit("a", 0, "refactor: split module", "x.rs", 300, 280)];
        let dataset = beacon_dataset::CommitDataset::build(window, raw);
        let signals = refactoring_signals(&dataset, &QualityConfig::default());
        assert_eq!(signals, vec!["a".to_string()]);
    }

    #[test]
    fn fix_message_classifies_as_fix_not_refactor() {
        let window = Window {
            since: 0,
            until: 100 * 86_400,
        };
        let raw = vec![commit("a", 0, "fix: bug in parser", "x.rs", 600, 0)];
        let dataset = beacon_dataset::CommitDataset::build(window, raw);
        let changes = large_changes(&dataset, &QualityConfig::default());
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].classification, ChangeClassification::Fix);
    }

    #[test]
    fn empty_message_merge_classifies_as_unknown() {
        let config = QualityConfig::default();
        assert_eq!(classify_commit("", true, &config), ChangeClassification::Unknown);
    }

    #[test]
    fn high_churn_files_require_min_changes_and_ratio() {
        let window = Window {
            since: 0,
            until: 100 * 86_400,
        };
        let raw = vec![
            commit("a", 0, "x", "hot.rs", 1, 9),
            commit("b", 86_400, "x", "hot.rs", 1, 9),
            commit("c", 2 * 86_400, "x", "hot.rs", 1, 9),
        ];
        let dataset = beacon_dataset::CommitDataset::build(window, raw);
        let churn = churn_metrics(&dataset, &QualityConfig::default());
        assert!(churn.high_churn_files.contains(&"hot.rs".to_string()));
    }
}
