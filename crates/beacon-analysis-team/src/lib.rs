//! # beacon-analysis-team
//!
//! **Tier 3 (Analyzers)**
//!
//! TeamAnalyzer: recency-weighted file ownership, a co-authorship matrix
//! derived from file-level coupling, knowledge-silo detection, and a
//! blended collaboration score.
//!
//! ## What belongs here
//! * Pure functions over `&CommitDataset` producing `beacon-types::analysis` output
//!
//! ## What does NOT belong here
//! * Git I/O, dataset construction
//! * Rendering

use std::collections::BTreeMap;

use beacon_dataset::CommitDataset;
use beacon_math::gini_coefficient;
use beacon_settings::TeamConfig;
use beacon_types::analysis::{
    AuthorShare, CoAuthorshipMatrix, KnowledgeSilo, OwnershipMap, RiskLevel, TeamReport,
};

const SECONDS_PER_DAY: i64 = 86_400;

/// Run the full TeamAnalyzer pipeline.
#[must_use]
pub fn analyze(dataset: &CommitDataset, config: &TeamConfig) -> TeamReport {
    let ownership = ownership_map(dataset, config);
    let co_authorship = co_authorship_matrix(dataset, config);
    let silos = knowledge_silos(dataset, config, &ownership);
    let collaboration_score = collaboration_score(dataset, &ownership, &co_authorship);

    TeamReport {
        ownership,
        co_authorship,
        silos,
        collaboration_score,
    }
}

/// Per-file ownership: each author's share of recency-weighted lines touched.
#[must_use]
pub fn ownership_map(dataset: &CommitDataset, config: &TeamConfig) -> OwnershipMap {
    let mut weighted: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    let reference = dataset.window.until;
    let half_life = config.ownership_half_life_days.max(1) as f64;

    for commit in &dataset.commits {
        let age_days = ((reference - commit.committed_at) as f64 / SECONDS_PER_DAY as f64).max(0.0);
        let weight = 0.5_f64.powf(age_days / half_life);
        for file in &commit.files {
            let lines = (file.lines_added + file.lines_deleted) as f64;
            if lines == 0.0 {
                continue;
            }
            *weighted
                .entry(&file.path)
                .or_default()
                .entry(commit.author.key())
                .or_insert(0.0) += lines * weight;
        }
    }

    let mut by_file = BTreeMap::new();
    for (path, authors) in weighted {
        let total: f64 = authors.values().sum();
        if total <= 0.0 {
            continue;
        }
        let mut shares: Vec<AuthorShare> = authors
            .into_iter()
            .map(|(author, w)| AuthorShare {
                author: author.to_string(),
                share: w / total,
            })
            .collect();
        shares.sort_by(|a, b| {
            b.share
                .partial_cmp(&a.share)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.author.cmp(&b.author))
        });
        by_file.insert(path.to_string(), shares);
    }

    OwnershipMap { by_file }
}

/// Co-authorship: for each file, authors who touched it within
/// `collab_window_days` of one another accrue a coupling score, split
/// evenly among the other authors active in that window.
#[must_use]
pub fn co_authorship_matrix(dataset: &CommitDataset, config: &TeamConfig) -> CoAuthorshipMatrix {
    let mut by_file: BTreeMap<&str, Vec<(i64, &str)>> = BTreeMap::new();
    for commit in &dataset.commits {
        for file in &commit.files {
            by_file
                .entry(&file.path)
                .or_default()
                .push((commit.committed_at, commit.author.key()));
        }
    }

    let window_seconds = config.collab_window_days as i64 * SECONDS_PER_DAY;
    let mut scores: BTreeMap<String, f64> = BTreeMap::new();

    for touches in by_file.values() {
        for (ts_a, author_a) in touches {
            let others: Vec<&str> = touches
                .iter()
                .filter(|(ts_b, author_b)| author_b != author_a && (ts_b - ts_a).abs() <= window_seconds)
                .map(|(_, author_b)| *author_b)
                .collect();
            if others.is_empty() {
                continue;
            }
            let mut distinct: Vec<&str> = others.clone();
            distinct.sort_unstable();
            distinct.dedup();
            let share = 1.0 / distinct.len() as f64;
            for other in distinct {
                let key = CoAuthorshipMatrix::pair_key(author_a, other);
                *scores.entry(key).or_insert(0.0) += share;
            }
        }
    }

    let mut top_pairs: Vec<(String, String, f64)> = scores
        .iter()
        .filter_map(|(key, score)| {
            key.split_once('\0')
                .map(|(a, b)| (a.to_string(), b.to_string(), *score))
        })
        .collect();
    top_pairs.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
            .then_with(|| a.1.cmp(&b.1))
    });

    CoAuthorshipMatrix { scores, top_pairs }
}

/// Files with one dominant owner, unchallenged for a trailing window.
#[must_use]
pub fn knowledge_silos(
    dataset: &CommitDataset,
    config: &TeamConfig,
    ownership: &OwnershipMap,
) -> Vec<KnowledgeSilo> {
    let mut change_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut last_touch_by_author: BTreeMap<&str, BTreeMap<&str, i64>> = BTreeMap::new();
    for commit in &dataset.commits {
        for file in &commit.files {
            *change_counts.entry(&file.path).or_insert(0) += 1;
            let entry = last_touch_by_author
                .entry(&file.path)
                .or_default()
                .entry(commit.author.key())
                .or_insert(commit.committed_at);
            *entry = (*entry).max(commit.committed_at);
        }
    }

    let trailing_cutoff = dataset.window.until - config.silo_days as i64 * SECONDS_PER_DAY;
    let mut silos = Vec::new();

    for (path, shares) in &ownership.by_file {
        let Some(top) = shares.first() else {
            continue;
        };
        if top.share < config.silo_threshold {
            continue;
        }
        let changes = *change_counts.get(path.as_str()).unwrap_or(&0);
        if changes < config.silo_min_changes as usize {
            continue;
        }

        let touches = last_touch_by_author.get(path.as_str());
        let last_other_touch = touches.and_then(|authors| {
            authors
                .iter()
                .filter(|(author, _)| **author != top.author)
                .map(|(_, ts)| *ts)
                .max()
        });
        if let Some(ts) = last_other_touch {
            if ts >= trailing_cutoff {
                continue;
            }
        }

        let risk_level = if top.share >= 0.95 {
            RiskLevel::High
        } else if top.share >= 0.85 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        silos.push(KnowledgeSilo {
            path: path.clone(),
            primary_author: top.author.clone(),
            ownership_share: top.share,
            last_other_touch,
            risk_level,
        });
    }

    silos
}

/// Blend of multi-owner file fraction, mean coupling, and commit-count
/// equality into a single 0..10 collaboration score.
#[must_use]
pub fn collaboration_score(
    dataset: &CommitDataset,
    ownership: &OwnershipMap,
    co_authorship: &CoAuthorshipMatrix,
) -> f64 {
    if dataset.commits.is_empty() || ownership.by_file.is_empty() {
        return 0.0;
    }

    let multi_owner_fraction = ownership
        .by_file
        .values()
        .filter(|shares| shares.len() > 1)
        .count() as f64
        / ownership.by_file.len() as f64;

    let mean_coupling = if co_authorship.scores.is_empty() {
        0.0
    } else {
        let sum: f64 = co_authorship.scores.values().sum();
        (sum / co_authorship.scores.len() as f64).min(1.0)
    };

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for commit in &dataset.commits {
        *counts.entry(commit.author.key()).or_insert(0) += 1;
    }
    let mut values: Vec<usize> = counts.into_values().collect();
    values.sort_unstable();
    let equality = 1.0 - gini_coefficient(&values);

    ((multi_owner_fraction + mean_coupling + equality) / 3.0 * 10.0).clamp(0.0, 10.0)
}
