//! Analyzer-output value types: the closed set of structs produced by
//! `beacon-analysis-time`, `beacon-analysis-team`, `beacon-analysis-quality`,
//! and `beacon-risk`, consumed by `beacon-sections` and `beacon-format`.
//!
//! Every type here is plain data: no methods beyond trivial accessors, no
//! analysis logic. Each field maps directly to a value an analyzer computes
//! and a report later renders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{CivilDate, UnixSeconds};

/// Direction of a fitted trend line, classified from its slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Coarse severity bucket shared by risk indicators and the overall report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Message-derived classification of a commit, used for large-change reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeClassification {
    Feature,
    Refactor,
    Fix,
    Unknown,
}

/// One author's share of something (commits, ownership, ...), name-ordered on ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorShare {
    pub author: String,
    pub share: f64,
}

/// TimeAnalyzer output: daily commit velocity over the window plus its fitted trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityTrends {
    /// Commit count per UTC calendar day, every day in the window present (zero-filled).
    pub daily_velocity: BTreeMap<CivilDate, u32>,
    pub weekly_average: f64,
    pub trend_slope: f64,
    pub trend_direction: TrendDirection,
    pub peak: (CivilDate, u32),
}

/// TimeAnalyzer output: commit density by ISO weekday and UTC hour-of-day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityHeatmap {
    /// `counts[weekday][hour]`, weekday index 0 = Monday (ISO weekday 1) .. 6 = Sunday (ISO 7).
    pub counts: [[u32; 24]; 7],
    pub peak_day: u8,
    pub peak_hour: u8,
}

/// TimeAnalyzer output: concentration-of-knowledge risk from commit authorship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusFactor {
    pub factor: usize,
    pub ranking: Vec<AuthorShare>,
    pub risk_level: RiskLevel,
}

/// TeamAnalyzer output: ownership map, keyed by file path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipMap {
    pub by_file: BTreeMap<String, Vec<AuthorShare>>,
}

/// TeamAnalyzer output: symmetric co-authorship scores between author pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoAuthorshipMatrix {
    /// Keyed by an unordered pair `"author_a\0author_b"` with `author_a <= author_b`.
    pub scores: BTreeMap<String, f64>,
    /// The same pairs, sorted descending by score.
    pub top_pairs: Vec<(String, String, f64)>,
}

impl CoAuthorshipMatrix {
    #[must_use]
    pub fn pair_key(a: &str, b: &str) -> String {
        if a <= b {
            format!("{a}\0{b}")
        } else {
            format!("{b}\0{a}")
        }
    }
}

/// TeamAnalyzer output: a file with a single dominant, unchallenged owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeSilo {
    pub path: String,
    pub primary_author: String,
    pub ownership_share: f64,
    pub last_other_touch: Option<UnixSeconds>,
    pub risk_level: RiskLevel,
}

/// TeamAnalyzer output: ownership, coupling, silos, and a blended collaboration score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub ownership: OwnershipMap,
    pub co_authorship: CoAuthorshipMatrix,
    pub silos: Vec<KnowledgeSilo>,
    pub collaboration_score: f64,
}

/// QualityAnalyzer output: per-file churn and complexity-trend figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChurn {
    pub path: String,
    pub commits_touching: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
    pub churn_ratio: f64,
    pub complexity_growth_rate: f64,
}

/// QualityAnalyzer output: global churn figures plus the highest-churn files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChurnMetrics {
    pub churn_ratio: f64,
    pub per_file: Vec<FileChurn>,
    pub high_churn_files: Vec<String>,
    pub complexity_hotspots: Vec<String>,
}

/// QualityAnalyzer output: a commit whose change size crosses the large-change threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LargeChange {
    pub hash: String,
    pub committed_at: UnixSeconds,
    pub files_changed: usize,
    pub total_lines: usize,
    pub size_score: f64,
    pub classification: ChangeClassification,
}

/// QualityAnalyzer output: churn, large changes, and refactor-flagged commits for the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub churn: ChurnMetrics,
    pub large_changes: Vec<LargeChange>,
    pub refactoring_signals: Vec<String>,
}

/// RiskAssessor output: one triggered rule with its contributing evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicator {
    pub name: String,
    pub level: RiskLevel,
    pub score: f64,
    pub description: String,
    pub affected_components: Vec<String>,
    pub mitigation: String,
}

/// RiskAssessor output: the overall risk verdict for a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub indicators: Vec<RiskIndicator>,
    pub overall_score: f64,
    pub level: RiskLevel,
    pub recommendations: Vec<String>,
}

/// Per-file impact label, computed only for the single-commit report path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

/// TimeAnalyzer's combined output: velocity, heatmap, and bus factor, grouped
/// the way the range-report JSON schema's `time` key groups them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeReport {
    pub velocity: VelocityTrends,
    pub heatmap: ActivityHeatmap,
    pub bus_factor: BusFactor,
}

/// Commit/line/file totals over the report window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub commits: usize,
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
}

/// The Analytics Engine's assembled output for one pipeline invocation.
///
/// Each analyzer slot is `None` when that analyzer was cancelled by the
/// engine's deadline or failed independently (§7's "contained" analyzer
/// error policy); renderers show an "insufficient data" note for a `None`
/// slot rather than failing the whole report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub window: crate::Window,
    pub totals: Totals,
    pub authors: BTreeMap<String, u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<TimeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskReport>,
}
