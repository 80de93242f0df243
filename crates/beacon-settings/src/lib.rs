//! # beacon-settings
//!
//! **Tier 0 (Pure Settings)**
//!
//! Clap-free configuration types for the analytics pipeline. These mirror
//! the CLI/environment surface without depending on Clap, so library
//! consumers and FFI boundaries can build a [`BeaconConfig`] directly.
//!
//! ## What belongs here
//! * Pure data types with Serde derive
//! * Per-component config structs and their defaults
//!
//! ## What does NOT belong here
//! * Clap parsing or env var binding (use `beacon-cli`)
//! * I/O operations
//! * Analysis logic

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration for `beacon-analysis-time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeConfig {
    #[serde(default = "default_velocity_window_days")]
    pub velocity_window_days: u32,

    #[serde(default = "default_peak_threshold")]
    pub peak_threshold: f64,

    #[serde(default = "default_bus_factor_cutoff")]
    pub bus_factor_cutoff: f64,

    /// Slope epsilon for trend classification, in commits/day².
    #[serde(default = "default_trend_epsilon")]
    pub trend_epsilon: f64,
}

fn default_velocity_window_days() -> u32 {
    7
}
fn default_peak_threshold() -> f64 {
    1.5
}
fn default_bus_factor_cutoff() -> f64 {
    0.5
}
fn default_trend_epsilon() -> f64 {
    0.05
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            velocity_window_days: default_velocity_window_days(),
            peak_threshold: default_peak_threshold(),
            bus_factor_cutoff: default_bus_factor_cutoff(),
            trend_epsilon: default_trend_epsilon(),
        }
    }
}

/// Configuration for `beacon-analysis-team`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    #[serde(default = "default_ownership_half_life_days")]
    pub ownership_half_life_days: u32,

    #[serde(default = "default_silo_threshold")]
    pub silo_threshold: f64,

    #[serde(default = "default_silo_days")]
    pub silo_days: u32,

    #[serde(default = "default_collab_window_days")]
    pub collab_window_days: u32,

    /// Minimum changes within the window for a file to be silo-eligible.
    #[serde(default = "default_silo_min_changes")]
    pub silo_min_changes: u32,
}

fn default_ownership_half_life_days() -> u32 {
    60
}
fn default_silo_threshold() -> f64 {
    0.8
}
fn default_silo_days() -> u32 {
    90
}
fn default_collab_window_days() -> u32 {
    30
}
fn default_silo_min_changes() -> u32 {
    3
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            ownership_half_life_days: default_ownership_half_life_days(),
            silo_threshold: default_silo_threshold(),
            silo_days: default_silo_days(),
            collab_window_days: default_collab_window_days(),
            silo_min_changes: default_silo_min_changes(),
        }
    }
}

/// Configuration for `beacon-analysis-quality`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    #[serde(default = "default_churn_threshold")]
    pub churn_threshold: f64,

    #[serde(default = "default_large_change_lines")]
    pub large_change_lines: usize,

    #[serde(default = "default_refactor_keywords")]
    pub refactor_keywords: Vec<String>,

    /// Minimum changes for a file to be eligible as a high-churn file.
    #[serde(default = "default_high_churn_min_changes")]
    pub high_churn_min_changes: usize,
}

fn default_churn_threshold() -> f64 {
    0.6
}
fn default_large_change_lines() -> usize {
    500
}
fn default_refactor_keywords() -> Vec<String> {
    vec![
        "refactor".to_string(),
        "cleanup".to_string(),
        "rename".to_string(),
        "reorg".to_string(),
    ]
}
fn default_high_churn_min_changes() -> usize {
    3
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            churn_threshold: default_churn_threshold(),
            large_change_lines: default_large_change_lines(),
            refactor_keywords: default_refactor_keywords(),
            high_churn_min_changes: default_high_churn_min_changes(),
        }
    }
}

/// Configuration for `beacon-risk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_risk_weights")]
    pub weights: BTreeMap<String, f64>,
}

fn default_risk_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("bus".to_string(), 0.30),
        ("silos".to_string(), 0.25),
        ("churn".to_string(), 0.25),
        ("velocity".to_string(), 0.20),
    ])
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            weights: default_risk_weights(),
        }
    }
}

/// Configuration for `beacon-chart` and `beacon-sections` rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,

    #[serde(default = "default_chart_height")]
    pub chart_height: usize,

    #[serde(default = "default_use_emoji")]
    pub use_emoji: bool,
}

fn default_chart_width() -> usize {
    60
}
fn default_chart_height() -> usize {
    15
}
fn default_use_emoji() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            use_emoji: default_use_emoji(),
        }
    }
}

/// Which report sections are enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionsConfig {
    #[serde(default = "default_true")]
    pub overview: bool,
    #[serde(default = "default_true")]
    pub time: bool,
    #[serde(default = "default_true")]
    pub team: bool,
    #[serde(default = "default_true")]
    pub quality: bool,
    #[serde(default = "default_true")]
    pub risk: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            overview: true,
            time: true,
            team: true,
            quality: true,
            risk: true,
        }
    }
}

/// Configuration for `beacon-engine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_max_commits")]
    pub max_commits: usize,

    #[serde(default = "default_cache_size")]
    pub cache_size: usize,

    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,
}

fn default_max_commits() -> usize {
    50_000
}
fn default_cache_size() -> usize {
    100
}
fn default_deadline_ms() -> u64 {
    30_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_commits: default_max_commits(),
            cache_size: default_cache_size(),
            deadline_ms: default_deadline_ms(),
        }
    }
}

/// The full configuration surface for a single analytics run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeaconConfig {
    #[serde(default)]
    pub time: TimeConfig,
    #[serde(default)]
    pub team: TeamConfig,
    #[serde(default)]
    pub quality: QualityConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub sections: SectionsConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}
