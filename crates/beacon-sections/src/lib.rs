//! # beacon-sections
//!
//! **Tier 4 (Rendering)**
//!
//! Section Renderers: one renderer per analyzer output (plus risk), each
//! producing a header line, a fixed set of metric lines, and optionally one
//! embedded `beacon-chart` primitive. Generalizes this lineage's
//! `render_markdown`/`render_sections` section-by-section `writeln!`
//! composition from a single PR receipt to a full commit-history window.
//!
//! ## What belongs here
//! * `SectionRenderer` implementations, one per §3 analyzer output
//!
//! ## What does NOT belong here
//! * Analyzer computation
//! * Chart primitives (use `beacon-chart`)
//! * Whole-report assembly / JSON serialization (use `beacon-format`)

use std::fmt::Write as _;

use beacon_chart::{BarDatum, heatmap, horizontal_bar, trend};
use beacon_settings::BeaconConfig;
use beacon_types::analysis::{ChangeClassification, ReportBundle, RiskLevel};

/// A renderer for exactly one report section.
pub trait SectionRenderer {
    /// Render this section, or `None` if the section has nothing to show
    /// (e.g. disabled by config, or its analyzer slot is absent).
    fn render(&self, bundle: &ReportBundle, config: &BeaconConfig) -> Option<String>;
}

/// The fixed, ordered set of section renderers, filtered by `config.sections`.
#[must_use]
pub fn enabled_sections(config: &BeaconConfig) -> Vec<Box<dyn SectionRenderer>> {
    let mut sections: Vec<Box<dyn SectionRenderer>> = Vec::new();
    if config.sections.overview {
        sections.push(Box::new(OverviewSection));
    }
    if config.sections.time {
        sections.push(Box::new(TimeSection));
    }
    if config.sections.team {
        sections.push(Box::new(TeamSection));
    }
    if config.sections.quality {
        sections.push(Box::new(QualitySection));
    }
    if config.sections.risk {
        sections.push(Box::new(RiskSection));
    }
    sections
}

fn header(title: &str, emoji: &str, use_emoji: bool) -> String {
    if use_emoji {
        format!("{emoji} {title}")
    } else {
        title.to_string()
    }
}

/// Window totals and author leaderboard: always available from the dataset
/// itself, so this section never shows "insufficient data".
pub struct OverviewSection;

impl SectionRenderer for OverviewSection {
    fn render(&self, bundle: &ReportBundle, config: &BeaconConfig) -> Option<String> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", header("Overview", "\u{1f4ca}", config.render.use_emoji));
        let _ = writeln!(out, "commits: {}", bundle.totals.commits);
        let _ = writeln!(out, "files changed: {}", bundle.totals.files_changed);
        let _ = writeln!(
            out,
            "lines: +{} -{}",
            bundle.totals.lines_added, bundle.totals.lines_deleted
        );
        let _ = writeln!(out, "authors: {}", bundle.authors.len());
        Some(out.trim_end().to_string())
    }
}

/// Velocity trend, peak day, and bus factor.
pub struct TimeSection;

impl SectionRenderer for TimeSection {
    fn render(&self, bundle: &ReportBundle, config: &BeaconConfig) -> Option<String> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", header("Velocity & Activity", "\u{23f1}\u{fe0f}", config.render.use_emoji));
        let Some(time) = bundle.time.as_ref() else {
            let _ = writeln!(out, "insufficient data");
            return Some(out.trim_end().to_string());
        };

        let _ = writeln!(out, "weekly average: {:.1} commits", time.velocity.weekly_average);
        let _ = writeln!(out, "trend: {:?}", time.velocity.trend_direction);
        let (peak_date, peak_count) = time.velocity.peak;
        let _ = writeln!(out, "peak day: {} ({} commits)", peak_date.0, peak_count);
        let _ = writeln!(
            out,
            "bus factor: {} ({:?} risk)",
            time.bus_factor.factor, time.bus_factor.risk_level
        );
        let _ = writeln!(
            out,
            "busiest slot: weekday {} hour {:02}",
            time.heatmap.peak_day + 1,
            time.heatmap.peak_hour
        );

        let series: Vec<(f64, f64)> = time
            .velocity
            .daily_velocity
            .iter()
            .enumerate()
            .map(|(idx, (_, count))| (idx as f64, f64::from(*count)))
            .collect();
        if !series.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                trend(&series, config.render.chart_width, config.render.chart_height, "commits")
            );
        }
        Some(out.trim_end().to_string())
    }
}

/// Ownership concentration, top co-authorship pairs, and knowledge silos.
pub struct TeamSection;

impl SectionRenderer for TeamSection {
    fn render(&self, bundle: &ReportBundle, config: &BeaconConfig) -> Option<String> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", header("Team & Ownership", "\u{1f465}", config.render.use_emoji));
        let Some(team) = bundle.team.as_ref() else {
            let _ = writeln!(out, "insufficient data");
            return Some(out.trim_end().to_string());
        };

        let _ = writeln!(out, "collaboration score: {:.1}/10", team.collaboration_score);
        let _ = writeln!(out, "knowledge silos: {}", team.silos.len());
        for silo in team.silos.iter().take(5) {
            let _ = writeln!(
                out,
                "  - {} owned {:.0}% by {} ({:?} risk)",
                silo.path,
                silo.ownership_share * 100.0,
                silo.primary_author,
                silo.risk_level
            );
        }

        if !team.co_authorship.top_pairs.is_empty() {
            let _ = writeln!(out, "top co-authorship pairs:");
            for (a, b, score) in team.co_authorship.top_pairs.iter().take(5) {
                let _ = writeln!(out, "  - {a} <-> {b}: {score:.2}");
            }
        }

        let data: Vec<BarDatum> = team
            .ownership
            .by_file
            .iter()
            .take(10)
            .filter_map(|(path, shares)| {
                shares.first().map(|top| BarDatum {
                    label: path.clone(),
                    value: top.share * 100.0,
                })
            })
            .collect();
        if !data.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                horizontal_bar(&data, config.render.chart_width, 24, 20)
            );
        }
        Some(out.trim_end().to_string())
    }
}

/// Churn, complexity hotspots, large changes, and refactor signals.
pub struct QualitySection;

impl SectionRenderer for QualitySection {
    fn render(&self, bundle: &ReportBundle, config: &BeaconConfig) -> Option<String> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", header("Code Quality", "\u{1f527}", config.render.use_emoji));
        let Some(quality) = bundle.quality.as_ref() else {
            let _ = writeln!(out, "insufficient data");
            return Some(out.trim_end().to_string());
        };

        let _ = writeln!(out, "churn ratio: {:.2}", quality.churn.churn_ratio);
        let _ = writeln!(out, "high-churn files: {}", quality.churn.high_churn_files.len());
        let _ = writeln!(out, "large changes: {}", quality.large_changes.len());
        let _ = writeln!(out, "refactor commits: {}", quality.refactoring_signals.len());

        let refactors = quality
            .large_changes
            .iter()
            .filter(|c| c.classification == ChangeClassification::Refactor)
            .count();
        let fixes = quality
            .large_changes
            .iter()
            .filter(|c| c.classification == ChangeClassification::Fix)
            .count();
        if !quality.large_changes.is_empty() {
            let _ = writeln!(out, "large-change mix: {refactors} refactor, {fixes} fix");
        }

        if !quality.churn.complexity_hotspots.is_empty() {
            let _ = writeln!(out, "complexity hotspots:");
            for path in quality.churn.complexity_hotspots.iter().take(5) {
                let _ = writeln!(out, "  - {path}");
            }
        }

        let data: Vec<BarDatum> = quality
            .churn
            .per_file
            .iter()
            .filter(|f| quality.churn.high_churn_files.contains(&f.path))
            .take(10)
            .map(|f| BarDatum {
                label: f.path.clone(),
                value: f.churn_ratio * 100.0,
            })
            .collect();
        if !data.is_empty() {
            let _ = writeln!(
                out,
                "{}",
                horizontal_bar(&data, config.render.chart_width, 24, 20)
            );
        }
        Some(out.trim_end().to_string())
    }
}

/// Overall risk score/level, contributing indicators, and recommendations.
pub struct RiskSection;

impl SectionRenderer for RiskSection {
    fn render(&self, bundle: &ReportBundle, config: &BeaconConfig) -> Option<String> {
        let mut out = String::new();
        let _ = writeln!(out, "{}", header("Risk", risk_emoji(bundle), config.render.use_emoji));
        let Some(risk) = bundle.risk.as_ref() else {
            let _ = writeln!(out, "insufficient data");
            return Some(out.trim_end().to_string());
        };

        let _ = writeln!(out, "overall: {:?} ({:.2})", risk.level, risk.overall_score);
        for indicator in &risk.indicators {
            let _ = writeln!(
                out,
                "  - {} [{:?}] {:.2}: {}",
                indicator.name, indicator.level, indicator.score, indicator.description
            );
        }
        if !risk.recommendations.is_empty() {
            let _ = writeln!(out, "recommendations:");
            for rec in &risk.recommendations {
                let _ = writeln!(out, "  - {rec}");
            }
        }
        Some(out.trim_end().to_string())
    }
}

fn risk_emoji(bundle: &ReportBundle) -> &'static str {
    match bundle.risk.as_ref().map(|r| r.level) {
        Some(RiskLevel::Critical) => "\u{1f6a8}",
        Some(RiskLevel::High) => "\u{26a0}\u{fe0f}",
        Some(RiskLevel::Medium) => "\u{26a1}",
        _ => "\u{2705}",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_types::analysis::{
        ActivityHeatmap, AuthorShare, BusFactor, ChurnMetrics, CoAuthorshipMatrix, KnowledgeSilo,
        OwnershipMap, QualityReport, RiskIndicator, RiskReport, TeamReport, TimeReport,
        TrendDirection, VelocityTrends,
    };
    use beacon_types::{CivilDate, Window};
    use std::collections::BTreeMap;

    fn empty_bundle() -> ReportBundle {
        ReportBundle {
            window: Window { since: 0, until: 1 },
            totals: beacon_types::analysis::Totals::default(),
            authors: BTreeMap::new(),
            time: None,
            team: None,
            quality: None,
            risk: None,
        }
    }

    #[test]
    fn overview_section_always_renders() {
        let bundle = empty_bundle();
        let config = BeaconConfig::default();
        let out = OverviewSection.render(&bundle, &config).unwrap();
        assert!(out.starts_with("\u{1f4ca} Overview"));
    }

    #[test]
    fn overview_section_respects_no_emoji() {
        let bundle = empty_bundle();
        let mut config = BeaconConfig::default();
        config.render.use_emoji = false;
        let out = OverviewSection.render(&bundle, &config).unwrap();
        assert!(out.starts_with("Overview"));
    }

    #[test]
    fn time_section_shows_insufficient_data_for_missing_slot() {
        let bundle = empty_bundle();
        let config = BeaconConfig::default();
        let out = TimeSection.render(&bundle, &config).unwrap();
        assert!(out.contains("insufficient data"));
    }

    #[test]
    fn time_section_renders_velocity_and_bus_factor() {
        let mut bundle = empty_bundle();
        bundle.time = Some(TimeReport {
            velocity: VelocityTrends {
                daily_velocity: BTreeMap::from([(CivilDate(0), 3)]),
                weekly_average: 3.0,
                trend_slope: 0.0,
                trend_direction: TrendDirection::Stable,
                peak: (CivilDate(0), 3),
            },
            heatmap: ActivityHeatmap {
                counts: [[0; 24]; 7],
                peak_day: 2,
                peak_hour: 14,
            },
            bus_factor: BusFactor {
                factor: 1,
                ranking: vec![AuthorShare { author: "alice".to_string(), share: 1.0 }],
                risk_level: beacon_types::analysis::RiskLevel::Critical,
            },
        });
        let config = BeaconConfig::default();
        let out = TimeSection.render(&bundle, &config).unwrap();
        assert!(out.contains("bus factor: 1"));
        assert!(out.contains("weekday 3 hour 14"));
    }

    #[test]
    fn risk_section_lists_indicators_and_recommendations() {
        let mut bundle = empty_bundle();
        bundle.risk = Some(RiskReport {
            indicators: vec![RiskIndicator {
                name: "bus_factor".to_string(),
                level: beacon_types::analysis::RiskLevel::Critical,
                score: 0.9,
                description: "only one committer".to_string(),
                affected_components: vec![],
                mitigation: "spread ownership".to_string(),
            }],
            overall_score: 0.9,
            level: beacon_types::analysis::RiskLevel::Critical,
            recommendations: vec!["spread ownership".to_string()],
        });
        let config = BeaconConfig::default();
        let out = RiskSection.render(&bundle, &config).unwrap();
        assert!(out.contains("spread ownership"));
        assert!(out.starts_with("\u{1f6a8} Risk"));
    }

    #[test]
    fn quality_section_reports_large_change_mix() {
        let mut bundle = empty_bundle();
        bundle.quality = Some(QualityReport {
            churn: ChurnMetrics {
                churn_ratio: 0.5,
                per_file: vec![],
                high_churn_files: vec![],
                complexity_hotspots: vec![],
            },
            large_changes: vec![beacon_types::analysis::LargeChange {
                hash: "a".to_string(),
                committed_at: 0,
                files_changed: 10,
                total_lines: 600,
                size_score: 1.0,
                classification: ChangeClassification::Refactor,
            }],
            refactoring_signals: vec!["a".to_string()],
        });
        let config = BeaconConfig::default();
        let out = QualitySection.render(&bundle, &config).unwrap();
        assert!(out.contains("1 refactor, 0 fix"));
    }

    #[test]
    fn enabled_sections_respects_config_flags() {
        let mut config = BeaconConfig::default();
        config.sections.team = false;
        config.sections.quality = false;
        let sections = enabled_sections(&config);
        assert_eq!(sections.len(), 3);
    }

    #[test]
    fn team_section_lists_silos() {
        let mut bundle = empty_bundle();
        bundle.team = Some(TeamReport {
            ownership: OwnershipMap::default(),
            co_authorship: CoAuthorshipMatrix { scores: BTreeMap::new(), top_pairs: vec![] },
            silos: vec![KnowledgeSilo {
                path: "x.rs".to_string(),
                primary_author: "alice".to_string(),
                ownership_share: 1.0,
                last_other_touch: None,
                risk_level: beacon_types::analysis::RiskLevel::High,
            }],
            collaboration_score: 2.0,
        });
        let config = BeaconConfig::default();
        let out = TeamSection.render(&bundle, &config).unwrap();
        assert!(out.contains("x.rs owned 100% by alice"));
    }
}
