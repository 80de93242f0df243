//! # beacon-risk
//!
//! **Tier 3 (Analyzers)**
//!
//! RiskAssessor: a fixed rule table over the other analyzers' outputs,
//! weighted into one overall score/level, with deterministic recommendation
//! text. Generalizes this lineage's cockpit risk aggregation
//! (hotspot/health scoring bucketed into `RiskLevel`) from a single PR diff
//! to a full commit-history window.
//!
//! ## What belongs here
//! * Rule evaluation and weighted aggregation over analyzer outputs
//!
//! ## What does NOT belong here
//! * Git I/O, dataset construction
//! * Rendering

use beacon_settings::RiskConfig;
use beacon_types::analysis::{
    BusFactor, ChurnMetrics, RiskIndicator, RiskLevel, RiskReport, TeamReport, TrendDirection,
    VelocityTrends,
};

/// Evaluate the full rule table and aggregate it into a [`RiskReport`].
///
/// Tolerates missing analyzer outputs: a `None` input skips that rule and
/// re-normalizes the remaining weights over what fired, rather than
/// treating a missing analyzer as zero risk.
#[must_use]
pub fn assess(
    bus_factor: Option<&BusFactor>,
    team: Option<&TeamReport>,
    churn: Option<&ChurnMetrics>,
    velocity: Option<&VelocityTrends>,
    config: &RiskConfig,
) -> RiskReport {
    let mut indicators = Vec::new();

    if let Some(bf) = bus_factor {
        indicators.push(("bus", bus_factor_indicator(bf)));
    }
    if let Some(team) = team {
        indicators.push(("silos", silo_indicator(team)));
    }
    if let Some(churn) = churn {
        indicators.push(("churn", churn_indicator(churn)));
    }
    if let Some(velocity) = velocity {
        indicators.push(("velocity", velocity_indicator(velocity)));
    }

    let total_weight: f64 = indicators
        .iter()
        .map(|(key, _)| config.weights.get(*key).copied().unwrap_or(0.0))
        .sum();

    let overall_score = if total_weight > 0.0 {
        indicators
            .iter()
            .map(|(key, ind)| ind.score * config.weights.get(*key).copied().unwrap_or(0.0))
            .sum::<f64>()
            / total_weight
    } else {
        0.0
    };

    let level = level_for_score(overall_score);
    let recommendations = recommendations_for(&indicators);

    RiskReport {
        indicators: indicators.into_iter().map(|(_, ind)| ind).collect(),
        overall_score,
        level,
        recommendations,
    }
}

fn level_for_score(score: f64) -> RiskLevel {
    if score < 0.25 {
        RiskLevel::Low
    } else if score < 0.5 {
        RiskLevel::Medium
    } else if score < 0.75 {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

fn bus_factor_indicator(bus_factor: &BusFactor) -> RiskIndicator {
    let (level, score) = match bus_factor.factor {
        0 | 1 => (RiskLevel::Critical, 0.9),
        2 => (RiskLevel::High, 0.7),
        3 => (RiskLevel::Medium, 0.5),
        _ => (RiskLevel::Low, 0.2),
    };
    let affected_components = bus_factor
        .ranking
        .iter()
        .take(3)
        .map(|a| a.author.clone())
        .collect();
    RiskIndicator {
        name: "bus_factor".to_string(),
        level,
        score,
        description: format!(
            "Bus factor is {} across {} contributor(s)",
            bus_factor.factor,
            bus_factor.ranking.len()
        ),
        affected_components,
        mitigation: "Spread ownership across more contributors before the top committer leaves".to_string(),
    }
}

fn silo_indicator(team: &TeamReport) -> RiskIndicator {
    let high_risk = team
        .silos
        .iter()
        .filter(|s| s.risk_level == RiskLevel::High)
        .count();
    let (level, score) = if high_risk > 5 {
        (RiskLevel::Critical, 0.9)
    } else if high_risk > 2 {
        (RiskLevel::High, 0.7)
    } else if high_risk > 0 {
        (RiskLevel::Medium, 0.4)
    } else {
        (RiskLevel::Low, 0.1)
    };
    let affected_components = team.silos.iter().take(5).map(|s| s.path.clone()).collect();
    RiskIndicator {
        name: "knowledge_silos".to_string(),
        level,
        score,
        description: format!("{} knowledge silo(s) detected, {high_risk} at high risk", team.silos.len()),
        affected_components,
        mitigation: "Pair or review-rotate on silo'd files to spread knowledge".to_string(),
    }
}

fn churn_indicator(churn: &ChurnMetrics) -> RiskIndicator {
    let (level, score) = if churn.churn_ratio >= 0.7 {
        (RiskLevel::High, 0.7)
    } else if churn.churn_ratio >= 0.5 {
        (RiskLevel::Medium, 0.4)
    } else {
        (RiskLevel::Low, 0.1)
    };
    RiskIndicator {
        name: "churn".to_string(),
        level,
        score,
        description: format!("Global churn ratio is {:.2}", churn.churn_ratio),
        affected_components: churn.high_churn_files.clone(),
        mitigation: "Investigate repeated rework in the highest-churn files".to_string(),
    }
}

fn velocity_indicator(velocity: &VelocityTrends) -> RiskIndicator {
    let (level, score) = if velocity.trend_direction == TrendDirection::Decreasing {
        (RiskLevel::Medium, 0.4)
    } else {
        (RiskLevel::Low, 0.1)
    };
    RiskIndicator {
        name: "velocity".to_string(),
        level,
        score,
        description: format!("Commit velocity trend is {:?} (slope {:.4})", velocity.trend_direction, velocity.trend_slope),
        affected_components: Vec::new(),
        mitigation: "Investigate whether slowing velocity reflects blocked work or reduced capacity".to_string(),
    }
}

/// Deterministic recommendation templates, keyed by indicator name; evaluated
/// in the same fixed order the rule table declares them so output order is
/// stable across runs regardless of which analyzers happened to fire.
fn recommendations_for(indicators: &[(&str, RiskIndicator)]) -> Vec<String> {
    let mut out = Vec::new();
    for key in ["bus", "silos", "churn", "velocity"] {
        if let Some((_, indicator)) = indicators.iter().find(|(k, _)| *k == key) {
            if indicator.level >= RiskLevel::Medium {
                out.push(indicator.mitigation.clone());
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_types::analysis::{AuthorShare, CoAuthorshipMatrix, KnowledgeSilo, OwnershipMap};
    use std::collections::BTreeMap;

    fn bus_factor(factor: usize) -> BusFactor {
        BusFactor {
            factor,
            ranking: vec![AuthorShare {
                author: "alice".to_string(),
                share: 1.0,
            }],
            risk_level: RiskLevel::Critical,
        }
    }

    #[test]
    fn critical_bus_factor_drives_high_overall_score() {
        let report = assess(Some(&bus_factor(1)), None, None, None, &RiskConfig::default());
        assert_eq!(report.indicators.len(), 1);
        assert!(report.overall_score >= 0.75);
        assert_eq!(report.level, RiskLevel::Critical);
        assert!(!report.recommendations.is_empty());
    }

    #[test]
    fn low_risk_inputs_yield_low_overall_level() {
        let bf = bus_factor(5);
        let team = TeamReport {
            ownership: OwnershipMap::default(),
            co_authorship: CoAuthorshipMatrix {
                scores: BTreeMap::new(),
                top_pairs: Vec::new(),
            },
            silos: Vec::new(),
            collaboration_score: 8.0,
        };
        let churn = ChurnMetrics {
            churn_ratio: 0.1,
            per_file: Vec::new(),
            high_churn_files: Vec::new(),
            complexity_hotspots: Vec::new(),
        };
        let velocity = VelocityTrends {
            daily_velocity: BTreeMap::new(),
            weekly_average: 5.0,
            trend_slope: 0.0,
            trend_direction: TrendDirection::Stable,
            peak: (beacon_types::CivilDate(0), 0),
        };
        let report = assess(
            Some(&bf),
            Some(&team),
            Some(&churn),
            Some(&velocity),
            &RiskConfig::default(),
        );
        assert_eq!(report.level, RiskLevel::Low);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn missing_analyzers_renormalize_weights_without_panicking() {
        let report = assess(None, None, Some(&ChurnMetrics {
            churn_ratio: 0.8,
            per_file: Vec::new(),
            high_churn_files: Vec::new(),
            complexity_hotspots: Vec::new(),
        }), None, &RiskConfig::default());
        assert_eq!(report.indicators.len(), 1);
        assert!((report.overall_score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn many_high_risk_silos_escalate_to_critical() {
        let silos: Vec<KnowledgeSilo> = (0..6)
            .map(|i| KnowledgeSilo {
                path: format!("f{i}.rs"),
                primary_author: "alice".to_string(),
                ownership_share: 0.99,
                last_other_touch: None,
                risk_level: RiskLevel::High,
            })
            .collect();
        let team = TeamReport {
            ownership: OwnershipMap::default(),
            co_authorship: CoAuthorshipMatrix {
                scores: BTreeMap::new(),
                top_pairs: Vec::new(),
            },
            silos,
            collaboration_score: 1.0,
        };
        let report = assess(None, Some(&team), None, None, &RiskConfig::default());
        assert_eq!(report.indicators[0].level, RiskLevel::Critical);
    }
}
