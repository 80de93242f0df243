//! # beacon-analysis-time
//!
//! **Tier 3 (Analyzers)**
//!
//! TimeAnalyzer: commit velocity over the window, an activity heatmap by
//! weekday/hour, and bus-factor risk from commit-count concentration.
//!
//! ## What belongs here
//! * Pure functions over `&CommitDataset` producing `beacon-types::analysis` output
//!
//! ## What does NOT belong here
//! * Git I/O, dataset construction
//! * Rendering

use std::collections::BTreeMap;

use beacon_dataset::CommitDataset;
use beacon_math::linear_regression;
use beacon_settings::TimeConfig;
use beacon_types::analysis::{ActivityHeatmap, AuthorShare, BusFactor, RiskLevel, TrendDirection, VelocityTrends};
use beacon_types::CivilDate;

const SECONDS_PER_DAY: i64 = 86_400;

/// Compute commit velocity, its trend, and the single busiest day.
#[must_use]
pub fn velocity_trends(dataset: &CommitDataset, config: &TimeConfig) -> VelocityTrends {
    let daily_velocity = zero_filled_daily_counts(dataset);

    if daily_velocity.is_empty() {
        return VelocityTrends {
            daily_velocity,
            weekly_average: 0.0,
            trend_slope: 0.0,
            trend_direction: TrendDirection::Stable,
            peak: (CivilDate(0), 0),
        };
    }

    let total_commits: u32 = daily_velocity.values().sum();
    let window_days = daily_velocity.len() as f64;
    let weekly_average = (total_commits as f64 / window_days) * 7.0;

    let points: Vec<(f64, f64)> = daily_velocity
        .iter()
        .enumerate()
        .map(|(idx, (_, count))| (idx as f64, f64::from(*count)))
        .collect();
    let (slope, _r2) = linear_regression(&points);
    let trend_direction = classify_trend(slope, config.trend_epsilon);

    // BTreeMap iterates in ascending date order; only a strictly greater
    // count replaces the running peak, so ties resolve to the earliest date.
    let mut iter = daily_velocity.iter();
    let (&first_date, &first_count) = iter.next().expect("checked non-empty above");
    let peak = iter.fold((first_date, first_count), |best, (&date, &count)| {
        if count > best.1 { (date, count) } else { best }
    });

    VelocityTrends {
        daily_velocity,
        weekly_average,
        trend_slope: slope,
        trend_direction,
        peak,
    }
}

fn classify_trend(slope: f64, epsilon: f64) -> TrendDirection {
    if slope > epsilon {
        TrendDirection::Increasing
    } else if slope < -epsilon {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    }
}

fn zero_filled_daily_counts(dataset: &CommitDataset) -> BTreeMap<CivilDate, u32> {
    let mut counts = BTreeMap::new();
    if dataset.window.until <= dataset.window.since {
        return counts;
    }
    let first = CivilDate::from_unix(dataset.window.since);
    let last = CivilDate::from_unix(dataset.window.until - 1);
    let mut day = first.0;
    while day <= last.0 {
        counts.insert(CivilDate(day), 0);
        day += 1;
    }
    for commit in &dataset.commits {
        *counts.entry(commit.civil_date()).or_insert(0) += 1;
    }
    counts
}

/// Compute commit density by weekday (0=Monday) and UTC hour-of-day.
#[must_use]
pub fn activity_heatmap(dataset: &CommitDataset) -> ActivityHeatmap {
    let mut counts = [[0u32; 24]; 7];
    for commit in &dataset.commits {
        let (weekday, hour) = weekday_and_hour(commit.committed_at);
        counts[weekday as usize][hour as usize] += 1;
    }

    let mut peak_day = 0u8;
    let mut peak_hour = 0u8;
    let mut peak_count = 0u32;
    for (day_idx, row) in counts.iter().enumerate() {
        for (hour_idx, &count) in row.iter().enumerate() {
            if count > peak_count {
                peak_count = count;
                peak_day = day_idx as u8;
                peak_hour = hour_idx as u8;
            }
        }
    }

    ActivityHeatmap {
        counts,
        peak_day,
        peak_hour,
    }
}

/// Days since the Unix epoch, Thursday 1970-01-01, maps to weekday index 3 (0=Monday).
fn weekday_and_hour(timestamp: i64) -> (u8, u8) {
    let days = timestamp.div_euclid(SECONDS_PER_DAY);
    let seconds_of_day = timestamp.rem_euclid(SECONDS_PER_DAY);
    let weekday = ((days + 3).rem_euclid(7)) as u8;
    let hour = (seconds_of_day / 3600) as u8;
    (weekday, hour)
}

/// Compute the bus factor: the smallest number of top committers whose
/// combined share reaches `config.bus_factor_cutoff`.
#[must_use]
pub fn bus_factor(dataset: &CommitDataset, config: &TimeConfig) -> BusFactor {
    let total = dataset.commits.len();
    if total == 0 {
        return BusFactor {
            factor: 0,
            ranking: Vec::new(),
            risk_level: RiskLevel::Low,
        };
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for commit in &dataset.commits {
        *counts.entry(commit.author.key()).or_insert(0) += 1;
    }

    let mut ranking: Vec<(&str, usize)> = counts.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    let mut cumulative = 0usize;
    let mut factor = ranking.len();
    for (idx, (_, count)) in ranking.iter().enumerate() {
        cumulative += count;
        if cumulative as f64 >= config.bus_factor_cutoff * total as f64 {
            factor = idx + 1;
            break;
        }
    }

    let risk_level = match factor {
        0 | 1 => RiskLevel::Critical,
        2 => RiskLevel::High,
        3 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    };

    let ranking = ranking
        .into_iter()
        .map(|(author, count)| AuthorShare {
            author: author.to_string(),
            share: count as f64 / total as f64,
        })
        .collect();

    BusFactor {
        factor,
        ranking,
        risk_level,
    }
}
