//! # beacon-dateparse
//!
//! **Tier 1 (Parsing)**
//!
//! Resolves the `--since`/`--until` CLI surface into a concrete
//! `[since, until)` UTC window. Hand-rolled rather than pulled from an
//! external date-parsing crate, in keeping with this lineage's small
//! single-purpose string-to-typed-value parsers.
//!
//! ## What belongs here
//! * Relative duration grammar (`1w2d`), absolute timestamps, `now`
//! * Window validation (`since < until`)
//!
//! ## What does NOT belong here
//! * Git I/O (use `beacon-git`)
//! * Dataset construction (use `beacon-dataset`)

use anyhow::{Context, Result, bail};
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time};

const SECONDS_PER_DAY: i64 = 86_400;

/// A resolved `[since, until)` window, both UTC Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub since: i64,
    pub until: i64,
}

/// Resolve `since`/`until` specs into a window, using `now` as the wall clock.
///
/// `since` defaults to `"7d"`; `until` defaults to `"now"`. Fails with an
/// error (surfaced by the caller as `InvalidWindow`) when the resolved
/// `since >= until`.
pub fn resolve_window(since: Option<&str>, until: Option<&str>, now: i64) -> Result<Window> {
    let since = resolve_instant(since.unwrap_or("7d"), now).context("invalid --since value")?;
    let until = resolve_instant(until.unwrap_or("now"), now).context("invalid --until value")?;
    if since >= until {
        bail!("invalid window: since ({since}) must be strictly before until ({until})");
    }
    Ok(Window { since, until })
}

/// Resolve a single date/duration spec to a Unix timestamp.
///
/// Accepts `now`, an absolute `YYYY-MM-DD` or `YYYY-MM-DD HH:MM[:SS]`
/// timestamp (both UTC), or a relative duration composed of `<int><unit>`
/// terms (`d`, `w`, `m`, `y`), subtracted from `now`.
pub fn resolve_instant(spec: &str, now: i64) -> Result<i64> {
    let spec = spec.trim();
    if spec.eq_ignore_ascii_case("now") {
        return Ok(now);
    }
    if let Some(instant) = parse_absolute(spec)? {
        return Ok(instant);
    }
    parse_relative(spec).map(|seconds_ago| now - seconds_ago)
}

fn parse_absolute(spec: &str) -> Result<Option<i64>> {
    let (date_part, time_part) = match spec.split_once(' ') {
        Some((d, t)) => (d, Some(t)),
        None => (spec, None),
    };

    let mut pieces = date_part.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (pieces.next(), pieces.next(), pieces.next()) else {
        return Ok(None);
    };
    if pieces.next().is_some() || y.len() != 4 {
        return Ok(None);
    }
    let (Ok(year), Ok(month), Ok(day)) = (y.parse::<i32>(), m.parse::<u8>(), d.parse::<u8>())
    else {
        return Ok(None);
    };
    let Ok(month) = Month::try_from(month) else {
        return Ok(None);
    };
    let date = Date::from_calendar_date(year, month, day).context("invalid calendar date")?;

    let time = match time_part {
        None => Time::MIDNIGHT,
        Some(t) => parse_time(t)?,
    };

    let naive = PrimitiveDateTime::new(date, time);
    Ok(Some(naive.assume_utc().unix_timestamp()))
}

fn parse_time(spec: &str) -> Result<Time> {
    let mut parts = spec.splitn(3, ':');
    let hour: u8 = parts
        .next()
        .context("missing hour")?
        .parse()
        .context("invalid hour")?;
    let minute: u8 = parts
        .next()
        .context("missing minute")?
        .parse()
        .context("invalid minute")?;
    let second: u8 = match parts.next() {
        Some(s) => s.parse().context("invalid second")?,
        None => 0,
    };
    Time::from_hms(hour, minute, second).context("out-of-range time of day")
}

/// Parse a composable relative duration (`1w2d`) into seconds.
fn parse_relative(spec: &str) -> Result<i64> {
    if spec.is_empty() {
        bail!("empty duration");
    }
    let mut total_days: i64 = 0;
    let mut digits = String::new();
    for ch in spec.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if digits.is_empty() {
            bail!("expected a number before unit '{ch}'");
        }
        let amount: i64 = digits.parse().context("duration amount overflow")?;
        digits.clear();
        let days_per_unit = match ch {
            'd' => 1,
            'w' => 7,
            'm' => 28, // 4w, an approximation documented at the call site.
            'y' => 364, // 52w, same approximation.
            other => bail!("unknown duration unit '{other}'"),
        };
        total_days += amount * days_per_unit;
    }
    if !digits.is_empty() {
        bail!("trailing number '{digits}' with no unit");
    }
    Ok(total_days * SECONDS_PER_DAY)
}

/// Render a Unix timestamp as `YYYY-MM-DDTHH:MM:SSZ`, matching this
/// lineage's ISO-8601 timestamp formatting.
#[must_use]
pub fn to_iso8601(timestamp: i64) -> String {
    let Ok(dt) = OffsetDateTime::from_unix_timestamp(timestamp) else {
        return String::new();
    };
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        dt.year(),
        dt.month() as u8,
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn now_resolves_to_the_provided_clock() {
        assert_eq!(resolve_instant("now", 1_700_000_000).unwrap(), 1_700_000_000);
    }

    #[test]
    fn simple_day_duration_subtracts_from_now() {
        let now = 1_700_000_000;
        assert_eq!(resolve_instant("1d", now).unwrap(), now - SECONDS_PER_DAY);
    }

    #[test]
    fn composable_duration_sums_terms() {
        let now = 1_700_000_000;
        let expected = now - (7 + 2) * SECONDS_PER_DAY;
        assert_eq!(resolve_instant("1w2d", now).unwrap(), expected);
    }

    #[test]
    fn month_and_year_use_documented_approximations() {
        let now = 0;
        assert_eq!(resolve_instant("1m", now).unwrap(), -28 * SECONDS_PER_DAY);
        assert_eq!(resolve_instant("1y", now).unwrap(), -364 * SECONDS_PER_DAY);
    }

    #[test]
    fn absolute_date_parses_as_midnight_utc() {
        let instant = resolve_instant("2024-03-15", 0).unwrap();
        assert_eq!(to_iso8601(instant), "2024-03-15T00:00:00Z");
    }

    #[test]
    fn absolute_datetime_with_seconds_parses() {
        let instant = resolve_instant("2024-03-15 08:30:45", 0).unwrap();
        assert_eq!(to_iso8601(instant), "2024-03-15T08:30:45Z");
    }

    #[test]
    fn absolute_datetime_without_seconds_defaults_to_zero() {
        let instant = resolve_instant("2024-03-15 08:30", 0).unwrap();
        assert_eq!(to_iso8601(instant), "2024-03-15T08:30:00Z");
    }

    #[test]
    fn defaults_produce_a_seven_day_window() {
        let now = 1_700_000_000;
        let window = resolve_window(None, None, now).unwrap();
        assert_eq!(window.until, now);
        assert_eq!(window.since, now - 7 * SECONDS_PER_DAY);
    }

    #[test]
    fn since_after_until_is_rejected() {
        let result = resolve_window(Some("now"), Some("7d"), 1_700_000_000);
        assert!(result.is_err());
    }

    #[test]
    fn garbage_unit_is_rejected() {
        assert!(parse_relative("3q").is_err());
    }

    proptest! {
        #[test]
        fn relative_durations_never_panic(days in 0i64..9999, unit_idx in 0usize..4) {
            let unit = ['d', 'w', 'm', 'y'][unit_idx];
            let spec = format!("{days}{unit}");
            let _ = resolve_instant(&spec, 1_700_000_000);
        }
    }
}
