//! Commit timing statistics
//!
//! Summarizes when a developer commits: cadence, the busiest hours of the
//! day, a coarse timezone guess and how bursty the activity is.
//!
//! The timezone hint is a heuristic. It looks only at the single busiest
//! hour and maps it onto four fixed bands, so it is an estimate and not a
//! location.

use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize, Serializer};

/// An hour makes the active list only above this share of all commits.
pub const ACTIVE_HOUR_SHARE: f64 = 0.1;
/// At most this many active hours are reported.
pub const MAX_ACTIVE_HOURS: usize = 3;

/// Peak-hour bands, checked in order; the first match wins.
const TIMEZONE_BANDS: [(u32, u32, &str); 4] = [
    (4, 8, "UTC+8 to UTC+10"),
    (8, 12, "UTC+0 to UTC+2"),
    (12, 16, "UTC-6 to UTC-4"),
    (16, 20, "UTC-12 to UTC-8"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPatterns {
    pub frequency: CommitFrequency,
    pub burst_patterns: BurstPatterns,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitFrequency {
    /// Rounded to two decimals
    #[serde(serialize_with = "serialize_rate")]
    pub commits_per_day: f64,
    /// `"HH-HH"` ranges, busiest first
    pub active_hours: Vec<String>,
    pub timezone_hint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurstPatterns {
    pub intensity: BurstIntensity,
    pub average_duration: BurstDuration,
    pub frequency: BurstFrequency,
}

/// Classified by the mean gap between consecutive commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurstIntensity {
    High,
    Moderate,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstDuration {
    #[serde(rename = "few hours")]
    FewHours,
    #[serde(rename = "day-length")]
    DayLength,
    #[serde(rename = "multi-day")]
    MultiDay,
    #[serde(rename = "n/a")]
    NotApplicable,
}

/// Classified by commits per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BurstFrequency {
    Frequent,
    Regular,
    Sporadic,
}

impl ActivityPatterns {
    /// Result for an empty commit pool.
    pub fn empty() -> Self {
        Self {
            frequency: CommitFrequency {
                commits_per_day: 0.0,
                active_hours: Vec::new(),
                timezone_hint: "unknown".to_string(),
            },
            burst_patterns: BurstPatterns::quiet(),
        }
    }
}

impl BurstPatterns {
    fn quiet() -> Self {
        Self {
            intensity: BurstIntensity::Low,
            average_duration: BurstDuration::NotApplicable,
            frequency: BurstFrequency::Sporadic,
        }
    }
}

/// A zero rate is written as the integer `0`.
fn serialize_rate<S: Serializer>(rate: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if *rate == 0.0 {
        serializer.serialize_u64(0)
    } else {
        serializer.serialize_f64(*rate)
    }
}

/// Compute activity patterns over a pool of commit timestamps.
///
/// Hours are read in each timestamp's own offset; ordering uses the
/// absolute instant.
pub fn activity_patterns(mut commit_times: Vec<DateTime<FixedOffset>>) -> ActivityPatterns {
    if commit_times.is_empty() {
        return ActivityPatterns::empty();
    }
    commit_times.sort();

    let total = commit_times.len();
    let first = commit_times[0];
    let last = commit_times[total - 1];
    let days_span = match (last - first).num_days() {
        0 => 1,
        days => days,
    };
    let commits_per_day = round2(total as f64 / days_span as f64);

    let hours = hour_histogram(&commit_times);
    let active_hours = hours
        .iter()
        .take(MAX_ACTIVE_HOURS)
        .filter(|(_, count)| *count as f64 > total as f64 * ACTIVE_HOUR_SHARE)
        .map(|(hour, _)| format!("{:02}-{:02}", hour, hour + 1))
        .collect();
    let timezone_hint = hours
        .first()
        .map(|(peak, _)| timezone_hint(*peak))
        .unwrap_or("unknown")
        .to_string();

    let burst_patterns = if total > 1 {
        let gaps_hours: Vec<f64> = commit_times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_seconds() as f64 / 3600.0)
            .collect();
        let mean_gap = gaps_hours.iter().sum::<f64>() / gaps_hours.len() as f64;
        BurstPatterns {
            intensity: burst_intensity(mean_gap),
            average_duration: burst_duration(mean_gap),
            frequency: burst_frequency(commits_per_day),
        }
    } else {
        BurstPatterns::quiet()
    };

    ActivityPatterns {
        frequency: CommitFrequency {
            commits_per_day,
            active_hours,
            timezone_hint,
        },
        burst_patterns,
    }
}

/// Commit count per hour of day, busiest first. Equal counts keep the
/// order in which the hours first appear.
fn hour_histogram(sorted_times: &[DateTime<FixedOffset>]) -> Vec<(u32, usize)> {
    let mut counts: Vec<(u32, usize)> = Vec::new();
    for time in sorted_times {
        let hour = time.hour();
        match counts.iter_mut().find(|(h, _)| *h == hour) {
            Some((_, count)) => *count += 1,
            None => counts.push((hour, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Coarse UTC offset band for the busiest commit hour.
pub fn timezone_hint(peak_hour: u32) -> &'static str {
    TIMEZONE_BANDS
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&peak_hour))
        .map(|(_, _, band)| *band)
        .unwrap_or("unclear")
}

fn burst_intensity(mean_gap_hours: f64) -> BurstIntensity {
    if mean_gap_hours < 1.0 {
        BurstIntensity::High
    } else if mean_gap_hours < 4.0 {
        BurstIntensity::Moderate
    } else {
        BurstIntensity::Low
    }
}

fn burst_duration(mean_gap_hours: f64) -> BurstDuration {
    if mean_gap_hours < 4.0 {
        BurstDuration::FewHours
    } else if mean_gap_hours < 24.0 {
        BurstDuration::DayLength
    } else {
        BurstDuration::MultiDay
    }
}

fn burst_frequency(commits_per_day: f64) -> BurstFrequency {
    if commits_per_day > 3.0 {
        BurstFrequency::Frequent
    } else if commits_per_day > 1.0 {
        BurstFrequency::Regular
    } else {
        BurstFrequency::Sporadic
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn series(start: &str, step: Duration, count: usize) -> Vec<DateTime<FixedOffset>> {
        let start = at(start);
        (0..count).map(|i| start + step * i as i32).collect()
    }

    #[test]
    fn test_empty_pool_exact_shape() {
        let value = serde_json::to_value(activity_patterns(vec![])).unwrap();
        assert_eq!(
            value,
            json!({
                "frequency": {
                    "commits_per_day": 0,
                    "active_hours": [],
                    "timezone_hint": "unknown"
                },
                "burst_patterns": {
                    "intensity": "low",
                    "average_duration": "n/a",
                    "frequency": "sporadic"
                }
            })
        );
    }

    #[test]
    fn test_morning_burst() {
        let times = series("2024-03-04T09:00:00Z", Duration::minutes(6), 10);
        let patterns = activity_patterns(times);

        assert_eq!(patterns.frequency.commits_per_day, 10.0);
        assert_eq!(patterns.frequency.active_hours, vec!["09-10"]);
        assert_eq!(patterns.frequency.timezone_hint, "UTC+0 to UTC+2");
        assert_eq!(patterns.burst_patterns.intensity, BurstIntensity::High);
        assert_eq!(patterns.burst_patterns.average_duration, BurstDuration::FewHours);
        assert_eq!(patterns.burst_patterns.frequency, BurstFrequency::Frequent);
    }

    #[test]
    fn test_half_hour_gaps_are_high_intensity() {
        let times = series("2024-03-04T09:00:00Z", Duration::minutes(30), 10);
        let patterns = activity_patterns(times);
        assert_eq!(patterns.burst_patterns.intensity, BurstIntensity::High);
        assert_eq!(patterns.frequency.commits_per_day, 10.0);
    }

    #[test]
    fn test_rate_rounds_to_two_decimals() {
        let times = series("2024-01-01T10:00:00Z", Duration::days(1), 4);
        let patterns = activity_patterns(times);
        assert_eq!(patterns.frequency.commits_per_day, 1.33);
        assert_eq!(patterns.burst_patterns.intensity, BurstIntensity::Low);
        assert_eq!(patterns.burst_patterns.average_duration, BurstDuration::MultiDay);
        assert_eq!(patterns.burst_patterns.frequency, BurstFrequency::Regular);
    }

    #[test]
    fn test_active_hours_top_three_above_share() {
        let mut times = Vec::new();
        times.extend(series("2024-01-01T14:00:00Z", Duration::minutes(1), 5));
        times.extend(series("2024-01-02T23:10:00Z", Duration::minutes(1), 3));
        times.extend(series("2024-01-03T02:00:00Z", Duration::minutes(1), 3));
        times.extend(series("2024-01-04T07:00:00Z", Duration::minutes(1), 2));
        times.push(at("2024-01-05T11:00:00Z"));

        let patterns = activity_patterns(times);
        assert_eq!(patterns.frequency.active_hours, vec!["14-15", "23-24", "02-03"]);
        assert_eq!(patterns.frequency.timezone_hint, "UTC-6 to UTC-4");
    }

    #[test]
    fn test_hours_use_local_offset() {
        let times = vec![at("2024-01-01T18:30:00+09:00"), at("2024-01-01T18:45:00+09:00")];
        let patterns = activity_patterns(times);
        assert_eq!(patterns.frequency.active_hours, vec!["18-19"]);
        assert_eq!(patterns.frequency.timezone_hint, "UTC-12 to UTC-8");
    }

    #[test]
    fn test_single_commit() {
        let patterns = activity_patterns(vec![at("2024-01-01T05:00:00Z")]);
        assert_eq!(patterns.frequency.commits_per_day, 1.0);
        assert_eq!(patterns.frequency.active_hours, vec!["05-06"]);
        assert_eq!(patterns.frequency.timezone_hint, "UTC+8 to UTC+10");
        assert_eq!(patterns.burst_patterns, BurstPatterns::quiet());
    }

    #[test]
    fn test_timezone_band_boundaries() {
        assert_eq!(timezone_hint(3), "unclear");
        assert_eq!(timezone_hint(4), "UTC+8 to UTC+10");
        assert_eq!(timezone_hint(8), "UTC+8 to UTC+10");
        assert_eq!(timezone_hint(12), "UTC+0 to UTC+2");
        assert_eq!(timezone_hint(16), "UTC-6 to UTC-4");
        assert_eq!(timezone_hint(20), "UTC-12 to UTC-8");
        assert_eq!(timezone_hint(21), "unclear");
    }
}
