//! Range-relative window slicing with fallback-anchor logic.
//!
//! A window is measured backward from an anchor instant: open on the left,
//! closed on the right. A point exactly at the anchor is included; a point
//! exactly at `anchor - width` is excluded.
//!
//! When the primary anchor is "now" but the loaded data is historical (a
//! static sample export), a now-anchored window is always empty. Supplying
//! the dataset's latest instant as a fallback anchor keeps consumers
//! populated, and `RangeSlice::used_fallback` reports which anchor actually
//! produced the data so the distinction is never hidden.

use crate::core::series::SeriesPoint;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of relative windows an operator can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    FifteenMinutes,
    OneHour,
    EightHours,
    TwentyFourHours,
    All,
}

/// How to resolve a range key outside the closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownRangePolicy {
    /// Fail open: treat the key as `All` (the original dashboard behavior).
    #[default]
    TreatAsAll,
    /// Fail closed: reject the key with an input error.
    Reject,
}

/// An unrecognized range key under the `Reject` policy.
#[derive(Debug, Error)]
#[error("unknown range specifier: {0:?}")]
pub struct RangeError(pub String);

impl TimeRange {
    /// Window width in minutes; `None` for `All`.
    pub fn window_minutes(self) -> Option<i64> {
        match self {
            TimeRange::FifteenMinutes => Some(15),
            TimeRange::OneHour => Some(60),
            TimeRange::EightHours => Some(480),
            TimeRange::TwentyFourHours => Some(1440),
            TimeRange::All => None,
        }
    }

    /// The wire key for this range.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::FifteenMinutes => "15m",
            TimeRange::OneHour => "1h",
            TimeRange::EightHours => "8h",
            TimeRange::TwentyFourHours => "24h",
            TimeRange::All => "all",
        }
    }

    /// Parse a wire key, resolving unknown keys per `policy`.
    pub fn parse(key: &str, policy: UnknownRangePolicy) -> Result<Self, RangeError> {
        match key {
            "15m" => Ok(TimeRange::FifteenMinutes),
            "1h" => Ok(TimeRange::OneHour),
            "8h" => Ok(TimeRange::EightHours),
            "24h" => Ok(TimeRange::TwentyFourHours),
            "all" => Ok(TimeRange::All),
            other => match policy {
                UnknownRangePolicy::TreatAsAll => Ok(TimeRange::All),
                UnknownRangePolicy::Reject => Err(RangeError(other.to_string())),
            },
        }
    }
}

/// Result of a slice: the matching points and which anchor produced them.
#[derive(Debug, Clone, Serialize)]
pub struct RangeSlice {
    pub points: Vec<SeriesPoint>,
    pub anchor_used: DateTime<Utc>,
    pub used_fallback: bool,
}

/// Slice `series` by a window counting back from `anchor`.
///
/// If the primary-anchor window is empty and `fallback` is supplied, the
/// slice is repeated at the fallback anchor and reported as such.
pub fn slice_by_range(
    series: &[SeriesPoint],
    range: TimeRange,
    anchor: DateTime<Utc>,
    fallback: Option<DateTime<Utc>>,
) -> RangeSlice {
    let Some(minutes) = range.window_minutes() else {
        return RangeSlice {
            points: series.to_vec(),
            anchor_used: anchor,
            used_fallback: false,
        };
    };
    let width = Duration::minutes(minutes);

    let window = |at: DateTime<Utc>| -> Vec<SeriesPoint> {
        let from = at - width;
        series
            .iter()
            .filter(|p| p.t > from && p.t <= at)
            .copied()
            .collect()
    };

    let points = window(anchor);
    if points.is_empty() {
        if let Some(fallback) = fallback {
            return RangeSlice {
                points: window(fallback),
                anchor_used: fallback,
                used_fallback: true,
            };
        }
    }

    RangeSlice {
        points,
        anchor_used: anchor,
        used_fallback: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant(min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 1, min, 0).unwrap()
    }

    fn point(min: u32, v: f64) -> SeriesPoint {
        SeriesPoint { t: instant(min), v }
    }

    #[test]
    fn test_all_returns_full_series_for_any_anchor() {
        let series = vec![point(0, 1.0), point(30, 2.0)];
        let slice = slice_by_range(&series, TimeRange::All, instant(5), None);
        assert_eq!(slice.points, series);
        assert!(!slice.used_fallback);
    }

    #[test]
    fn test_window_is_open_left_closed_right() {
        // Anchor 01:59, 1h window: lower bound is exactly 00:59.
        let series = vec![
            SeriesPoint { t: Utc.with_ymd_and_hms(2024, 1, 1, 0, 59, 0).unwrap(), v: 1.0 },
            point(30, 2.0),
            point(59, 3.0),
        ];
        let slice = slice_by_range(&series, TimeRange::OneHour, instant(59), None);

        // Point exactly at the lower bound excluded; at the anchor included.
        assert_eq!(slice.points.len(), 2);
        assert_eq!(slice.points[0].v, 2.0);
        assert_eq!(slice.points[1].v, 3.0);
    }

    #[test]
    fn test_fallback_anchor_used_when_primary_empty() {
        let series = vec![point(0, 1.0), point(30, 2.0)];
        let far_future = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();

        let slice = slice_by_range(&series, TimeRange::OneHour, far_future, Some(instant(30)));
        assert!(slice.used_fallback);
        assert_eq!(slice.anchor_used, instant(30));
        assert_eq!(slice.points, series);
    }

    #[test]
    fn test_empty_after_fallback_is_valid_not_error() {
        let series: Vec<SeriesPoint> = vec![];
        let slice = slice_by_range(&series, TimeRange::OneHour, instant(0), Some(instant(0)));
        assert!(slice.points.is_empty());
        assert!(slice.used_fallback);
    }

    #[test]
    fn test_no_fallback_returns_empty_primary_result() {
        let series = vec![point(0, 1.0)];
        let far_future = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let slice = slice_by_range(&series, TimeRange::FifteenMinutes, far_future, None);
        assert!(slice.points.is_empty());
        assert!(!slice.used_fallback);
        assert_eq!(slice.anchor_used, far_future);
    }

    #[test]
    fn test_parse_known_keys() {
        for (key, range) in [
            ("15m", TimeRange::FifteenMinutes),
            ("1h", TimeRange::OneHour),
            ("8h", TimeRange::EightHours),
            ("24h", TimeRange::TwentyFourHours),
            ("all", TimeRange::All),
        ] {
            let parsed = TimeRange::parse(key, UnknownRangePolicy::Reject).unwrap();
            assert_eq!(parsed, range);
            assert_eq!(parsed.as_str(), key);
        }
    }

    #[test]
    fn test_unknown_key_policy() {
        let open = TimeRange::parse("3d", UnknownRangePolicy::TreatAsAll).unwrap();
        assert_eq!(open, TimeRange::All);

        let err = TimeRange::parse("3d", UnknownRangePolicy::Reject).unwrap_err();
        assert!(err.to_string().contains("3d"));
    }

    #[test]
    fn test_one_hour_slice_drops_lower_bound_point() {
        // Points at 00:00 and 00:30; anchor 01:00 with a 1h window keeps
        // only 00:30 (the lower bound 00:00 is excluded).
        let series = vec![
            SeriesPoint { t: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), v: 50.0 },
            SeriesPoint { t: Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap(), v: 55.0 },
        ];
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        let slice = slice_by_range(&series, TimeRange::OneHour, anchor, None);
        assert_eq!(slice.points.len(), 1);
        assert_eq!(slice.points[0].v, 55.0);
    }
}
