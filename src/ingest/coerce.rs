//! Cell-level coercion of raw CSV text.
//!
//! Sensor exports are noisy: thousands separators, stray whitespace, empty
//! cells, and the occasional plain-text remark in a numeric column. Coercion
//! never fails; anything that is not a finite number becomes the NaN
//! sentinel, so "no value" stays distinguishable from any real reading
//! (including zero).

use chrono::{DateTime, NaiveDateTime, Utc};

/// Coerce raw cell text into a finite number or the NaN sentinel.
///
/// Commas are treated as thousands separators (`"1,234"` → `1234.0`) unless
/// the cell looks like a decimal-comma value (a single comma not followed by
/// a three-digit group, e.g. `"50,0"` → `50.0`), which some exports emit.
pub fn coerce_number(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return f64::NAN;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }

    let cleaned = if is_decimal_comma(trimmed) {
        trimmed.replace(',', ".")
    } else {
        trimmed.replace(',', "")
    };

    match cleaned.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => n,
        _ => f64::NAN,
    }
}

/// A single comma with no dot and a non-three-digit fraction is a decimal
/// comma, not a thousands separator.
fn is_decimal_comma(s: &str) -> bool {
    if s.contains('.') || s.matches(',').count() != 1 {
        return false;
    }
    match s.split(',').nth(1) {
        Some(frac) => frac.len() != 3 && frac.chars().all(|c| c.is_ascii_digit()) && !frac.is_empty(),
        None => false,
    }
}

/// Date-time formats seen in plant exports, tried after RFC 3339.
const INSTANT_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse a timestamp cell into a UTC instant.
///
/// RFC 3339 is tried first; naive date-times are taken as UTC. Returns
/// `None` for anything unparseable (the caller drops and counts the row).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in INSTANT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_coerce_plain_numbers() {
        assert_eq!(coerce_number(Some("55")), 55.0);
        assert_eq!(coerce_number(Some(" 42.5 ")), 42.5);
        assert_eq!(coerce_number(Some("-3.25")), -3.25);
    }

    #[test]
    fn test_coerce_thousands_separators() {
        assert_eq!(coerce_number(Some("1,234")), 1234.0);
        assert_eq!(coerce_number(Some("12,345,678.5")), 12345678.5);
    }

    #[test]
    fn test_coerce_decimal_comma() {
        assert_eq!(coerce_number(Some("50,0")), 50.0);
        assert_eq!(coerce_number(Some("3,14")), 3.14);
    }

    #[test]
    fn test_coerce_sentinel_cases() {
        assert!(coerce_number(None).is_nan());
        assert!(coerce_number(Some("")).is_nan());
        assert!(coerce_number(Some("   ")).is_nan());
        assert!(coerce_number(Some("bad")).is_nan());
        assert!(coerce_number(Some("inf")).is_nan());
        assert!(coerce_number(Some("NaN")).is_nan());
    }

    #[test]
    fn test_parse_instant_rfc3339() {
        let t = parse_instant("2024-01-01T00:30:00Z").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_instant_naive_formats() {
        let t = parse_instant("2024-01-01 06:15:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 1, 1, 6, 15, 0).unwrap());

        let t = parse_instant("01/02/2024 08:00").unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_instant_rejects_garbage() {
        assert!(parse_instant("").is_none());
        assert!(parse_instant("not a time").is_none());
        assert!(parse_instant("2024-13-99").is_none());
    }
}
