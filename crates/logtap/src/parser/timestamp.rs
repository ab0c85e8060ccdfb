//! Timestamp — layout matching for structured fields and free-text search.
//!
//! Timezone-less layouts are read as UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Epoch values above this are milliseconds, otherwise seconds.
pub const EPOCH_MILLIS_THRESHOLD: f64 = 1_000_000_000_000.0;

/// Naive layouts, tried in order after RFC3339.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

/// Offset layouts RFC3339 does not cover (space separator, `+hhmm`).
const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%z",
];

/// Parse a string against the ordered layout list.
pub fn parse_layouts(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let zoned = match s.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => s.to_string(),
    };
    if let Some(dt) = OFFSET_LAYOUTS
        .iter()
        .find_map(|layout| DateTime::parse_from_str(&zoned, layout).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(s, layout).ok())
        .map(|naive| naive.and_utc())
}

/// Interpret a Unix epoch number (seconds or milliseconds).
pub fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }

    if value > EPOCH_MILLIS_THRESHOLD {
        let millis = value.trunc() as i64;
        let nanos = ((value.fract() * 1_000_000.0).round() as i64).clamp(0, 999_999);
        DateTime::from_timestamp_millis(millis)
            .map(|dt| dt + chrono::Duration::nanoseconds(nanos))
    } else {
        let secs = value.floor() as i64;
        let nanos = ((value - value.floor()) * 1_000_000_000.0).round() as u32;
        DateTime::from_timestamp(secs, nanos.min(999_999_999))
    }
}

/// Extract a timestamp from a structured field value.
pub fn from_json(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        Value::String(s) => parse_layouts(s).or_else(|| {
            let digits = s.trim();
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                digits.parse::<f64>().ok().and_then(from_epoch)
            } else {
                None
            }
        }),
        _ => None,
    }
}

static TEXT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // RFC3339 with offset or Z, optional fraction
        r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})",
        // ISO-ish without zone, T or space separator, optional fraction
        // A directly attached offset is captured so it is not dropped.
        r"\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?",
        r"\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}",
    ]
    .into_iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Find the first timestamp in free text.
///
/// Patterns are tried in order and scanning stops at the first pattern whose
/// match parses. This is not a search for the latest timestamp in the line.
pub fn find_in_text(text: &str) -> Option<DateTime<Utc>> {
    TEXT_PATTERNS
        .iter()
        .filter_map(|re| re.find(text))
        .find_map(|m| parse_layouts(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use serde_json::json;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_rfc3339_variants() {
        assert_eq!(parse_layouts("2024-01-15T10:30:45Z"), Some(utc(2024, 1, 15, 10, 30, 45)));
        assert_eq!(
            parse_layouts("2024-01-15T12:30:45+02:00"),
            Some(utc(2024, 1, 15, 10, 30, 45))
        );
        let frac = parse_layouts("2024-01-15T10:30:45.123Z").unwrap();
        assert_eq!(frac.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_parse_naive_layouts() {
        assert_eq!(parse_layouts("2024-01-15 10:30:45"), Some(utc(2024, 1, 15, 10, 30, 45)));
        assert_eq!(parse_layouts("2024/01/15 10:30:45"), Some(utc(2024, 1, 15, 10, 30, 45)));
        let frac = parse_layouts("2024-01-15 10:30:45.250").unwrap();
        assert_eq!(frac.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_layouts("yesterday"), None);
        assert_eq!(parse_layouts("2024-13-45 99:99:99"), None);
    }

    #[test]
    fn test_epoch_seconds_and_millis() {
        assert_eq!(from_epoch(1_705_314_645.0), Some(utc(2024, 1, 15, 10, 30, 45)));
        assert_eq!(from_epoch(1_705_314_645_000.0), Some(utc(2024, 1, 15, 10, 30, 45)));
        let ms = from_epoch(1_705_314_645_250.0).unwrap();
        assert_eq!(ms.timestamp_subsec_millis(), 250);
        let frac = from_epoch(1_705_314_645.5).unwrap();
        assert_eq!(frac.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_from_json_values() {
        assert_eq!(from_json(&json!(1_705_314_645)), Some(utc(2024, 1, 15, 10, 30, 45)));
        assert_eq!(from_json(&json!("2024-01-15T10:30:45Z")), Some(utc(2024, 1, 15, 10, 30, 45)));
        assert_eq!(from_json(&json!("1705314645000")), Some(utc(2024, 1, 15, 10, 30, 45)));
        assert_eq!(from_json(&json!("not a time")), None);
        assert_eq!(from_json(&json!(true)), None);
    }

    #[test]
    fn test_find_in_text_first_pattern_wins() {
        let found = find_in_text("2024-01-15 10:30:45 ERROR boom").unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 45)
            .unwrap()
            .and_utc();
        assert_eq!(found, expected);

        // RFC3339 outranks the slash layout even when it appears later
        let found = find_in_text("2023/05/01 00:00:00 retry of 2024-01-15T10:30:45Z").unwrap();
        assert_eq!(found, utc(2024, 1, 15, 10, 30, 45));
    }

    #[test]
    fn test_space_separated_offset_honored() {
        assert_eq!(
            parse_layouts("2024-01-15 10:30:45+02:00"),
            Some(utc(2024, 1, 15, 8, 30, 45))
        );
        assert_eq!(
            parse_layouts("2024-01-15 10:30:45Z"),
            Some(utc(2024, 1, 15, 10, 30, 45))
        );

        let found = find_in_text("2024-01-15 10:30:45+02:00 WARN slow disk").unwrap();
        assert_eq!(found, utc(2024, 1, 15, 8, 30, 45));

        let found = find_in_text("2024-01-15T10:30:45+0200 compact offset").unwrap();
        assert_eq!(found, utc(2024, 1, 15, 8, 30, 45));

        let found = find_in_text("2024-01-15 10:30:45.500-0500 retrying").unwrap();
        assert_eq!(found, utc(2024, 1, 15, 15, 30, 45) + chrono::Duration::milliseconds(500));
    }

    #[test]
    fn test_find_in_text_none() {
        assert_eq!(find_in_text("no time in here"), None);
    }
}
