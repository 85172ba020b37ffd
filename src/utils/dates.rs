// Lenient date reading for upstream "date-like" fields
use crate::models::FieldValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Epoch values above this are read as milliseconds rather than seconds.
const MILLIS_THRESHOLD: f64 = 100_000_000_000.0;

pub fn parse_date_str(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn parse_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    let millis = if value > MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    Utc.timestamp_millis_opt(millis as i64).single()
}

/// Reads a date from a string or an epoch number. Anything else is `None`.
pub fn parse_date_like(value: &FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Text(s) => parse_date_str(s),
        FieldValue::Number(n) => n.as_f64().and_then(parse_epoch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
        assert_eq!(parse_date_str("2024-03-05T10:30:00Z"), Some(expected));
        assert_eq!(parse_date_str("2024-03-05T12:30:00+02:00"), Some(expected));
        assert_eq!(parse_date_str("2024-03-05 10:30:00"), Some(expected));
        assert_eq!(
            parse_date_str("2024-03-05"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date_str("next tuesday"), None);
    }

    #[test]
    fn test_parse_epoch_seconds_and_millis() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 10, 30, 0).unwrap();
        let secs = expected.timestamp() as f64;
        assert_eq!(parse_epoch(secs), Some(expected));
        assert_eq!(parse_epoch(secs * 1000.0), Some(expected));
        assert_eq!(parse_epoch(-1.0), None);
    }

    #[test]
    fn test_parse_date_like_field() {
        assert!(parse_date_like(&FieldValue::from_json(Some(&json!("2024-01-01")))).is_some());
        assert!(parse_date_like(&FieldValue::from_json(Some(&json!(1704067200)))).is_some());
        assert!(parse_date_like(&FieldValue::from_json(Some(&json!(true)))).is_none());
        assert!(parse_date_like(&FieldValue::Missing).is_none());
    }
}
