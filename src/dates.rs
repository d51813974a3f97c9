//! Legistar date normalization.
//!
//! Legistar sends dates either in the legacy `/Date(1700000000000)/` wrapper
//! (milliseconds since the Unix epoch, optionally followed by a `-0800`
//! style offset) or as ISO-8601 strings with or without a trailing `Z`.
//! Legacy timestamps are reduced to their UTC calendar date. ISO strings keep
//! the calendar date as written; any offset is dropped, not applied.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a date value could not be normalized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("date value is empty")]
    Empty,

    #[error("unrecognized date shape: {0}")]
    UnrecognizedShape(String),

    #[error("timestamp out of range: {0}ms")]
    TimestampOutOfRange(i64),

    #[error("invalid ISO-8601 date: {0}")]
    InvalidIso(String),
}

fn legacy_regex() -> &'static Regex {
    static LEGACY: OnceLock<Regex> = OnceLock::new();
    LEGACY.get_or_init(|| {
        Regex::new(r"^/Date\((-?\d+)(?:[+-]\d{4})?\)/$").expect("legacy date pattern is valid")
    })
}

/// Parse one Legistar date value into its UTC calendar date
pub fn parse_legistar_date(value: &str) -> Result<NaiveDate, DateParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DateParseError::Empty);
    }

    if value.starts_with("/Date(") {
        let millis = legacy_regex()
            .captures(value)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| DateParseError::UnrecognizedShape(value.to_string()))?
            .as_str()
            .parse::<i64>()
            .map_err(|_| DateParseError::UnrecognizedShape(value.to_string()))?;

        return DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|dt| dt.date_naive())
            .ok_or(DateParseError::TimestampOutOfRange(millis));
    }

    parse_iso(value)
}

fn parse_iso(value: &str) -> Result<NaiveDate, DateParseError> {
    let value = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(rest) => format!("{}+00:00", rest),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&value) {
        return Ok(dt.date_naive());
    }

    // Offset forms rfc3339 rejects, like minute precision
    for format in ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M%:z"] {
        if let Ok(dt) = DateTime::parse_from_str(&value, format) {
            return Ok(dt.date_naive());
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(&value, format) {
            return Ok(dt.date());
        }
    }

    NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map_err(|_| DateParseError::InvalidIso(value))
}

/// Normalize an optional date to `YYYY-MM-DD`, or `""` when it is absent or unparseable
pub fn normalize_date(value: Option<&str>) -> String {
    value
        .map(parse_legistar_date)
        .and_then(|parsed| parsed.ok())
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_timestamp_resolves_to_utc_date() {
        assert_eq!(normalize_date(Some("/Date(1700000000000)/")), "2023-11-14");
    }

    #[test]
    fn legacy_timestamp_ignores_trailing_offset() {
        assert_eq!(
            normalize_date(Some("/Date(1700000000000-0800)/")),
            "2023-11-14"
        );
    }

    #[test]
    fn legacy_timestamp_before_epoch() {
        assert_eq!(normalize_date(Some("/Date(-86400000)/")), "1969-12-31");
    }

    #[test]
    fn iso_with_z_suffix() {
        assert_eq!(normalize_date(Some("2024-03-05T23:59:59Z")), "2024-03-05");
    }

    #[test]
    fn iso_with_offset_keeps_the_written_date() {
        assert_eq!(
            normalize_date(Some("2024-03-05T20:00:00-08:00")),
            "2024-03-05"
        );
        assert_eq!(
            normalize_date(Some("2024-03-05T01:00:00+09:00")),
            "2024-03-05"
        );
    }

    #[test]
    fn iso_minute_precision_with_zone() {
        assert_eq!(normalize_date(Some("2024-03-05T10:15Z")), "2024-03-05");
        assert_eq!(normalize_date(Some("2024-03-05T10:15+00:00")), "2024-03-05");
        assert_eq!(normalize_date(Some("2024-03-05T23:30-08:00")), "2024-03-05");
    }

    #[test]
    fn naive_iso_forms() {
        assert_eq!(normalize_date(Some("2024-03-05T00:00:00")), "2024-03-05");
        assert_eq!(normalize_date(Some("2024-03-05T10:15:00.123")), "2024-03-05");
        assert_eq!(normalize_date(Some("2024-03-05")), "2024-03-05");
    }

    #[test]
    fn empty_and_malformed_degrade_to_empty_string() {
        assert_eq!(normalize_date(None), "");
        assert_eq!(normalize_date(Some("")), "");
        assert_eq!(normalize_date(Some("   ")), "");
        assert_eq!(normalize_date(Some("next tuesday")), "");
        assert_eq!(normalize_date(Some("/Date()/")), "");
        assert_eq!(normalize_date(Some("/Date(abc)/")), "");
        assert_eq!(normalize_date(Some("2024-13-45")), "");
    }

    #[test]
    fn parse_errors_are_inspectable() {
        assert_eq!(parse_legistar_date(""), Err(DateParseError::Empty));
        assert!(matches!(
            parse_legistar_date("/Date(12)"),
            Err(DateParseError::UnrecognizedShape(_))
        ));
        assert!(matches!(
            parse_legistar_date("/Date(99999999999999999)/"),
            Err(DateParseError::TimestampOutOfRange(_))
        ));
        assert!(matches!(
            parse_legistar_date("yesterday"),
            Err(DateParseError::InvalidIso(_))
        ));
    }
}
