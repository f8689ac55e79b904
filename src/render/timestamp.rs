//! Default value normalization for date/time fields.
//!
//! Recognizes "current" expressions (`now`, `sysdate`, `today`, ...) and
//! literal dates, including Italian month names, and renders them for the
//! target dialect.

use super::dialect::DdlDialect;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

static TIMESTAMP_EXPR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(current_timestamp|now)").unwrap());

static DATE_EXPR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(current_date|currdate|sysdate|today)").unwrap());

static TIME_EXPR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(current_time|currtime?)").unwrap());

static ITALIAN_MONTHS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("gennaio|gen", "Jan"),
        ("febbraio", "Feb"),
        ("marzo", "Mar"),
        ("aprile", "Apr"),
        ("maggio|mag", "May"),
        ("giugno|giu", "Jun"),
        ("luglio|lug", "Jul"),
        ("agosto|ago", "Aug"),
        ("settembre|set", "Sep"),
        ("ottobre|ott", "Oct"),
        ("novembre", "Nov"),
        ("dicembre|dic", "Dec"),
    ]
    .into_iter()
    .map(|(pattern, month)| (Regex::new(&format!("(?i){}", pattern)).unwrap(), month))
    .collect()
});

const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%b %d %Y %H:%M:%S",
];

const DATE_FORMATS: [&str; 8] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%d %b, %Y",
    "%b %d %Y",
    "%b %d, %Y",
];

/// Render a timestamp default for `dialect`.
///
/// Returns `None` when the value is neither a known expression nor a
/// parseable date.
pub fn normalize_timestamp(dialect: &dyn DdlDialect, value: &str) -> Option<String> {
    let value = value.trim();

    // Checked before the time expression: current_timestamp starts with current_time
    if TIMESTAMP_EXPR_RE.is_match(value) {
        return Some(dialect.current_timestamp().to_string());
    }
    if DATE_EXPR_RE.is_match(value) {
        return Some(dialect.current_date().to_string());
    }
    if TIME_EXPR_RE.is_match(value) {
        return Some(dialect.current_time().to_string());
    }

    let english = translate_months(value);
    parse_datetime(&english).map(|dt| format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S")))
}

/// Replace Italian month names and abbreviations with English ones
pub fn translate_months(value: &str) -> String {
    ITALIAN_MONTHS
        .iter()
        .fold(value.to_string(), |acc, (re, month)| {
            re.replace_all(&acc, *month).into_owned()
        })
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::dialect::{H2Dialect, OracleDialect};

    #[test]
    fn test_current_expressions() {
        assert_eq!(
            normalize_timestamp(&H2Dialect, "current_timestamp").as_deref(),
            Some("Current_Timestamp")
        );
        assert_eq!(normalize_timestamp(&H2Dialect, "NOW()").as_deref(), Some("Current_Timestamp"));
        assert_eq!(normalize_timestamp(&H2Dialect, " today").as_deref(), Some("Current_Date"));
        assert_eq!(normalize_timestamp(&H2Dialect, "currtime").as_deref(), Some("Current_Time"));
        assert_eq!(normalize_timestamp(&OracleDialect, "now").as_deref(), Some("Sysdate"));
    }

    #[test]
    fn test_literal_dates() {
        assert_eq!(
            normalize_timestamp(&H2Dialect, "2020-03-01").as_deref(),
            Some("'2020-03-01 00:00:00'")
        );
        assert_eq!(
            normalize_timestamp(&H2Dialect, "15/08/2021 10:30").as_deref(),
            Some("'2021-08-15 10:30:00'")
        );
        assert_eq!(
            normalize_timestamp(&H2Dialect, "1 gennaio 2019").as_deref(),
            Some("'2019-01-01 00:00:00'")
        );
        assert_eq!(
            normalize_timestamp(&H2Dialect, "25 Dic 2018").as_deref(),
            Some("'2018-12-25 00:00:00'")
        );
    }

    #[test]
    fn test_unparseable_value() {
        assert_eq!(normalize_timestamp(&H2Dialect, "someday"), None);
    }
}
