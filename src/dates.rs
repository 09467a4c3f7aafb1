//! Date-expression and duration parsing for the query CLI.
//!
//! Query arguments are free-form-ish date strings. Full natural-language
//! parsing is out of scope; this accepts the formats that actually show up
//! in practice (RFC 3339, common `YYYY-MM-DD` variants, bare epoch
//! seconds) plus `now`/`today`/`yesterday` conveniences. Everything is
//! interpreted in the same timezone-naive frame the database is written
//! in.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::error::{Result, WhereDbError};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// Parse one date expression into epoch seconds, relative to `now`.
///
/// # Errors
/// [`WhereDbError::DateParse`] when no supported format matches. An empty
/// expression is a parse error too; the CLI treats it as a usage error
/// before getting here.
pub fn parse_date_expression(expr: &str, now: NaiveDateTime) -> Result<i64> {
    let s = expr.trim();
    if s.is_empty() {
        return Err(WhereDbError::DateParse(expr.to_string()));
    }

    match s.to_ascii_lowercase().as_str() {
        "now" => return Ok(epoch(now)),
        "today" => return Ok(epoch(start_of_day(now.date()))),
        "yesterday" => return Ok(epoch(start_of_day(now.date() - Duration::days(1)))),
        _ => {}
    }

    // offset-annotated timestamps keep their wall-clock value, matching
    // the naive normalization used at generation time
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(epoch(dt.naive_local()));
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(epoch(dt));
        }
    }

    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Ok(epoch(start_of_day(d)));
        }
    }

    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }

    Err(WhereDbError::DateParse(expr.to_string()))
}

/// Parse a `2h30m`-style duration into seconds.
///
/// Accepts any sequence of `<integer><unit>` terms with units `d`, `h`,
/// `m`, `s`, or a bare integer meaning seconds.
pub fn parse_duration(expr: &str) -> Result<i64> {
    let s = expr.trim();
    if s.is_empty() {
        return Err(WhereDbError::DateParse(expr.to_string()));
    }

    if let Ok(secs) = s.parse::<i64>() {
        return Ok(secs);
    }

    let mut total: i64 = 0;
    let mut digits = String::new();
    for c in s.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        let value: i64 = digits
            .parse()
            .map_err(|_| WhereDbError::DateParse(expr.to_string()))?;
        digits.clear();
        let unit = match c.to_ascii_lowercase() {
            'd' => 86_400,
            'h' => 3_600,
            'm' => 60,
            's' => 1,
            _ => return Err(WhereDbError::DateParse(expr.to_string())),
        };
        total += value * unit;
    }
    if !digits.is_empty() {
        // trailing number without a unit
        return Err(WhereDbError::DateParse(expr.to_string()));
    }

    Ok(total)
}

fn epoch(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp()
}

fn start_of_day(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(0, 0, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        "2020-06-15T10:30:00".parse().unwrap()
    }

    #[test]
    fn test_parse_plain_date() {
        let e = parse_date_expression("2020-01-01", now()).unwrap();
        assert_eq!(e, 1577836800);
    }

    #[test]
    fn test_parse_datetime_variants() {
        let expected = parse_date_expression("2020-01-01T12:30:00", now()).unwrap();
        assert_eq!(
            parse_date_expression("2020-01-01 12:30:00", now()).unwrap(),
            expected
        );
        assert_eq!(
            parse_date_expression("2020-01-01 12:30", now()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        let with_offset = parse_date_expression("2020-01-01T12:30:00-05:00", now()).unwrap();
        let naive = parse_date_expression("2020-01-01T12:30:00", now()).unwrap();
        assert_eq!(with_offset, naive);
    }

    #[test]
    fn test_parse_epoch_passthrough() {
        assert_eq!(parse_date_expression("1577836800", now()).unwrap(), 1577836800);
    }

    #[test]
    fn test_parse_relative_keywords() {
        let n = now();
        assert_eq!(parse_date_expression("now", n).unwrap(), n.and_utc().timestamp());
        let today = parse_date_expression("today", n).unwrap();
        let yesterday = parse_date_expression("Yesterday", n).unwrap();
        assert_eq!(today - yesterday, 86_400);
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(matches!(
            parse_date_expression("not a date", now()),
            Err(WhereDbError::DateParse(_))
        ));
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(parse_date_expression("   ", now()).is_err());
    }

    #[test]
    fn test_duration_compound() {
        assert_eq!(parse_duration("2h30m").unwrap(), 9000);
    }

    #[test]
    fn test_duration_single_units() {
        assert_eq!(parse_duration("1d").unwrap(), 86_400);
        assert_eq!(parse_duration("45s").unwrap(), 45);
        assert_eq!(parse_duration("90m").unwrap(), 5_400);
    }

    #[test]
    fn test_duration_bare_seconds() {
        assert_eq!(parse_duration("3600").unwrap(), 3600);
    }

    #[test]
    fn test_duration_rejects_unknown_unit() {
        assert!(parse_duration("3w").is_err());
        assert!(parse_duration("h").is_err());
    }
}
