//! Parsing of query-string values.
//!
//! Every helper returns `None` for an empty or unparsable value; callers skip the
//! filter in that case.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Layout accepted by [`parse_time`] when none is given: RFC 3339.
pub const RFC3339: &str = "%+";

/// Parse a 64-bit integer.
pub fn parse_int(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Parse a 64-bit float.
pub fn parse_float(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// Parse a point in time.
///
/// Accepts `now` (any case), a unix epoch in seconds, or a timestamp in `layout`
/// (a chrono format string; RFC 3339 when `None`). Layouts without an offset are
/// read as UTC.
pub fn parse_time(s: &str, layout: Option<&str>) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    if s.eq_ignore_ascii_case("now") {
        return Some(Utc::now());
    }
    if let Ok(secs) = s.parse::<i64>() {
        return Utc.timestamp_opt(secs, 0).single();
    }
    match layout {
        None | Some(RFC3339) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Some(layout) => DateTime::parse_from_str(s, layout)
            .map(|t| t.with_timezone(&Utc))
            .or_else(|_| NaiveDateTime::parse_from_str(s, layout).map(|t| t.and_utc()))
            .ok(),
    }
}

/// Parse a comma separated list of integers, dropping invalid entries and
/// duplicates while keeping first-seen order.
pub fn int_args(s: &str) -> Vec<i64> {
    let mut out: Vec<i64> = Vec::new();
    for part in s.split(',') {
        let Ok(v) = part.trim().parse::<i64>() else {
            continue;
        };
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn ints() {
        assert_eq!(parse_int("666"), Some(666));
        assert_eq!(parse_int(""), None);
        assert_eq!(parse_int("NOT AN INT"), None);
    }

    #[test]
    fn floats() {
        assert_eq!(parse_float("10.5"), Some(10.5));
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("NOT A FLOAT"), None);
    }

    #[test]
    fn int_list_dedups_in_order() {
        assert_eq!(int_args("9,1,2,a,b,c,2"), vec![9, 1, 2]);
        assert!(int_args("").is_empty());
    }

    #[test]
    fn time_now() {
        let before = Utc::now();
        let t = parse_time("NOW", None).unwrap();
        assert!(t >= before);
    }

    #[test]
    fn time_epoch() {
        let t = parse_time("1640995200", None).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn time_rfc3339() {
        let t = parse_time("2022-12-31T23:59:59+07:00", None).unwrap();
        assert_eq!(t, Utc.with_ymd_and_hms(2022, 12, 31, 16, 59, 59).unwrap());
    }

    #[test]
    fn time_custom_layout_without_offset() {
        let t = parse_time("2022-01-01 00:00:00", Some("%Y-%m-%d %H:%M:%S")).unwrap();
        assert_eq!(t.year(), 2022);
        assert_eq!(t, Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn time_layout_mismatch() {
        assert_eq!(parse_time("2022-12-31 23:59:59 07:00", None), None);
        assert_eq!(parse_time("", None), None);
    }
}
