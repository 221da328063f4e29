//! Date and time formatting helpers.
//!
//! All formatters are pure and parameterized by separator. An absent
//! (unparsable) date renders as `--` placeholders instead of aborting
//! the request, so malformed caller input flows through as visible
//! garbage text.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Render a date as `DD<sep>MM<sep>YYYY`, zero-padded.
pub fn format_date(date: Option<NaiveDate>, separator: &str) -> String {
    match date {
        Some(d) => format!(
            "{:02}{sep}{:02}{sep}{}",
            d.day(),
            d.month(),
            d.year(),
            sep = separator
        ),
        None => format!("--{sep}--{sep}----", sep = separator),
    }
}

/// Render a date as `YYYY<sep>DD<sep>MM`, zero-padded.
///
/// The year-day-month field order matches the filename and QR header
/// format of the official layout and is kept for compatibility.
pub fn format_date_alternate(date: Option<NaiveDate>, separator: &str) -> String {
    match date {
        Some(d) => format!(
            "{}{sep}{:02}{sep}{:02}",
            d.year(),
            d.day(),
            d.month(),
            sep = separator
        ),
        None => format!("----{sep}--{sep}--", sep = separator),
    }
}

/// Render a time as `HH<sep>MM`, zero-padded.
pub fn format_time(time: Option<NaiveTime>, separator: &str) -> String {
    match time {
        Some(t) => format!("{:02}{sep}{:02}", t.hour(), t.minute(), sep = separator),
        None => format!("--{sep}--", sep = separator),
    }
}

/// Parse a calendar date, trying the accepted input formats in order.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
    let input = input.trim();
    FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(input, f).ok())
}

/// Parse a timestamp, trying the accepted input formats in order.
/// A date without a time component resolves to midnight.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    let input = input.trim();
    FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
        .or_else(|| parse_date(input).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_format_date_day_month_year() {
        assert_eq!(format_date(Some(date(2021, 4, 16)), "/"), "16/04/2021");
    }

    #[test]
    fn test_format_date_zero_padding() {
        assert_eq!(format_date(Some(date(2021, 1, 5)), "/"), "05/01/2021");
    }

    #[test]
    fn test_format_date_alternate_year_day_month() {
        assert_eq!(
            format_date_alternate(Some(date(2021, 4, 16)), "-"),
            "2021-16-04"
        );
    }

    #[test]
    fn test_format_time() {
        let t = NaiveTime::from_hms_opt(14, 5, 0).unwrap();
        assert_eq!(format_time(Some(t), ":"), "14:05");
        assert_eq!(format_time(Some(t), "-"), "14-05");
    }

    #[test]
    fn test_format_missing_date_renders_placeholders() {
        assert_eq!(format_date(None, "/"), "--/--/----");
        assert_eq!(format_date_alternate(None, "-"), "----------");
        assert_eq!(format_time(None, ":"), "--:--");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("1990-01-02"), Some(date(1990, 1, 2)));
        assert_eq!(parse_date("02/01/1990"), Some(date(1990, 1, 2)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = date(2021, 4, 16).and_hms_opt(14, 5, 0).unwrap();
        assert_eq!(parse_datetime("2021-04-16T14:05:00"), Some(expected));
        assert_eq!(parse_datetime("2021-04-16T14:05"), Some(expected));
        assert_eq!(parse_datetime("2021-04-16 14:05"), Some(expected));
        assert_eq!(
            parse_datetime("2021-04-16"),
            date(2021, 4, 16).and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("garbage"), None);
    }
}
