//! Date and time helpers
//!
//! Timestamps are stored as Unix milliseconds. Attendance and leave dates
//! are stored as `YYYY-MM-DD` strings on the server's local calendar, so
//! "one record per employee per day" follows the clock the office runs on.

use chrono::{Datelike, Local, NaiveDate, TimeZone, Utc};

pub const DATE_FMT: &str = "%Y-%m-%d";

/// Current time as Unix milliseconds
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Today's date on the local calendar
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Today's date formatted as `YYYY-MM-DD`
pub fn today_string() -> String {
    format_date(today())
}

/// Current local calendar year
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FMT).ok()
}

/// Format a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FMT).to_string()
}

/// Local `HH:MM:SS` for a Unix-millisecond timestamp, used by exports
pub fn format_time_of_day(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}

/// First and last date strings of a calendar year, for range filters
pub fn year_bounds(year: i32) -> (String, String) {
    (format!("{year}-01-01"), format!("{year}-12-31"))
}

/// English month name for a 1-based month number
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        let date = parse_date("2025-03-14").unwrap();
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 3);
        assert_eq!(date.day(), 14);

        assert!(parse_date("not-a-date").is_none());
        assert!(parse_date("2025-13-01").is_none());
        // Trailing whitespace is tolerated
        assert!(parse_date(" 2025-03-14 ").is_some());
    }

    #[test]
    fn test_format_roundtrip() {
        let date = parse_date("2025-01-31").unwrap();
        assert_eq!(format_date(date), "2025-01-31");
    }

    #[test]
    fn test_year_bounds() {
        let (from, to) = year_bounds(2025);
        assert_eq!(from, "2025-01-01");
        assert_eq!(to, "2025-12-31");
        // The bounds sort around every date of the year
        assert!(from.as_str() <= "2025-06-15" && "2025-06-15" <= to.as_str());
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "January");
        assert_eq!(month_name(12), "December");
        assert_eq!(month_name(0), "");
        assert_eq!(month_name(13), "");
    }

    #[test]
    fn test_format_time_of_day() {
        assert_eq!(format_time_of_day(0).len(), 8);
    }
}
