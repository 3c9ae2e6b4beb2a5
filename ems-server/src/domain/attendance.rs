//! Attendance working-hours and status rules.

use rust_decimal::Decimal;

use crate::db::models::AttendanceStatus;
use crate::domain::money::to_f64;

/// Hours on the clock that count as a full working day.
pub const FULL_DAY_HOURS: f64 = 8.0;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// Hours between check-in and check-out, rounded to two decimal places.
///
/// Returns 0.0 when the interval is empty or inverted.
pub fn working_hours(check_in: i64, check_out: i64) -> f64 {
    let elapsed = check_out - check_in;
    if elapsed <= 0 {
        return 0.0;
    }
    to_f64(Decimal::from(elapsed) / Decimal::from(MILLIS_PER_HOUR))
}

/// Status derived from hours worked: a full day is `Present`, anything
/// shorter is `Half-day`. A status set explicitly by an admin is never
/// overwritten by this derivation.
pub fn status_for_hours(hours: f64) -> AttendanceStatus {
    if hours >= FULL_DAY_HOURS {
        AttendanceStatus::Present
    } else {
        AttendanceStatus::HalfDay
    }
}

/// Share of records counted as attended (`Present` or `Half-day`), as a
/// whole percentage. Empty input yields 0.
pub fn attendance_rate(statuses: &[AttendanceStatus]) -> u32 {
    if statuses.is_empty() {
        return 0;
    }
    let attended = statuses
        .iter()
        .filter(|s| matches!(s, AttendanceStatus::Present | AttendanceStatus::HalfDay))
        .count();
    ((attended as f64 / statuses.len() as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3_600_000;

    #[test]
    fn working_hours_full_day() {
        // 09:00 to 17:30 is 8.5 hours.
        let check_in = 9 * HOUR;
        let check_out = 17 * HOUR + HOUR / 2;
        assert_eq!(working_hours(check_in, check_out), 8.5);
    }

    #[test]
    fn working_hours_rounds_to_two_places() {
        // 100 minutes = 1.666... hours.
        assert_eq!(working_hours(0, 100 * 60 * 1000), 1.67);
    }

    #[test]
    fn working_hours_inverted_interval_is_zero() {
        assert_eq!(working_hours(HOUR, 0), 0.0);
        assert_eq!(working_hours(HOUR, HOUR), 0.0);
    }

    #[test]
    fn eight_and_a_half_hours_is_present() {
        assert_eq!(status_for_hours(8.5), AttendanceStatus::Present);
    }

    #[test]
    fn exactly_eight_hours_is_present() {
        assert_eq!(status_for_hours(8.0), AttendanceStatus::Present);
    }

    #[test]
    fn short_day_is_half_day() {
        assert_eq!(status_for_hours(7.99), AttendanceStatus::HalfDay);
        assert_eq!(status_for_hours(3.0), AttendanceStatus::HalfDay);
    }

    #[test]
    fn rate_counts_present_and_half_day() {
        let statuses = [
            AttendanceStatus::Present,
            AttendanceStatus::HalfDay,
            AttendanceStatus::Absent,
            AttendanceStatus::Leave,
        ];
        assert_eq!(attendance_rate(&statuses), 50);
    }

    #[test]
    fn rate_rounds_to_nearest_percent() {
        let statuses = [
            AttendanceStatus::Present,
            AttendanceStatus::Present,
            AttendanceStatus::Absent,
        ];
        // 2/3 = 66.67% rounds to 67.
        assert_eq!(attendance_rate(&statuses), 67);
    }

    #[test]
    fn rate_of_no_records_is_zero() {
        assert_eq!(attendance_rate(&[]), 0);
    }
}
