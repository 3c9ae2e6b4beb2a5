//! Leave duration and balance rules.

use chrono::NaiveDate;

/// Number of calendar days a request spans, endpoints included.
///
/// A single-day request (start == end) counts as 1. A negative result
/// means the range is inverted and the request is invalid.
pub fn total_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Days left for a leave type given its yearly allowance and the days
/// already taken, floored at zero.
pub fn remaining_balance(max_days_per_year: u32, used: i64) -> i64 {
    (i64::from(max_days_per_year) - used).max(0)
}
