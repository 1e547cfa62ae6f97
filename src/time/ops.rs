//! Primitive operations on zoned timestamps.
//!
//! Calendar-unit arithmetic (days, weeks) preserves wall-clock time across
//! DST transitions by shifting the date and re-resolving in the zone;
//! sub-day arithmetic is plain instant arithmetic. Minute-level
//! comparisons floor both operands to whole minutes.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Weekday};
use chrono_tz::Tz;

use super::instant::resolve_local;

/// Calendar/time unit for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Minutes,
    Hours,
    Day,
    Week,
}

/// Add `amount` units to a timestamp.
pub fn add(dt: DateTime<Tz>, amount: i64, unit: DateUnit) -> DateTime<Tz> {
    match unit {
        DateUnit::Minutes => dt + Duration::minutes(amount),
        DateUnit::Hours => dt + Duration::hours(amount),
        DateUnit::Day => shift_days(dt, amount),
        DateUnit::Week => shift_days(dt, amount * 7),
    }
}

/// Shift by whole calendar days, keeping the wall-clock time.
fn shift_days(dt: DateTime<Tz>, days: i64) -> DateTime<Tz> {
    let date = dt.date_naive() + Duration::days(days);
    resolve_local(date.and_time(dt.time()), dt.timezone())
}

/// Midnight at the start of the timestamp's day.
pub fn start_of_day(dt: DateTime<Tz>) -> DateTime<Tz> {
    resolve_local(dt.date_naive().and_time(NaiveTime::MIN), dt.timezone())
}

/// The last represented millisecond of the timestamp's day (23:59:59.999).
pub fn end_of_day(dt: DateTime<Tz>) -> DateTime<Tz> {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    resolve_local(dt.date_naive().and_time(last), dt.timezone())
}

/// Midnight at the start of the week containing `dt`, for a given first
/// day of the week.
pub fn start_of_week(dt: DateTime<Tz>, week_start: Weekday) -> DateTime<Tz> {
    let days_back = i64::from(
        (dt.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7,
    );
    start_of_day(shift_days(dt, -days_back))
}

/// End of the week containing `dt` (last millisecond of its seventh day).
pub fn end_of_week(dt: DateTime<Tz>, week_start: Weekday) -> DateTime<Tz> {
    end_of_day(shift_days(start_of_week(dt, week_start), 6))
}

/// Ordered sequence of day starts from `start` through `end`, inclusive.
pub fn day_range(start: DateTime<Tz>, end: DateTime<Tz>) -> Vec<DateTime<Tz>> {
    let tz = start.timezone();
    let mut days = Vec::new();
    let mut date = start.date_naive();
    let last = end.date_naive();
    while date <= last {
        days.push(resolve_local(date.and_time(NaiveTime::MIN), tz));
        date += Duration::days(1);
    }
    days
}

/// Whole-minute difference `b − a`, with both operands floored to minutes.
pub fn diff_minutes(a: DateTime<Tz>, b: DateTime<Tz>) -> i64 {
    floor_to_minute(b) - floor_to_minute(a)
}

/// True if `a` is earlier than `b` at minute precision.
pub fn lt_minutes(a: DateTime<Tz>, b: DateTime<Tz>) -> bool {
    floor_to_minute(a) < floor_to_minute(b)
}

fn floor_to_minute(dt: DateTime<Tz>) -> i64 {
    dt.timestamp_millis().div_euclid(60_000)
}

/// Combine the calendar day of `day_of` with the wall-clock time of `time_of`.
pub fn merge(day_of: DateTime<Tz>, time_of: DateTime<Tz>) -> DateTime<Tz> {
    resolve_local(day_of.date_naive().and_time(time_of.time()), day_of.timezone())
}

/// Epoch milliseconds of the instant.
pub fn native_time(dt: DateTime<Tz>) -> i64 {
    dt.timestamp_millis()
}

/// The timestamp with its time-of-day replaced by `hour`:00:00.
pub fn at_hour(dt: DateTime<Tz>, hour: u32) -> DateTime<Tz> {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    resolve_local(dt.date_naive().and_time(time), dt.timezone())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn berlin(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        chrono_tz::Europe::Berlin
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .unwrap()
    }

    #[test]
    fn test_merge_takes_day_and_time() {
        let day = berlin(2024, 1, 10, 0, 0);
        let time = berlin(2024, 3, 5, 9, 45);

        let merged = merge(day, time);
        assert_eq!(merged.date_naive(), day.date_naive());
        assert_eq!(merged.time(), time.time());
    }

    #[test]
    fn test_diff_minutes_spans_day() {
        let min = berlin(2024, 1, 10, 0, 0);
        assert_eq!(diff_minutes(min, berlin(2024, 1, 10, 9, 0)), 540);
        assert_eq!(diff_minutes(min, end_of_day(min)), 1439);
    }

    #[test]
    fn test_lt_minutes_ignores_seconds() {
        let a = berlin(2024, 1, 10, 9, 0);
        let b = a + Duration::seconds(30);
        assert!(!lt_minutes(a, b));
        assert!(lt_minutes(a, b + Duration::seconds(30)));
    }

    #[test]
    fn test_start_of_week_monday() {
        let start = start_of_week(berlin(2024, 1, 10, 15, 30), Weekday::Mon);
        assert_eq!(start.date_naive().to_string(), "2024-01-08");
        assert_eq!(start.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_start_of_week_sunday() {
        let start = start_of_week(berlin(2024, 1, 10, 15, 30), Weekday::Sun);
        assert_eq!(start.date_naive().to_string(), "2024-01-07");
    }

    #[test]
    fn test_end_of_week_is_last_day() {
        let end = end_of_week(berlin(2024, 1, 10, 15, 30), Weekday::Mon);
        assert_eq!(end.date_naive().to_string(), "2024-01-14");
        assert_eq!(end.time().hour(), 23);
    }

    #[test]
    fn test_day_range_inclusive() {
        let start = berlin(2024, 1, 8, 0, 0);
        let end = berlin(2024, 1, 14, 23, 59);

        let range = day_range(start, end);
        assert_eq!(range.len(), 7);
        assert_eq!(range[0].date_naive().to_string(), "2024-01-08");
        assert_eq!(range[6].date_naive().to_string(), "2024-01-14");
    }

    #[test]
    fn test_add_week_preserves_wall_clock_over_dst() {
        // Berlin springs forward on 2024-03-31
        let before = berlin(2024, 3, 28, 9, 0);
        let after = add(before, 1, DateUnit::Week);

        assert_eq!(after.date_naive().to_string(), "2024-04-04");
        assert_eq!(after.time(), before.time());
    }

    #[test]
    fn test_at_hour_replaces_time_of_day() {
        let noon = at_hour(berlin(2024, 1, 10, 17, 42), 12);
        assert_eq!(noon.time(), NaiveTime::from_hms_opt(12, 0, 0).unwrap());
    }
}
