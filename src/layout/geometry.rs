//! Vertical placement of a single event within a day column.
//!
//! An [`EventGeometry`] wraps one raw event record together with the view
//! configuration: normalized start/end instants (multi-day spans are
//! renormalized around the current day when enabled) and a slot position
//! plus top/height percentages of the visible time window.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::error::{CalviewError, Result};
use crate::time;
use crate::types::{DayLayoutConfig, InstantAccessor};

/// True if `date`, merged onto `min`'s day, falls before `min` by at
/// least one minute.
pub fn starts_before(date: DateTime<Tz>, min: DateTime<Tz>) -> bool {
    time::lt_minutes(time::merge(min, date), min)
}

/// Minute slot of `date` within a window starting at `min`.
///
/// The date is merged onto the window's day first, so only its
/// time-of-day positions it; starts before the window clamp to 0.
pub fn position_from_date(date: DateTime<Tz>, min: DateTime<Tz>) -> i64 {
    if starts_before(date, min) {
        return 0;
    }
    time::diff_minutes(min, time::merge(min, date))
}

/// Vertical geometry of one event, immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventGeometry {
    /// Minute offset of the normalized start from the window start, ≥ 0.
    pub start_slot: i64,
    /// Minute offset of the normalized end from the window start, ≥ 0.
    pub end_slot: i64,
    /// Top edge as a percentage of the window span.
    pub top: f64,
    /// Height as a percentage of the window span. Events extending past
    /// the window overflow the percentage range; clipping is the
    /// renderer's concern.
    pub height: f64,
    /// Normalized start as epoch milliseconds.
    pub start: i64,
    /// Normalized end as epoch milliseconds.
    pub end: i64,
    /// Index of the source record in the input slice.
    pub source: usize,
}

impl EventGeometry {
    /// Build the geometry for one record.
    ///
    /// Fails only if an accessor cannot produce an instant; every
    /// conversion and normalization path yields a numeric result.
    pub fn from_record<R>(
        record: &R,
        source: usize,
        start_accessor: &dyn InstantAccessor<R>,
        end_accessor: &dyn InstantAccessor<R>,
        config: &DayLayoutConfig,
    ) -> Result<Self> {
        let raw_start = start_accessor.get(record).ok_or_else(|| {
            CalviewError::Accessor(format!("no start instant on record {source}"))
        })?;
        let raw_end = end_accessor
            .get(record)
            .ok_or_else(|| CalviewError::Accessor(format!("no end instant on record {source}")))?;

        let (start, end) = normalize_span(
            raw_start.to_zoned(config.timezone),
            raw_end.to_zoned(config.timezone),
            config,
        );

        let start_slot = position_from_date(start, config.window.min);
        let end_slot = position_from_date(end, config.window.min);

        let total = config.window.total_minutes as f64;
        let top = start_slot as f64 / total * 100.0;
        let height = end_slot as f64 / total * 100.0 - top;

        Ok(Self {
            start_slot,
            end_slot,
            top,
            height,
            start: time::native_time(start),
            end: time::native_time(end),
            source,
        })
    }
}

/// Renormalize a multi-day span around the current day.
///
/// All day comparisons happen at noon to stay clear of DST transitions.
fn normalize_span(
    start: DateTime<Tz>,
    end: DateTime<Tz>,
    config: &DayLayoutConfig,
) -> (DateTime<Tz>, DateTime<Tz>) {
    if !config.show_multi_day_times {
        return (start, end);
    }
    let current = config.now;

    let s = time::at_hour(start, 12);
    let e = time::at_hour(end, 12);
    let c = time::at_hour(current, 12);

    // Current day is at the start but the event spans further: correct
    // the end to the end of this day.
    if c == s && c < e {
        return (start, time::end_of_day(start));
    }

    // Current day is strictly in between: the event spans all of today.
    if c > s && c < e {
        return (current, time::end_of_day(current));
    }

    // Current day is at the end of a multi-day event: it starts now and
    // ends normally.
    if c > s && c == e {
        return (current, end);
    }

    (start, end)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::time::EventInstant;
    use crate::types::{FieldFn, TimeWindow};
    use chrono::TimeZone;

    const TZ: Tz = chrono_tz::Europe::Berlin;

    fn berlin(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        TZ.with_ymd_and_hms(y, mo, d, h, mi, 0).single().unwrap()
    }

    fn config(show_multi_day_times: bool, now: DateTime<Tz>) -> DayLayoutConfig {
        DayLayoutConfig {
            window: TimeWindow {
                min: berlin(2024, 1, 10, 0, 0),
                total_minutes: 1440,
            },
            timezone: TZ,
            show_multi_day_times,
            now,
            row_proximity: 30,
        }
    }

    fn span_accessors() -> (FieldFn<(DateTime<Tz>, DateTime<Tz>)>, FieldFn<(DateTime<Tz>, DateTime<Tz>)>) {
        (
            FieldFn::new(|record: &(DateTime<Tz>, DateTime<Tz>)| {
                Some(EventInstant::Zoned(record.0))
            }),
            FieldFn::new(|record: &(DateTime<Tz>, DateTime<Tz>)| {
                Some(EventInstant::Zoned(record.1))
            }),
        )
    }

    fn geometry(start: DateTime<Tz>, end: DateTime<Tz>, cfg: &DayLayoutConfig) -> EventGeometry {
        let (start_acc, end_acc) = span_accessors();
        EventGeometry::from_record(&(start, end), 0, &start_acc, &end_acc, cfg).unwrap()
    }

    #[test]
    fn test_position_from_date_basic() {
        let min = berlin(2024, 1, 10, 0, 0);
        assert_eq!(position_from_date(berlin(2024, 1, 10, 9, 0), min), 540);
    }

    #[test]
    fn test_position_clamps_before_window() {
        let min = berlin(2024, 1, 10, 8, 0);
        assert_eq!(position_from_date(berlin(2024, 1, 10, 6, 30), min), 0);
        assert!(starts_before(berlin(2024, 1, 10, 6, 30), min));
    }

    #[test]
    fn test_position_uses_time_of_day_only() {
        // The record's own date is irrelevant; only its wall-clock time
        // positions it in the column.
        let min = berlin(2024, 1, 10, 0, 0);
        assert_eq!(position_from_date(berlin(2024, 3, 2, 9, 0), min), 540);
    }

    #[test]
    fn test_morning_event_slots_and_percentages() {
        let cfg = config(false, berlin(2024, 1, 10, 8, 0));
        let geo = geometry(berlin(2024, 1, 10, 9, 0), berlin(2024, 1, 10, 10, 30), &cfg);

        assert_eq!(geo.start_slot, 540);
        assert_eq!(geo.end_slot, 630);
        assert_eq!(geo.top, 37.5);
        assert_eq!(geo.height, 6.25);
    }

    #[test]
    fn test_zero_duration_has_zero_height() {
        let cfg = config(false, berlin(2024, 1, 10, 8, 0));
        let at = berlin(2024, 1, 10, 14, 0);
        let geo = geometry(at, at, &cfg);

        assert_eq!(geo.start_slot, geo.end_slot);
        assert_eq!(geo.height, 0.0);
    }

    #[test]
    fn test_spanning_event_on_start_day_ends_at_day_end() {
        let now = berlin(2024, 1, 10, 9, 0);
        let cfg = config(true, now);
        let geo = geometry(berlin(2024, 1, 10, 14, 0), berlin(2024, 1, 12, 6, 0), &cfg);

        assert_eq!(geo.start_slot, 14 * 60);
        assert_eq!(geo.end_slot, 1439);
    }

    #[test]
    fn test_spanning_event_through_today_covers_today() {
        // Event day 9 .. day 12, now on day 10: the visible range is
        // [now, end of today].
        let now = berlin(2024, 1, 10, 9, 30);
        let cfg = config(true, now);
        let geo = geometry(berlin(2024, 1, 9, 14, 0), berlin(2024, 1, 12, 6, 0), &cfg);

        assert_eq!(geo.start_slot, 9 * 60 + 30);
        assert_eq!(geo.end_slot, 1439);
        assert_eq!(geo.start, now.timestamp_millis());
    }

    #[test]
    fn test_spanning_event_on_end_day_starts_now() {
        let now = berlin(2024, 1, 10, 9, 30);
        let cfg = config(true, now);
        let end = berlin(2024, 1, 10, 18, 0);
        let geo = geometry(berlin(2024, 1, 8, 14, 0), end, &cfg);

        assert_eq!(geo.start, now.timestamp_millis());
        assert_eq!(geo.end, end.timestamp_millis());
        assert_eq!(geo.end_slot, 18 * 60);
    }

    #[test]
    fn test_current_day_outside_span_leaves_values() {
        let now = berlin(2024, 2, 20, 9, 30);
        let cfg = config(true, now);
        let start = berlin(2024, 1, 10, 9, 0);
        let end = berlin(2024, 1, 10, 10, 0);
        let geo = geometry(start, end, &cfg);

        assert_eq!(geo.start, start.timestamp_millis());
        assert_eq!(geo.end, end.timestamp_millis());
    }

    #[test]
    fn test_normalization_disabled_keeps_span() {
        let now = berlin(2024, 1, 10, 9, 30);
        let cfg = config(false, now);
        let start = berlin(2024, 1, 9, 14, 0);
        let end = berlin(2024, 1, 12, 6, 0);
        let geo = geometry(start, end, &cfg);

        assert_eq!(geo.start, start.timestamp_millis());
        assert_eq!(geo.end, end.timestamp_millis());
    }

    #[test]
    fn test_missing_accessor_is_an_error() {
        let cfg = config(false, berlin(2024, 1, 10, 8, 0));
        let none_acc = FieldFn::new(|_: &(DateTime<Tz>, DateTime<Tz>)| None);
        let (start_acc, _) = span_accessors();

        let record = (berlin(2024, 1, 10, 9, 0), berlin(2024, 1, 10, 10, 0));
        let result = EventGeometry::from_record(&record, 3, &start_acc, &none_acc, &cfg);
        assert!(matches!(result, Err(CalviewError::Accessor(_))));
    }
}
