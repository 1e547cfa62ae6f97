//! Source timestamp representations and timezone conversion.
//!
//! Application records carry event times in one of three shapes: a bare
//! calendar date, a wall-clock datetime with no zone, or a fully zoned
//! timestamp. Each shape converts to the view's target timezone with its
//! own rule; the conversion always yields a value, never an error.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// A source event timestamp, tagged by representation.
#[derive(Debug, Clone, PartialEq)]
pub enum EventInstant {
    /// Calendar date with no time-of-day; anchors at midnight in the target zone.
    CalendarDate(NaiveDate),
    /// Wall-clock date and time, resolved in the target zone.
    LocalDateTime(NaiveDateTime),
    /// Fully zoned timestamp.
    Zoned(DateTime<Tz>),
}

impl EventInstant {
    /// Convert to a zoned timestamp in `tz`.
    ///
    /// A zoned value already in `tz` passes through unchanged; a zoned
    /// value in another zone shifts instant-preserving. Wall-clock values
    /// resolve in `tz`, with DST gaps falling back to reinterpreting the
    /// wall-clock as an absolute UTC instant.
    pub fn to_zoned(&self, tz: Tz) -> DateTime<Tz> {
        match self {
            Self::CalendarDate(date) => resolve_local(date.and_time(NaiveTime::MIN), tz),
            Self::LocalDateTime(naive) => resolve_local(*naive, tz),
            Self::Zoned(dt) => {
                if dt.timezone() == tz {
                    *dt
                } else {
                    dt.with_timezone(&tz)
                }
            }
        }
    }

    /// Parse an instant from a JSON value.
    ///
    /// Numbers are epoch milliseconds. Strings are tried as RFC 3339
    /// (→ zoned), then as a bare datetime (→ wall-clock), then as a bare
    /// date (→ calendar date).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                let millis = n.as_i64()?;
                let utc = DateTime::from_timestamp_millis(millis)?;
                Some(Self::Zoned(utc.with_timezone(&chrono_tz::UTC)))
            }
            serde_json::Value::String(s) => Self::parse(s),
            _ => None,
        }
    }

    /// Parse an instant from a string, choosing the variant by shape.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::Zoned(dt.with_timezone(&chrono_tz::UTC)));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Some(Self::LocalDateTime(naive));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(Self::CalendarDate(date));
        }
        None
    }
}

/// Resolve a wall-clock datetime in `tz`.
///
/// Ambiguous local times (DST fall-back) take the earlier offset;
/// nonexistent local times (DST spring-forward gap) fall back to the
/// absolute instant the wall-clock would denote in UTC, expressed in `tz`.
pub(crate) fn resolve_local(naive: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => Utc.from_utc_datetime(&naive).with_timezone(&tz),
    }
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
    use chrono::{Offset, Timelike};

    fn tz(name: &str) -> Tz {
        name.parse().unwrap()
    }

    #[test]
    fn test_calendar_date_anchors_at_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let zoned = EventInstant::CalendarDate(date).to_zoned(tz("America/New_York"));

        assert_eq!(zoned.date_naive(), date);
        assert_eq!(zoned.time(), NaiveTime::MIN);
    }

    #[test]
    fn test_zoned_same_zone_passes_through() {
        let target = tz("Europe/Berlin");
        let dt = target
            .with_ymd_and_hms(2024, 6, 1, 9, 30, 0)
            .single()
            .unwrap();

        let zoned = EventInstant::Zoned(dt).to_zoned(target);
        assert_eq!(zoned, dt);
    }

    #[test]
    fn test_zoned_cross_zone_preserves_instant() {
        let utc = chrono_tz::UTC
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .unwrap();

        let zoned = EventInstant::Zoned(utc).to_zoned(tz("America/New_York"));
        assert_eq!(zoned.timestamp(), utc.timestamp());
        assert_eq!(zoned.hour(), 8); // EDT is UTC-4 in June
    }

    #[test]
    fn test_ambiguous_local_takes_earlier_offset() {
        // 2024-11-03 01:30 happens twice in New York (fall-back)
        let naive = NaiveDate::from_ymd_opt(2024, 11, 3)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();

        let resolved = resolve_local(naive, tz("America/New_York"));
        assert_eq!(resolved.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn test_gap_local_still_resolves() {
        // 2024-03-10 02:30 does not exist in New York (spring-forward)
        let naive = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(2, 30, 0)
            .unwrap();

        // Falls back to the absolute-instant interpretation; must not panic.
        let resolved = resolve_local(naive, tz("America/New_York"));
        assert_eq!(resolved.timestamp(), Utc.from_utc_datetime(&naive).timestamp());
    }

    #[test]
    fn test_parse_rfc3339() {
        let instant = EventInstant::parse("2024-01-10T09:00:00+02:00").unwrap();
        let EventInstant::Zoned(dt) = instant else {
            panic!("expected zoned variant");
        };
        assert_eq!(dt.timestamp(), 1704870000);
    }

    #[test]
    fn test_parse_local_datetime() {
        let instant = EventInstant::parse("2024-01-10T09:00:00").unwrap();
        assert!(matches!(instant, EventInstant::LocalDateTime(_)));
    }

    #[test]
    fn test_parse_calendar_date() {
        let instant = EventInstant::parse("2024-01-10").unwrap();
        assert_eq!(
            instant,
            EventInstant::CalendarDate(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())
        );
    }

    #[test]
    fn test_from_json_epoch_millis() {
        let value = serde_json::json!(1704870000000_i64);
        let instant = EventInstant::from_json(&value).unwrap();
        let EventInstant::Zoned(dt) = instant else {
            panic!("expected zoned variant");
        };
        assert_eq!(dt.timestamp_millis(), 1704870000000);
    }

    #[test]
    fn test_from_json_rejects_other_shapes() {
        assert!(EventInstant::from_json(&serde_json::json!(null)).is_none());
        assert!(EventInstant::from_json(&serde_json::json!({"at": 1})).is_none());
        assert!(EventInstant::from_json(&serde_json::json!("not a date")).is_none());
    }
}
