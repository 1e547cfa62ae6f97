//! View configuration for day-column layout.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{CalviewError, Result};
use crate::time::EventInstant;

/// Slot-minute proximity within which two events share a row.
pub const DEFAULT_ROW_PROXIMITY: i64 = 30;

/// The visible vertical extent of a day column.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    /// Start instant of the visible window.
    pub min: DateTime<Tz>,
    /// Vertical span of the window in minutes.
    pub total_minutes: i64,
}

impl TimeWindow {
    /// Check the caller contract (`total_minutes > 0`).
    pub fn validate(&self) -> Result<()> {
        if self.total_minutes <= 0 {
            return Err(CalviewError::Config(format!(
                "totalMinutes must be positive, got {}",
                self.total_minutes
            )));
        }
        Ok(())
    }
}

/// Extracts a start or end instant from a raw event record.
///
/// Implementations exist for property-name-style access on JSON records
/// ([`FieldKey`]) and for arbitrary functions ([`FieldFn`]); the layout
/// engine only sees the capability.
pub trait InstantAccessor<R> {
    /// Read the instant from `record`, or `None` if absent/unreadable.
    fn get(&self, record: &R) -> Option<EventInstant>;
}

/// Property-name-style accessor: reads a key of a JSON object record.
#[derive(Debug, Clone)]
pub struct FieldKey(pub String);

impl InstantAccessor<serde_json::Value> for FieldKey {
    fn get(&self, record: &serde_json::Value) -> Option<EventInstant> {
        record.get(&self.0).and_then(EventInstant::from_json)
    }
}

/// Function-style accessor wrapping any closure over the record type.
pub struct FieldFn<R>(Box<dyn Fn(&R) -> Option<EventInstant>>);

impl<R> FieldFn<R> {
    /// Wrap a closure as an accessor.
    pub fn new(f: impl Fn(&R) -> Option<EventInstant> + 'static) -> Self {
        Self(Box::new(f))
    }
}

impl<R> InstantAccessor<R> for FieldFn<R> {
    fn get(&self, record: &R) -> Option<EventInstant> {
        (self.0)(record)
    }
}

/// Full configuration for laying out one day column.
#[derive(Debug, Clone)]
pub struct DayLayoutConfig {
    /// Visible window of the column.
    pub window: TimeWindow,
    /// Target timezone all event instants convert into.
    pub timezone: Tz,
    /// Whether multi-day events are renormalized around the current day.
    pub show_multi_day_times: bool,
    /// The current moment, sampled once per layout pass and fixed for the
    /// whole computation.
    pub now: DateTime<Tz>,
    /// Slot-minute proximity within which two events share a row.
    pub row_proximity: i64,
}

impl DayLayoutConfig {
    /// Check the caller contract before layout runs.
    pub fn validate(&self) -> Result<()> {
        self.window.validate()
    }
}

/// Layout configuration as received across the JSON boundary (JS or CLI).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonLayoutConfig {
    /// Record key holding the event start instant.
    pub start_field: String,
    /// Record key holding the event end instant.
    pub end_field: String,
    /// Window start; bare datetimes resolve in `timezone`.
    pub min: String,
    /// Window span in minutes.
    pub total_minutes: i64,
    /// IANA timezone name.
    pub timezone: String,
    #[serde(default)]
    pub show_multi_day_times: bool,
    /// Current-moment override; defaults to the ambient clock.
    #[serde(default)]
    pub now: Option<String>,
    #[serde(default = "default_row_proximity")]
    pub row_proximity: i64,
}

fn default_row_proximity() -> i64 {
    DEFAULT_ROW_PROXIMITY
}

impl JsonLayoutConfig {
    /// Resolve into a layout config plus the two field accessors.
    ///
    /// `ambient_now` is used when the config carries no explicit `now`;
    /// callers sample it once at the boundary.
    pub fn resolve(&self, ambient_now: DateTime<Utc>) -> Result<(DayLayoutConfig, FieldKey, FieldKey)> {
        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| CalviewError::Timezone(self.timezone.clone()))?;

        let min = EventInstant::parse(&self.min)
            .ok_or_else(|| CalviewError::Date(self.min.clone()))?
            .to_zoned(timezone);

        let now = match &self.now {
            Some(s) => EventInstant::parse(s)
                .ok_or_else(|| CalviewError::Date(s.clone()))?
                .to_zoned(timezone),
            None => ambient_now.with_timezone(&timezone),
        };

        let config = DayLayoutConfig {
            window: TimeWindow {
                min,
                total_minutes: self.total_minutes,
            },
            timezone,
            show_multi_day_times: self.show_multi_day_times,
            now,
            row_proximity: self.row_proximity,
        };
        config.validate()?;

        Ok((
            config,
            FieldKey(self.start_field.clone()),
            FieldKey(self.end_field.clone()),
        ))
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
    use chrono::TimeZone;

    fn json_config() -> JsonLayoutConfig {
        serde_json::from_value(serde_json::json!({
            "startField": "start",
            "endField": "end",
            "min": "2024-01-10T00:00:00",
            "totalMinutes": 1440,
            "timezone": "Europe/Berlin",
        }))
        .unwrap()
    }

    #[test]
    fn test_resolve_defaults() {
        let (config, start, end) = json_config().resolve(Utc::now()).unwrap();

        assert_eq!(config.window.total_minutes, 1440);
        assert_eq!(config.timezone, chrono_tz::Europe::Berlin);
        assert!(!config.show_multi_day_times);
        assert_eq!(config.row_proximity, DEFAULT_ROW_PROXIMITY);
        assert_eq!(start.0, "start");
        assert_eq!(end.0, "end");
    }

    #[test]
    fn test_resolve_explicit_now() {
        let mut json = json_config();
        json.now = Some("2024-01-10T12:00:00".to_string());

        let (config, _, _) = json.resolve(Utc::now()).unwrap();
        assert_eq!(config.now.to_rfc3339(), "2024-01-10T12:00:00+01:00");
    }

    #[test]
    fn test_resolve_ambient_now_converts_zone() {
        let ambient = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let (config, _, _) = json_config().resolve(ambient).unwrap();

        assert_eq!(config.now.timestamp(), ambient.timestamp());
        assert_eq!(config.now.timezone(), chrono_tz::Europe::Berlin);
    }

    #[test]
    fn test_bad_timezone_rejected() {
        let mut json = json_config();
        json.timezone = "Mars/Olympus".to_string();
        assert!(matches!(
            json.resolve(Utc::now()),
            Err(CalviewError::Timezone(_))
        ));
    }

    #[test]
    fn test_nonpositive_window_rejected() {
        let mut json = json_config();
        json.total_minutes = 0;
        assert!(matches!(
            json.resolve(Utc::now()),
            Err(CalviewError::Config(_))
        ));
    }

    #[test]
    fn test_field_key_reads_json_records() {
        let record = serde_json::json!({"start": "2024-01-10T09:00:00"});
        let key = FieldKey("start".to_string());

        assert!(key.get(&record).is_some());
        assert!(FieldKey("missing".to_string()).get(&record).is_none());
    }

    #[test]
    fn test_field_fn_wraps_closures() {
        let accessor = FieldFn::new(|millis: &i64| {
            EventInstant::from_json(&serde_json::json!(*millis))
        });
        assert!(accessor.get(&1704870000000).is_some());
    }
}
