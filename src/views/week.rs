//! Week view: a 7-day range aligned to the locale's week start.

use chrono::DateTime;
use chrono_tz::Tz;

use crate::time::{self, DateUnit};

use super::{CultureConfig, NavigateAction, RangeProvider, TitleFormats};

/// Pixel offset the grid reserves around rendered events.
pub const EVENT_OFFSET: u32 = 15;

/// The week view variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekView;

/// Parameters the week view hands to the generic time-grid renderer.
#[derive(Debug, Clone)]
pub struct TimeGridParams {
    /// First day boundary of the visible range.
    pub min: DateTime<Tz>,
    /// Last day boundary of the visible range.
    pub max: DateTime<Tz>,
    /// Ordered day boundaries.
    pub range: Vec<DateTime<Tz>>,
    /// Pixel offset the grid reserves around rendered events.
    pub event_offset: u32,
}

impl WeekView {
    /// Assemble the renderer parameters for the week containing `date`.
    pub fn grid_params(&self, date: DateTime<Tz>, culture: &CultureConfig) -> TimeGridParams {
        let range = self.range(date, culture);
        let min = range.first().copied().unwrap_or(date);
        let max = range.last().copied().unwrap_or(date);
        TimeGridParams {
            min,
            max,
            range,
            event_offset: EVENT_OFFSET,
        }
    }
}

impl RangeProvider for WeekView {
    fn navigate(&self, date: DateTime<Tz>, action: NavigateAction) -> DateTime<Tz> {
        match action {
            NavigateAction::Previous => time::add(date, -1, DateUnit::Week),
            NavigateAction::Next => time::add(date, 1, DateUnit::Week),
            NavigateAction::Date => date,
        }
    }

    fn range(&self, date: DateTime<Tz>, culture: &CultureConfig) -> Vec<DateTime<Tz>> {
        let start = time::start_of_week(date, culture.week_start);
        let end = time::end_of_week(date, culture.week_start);
        time::day_range(start, end)
    }

    fn title(
        &self,
        date: DateTime<Tz>,
        formats: &TitleFormats,
        culture: &CultureConfig,
    ) -> String {
        let range = self.range(date, culture);
        let (Some(start), Some(end)) = (range.first(), range.last()) else {
            return String::new();
        };
        let pattern = valid_pattern(&formats.day_range_header);
        format!(
            "{}{}{}",
            start.format(pattern),
            formats.separator,
            end.format(pattern)
        )
    }
}

/// Use the configured strftime pattern if chrono accepts it, else the
/// default header pattern, so a bad format cannot poison the title.
fn valid_pattern(pattern: &str) -> &str {
    use chrono::format::{Item, StrftimeItems};
    let valid = StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error));
    if valid {
        pattern
    } else {
        "%b %d"
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
    use chrono::{TimeZone, Weekday};

    const TZ: Tz = chrono_tz::Europe::Berlin;

    fn anchor() -> DateTime<Tz> {
        TZ.with_ymd_and_hms(2024, 1, 10, 15, 30, 0).single().unwrap()
    }

    #[test]
    fn test_range_is_seven_days_from_monday() {
        let range = WeekView.range(anchor(), &CultureConfig::default());

        assert_eq!(range.len(), 7);
        assert_eq!(range[0].date_naive().to_string(), "2024-01-08");
        assert_eq!(range[6].date_naive().to_string(), "2024-01-14");
        for pair in range.windows(2) {
            assert_eq!((pair[1].date_naive() - pair[0].date_naive()).num_days(), 1);
        }
    }

    #[test]
    fn test_range_honours_week_start() {
        let culture = CultureConfig {
            week_start: Weekday::Sun,
        };
        let range = WeekView.range(anchor(), &culture);

        assert_eq!(range[0].date_naive().to_string(), "2024-01-07");
        assert_eq!(range[6].date_naive().to_string(), "2024-01-13");
    }

    #[test]
    fn test_navigate_moves_by_week() {
        let view = WeekView;
        let date = anchor();

        let previous = view.navigate(date, NavigateAction::Previous);
        let next = view.navigate(date, NavigateAction::Next);

        assert_eq!(previous.date_naive().to_string(), "2024-01-03");
        assert_eq!(next.date_naive().to_string(), "2024-01-17");
        assert_eq!(view.navigate(date, NavigateAction::Date), date);
    }

    #[test]
    fn test_title_combines_range_bounds() {
        let title = WeekView.title(anchor(), &TitleFormats::default(), &CultureConfig::default());
        assert_eq!(title, "Jan 08 – Jan 14");
    }

    #[test]
    fn test_title_falls_back_on_bad_pattern() {
        let formats = TitleFormats {
            day_range_header: "%!".to_string(),
            separator: " to ".to_string(),
        };
        let title = WeekView.title(anchor(), &formats, &CultureConfig::default());
        assert_eq!(title, "Jan 08 to Jan 14");
    }

    #[test]
    fn test_grid_params_bound_the_range() {
        let params = WeekView.grid_params(anchor(), &CultureConfig::default());

        assert_eq!(params.range.len(), 7);
        assert_eq!(params.min, params.range[0]);
        assert_eq!(params.max, params.range[6]);
        assert_eq!(params.event_offset, EVENT_OFFSET);
    }
}
