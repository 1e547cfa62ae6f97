//! Calendar view variants (range providers).
//!
//! A view variant turns an anchor date plus locale configuration into the
//! ordered day boundaries it displays, and knows how to navigate the
//! anchor and title the visible range.

mod week;

pub use week::{TimeGridParams, WeekView, EVENT_OFFSET};

use chrono::{DateTime, Weekday};
use chrono_tz::Tz;

/// Navigation action over a view's anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateAction {
    Previous,
    Next,
    /// Jump straight to the given date; no movement.
    Date,
}

/// Locale configuration for range computation.
#[derive(Debug, Clone, Copy)]
pub struct CultureConfig {
    /// First day of the week.
    pub week_start: Weekday,
}

impl Default for CultureConfig {
    fn default() -> Self {
        Self {
            week_start: Weekday::Mon,
        }
    }
}

/// Formats used when building a view title.
#[derive(Debug, Clone)]
pub struct TitleFormats {
    /// strftime pattern applied to the range's first and last dates.
    pub day_range_header: String,
    /// Separator between the two formatted dates.
    pub separator: String,
}

impl Default for TitleFormats {
    fn default() -> Self {
        Self {
            day_range_header: "%b %d".to_string(),
            separator: " – ".to_string(),
        }
    }
}

/// A calendar view variant that provides its visible date range.
pub trait RangeProvider {
    /// Move the anchor date per `action`.
    fn navigate(&self, date: DateTime<Tz>, action: NavigateAction) -> DateTime<Tz>;

    /// Ordered day boundaries the view displays.
    fn range(&self, date: DateTime<Tz>, culture: &CultureConfig) -> Vec<DateTime<Tz>>;

    /// Human-readable title for the visible range.
    fn title(&self, date: DateTime<Tz>, formats: &TitleFormats, culture: &CultureConfig)
        -> String;
}
