//! Week view integration tests
//!
//! Tests for range computation, navigation and titles through the
//! public API, including the parameters handed to the time grid.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use calview::{CultureConfig, NavigateAction, RangeProvider, TitleFormats, WeekView};
use chrono::{DateTime, Datelike, TimeZone, Weekday};
use chrono_tz::Tz;

fn anchor(timezone: Tz, y: i32, mo: u32, d: u32) -> DateTime<Tz> {
    timezone
        .with_ymd_and_hms(y, mo, d, 12, 0, 0)
        .single()
        .unwrap()
}

// =============================================================================
// RANGE COMPUTATION
// =============================================================================

#[test]
fn test_week_of_january_10th_monday_start() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 10);
    let range = WeekView.range(date, &CultureConfig::default());

    let days: Vec<String> = range
        .iter()
        .map(|d| d.date_naive().to_string())
        .collect();
    assert_eq!(
        days,
        vec![
            "2024-01-08",
            "2024-01-09",
            "2024-01-10",
            "2024-01-11",
            "2024-01-12",
            "2024-01-13",
            "2024-01-14",
        ]
    );
}

#[test]
fn test_anchor_on_week_start_stays() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 8);
    let range = WeekView.range(date, &CultureConfig::default());

    assert_eq!(range[0].date_naive(), date.date_naive());
}

#[test]
fn test_sunday_week_start_shifts_range() {
    let date = anchor(chrono_tz::America::New_York, 2024, 1, 10);
    let culture = CultureConfig {
        week_start: Weekday::Sun,
    };
    let range = WeekView.range(date, &culture);

    assert_eq!(range[0].weekday(), Weekday::Sun);
    assert_eq!(range[0].date_naive().to_string(), "2024-01-07");
    assert_eq!(range[6].date_naive().to_string(), "2024-01-13");
}

#[test]
fn test_range_spans_dst_transition() {
    // Berlin springs forward on Sunday 2024-03-31, inside this week.
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 3, 27);
    let range = WeekView.range(date, &CultureConfig::default());

    assert_eq!(range.len(), 7);
    assert_eq!(range[6].date_naive().to_string(), "2024-03-31");
    // Day boundaries stay at local midnight through the transition.
    for day in &range {
        assert_eq!(day.time(), chrono::NaiveTime::MIN);
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

#[test]
fn test_navigation_round_trip() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 10);
    let view = WeekView;

    let there = view.navigate(date, NavigateAction::Next);
    let back = view.navigate(there, NavigateAction::Previous);

    assert_eq!(back, date);
}

#[test]
fn test_navigation_shifts_range_by_seven_days() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 10);
    let view = WeekView;
    let culture = CultureConfig::default();

    let this_week = view.range(date, &culture);
    let next_week = view.range(view.navigate(date, NavigateAction::Next), &culture);

    for (a, b) in this_week.iter().zip(&next_week) {
        assert_eq!((b.date_naive() - a.date_naive()).num_days(), 7);
    }
}

#[test]
fn test_navigate_date_is_identity() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 10);
    assert_eq!(WeekView.navigate(date, NavigateAction::Date), date);
}

// =============================================================================
// TITLES AND GRID PARAMETERS
// =============================================================================

#[test]
fn test_default_title() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 10);
    let title = WeekView.title(date, &TitleFormats::default(), &CultureConfig::default());

    assert_eq!(title, "Jan 08 – Jan 14");
}

#[test]
fn test_title_with_custom_format() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 10);
    let formats = TitleFormats {
        day_range_header: "%d/%m".to_string(),
        separator: " - ".to_string(),
    };
    let title = WeekView.title(date, &formats, &CultureConfig::default());

    assert_eq!(title, "08/01 - 14/01");
}

#[test]
fn test_grid_params_delegate_range_bounds() {
    let date = anchor(chrono_tz::Europe::Berlin, 2024, 1, 10);
    let params = WeekView.grid_params(date, &CultureConfig::default());

    assert_eq!(params.min.date_naive().to_string(), "2024-01-08");
    assert_eq!(params.max.date_naive().to_string(), "2024-01-14");
    assert_eq!(params.range.len(), 7);
    assert_eq!(params.event_offset, calview::views::EVENT_OFFSET);
}
