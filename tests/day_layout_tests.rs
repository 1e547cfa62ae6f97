//! Day-column layout integration tests
//!
//! Exercises the full pass through the public API: geometry from raw
//! JSON records, overlap grouping, and the width/x-offset percentages
//! handed to the renderer.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use calview::day_layout_json;
use calview::StyledEvent;
use test_case::test_case;

/// Base configuration: a full-day window in Berlin on 2024-01-10.
fn config_json(extra: &str) -> String {
    format!(
        r#"{{
            "startField": "start",
            "endField": "end",
            "min": "2024-01-10T00:00:00",
            "totalMinutes": 1440,
            "timezone": "Europe/Berlin"{}{}
        }}"#,
        if extra.is_empty() { "" } else { "," },
        extra
    )
}

fn layout(events: &str, extra_config: &str) -> Vec<StyledEvent> {
    day_layout_json(events, &config_json(extra_config)).expect("layout should succeed")
}

fn by_source(styled: &[StyledEvent], source: usize) -> StyledEvent {
    styled
        .iter()
        .find(|s| s.source == source)
        .cloned()
        .expect("styled event for source")
}

// =============================================================================
// VERTICAL GEOMETRY
// =============================================================================

#[test]
fn test_morning_event_percentages() {
    let styled = layout(
        r#"[{"start": "2024-01-10T09:00:00", "end": "2024-01-10T10:30:00"}]"#,
        "",
    );

    assert_eq!(styled.len(), 1);
    assert_eq!(styled[0].top, 37.5);
    assert_eq!(styled[0].height, 6.25);
}

#[test_case("2024-01-10T00:00:00", 0.0; "at window start")]
#[test_case("2024-01-10T06:00:00", 25.0; "quarter through")]
#[test_case("2024-01-10T12:00:00", 50.0; "midday")]
#[test_case("2024-01-10T18:00:00", 75.0; "evening")]
fn test_top_scales_with_start(start: &str, expected_top: f64) {
    let events = format!(r#"[{{"start": "{start}", "end": "2024-01-10T23:00:00"}}]"#);
    let styled = layout(&events, "");
    assert_eq!(styled[0].top, expected_top);
}

#[test]
fn test_zero_duration_event_has_zero_height() {
    let styled = layout(
        r#"[{"start": "2024-01-10T14:00:00", "end": "2024-01-10T14:00:00"}]"#,
        "",
    );
    assert_eq!(styled[0].height, 0.0);
}

#[test]
fn test_start_before_window_clamps_to_top() {
    // Window begins at 08:00; the event's 06:30 start clamps to slot 0.
    let styled = day_layout_json(
        r#"[{"start": "2024-01-10T06:30:00", "end": "2024-01-10T09:00:00"}]"#,
        r#"{
            "startField": "start",
            "endField": "end",
            "min": "2024-01-10T08:00:00",
            "totalMinutes": 600,
            "timezone": "Europe/Berlin"
        }"#,
    )
    .unwrap();

    assert_eq!(styled[0].top, 0.0);
}

#[test]
fn test_event_past_window_overflows_percentages() {
    // A 600-minute window showing 08:00-18:00; the event runs to 20:00.
    let styled = day_layout_json(
        r#"[{"start": "2024-01-10T17:00:00", "end": "2024-01-10T20:00:00"}]"#,
        r#"{
            "startField": "start",
            "endField": "end",
            "min": "2024-01-10T08:00:00",
            "totalMinutes": 600,
            "timezone": "Europe/Berlin"
        }"#,
    )
    .unwrap();

    // No clamping at the bottom edge; the renderer clips.
    assert!(styled[0].top + styled[0].height > 100.0);
}

#[test]
fn test_epoch_millis_records() {
    // 2024-01-10T09:00:00+01:00 and one hour later, as epoch millis.
    let styled = layout(r#"[{"start": 1704873600000, "end": 1704877200000}]"#, "");
    assert_eq!(styled[0].top, 37.5);
}

#[test]
fn test_calendar_date_record_anchors_at_midnight() {
    let styled = layout(r#"[{"start": "2024-01-10", "end": "2024-01-10"}]"#, "");
    assert_eq!(styled[0].top, 0.0);
    assert_eq!(styled[0].height, 0.0);
}

// =============================================================================
// MULTI-DAY NORMALIZATION
// =============================================================================

#[test]
fn test_spanning_event_through_today_covers_today() {
    // Event day 9 .. day 12, now at day-10 noon: visible range collapses
    // to [now, end of today].
    let styled = layout(
        r#"[{"start": "2024-01-09T00:00:00", "end": "2024-01-12T00:00:00"}]"#,
        r#""showMultiDayTimes": true, "now": "2024-01-10T12:00:00""#,
    );

    assert_eq!(styled[0].top, 50.0); // starts at noon
    let bottom = styled[0].top + styled[0].height;
    assert!(bottom > 99.9 && bottom <= 100.0); // runs to end of day
}

#[test]
fn test_spanning_event_starting_today_ends_at_day_end() {
    let styled = layout(
        r#"[{"start": "2024-01-10T14:00:00", "end": "2024-01-12T06:00:00"}]"#,
        r#""showMultiDayTimes": true, "now": "2024-01-10T09:00:00""#,
    );

    assert_eq!(styled[0].top, 14.0 / 24.0 * 100.0);
    let bottom = styled[0].top + styled[0].height;
    assert!(bottom > 99.9 && bottom <= 100.0);
}

#[test]
fn test_spanning_event_ending_today_starts_now() {
    let styled = layout(
        r#"[{"start": "2024-01-08T14:00:00", "end": "2024-01-10T18:00:00"}]"#,
        r#""showMultiDayTimes": true, "now": "2024-01-10T09:30:00""#,
    );

    assert_eq!(styled[0].top, (9.0 * 60.0 + 30.0) / 1440.0 * 100.0);
    assert_eq!(styled[0].top + styled[0].height, 18.0 / 24.0 * 100.0);
}

#[test]
fn test_normalization_off_keeps_multi_day_span() {
    let styled = layout(
        r#"[{"start": "2024-01-09T14:00:00", "end": "2024-01-12T06:00:00"}]"#,
        r#""now": "2024-01-10T12:00:00""#,
    );

    // Without the flag the span is used as-is: 14:00 through 06:00
    // merged onto the window day.
    assert_eq!(styled[0].top, 14.0 / 24.0 * 100.0);
}

// =============================================================================
// OVERLAP WIDTHS AND OFFSETS
// =============================================================================

#[test]
fn test_lone_event_gets_expanded_width() {
    let styled = layout(
        r#"[{"start": "2024-01-10T09:00:00", "end": "2024-01-10T10:30:00"}]"#,
        "",
    );

    assert_eq!(styled[0].width, 85.0);
    assert_eq!(styled[0].x_offset, 0.0);
}

#[test]
fn test_two_overlapping_events_stagger() {
    let styled = layout(
        r#"[
            {"start": "2024-01-10T09:00:00", "end": "2024-01-10T12:00:00"},
            {"start": "2024-01-10T10:00:00", "end": "2024-01-10T11:00:00"}
        ]"#,
        "",
    );

    let container = by_source(&styled, 0);
    let row = by_source(&styled, 1);

    assert_eq!(container.width, 85.0);
    assert_eq!(container.x_offset, 0.0);
    assert_eq!(row.width, 50.0);
    assert_eq!(row.x_offset, 50.0);
}

#[test]
fn test_row_with_two_leaves_widths_and_offsets() {
    let styled = layout(
        r#"[
            {"start": "2024-01-10T09:00:00", "end": "2024-01-10T15:00:00"},
            {"start": "2024-01-10T10:00:00", "end": "2024-01-10T11:40:00"},
            {"start": "2024-01-10T10:10:00", "end": "2024-01-10T11:30:00"},
            {"start": "2024-01-10T10:20:00", "end": "2024-01-10T11:20:00"}
        ]"#,
        "",
    );

    let container = by_source(&styled, 0);
    let row = by_source(&styled, 1);
    let first_leaf = by_source(&styled, 2);
    let last_leaf = by_source(&styled, 3);

    // columns = 4: container keeps a fair share of 25 and expands.
    assert_eq!(container.width, 42.5);
    // Row and leaves split the remaining 75 three ways.
    assert_eq!(row.width, 42.5);
    assert_eq!(first_leaf.width, 42.5);
    assert_eq!(last_leaf.width, 25.0);

    // Offsets step by the row share, left to right.
    assert_eq!(row.x_offset, 25.0);
    assert_eq!(first_leaf.x_offset, 50.0);
    assert_eq!(last_leaf.x_offset, 75.0);
}

#[test]
fn test_disjoint_events_all_full_rank() {
    let styled = layout(
        r#"[
            {"start": "2024-01-10T08:00:00", "end": "2024-01-10T09:00:00"},
            {"start": "2024-01-10T10:00:00", "end": "2024-01-10T11:00:00"},
            {"start": "2024-01-10T12:00:00", "end": "2024-01-10T13:00:00"}
        ]"#,
        "",
    );

    for styled_event in &styled {
        assert_eq!(styled_event.width, 85.0);
        assert_eq!(styled_event.x_offset, 0.0);
    }
}

// =============================================================================
// DETERMINISM AND EDGE CASES
// =============================================================================

#[test]
fn test_layout_is_deterministic() {
    let events = r#"[
        {"start": "2024-01-10T09:00:00", "end": "2024-01-10T15:00:00"},
        {"start": "2024-01-10T10:00:00", "end": "2024-01-10T11:40:00"},
        {"start": "2024-01-10T10:10:00", "end": "2024-01-10T11:30:00"},
        {"start": "2024-01-10T13:00:00", "end": "2024-01-10T14:00:00"}
    ]"#;

    let first = layout(events, "");
    let second = layout(events, "");
    assert_eq!(first, second);
}

#[test]
fn test_empty_event_set_is_empty_layout() {
    let styled = layout("[]", "");
    assert!(styled.is_empty());
}

#[test]
fn test_every_source_appears_once() {
    let styled = layout(
        r#"[
            {"start": "2024-01-10T09:00:00", "end": "2024-01-10T15:00:00"},
            {"start": "2024-01-10T10:00:00", "end": "2024-01-10T11:40:00"},
            {"start": "2024-01-10T16:00:00", "end": "2024-01-10T17:00:00"}
        ]"#,
        "",
    );

    let mut sources: Vec<usize> = styled.iter().map(|s| s.source).collect();
    sources.sort_unstable();
    assert_eq!(sources, vec![0, 1, 2]);
}

#[test]
fn test_nonpositive_window_is_config_error() {
    let result = day_layout_json(
        "[]",
        r#"{
            "startField": "start",
            "endField": "end",
            "min": "2024-01-10T00:00:00",
            "totalMinutes": 0,
            "timezone": "Europe/Berlin"
        }"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_missing_field_is_accessor_error() {
    let result = day_layout_json(
        r#"[{"begin": "2024-01-10T09:00:00", "end": "2024-01-10T10:00:00"}]"#,
        &config_json(""),
    );
    assert!(result.is_err());
}

#[test]
fn test_unknown_timezone_is_error() {
    let result = day_layout_json(
        "[]",
        r#"{
            "startField": "start",
            "endField": "end",
            "min": "2024-01-10T00:00:00",
            "totalMinutes": 1440,
            "timezone": "Moon/Tranquility"
        }"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_styled_events_serialize_camel_case() {
    let styled = layout(
        r#"[{"start": "2024-01-10T09:00:00", "end": "2024-01-10T10:30:00"}]"#,
        "",
    );
    let json = serde_json::to_value(&styled).unwrap();

    let first = &json[0];
    assert!(first.get("xOffset").is_some());
    assert!(first.get("x_offset").is_none());
}
