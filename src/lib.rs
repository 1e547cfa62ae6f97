//! calview - calendar week-view layout for the web
//!
//! Computes the event layout a calendar renderer consumes, in the browser
//! via WebAssembly or natively:
//! - Vertical placement from time spans (minute slots, top/height
//!   percentages of the visible window)
//! - Overlap grouping into containers, rows and leaves with staggered
//!   width/x-offset percentages
//! - Week ranges, navigation and titles per locale
//!
//! Rendering stays on the consumer side; this crate only ships numbers.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { layout_day } from 'calview';
//! await init();
//! const styles = JSON.parse(layout_day(eventsJson, configJson));
//! ```

// Core modules
pub mod error;
pub mod layout;
pub mod time;
pub mod types;
pub mod views;

use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use wasm_bindgen::prelude::*;

pub use error::CalviewError;
pub use layout::styled_events;
pub use types::*;
pub use views::{CultureConfig, NavigateAction, RangeProvider, TitleFormats, WeekView};

use crate::time::EventInstant;

/// Install the panic hook for readable errors in the browser console.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
fn start() {
    console_error_panic_hook::set_once();
}

/// Sample the ambient clock once, as UTC.
#[cfg(target_arch = "wasm32")]
fn ambient_now() -> DateTime<Utc> {
    // Date.now() is integral milliseconds, well within i64 range.
    #[allow(clippy::cast_possible_truncation)]
    let millis = js_sys::Date::now() as i64;
    DateTime::from_timestamp_millis(millis).unwrap_or(DateTime::UNIX_EPOCH)
}

/// Sample the ambient clock once, as UTC.
#[cfg(not(target_arch = "wasm32"))]
fn ambient_now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse a day-column layout request from JSON and run it.
///
/// `events_json` is a JSON array of event records; `config_json` is a
/// [`JsonLayoutConfig`] document. When the config carries no `now`, the
/// ambient clock is sampled once for the whole pass.
///
/// # Errors
/// Returns an error if either JSON document is invalid or the
/// configuration violates the caller contract.
pub fn day_layout_json(events_json: &str, config_json: &str) -> error::Result<Vec<StyledEvent>> {
    let events: Vec<serde_json::Value> = serde_json::from_str(events_json)?;
    let json_config: JsonLayoutConfig = serde_json::from_str(config_json)?;
    let (config, start, end) = json_config.resolve(ambient_now())?;
    layout::styled_events(&events, &start, &end, &config)
}

/// Compute a day column's event layout and return it as a JSON string.
///
/// # Arguments
/// * `events_json` - JSON array of event records
/// * `config_json` - layout configuration (camelCase fields)
///
/// # Errors
/// Returns an error if either JSON document is invalid or the
/// configuration violates the caller contract.
#[wasm_bindgen]
pub fn layout_day(events_json: &str, config_json: &str) -> Result<String, JsValue> {
    let styled =
        day_layout_json(events_json, config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&styled)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Compute a day column's event layout and return it as a `JsValue`.
///
/// This is more efficient than [`layout_day`] when the result will be
/// used directly in JavaScript.
///
/// # Errors
/// Returns an error if either JSON document is invalid or the
/// configuration violates the caller contract.
#[wasm_bindgen]
pub fn layout_day_to_js(events_json: &str, config_json: &str) -> Result<JsValue, JsValue> {
    let styled =
        day_layout_json(events_json, config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&styled)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Resolve an anchor date string in an IANA timezone.
fn parse_anchor(date: &str, timezone: &str) -> error::Result<DateTime<Tz>> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| CalviewError::Timezone(timezone.to_string()))?;
    Ok(EventInstant::parse(date)
        .ok_or_else(|| CalviewError::Date(date.to_string()))?
        .to_zoned(tz))
}

/// Parse a week-start day name ("monday", "sun", ...).
fn parse_week_start(week_start: &str) -> error::Result<Weekday> {
    week_start
        .parse()
        .map_err(|_| CalviewError::Config(format!("unknown week start day: {week_start}")))
}

/// The 7-day range of the week containing `date`, as RFC 3339 strings.
///
/// # Errors
/// Returns an error for an unparseable date, timezone or week-start day.
#[wasm_bindgen]
pub fn week_range(date: &str, timezone: &str, week_start: &str) -> Result<JsValue, JsValue> {
    let anchor = parse_anchor(date, timezone).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let culture = CultureConfig {
        week_start: parse_week_start(week_start).map_err(|e| JsValue::from_str(&e.to_string()))?,
    };
    let days: Vec<String> = WeekView
        .range(anchor, &culture)
        .iter()
        .map(DateTime::to_rfc3339)
        .collect();

    serde_wasm_bindgen::to_value(&days)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Title for the week containing `date`, built from the range bounds.
///
/// # Errors
/// Returns an error for an unparseable date, timezone or week-start day.
#[wasm_bindgen]
pub fn week_title(
    date: &str,
    timezone: &str,
    week_start: &str,
    day_range_header: &str,
) -> Result<String, JsValue> {
    let anchor = parse_anchor(date, timezone).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let culture = CultureConfig {
        week_start: parse_week_start(week_start).map_err(|e| JsValue::from_str(&e.to_string()))?,
    };
    let formats = TitleFormats {
        day_range_header: day_range_header.to_string(),
        ..TitleFormats::default()
    };
    Ok(WeekView.title(anchor, &formats, &culture))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn version_is_set() {
        assert!(!super::version().is_empty());
    }
}
