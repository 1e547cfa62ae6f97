//! Date/time utility for the layout engine.
//!
//! This module handles:
//! - Tagged source-timestamp representations and target-zone conversion
//! - Calendar-unit arithmetic that stays wall-clock-stable across DST
//! - Minute-level slot comparisons used by the geometry model

mod instant;
mod ops;

pub use instant::EventInstant;
pub use ops::{
    add, at_hour, day_range, diff_minutes, end_of_day, end_of_week, lt_minutes, merge,
    native_time, start_of_day, start_of_week, DateUnit,
};
