//! Output records shipped to the rendering layer.

use serde::{Deserialize, Serialize};

/// Computed layout for one event, as consumed by the renderer.
///
/// All four layout fields are percentages of the day column: `top` and
/// `height` of the visible time window, `width` and `x_offset` of the
/// column width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyledEvent {
    /// Index of the source record in the input slice.
    pub source: usize,
    /// Top edge as a percentage of the window.
    pub top: f64,
    /// Height as a percentage of the window.
    pub height: f64,
    /// Width as a percentage of the column.
    pub width: f64,
    /// Left offset as a percentage of the column.
    pub x_offset: f64,
}
