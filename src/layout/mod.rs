//! Layout engine for day-column event placement.
//!
//! This module handles:
//! - Per-event vertical geometry (slots, top/height percentages)
//! - Grouping overlapping events into a container/row/leaf arena
//! - Width and x-offset percentages that stagger overlapping events
//!
//! The full pass for one column is [`styled_events`].

mod geometry;
mod overlap;

pub use geometry::{position_from_date, starts_before, EventGeometry};
pub use overlap::{sort_for_render, LayoutNode, LayoutTree, NodeId, NodeRole};

use crate::error::Result;
use crate::types::{DayLayoutConfig, InstantAccessor, StyledEvent};

/// Compute the full layout for one day column.
///
/// Builds a fresh geometry per record, orders them for rendering, groups
/// overlaps and returns one [`StyledEvent`] per input event in render
/// order. Empty input yields an empty layout.
pub fn styled_events<R>(
    events: &[R],
    start: &dyn InstantAccessor<R>,
    end: &dyn InstantAccessor<R>,
    config: &DayLayoutConfig,
) -> Result<Vec<StyledEvent>> {
    config.validate()?;

    let mut geometries = Vec::with_capacity(events.len());
    for (source, record) in events.iter().enumerate() {
        geometries.push(EventGeometry::from_record(
            record, source, start, end, config,
        )?);
    }
    sort_for_render(&mut geometries);

    Ok(LayoutTree::build(geometries, config.row_proximity).styled())
}
