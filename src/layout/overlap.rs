//! Horizontal placement of overlapping events.
//!
//! Events that overlap in time are grouped into a container/row/leaf tree
//! held in an arena indexed by node id. Width and x-offset are pure
//! functions of the tree shape, recomputed on demand.

use crate::types::StyledEvent;

use super::geometry::EventGeometry;

/// Extra share of the column an element may claim so overlapping
/// neighbours stay partially visible.
const OVERLAP_MULTIPLIER: f64 = 1.7;

/// Node id within a [`LayoutTree`] arena.
pub type NodeId = usize;

/// Grouping role of a node in the container/row/leaf tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeRole {
    /// Maximal cluster of transitively overlapping events. A container
    /// with no rows is a single event that overlaps nothing.
    Container {
        /// Row nodes of this cluster, in grouping order.
        rows: Vec<NodeId>,
    },
    /// Primary event of a horizontal band inside a container.
    Row {
        /// Back-reference to the owning container.
        container: NodeId,
        /// Leaf nodes of this band, in grouping order.
        leaves: Vec<NodeId>,
    },
    /// Event nested inside a row's band.
    Leaf {
        /// Back-reference to the owning row.
        row: NodeId,
    },
}

/// One event in the layout arena.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    /// Vertical geometry of the event.
    pub geometry: EventGeometry,
    /// Grouping role, assigned at build time.
    pub role: NodeRole,
}

/// Arena of grouped event geometries for one day column.
///
/// Built once per layout pass; never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct LayoutTree {
    nodes: Vec<LayoutNode>,
}

/// Order events for grouping: earlier starts first, longer spans first
/// among equal starts. Stable, so a fixed input ordering yields a fixed
/// grouping.
pub fn sort_for_render(geometries: &mut [EventGeometry]) {
    geometries.sort_by(|a, b| {
        a.start_slot
            .cmp(&b.start_slot)
            .then(b.end_slot.cmp(&a.end_slot))
    });
}

/// Two events share a row when their starts are within `proximity`
/// slot-minutes, or the later event starts inside the row's span.
fn on_same_row(row: &EventGeometry, event: &EventGeometry, proximity: i64) -> bool {
    (event.start_slot - row.start_slot).abs() <= proximity
        || (event.start_slot > row.start_slot && event.start_slot < row.end_slot)
}

impl LayoutTree {
    /// Group geometries (already in render order) into containers, rows
    /// and leaves.
    pub fn build(geometries: Vec<EventGeometry>, row_proximity: i64) -> Self {
        // Local parent tags; children lists are assembled separately so
        // the final roles can be built in one pass.
        enum Parent {
            None,
            Container(NodeId),
            Row(NodeId),
        }

        let count = geometries.len();
        let mut parents: Vec<Parent> = Vec::with_capacity(count);
        let mut rows_of: Vec<Vec<NodeId>> = vec![Vec::new(); count];
        let mut leaves_of: Vec<Vec<NodeId>> = vec![Vec::new(); count];
        let mut containers: Vec<NodeId> = Vec::new();

        for (id, geometry) in geometries.iter().enumerate() {
            // The event joins the first container whose span is still
            // open at its start; otherwise it opens a new cluster.
            let container = containers.iter().copied().find(|&c| {
                geometries
                    .get(c)
                    .is_some_and(|g| g.end_slot > geometry.start_slot)
            });

            let Some(container) = container else {
                parents.push(Parent::None);
                containers.push(id);
                continue;
            };

            // Search rows from the back; later rows are closer in time.
            let row = rows_of.get(container).and_then(|rows| {
                rows.iter().rev().copied().find(|&r| {
                    geometries
                        .get(r)
                        .is_some_and(|g| on_same_row(g, geometry, row_proximity))
                })
            });

            match row {
                Some(row) => {
                    parents.push(Parent::Row(row));
                    if let Some(leaves) = leaves_of.get_mut(row) {
                        leaves.push(id);
                    }
                }
                None => {
                    parents.push(Parent::Container(container));
                    if let Some(rows) = rows_of.get_mut(container) {
                        rows.push(id);
                    }
                }
            }
        }

        let nodes = geometries
            .into_iter()
            .zip(parents)
            .enumerate()
            .map(|(id, (geometry, parent))| {
                let role = match parent {
                    Parent::None => NodeRole::Container {
                        rows: rows_of.get_mut(id).map(std::mem::take).unwrap_or_default(),
                    },
                    Parent::Container(container) => NodeRole::Row {
                        container,
                        leaves: leaves_of.get_mut(id).map(std::mem::take).unwrap_or_default(),
                    },
                    Parent::Row(row) => NodeRole::Leaf { row },
                };
                LayoutNode { geometry, role }
            })
            .collect();

        Self { nodes }
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the arena holds no events.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node lookup by id.
    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id)
    }

    /// Fair-share width of a node, before overlap expansion.
    fn base_width(&self, id: NodeId) -> f64 {
        let Some(node) = self.node(id) else {
            return 0.0;
        };
        match &node.role {
            // The container's share is set by its widest row (the row
            // itself plus its leaves) plus the container; a container
            // with no rows counts as one column next to itself.
            NodeRole::Container { rows } => {
                let row_span = rows
                    .iter()
                    .map(|&row| self.leaf_count(row) + 1)
                    .max()
                    .unwrap_or(1);
                100.0 / (row_span + 1) as f64
            }
            // A row divides the space left by its container among itself
            // and its leaves.
            NodeRole::Row { container, leaves } => {
                let available = 100.0 - self.base_width(*container);
                available / (leaves.len() + 1) as f64
            }
            // A leaf inherits its row's share.
            NodeRole::Leaf { row } => self.base_width(*row),
        }
    }

    /// Final width, possibly expanded into the overlap margin.
    pub fn width(&self, id: NodeId) -> f64 {
        let Some(node) = self.node(id) else {
            return 0.0;
        };
        let no_overlap = self.base_width(id);
        let overlap = (no_overlap * OVERLAP_MULTIPLIER).min(100.0);
        match &node.role {
            // Containers can always grow.
            NodeRole::Container { .. } => overlap,
            // Rows grow only when they have leaves to crowd them.
            NodeRole::Row { leaves, .. } => {
                if leaves.is_empty() {
                    no_overlap
                } else {
                    overlap
                }
            }
            // Leaves grow unless they are last in their row, so earlier
            // (topmost-drawn) leaves stay narrower and later ones peek out.
            NodeRole::Leaf { row } => {
                let last = self
                    .leaf_position(*row, id)
                    .map_or(true, |(index, len)| index + 1 == len);
                if last {
                    no_overlap
                } else {
                    overlap
                }
            }
        }
    }

    /// Horizontal offset of a node within the column.
    pub fn x_offset(&self, id: NodeId) -> f64 {
        let Some(node) = self.node(id) else {
            return 0.0;
        };
        match &node.role {
            // Containers sit at the column edge.
            NodeRole::Container { .. } => 0.0,
            // Rows start where their container's fair share ends.
            NodeRole::Row { container, .. } => self.base_width(*container),
            // Leaves spread left-to-right over the space left by their
            // row, one row-share per position.
            NodeRole::Leaf { row } => {
                let index = self.leaf_position(*row, id).map_or(0, |(index, _)| index);
                self.x_offset(*row) + (index + 1) as f64 * self.base_width(*row)
            }
        }
    }

    /// Styled output for every node, in arena (render) order.
    pub fn styled(&self) -> Vec<StyledEvent> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(id, node)| StyledEvent {
                source: node.geometry.source,
                top: node.geometry.top,
                height: node.geometry.height,
                width: self.width(id),
                x_offset: self.x_offset(id),
            })
            .collect()
    }

    fn leaf_count(&self, row: NodeId) -> usize {
        match self.node(row).map(|node| &node.role) {
            Some(NodeRole::Row { leaves, .. }) => leaves.len(),
            _ => 0,
        }
    }

    fn leaf_position(&self, row: NodeId, id: NodeId) -> Option<(usize, usize)> {
        match self.node(row).map(|node| &node.role) {
            Some(NodeRole::Row { leaves, .. }) => leaves
                .iter()
                .position(|&leaf| leaf == id)
                .map(|index| (index, leaves.len())),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn geometry(start_slot: i64, end_slot: i64, source: usize) -> EventGeometry {
        let total = 1440.0;
        let top = start_slot as f64 / total * 100.0;
        EventGeometry {
            start_slot,
            end_slot,
            top,
            height: end_slot as f64 / total * 100.0 - top,
            start: start_slot * 60_000,
            end: end_slot * 60_000,
            source,
        }
    }

    fn build(spans: &[(i64, i64)]) -> LayoutTree {
        let mut geometries: Vec<EventGeometry> = spans
            .iter()
            .enumerate()
            .map(|(source, &(start, end))| geometry(start, end, source))
            .collect();
        sort_for_render(&mut geometries);
        LayoutTree::build(geometries, 30)
    }

    #[test]
    fn test_empty_input_is_empty_tree() {
        let tree = build(&[]);
        assert!(tree.is_empty());
        assert!(tree.styled().is_empty());
    }

    #[test]
    fn test_single_event_is_degenerate_container() {
        let tree = build(&[(540, 630)]);

        assert_eq!(tree.len(), 1);
        let NodeRole::Container { rows } = &tree.node(0).unwrap().role else {
            panic!("expected container");
        };
        assert!(rows.is_empty());
        // columns = 2, fair share 50, expanded by 1.7
        assert_eq!(tree.width(0), 85.0);
        assert_eq!(tree.x_offset(0), 0.0);
    }

    #[test]
    fn test_disjoint_events_are_separate_containers() {
        let tree = build(&[(540, 600), (660, 720)]);

        for id in 0..2 {
            assert!(matches!(
                tree.node(id).unwrap().role,
                NodeRole::Container { .. }
            ));
            assert_eq!(tree.x_offset(id), 0.0);
        }
    }

    #[test]
    fn test_two_overlapping_events_form_container_and_row() {
        // Second event starts an hour into the first.
        let tree = build(&[(540, 720), (600, 660)]);

        assert!(matches!(
            tree.node(0).unwrap().role,
            NodeRole::Container { .. }
        ));
        let NodeRole::Row { container, leaves } = &tree.node(1).unwrap().role else {
            panic!("expected row");
        };
        assert_eq!(*container, 0);
        assert!(leaves.is_empty());

        // columns = 2: container fair share 50 expands, row keeps its 50.
        assert_eq!(tree.width(0), 85.0);
        assert_eq!(tree.width(1), 50.0);
        assert_eq!(tree.x_offset(1), 50.0);
    }

    #[test]
    fn test_near_starts_share_a_row() {
        // Third event starts within 30 minutes of the second: same row.
        let tree = build(&[(540, 720), (600, 700), (620, 680)]);

        let NodeRole::Row { leaves, .. } = &tree.node(1).unwrap().role else {
            panic!("expected row");
        };
        assert_eq!(leaves, &vec![2]);
        assert!(matches!(tree.node(2).unwrap().role, NodeRole::Leaf { row: 1 }));
    }

    #[test]
    fn test_row_with_two_leaves_widths() {
        // One container, one row with two leaves.
        let tree = build(&[(540, 900), (600, 700), (610, 690), (620, 680)]);

        let NodeRole::Row { leaves, .. } = &tree.node(1).unwrap().role else {
            panic!("expected row");
        };
        assert_eq!(leaves, &vec![2, 3]);

        // row_span = 3, columns = 4: container fair share 25.
        assert_eq!(tree.width(0), 42.5);
        // Row and leaves share the remaining 75 three ways.
        assert_eq!(tree.width(1), 42.5);
        assert_eq!(tree.width(2), 42.5); // earlier leaf expands
        assert_eq!(tree.width(3), 25.0); // last leaf keeps its share

        assert_eq!(tree.x_offset(1), 25.0);
        assert_eq!(tree.x_offset(2), 50.0);
        assert_eq!(tree.x_offset(3), 75.0);
    }

    #[test]
    fn test_leaf_offsets_step_by_row_share() {
        let tree = build(&[(0, 600), (60, 400), (70, 390), (80, 380), (90, 370)]);

        let NodeRole::Row { leaves, .. } = &tree.node(1).unwrap().role else {
            panic!("expected row");
        };
        assert_eq!(leaves.len(), 3);

        let row_share = tree.x_offset(2) - tree.x_offset(1);
        for pair in [(1, 2), (2, 3), (3, 4)] {
            let step = tree.x_offset(pair.1) - tree.x_offset(pair.0);
            assert!((step - row_share).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distant_overlap_becomes_second_row() {
        // Third event overlaps the container but starts well after the
        // first row ends: it becomes a row of its own.
        let tree = build(&[(540, 900), (560, 600), (700, 800)]);

        let NodeRole::Container { rows } = &tree.node(0).unwrap().role else {
            panic!("expected container");
        };
        assert_eq!(rows, &vec![1, 2]);
        assert!(matches!(tree.node(2).unwrap().role, NodeRole::Row { .. }));
    }

    #[test]
    fn test_transitive_overlap_stays_in_one_container() {
        // Second event only touches the tail of the container's span;
        // third starts next to the second: one cluster, row plus leaf.
        let tree = build(&[(540, 720), (700, 760), (710, 750)]);

        assert!(matches!(
            tree.node(0).unwrap().role,
            NodeRole::Container { .. }
        ));
        assert!(matches!(tree.node(1).unwrap().role, NodeRole::Row { .. }));
        assert!(matches!(tree.node(2).unwrap().role, NodeRole::Leaf { .. }));
    }

    #[test]
    fn test_width_and_offset_are_idempotent() {
        let tree = build(&[(540, 900), (600, 700), (610, 690), (700, 800)]);

        for id in 0..tree.len() {
            assert_eq!(tree.width(id), tree.width(id));
            assert_eq!(tree.x_offset(id), tree.x_offset(id));
        }
    }

    #[test]
    fn test_sort_for_render_is_stable() {
        let mut geometries = vec![
            geometry(540, 600, 0),
            geometry(540, 600, 1),
            geometry(500, 560, 2),
            geometry(540, 700, 3),
        ];
        sort_for_render(&mut geometries);

        let order: Vec<usize> = geometries.iter().map(|g| g.source).collect();
        // Earlier start first, longer span first among equal starts,
        // input order among full ties.
        assert_eq!(order, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_out_of_arena_ids_yield_zero() {
        let tree = build(&[(540, 630)]);
        assert_eq!(tree.width(7), 0.0);
        assert_eq!(tree.x_offset(7), 0.0);
        assert!(tree.node(7).is_none());
    }
}
