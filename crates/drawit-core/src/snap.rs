//! Snap-to-alignment guides for dragging nodes against their neighbours.

use crate::geometry::NodeBounds;
use crate::model::NodeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Distance (in canvas units) under which two edges count as aligned.
pub const SNAP_THRESHOLD: f64 = 8.0;

/// Orientation of an alignment guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuideOrientation {
    /// A vertical line at an x coordinate.
    Vertical,
    /// A horizontal line at a y coordinate.
    Horizontal,
}

/// A transient alignment line at an absolute canvas coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    #[serde(rename = "type")]
    pub orientation: GuideOrientation,
    pub position: f64,
}

impl Guide {
    pub fn vertical(x: f64) -> Self {
        Self {
            orientation: GuideOrientation::Vertical,
            position: x,
        }
    }

    pub fn horizontal(y: f64) -> Self {
        Self {
            orientation: GuideOrientation::Horizontal,
            position: y,
        }
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    /// The corrected top-left position.
    pub position: Point,
    /// Guides to render, one per matched rule.
    pub guides: Vec<Guide>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(position: Point) -> Self {
        Self {
            position,
            guides: Vec::new(),
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// One axis of a box: its near edge, far edge and center.
#[derive(Clone, Copy)]
struct Span {
    start: f64,
    end: f64,
    center: f64,
}

/// Match the first satisfied rule for one axis against one other box.
///
/// Rules in priority order: start/start, end/end, center/center,
/// start/end, end/start. Returns the snapped start coordinate and the
/// guide line position.
fn match_axis(dragging: Span, other: Span, extent: f64, threshold: f64) -> Option<(f64, f64)> {
    let near = |a: f64, b: f64| (a - b).abs() < threshold;
    if near(dragging.start, other.start) {
        Some((other.start, other.start))
    } else if near(dragging.end, other.end) {
        Some((other.end - extent, other.end))
    } else if near(dragging.center, other.center) {
        Some((other.center - extent / 2.0, other.center))
    } else if near(dragging.start, other.end) {
        Some((other.end, other.end))
    } else if near(dragging.end, other.start) {
        Some((other.start - extent, other.start))
    } else {
        None
    }
}

/// Compute the snapped position and guides for a node being dragged.
///
/// Each other box is compared against the unsnapped dragging box. On each
/// axis the first satisfied rule wins for that box; later boxes that also
/// match override the coordinate and add their own guide. Boxes with
/// `dragging_id` are skipped.
pub fn calculate_snap(
    dragging_id: &NodeId,
    proposed: Point,
    width: f64,
    height: f64,
    others: &[NodeBounds],
    threshold: f64,
) -> SnapResult {
    let dragging = NodeBounds::at(dragging_id.clone(), proposed, width, height);
    let drag_x = Span {
        start: dragging.left,
        end: dragging.right,
        center: dragging.center_x,
    };
    let drag_y = Span {
        start: dragging.top,
        end: dragging.bottom,
        center: dragging.center_y,
    };

    let mut result = SnapResult::none(proposed);
    for other in others.iter().filter(|o| &o.id != dragging_id) {
        let other_x = Span {
            start: other.left,
            end: other.right,
            center: other.center_x,
        };
        if let Some((x, line)) = match_axis(drag_x, other_x, width, threshold) {
            result.position.x = x;
            result.guides.push(Guide::vertical(line));
        }

        let other_y = Span {
            start: other.top,
            end: other.bottom,
            center: other.center_y,
        };
        if let Some((y, line)) = match_axis(drag_y, other_y, height, threshold) {
            result.position.y = y;
            result.guides.push(Guide::horizontal(line));
        }
    }
    result
}

/// Drag-scoped guide state for the render layer.
///
/// Guides are recomputed on every move and only the latest set is kept.
#[derive(Debug, Clone)]
pub struct SnapGuides {
    guides: Vec<Guide>,
    dragging: bool,
    threshold: f64,
}

impl Default for SnapGuides {
    fn default() -> Self {
        Self::new(SNAP_THRESHOLD)
    }
}

impl SnapGuides {
    pub fn new(threshold: f64) -> Self {
        Self {
            guides: Vec::new(),
            dragging: false,
            threshold,
        }
    }

    pub fn start_drag(&mut self) {
        self.dragging = true;
        self.guides.clear();
    }

    /// Snap `proposed` against `others`, store the guides and return the position.
    pub fn update(
        &mut self,
        dragging_id: &NodeId,
        proposed: Point,
        width: f64,
        height: f64,
        others: &[NodeBounds],
    ) -> Point {
        let result = calculate_snap(dragging_id, proposed, width, height, others, self.threshold);
        self.guides = result.guides;
        result.position
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.guides.clear();
    }

    pub fn guides(&self) -> &[Guide] {
        &self.guides
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}
