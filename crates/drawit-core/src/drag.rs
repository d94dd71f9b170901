//! Drag sessions: snapped previews and the drop-time commit.

use crate::canvas::Canvas;
use crate::geometry::NodeBounds;
use crate::model::NodeId;
use crate::snap::calculate_snap;
use kurbo::{Point, Vec2};

/// Fallback group size used by the drop containment check.
const GROUP_FALLBACK_WIDTH: f64 = 300.0;
const GROUP_FALLBACK_HEIGHT: f64 = 200.0;

/// A node being dragged. The model is not touched until the drop.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    node: NodeId,
    width: f64,
    height: f64,
    preview: Option<Point>,
}

impl DragSession {
    pub fn node(&self) -> &NodeId {
        &self.node
    }

    /// Last snapped absolute position, if the pointer has moved.
    pub fn preview(&self) -> Option<Point> {
        self.preview
    }
}

impl Canvas {
    pub fn drag(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    /// Snapped absolute position of the node being dragged.
    pub fn drag_preview(&self) -> Option<Point> {
        self.drag.as_ref().and_then(|d| d.preview)
    }

    /// Start dragging a node. Returns `false` for an unknown id.
    pub fn begin_drag(&mut self, id: &NodeId) -> bool {
        let Some(node) = self.document.node(id) else {
            return false;
        };
        self.drag = Some(DragSession {
            node: id.clone(),
            width: node.width(),
            height: node.height(),
            preview: None,
        });
        self.guides.start_drag();
        true
    }

    /// Snap a proposed absolute position and refresh the guides.
    ///
    /// Without a drag in progress the position is returned unchanged.
    pub fn drag_move(&mut self, absolute: Point) -> Point {
        let Some(session) = self.drag.as_ref() else {
            return absolute;
        };
        let others = self.snap_candidates(&session.node);
        let (id, width, height) = (session.node.clone(), session.width, session.height);
        let snapped = self.guides.update(&id, absolute, width, height, &others);
        if let Some(session) = self.drag.as_mut() {
            session.preview = Some(snapped);
        }
        snapped
    }

    /// Drop the dragged node at `absolute`.
    ///
    /// Non-group nodes are re-parented to the deepest group containing their
    /// center, or detached when none does. Pushes one history entry if the
    /// node moved or changed parent.
    pub fn end_drag(&mut self, absolute: Point) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        self.guides.end_drag();

        let others = self.snap_candidates(&session.node);
        let snapped = calculate_snap(
            &session.node,
            absolute,
            session.width,
            session.height,
            &others,
            self.config.snap_threshold,
        )
        .position;

        let Some(node) = self.document.node(&session.node) else {
            return false;
        };
        let before = (node.position, node.parent_id.clone());
        let target = if node.kind.is_group() {
            node.parent_id.clone()
        } else {
            self.containing_group(&session.node, snapped, session.width, session.height)
        };

        let id = &session.node;
        if target.is_some() && target == before.1 {
            // Same parent: store the drop relative to it.
            let origin = target
                .as_ref()
                .and_then(|p| self.document.absolute_position(p))
                .unwrap_or(Point::ZERO);
            if let Some(node) = self.document.node_mut(id) {
                node.position = snapped - origin.to_vec2();
            }
        } else {
            if let Some(node) = self.document.node_mut(id) {
                node.parent_id = None;
                node.position = snapped;
            }
            if let Some(parent) = &target {
                self.attach(id, Some(parent));
            }
        }

        let after = self
            .document
            .node(id)
            .map(|n| (n.position, n.parent_id.clone()));
        if after.as_ref() == Some(&before) {
            return false;
        }
        log::debug!("Dropped {id} under {target:?}");
        self.push_history();
        true
    }

    /// Abandon the drag. The model is left exactly as it was.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
        self.guides.end_drag();
    }

    /// Absolute bounds of every node except `id` and its descendants.
    fn snap_candidates(&self, id: &NodeId) -> Vec<NodeBounds> {
        self.document
            .nodes
            .iter()
            .filter(|n| &n.id != id && !self.document.is_descendant(&n.id, id))
            .filter_map(|n| {
                let position = self.document.absolute_position(&n.id)?;
                Some(NodeBounds::at(n.id.clone(), position, n.width(), n.height()))
            })
            .collect()
    }

    /// Deepest group whose box strictly contains the center of the given box.
    fn containing_group(&self, id: &NodeId, top_left: Point, width: f64, height: f64) -> Option<NodeId> {
        let center = top_left + Vec2::new(width / 2.0, height / 2.0);
        let mut best: Option<(usize, &NodeId)> = None;
        for group in self.document.nodes.iter().filter(|n| n.kind.is_group()) {
            if &group.id == id || self.document.is_descendant(&group.id, id) {
                continue;
            }
            let Some(origin) = self.document.absolute_position(&group.id) else {
                continue;
            };
            let w = group.size.width_or(GROUP_FALLBACK_WIDTH);
            let h = group.size.height_or(GROUP_FALLBACK_HEIGHT);
            let inside = center.x > origin.x
                && center.x < origin.x + w
                && center.y > origin.y
                && center.y < origin.y + h;
            if !inside {
                continue;
            }
            let depth = self.document.depth(&group.id);
            if best.is_none_or(|(d, _)| depth > d) {
                best = Some((depth, &group.id));
            }
        }
        best.map(|(_, id)| id.clone())
    }
}
