//! Bounding-box math shared by alignment, snapping and containment.

use crate::model::{Node, NodeId};
use kurbo::{Point, Rect};

/// Edges and center of a node's box, in the coordinate space of its position.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBounds {
    pub id: NodeId,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub center_x: f64,
    pub center_y: f64,
}

impl NodeBounds {
    /// Bounds of a node at its stored position.
    pub fn of(node: &Node) -> Self {
        Self::at(node.id.clone(), node.position, node.width(), node.height())
    }

    /// Bounds of a box of the given size with its top-left at `position`.
    pub fn at(id: NodeId, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            left: position.x,
            right: position.x + width,
            top: position.y,
            bottom: position.y + height,
            center_x: position.x + width / 2.0,
            center_y: position.y + height / 2.0,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.right, self.bottom)
    }
}

/// Union of the stored boxes of `nodes`, or `None` when empty.
///
/// Uses stored positions and the default-size fallback.
pub fn selection_box<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> Option<Rect> {
    nodes
        .into_iter()
        .map(|node| NodeBounds::of(node).to_rect())
        .reduce(|acc, rect| acc.union(rect))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, Dimensions, ShapeKind};

    #[test]
    fn test_bounds_of_node() {
        let node = Node::new(ShapeKind::Rectangle, Point::new(10.0, 20.0)).with_size(100.0, 50.0);
        let b = NodeBounds::of(&node);
        assert_eq!(b.left, 10.0);
        assert_eq!(b.right, 110.0);
        assert_eq!(b.top, 20.0);
        assert_eq!(b.bottom, 70.0);
        assert_eq!(b.center_x, 60.0);
        assert_eq!(b.center_y, 45.0);
    }

    #[test]
    fn test_bounds_missing_size_uses_fallback() {
        let mut node = Node::new(ShapeKind::Rectangle, Point::ZERO);
        node.size = Dimensions::default();
        let b = NodeBounds::of(&node);
        assert_eq!(b.width(), DEFAULT_NODE_WIDTH);
        assert_eq!(b.height(), DEFAULT_NODE_HEIGHT);
    }

    #[test]
    fn test_selection_box_union() {
        let a = Node::new(ShapeKind::Rectangle, Point::new(0.0, 0.0)).with_size(100.0, 50.0);
        let b = Node::new(ShapeKind::Rectangle, Point::new(200.0, 30.0)).with_size(100.0, 50.0);
        let rect = selection_box([&a, &b]).unwrap();
        assert_eq!(rect, Rect::new(0.0, 0.0, 300.0, 80.0));
        assert!(selection_box(std::iter::empty::<&Node>()).is_none());
    }
}
