//! Automatic hierarchical layout.
//!
//! The canvas converts its nodes and edges into a [`LayoutGraph`], hands it
//! to a [`LayoutEngine`] and writes the returned centers back as top-left
//! positions. [`SugiyamaEngine`] is the built-in engine, backed by the
//! `rust-sugiyama` crate.

use crate::canvas::Canvas;
use crate::model::{Edge, Node, NodeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Size assumed for nodes without usable dimensions during layout.
pub const LAYOUT_FALLBACK_WIDTH: f64 = 150.0;
pub const LAYOUT_FALLBACK_HEIGHT: f64 = 50.0;

/// Primary axis of flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutDirection {
    #[default]
    #[serde(rename = "TB")]
    TopToBottom,
    #[serde(rename = "BT")]
    BottomToTop,
    #[serde(rename = "LR")]
    LeftToRight,
    #[serde(rename = "RL")]
    RightToLeft,
}

impl LayoutDirection {
    /// Whether ranks advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// Whether ranks advance towards negative coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomToTop | Self::RightToLeft)
    }
}

/// Spacing and direction handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutOptions {
    pub direction: LayoutDirection,
    /// Gap between neighbours in the same rank.
    pub node_spacing: f64,
    /// Gap between consecutive ranks.
    pub rank_spacing: f64,
    /// Distance of the drawing from the origin.
    pub margin: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: LayoutDirection::TopToBottom,
            node_spacing: 50.0,
            rank_spacing: 100.0,
            margin: 50.0,
        }
    }
}

/// Named option sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutPreset {
    Vertical,
    Horizontal,
    Tree,
}

impl LayoutPreset {
    pub fn options(self) -> LayoutOptions {
        match self {
            LayoutPreset::Vertical => LayoutOptions::default(),
            LayoutPreset::Horizontal => LayoutOptions {
                direction: LayoutDirection::LeftToRight,
                ..Default::default()
            },
            LayoutPreset::Tree => LayoutOptions {
                node_spacing: 30.0,
                rank_spacing: 80.0,
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub width: f64,
    pub height: f64,
}

/// Input to a layout engine: sized nodes and directed edges between them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<(NodeId, NodeId)>,
}

impl LayoutGraph {
    /// Build a graph from diagram nodes and edges.
    ///
    /// Edges with unknown endpoints and self-loops are skipped; repeated
    /// connections are merged.
    pub fn from_diagram(nodes: &[Node], edges: &[Edge]) -> Self {
        let ids: HashSet<&NodeId> = nodes.iter().map(|n| &n.id).collect();
        let mut seen = HashSet::new();
        let edges = edges
            .iter()
            .filter(|e| e.source != e.target)
            .filter(|e| ids.contains(&e.source) && ids.contains(&e.target))
            .filter(|e| seen.insert((&e.source, &e.target)))
            .map(|e| (e.source.clone(), e.target.clone()))
            .collect();
        let nodes = nodes
            .iter()
            .map(|n| LayoutNode {
                id: n.id.clone(),
                width: n.size.width_or(LAYOUT_FALLBACK_WIDTH),
                height: n.size.height_or(LAYOUT_FALLBACK_HEIGHT),
            })
            .collect();
        Self { nodes, edges }
    }
}

/// A graph layout algorithm.
pub trait LayoutEngine {
    /// Compute a center point for each node.
    fn layout(&self, graph: &LayoutGraph, options: &LayoutOptions) -> HashMap<NodeId, Point>;
}

/// Lay out `nodes` and return them with new positions.
///
/// Only `position` changes. A node the engine does not place keeps its
/// position.
pub fn layout_nodes(
    nodes: &[Node],
    edges: &[Edge],
    options: &LayoutOptions,
    engine: &dyn LayoutEngine,
) -> Vec<Node> {
    if nodes.is_empty() {
        return Vec::new();
    }
    let graph = LayoutGraph::from_diagram(nodes, edges);
    let centers = engine.layout(&graph, options);
    nodes
        .iter()
        .zip(&graph.nodes)
        .map(|(node, sized)| {
            let mut node = node.clone();
            if let Some(center) = centers.get(&node.id) {
                node.position = Point::new(
                    center.x - sized.width / 2.0,
                    center.y - sized.height / 2.0,
                );
            }
            node
        })
        .collect()
}

/// Layered layout via `rust-sugiyama`.
///
/// The crate always lays out top to bottom. Other directions are obtained
/// by swapping and mirroring axes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SugiyamaEngine;

/// A placed vertex in top-to-bottom space: `cross` runs within a rank.
struct Placed {
    index: usize,
    cross: f64,
    rank: usize,
}

impl LayoutEngine for SugiyamaEngine {
    fn layout(&self, graph: &LayoutGraph, options: &LayoutOptions) -> HashMap<NodeId, Point> {
        if graph.nodes.is_empty() {
            return HashMap::new();
        }
        let horizontal = options.direction.is_horizontal();

        // (cross extent, rank extent) per node in top-to-bottom space.
        let extents: Vec<(f64, f64)> = graph
            .nodes
            .iter()
            .map(|n| if horizontal { (n.height, n.width) } else { (n.width, n.height) })
            .collect();
        let index: HashMap<&NodeId, u32> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (&n.id, i as u32))
            .collect();
        let vertices: Vec<(u32, (f64, f64))> = extents
            .iter()
            .enumerate()
            .map(|(i, size)| (i as u32, *size))
            .collect();
        let edges: Vec<(u32, u32)> = graph
            .edges
            .iter()
            .filter_map(|(s, t)| Some((*index.get(s)?, *index.get(t)?)))
            .collect();

        let mut config = rust_sugiyama::configure::Config {
            minimum_length: 1,
            dummy_vertices: false,
            ..Default::default()
        };
        if options.node_spacing > 0.0 {
            config.vertex_spacing = options.node_spacing;
        }
        let subgraphs = rust_sugiyama::from_vertices_and_edges(&vertices, &edges, &config);

        // Components go side by side along the cross axis.
        let mut placed = Vec::with_capacity(graph.nodes.len());
        let mut offset = 0.0;
        for (layout, _, _) in &subgraphs {
            let members: Vec<(usize, f64, f64)> = layout
                .iter()
                .filter(|(i, _)| *i < extents.len())
                .map(|&(i, (x, y))| (i, x, y))
                .collect();
            if members.is_empty() {
                continue;
            }
            let left = members
                .iter()
                .map(|&(i, x, _)| x - extents[i].0 / 2.0)
                .fold(f64::INFINITY, f64::min);
            let right = members
                .iter()
                .map(|&(i, x, _)| x + extents[i].0 / 2.0)
                .fold(f64::NEG_INFINITY, f64::max);
            let levels = rank_levels(members.iter().map(|&(_, _, y)| y));
            for &(i, x, y) in &members {
                placed.push(Placed {
                    index: i,
                    cross: x - left + offset,
                    rank: rank_of(&levels, y),
                });
            }
            offset += (right - left) + options.node_spacing;
        }

        // Re-space ranks so consecutive ranks are `rank_spacing` apart.
        let rank_count = placed.iter().map(|p| p.rank + 1).max().unwrap_or(0);
        let mut rank_extent = vec![0.0_f64; rank_count];
        for p in &placed {
            rank_extent[p.rank] = rank_extent[p.rank].max(extents[p.index].1);
        }
        let mut rank_center = Vec::with_capacity(rank_count);
        let mut cursor = 0.0;
        for (k, extent) in rank_extent.iter().enumerate() {
            if k > 0 {
                cursor += options.rank_spacing;
            }
            rank_center.push(cursor + extent / 2.0);
            cursor += extent;
        }
        let span = cursor;

        let mut centers: Vec<(usize, Point)> = placed
            .iter()
            .map(|p| {
                let mut along = rank_center[p.rank];
                if options.direction.is_reversed() {
                    along = span - along;
                }
                let point = if horizontal {
                    Point::new(along, p.cross)
                } else {
                    Point::new(p.cross, along)
                };
                (p.index, point)
            })
            .collect();

        // Translate so the drawing's top-left corner sits at the margin.
        let min_x = centers
            .iter()
            .map(|(i, c)| c.x - graph.nodes[*i].width / 2.0)
            .fold(f64::INFINITY, f64::min);
        let min_y = centers
            .iter()
            .map(|(i, c)| c.y - graph.nodes[*i].height / 2.0)
            .fold(f64::INFINITY, f64::min);
        for (_, center) in &mut centers {
            center.x += options.margin - min_x;
            center.y += options.margin - min_y;
        }

        centers
            .into_iter()
            .map(|(i, center)| (graph.nodes[i].id.clone(), center))
            .collect()
    }
}

/// Distinct rank coordinates in ascending order.
fn rank_levels(ys: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut levels: Vec<f64> = ys.collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup_by(|a, b| (*a - *b).abs() < 0.5);
    levels
}

fn rank_of(levels: &[f64], y: f64) -> usize {
    levels
        .iter()
        .position(|level| (level - y).abs() < 0.5)
        .unwrap_or(0)
}

impl Canvas {
    /// Lay out the whole diagram with `engine`. Pushes one history entry.
    pub fn apply_layout(&mut self, engine: &dyn LayoutEngine, options: &LayoutOptions) -> bool {
        if self.document.nodes.is_empty() {
            return false;
        }
        let nodes = layout_nodes(&self.document.nodes, &self.document.edges, options, engine);
        log::debug!(
            "Laid out {} nodes ({:?})",
            nodes.len(),
            options.direction
        );
        self.document.nodes = nodes;
        self.push_history();
        true
    }

    /// Lay out with a named preset and the built-in engine.
    pub fn apply_layout_preset(&mut self, preset: LayoutPreset) -> bool {
        self.apply_layout(&SugiyamaEngine, &preset.options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dimensions, ShapeKind};
    use crate::storage::SavedState;

    fn rect(id: &str) -> Node {
        Node::new(ShapeKind::Rectangle, Point::new(7.0, 7.0))
            .with_id(id)
            .with_size(100.0, 50.0)
    }

    fn centers(nodes: &[Node]) -> HashMap<String, Point> {
        nodes
            .iter()
            .map(|n| {
                (
                    n.id.to_string(),
                    Point::new(n.position.x + n.width() / 2.0, n.position.y + n.height() / 2.0),
                )
            })
            .collect()
    }

    /// Places every node listed at a fixed center.
    struct FixedEngine(Vec<(&'static str, Point)>);

    impl LayoutEngine for FixedEngine {
        fn layout(&self, _: &LayoutGraph, _: &LayoutOptions) -> HashMap<NodeId, Point> {
            self.0.iter().map(|(id, p)| (NodeId::from(*id), *p)).collect()
        }
    }

    #[test]
    fn test_graph_skips_bad_edges() {
        let nodes = vec![rect("a"), rect("b")];
        let edges = vec![
            Edge::new("a", "b"),
            Edge::new("a", "b"),
            Edge::new("a", "a"),
            Edge::new("a", "ghost"),
        ];
        let graph = LayoutGraph::from_diagram(&nodes, &edges);
        assert_eq!(graph.edges, vec![(NodeId::from("a"), NodeId::from("b"))]);
    }

    #[test]
    fn test_graph_uses_layout_fallback_size() {
        let mut node = rect("a");
        node.size = Dimensions::default();
        let graph = LayoutGraph::from_diagram(&[node], &[]);
        assert_eq!(graph.nodes[0].width, LAYOUT_FALLBACK_WIDTH);
        assert_eq!(graph.nodes[0].height, LAYOUT_FALLBACK_HEIGHT);
    }

    #[test]
    fn test_write_back_converts_center_to_top_left() {
        let nodes = vec![rect("a").with_label("keep"), rect("b")];
        let engine = FixedEngine(vec![("a", Point::new(100.0, 100.0))]);
        let out = layout_nodes(&nodes, &[], &LayoutOptions::default(), &engine);
        assert_eq!(out[0].position, Point::new(50.0, 75.0));
        assert_eq!(out[0].data.label, "keep");
        assert_eq!(out[0].size, nodes[0].size);
        // Not placed by the engine.
        assert_eq!(out[1].position, Point::new(7.0, 7.0));
    }

    #[test]
    fn test_empty_layout_is_noop() {
        let out = layout_nodes(&[], &[], &LayoutOptions::default(), &SugiyamaEngine);
        assert!(out.is_empty());
        let mut canvas = Canvas::new();
        assert!(!canvas.apply_layout_preset(LayoutPreset::Vertical));
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_presets() {
        assert_eq!(LayoutPreset::Vertical.options().direction, LayoutDirection::TopToBottom);
        assert_eq!(LayoutPreset::Horizontal.options().direction, LayoutDirection::LeftToRight);
        let tree = LayoutPreset::Tree.options();
        assert_eq!(tree.direction, LayoutDirection::TopToBottom);
        assert_eq!(tree.rank_spacing, 80.0);
        assert_eq!(tree.node_spacing, 30.0);
    }

    fn chain() -> (Vec<Node>, Vec<Edge>) {
        (
            vec![rect("a"), rect("b"), rect("c")],
            vec![Edge::new("a", "b"), Edge::new("b", "c")],
        )
    }

    fn run(direction: LayoutDirection) -> HashMap<String, Point> {
        let (nodes, edges) = chain();
        let options = LayoutOptions {
            direction,
            ..Default::default()
        };
        centers(&layout_nodes(&nodes, &edges, &options, &SugiyamaEngine))
    }

    #[test]
    fn test_sugiyama_top_to_bottom() {
        let c = run(LayoutDirection::TopToBottom);
        assert!(c["a"].y < c["b"].y);
        assert!(c["b"].y < c["c"].y);
        // Ranks are exactly one node height plus rank spacing apart.
        assert!((c["b"].y - c["a"].y - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_sugiyama_bottom_to_top() {
        let c = run(LayoutDirection::BottomToTop);
        assert!(c["a"].y > c["b"].y);
        assert!(c["b"].y > c["c"].y);
    }

    #[test]
    fn test_sugiyama_left_to_right() {
        let c = run(LayoutDirection::LeftToRight);
        assert!(c["a"].x < c["b"].x);
        assert!(c["b"].x < c["c"].x);
    }

    #[test]
    fn test_sugiyama_right_to_left() {
        let c = run(LayoutDirection::RightToLeft);
        assert!(c["a"].x > c["b"].x);
    }

    #[test]
    fn test_sugiyama_respects_margin() {
        let (nodes, edges) = chain();
        let out = layout_nodes(&nodes, &edges, &LayoutOptions::default(), &SugiyamaEngine);
        let min_x = out.iter().map(|n| n.position.x).fold(f64::MAX, f64::min);
        let min_y = out.iter().map(|n| n.position.y).fold(f64::MAX, f64::min);
        assert!((min_x - 50.0).abs() < 1e-6);
        assert!((min_y - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_disconnected_nodes_do_not_overlap() {
        let nodes = vec![rect("a"), rect("b"), rect("c")];
        let out = layout_nodes(&nodes, &[], &LayoutOptions::default(), &SugiyamaEngine);
        for (i, first) in out.iter().enumerate() {
            for second in &out[i + 1..] {
                let a = kurbo::Rect::from_origin_size(first.position, (100.0, 50.0));
                let b = kurbo::Rect::from_origin_size(second.position, (100.0, 50.0));
                assert!(a.intersect(b).area() == 0.0, "{} overlaps {}", first.id, second.id);
            }
        }
    }

    #[test]
    fn test_apply_layout_pushes_once() {
        let (nodes, edges) = chain();
        let mut canvas = Canvas::new();
        canvas.load(SavedState {
            nodes,
            edges,
            templates: vec![],
        });
        assert!(canvas.apply_layout_preset(LayoutPreset::Tree));
        assert_eq!(canvas.history().len(), 2);
        assert!(canvas.undo());
        assert!(canvas.nodes().iter().all(|n| n.position == Point::new(7.0, 7.0)));
    }

    #[test]
    fn test_direction_serde() {
        assert_eq!(serde_json::to_string(&LayoutDirection::LeftToRight).unwrap(), "\"LR\"");
        let options: LayoutOptions = serde_json::from_str(r#"{ "direction": "BT" }"#).unwrap();
        assert_eq!(options.direction, LayoutDirection::BottomToTop);
        assert_eq!(options.rank_spacing, 100.0);
    }
}
