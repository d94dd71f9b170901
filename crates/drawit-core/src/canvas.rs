//! Canvas state and the editing operations on it.

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::drag::DragSession;
use crate::geometry::selection_box;
use crate::history::History;
use crate::library::Template;
use crate::model::{
    Document, Edge, EdgeDataPatch, EdgeId, GROUP_LABEL, HealReport, Node, NodeDataPatch, NodeId,
    ShapeKind, TEXT_LABEL,
};
use crate::selection::Selection;
use crate::snap::{Guide, SnapGuides};
use crate::storage::SavedState;
use kurbo::Point;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

static NODE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Node (\d+)").expect("node number pattern is valid"));

/// Which edge or center line of the selection box to align to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Align horizontal centers on the box's vertical center line.
    #[serde(rename = "v-center")]
    VerticalCenter,
    /// Align vertical centers on the box's horizontal center line.
    #[serde(rename = "h-center")]
    HorizontalCenter,
}

/// A continuous edit applied live and recorded on the next [`Canvas::commit`].
#[derive(Debug, Clone, PartialEq)]
pub enum StagedEdit {
    NodeData { id: NodeId, patch: NodeDataPatch },
    EdgeData { id: EdgeId, patch: EdgeDataPatch },
    Resize { id: NodeId, width: f64, height: f64 },
}

/// The editor state: document, selection, history, clipboard and templates.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub(crate) config: EditorConfig,
    pub(crate) document: Document,
    pub(crate) selection: Selection,
    pub(crate) history: History,
    pub(crate) clipboard: Clipboard,
    pub(crate) templates: Vec<Template>,
    pub(crate) drag: Option<DragSession>,
    pub(crate) guides: SnapGuides,
    /// Staged edits not yet recorded in history.
    pending: bool,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with the default config.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            history: History::new(config.max_history),
            guides: SnapGuides::new(config.snap_threshold),
            config,
            document: Document::default(),
            selection: Selection::default(),
            clipboard: Clipboard::default(),
            templates: Vec::new(),
            drag: None,
            pending: false,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn nodes(&self) -> &[Node] {
        &self.document.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.document.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.document.node(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.document.edge(id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Guides of the drag in progress.
    pub fn guides(&self) -> &[Guide] {
        self.guides.guides()
    }

    /// Selected nodes in document order.
    pub fn selected_nodes(&self) -> impl Iterator<Item = &Node> {
        self.document
            .nodes
            .iter()
            .filter(|n| self.selection.contains_node(&n.id))
    }

    // --- History ---

    /// Record the current document as a new history entry.
    pub fn push_history(&mut self) {
        self.history.push(self.document.clone());
        self.pending = false;
    }

    /// Restore the previous entry. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        self.abandon_transients();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document = snapshot.clone();
        self.prune_selection();
        log::debug!("Undo to history index {}", self.history.index());
        true
    }

    /// Re-apply the next entry. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        self.abandon_transients();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document = snapshot.clone();
        self.prune_selection();
        log::debug!("Redo to history index {}", self.history.index());
        true
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Drop staged edits and any drag; the next snapshot replaces them.
    fn abandon_transients(&mut self) {
        self.pending = false;
        self.drag = None;
        self.guides.end_drag();
    }

    fn prune_selection(&mut self) {
        let nodes: HashSet<&NodeId> = self.document.nodes.iter().map(|n| &n.id).collect();
        let edges: HashSet<&EdgeId> = self.document.edges.iter().map(|e| &e.id).collect();
        self.selection
            .retain(|id| nodes.contains(id), |id| edges.contains(id));
    }

    // --- Staged edits ---

    /// Apply a continuous edit without recording history.
    ///
    /// Returns `false` when the target does not exist.
    pub fn stage(&mut self, edit: StagedEdit) -> bool {
        let applied = match &edit {
            StagedEdit::NodeData { id, patch } => self
                .document
                .node_mut(id)
                .map(|node| node.apply_patch(patch))
                .is_some(),
            StagedEdit::EdgeData { id, patch } => self
                .document
                .edge_mut(id)
                .map(|edge| edge.apply_patch(patch))
                .is_some(),
            StagedEdit::Resize { id, width, height } => self
                .document
                .node_mut(id)
                .map(|node| {
                    node.size.width = Some(*width);
                    node.size.height = Some(*height);
                })
                .is_some(),
        };
        if applied {
            self.pending = true;
        }
        applied
    }

    /// Shallow-merge `patch` into a node's data as a staged edit.
    pub fn update_node_data(&mut self, id: &NodeId, patch: NodeDataPatch) -> bool {
        self.stage(StagedEdit::NodeData {
            id: id.clone(),
            patch,
        })
    }

    /// Record staged edits as one history entry. No-op when nothing is staged.
    pub fn commit(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.push_history();
        true
    }

    pub fn has_pending_edits(&self) -> bool {
        self.pending
    }

    // --- Node operations ---

    /// Add a node of `kind` with its top-left at `position`.
    pub fn add_node(&mut self, kind: ShapeKind, position: Point) -> NodeId {
        let label = match kind {
            ShapeKind::Text => TEXT_LABEL.to_string(),
            ShapeKind::Group => GROUP_LABEL.to_string(),
            _ => format!("Node {}", next_node_number(&self.document.nodes)),
        };
        let node = Node::new(kind, position).with_label(label);
        let id = node.id.clone();
        log::debug!("Adding {kind:?} node {id}");
        self.document.nodes.push(node);
        self.push_history();
        id
    }

    /// Clone a node next to the original and select only the clone.
    pub fn duplicate_node(&mut self, id: &NodeId) -> Option<NodeId> {
        let mut copy = self.document.node(id)?.clone();
        copy.id = NodeId::generate();
        copy.position += self.config.duplicate_offset;
        let new_id = copy.id.clone();
        self.document.nodes.push(copy);
        self.selection = Selection::of_nodes([new_id.clone()]);
        self.push_history();
        Some(new_id)
    }

    /// Align the selected nodes to an edge or center line of their combined box.
    ///
    /// Needs at least two selected nodes. Uses stored positions.
    pub fn align_nodes(&mut self, alignment: Alignment) -> bool {
        if self.selection.nodes.len() < 2 {
            return false;
        }
        let Some(bbox) = selection_box(self.selected_nodes()) else {
            return false;
        };
        let center = bbox.center();
        for node in &mut self.document.nodes {
            if !self.selection.nodes.contains(&node.id) {
                continue;
            }
            let (width, height) = (node.width(), node.height());
            match alignment {
                Alignment::Left => node.position.x = bbox.x0,
                Alignment::Right => node.position.x = bbox.x1 - width,
                Alignment::Top => node.position.y = bbox.y0,
                Alignment::Bottom => node.position.y = bbox.y1 - height,
                Alignment::VerticalCenter => node.position.x = center.x - width / 2.0,
                Alignment::HorizontalCenter => node.position.y = center.y - height / 2.0,
            }
        }
        self.push_history();
        true
    }

    /// Attach a node to `parent`, or detach it with `None`.
    ///
    /// Attaching converts the node's absolute position into one relative to
    /// the parent, keeping it below the group header. Detaching leaves the
    /// stored position alone. Unknown ids, self-parenting and cycles are
    /// ignored.
    pub fn set_node_parent(&mut self, id: &NodeId, parent: Option<&NodeId>) -> bool {
        if !self.attach(id, parent) {
            return false;
        }
        self.push_history();
        true
    }

    /// Parent change without a history push.
    pub(crate) fn attach(&mut self, id: &NodeId, parent: Option<&NodeId>) -> bool {
        let Some(absolute) = self.document.absolute_position(id) else {
            return false;
        };
        let position = match parent {
            Some(parent_id) => {
                if parent_id == id || self.document.is_descendant(parent_id, id) {
                    log::debug!("Refusing to parent {id} under {parent_id}");
                    return false;
                }
                let Some(origin) = self.document.absolute_position(parent_id) else {
                    return false;
                };
                let relative = absolute - origin;
                Some(Point::new(
                    relative.x,
                    relative.y.max(self.config.group_header_height),
                ))
            }
            None => None,
        };
        let Some(node) = self.document.node_mut(id) else {
            return false;
        };
        node.parent_id = parent.cloned();
        if let Some(position) = position {
            node.position = position;
        }
        true
    }

    /// Remove the selected nodes and edges.
    ///
    /// Children of removed nodes are detached and keep their on-canvas
    /// position. Edges touching removed nodes go with them.
    pub fn delete_selected(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        let removed = std::mem::take(&mut self.selection.nodes);
        let removed_edges = std::mem::take(&mut self.selection.edges);

        let orphans: HashMap<NodeId, Point> = self
            .document
            .nodes
            .iter()
            .filter(|n| !removed.contains(&n.id))
            .filter(|n| n.parent_id.as_ref().is_some_and(|p| removed.contains(p)))
            .filter_map(|n| {
                self.document
                    .absolute_position(&n.id)
                    .map(|pos| (n.id.clone(), pos))
            })
            .collect();

        self.document.nodes.retain(|n| !removed.contains(&n.id));
        for node in &mut self.document.nodes {
            if let Some(position) = orphans.get(&node.id) {
                node.parent_id = None;
                node.position = *position;
            }
        }
        self.document.edges.retain(|e| {
            !removed_edges.contains(&e.id)
                && !removed.contains(&e.source)
                && !removed.contains(&e.target)
        });
        log::debug!(
            "Deleted {} nodes, detached {} children",
            removed.len(),
            orphans.len()
        );
        self.push_history();
        true
    }

    // --- Edges ---

    /// Connect two nodes with a default-styled edge.
    ///
    /// Unknown endpoints and repeated connections are ignored.
    pub fn connect(
        &mut self,
        source: &NodeId,
        target: &NodeId,
        source_handle: Option<String>,
        target_handle: Option<String>,
    ) -> Option<EdgeId> {
        if !self.document.contains_node(source) || !self.document.contains_node(target) {
            return None;
        }
        let edge = Edge::new(source.clone(), target.clone())
            .with_handles(source_handle, target_handle);
        if self.document.edges.iter().any(|e| e.same_connection(&edge)) {
            return None;
        }
        let id = edge.id.clone();
        self.document.edges.push(edge);
        self.push_history();
        Some(id)
    }

    // --- Selection ---

    /// Replace the node selection. Unknown ids are dropped.
    pub fn select_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.selection.nodes = ids
            .into_iter()
            .filter(|id| self.document.contains_node(id))
            .collect();
    }

    /// Replace the edge selection. Unknown ids are dropped.
    pub fn select_edges(&mut self, ids: impl IntoIterator<Item = EdgeId>) {
        self.selection.edges = ids
            .into_iter()
            .filter(|id| self.document.edge(id).is_some())
            .collect();
    }

    pub fn select_all(&mut self) {
        self.selection.nodes = self.document.nodes.iter().map(|n| n.id.clone()).collect();
        self.selection.edges = self.document.edges.iter().map(|e| e.id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Bulk replacement ---

    /// Replace all nodes without recording history.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.document.nodes = nodes;
        self.drag = None;
        self.prune_selection();
    }

    /// Replace all edges without recording history.
    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.document.edges = edges;
        self.prune_selection();
    }

    /// Replace the live model with an imported document.
    ///
    /// The document is healed first. History is left alone; push it if the
    /// replacement should be undoable.
    pub fn import_document(&mut self, mut document: Document) -> HealReport {
        let report = document.heal();
        self.document = document;
        self.drag = None;
        self.guides.end_drag();
        self.prune_selection();
        report
    }

    pub fn export_document(&self) -> Document {
        self.document.clone()
    }

    // --- Persistence ---

    /// Load persisted state. History is reseeded to the loaded document.
    pub fn load(&mut self, state: SavedState) -> HealReport {
        let SavedState {
            nodes,
            edges,
            templates,
        } = state;
        let mut document = Document::new(nodes, edges);
        let report = document.heal();
        log::info!(
            "Loaded {} nodes, {} edges, {} templates",
            document.nodes.len(),
            document.edges.len(),
            templates.len()
        );
        self.history.reseed(document.clone());
        self.document = document;
        self.templates = templates;
        self.selection.clear();
        self.abandon_transients();
        report
    }

    /// The state to persist: nodes, edges and templates.
    pub fn saved_state(&self) -> SavedState {
        SavedState {
            nodes: self.document.nodes.clone(),
            edges: self.document.edges.clone(),
            templates: self.templates.clone(),
        }
    }
}

/// One more than the largest `N` found as `Node N` anywhere in a label.
///
/// Only the first match in each label counts.
fn next_node_number(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .filter_map(|n| NODE_NUMBER_RE.captures(&n.data.label)?[1].parse::<usize>().ok())
        .filter(|n| *n > 0)
        .max()
        .map_or(nodes.len() + 1, |max| max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rect(id: &str, x: f64, y: f64) -> Node {
        Node::new(ShapeKind::Rectangle, Point::new(x, y))
            .with_id(id)
            .with_size(100.0, 50.0)
    }

    fn group(id: &str, x: f64, y: f64) -> Node {
        Node::new(ShapeKind::Group, Point::new(x, y)).with_id(id)
    }

    fn canvas_with(nodes: Vec<Node>, edges: Vec<Edge>) -> Canvas {
        let mut canvas = Canvas::new();
        canvas.load(SavedState {
            nodes,
            edges,
            templates: vec![],
        });
        canvas
    }

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_add_node_pushes_history() {
        let mut canvas = Canvas::new();
        canvas.add_node(ShapeKind::Rectangle, Point::new(100.0, 200.0));
        assert_eq!(canvas.history().len(), 2);
        assert_eq!(canvas.history().index(), 1);
        assert_eq!(canvas.nodes().len(), 1);

        assert!(canvas.undo());
        assert_eq!(canvas.nodes().len(), 0);
        assert_eq!(canvas.history().index(), 0);

        assert!(canvas.redo());
        assert_eq!(canvas.nodes().len(), 1);
        assert_eq!(canvas.history().index(), 1);
    }

    #[test]
    fn test_add_node_labels() {
        let mut canvas = Canvas::new();
        let a = canvas.add_node(ShapeKind::Rectangle, Point::ZERO);
        let t = canvas.add_node(ShapeKind::Text, Point::ZERO);
        let g = canvas.add_node(ShapeKind::Group, Point::ZERO);
        let b = canvas.add_node(ShapeKind::Ellipse, Point::ZERO);
        assert_eq!(canvas.node(&a).unwrap().data.label, "Node 1");
        assert_eq!(canvas.node(&t).unwrap().data.label, "Text");
        assert_eq!(canvas.node(&g).unwrap().data.label, "Группа");
        assert_eq!(canvas.node(&g).unwrap().z_index, Some(-1));
        assert_eq!(canvas.node(&b).unwrap().data.label, "Node 2");
    }

    #[test]
    fn test_next_node_number() {
        let nodes = vec![
            rect("a", 0.0, 0.0).with_label("Node 7"),
            rect("b", 0.0, 0.0).with_label("Start"),
        ];
        assert_eq!(next_node_number(&nodes), 8);
        let nodes = vec![
            rect("a", 0.0, 0.0).with_label("Start"),
            rect("b", 0.0, 0.0).with_label("Node 0"),
        ];
        assert_eq!(next_node_number(&nodes), 3);
        assert_eq!(next_node_number(&[]), 1);
    }

    #[test]
    fn test_node_number_found_inside_labels() {
        let mut canvas = Canvas::new();
        canvas.load(SavedState {
            nodes: vec![
                rect("a", 0.0, 0.0).with_label("My Node 7"),
                rect("b", 0.0, 0.0).with_label("Node 3b"),
                rect("c", 0.0, 0.0).with_label("Node x then Node 4"),
            ],
            edges: vec![],
            templates: vec![],
        });
        let id = canvas.add_node(ShapeKind::Rectangle, Point::ZERO);
        assert_eq!(canvas.node(&id).unwrap().data.label, "Node 8");
    }

    #[test]
    fn test_staged_edits_commit_once() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0)], vec![]);
        for size in [12.0, 14.0, 18.0, 22.0] {
            assert!(canvas.update_node_data(
                &id("a"),
                NodeDataPatch {
                    font_size: Some(size),
                    ..Default::default()
                }
            ));
        }
        assert_eq!(canvas.history().len(), 1);
        assert!(canvas.has_pending_edits());
        assert!(canvas.commit());
        assert_eq!(canvas.history().len(), 2);
        assert!(!canvas.commit());
        assert_eq!(canvas.history().len(), 2);
        assert_eq!(canvas.node(&id("a")).unwrap().data.font_size, 22.0);
    }

    #[test]
    fn test_stage_unknown_id_is_noop() {
        let mut canvas = Canvas::new();
        assert!(!canvas.update_node_data(&id("ghost"), NodeDataPatch::label("x")));
        assert!(!canvas.stage(StagedEdit::Resize {
            id: id("ghost"),
            width: 1.0,
            height: 1.0
        }));
        assert!(!canvas.has_pending_edits());
        assert!(!canvas.commit());
    }

    #[test]
    fn test_stage_resize_and_edge_data() {
        let mut canvas = canvas_with(
            vec![rect("a", 0.0, 0.0), rect("b", 200.0, 0.0)],
            vec![Edge::new("a", "b").with_id("e")],
        );
        canvas.stage(StagedEdit::Resize {
            id: id("a"),
            width: 180.0,
            height: 90.0,
        });
        canvas.stage(StagedEdit::EdgeData {
            id: EdgeId::from("e"),
            patch: EdgeDataPatch {
                label: Some("yes".into()),
                ..Default::default()
            },
        });
        assert!(canvas.commit());
        assert_eq!(canvas.node(&id("a")).unwrap().width(), 180.0);
        assert_eq!(canvas.edge(&EdgeId::from("e")).unwrap().data.label, "yes");
    }

    #[test]
    fn test_undo_discards_staged_edits() {
        let mut canvas = Canvas::new();
        let a = canvas.add_node(ShapeKind::Rectangle, Point::ZERO);
        canvas.update_node_data(&a, NodeDataPatch::label("draft"));
        assert!(canvas.undo());
        assert!(!canvas.has_pending_edits());
        assert!(canvas.nodes().is_empty());
        assert!(canvas.redo());
        assert_eq!(canvas.node(&a).unwrap().data.label, "Node 1");
    }

    #[test]
    fn test_duplicate_node() {
        let mut canvas = canvas_with(vec![rect("a", 10.0, 10.0)], vec![]);
        canvas.select_nodes([id("a")]);
        let dup = canvas.duplicate_node(&id("a")).unwrap();
        let node = canvas.node(&dup).unwrap();
        assert_eq!(node.position, Point::new(30.0, 30.0));
        assert_eq!(node.data, canvas.node(&id("a")).unwrap().data);
        assert!(canvas.selection().contains_node(&dup));
        assert!(!canvas.selection().contains_node(&id("a")));
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn test_duplicate_unknown_is_noop() {
        let mut canvas = Canvas::new();
        assert!(canvas.duplicate_node(&id("ghost")).is_none());
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_align_left() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0), rect("b", 200.0, 0.0)], vec![]);
        canvas.select_nodes([id("a"), id("b")]);
        assert!(canvas.align_nodes(Alignment::Left));
        assert_eq!(canvas.node(&id("a")).unwrap().position.x, 0.0);
        assert_eq!(canvas.node(&id("b")).unwrap().position.x, 0.0);
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn test_align_right_and_centers() {
        let nodes = vec![
            rect("a", 0.0, 0.0),
            rect("b", 200.0, 100.0).with_size(50.0, 100.0),
        ];
        let mut canvas = canvas_with(nodes, vec![]);
        canvas.select_nodes([id("a"), id("b")]);

        canvas.align_nodes(Alignment::Right);
        assert_eq!(canvas.node(&id("a")).unwrap().position.x, 150.0);
        assert_eq!(canvas.node(&id("b")).unwrap().position.x, 200.0);
        // The other axis is untouched.
        assert_eq!(canvas.node(&id("b")).unwrap().position.y, 100.0);

        canvas.align_nodes(Alignment::HorizontalCenter);
        // Combined box spans y 0..200.
        assert_eq!(canvas.node(&id("a")).unwrap().position.y, 75.0);
        assert_eq!(canvas.node(&id("b")).unwrap().position.y, 50.0);

        canvas.align_nodes(Alignment::Bottom);
        assert_eq!(canvas.node(&id("a")).unwrap().position.y, 100.0);
        assert_eq!(canvas.node(&id("b")).unwrap().position.y, 50.0);
    }

    #[test]
    fn test_align_needs_two_nodes() {
        let mut canvas = canvas_with(vec![rect("a", 5.0, 0.0), rect("b", 200.0, 0.0)], vec![]);
        canvas.select_nodes([id("a")]);
        assert!(!canvas.align_nodes(Alignment::Left));
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_set_parent_converts_to_relative() {
        let mut canvas = canvas_with(vec![group("g", 100.0, 100.0), rect("a", 150.0, 110.0)], vec![]);
        assert!(canvas.set_node_parent(&id("a"), Some(&id("g"))));
        let node = canvas.node(&id("a")).unwrap();
        assert_eq!(node.parent_id, Some(id("g")));
        // y clamped below the header.
        assert_eq!(node.position, Point::new(50.0, 30.0));
        assert_eq!(canvas.history().len(), 2);

        assert!(canvas.set_node_parent(&id("a"), None));
        let node = canvas.node(&id("a")).unwrap();
        assert_eq!(node.parent_id, None);
        assert_eq!(node.position, Point::new(50.0, 30.0));
    }

    #[test]
    fn test_set_parent_rejects_cycles() {
        let mut canvas = canvas_with(
            vec![
                group("outer", 0.0, 0.0),
                group("inner", 10.0, 40.0).with_parent("outer"),
            ],
            vec![],
        );
        assert!(!canvas.set_node_parent(&id("outer"), Some(&id("inner"))));
        assert!(!canvas.set_node_parent(&id("outer"), Some(&id("outer"))));
        assert!(!canvas.set_node_parent(&id("ghost"), Some(&id("outer"))));
        assert!(!canvas.set_node_parent(&id("inner"), Some(&id("ghost"))));
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_delete_cascades_edges_and_detaches_children() {
        let mut canvas = canvas_with(
            vec![
                group("g", 100.0, 100.0),
                rect("child", 20.0, 40.0).with_parent("g"),
                rect("other", 400.0, 0.0),
            ],
            vec![
                Edge::new("g", "other").with_id("e1"),
                Edge::new("child", "other").with_id("e2"),
            ],
        );
        canvas.select_nodes([id("g")]);
        assert!(canvas.delete_selected());

        assert!(canvas.node(&id("g")).is_none());
        let child = canvas.node(&id("child")).unwrap();
        assert_eq!(child.parent_id, None);
        assert_eq!(child.position, Point::new(120.0, 140.0));
        let edges: Vec<&str> = canvas.edges().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(edges, vec!["e2"]);
        assert!(canvas.selection().is_empty());
    }

    #[test]
    fn test_delete_selected_edge_only() {
        let mut canvas = canvas_with(
            vec![rect("a", 0.0, 0.0), rect("b", 200.0, 0.0)],
            vec![Edge::new("a", "b").with_id("e")],
        );
        canvas.select_edges([EdgeId::from("e")]);
        assert!(canvas.delete_selected());
        assert!(canvas.edges().is_empty());
        assert_eq!(canvas.nodes().len(), 2);
    }

    #[test]
    fn test_delete_empty_selection_is_noop() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0)], vec![]);
        assert!(!canvas.delete_selected());
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_connect() {
        let mut canvas = canvas_with(vec![rect("a", 0.0, 0.0), rect("b", 200.0, 0.0)], vec![]);
        let edge = canvas.connect(&id("a"), &id("b"), None, None).unwrap();
        assert_eq!(canvas.edge(&edge).unwrap().data.stroke.as_deref(), Some("#6366f1"));
        assert!(canvas.connect(&id("a"), &id("b"), None, None).is_none());
        assert!(canvas.connect(&id("a"), &id("ghost"), None, None).is_none());
        assert_eq!(canvas.edges().len(), 1);
        assert_eq!(canvas.history().len(), 2);
    }

    #[test]
    fn test_load_reseeds_and_heals() {
        let mut canvas = Canvas::new();
        canvas.add_node(ShapeKind::Rectangle, Point::ZERO);
        canvas.select_all();
        let report = canvas.load(SavedState {
            nodes: vec![rect("a", 10.0, 10.0).with_parent("missing")],
            edges: vec![Edge::new("a", "missing")],
            templates: vec![],
        });
        assert_eq!(report.cleared_parents, 1);
        assert_eq!(report.dropped_edges, 1);
        assert_eq!(canvas.history().len(), 1);
        assert!(!canvas.can_undo());
        assert!(canvas.selection().is_empty());
        assert_eq!(canvas.node(&id("a")).unwrap().parent_id, None);
    }

    #[test]
    fn test_saved_state_roundtrip() {
        let mut canvas = Canvas::new();
        canvas.add_node(ShapeKind::Diamond, Point::new(5.0, 6.0));
        let state = canvas.saved_state();
        let mut other = Canvas::new();
        other.load(state);
        assert_eq!(other.document(), canvas.document());
    }

    #[test]
    fn test_import_replaces_without_history() {
        let mut canvas = Canvas::new();
        canvas.add_node(ShapeKind::Rectangle, Point::ZERO);
        let doc = Document::new(vec![rect("x", 1.0, 1.0)], vec![]);
        canvas.import_document(doc.clone());
        assert_eq!(canvas.document(), &doc);
        assert_eq!(canvas.history().len(), 2);
        assert_eq!(canvas.export_document(), doc);
    }

    #[test]
    fn test_alignment_serde_names() {
        assert_eq!(
            serde_json::to_string(&Alignment::VerticalCenter).unwrap(),
            "\"v-center\""
        );
        let parsed: Alignment = serde_json::from_str("\"h-center\"").unwrap();
        assert_eq!(parsed, Alignment::HorizontalCenter);
    }
}
