//! Reusable templates captured from a selection.

use crate::canvas::Canvas;
use crate::model::{Edge, EdgeId, Node, NodeId, TemplateId};
use crate::selection::Selection;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A named sub-graph whose top-left corner sits at the origin.
///
/// Every node position is relative to that origin, children included.
/// `parent_id` only names parents captured in the same template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Canvas {
    pub fn template(&self, id: &TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| &t.id == id)
    }

    /// Capture the selected nodes, and selected edges between them, as a template.
    ///
    /// Does not touch history. Returns `None` when no node is selected.
    pub fn save_template(&mut self, name: impl Into<String>) -> Option<TemplateId> {
        let ids: HashSet<NodeId> = self.selected_nodes().map(|n| n.id.clone()).collect();
        if ids.is_empty() {
            return None;
        }

        let mut nodes: Vec<Node> = Vec::with_capacity(ids.len());
        for node in self.selected_nodes() {
            let mut node = node.clone();
            node.position = self.document.absolute_position(&node.id).unwrap_or(node.position);
            if !node.parent_id.as_ref().is_some_and(|p| ids.contains(p)) {
                node.parent_id = None;
            }
            nodes.push(node);
        }

        let min_x = nodes.iter().map(|n| n.position.x).fold(f64::INFINITY, f64::min);
        let min_y = nodes.iter().map(|n| n.position.y).fold(f64::INFINITY, f64::min);
        let shift = Vec2::new(min_x, min_y);
        for node in &mut nodes {
            node.position -= shift;
        }

        let edges: Vec<Edge> = self
            .document
            .edges
            .iter()
            .filter(|e| self.selection.contains_edge(&e.id))
            .filter(|e| ids.contains(&e.source) && ids.contains(&e.target))
            .cloned()
            .collect();

        let template = Template {
            id: TemplateId::generate(),
            name: name.into(),
            nodes,
            edges,
        };
        let id = template.id.clone();
        log::debug!(
            "Saved template {id} with {} nodes, {} edges",
            template.nodes.len(),
            template.edges.len()
        );
        self.templates.push(template);
        Some(id)
    }

    /// Remove a template. Unknown ids are ignored.
    pub fn delete_template(&mut self, id: &TemplateId) -> bool {
        let before = self.templates.len();
        self.templates.retain(|t| &t.id != id);
        self.templates.len() != before
    }

    /// Add a copy of a template with its top-left at `drop`.
    ///
    /// Node and edge ids are fresh. The new nodes become the selection.
    pub fn instantiate_template(&mut self, id: &TemplateId, drop: Point) -> Vec<NodeId> {
        let Some(template) = self.templates.iter().find(|t| &t.id == id) else {
            return Vec::new();
        };
        if template.nodes.is_empty() {
            return Vec::new();
        }
        let fresh: HashMap<&NodeId, NodeId> = template
            .nodes
            .iter()
            .map(|n| (&n.id, NodeId::generate()))
            .collect();
        let origins: HashMap<&NodeId, Point> =
            template.nodes.iter().map(|n| (&n.id, n.position)).collect();

        let mut nodes = Vec::with_capacity(template.nodes.len());
        for entry in &template.nodes {
            let mut node = entry.clone();
            node.id = fresh[&entry.id].clone();
            let parent = entry
                .parent_id
                .as_ref()
                .and_then(|p| Some((fresh.get(p)?, origins.get(p)?)));
            match parent {
                Some((parent, origin)) => {
                    node.parent_id = Some(parent.clone());
                    node.position = (entry.position - *origin).to_point();
                }
                None => {
                    node.parent_id = None;
                    node.position += drop.to_vec2();
                }
            }
            nodes.push(node);
        }
        let edges: Vec<Edge> = template
            .edges
            .iter()
            .filter_map(|e| {
                let mut edge = e.clone();
                edge.id = EdgeId::generate();
                edge.source = fresh.get(&e.source)?.clone();
                edge.target = fresh.get(&e.target)?.clone();
                Some(edge)
            })
            .collect();

        let ids: Vec<NodeId> = nodes.iter().map(|n| n.id.clone()).collect();
        self.document.nodes.extend(nodes);
        self.document.edges.extend(edges);
        self.selection = Selection::of_nodes(ids.iter().cloned());
        self.push_history();
        ids
    }
}
