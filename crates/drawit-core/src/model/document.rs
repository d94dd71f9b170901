//! The `{ nodes, edges }` document: history snapshots and import/export.

use super::{Edge, EdgeId, Node, NodeId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Nodes and edges of a diagram.
///
/// This is also the neutral JSON shape used for import and export.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// What [`Document::heal`] had to repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HealReport {
    /// Parent references that were dangling or cyclic.
    pub cleared_parents: usize,
    /// Edges whose source or target did not exist.
    pub dropped_edges: usize,
}

impl HealReport {
    pub fn is_clean(&self) -> bool {
        self.cleared_parents == 0 && self.dropped_edges == 0
    }
}

impl Document {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| &n.id == id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| &e.id == id)
    }

    pub fn edge_mut(&mut self, id: &EdgeId) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| &e.id == id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Whether `ancestor` appears on the parent chain of `node`.
    pub fn is_descendant(&self, node: &NodeId, ancestor: &NodeId) -> bool {
        let mut current = self.node(node).and_then(|n| n.parent_id.as_ref());
        // The chain can't be longer than the node list unless it loops.
        for _ in 0..self.nodes.len() {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => current = self.node(id).and_then(|n| n.parent_id.as_ref()),
                None => return false,
            }
        }
        false
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: &NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.node(id).and_then(|n| n.parent_id.as_ref());
        while let Some(parent) = current {
            if depth >= self.nodes.len() {
                break;
            }
            depth += 1;
            current = self.node(parent).and_then(|n| n.parent_id.as_ref());
        }
        depth
    }

    /// Canvas position of a node, following the parent chain.
    pub fn absolute_position(&self, id: &NodeId) -> Option<Point> {
        let node = self.node(id)?;
        let mut position = node.position;
        let mut parent = node.parent_id.as_ref();
        for _ in 0..self.nodes.len() {
            let Some(parent_node) = parent.and_then(|p| self.node(p)) else {
                break;
            };
            position += parent_node.position.to_vec2();
            parent = parent_node.parent_id.as_ref();
        }
        Some(position)
    }

    /// Repair references so the document satisfies the model invariants.
    ///
    /// Dangling or cyclic parent references are cleared and the stored
    /// position is kept as an absolute one. Edges whose endpoints are
    /// missing are dropped.
    pub fn heal(&mut self) -> HealReport {
        let mut report = HealReport::default();
        for node in &mut self.nodes {
            node.adopt_legacy_size();
        }

        let ids: HashSet<NodeId> = self.nodes.iter().map(|n| n.id.clone()).collect();
        for node in &mut self.nodes {
            let dangling = node
                .parent_id
                .as_ref()
                .is_some_and(|p| !ids.contains(p) || p == &node.id);
            if dangling {
                log::warn!(
                    "Clearing dangling parent {:?} of node {}",
                    node.parent_id,
                    node.id
                );
                node.parent_id = None;
                report.cleared_parents += 1;
            }
        }

        // Break parent cycles one link at a time.
        loop {
            let looping = self.nodes.iter().position(|n| {
                n.parent_id.as_ref().is_some_and(|_| self.is_descendant(&n.id, &n.id))
            });
            let Some(index) = looping else { break };
            let node = &mut self.nodes[index];
            log::warn!("Breaking parent cycle at node {}", node.id);
            node.parent_id = None;
            report.cleared_parents += 1;
        }

        let before = self.edges.len();
        self.edges.retain(|e| {
            let keep = ids.contains(&e.source) && ids.contains(&e.target);
            if !keep {
                log::warn!("Dropping edge {} with a missing endpoint", e.id);
            }
            keep
        });
        report.dropped_edges = before - self.edges.len();
        report
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse a `{ "nodes": [...], "edges": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
