//! Current node and edge selection.

use crate::model::{EdgeId, NodeId};
use std::collections::HashSet;

/// Selected nodes and edges. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub nodes: HashSet<NodeId>,
    pub edges: HashSet<EdgeId>,
}

impl Selection {
    /// Selection of exactly these nodes.
    pub fn of_nodes(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Self {
            nodes: ids.into_iter().collect(),
            edges: HashSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.nodes.contains(id)
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains(id)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Forget ids that no longer exist.
    pub fn retain(&mut self, node: impl Fn(&NodeId) -> bool, edge: impl Fn(&EdgeId) -> bool) {
        self.nodes.retain(|id| node(id));
        self.edges.retain(|id| edge(id));
    }
}
