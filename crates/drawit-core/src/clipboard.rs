//! Copy and paste of selected nodes.

use crate::canvas::Canvas;
use crate::model::{Node, NodeId};
use crate::selection::Selection;
use kurbo::Point;
use std::collections::HashMap;

/// Deep copies of nodes, in document order. Never shares data with the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    entries: Vec<Node>,
    /// On-canvas position of each entry at copy time.
    absolute: Vec<Point>,
}

impl Clipboard {
    pub fn entries(&self) -> &[Node] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Canvas {
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Copy the selected nodes. Returns the number copied.
    ///
    /// An empty selection leaves the clipboard untouched.
    pub fn copy_selected(&mut self) -> usize {
        let copied: Vec<Node> = self.selected_nodes().cloned().collect();
        if copied.is_empty() {
            return 0;
        }
        let absolute = copied
            .iter()
            .map(|n| self.document.absolute_position(&n.id).unwrap_or(n.position))
            .collect();
        log::debug!("Copied {} nodes", copied.len());
        self.clipboard.entries = copied;
        self.clipboard.absolute = absolute;
        self.clipboard.len()
    }

    /// Paste clipboard nodes with fresh ids and select them.
    ///
    /// Nodes whose parent was copied along are re-attached to the pasted
    /// parent and keep their relative position. Other nodes are offset by
    /// the paste offset. A parent that no longer exists is cleared and the
    /// node is placed from its on-canvas position at copy time.
    pub fn paste_clipboard(&mut self) -> Vec<NodeId> {
        if self.clipboard.is_empty() {
            return Vec::new();
        }
        let fresh: HashMap<NodeId, NodeId> = self
            .clipboard
            .entries
            .iter()
            .map(|n| (n.id.clone(), NodeId::generate()))
            .collect();

        let mut pasted = Vec::with_capacity(self.clipboard.len());
        for (entry, absolute) in self.clipboard.entries.iter().zip(&self.clipboard.absolute) {
            let mut node = entry.clone();
            node.id = fresh[&entry.id].clone();
            match entry.parent_id.as_ref().and_then(|p| fresh.get(p)) {
                Some(new_parent) => node.parent_id = Some(new_parent.clone()),
                None => {
                    if node
                        .parent_id
                        .as_ref()
                        .is_some_and(|p| !self.document.contains_node(p))
                    {
                        node.parent_id = None;
                        node.position = *absolute;
                    }
                    node.position += self.config.paste_offset;
                }
            }
            pasted.push(node);
        }

        let ids: Vec<NodeId> = pasted.iter().map(|n| n.id.clone()).collect();
        self.document.nodes.extend(pasted);
        self.selection = Selection::of_nodes(ids.iter().cloned());
        log::debug!("Pasted {} nodes", ids.len());
        self.push_history();
        ids
    }
}
