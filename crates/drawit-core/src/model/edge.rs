//! Connectors between nodes.

use super::{EdgeId, NodeId};
use serde::{Deserialize, Serialize};

/// Default connector color.
pub const DEFAULT_EDGE_STROKE: &str = "#6366f1";
/// Default connector width.
pub const DEFAULT_EDGE_STROKE_WIDTH: f64 = 2.0;

/// Line style of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Label and stroke attributes of a connector.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeData {
    pub label: String,
    pub animated: bool,
    pub stroke_style: StrokeStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
}

/// A partial update to an edge's data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EdgeDataPatch {
    pub label: Option<String>,
    pub animated: Option<bool>,
    pub stroke_style: Option<StrokeStyle>,
    pub stroke: Option<String>,
    pub stroke_width: Option<f64>,
}

/// A directed connector from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    #[serde(default)]
    pub data: EdgeData,
}

impl Edge {
    /// A connector with the default stroke.
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            id: EdgeId::generate(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            data: EdgeData {
                stroke: Some(DEFAULT_EDGE_STROKE.to_string()),
                stroke_width: Some(DEFAULT_EDGE_STROKE_WIDTH),
                ..Default::default()
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<EdgeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    pub fn with_handles(mut self, source: Option<String>, target: Option<String>) -> Self {
        self.source_handle = source;
        self.target_handle = target;
        self
    }

    /// Whether this edge starts or ends at `node`.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.source == node || &self.target == node
    }

    /// Whether both edges join the same endpoints through the same handles.
    pub fn same_connection(&self, other: &Edge) -> bool {
        self.source == other.source
            && self.target == other.target
            && self.source_handle == other.source_handle
            && self.target_handle == other.target_handle
    }

    pub fn apply_patch(&mut self, patch: &EdgeDataPatch) {
        if let Some(label) = &patch.label {
            self.data.label = label.clone();
        }
        if let Some(animated) = patch.animated {
            self.data.animated = animated;
        }
        if let Some(style) = patch.stroke_style {
            self.data.stroke_style = style;
        }
        if let Some(stroke) = &patch.stroke {
            self.data.stroke = Some(stroke.clone());
        }
        if let Some(width) = patch.stroke_width {
            self.data.stroke_width = Some(width);
        }
    }
}
