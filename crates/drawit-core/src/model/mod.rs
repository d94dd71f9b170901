//! Diagram data model: nodes, edges and the document that holds them.

mod document;
mod edge;
mod id;
mod node;

pub use document::{Document, HealReport};
pub use edge::{
    DEFAULT_EDGE_STROKE, DEFAULT_EDGE_STROKE_WIDTH, Edge, EdgeData, EdgeDataPatch, StrokeStyle,
};
pub use id::{EdgeId, NodeId, TemplateId};
pub use node::{
    DEFAULT_NODE_HEIGHT, DEFAULT_NODE_WIDTH, Dimensions, FontStyle, FontWeight, GROUP_LABEL, Node,
    NodeData, NodeDataPatch, ShapeDefaults, ShapeKind, TEXT_LABEL, TextAlign, TextDecoration,
};
