//! Diagram nodes and their per-kind defaults.

use super::NodeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Width used when a node carries no usable width.
pub const DEFAULT_NODE_WIDTH: f64 = 100.0;
/// Height used when a node carries no usable height.
pub const DEFAULT_NODE_HEIGHT: f64 = 50.0;

/// Label given to freshly created group nodes.
pub const GROUP_LABEL: &str = "Группа";
/// Label given to freshly created text nodes.
pub const TEXT_LABEL: &str = "Text";

/// Shape of a node as drawn by the render layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    RoundedRect,
    Diamond,
    Ellipse,
    Text,
    Cylinder,
    Triangle,
    Group,
    Image,
}

/// Size and colors a node of a given kind starts with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeDefaults {
    pub width: f64,
    pub height: f64,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub border_width: f64,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 9] = [
        ShapeKind::Rectangle,
        ShapeKind::RoundedRect,
        ShapeKind::Diamond,
        ShapeKind::Ellipse,
        ShapeKind::Text,
        ShapeKind::Cylinder,
        ShapeKind::Triangle,
        ShapeKind::Group,
        ShapeKind::Image,
    ];

    /// Creation defaults for this kind.
    pub fn defaults(self) -> ShapeDefaults {
        let (width, height, background_color, border_color, border_width) = match self {
            ShapeKind::Rectangle => (120.0, 60.0, "#1e1e2e", "#6366f1", 2.0),
            ShapeKind::RoundedRect => (120.0, 60.0, "#1e1e2e", "#22c55e", 2.0),
            ShapeKind::Diamond => (100.0, 100.0, "#1e1e2e", "#f59e0b", 2.0),
            ShapeKind::Ellipse => (100.0, 60.0, "#1e1e2e", "#ec4899", 2.0),
            ShapeKind::Text => (120.0, 40.0, "transparent", "transparent", 0.0),
            ShapeKind::Cylinder => (80.0, 100.0, "#1e1e2e", "#06b6d4", 2.0),
            ShapeKind::Triangle => (100.0, 90.0, "#1e1e2e", "#ef4444", 2.0),
            ShapeKind::Group => (300.0, 200.0, "rgba(99, 102, 241, 0.05)", "#6366f1", 1.0),
            ShapeKind::Image => (200.0, 150.0, "transparent", "transparent", 0.0),
        };
        ShapeDefaults {
            width,
            height,
            background_color,
            border_color,
            border_width,
        }
    }

    pub fn is_group(self) -> bool {
        self == ShapeKind::Group
    }
}

/// Width and height of a node. Either may be absent in loaded documents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    /// Width, or `fallback` when missing, zero or NaN.
    pub fn width_or(&self, fallback: f64) -> f64 {
        usable(self.width).unwrap_or(fallback)
    }

    /// Height, or `fallback` when missing, zero or NaN.
    pub fn height_or(&self, fallback: f64) -> f64 {
        usable(self.height).unwrap_or(fallback)
    }
}

fn usable(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    None,
    Underline,
    LineThrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

/// Text and style attributes of a node.
///
/// Keys the engine does not know about are kept in `extra` so documents
/// written by newer render layers survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeData {
    pub label: String,
    pub background_color: String,
    pub border_color: String,
    pub border_width: f64,
    pub text_color: String,
    pub font_size: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for NodeData {
    fn default() -> Self {
        Self::for_kind(ShapeKind::Rectangle)
    }
}

impl NodeData {
    /// Style defaults for `kind`, with an empty label.
    pub fn for_kind(kind: ShapeKind) -> Self {
        let defaults = kind.defaults();
        Self {
            label: String::new(),
            background_color: defaults.background_color.to_string(),
            border_color: defaults.border_color.to_string(),
            border_width: defaults.border_width,
            text_color: "#ffffff".to_string(),
            font_size: 14.0,
            font_weight: None,
            font_style: None,
            text_decoration: None,
            text_align: None,
            image_url: None,
            extra: Map::new(),
        }
    }
}

/// A partial update to a node's data. `None` fields are left alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub text_color: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub text_decoration: Option<TextDecoration>,
    pub text_align: Option<TextAlign>,
    pub image_url: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl NodeDataPatch {
    /// Patch that only changes the label.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A node on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type", default)]
    pub kind: ShapeKind,
    /// Top-left corner; relative to the parent when `parent_id` is set.
    pub position: Point,
    #[serde(default)]
    pub size: Dimensions,
    #[serde(default, alias = "parentNode", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default)]
    pub data: NodeData,
}

impl Node {
    /// Create a node of `kind` with its default size and style.
    pub fn new(kind: ShapeKind, position: Point) -> Self {
        let defaults = kind.defaults();
        Self {
            id: NodeId::generate(),
            kind,
            position,
            size: Dimensions::new(defaults.width, defaults.height),
            parent_id: None,
            z_index: kind.is_group().then_some(-1),
            data: NodeData::for_kind(kind),
        }
    }

    pub fn with_id(mut self, id: impl Into<NodeId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Dimensions::new(width, height);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<NodeId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    /// Width with the geometry fallback applied.
    pub fn width(&self) -> f64 {
        self.size.width_or(DEFAULT_NODE_WIDTH)
    }

    /// Height with the geometry fallback applied.
    pub fn height(&self) -> f64 {
        self.size.height_or(DEFAULT_NODE_HEIGHT)
    }

    /// Shallow-merge `patch` into this node's data.
    pub fn apply_patch(&mut self, patch: &NodeDataPatch) {
        let data = &mut self.data;
        if let Some(label) = &patch.label {
            data.label = label.clone();
        }
        if let Some(color) = &patch.background_color {
            data.background_color = color.clone();
        }
        if let Some(color) = &patch.border_color {
            data.border_color = color.clone();
        }
        if let Some(width) = patch.border_width {
            data.border_width = width;
        }
        if let Some(color) = &patch.text_color {
            data.text_color = color.clone();
        }
        if let Some(size) = patch.font_size {
            data.font_size = size;
        }
        if patch.font_weight.is_some() {
            data.font_weight = patch.font_weight;
        }
        if patch.font_style.is_some() {
            data.font_style = patch.font_style;
        }
        if patch.text_decoration.is_some() {
            data.text_decoration = patch.text_decoration;
        }
        if patch.text_align.is_some() {
            data.text_align = patch.text_align;
        }
        if let Some(url) = &patch.image_url {
            data.image_url = Some(url.clone());
        }
        if let Some(width) = patch.width {
            self.size.width = Some(width);
        }
        if let Some(height) = patch.height {
            self.size.height = Some(height);
        }
    }

    /// Move `data.width` / `data.height` written by older documents into `size`.
    pub(crate) fn adopt_legacy_size(&mut self) {
        if self.size.width.is_none() {
            if let Some(width) = self.data.extra.remove("width").and_then(|v| v.as_f64()) {
                self.size.width = Some(width);
            }
        }
        if self.size.height.is_none() {
            if let Some(height) = self.data.extra.remove("height").and_then(|v| v.as_f64()) {
                self.size.height = Some(height);
            }
        }
    }
}
