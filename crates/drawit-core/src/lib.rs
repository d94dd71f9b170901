//! DrawIt Core Library
//!
//! Rendering-agnostic editing engine for the DrawIt diagram editor: the node
//! and edge model, undo history, snap guides, auto-layout, templates and
//! persistence.

pub mod canvas;
pub mod clipboard;
pub mod command;
pub mod config;
pub mod drag;
pub mod geometry;
pub mod history;
pub mod layout;
pub mod library;
pub mod model;
pub mod presets;
pub mod selection;
pub mod snap;
pub mod storage;

pub use canvas::{Alignment, Canvas, StagedEdit};
pub use clipboard::Clipboard;
pub use command::{Command, reduce};
pub use config::{ConfigError, EditorConfig};
pub use drag::DragSession;
pub use geometry::{NodeBounds, selection_box};
pub use history::{History, MAX_HISTORY_LENGTH};
pub use layout::{
    LayoutDirection, LayoutEngine, LayoutGraph, LayoutNode, LayoutOptions, LayoutPreset,
    SugiyamaEngine, layout_nodes,
};
pub use library::Template;
pub use model::{Document, Edge, EdgeId, HealReport, Node, NodeId, ShapeKind, TemplateId};
pub use presets::{DiagramPreset, PresetCategory, preset_by_id, presets, presets_in};
pub use selection::Selection;
pub use snap::{Guide, GuideOrientation, SNAP_THRESHOLD, SnapGuides, SnapResult, calculate_snap};
pub use storage::{
    DEFAULT_STORAGE_KEY, FileStorage, MemoryStorage, SavedState, Storage, StorageError,
    StorageResult,
};
