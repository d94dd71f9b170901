//! Discrete editing commands and the `reduce` entry point.

use crate::canvas::{Alignment, Canvas, StagedEdit};
use crate::layout::{LayoutOptions, LayoutPreset, SugiyamaEngine};
use crate::model::{Document, EdgeId, NodeId, ShapeKind, TemplateId};
use crate::presets;
use crate::storage::SavedState;
use kurbo::Point;

/// One user gesture, as forwarded by the render layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddNode { kind: ShapeKind, position: Point },
    Stage(StagedEdit),
    Commit,
    DuplicateNode(NodeId),
    AlignNodes(Alignment),
    SetNodeParent { node: NodeId, parent: Option<NodeId> },
    DeleteSelected,
    Connect {
        source: NodeId,
        target: NodeId,
        source_handle: Option<String>,
        target_handle: Option<String>,
    },
    SelectNodes(Vec<NodeId>),
    SelectEdges(Vec<EdgeId>),
    SelectAll,
    ClearSelection,
    CopySelected,
    PasteClipboard,
    Undo,
    Redo,
    BeginDrag(NodeId),
    DragMove(Point),
    EndDrag(Point),
    CancelDrag,
    ApplyLayout(LayoutOptions),
    ApplyLayoutPreset(LayoutPreset),
    SaveTemplate(String),
    DeleteTemplate(TemplateId),
    InstantiateTemplate { id: TemplateId, position: Point },
    ApplyPreset(String),
    Import(Document),
    Load(SavedState),
}

impl Canvas {
    /// Execute one command.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::AddNode { kind, position } => {
                self.add_node(kind, position);
            }
            Command::Stage(edit) => {
                self.stage(edit);
            }
            Command::Commit => {
                self.commit();
            }
            Command::DuplicateNode(id) => {
                self.duplicate_node(&id);
            }
            Command::AlignNodes(alignment) => {
                self.align_nodes(alignment);
            }
            Command::SetNodeParent { node, parent } => {
                self.set_node_parent(&node, parent.as_ref());
            }
            Command::DeleteSelected => {
                self.delete_selected();
            }
            Command::Connect {
                source,
                target,
                source_handle,
                target_handle,
            } => {
                self.connect(&source, &target, source_handle, target_handle);
            }
            Command::SelectNodes(ids) => self.select_nodes(ids),
            Command::SelectEdges(ids) => self.select_edges(ids),
            Command::SelectAll => self.select_all(),
            Command::ClearSelection => self.clear_selection(),
            Command::CopySelected => {
                self.copy_selected();
            }
            Command::PasteClipboard => {
                self.paste_clipboard();
            }
            Command::Undo => {
                self.undo();
            }
            Command::Redo => {
                self.redo();
            }
            Command::BeginDrag(id) => {
                self.begin_drag(&id);
            }
            Command::DragMove(position) => {
                self.drag_move(position);
            }
            Command::EndDrag(position) => {
                self.end_drag(position);
            }
            Command::CancelDrag => self.cancel_drag(),
            Command::ApplyLayout(options) => {
                self.apply_layout(&SugiyamaEngine, &options);
            }
            Command::ApplyLayoutPreset(preset) => {
                self.apply_layout_preset(preset);
            }
            Command::SaveTemplate(name) => {
                self.save_template(name);
            }
            Command::DeleteTemplate(id) => {
                self.delete_template(&id);
            }
            Command::InstantiateTemplate { id, position } => {
                self.instantiate_template(&id, position);
            }
            Command::ApplyPreset(id) => match presets::preset_by_id(&id) {
                Some(preset) => self.apply_preset(&preset),
                None => log::warn!("Unknown preset {id}"),
            },
            Command::Import(document) => {
                self.import_document(document);
            }
            Command::Load(state) => {
                self.load(state);
            }
        }
    }
}

/// Apply `command` to `canvas` by value and return the new state.
pub fn reduce(mut canvas: Canvas, command: Command) -> Canvas {
    canvas.apply(command);
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeDataPatch;

    #[test]
    fn test_reduce_scenario() {
        let canvas = Canvas::new();
        let canvas = reduce(
            canvas,
            Command::AddNode {
                kind: ShapeKind::Rectangle,
                position: Point::new(100.0, 200.0),
            },
        );
        assert_eq!(canvas.history().len(), 2);
        assert_eq!(canvas.history().index(), 1);
        assert_eq!(canvas.nodes().len(), 1);

        let canvas = reduce(canvas, Command::Undo);
        assert_eq!(canvas.nodes().len(), 0);
        assert_eq!(canvas.history().index(), 0);

        let canvas = reduce(canvas, Command::Redo);
        assert_eq!(canvas.nodes().len(), 1);
        assert_eq!(canvas.history().index(), 1);
    }

    #[test]
    fn test_stage_and_commit_commands() {
        let mut canvas = Canvas::new();
        canvas.apply(Command::AddNode {
            kind: ShapeKind::Ellipse,
            position: Point::ZERO,
        });
        let id = canvas.nodes()[0].id.clone();
        for label in ["N", "Ne", "New"] {
            canvas.apply(Command::Stage(StagedEdit::NodeData {
                id: id.clone(),
                patch: NodeDataPatch::label(label),
            }));
        }
        canvas.apply(Command::Commit);
        assert_eq!(canvas.history().len(), 3);
        assert_eq!(canvas.node(&id).unwrap().data.label, "New");
    }

    #[test]
    fn test_select_and_delete_commands() {
        let mut canvas = Canvas::new();
        canvas.apply(Command::AddNode {
            kind: ShapeKind::Rectangle,
            position: Point::ZERO,
        });
        canvas.apply(Command::SelectAll);
        canvas.apply(Command::DeleteSelected);
        assert!(canvas.nodes().is_empty());
        assert_eq!(canvas.history().len(), 3);
    }

    #[test]
    fn test_apply_preset_command() {
        let mut canvas = Canvas::new();
        canvas.apply(Command::ApplyPreset("simple-flow".into()));
        assert!(!canvas.nodes().is_empty());
        assert_eq!(canvas.history().len(), 2);

        canvas.apply(Command::ApplyPreset("no-such-preset".into()));
        assert_eq!(canvas.history().len(), 2);
    }
}
