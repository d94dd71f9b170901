//! Built-in starter diagrams.

use crate::canvas::Canvas;
use crate::model::{Document, Edge, Node, ShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetCategory {
    Basic,
    Flowchart,
    Uml,
    Network,
    Business,
}

impl PresetCategory {
    pub const ALL: [PresetCategory; 5] = [
        PresetCategory::Basic,
        PresetCategory::Flowchart,
        PresetCategory::Uml,
        PresetCategory::Network,
        PresetCategory::Business,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            PresetCategory::Basic => "Базовые",
            PresetCategory::Flowchart => "Блок-схемы",
            PresetCategory::Uml => "UML",
            PresetCategory::Network => "Сети",
            PresetCategory::Business => "Бизнес",
        }
    }
}

/// A ready-made diagram the user can start from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramPreset {
    pub id: String,
    pub name: String,
    pub category: PresetCategory,
    pub description: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl DiagramPreset {
    pub fn document(&self) -> Document {
        Document::new(self.nodes.clone(), self.edges.clone())
    }
}

fn node(id: &str, kind: ShapeKind, x: f64, y: f64, label: &str) -> Node {
    Node::new(kind, Point::new(x, y)).with_id(id).with_label(label)
}

fn edge(id: &str, source: &str, target: &str) -> Edge {
    Edge::new(source, target).with_id(id)
}

fn preset(
    id: &str,
    name: &str,
    category: PresetCategory,
    description: &str,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
) -> DiagramPreset {
    DiagramPreset {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
        nodes,
        edges,
    }
}

/// All built-in presets, in menu order.
pub fn presets() -> Vec<DiagramPreset> {
    use ShapeKind::*;
    vec![
        preset(
            "empty",
            "Пустая диаграмма",
            PresetCategory::Basic,
            "Начните с чистого листа",
            vec![],
            vec![],
        ),
        preset(
            "simple-flow",
            "Простой поток",
            PresetCategory::Basic,
            "3 блока с последовательным соединением",
            vec![
                node("n1", RoundedRect, 100.0, 100.0, "Начало"),
                node("n2", Rectangle, 100.0, 250.0, "Процесс"),
                node("n3", RoundedRect, 100.0, 400.0, "Конец"),
            ],
            vec![edge("e1", "n1", "n2"), edge("e2", "n2", "n3")],
        ),
        preset(
            "decision-flow",
            "Блок-схема с условием",
            PresetCategory::Flowchart,
            "Блок-схема с ветвлением",
            vec![
                node("start", Ellipse, 200.0, 50.0, "Старт"),
                node("process1", Rectangle, 200.0, 150.0, "Ввод данных"),
                node("decision", Diamond, 200.0, 280.0, "Условие?"),
                node("yes-branch", Rectangle, 50.0, 420.0, "Да: Действие A"),
                node("no-branch", Rectangle, 350.0, 420.0, "Нет: Действие B"),
                node("end", Ellipse, 200.0, 550.0, "Конец"),
            ],
            vec![
                edge("e1", "start", "process1"),
                edge("e2", "process1", "decision"),
                edge("e3", "decision", "yes-branch").with_label("Да"),
                edge("e4", "decision", "no-branch").with_label("Нет"),
                edge("e5", "yes-branch", "end"),
                edge("e6", "no-branch", "end"),
            ],
        ),
        preset(
            "loop-flow",
            "Цикл",
            PresetCategory::Flowchart,
            "Блок-схема с циклом",
            vec![
                node("start", Ellipse, 200.0, 50.0, "Старт"),
                node("init", Rectangle, 200.0, 150.0, "i = 0"),
                node("check", Diamond, 200.0, 280.0, "i < 10?"),
                node("body", Rectangle, 200.0, 420.0, "Тело цикла"),
                node("increment", Rectangle, 400.0, 350.0, "i++"),
                node("end", Ellipse, 200.0, 550.0, "Конец"),
            ],
            vec![
                edge("e1", "start", "init"),
                edge("e2", "init", "check"),
                edge("e3", "check", "body").with_label("Да"),
                edge("e4", "body", "increment"),
                edge("e5", "increment", "check"),
                edge("e6", "check", "end").with_label("Нет"),
            ],
        ),
        preset(
            "class-diagram",
            "Диаграмма классов",
            PresetCategory::Uml,
            "Простая диаграмма классов",
            vec![
                node("base", Rectangle, 200.0, 50.0, "Animal"),
                node("dog", Rectangle, 50.0, 200.0, "Dog"),
                node("cat", Rectangle, 350.0, 200.0, "Cat"),
            ],
            vec![edge("e1", "dog", "base"), edge("e2", "cat", "base")],
        ),
        preset(
            "star-topology",
            "Звезда",
            PresetCategory::Network,
            "Топология \"звезда\"",
            vec![
                node("hub", Cylinder, 250.0, 200.0, "Hub"),
                node("pc1", Rectangle, 100.0, 50.0, "PC 1"),
                node("pc2", Rectangle, 400.0, 50.0, "PC 2"),
                node("pc3", Rectangle, 100.0, 350.0, "PC 3"),
                node("pc4", Rectangle, 400.0, 350.0, "PC 4"),
            ],
            vec![
                edge("e1", "pc1", "hub"),
                edge("e2", "pc2", "hub"),
                edge("e3", "pc3", "hub"),
                edge("e4", "pc4", "hub"),
            ],
        ),
        preset(
            "org-chart",
            "Орг. структура",
            PresetCategory::Business,
            "Организационная структура",
            vec![
                node("ceo", RoundedRect, 250.0, 50.0, "CEO"),
                node("cto", RoundedRect, 100.0, 180.0, "CTO"),
                node("cfo", RoundedRect, 400.0, 180.0, "CFO"),
                node("dev1", Rectangle, 20.0, 310.0, "Dev Team"),
                node("dev2", Rectangle, 180.0, 310.0, "QA Team"),
                node("fin1", Rectangle, 350.0, 310.0, "Accounting"),
                node("fin2", Rectangle, 480.0, 310.0, "HR"),
            ],
            vec![
                edge("e1", "ceo", "cto"),
                edge("e2", "ceo", "cfo"),
                edge("e3", "cto", "dev1"),
                edge("e4", "cto", "dev2"),
                edge("e5", "cfo", "fin1"),
                edge("e6", "cfo", "fin2"),
            ],
        ),
    ]
}

/// Look up a preset by id.
pub fn preset_by_id(id: &str) -> Option<DiagramPreset> {
    presets().into_iter().find(|p| p.id == id)
}

pub fn presets_in(category: PresetCategory) -> Vec<DiagramPreset> {
    presets()
        .into_iter()
        .filter(|p| p.category == category)
        .collect()
}

impl Canvas {
    /// Replace the diagram with a preset. Undoable.
    pub fn apply_preset(&mut self, preset: &DiagramPreset) {
        log::debug!("Applying preset {}", preset.id);
        self.import_document(preset.document());
        self.selection.clear();
        self.push_history();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_preset_ids_are_unique() {
        let all = presets();
        let ids: HashSet<&str> = all.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids.len(), all.len());
        assert_eq!(all.len(), 7);
    }

    #[test]
    fn test_presets_are_consistent() {
        for preset in presets() {
            let report = preset.document().heal();
            assert!(report.is_clean(), "{} has dangling references", preset.id);
        }
    }

    #[test]
    fn test_lookup_and_category() {
        assert!(preset_by_id("loop-flow").is_some());
        assert!(preset_by_id("missing").is_none());
        let flowcharts = presets_in(PresetCategory::Flowchart);
        assert_eq!(flowcharts.len(), 2);
        assert!(PresetCategory::ALL.iter().all(|c| !presets_in(*c).is_empty()));
    }

    #[test]
    fn test_apply_preset_is_undoable() {
        let mut canvas = Canvas::new();
        canvas.add_node(ShapeKind::Rectangle, Point::ZERO);
        let Some(flow) = preset_by_id("simple-flow") else {
            panic!("simple-flow preset missing");
        };
        canvas.apply_preset(&flow);
        assert_eq!(canvas.nodes().len(), 3);
        assert_eq!(canvas.edges().len(), 2);
        assert!(canvas.undo());
        assert_eq!(canvas.nodes().len(), 1);
    }
}
