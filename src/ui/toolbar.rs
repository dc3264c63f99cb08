use eframe::egui;

use super::actions::{ActionSet, ZoomAction};

pub const SELECT_ROI_COMMAND: &str = "roi.select";
pub const CLEAR_ROI_COMMAND: &str = "roi.clear";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarItem {
    Action(ZoomAction),
    Button {
        command_id: String,
        label: String,
        glyph: String,
    },
    Separator,
}

impl ToolbarItem {
    pub fn command_id(&self) -> Option<&str> {
        match self {
            Self::Action(action) => Some(action.command_id()),
            Self::Button { command_id, .. } => Some(command_id),
            Self::Separator => None,
        }
    }
}

/// Row of buttons bound to zoom actions and caller-provided commands.
#[derive(Debug, Clone)]
pub struct Toolbar {
    items: Vec<ToolbarItem>,
    visible: bool,
}

impl Default for Toolbar {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolbar {
    pub fn new() -> Self {
        let mut items = ZoomAction::ALL
            .into_iter()
            .map(ToolbarItem::Action)
            .collect::<Vec<_>>();
        items.push(ToolbarItem::Separator);
        items.push(ToolbarItem::Button {
            command_id: SELECT_ROI_COMMAND.to_string(),
            label: "Select Region".to_string(),
            glyph: "Sel".to_string(),
        });
        items.push(ToolbarItem::Button {
            command_id: CLEAR_ROI_COMMAND.to_string(),
            label: "Clear Region".to_string(),
            glyph: "Clr".to_string(),
        });
        Self {
            items,
            visible: true,
        }
    }

    pub fn items(&self) -> &[ToolbarItem] {
        &self.items
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn push_separator(&mut self) {
        self.items.push(ToolbarItem::Separator);
    }

    pub fn push_custom(&mut self, command_id: impl Into<String>, label: impl Into<String>) {
        let label = label.into();
        self.items.push(ToolbarItem::Button {
            command_id: command_id.into(),
            glyph: label.clone(),
            label,
        });
    }

    /// Removes every item bound to `command_id`.
    pub fn remove(&mut self, command_id: &str) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| item.command_id().is_none_or(|id| id != command_id));
        self.items.len() != before
    }

    /// Draws the buttons and returns the command ids clicked this frame.
    pub fn show(&self, ui: &mut egui::Ui, actions: &ActionSet, has_image: bool) -> Vec<String> {
        let mut clicked = Vec::new();
        ui.horizontal_wrapped(|ui| {
            for item in &self.items {
                match item {
                    ToolbarItem::Separator => {
                        ui.separator();
                    }
                    ToolbarItem::Action(kind) => {
                        let Some(action) = actions.get(*kind) else {
                            continue;
                        };
                        if ui
                            .add_enabled(action.enabled, egui::Button::new(kind.glyph()).small())
                            .on_hover_text(action.tooltip())
                            .clicked()
                        {
                            clicked.push(kind.command_id().to_string());
                        }
                    }
                    ToolbarItem::Button {
                        command_id,
                        label,
                        glyph,
                    } => {
                        let enabled = has_image
                            || (command_id != SELECT_ROI_COMMAND && command_id != CLEAR_ROI_COMMAND);
                        if ui
                            .add_enabled(enabled, egui::Button::new(glyph.as_str()).small())
                            .on_hover_text(label.as_str())
                            .clicked()
                        {
                            clicked.push(command_id.clone());
                        }
                    }
                }
            }
        });
        clicked
    }
}
