use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::widget::ZoomableImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ZoomAction {
    ZoomIn,
    ZoomOut,
    ZoomFit,
    ZoomRealSize,
}

impl ZoomAction {
    pub const ALL: [Self; 4] = [Self::ZoomIn, Self::ZoomOut, Self::ZoomFit, Self::ZoomRealSize];

    pub const fn command_id(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoom.in",
            Self::ZoomOut => "zoom.out",
            Self::ZoomFit => "zoom.fit",
            Self::ZoomRealSize => "zoom.real_size",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ZoomIn => "Zoom In",
            Self::ZoomOut => "Zoom Out",
            Self::ZoomFit => "Fit to Window",
            Self::ZoomRealSize => "Real Size",
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            Self::ZoomIn => "+",
            Self::ZoomOut => "-",
            Self::ZoomFit => "Fit",
            Self::ZoomRealSize => "1:1",
        }
    }

    pub const fn shortcut_text(self) -> &'static str {
        match self {
            Self::ZoomIn => "+",
            Self::ZoomOut => "-",
            Self::ZoomFit => "F",
            Self::ZoomRealSize => "1",
        }
    }

    pub fn from_command_id(command_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.command_id() == command_id)
    }

    pub fn from_shortcut(text: &str) -> Option<Self> {
        match text {
            "+" | "=" => Some(Self::ZoomIn),
            "-" | "_" => Some(Self::ZoomOut),
            "f" | "F" => Some(Self::ZoomFit),
            "1" => Some(Self::ZoomRealSize),
            _ => None,
        }
    }
}

/// Command bound to an action.
pub type ActionCommand = fn(&mut ZoomableImage);

#[derive(Debug, Clone, Copy)]
pub struct Action {
    pub kind: ZoomAction,
    pub enabled: bool,
    command: ActionCommand,
}

impl Action {
    fn new(kind: ZoomAction, command: ActionCommand) -> Self {
        Self {
            kind,
            enabled: true,
            command,
        }
    }

    pub fn command_id(&self) -> &'static str {
        self.kind.command_id()
    }

    pub fn label(&self) -> &'static str {
        self.kind.label()
    }

    pub fn tooltip(&self) -> String {
        format!("{} ({})", self.kind.label(), self.kind.shortcut_text())
    }

    pub fn command(&self) -> ActionCommand {
        self.command
    }
}

fn zoom_in(image: &mut ZoomableImage) {
    let step = image.config().zoom_step;
    image.scale(step);
}

fn zoom_out(image: &mut ZoomableImage) {
    let step = image.config().zoom_step;
    image.scale(1.0 / step);
}

fn zoom_fit(image: &mut ZoomableImage) {
    image.fit_to_window();
}

fn zoom_real_size(image: &mut ZoomableImage) {
    image.normal_size();
}

/// The four zoom actions with their dispatch table.
#[derive(Debug, Clone)]
pub struct ActionSet {
    actions: BTreeMap<ZoomAction, Action>,
}

impl Default for ActionSet {
    fn default() -> Self {
        let mut actions = BTreeMap::new();
        let table: [(ZoomAction, ActionCommand); 4] = [
            (ZoomAction::ZoomIn, zoom_in),
            (ZoomAction::ZoomOut, zoom_out),
            (ZoomAction::ZoomFit, zoom_fit),
            (ZoomAction::ZoomRealSize, zoom_real_size),
        ];
        for (kind, command) in table {
            actions.insert(kind, Action::new(kind, command));
        }
        Self { actions }
    }
}

impl ActionSet {
    pub fn get(&self, kind: ZoomAction) -> Option<&Action> {
        self.actions.get(&kind)
    }

    pub fn is_enabled(&self, kind: ZoomAction) -> bool {
        self.actions.get(&kind).is_some_and(|action| action.enabled)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ZoomAction, &Action)> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub(crate) fn command(&self, kind: ZoomAction) -> Option<ActionCommand> {
        self.actions
            .get(&kind)
            .filter(|action| action.enabled)
            .map(Action::command)
    }

    /// Recomputes enabled flags from the current zoom state.
    pub(crate) fn refresh(&mut self, has_image: bool, zoom: f64, min_zoom: f64, max_zoom: f64) {
        for (kind, action) in &mut self.actions {
            action.enabled = has_image
                && match kind {
                    ZoomAction::ZoomIn => zoom < max_zoom,
                    ZoomAction::ZoomOut => zoom > min_zoom,
                    ZoomAction::ZoomFit | ZoomAction::ZoomRealSize => true,
                };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionSet, ZoomAction};

    #[test]
    fn command_ids_round_trip_through_lookup() {
        for action in ZoomAction::ALL {
            assert_eq!(ZoomAction::from_command_id(action.command_id()), Some(action));
        }
        assert_eq!(ZoomAction::from_command_id("zoom.sideways"), None);
    }

    #[test]
    fn shortcuts_map_to_actions() {
        assert_eq!(ZoomAction::from_shortcut("="), Some(ZoomAction::ZoomIn));
        assert_eq!(ZoomAction::from_shortcut("-"), Some(ZoomAction::ZoomOut));
        assert_eq!(ZoomAction::from_shortcut("f"), Some(ZoomAction::ZoomFit));
        assert_eq!(ZoomAction::from_shortcut("1"), Some(ZoomAction::ZoomRealSize));
        assert_eq!(ZoomAction::from_shortcut("q"), None);
    }

    #[test]
    fn refresh_tracks_zoom_bounds() {
        let mut actions = ActionSet::default();
        assert_eq!(actions.len(), 4);

        actions.refresh(false, 1.0, 0.5, 2.0);
        assert!(ZoomAction::ALL.iter().all(|kind| !actions.is_enabled(*kind)));

        actions.refresh(true, 2.0, 0.5, 2.0);
        assert!(!actions.is_enabled(ZoomAction::ZoomIn));
        assert!(actions.is_enabled(ZoomAction::ZoomOut));
        assert!(actions.command(ZoomAction::ZoomIn).is_none());

        actions.refresh(true, 0.5, 0.5, 2.0);
        assert!(actions.is_enabled(ZoomAction::ZoomIn));
        assert!(!actions.is_enabled(ZoomAction::ZoomOut));
        assert!(actions.is_enabled(ZoomAction::ZoomFit));
    }
}
