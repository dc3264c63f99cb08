use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanvasButton {
    Primary,
    Secondary,
    Middle,
}

impl CanvasButton {
    pub fn from_egui(button: egui::PointerButton) -> Option<Self> {
        match button {
            egui::PointerButton::Primary => Some(Self::Primary),
            egui::PointerButton::Secondary => Some(Self::Secondary),
            egui::PointerButton::Middle => Some(Self::Middle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CanvasModifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub command: bool,
}

impl CanvasModifiers {
    pub fn from_egui(input: &egui::InputState) -> Self {
        Self {
            shift: input.modifiers.shift,
            alt: input.modifiers.alt,
            ctrl: input.modifiers.ctrl,
            command: input.modifiers.command,
        }
    }

    pub fn zoom_modifier(&self) -> bool {
        self.ctrl || self.command
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEventKind {
    Press(CanvasButton),
    Drag { button: CanvasButton, delta: egui::Vec2 },
    Release(CanvasButton),
    Scroll { delta: egui::Vec2 },
    /// Multiplicative zoom request, e.g. from a pinch gesture.
    Zoom { factor: f64 },
}

/// One pointer interaction in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasEvent {
    pub kind: CanvasEventKind,
    pub pointer_screen: egui::Pos2,
    pub modifiers: CanvasModifiers,
}

impl CanvasEvent {
    pub fn new(kind: CanvasEventKind, pointer_screen: egui::Pos2) -> Self {
        Self {
            kind,
            pointer_screen,
            modifiers: CanvasModifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: CanvasModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn press(button: CanvasButton, at: egui::Pos2) -> Self {
        Self::new(CanvasEventKind::Press(button), at)
    }

    pub fn drag(button: CanvasButton, at: egui::Pos2, delta: egui::Vec2) -> Self {
        Self::new(CanvasEventKind::Drag { button, delta }, at)
    }

    pub fn release(button: CanvasButton, at: egui::Pos2) -> Self {
        Self::new(CanvasEventKind::Release(button), at)
    }
}
