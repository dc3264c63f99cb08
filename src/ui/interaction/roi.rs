use eframe::egui;
use serde::{Deserialize, Serialize};

/// Rectangle in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImageRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ImageRect {
    pub const EMPTY: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_egui(rect: egui::Rect) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        }
    }

    pub fn to_egui(self) -> egui::Rect {
        egui::Rect::from_min_size(
            egui::pos2(self.x, self.y),
            egui::vec2(self.width, self.height),
        )
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Intersection with `[0, image_width] x [0, image_height]`; empty when
    /// nothing of the rect lies on the image.
    pub fn clamp_to_image(self, image_width: usize, image_height: usize) -> Self {
        let image_w = image_width as f32;
        let image_h = image_height as f32;
        let min_x = self.x.clamp(0.0, image_w);
        let min_y = self.y.clamp(0.0, image_h);
        let max_x = (self.x + self.width).clamp(0.0, image_w);
        let max_y = (self.y + self.height).clamp(0.0, image_h);
        let clamped = Self {
            x: min_x,
            y: min_y,
            width: max_x - min_x,
            height: max_y - min_y,
        };
        if clamped.is_empty() {
            Self::EMPTY
        } else {
            clamped
        }
    }

    pub fn to_pixels(self) -> Option<PixelRect> {
        if self.is_empty() {
            return None;
        }
        let min_x = self.x.floor().max(0.0);
        let min_y = self.y.floor().max(0.0);
        let max_x = (self.x + self.width).ceil().max(min_x);
        let max_y = (self.y + self.height).ceil().max(min_y);
        Some(PixelRect {
            x: min_x as u32,
            y: min_y as u32,
            width: (max_x - min_x) as u32,
            height: (max_y - min_y) as u32,
        })
    }
}

/// Integer pixel bounds covering an [`ImageRect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    /// Waiting for the press that starts the rubber band.
    Armed,
    Dragging {
        anchor: egui::Pos2,
        current: egui::Pos2,
    },
}

/// Rubber-band selection lifecycle and the committed region of interest.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    state: SelectionState,
    roi: ImageRect,
}

impl Selection {
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn roi(&self) -> ImageRect {
        self.roi
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, SelectionState::Idle)
    }

    pub fn arm(&mut self) {
        self.state = SelectionState::Armed;
    }

    /// Starts the band at `screen_pos`. Only valid while armed.
    pub fn begin(&mut self, screen_pos: egui::Pos2) -> bool {
        if self.state != SelectionState::Armed {
            return false;
        }
        self.state = SelectionState::Dragging {
            anchor: screen_pos,
            current: screen_pos,
        };
        true
    }

    pub fn update(&mut self, screen_pos: egui::Pos2) {
        if let SelectionState::Dragging { current, .. } = &mut self.state {
            *current = screen_pos;
        }
    }

    /// Screen rect of the band while dragging.
    pub fn band(&self) -> Option<egui::Rect> {
        match self.state {
            SelectionState::Dragging { anchor, current } => {
                Some(egui::Rect::from_two_pos(anchor, current))
            }
            _ => None,
        }
    }

    /// Ends the drag and stores `roi` unless it is empty.
    ///
    /// Returns the committed ROI. The state returns to idle either way.
    pub fn commit(&mut self, roi: ImageRect) -> Option<ImageRect> {
        if !matches!(self.state, SelectionState::Dragging { .. }) {
            return None;
        }
        self.state = SelectionState::Idle;
        if roi.is_empty() {
            return None;
        }
        self.roi = roi;
        Some(roi)
    }

    pub fn cancel(&mut self) {
        self.state = SelectionState::Idle;
    }

    pub fn clear(&mut self) {
        self.state = SelectionState::Idle;
        self.roi = ImageRect::EMPTY;
    }

    pub fn status_text(&self) -> Option<String> {
        match self.state {
            SelectionState::Armed => Some("Drag to select a region".to_string()),
            SelectionState::Dragging { anchor, current } => {
                let size = (current - anchor).abs();
                Some(format!("Selecting {:.0}x{:.0} px on screen", size.x, size.y))
            }
            SelectionState::Idle if !self.roi.is_empty() => Some(format!(
                "ROI {:.0},{:.0} {:.0}x{:.0}",
                self.roi.x, self.roi.y, self.roi.width, self.roi.height
            )),
            SelectionState::Idle => None,
        }
    }
}
