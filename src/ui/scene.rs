use eframe::egui;
use serde::{Deserialize, Serialize};

use super::interaction::roi::ImageRect;

/// Pixel interpolation used when the image is drawn scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformationMode {
    /// Linear filtering.
    #[default]
    Smooth,
    /// Nearest neighbour, pixels stay crisp when zoomed in.
    Fast,
}

impl TransformationMode {
    pub fn texture_options(self) -> egui::TextureOptions {
        match self {
            Self::Smooth => egui::TextureOptions::LINEAR,
            Self::Fast => egui::TextureOptions::NEAREST,
        }
    }
}

/// Caller-owned drawing in image coordinates, painted above the image.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Rect {
        rect: ImageRect,
        stroke: egui::Stroke,
    },
    Line {
        from: egui::Pos2,
        to: egui::Pos2,
        stroke: egui::Stroke,
    },
    Label {
        at: egui::Pos2,
        text: String,
        color: egui::Color32,
    },
}

/// The drawing surface: image display copy, its texture and overlay items.
pub struct Scene {
    image: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
    mode: TransformationMode,
    background: egui::Color32,
    items: Vec<SceneItem>,
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("image_size", &self.image_size())
            .field("texture", &self.texture.as_ref().map(|texture| texture.id()))
            .field("mode", &self.mode)
            .field("items", &self.items.len())
            .finish()
    }
}

impl Scene {
    pub fn new(mode: TransformationMode) -> Self {
        Self {
            image: None,
            texture: None,
            texture_dirty: false,
            mode,
            background: egui::Color32::from_gray(16),
            items: Vec::new(),
        }
    }

    pub fn image(&self) -> Option<&egui::ColorImage> {
        self.image.as_ref()
    }

    /// `[width, height]` of the current image, `None` without one.
    pub fn image_size(&self) -> Option<[usize; 2]> {
        self.image.as_ref().map(|image| image.size)
    }

    pub fn image_size_vec(&self) -> egui::Vec2 {
        self.image_size()
            .map(|[width, height]| egui::vec2(width as f32, height as f32))
            .unwrap_or(egui::Vec2::ZERO)
    }

    pub fn has_image(&self) -> bool {
        self.image_size()
            .is_some_and(|[width, height]| width > 0 && height > 0)
    }

    /// Returns the previous image size.
    pub(crate) fn replace_image(&mut self, image: egui::ColorImage) -> Option<[usize; 2]> {
        let previous = self.image_size();
        if image.size[0] == 0 || image.size[1] == 0 {
            self.image = None;
            self.texture = None;
            self.texture_dirty = false;
        } else {
            self.image = Some(image);
            self.texture_dirty = true;
        }
        previous
    }

    pub fn transformation_mode(&self) -> TransformationMode {
        self.mode
    }

    pub(crate) fn set_transformation_mode(&mut self, mode: TransformationMode) {
        if self.mode != mode {
            self.mode = mode;
            self.texture_dirty = self.image.is_some();
        }
    }

    pub fn background(&self) -> egui::Color32 {
        self.background
    }

    pub fn set_background(&mut self, color: egui::Color32) {
        self.background = color;
    }

    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn add_item(&mut self, item: SceneItem) {
        self.items.push(item);
    }

    pub fn clear_items(&mut self) {
        self.items.clear();
    }

    pub fn needs_upload(&self) -> bool {
        self.texture_dirty
    }

    /// Uploads the image when it or the sampling mode changed.
    pub(crate) fn texture_id(&mut self, ctx: &egui::Context) -> Option<egui::TextureId> {
        let image = self.image.as_ref()?;
        if self.texture_dirty || self.texture.is_none() {
            let options = self.mode.texture_options();
            match &mut self.texture {
                Some(texture) => texture.set(image.clone(), options),
                None => {
                    self.texture =
                        Some(ctx.load_texture("zoomable-image", image.clone(), options));
                }
            }
            self.texture_dirty = false;
        }
        self.texture.as_ref().map(|texture| texture.id())
    }

    pub(crate) fn paint_items(&self, painter: &egui::Painter, to_screen: impl Fn(egui::Pos2) -> egui::Pos2) {
        for item in &self.items {
            match item {
                SceneItem::Rect { rect, stroke } => {
                    let screen = egui::Rect::from_two_pos(
                        to_screen(egui::pos2(rect.x, rect.y)),
                        to_screen(egui::pos2(rect.x + rect.width, rect.y + rect.height)),
                    );
                    painter.rect_stroke(screen, 0.0, *stroke, egui::StrokeKind::Middle);
                }
                SceneItem::Line { from, to, stroke } => {
                    painter.line_segment([to_screen(*from), to_screen(*to)], *stroke);
                }
                SceneItem::Label { at, text, color } => {
                    painter.text(
                        to_screen(*at),
                        egui::Align2::LEFT_TOP,
                        text,
                        egui::FontId::proportional(12.0),
                        *color,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui;

    use super::{Scene, SceneItem, TransformationMode};
    use crate::ui::interaction::roi::ImageRect;

    #[test]
    fn empty_image_clears_scene() {
        let mut scene = Scene::new(TransformationMode::Smooth);
        scene.replace_image(egui::ColorImage::new([4, 3], egui::Color32::WHITE));
        assert_eq!(scene.image_size(), Some([4, 3]));
        assert!(scene.needs_upload());
        let previous = scene.replace_image(egui::ColorImage::new([0, 0], egui::Color32::WHITE));
        assert_eq!(previous, Some([4, 3]));
        assert!(!scene.has_image());
        assert!(!scene.needs_upload());
    }

    #[test]
    fn mode_change_requests_reupload() {
        let mut scene = Scene::new(TransformationMode::Smooth);
        scene.set_transformation_mode(TransformationMode::Fast);
        assert!(!scene.needs_upload());
        scene.replace_image(egui::ColorImage::new([2, 2], egui::Color32::BLACK));
        scene.set_transformation_mode(TransformationMode::Smooth);
        assert!(scene.needs_upload());
        assert_eq!(
            TransformationMode::Fast.texture_options(),
            egui::TextureOptions::NEAREST
        );
    }

    #[test]
    fn items_accumulate_until_cleared() {
        let mut scene = Scene::new(TransformationMode::default());
        scene.add_item(SceneItem::Rect {
            rect: ImageRect::new(0.0, 0.0, 2.0, 2.0),
            stroke: egui::Stroke::new(1.0, egui::Color32::RED),
        });
        scene.add_item(SceneItem::Label {
            at: egui::pos2(1.0, 1.0),
            text: "cell".to_string(),
            color: egui::Color32::WHITE,
        });
        assert_eq!(scene.items().len(), 2);
        scene.clear_items();
        assert!(scene.items().is_empty());
    }
}
