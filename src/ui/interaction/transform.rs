use eframe::egui;

pub const DEFAULT_MIN_ZOOM: f64 = 1.0e-4;
pub const DEFAULT_MAX_ZOOM: f64 = 1.0e4;

/// Hard zoom range. Inside it `zoom as f32` and its inverse stay finite and
/// non-zero, so zoomed geometry and screen-to-image mapping stay finite too.
pub const ZOOM_LIMIT_MIN: f64 = 1.0e-12;
pub const ZOOM_LIMIT_MAX: f64 = 1.0e12;

/// Overflow below half a pixel does not produce a scrollbar.
const SCROLLBAR_TOLERANCE: f32 = 0.5;

/// Returns the factor when it can be applied to a zoom level.
pub fn sanitize_factor(factor: f64) -> Option<f64> {
    (factor.is_finite() && factor > 0.0).then_some(factor)
}

/// Zoom that shows the whole image inside `viewport_size`.
///
/// `None` when either size is degenerate (viewport below one pixel or an
/// empty image).
pub fn fit_zoom(viewport_size: egui::Vec2, image_size: egui::Vec2) -> Option<f64> {
    if viewport_size.x < 1.0 || viewport_size.y < 1.0 {
        return None;
    }
    if image_size.x <= 0.0 || image_size.y <= 0.0 {
        return None;
    }
    let zoom_x = f64::from(viewport_size.x) / f64::from(image_size.x);
    let zoom_y = f64::from(viewport_size.y) / f64::from(image_size.y);
    Some(zoom_x.min(zoom_y))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scrollbars {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Scrollbars {
    pub fn any(self) -> bool {
        self.horizontal || self.vertical
    }
}

/// Maps between screen positions inside a viewport and image pixels.
///
/// On each axis the zoomed content is either centered (when it fits) or
/// shifted by the scroll offset (when it overflows).
#[derive(Debug, Clone)]
pub struct ViewTransform {
    zoom: f64,
    scroll: egui::Vec2,
    fit_mode: bool,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            scroll: egui::Vec2::ZERO,
            fit_mode: false,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn scroll(&self) -> egui::Vec2 {
        self.scroll
    }

    pub fn fit_mode(&self) -> bool {
        self.fit_mode
    }

    pub fn set_fit_mode(&mut self, fit_mode: bool) {
        self.fit_mode = fit_mode;
    }

    pub fn content_size(&self, image_size: egui::Vec2) -> egui::Vec2 {
        image_size * self.zoom as f32
    }

    pub fn scrollbars(&self, viewport_size: egui::Vec2, image_size: egui::Vec2) -> Scrollbars {
        let content = self.content_size(image_size);
        Scrollbars {
            horizontal: content.x > viewport_size.x + SCROLLBAR_TOLERANCE,
            vertical: content.y > viewport_size.y + SCROLLBAR_TOLERANCE,
        }
    }

    pub fn max_scroll(&self, viewport_size: egui::Vec2, image_size: egui::Vec2) -> egui::Vec2 {
        let content = self.content_size(image_size);
        egui::vec2(
            (content.x - viewport_size.x).max(0.0),
            (content.y - viewport_size.y).max(0.0),
        )
    }

    /// Offset of the content's top-left corner from the viewport's top-left.
    pub fn content_origin(&self, viewport: egui::Rect, image_size: egui::Vec2) -> egui::Vec2 {
        let content = self.content_size(image_size);
        let bars = self.scrollbars(viewport.size(), image_size);
        let x = if bars.horizontal {
            -self.scroll.x
        } else {
            (viewport.width() - content.x) * 0.5
        };
        let y = if bars.vertical {
            -self.scroll.y
        } else {
            (viewport.height() - content.y) * 0.5
        };
        egui::vec2(x, y)
    }

    pub fn screen_to_image(
        &self,
        viewport: egui::Rect,
        image_size: egui::Vec2,
        screen_pos: egui::Pos2,
    ) -> egui::Pos2 {
        let origin = viewport.min + self.content_origin(viewport, image_size);
        let zoom = self.zoom as f32;
        egui::pos2(
            (screen_pos.x - origin.x) / zoom,
            (screen_pos.y - origin.y) / zoom,
        )
    }

    pub fn image_to_screen(
        &self,
        viewport: egui::Rect,
        image_size: egui::Vec2,
        image_pos: egui::Pos2,
    ) -> egui::Pos2 {
        let origin = viewport.min + self.content_origin(viewport, image_size);
        let zoom = self.zoom as f32;
        egui::pos2(origin.x + image_pos.x * zoom, origin.y + image_pos.y * zoom)
    }

    pub fn screen_rect_to_image(
        &self,
        viewport: egui::Rect,
        image_size: egui::Vec2,
        screen_rect: egui::Rect,
    ) -> egui::Rect {
        egui::Rect::from_min_max(
            self.screen_to_image(viewport, image_size, screen_rect.min),
            self.screen_to_image(viewport, image_size, screen_rect.max),
        )
    }

    pub fn image_rect_to_screen(
        &self,
        viewport: egui::Rect,
        image_size: egui::Vec2,
        image_rect: egui::Rect,
    ) -> egui::Rect {
        egui::Rect::from_min_max(
            self.image_to_screen(viewport, image_size, image_rect.min),
            self.image_to_screen(viewport, image_size, image_rect.max),
        )
    }

    /// Screen rect covered by the whole image.
    pub fn content_rect(&self, viewport: egui::Rect, image_size: egui::Vec2) -> egui::Rect {
        egui::Rect::from_min_size(
            viewport.min + self.content_origin(viewport, image_size),
            self.content_size(image_size),
        )
    }

    /// Changes the zoom while keeping the image point under `anchor` still.
    ///
    /// The caller is responsible for validating `zoom`.
    pub fn set_zoom_at(
        &mut self,
        viewport: egui::Rect,
        image_size: egui::Vec2,
        zoom: f64,
        anchor: egui::Pos2,
    ) {
        let anchor_image = self.screen_to_image(viewport, image_size, anchor);
        self.zoom = zoom;
        let anchor_offset = anchor - viewport.min;
        let zoom = zoom as f32;
        self.scroll = egui::vec2(
            anchor_image.x * zoom - anchor_offset.x,
            anchor_image.y * zoom - anchor_offset.y,
        );
        self.clamp_scroll(viewport.size(), image_size);
    }

    /// Sets the zoom without an anchor, used before a viewport is known.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn clamp_scroll(&mut self, viewport_size: egui::Vec2, image_size: egui::Vec2) {
        let max = self.max_scroll(viewport_size, image_size);
        self.scroll = egui::vec2(
            clamp_finite(self.scroll.x, max.x),
            clamp_finite(self.scroll.y, max.y),
        );
    }

    pub fn scroll_by(&mut self, delta: egui::Vec2, viewport_size: egui::Vec2, image_size: egui::Vec2) {
        self.scroll += delta;
        self.clamp_scroll(viewport_size, image_size);
    }

    pub fn reset_scroll(&mut self) {
        self.scroll = egui::Vec2::ZERO;
    }
}

fn clamp_finite(value: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui;

    use super::{ViewTransform, fit_zoom, sanitize_factor};

    fn viewport() -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(200.0, 100.0))
    }

    #[test]
    fn sanitize_rejects_invalid_factors() {
        assert_eq!(sanitize_factor(2.0), Some(2.0));
        assert_eq!(sanitize_factor(0.0), None);
        assert_eq!(sanitize_factor(-1.5), None);
        assert_eq!(sanitize_factor(f64::NAN), None);
        assert_eq!(sanitize_factor(f64::INFINITY), None);
    }

    #[test]
    fn fit_zoom_uses_limiting_axis() {
        let zoom = fit_zoom(egui::vec2(200.0, 100.0), egui::vec2(400.0, 400.0)).expect("fit");
        assert!((zoom - 0.25).abs() < 1e-9);
        assert!(fit_zoom(egui::vec2(0.5, 100.0), egui::vec2(10.0, 10.0)).is_none());
        assert!(fit_zoom(egui::vec2(100.0, 100.0), egui::vec2(0.0, 10.0)).is_none());
    }

    #[test]
    fn small_content_is_centered() {
        let transform = ViewTransform::new();
        let image = egui::vec2(100.0, 50.0);
        let origin = transform.content_origin(viewport(), image);
        assert_eq!(origin, egui::vec2(50.0, 25.0));
        let top_left = transform.image_to_screen(viewport(), image, egui::pos2(0.0, 0.0));
        assert_eq!(top_left, egui::pos2(60.0, 45.0));
    }

    #[test]
    fn screen_and_image_mapping_are_inverse() {
        let mut transform = ViewTransform::new();
        let image = egui::vec2(400.0, 300.0);
        transform.set_zoom(2.0);
        transform.scroll_by(egui::vec2(120.0, 40.0), viewport().size(), image);
        let screen = egui::pos2(95.0, 70.0);
        let image_pos = transform.screen_to_image(viewport(), image, screen);
        assert_eq!(image_pos, egui::pos2((95.0 - 10.0 + 120.0) / 2.0, (70.0 - 20.0 + 40.0) / 2.0));
        let back = transform.image_to_screen(viewport(), image, image_pos);
        assert!((back - screen).length() < 1e-3);
    }

    #[test]
    fn zoom_at_anchor_keeps_point_fixed() {
        let mut transform = ViewTransform::new();
        let image = egui::vec2(1000.0, 1000.0);
        let anchor = egui::pos2(110.0, 70.0);
        let before = transform.screen_to_image(viewport(), image, anchor);
        transform.set_zoom_at(viewport(), image, 3.0, anchor);
        let after = transform.screen_to_image(viewport(), image, anchor);
        assert!((before - after).length() < 1e-3);
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut transform = ViewTransform::new();
        let image = egui::vec2(300.0, 80.0);
        transform.scroll_by(egui::vec2(1000.0, 1000.0), viewport().size(), image);
        assert_eq!(transform.scroll(), egui::vec2(100.0, 0.0));
        transform.scroll_by(egui::vec2(-5000.0, 0.0), viewport().size(), image);
        assert_eq!(transform.scroll(), egui::Vec2::ZERO);
    }

    #[test]
    fn scrollbars_follow_content_size() {
        let mut transform = ViewTransform::new();
        let image = egui::vec2(300.0, 80.0);
        let bars = transform.scrollbars(viewport().size(), image);
        assert!(bars.horizontal);
        assert!(!bars.vertical);
        transform.set_zoom(0.5);
        assert!(!transform.scrollbars(viewport().size(), image).any());
    }
}
