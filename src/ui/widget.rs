
use eframe::egui;

use crate::config::{FitPolicy, ImagePolicy, ViewerConfig};

use super::actions::{ActionSet, ZoomAction};
use super::interaction::events::{CanvasButton, CanvasEvent, CanvasEventKind, CanvasModifiers};
use super::interaction::roi::{ImageRect, PixelRect, Selection, SelectionState};
use super::interaction::transform::{ViewTransform, ZOOM_LIMIT_MIN, fit_zoom, sanitize_factor};
use super::render::RenderBackend;
use super::scene::{Scene, TransformationMode};
use super::signals::{ConnectionId, RoiSelected, Signal, ZoomChanged};
use super::toolbar::{CLEAR_ROI_COMMAND, SELECT_ROI_COMMAND, Toolbar};

const SCROLLBAR_THICKNESS: f32 = 6.0;

/// Conversion into the display copy held by the widget.
pub trait IntoDisplayImage {
    fn into_display_image(self) -> egui::ColorImage;
}

impl IntoDisplayImage for egui::ColorImage {
    fn into_display_image(self) -> egui::ColorImage {
        self
    }
}

impl IntoDisplayImage for image::RgbaImage {
    fn into_display_image(self) -> egui::ColorImage {
        let size = [self.width() as usize, self.height() as usize];
        egui::ColorImage::from_rgba_unmultiplied(size, self.as_raw())
    }
}

impl IntoDisplayImage for &image::DynamicImage {
    fn into_display_image(self) -> egui::ColorImage {
        self.to_rgba8().into_display_image()
    }
}

impl IntoDisplayImage for image::DynamicImage {
    fn into_display_image(self) -> egui::ColorImage {
        self.into_rgba8().into_display_image()
    }
}

/// What happened during one [`ZoomableImage::show`] call.
#[derive(Debug)]
pub struct ZoomableImageResponse {
    pub response: egui::Response,
    /// Clicked toolbar commands the widget does not handle itself.
    pub commands: Vec<String>,
    pub roi_selected: Option<ImageRect>,
    pub zoom_changed: Option<f64>,
    /// Image coordinates under the pointer, when it is over the image.
    pub hover_image: Option<egui::Pos2>,
}

/// Zoomable, pannable image view with rubber-band region selection.
pub struct ZoomableImage {
    config: ViewerConfig,
    scene: Scene,
    transform: ViewTransform,
    selection: Selection,
    actions: ActionSet,
    toolbar: Toolbar,
    embed_toolbar: bool,
    render_backend: RenderBackend,
    viewport: Option<egui::Rect>,
    panning: bool,
    last_commit: Option<ImageRect>,
    roi_selected: Signal<RoiSelected>,
    zoom_changed: Signal<ZoomChanged>,
}

impl std::fmt::Debug for ZoomableImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoomableImage")
            .field("scene", &self.scene)
            .field("zoom", &self.transform.zoom())
            .field("fit_mode", &self.transform.fit_mode())
            .field("selection", &self.selection.state())
            .field("roi", &self.selection.roi())
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}

impl Default for ZoomableImage {
    fn default() -> Self {
        Self::with_config(ViewerConfig::default())
    }
}

impl ZoomableImage {
    pub fn new(embed_toolbar: bool) -> Self {
        Self::with_config(ViewerConfig {
            embed_toolbar,
            ..ViewerConfig::default()
        })
    }

    pub fn with_config(config: ViewerConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(error) => {
                log::warn!("{error}; falling back to default viewer configuration");
                ViewerConfig {
                    embed_toolbar: config.embed_toolbar,
                    ..ViewerConfig::default()
                }
            }
        };
        let mut widget = Self {
            scene: Scene::new(config.transformation_mode),
            transform: ViewTransform::new(),
            selection: Selection::default(),
            actions: ActionSet::default(),
            toolbar: Toolbar::new(),
            embed_toolbar: config.embed_toolbar,
            render_backend: config.render_backend,
            viewport: None,
            panning: false,
            last_commit: None,
            roi_selected: Signal::default(),
            zoom_changed: Signal::default(),
            config,
        };
        widget.refresh_actions();
        widget
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn set_image(&mut self, image: impl IntoDisplayImage) {
        let image = image.into_display_image();
        let previous = self.scene.replace_image(image);
        let current = self.scene.image_size();
        log::info!("displaying image {:?} (previous {:?})", current, previous);

        if previous != current {
            self.selection.clear();
            self.panning = false;
            self.transform.reset_scroll();
        }

        if self.transform.fit_mode() {
            self.apply_fit();
        } else {
            match self.config.image_policy {
                ImagePolicy::Preserve => self.clamp_scroll(),
                ImagePolicy::Fit => self.fit_to_window(),
                ImagePolicy::RealSize => self.normal_size(),
            }
        }
        self.refresh_actions();
    }

    pub fn has_image(&self) -> bool {
        self.scene.has_image()
    }

    pub fn zoom_level(&self) -> f64 {
        self.transform.zoom()
    }

    pub fn is_fit_mode(&self) -> bool {
        self.transform.fit_mode()
    }

    /// Multiplies the zoom level, anchored at the viewport center.
    pub fn scale(&mut self, factor: f64) {
        self.scale_about(factor, None);
    }

    /// Multiplies the zoom level keeping the image point under `anchor` still.
    pub fn scale_at(&mut self, factor: f64, anchor: egui::Pos2) {
        self.scale_about(factor, Some(anchor));
    }

    fn scale_about(&mut self, factor: f64, anchor: Option<egui::Pos2>) {
        let Some(factor) = sanitize_factor(factor) else {
            log::warn!("ignoring invalid zoom factor {factor}");
            return;
        };
        let Some(zoom) = sanitize_factor(self.transform.zoom() * factor) else {
            log::warn!("ignoring zoom factor {factor}: result is not representable");
            return;
        };
        // A fit may sit below min_zoom; zooming out from there stays put.
        let current = self.transform.zoom();
        let zoom = zoom.clamp(self.config.min_zoom.min(current), self.config.max_zoom);
        self.transform.set_fit_mode(false);
        self.apply_zoom(zoom, anchor);
    }

    pub fn absolute_scale(&mut self, factor: f64) {
        let Some(zoom) = sanitize_factor(factor) else {
            log::warn!("ignoring invalid absolute zoom {factor}");
            return;
        };
        self.transform.set_fit_mode(false);
        self.apply_zoom(self.config.clamp_zoom(zoom), None);
    }

    pub fn fit_to_window(&mut self) {
        self.transform
            .set_fit_mode(self.config.fit_policy == FitPolicy::Sticky);
        self.apply_fit();
    }

    pub fn normal_size(&mut self) {
        self.transform.set_fit_mode(false);
        self.apply_zoom(1.0, None);
    }

    fn apply_fit(&mut self) {
        let (Some(viewport), Some(_)) = (self.viewport, self.scene.image_size()) else {
            return;
        };
        match fit_zoom(viewport.size(), self.scene.image_size_vec()) {
            Some(zoom) => {
                self.transform.reset_scroll();
                self.apply_zoom(zoom.clamp(ZOOM_LIMIT_MIN, self.config.max_zoom), None);
            }
            None => log::warn!("viewport {:?} too small to fit the image", viewport.size()),
        }
    }

    fn apply_zoom(&mut self, zoom: f64, anchor: Option<egui::Pos2>) {
        let previous = self.transform.zoom();
        let image_size = self.scene.image_size_vec();
        match self.viewport {
            Some(viewport) => {
                let anchor = anchor.unwrap_or_else(|| viewport.center());
                self.transform
                    .set_zoom_at(viewport, image_size, zoom, anchor);
            }
            None => self.transform.set_zoom(zoom),
        }
        self.refresh_actions();
        if zoom != previous {
            log::debug!("zoom level {previous} -> {zoom}");
            self.zoom_changed.emit(&ZoomChanged { zoom });
        }
    }

    fn refresh_actions(&mut self) {
        self.actions.refresh(
            self.scene.has_image(),
            self.transform.zoom(),
            self.config.min_zoom,
            self.config.max_zoom,
        );
    }

    pub fn start_selection_mode(&mut self) {
        self.panning = false;
        self.selection.arm();
    }

    /// Leaves selection mode without touching the current ROI.
    pub fn cancel_selection(&mut self) {
        self.selection.cancel();
    }

    pub fn clear_roi(&mut self) {
        self.selection.clear();
    }

    pub fn roi(&self) -> ImageRect {
        self.selection.roi()
    }

    pub fn roi_pixels(&self) -> Option<PixelRect> {
        self.selection.roi().to_pixels()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selection.state()
    }

    pub fn actions(&self) -> &ActionSet {
        &self.actions
    }

    /// Runs the command bound to `action`; disabled actions do nothing.
    pub fn trigger(&mut self, action: ZoomAction) {
        if let Some(command) = self.actions.command(action) {
            command(self);
        }
    }

    pub fn toolbar(&self) -> &Toolbar {
        &self.toolbar
    }

    pub fn toolbar_mut(&mut self) -> &mut Toolbar {
        &mut self.toolbar
    }

    pub fn embeds_toolbar(&self) -> bool {
        self.embed_toolbar
    }

    pub fn set_embed_toolbar(&mut self, embed: bool) {
        self.embed_toolbar = embed;
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn transformation_mode(&self) -> TransformationMode {
        self.scene.transformation_mode()
    }

    pub fn set_transformation_mode(&mut self, mode: TransformationMode) {
        self.scene.set_transformation_mode(mode);
    }

    pub fn render_backend(&self) -> RenderBackend {
        self.render_backend
    }

    pub fn set_render_backend(&mut self, backend: RenderBackend) {
        self.render_backend = backend;
    }

    pub fn on_roi_selected(&mut self, callback: impl FnMut(&RoiSelected) + 'static) -> ConnectionId {
        self.roi_selected.connect(callback)
    }

    pub fn disconnect_roi_selected(&mut self, id: ConnectionId) -> bool {
        self.roi_selected.disconnect(id)
    }

    pub fn on_zoom_changed(&mut self, callback: impl FnMut(&ZoomChanged) + 'static) -> ConnectionId {
        self.zoom_changed.connect(callback)
    }

    pub fn disconnect_zoom_changed(&mut self, id: ConnectionId) -> bool {
        self.zoom_changed.disconnect(id)
    }

    pub fn viewport(&self) -> Option<egui::Rect> {
        self.viewport
    }

    /// Resize handling: records the screen rect of the canvas.
    pub fn set_viewport(&mut self, viewport: egui::Rect) {
        if self.viewport == Some(viewport) {
            return;
        }
        self.viewport = Some(viewport);
        if self.transform.fit_mode() {
            self.apply_fit();
        } else {
            self.clamp_scroll();
        }
    }

    pub fn scroll_offset(&self) -> egui::Vec2 {
        self.transform.scroll()
    }

    pub fn scroll_by(&mut self, delta: egui::Vec2) {
        let Some(viewport) = self.viewport else {
            return;
        };
        self.transform
            .scroll_by(delta, viewport.size(), self.scene.image_size_vec());
    }

    fn clamp_scroll(&mut self) {
        if let Some(viewport) = self.viewport {
            self.transform
                .clamp_scroll(viewport.size(), self.scene.image_size_vec());
        }
    }

    pub fn has_scrollbars(&self) -> bool {
        self.viewport.is_some_and(|viewport| {
            self.transform
                .scrollbars(viewport.size(), self.scene.image_size_vec())
                .any()
        })
    }

    /// Image coordinates under `screen_pos`, `None` outside the image.
    pub fn image_pos_at(&self, screen_pos: egui::Pos2) -> Option<egui::Pos2> {
        let viewport = self.viewport?;
        if !self.scene.has_image() || !viewport.contains(screen_pos) {
            return None;
        }
        let image_size = self.scene.image_size_vec();
        let pos = self
            .transform
            .screen_to_image(viewport, image_size, screen_pos);
        let inside = pos.x >= 0.0 && pos.y >= 0.0 && pos.x < image_size.x && pos.y < image_size.y;
        inside.then_some(pos)
    }

    pub fn image_to_screen(&self, image_pos: egui::Pos2) -> Option<egui::Pos2> {
        let viewport = self.viewport?;
        Some(
            self.transform
                .image_to_screen(viewport, self.scene.image_size_vec(), image_pos),
        )
    }

    /// Applies one pointer event; returns whether the widget used it.
    pub fn handle_canvas_event(&mut self, event: CanvasEvent) -> bool {
        if !self.scene.has_image() {
            return false;
        }
        let Some(viewport) = self.viewport else {
            return false;
        };
        let pointer = event.pointer_screen;

        match event.kind {
            CanvasEventKind::Press(button) => {
                if button == CanvasButton::Primary
                    && self.selection.state() == SelectionState::Armed
                    && viewport.contains(pointer)
                {
                    return self.selection.begin(pointer);
                }
                self.panning = viewport.contains(pointer);
                self.panning
            }
            CanvasEventKind::Drag { button, delta } => {
                if button == CanvasButton::Primary && self.selection.band().is_some() {
                    self.selection.update(viewport.clamp(pointer));
                    return true;
                }
                if self.panning {
                    self.scroll_by(-delta);
                    return true;
                }
                false
            }
            CanvasEventKind::Release(button) => {
                if button == CanvasButton::Primary && self.selection.band().is_some() {
                    self.selection.update(viewport.clamp(pointer));
                    self.commit_selection(viewport);
                    return true;
                }
                let was_panning = self.panning;
                self.panning = false;
                was_panning
            }
            CanvasEventKind::Scroll { delta } => {
                if event.modifiers.zoom_modifier() {
                    if !self.config.wheel_zoom || delta.y == 0.0 {
                        return false;
                    }
                    let step = if delta.y > 0.0 {
                        self.config.zoom_step
                    } else {
                        1.0 / self.config.zoom_step
                    };
                    self.scale_at(step, pointer);
                } else {
                    self.scroll_by(-delta);
                }
                true
            }
            CanvasEventKind::Zoom { factor } => {
                if !self.config.wheel_zoom {
                    return false;
                }
                self.scale_at(factor, pointer);
                true
            }
        }
    }

    fn commit_selection(&mut self, viewport: egui::Rect) {
        let Some(band) = self.selection.band() else {
            return;
        };
        let Some([width, height]) = self.scene.image_size() else {
            self.selection.cancel();
            return;
        };
        let image_rect = self
            .transform
            .screen_rect_to_image(viewport, self.scene.image_size_vec(), band);
        let roi = ImageRect::from_egui(image_rect).clamp_to_image(width, height);
        match self.selection.commit(roi) {
            Some(roi) => {
                log::debug!("region of interest selected: {roi:?}");
                self.last_commit = Some(roi);
                self.roi_selected.emit(&RoiSelected { roi });
            }
            None => log::debug!("discarding empty selection"),
        }
    }

    /// Handles a toolbar command id. Returns `false` for ids the widget
    /// does not own.
    pub fn dispatch_command(&mut self, command_id: &str) -> bool {
        if let Some(action) = ZoomAction::from_command_id(command_id) {
            self.trigger(action);
            return true;
        }
        match command_id {
            SELECT_ROI_COMMAND => {
                if self.scene.has_image() {
                    self.start_selection_mode();
                }
                true
            }
            CLEAR_ROI_COMMAND => {
                self.clear_roi();
                true
            }
            _ => false,
        }
    }

    /// Draws the toolbar wherever the caller wants it and returns the
    /// commands the widget did not handle.
    pub fn show_toolbar(&mut self, ui: &mut egui::Ui) -> Vec<String> {
        let clicked = self
            .toolbar
            .show(ui, &self.actions, self.scene.has_image());
        clicked
            .into_iter()
            .filter(|command_id| !self.dispatch_command(command_id))
            .collect()
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> ZoomableImageResponse {
        // Commits made outside a frame were already delivered to observers.
        self.last_commit = None;
        let zoom_before = self.transform.zoom();
        let mut commands = Vec::new();
        if self.embed_toolbar && self.toolbar.is_visible() {
            commands = self.show_toolbar(ui);
            ui.separator();
        }

        let available = ui.available_size();
        let size = egui::vec2(available.x.max(1.0), available.y.max(1.0));
        let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
        self.set_viewport(rect);

        if response.hovered() {
            self.handle_shortcuts(ui);
        }
        self.handle_input(ui, &response);
        self.update_cursor(ui, &response);
        self.paint(ui, rect);

        let zoom_after = self.transform.zoom();
        ZoomableImageResponse {
            hover_image: response
                .hover_pos()
                .and_then(|pointer| self.image_pos_at(pointer)),
            response,
            commands,
            roi_selected: self.last_commit.take(),
            zoom_changed: (zoom_after != zoom_before).then_some(zoom_after),
        }
    }

    fn handle_shortcuts(&mut self, ui: &egui::Ui) {
        if ui.ctx().memory(|memory| memory.focused().is_some()) {
            return;
        }
        let (texts, escape) = ui.input(|input| {
            let texts = input
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Text(text) => Some(text.clone()),
                    _ => None,
                })
                .collect::<Vec<_>>();
            (texts, input.key_pressed(egui::Key::Escape))
        });
        if escape && self.selection.is_active() {
            self.cancel_selection();
        }
        for text in texts {
            if let Some(action) = ZoomAction::from_shortcut(&text) {
                self.trigger(action);
            }
        }
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (modifiers, press_origin, latest_pos, scroll, zoom_delta) = ui.input(|input| {
            (
                CanvasModifiers::from_egui(input),
                input.pointer.press_origin(),
                input.pointer.latest_pos(),
                input.smooth_scroll_delta,
                input.zoom_delta(),
            )
        });

        for button in [
            egui::PointerButton::Primary,
            egui::PointerButton::Secondary,
            egui::PointerButton::Middle,
        ] {
            let Some(canvas_button) = CanvasButton::from_egui(button) else {
                continue;
            };
            if response.drag_started_by(button) {
                if let Some(origin) = press_origin.or(response.interact_pointer_pos()) {
                    self.handle_canvas_event(
                        CanvasEvent::press(canvas_button, origin).with_modifiers(modifiers),
                    );
                }
            }
            if response.dragged_by(button) {
                if let Some(pos) = response.interact_pointer_pos() {
                    self.handle_canvas_event(
                        CanvasEvent::drag(canvas_button, pos, response.drag_delta())
                            .with_modifiers(modifiers),
                    );
                }
            }
            if response.drag_stopped_by(button) {
                if let Some(pos) = response.interact_pointer_pos().or(latest_pos) {
                    self.handle_canvas_event(
                        CanvasEvent::release(canvas_button, pos).with_modifiers(modifiers),
                    );
                }
            }
        }

        let Some(pointer) = response.hover_pos() else {
            return;
        };
        if zoom_delta != 1.0 {
            self.handle_canvas_event(
                CanvasEvent::new(
                    CanvasEventKind::Zoom {
                        factor: f64::from(zoom_delta),
                    },
                    pointer,
                )
                .with_modifiers(modifiers),
            );
        }
        if scroll != egui::Vec2::ZERO {
            // Ctrl/Cmd wheel already arrives as zoom_delta.
            let modifiers = CanvasModifiers {
                ctrl: false,
                command: false,
                ..modifiers
            };
            self.handle_canvas_event(
                CanvasEvent::new(CanvasEventKind::Scroll { delta: scroll }, pointer)
                    .with_modifiers(modifiers),
            );
        }
    }

    fn update_cursor(&self, ui: &egui::Ui, response: &egui::Response) {
        if !response.hovered() || !self.scene.has_image() {
            return;
        }
        let icon = if self.selection.is_active() {
            egui::CursorIcon::Crosshair
        } else if self.panning {
            egui::CursorIcon::Grabbing
        } else if self.has_scrollbars() {
            egui::CursorIcon::Grab
        } else {
            return;
        };
        ui.ctx().set_cursor_icon(icon);
    }

    fn paint(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, self.scene.background());

        let image_size = self.scene.image_size_vec();
        if let Some(texture_id) = self.scene.texture_id(ui.ctx()) {
            let content = self.transform.content_rect(rect, image_size);
            let visible = content.intersect(rect);
            if visible.is_positive() {
                let uv = egui::Rect::from_min_max(
                    egui::pos2(
                        (visible.min.x - content.min.x) / content.width(),
                        (visible.min.y - content.min.y) / content.height(),
                    ),
                    egui::pos2(
                        (visible.max.x - content.min.x) / content.width(),
                        (visible.max.y - content.min.y) / content.height(),
                    ),
                );
                painter.image(texture_id, visible, uv, egui::Color32::WHITE);
            }

            let transform = &self.transform;
            self.scene.paint_items(&painter, |pos| {
                transform.image_to_screen(rect, image_size, pos)
            });

            let roi = self.selection.roi();
            if self.config.show_roi && !roi.is_empty() {
                let screen = transform.image_rect_to_screen(rect, image_size, roi.to_egui());
                painter.rect_stroke(
                    screen,
                    0.0,
                    egui::Stroke::new(1.5, self.config.rubber_band_color32()),
                    egui::StrokeKind::Middle,
                );
            }

            self.paint_scrollbars(&painter, rect, content);
        }

        if let Some(band) = self.selection.band() {
            let color = self.config.rubber_band_color32();
            painter.rect_filled(band, 0.0, color.gamma_multiply(0.15));
            painter.rect_stroke(
                band,
                0.0,
                egui::Stroke::new(1.0, color),
                egui::StrokeKind::Inside,
            );
        }
    }

    fn paint_scrollbars(&self, painter: &egui::Painter, rect: egui::Rect, content: egui::Rect) {
        let bars = self
            .transform
            .scrollbars(rect.size(), self.scene.image_size_vec());
        let color = egui::Color32::from_white_alpha(90);
        let scroll = self.transform.scroll();
        if bars.horizontal {
            let length = rect.width() * rect.width() / content.width();
            let start = rect.min.x + scroll.x / content.width() * rect.width();
            let thumb = egui::Rect::from_min_size(
                egui::pos2(start, rect.max.y - SCROLLBAR_THICKNESS),
                egui::vec2(length.max(SCROLLBAR_THICKNESS), SCROLLBAR_THICKNESS),
            );
            painter.rect_filled(thumb, SCROLLBAR_THICKNESS * 0.5, color);
        }
        if bars.vertical {
            let length = rect.height() * rect.height() / content.height();
            let start = rect.min.y + scroll.y / content.height() * rect.height();
            let thumb = egui::Rect::from_min_size(
                egui::pos2(rect.max.x - SCROLLBAR_THICKNESS, start),
                egui::vec2(SCROLLBAR_THICKNESS, length.max(SCROLLBAR_THICKNESS)),
            );
            painter.rect_filled(thumb, SCROLLBAR_THICKNESS * 0.5, color);
        }
    }

    pub fn status_text(&self) -> String {
        let zoom = format!("{:.1}%", self.transform.zoom() * 100.0);
        let fit = if self.transform.fit_mode() { " (fit)" } else { "" };
        match self.selection.status_text() {
            Some(selection) => format!("{zoom}{fit} | {selection}"),
            None => format!("{zoom}{fit}"),
        }
    }
}
