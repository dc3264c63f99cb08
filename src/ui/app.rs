use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use eframe::egui;
use rfd::FileDialog;

use crate::config::ViewerConfig;
use crate::error::Result;

use super::interaction::roi::ImageRect;
use super::scene::SceneItem;
use super::widget::ZoomableImage;

const APP_TITLE: &str = "zoomview";
const DEFAULT_WINDOW_SIZE: [f32; 2] = [980.0, 760.0];
const MIN_WINDOW_SIZE: [f32; 2] = [320.0, 240.0];
const PIN_ROI_COMMAND: &str = "app.pin_roi";
const MAX_EVENT_LINES: usize = 200;
const IMAGE_EXTENSIONS: [&str; 9] = ["png", "jpg", "jpeg", "tif", "tiff", "bmp", "gif", "webp", "tga"];

/// Startup options for the demo window.
#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    pub input: Option<PathBuf>,
    pub config: ViewerConfig,
    pub fit: bool,
}

struct ViewerApp {
    viewer: ZoomableImage,
    path: Option<PathBuf>,
    events: Rc<RefCell<Vec<String>>>,
    pinned: usize,
    hover: Option<egui::Pos2>,
    error: Option<String>,
    show_events: bool,
}

impl ViewerApp {
    fn new(options: ViewerOptions, image: Option<image::DynamicImage>) -> Self {
        let mut viewer = ZoomableImage::with_config(options.config);
        viewer.toolbar_mut().push_separator();
        viewer.toolbar_mut().push_custom(PIN_ROI_COMMAND, "Pin");

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        viewer.on_zoom_changed(move |event| {
            push_event(&sink, format!("zoom {:.1}%", event.zoom * 100.0));
        });
        let sink = Rc::clone(&events);
        viewer.on_roi_selected(move |event| {
            push_event(&sink, format!("roi {}", describe_roi(event.roi)));
        });

        if let Some(image) = image {
            viewer.set_image(image);
        }
        if options.fit {
            viewer.fit_to_window();
        }

        Self {
            viewer,
            path: options.input,
            events,
            pinned: 0,
            hover: None,
            error: None,
            show_events: false,
        }
    }

    fn open_dialog(&mut self) {
        let Some(path) = FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        self.open_path(&path);
    }

    fn open_path(&mut self, path: &Path) {
        match image::open(path) {
            Ok(image) => {
                self.viewer.set_image(image);
                self.viewer.scene_mut().clear_items();
                self.pinned = 0;
                self.path = Some(path.to_path_buf());
                self.error = None;
            }
            Err(error) => {
                log::error!("failed to open {}: {error}", path.display());
                self.error = Some(format!("{}: {error}", path.display()));
            }
        }
    }

    fn pin_roi(&mut self) {
        let roi = self.viewer.roi();
        if roi.is_empty() {
            return;
        }
        self.pinned += 1;
        let color = egui::Color32::from_rgb(100, 150, 255);
        let scene = self.viewer.scene_mut();
        scene.add_item(SceneItem::Rect {
            rect: roi,
            stroke: egui::Stroke::new(1.0, color),
        });
        scene.add_item(SceneItem::Label {
            at: egui::pos2(roi.x, roi.y),
            text: format!("#{}", self.pinned),
            color,
        });
        self.viewer.clear_roi();
    }

    fn handle_commands(&mut self, commands: Vec<String>) {
        for command_id in commands {
            match command_id.as_str() {
                PIN_ROI_COMMAND => self.pin_roi(),
                other => log::debug!("unhandled toolbar command {other}"),
            }
        }
    }

    fn status_line(&self) -> String {
        let mut parts = Vec::new();
        if let Some(path) = &self.path {
            parts.push(path.display().to_string());
        }
        if let Some([width, height]) = self.viewer.scene().image_size() {
            parts.push(format!("{width}x{height}"));
        }
        parts.push(self.viewer.status_text());
        if let Some(hover) = self.hover {
            parts.push(format!("x={:.0} y={:.0}", hover.x.floor(), hover.y.floor()));
        }
        if let Some(pixels) = self.viewer.roi_pixels() {
            parts.push(format!(
                "crop {}x{}+{}+{}",
                pixels.width, pixels.height, pixels.x, pixels.y
            ));
        }
        if let Some(error) = &self.error {
            parts.push(error.clone());
        }
        parts.join(" | ")
    }
}

fn push_event(events: &Rc<RefCell<Vec<String>>>, line: String) {
    let mut events = events.borrow_mut();
    events.push(line);
    let overflow = events.len().saturating_sub(MAX_EVENT_LINES);
    events.drain(..overflow);
}

fn describe_roi(roi: ImageRect) -> String {
    format!(
        "{:.1},{:.1} {:.1}x{:.1}",
        roi.x, roi.y, roi.width, roi.height
    )
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("zoomview-menu").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open…").clicked() {
                    self.open_dialog();
                }
                if !self.viewer.embeds_toolbar() {
                    ui.separator();
                    let commands = self.viewer.show_toolbar(ui);
                    self.handle_commands(commands);
                }
                ui.separator();
                ui.toggle_value(&mut self.show_events, "Events");
            });
        });

        egui::TopBottomPanel::bottom("zoomview-status").show(ctx, |ui| {
            ui.label(self.status_line());
        });

        if self.show_events {
            egui::SidePanel::right("zoomview-events")
                .resizable(true)
                .default_width(240.0)
                .show(ctx, |ui| {
                    ui.heading("Events");
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for line in self.events.borrow().iter() {
                                ui.monospace(line);
                            }
                        });
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.viewer.show(ui);
            self.hover = response.hover_image;
            if let Some(roi) = response.roi_selected {
                log::info!("selected region {}", describe_roi(roi));
            }
            self.handle_commands(response.commands);
        });
    }
}

/// Opens the demo window, decoding `options.input` first when given.
pub fn run(options: ViewerOptions) -> Result<()> {
    let image = match &options.input {
        Some(path) => Some(image::open(path)?),
        None => None,
    };
    let title = options
        .input
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|name| format!("{APP_TITLE} - {}", name.to_string_lossy()))
        .unwrap_or_else(|| APP_TITLE.to_string());
    let native_options = options.config.render_backend.native_options(
        egui::ViewportBuilder::default()
            .with_title(title)
            .with_inner_size(DEFAULT_WINDOW_SIZE)
            .with_min_inner_size(MIN_WINDOW_SIZE)
            .with_resizable(true),
    );

    eframe::run_native(
        APP_TITLE,
        native_options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(options, image)))),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{MAX_EVENT_LINES, ViewerApp, ViewerOptions, describe_roi, push_event};
    use crate::ui::interaction::roi::ImageRect;

    #[test]
    fn event_log_is_bounded() {
        let events = Rc::new(RefCell::new(Vec::new()));
        for index in 0..MAX_EVENT_LINES + 25 {
            push_event(&events, format!("event {index}"));
        }
        let events = events.borrow();
        assert_eq!(events.len(), MAX_EVENT_LINES);
        assert_eq!(events[0], "event 25");
    }

    #[test]
    fn pinning_moves_roi_into_scene() {
        let image = image::DynamicImage::new_rgba8(64, 48);
        let mut app = ViewerApp::new(ViewerOptions::default(), Some(image));
        app.pin_roi();
        assert!(app.viewer.scene().items().is_empty());

        app.viewer.set_viewport(eframe::egui::Rect::from_min_size(
            eframe::egui::Pos2::ZERO,
            eframe::egui::vec2(64.0, 48.0),
        ));
        app.viewer.start_selection_mode();
        for event in [
            crate::ui::CanvasEvent::press(
                crate::ui::CanvasButton::Primary,
                eframe::egui::pos2(4.0, 4.0),
            ),
            crate::ui::CanvasEvent::release(
                crate::ui::CanvasButton::Primary,
                eframe::egui::pos2(20.0, 12.0),
            ),
        ] {
            app.viewer.handle_canvas_event(event);
        }
        assert_eq!(app.events.borrow().last().map(String::as_str), Some("roi 4.0,4.0 16.0x8.0"));
        app.pin_roi();
        assert_eq!(app.viewer.scene().items().len(), 2);
        assert!(app.viewer.roi().is_empty());
        assert!(app.status_line().contains("64x48"));
    }

    #[test]
    fn roi_description_is_compact() {
        assert_eq!(describe_roi(ImageRect::new(1.0, 2.5, 3.0, 4.0)), "1.0,2.5 3.0x4.0");
    }
}
