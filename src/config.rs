mod error;
mod io;

#[cfg(test)]
mod tests;

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::ui::interaction::transform::{
    DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, ZOOM_LIMIT_MAX, ZOOM_LIMIT_MIN,
};
use crate::ui::{RenderBackend, TransformationMode};

pub use error::{ConfigError, Result};
pub use io::{load_config, save_config};

/// Whether `fit_to_window` keeps re-fitting on resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    #[default]
    Sticky,
    OneShot,
}

/// Zoom applied when a new image replaces the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImagePolicy {
    #[default]
    Preserve,
    Fit,
    RealSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub zoom_step: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub fit_policy: FitPolicy,
    pub image_policy: ImagePolicy,
    pub transformation_mode: TransformationMode,
    pub render_backend: RenderBackend,
    pub embed_toolbar: bool,
    pub wheel_zoom: bool,
    pub rubber_band_color: [u8; 3],
    pub show_roi: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: 1.2,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            fit_policy: FitPolicy::default(),
            image_policy: ImagePolicy::default(),
            transformation_mode: TransformationMode::default(),
            render_backend: RenderBackend::default(),
            embed_toolbar: true,
            wheel_zoom: true,
            rubber_band_color: [255, 212, 26],
            show_roi: true,
        }
    }
}

impl ViewerConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be a finite value above 1, got {}",
                self.zoom_step
            )));
        }
        if !self.min_zoom.is_finite() || !self.max_zoom.is_finite() {
            return Err(ConfigError::Invalid(
                "zoom bounds must be finite".to_string(),
            ));
        }
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must satisfy 0 < min_zoom <= 1 <= max_zoom, got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_zoom < ZOOM_LIMIT_MIN || self.max_zoom > ZOOM_LIMIT_MAX {
            return Err(ConfigError::Invalid(format!(
                "zoom bounds must lie within [{ZOOM_LIMIT_MIN:e}, {ZOOM_LIMIT_MAX:e}], got [{}, {}]",
                self.min_zoom, self.max_zoom
            )));
        }
        Ok(())
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    pub fn rubber_band_color32(&self) -> egui::Color32 {
        let [r, g, b] = self.rubber_band_color;
        egui::Color32::from_rgb(r, g, b)
    }
}
