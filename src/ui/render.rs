use eframe::egui;
use serde::{Deserialize, Serialize};

/// Which rendering path the embedding window should request.
///
/// The widget draws identically on both; the choice only affects how the
/// native window is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderBackend {
    Software,
    #[default]
    Accelerated,
}

impl RenderBackend {
    pub fn hardware_acceleration(self) -> eframe::HardwareAcceleration {
        match self {
            Self::Software => eframe::HardwareAcceleration::Off,
            Self::Accelerated => eframe::HardwareAcceleration::Preferred,
        }
    }

    pub fn apply_to(self, options: &mut eframe::NativeOptions) {
        options.hardware_acceleration = self.hardware_acceleration();
        if self == Self::Software {
            options.multisampling = 0;
        }
    }

    pub fn native_options(self, viewport: egui::ViewportBuilder) -> eframe::NativeOptions {
        let mut options = eframe::NativeOptions {
            viewport,
            ..Default::default()
        };
        self.apply_to(&mut options);
        options
    }
}

#[cfg(test)]
mod tests {
    use super::RenderBackend;

    #[test]
    fn software_backend_disables_acceleration() {
        let options = RenderBackend::Software.native_options(Default::default());
        assert_eq!(
            options.hardware_acceleration,
            eframe::HardwareAcceleration::Off
        );
        let options = RenderBackend::Accelerated.native_options(Default::default());
        assert_eq!(
            options.hardware_acceleration,
            eframe::HardwareAcceleration::Preferred
        );
    }
}
