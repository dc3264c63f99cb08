use std::path::PathBuf;

use clap::Parser;

use crate::config::{ViewerConfig, load_config};
use crate::error::Result;
use crate::ui::{RenderBackend, TransformationMode, ViewerOptions};

#[derive(Debug, Parser)]
#[command(
    name = "zoomview",
    version,
    about = "Zoomable image viewer with rubber-band region selection"
)]
struct Cli {
    /// Image to open at startup.
    input: Option<PathBuf>,
    /// Viewer configuration file (JSON or YAML).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Keep the zoom toolbar out of the canvas and show it in the menu row.
    #[arg(long)]
    no_toolbar: bool,
    /// Nearest-neighbour sampling instead of smooth filtering.
    #[arg(long)]
    fast: bool,
    /// Request a window without hardware acceleration.
    #[arg(long)]
    software: bool,
    /// Start in fit-to-window mode.
    #[arg(long)]
    fit: bool,
}

impl Cli {
    fn into_options(self) -> Result<ViewerOptions> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => ViewerConfig::default(),
        };
        if self.no_toolbar {
            config.embed_toolbar = false;
        }
        if self.fast {
            config.transformation_mode = TransformationMode::Fast;
        }
        if self.software {
            config.render_backend = RenderBackend::Software;
        }
        Ok(ViewerOptions {
            input: self.input,
            config,
            fit: self.fit,
        })
    }
}

pub fn run_cli() -> Result<()> {
    let options = Cli::parse().into_options()?;
    log::debug!("starting viewer with {options:?}");
    crate::ui::run(options)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::tempdir;

    use super::Cli;
    use crate::config::FitPolicy;
    use crate::ui::{RenderBackend, TransformationMode};

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from(["zoomview", "photo.png", "--fast", "--software", "--fit"])
            .expect("parse");
        let options = cli.into_options().expect("options");
        assert_eq!(
            options.input.as_deref(),
            Some(std::path::Path::new("photo.png"))
        );
        assert!(options.fit);
        assert!(options.config.embed_toolbar);
        assert_eq!(options.config.transformation_mode, TransformationMode::Fast);
        assert_eq!(options.config.render_backend, RenderBackend::Software);
    }

    #[test]
    fn config_file_is_loaded_before_flags() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("viewer.json");
        fs::write(&path, r#"{"fit_policy": "one_shot", "zoom_step": 2.0}"#).expect("write");
        let cli = Cli::try_parse_from([
            "zoomview".to_string(),
            "--config".to_string(),
            path.display().to_string(),
            "--no-toolbar".to_string(),
        ])
        .expect("parse");
        let options = cli.into_options().expect("options");
        assert_eq!(options.config.fit_policy, FitPolicy::OneShot);
        assert!((options.config.zoom_step - 2.0).abs() < f64::EPSILON);
        assert!(!options.config.embed_toolbar);
        assert!(options.input.is_none());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["zoomview", "--config", "/nonexistent/viewer.json"])
            .expect("parse");
        assert!(cli.into_options().is_err());
    }
}
