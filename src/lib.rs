pub mod cli;
pub mod config;
pub mod error;
pub mod ui;

pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
pub use ui::ZoomableImage;

pub fn run_cli() -> Result<()> {
    cli::run_cli()
}
