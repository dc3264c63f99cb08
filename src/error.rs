use thiserror::Error;

use crate::config::ConfigError;

pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("image decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("window error: {0}")]
    Window(#[from] eframe::Error),
}
