use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("viewer configuration I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("viewer configuration JSON failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("viewer configuration YAML failure: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid viewer configuration: {0}")]
    Invalid(String),
}
