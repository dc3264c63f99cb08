use std::fs;
use std::path::Path;

use super::{Result, ViewerConfig};

fn is_yaml(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(extension.as_str(), "yaml" | "yml")
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ViewerConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let config = if is_yaml(path) {
        serde_yaml::from_str::<ViewerConfig>(&raw)?
    } else {
        serde_json::from_str::<ViewerConfig>(&raw)?
    };
    config.validate()?;
    log::debug!("loaded viewer configuration from {}", path.display());
    Ok(config)
}

pub fn save_config(path: impl AsRef<Path>, config: &ViewerConfig) -> Result<()> {
    let path = path.as_ref();
    config.validate()?;
    let serialized = if is_yaml(path) {
        serde_yaml::to_string(config)?
    } else {
        serde_json::to_string_pretty(config)?
    };
    fs::write(path, serialized)?;
    Ok(())
}
