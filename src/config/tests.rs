use std::fs;

use tempfile::tempdir;

use super::{ConfigError, FitPolicy, ImagePolicy, ViewerConfig, load_config, save_config};
use crate::ui::{RenderBackend, TransformationMode};

#[test]
fn defaults_are_valid() {
    let config = ViewerConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.fit_policy, FitPolicy::Sticky);
    assert_eq!(config.image_policy, ImagePolicy::Preserve);
    assert!(config.embed_toolbar);
}

#[test]
fn json_and_yaml_round_trip() {
    let dir = tempdir().expect("tempdir");
    let config = ViewerConfig {
        zoom_step: 1.5,
        fit_policy: FitPolicy::OneShot,
        transformation_mode: TransformationMode::Fast,
        render_backend: RenderBackend::Software,
        ..ViewerConfig::default()
    };
    for name in ["viewer.json", "viewer.yaml"] {
        let path = dir.path().join(name);
        save_config(&path, &config).expect("save config");
        let restored = load_config(&path).expect("load config");
        assert_eq!(restored, config);
    }
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("viewer.yml");
    fs::write(&path, "fit_policy: one_shot\nimage_policy: real_size\n").expect("write");
    let config = load_config(&path).expect("load config");
    assert_eq!(config.fit_policy, FitPolicy::OneShot);
    assert_eq!(config.image_policy, ImagePolicy::RealSize);
    assert!((config.zoom_step - 1.2).abs() < f64::EPSILON);
}

#[test]
fn invalid_bounds_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("viewer.json");
    fs::write(&path, r#"{"min_zoom": 2.0, "max_zoom": 4.0}"#).expect("write");
    assert!(matches!(load_config(&path), Err(ConfigError::Invalid(_))));

    let config = ViewerConfig {
        zoom_step: 1.0,
        ..ViewerConfig::default()
    };
    assert!(config.validate().is_err());

    let config = ViewerConfig {
        max_zoom: f64::INFINITY,
        ..ViewerConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn bounds_outside_zoom_limits_are_rejected() {
    let config = ViewerConfig {
        max_zoom: 1.0e39,
        ..ViewerConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = ViewerConfig {
        min_zoom: 1.0e-50,
        ..ViewerConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = ViewerConfig {
        min_zoom: 1.0e-12,
        max_zoom: 1.0e12,
        ..ViewerConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn clamp_zoom_respects_bounds() {
    let config = ViewerConfig {
        min_zoom: 0.25,
        max_zoom: 8.0,
        ..ViewerConfig::default()
    };
    assert_eq!(config.clamp_zoom(0.1), 0.25);
    assert_eq!(config.clamp_zoom(3.0), 3.0);
    assert_eq!(config.clamp_zoom(100.0), 8.0);
}
