//! Config file round-trips through JSON and TOML on disk

use stagekit_core::{Fov, LogLevel};
use stagekit_settings::{MarginSettings, SettingsError, ViewerConfig};
use tempfile::TempDir;

fn customised() -> ViewerConfig {
    let mut config = ViewerConfig::default();
    config.canvas.width = 640.0;
    config.canvas.margins = Some(MarginSettings {
        top: 20.0,
        right: 10.0,
        bottom: 20.0,
        left: 40.0,
    });
    config.interaction.default_fov = Fov::new(20_000.0, 10_000.0);
    config.buffers.image_capacity = 25;
    config.logging.level = LogLevel::DEBUG;
    config
}

#[test]
fn test_toml_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.toml");

    let config = customised();
    config.save_to_file(&path).unwrap();
    let loaded = ViewerConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[canvas.margins]"));
    assert!(text.contains("level = 10"));
}

#[test]
fn test_json_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("viewer.json");

    let config = customised();
    config.save_to_file(&path).unwrap();
    assert_eq!(ViewerConfig::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("viewer.json");
    std::fs::write(&path, r#"{"canvas": {"x_domain": [1.0, 1.0]}}"#).unwrap();

    let err = ViewerConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(_)));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ViewerConfig::load_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError(_)));
}
