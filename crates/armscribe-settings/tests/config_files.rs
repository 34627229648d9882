use armscribe_planner::{CommentPolicy, SegmentationMode};
use armscribe_settings::{Config, ConfigError, SettingsError};
use std::fs;

fn valid() -> Config {
    let mut config = Config::default();
    config.connection.address = "robot.local:8080".to_string();
    config.connection.api_key_id = "id".to_string();
    config.connection.api_key = "secret".to_string();
    config.arm.resource_name = "arm-1".to_string();
    config
}

#[test]
fn test_toml_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = valid();
    config.connection.visualizer_address = Some("127.0.0.1:9000".to_string());
    config.parser.comment_policy = CommentPolicy::Skip;
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_json_save_and_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = valid();
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.connection, config.connection);
    assert_eq!(loaded.parser, config.parser);
    assert_eq!(loaded.palette, config.palette);
    assert!((loaded.calibration.oy - config.calibration.oy).abs() < 1e-15);
}

#[test]
fn test_partial_toml_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[connection]
dry_run = true

[text]
scale = 30.0
input_path = "letters.txt"

[parser]
segmentation = "flat_list"
anchor_filtering = false
"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert!(config.connection.dry_run);
    assert_eq!(config.connection.motion_service, "builtin");
    assert_eq!(config.text.scale, 30.0);
    assert_eq!(config.parser.segmentation, SegmentationMode::FlatList);
    assert!(!config.parser.anchor_filtering);
    assert_eq!(config.calibration.z, 57.03686307529803);
}

#[test]
fn test_invalid_file_is_rejected_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[connection]\naddress = \"robot:1\"\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Config(ConfigError::MissingKey(_))));
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "").unwrap();

    let err = Config::read_from_file(&path).unwrap_err();
    assert!(matches!(
        err,
        SettingsError::Config(ConfigError::UnsupportedFormat(_))
    ));
    assert!(valid().save_to_file(&path).is_err());
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::read_from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, SettingsError::LoadError { .. }));
}

#[test]
fn test_malformed_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[connection\n").unwrap();
    assert!(matches!(
        Config::read_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));
}

#[test]
fn test_explicit_path_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("explicit.toml");
    assert_eq!(Config::locate(Some(&path)), Some(path.clone()));
}
