//! Tests for configuration layering

use temp_dir::TempDir;
use tripweave::Config;

#[test]
fn test_config_loads_from_default_toml() {
    let config = Config::load(None).expect("Failed to load config");

    assert_eq!(config.gemini.text_model, "gemini-2.5-flash");
    assert_eq!(config.gemini.planner_model, "gemini-2.5-pro");
    assert_eq!(config.gemini.image_model, "gemini-2.5-flash-image");
    assert!(config.gemini.timeout_secs > 0);
    assert!(!config.observability.log_level.is_empty());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("missing.toml");

    let config = Config::load(Some(path.display().to_string())).expect("Failed to load config");

    assert_eq!(config.gemini.timeout_secs, 120);
    assert!(config.gemini.endpoint.contains("generativelanguage.googleapis.com"));
    assert_eq!(config.observability.log_level, "info");
    assert_eq!(config.output.dir, std::path::PathBuf::from("out"));
}

#[test]
fn test_file_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("tripweave.toml");
    std::fs::write(
        &path,
        r#"
[gemini]
api_key = "file-key"
text_model = "gemini-custom"
timeout_secs = 15

[output]
dir = "maps"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.display().to_string())).expect("Failed to load config");

    assert_eq!(config.gemini.text_model, "gemini-custom");
    assert_eq!(config.gemini.planner_model, "gemini-2.5-pro");
    assert_eq!(config.gemini.timeout_secs, 15);
    assert_eq!(config.output.dir, std::path::PathBuf::from("maps"));
    assert!(config.validate().is_ok());
}

#[test]
fn test_zero_timeout_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("tripweave.toml");
    std::fs::write(
        &path,
        "[gemini]\napi_key = \"file-key\"\ntimeout_secs = 0\n",
    )
    .unwrap();

    let config = Config::load(Some(path.display().to_string())).expect("Failed to load config");

    assert!(config.validate().is_err());
}
