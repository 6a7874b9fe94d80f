use std::collections::HashMap;
use std::fs;
use std::path::Path;

use fieldhost_config::{
    CONFIG_JSON_ENV, CONFIG_PATH_ENV, HostingConfig, HostingConfigSource, load_settings_with,
};
use fieldhost_model::MemoryPolicy;
use tempfile::TempDir;

fn env_of(pairs: &[(&str, String)]) -> impl Fn(&str) -> Option<String> + use<> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect();
    move |key| vars.get(key).cloned()
}

fn write(dir: &Path, relative: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn nothing_configured_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let (config, source) = HostingConfig::resolve(env_of(&[]), dir.path()).unwrap();
    assert_eq!(config, HostingConfig::default());
    assert_eq!(source, HostingConfigSource::Default);
}

#[test]
fn env_path_wins_over_inline_and_default_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "fieldhost.toml", "margin_x = 1.0\n");
    let explicit = write(dir.path(), "custom/panel.json", r#"{"margin_x": 2.0}"#);

    let env = env_of(&[
        (CONFIG_PATH_ENV, explicit.display().to_string()),
        (CONFIG_JSON_ENV, r#"{"margin_x": 3.0}"#.to_string()),
    ]);
    let (config, source) = HostingConfig::resolve(env, dir.path()).unwrap();

    assert_eq!(config.margin_x, 2.0);
    assert_eq!(source, HostingConfigSource::EnvPath(explicit));
}

#[test]
fn inline_json_wins_over_default_file() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "fieldhost.toml", "margin_x = 1.0\n");

    let inline = r#"{"margin_x": 3.0, "policy": "HOST_ALWAYS"}"#;
    let env = env_of(&[(CONFIG_JSON_ENV, inline.to_string())]);
    let (config, source) = HostingConfig::resolve(env, dir.path()).unwrap();

    assert_eq!(config.margin_x, 3.0);
    assert_eq!(config.policy, MemoryPolicy::HOST_ALWAYS);
    assert_eq!(source, HostingConfigSource::EnvInline);
}

#[test]
fn blank_env_values_are_ignored() {
    let dir = TempDir::new().unwrap();
    let env = env_of(&[
        (CONFIG_PATH_ENV, "   ".to_string()),
        (CONFIG_JSON_ENV, String::new()),
    ]);
    let (_, source) = HostingConfig::resolve(env, dir.path()).unwrap();
    assert_eq!(source, HostingConfigSource::Default);
}

#[test]
fn config_directory_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    let path = write(
        dir.path(),
        "config/fieldhost.toml",
        "min_content_area = 400.0\ncapture_snapshot_on_deactivate = false\n",
    );

    let (config, source) = HostingConfig::resolve(env_of(&[]), dir.path()).unwrap();
    assert_eq!(config.min_content_area, 400.0);
    assert!(!config.capture_snapshot_on_deactivate);
    assert_eq!(source, HostingConfigSource::File(path));
}

#[test]
fn missing_env_path_is_an_error_with_context() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let env = env_of(&[(CONFIG_PATH_ENV, missing.display().to_string())]);

    let err = HostingConfig::resolve(env, dir.path()).unwrap_err();
    assert!(err.to_string().contains("failed to read hosting config"));
}

#[test]
fn invalid_values_are_caught_when_converting() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "fieldhost.json", r#"{"max_visible_ratio": 1.5}"#);

    let (config, _) = HostingConfig::resolve(env_of(&[]), dir.path()).unwrap();
    let err = config.to_settings().unwrap_err();
    assert!(err.to_string().contains("max_visible_ratio"));
}

#[test]
fn loaded_settings_drive_the_engine() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "fieldhost.toml",
        "policy = \"DISPOSE_ON_REMOVE\"\nmargin_x = 0.0\nmargin_y = 0.0\n",
    );

    let (config, _) = HostingConfig::resolve(env_of(&[]), dir.path()).unwrap();
    let settings = config.to_settings().unwrap();
    assert!(settings.policy.disposes_on_remove());
    assert_eq!((settings.margin_x, settings.margin_y), (0.0, 0.0));
    assert_eq!(settings.max_visible_ratio, 0.9);
}

#[test]
fn load_settings_validates_what_it_resolves() {
    let dir = TempDir::new().unwrap();
    let env = env_of(&[(CONFIG_JSON_ENV, r#"{"margin_y": 12.5}"#.to_string())]);

    let (settings, source) = load_settings_with(env, dir.path()).unwrap();
    assert_eq!(settings.margin_y, 12.5);
    assert_eq!(source, HostingConfigSource::EnvInline);

    let env = env_of(&[(CONFIG_JSON_ENV, r#"{"margin_x": -4.0}"#.to_string())]);
    let err = load_settings_with(env, dir.path()).unwrap_err();
    assert!(err.to_string().contains("margin_x"));
}
