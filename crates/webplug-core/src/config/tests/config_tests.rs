#![cfg(test)]

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use crate::config::{ConfigError, ConfigFormat, HostConfig};
use crate::plugin_system::PluginEntry;

const TOML_HOST: &str = r#"
[preferences]
LogLevel = "debug"
Fullscreen = true

[[plugins]]
service = "Camera"
class = "demo.FakeCamera"
priority = 1.0

[[plugins]]
service = "Logger"
class = "webplug.core.Logging"
onload = true
priority = -2.5

[[plugins]]
service = "Media"
plugin_class = "demo.Media"
url_filters = ["https://media.example.com/", "file:///"]
"#;

#[test]
fn test_format_from_path() {
    assert_eq!(ConfigFormat::from_path(Path::new("host.json")), Some(ConfigFormat::Json));
    assert_eq!(ConfigFormat::from_path(Path::new("HOST.JSON")), Some(ConfigFormat::Json));
    #[cfg(feature = "yaml-config")]
    {
        assert_eq!(ConfigFormat::from_path(Path::new("host.yml")), Some(ConfigFormat::Yaml));
        assert_eq!(ConfigFormat::from_path(Path::new("host.yaml")), Some(ConfigFormat::Yaml));
    }
    #[cfg(feature = "toml-config")]
    assert_eq!(ConfigFormat::from_path(Path::new("host.toml")), Some(ConfigFormat::Toml));
    assert_eq!(ConfigFormat::from_path(Path::new("host.xml")), None);
    assert_eq!(ConfigFormat::from_path(Path::new("host")), None);
}

#[cfg(feature = "toml-config")]
#[test]
fn test_deserialize_toml_host() {
    let config = HostConfig::deserialize(TOML_HOST, ConfigFormat::Toml).expect("valid TOML host");

    assert_eq!(config.preferences.get("loglevel"), Some("debug"));
    assert!(config.preferences.get_bool("fullscreen", false));
    assert_eq!(config.plugins.len(), 3);

    let camera = &config.plugins[0];
    assert_eq!(camera.service, "Camera");
    assert_eq!(camera.class, "demo.FakeCamera");
    assert!(!camera.onload);
    assert_eq!(camera.priority, 1.0);
    assert_eq!(camera.url_filters, None);

    let logger = &config.plugins[1];
    assert!(logger.onload);
    assert_eq!(logger.priority, -2.5);

    // `plugin_class` is accepted as an alias for `class`
    let media = &config.plugins[2];
    assert_eq!(media.class, "demo.Media");
    assert_eq!(
        media.url_filters.as_deref(),
        Some(&["https://media.example.com/".to_string(), "file:///".to_string()][..])
    );
}

#[test]
fn test_deserialize_json_defaults() {
    let json = r#"{
        "plugins": [
            { "service": "Bare" },
            { "service": "Scoped", "class": "x", "url_filters": [] }
        ]
    }"#;
    let config = HostConfig::deserialize(json, ConfigFormat::Json).expect("valid JSON host");

    assert!(config.preferences.is_empty());
    let bare = &config.plugins[0];
    assert_eq!(bare.class, "");
    assert!(!bare.onload);
    assert_eq!(bare.priority, 0.0);
    assert_eq!(bare.url_filters, None);

    // An explicit empty list stays distinct from "no filters"
    assert_eq!(config.plugins[1].url_filters, Some(vec![]));
}

#[test]
fn test_entry_from_config_keeps_every_field() {
    let json = r#"{
        "plugins": [ {
            "service": "Media",
            "class": "demo.Media",
            "onload": true,
            "priority": 4.5,
            "url_filters": ["https://a/"]
        } ]
    }"#;
    let config = HostConfig::deserialize(json, ConfigFormat::Json).expect("valid JSON host");
    let entry = PluginEntry::from_config(&config.plugins[0]);

    assert_eq!(entry.service(), "Media");
    assert_eq!(entry.plugin_class(), "demo.Media");
    assert!(entry.onload());
    assert_eq!(entry.priority(), 4.5);
    assert_eq!(entry.url_filters(), Some(&["https://a/".to_string()][..]));
    assert!(!entry.is_materialized());
}

#[test]
fn test_deserialize_invalid_json_reports_format() {
    let err = HostConfig::deserialize("{ not json", ConfigFormat::Json).expect_err("invalid JSON");
    match err {
        ConfigError::Deserialization { format, .. } => assert_eq!(format, "json"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[cfg(feature = "yaml-config")]
#[test]
fn test_load_yaml_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("host.yaml");
    fs::write(
        &path,
        concat!(
            "preferences:\n",
            "  LogLevel: warn\n",
            "plugins:\n",
            "  - service: Device\n",
            "    class: webplug.core.Device\n",
            "    priority: 2\n",
        ),
    )
    .expect("write yaml");

    let config = HostConfig::load(&path).expect("load yaml");
    assert_eq!(config.preferences.get_string("LogLevel", "info"), "warn");
    assert_eq!(config.plugins[0].service, "Device");
    assert_eq!(config.plugins[0].priority, 2.0);
}

#[test]
fn test_load_rejects_unknown_extension() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.xml");
    fs::write(&path, "<widget/>").expect("write xml");

    match HostConfig::load(&path) {
        Err(ConfigError::UnsupportedFormat { path: reported }) => assert_eq!(reported, path),
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.json");
    assert!(matches!(HostConfig::load(&path), Err(ConfigError::Io { .. })));
}

#[test]
fn test_json_roundtrip_preserves_declarations() {
    let json = r#"{
        "preferences": { "LogLevel": "info" },
        "plugins": [ { "service": "Camera", "class": "demo.FakeCamera", "priority": 1.0 } ]
    }"#;
    let config = HostConfig::deserialize(json, ConfigFormat::Json).expect("valid JSON host");
    let rendered = config.serialize(ConfigFormat::Json).expect("serialize");
    let reparsed = HostConfig::deserialize(&rendered, ConfigFormat::Json).expect("reparse");
    assert_eq!(reparsed, config);
    assert!(!rendered.contains("url_filters"));
}
