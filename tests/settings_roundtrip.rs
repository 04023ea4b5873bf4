//! Settings persistence: save, reload, defaults for missing fields, and
//! version migration. These tests share the global settings state, so
//! they run serialized.

use serial_test::serial;
use std::fs;

use gazeflip::settings::{self, CURRENT_VERSION, Settings};

fn custom_settings() -> Settings {
    Settings {
        theme: "Catppuccin Mocha".to_string(),
        calibration_bias_degrees: -2.5,
        sensitivity_gain: 45.0,
        viewport_width: 1600.0,
        listen_addr: "0.0.0.0:4242".to_string(),
        haptic_bell: false,
        ..Settings::default()
    }
}

#[test]
#[serial]
fn saved_file_carries_header_and_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    settings::replace_in_memory(Settings::default());
    settings::save_settings_to_path(&path);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# gazeflip configuration"));
    assert!(content.contains("calibration_bias_degrees: -5.0"));
    assert!(content.contains("sensitivity_gain: 30.0"));
    assert!(content.contains("commit_threshold: 2000"));
    assert!(content.contains("listen_addr:"));
    assert!(content.contains("127.0.0.1:4242"));
}

#[test]
#[serial]
fn settings_roundtrip_through_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");

    settings::replace_in_memory(custom_settings());
    settings::save_settings_to_path(&path);

    // Wipe the in-memory state, then reload from disk.
    settings::replace_in_memory(Settings::default());
    settings::load_settings_from_path(&path);

    assert_eq!(settings::snapshot(), custom_settings());
    settings::replace_in_memory(Settings::default());
}

#[test]
#[serial]
fn missing_fields_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "theme: \"Catppuccin Mocha\"\n").unwrap();

    settings::replace_in_memory(Settings::default());
    settings::load_settings_from_path(&path);

    let loaded = settings::snapshot();
    assert_eq!(loaded.theme, "Catppuccin Mocha");
    assert_eq!(loaded.calibration_bias_degrees, -5.0);
    assert_eq!(loaded.sensitivity_gain, 30.0);
    assert_eq!(loaded.commit_threshold, 2000);
    assert_eq!(loaded.version, CURRENT_VERSION);
    settings::replace_in_memory(Settings::default());
}

#[test]
#[serial]
fn outdated_version_is_migrated_and_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "version: 0\nsensitivity_gain: 45.0\n").unwrap();

    settings::replace_in_memory(Settings::default());
    settings::load_settings_from_path(&path);

    let loaded = settings::snapshot();
    assert_eq!(loaded.version, CURRENT_VERSION);
    assert_eq!(loaded.sensitivity_gain, 45.0);

    // Migration persists the bumped version back to the file.
    let rewritten = fs::read_to_string(&path).unwrap();
    assert!(rewritten.contains(&format!("version: {CURRENT_VERSION}")));
    assert!(rewritten.contains("sensitivity_gain: 45.0"));
    settings::replace_in_memory(Settings::default());
}

#[test]
#[serial]
fn unparseable_file_leaves_settings_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, ": not yaml at all {").unwrap();

    settings::replace_in_memory(custom_settings());
    settings::load_settings_from_path(&path);

    assert_eq!(settings::snapshot(), custom_settings());
    settings::replace_in_memory(Settings::default());
}
