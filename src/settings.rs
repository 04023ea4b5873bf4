use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "gazeflip";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_theme")]
    pub theme: String,

    /// Degrees added to every yaw reading to offset sensor mounting.
    #[serde(default = "default_bias")]
    pub calibration_bias_degrees: f64,

    /// Pixels of pointer travel per degree of deviation.
    #[serde(default = "default_gain")]
    pub sensitivity_gain: f64,

    /// Accumulator magnitude required to commit a page turn.
    #[serde(default = "default_threshold")]
    pub commit_threshold: i64,

    /// Logical pointer surface width in device-independent pixels.
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    /// UDP address opentrack-style datagrams are expected on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Ring the terminal bell on rejection pulses too, not just commits.
    #[serde(default = "default_true")]
    pub haptic_bell: bool,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_theme() -> String {
    "Oceanic Next".to_string()
}

fn default_bias() -> f64 {
    crate::tracker::DEFAULT_BIAS_DEGREES
}

fn default_gain() -> f64 {
    crate::tracker::DEFAULT_GAIN
}

fn default_threshold() -> i64 {
    crate::tracker::DEFAULT_COMMIT_THRESHOLD
}

fn default_viewport_width() -> f64 {
    crate::tracker::DEFAULT_VIEWPORT_WIDTH
}

fn default_listen_addr() -> String {
    "127.0.0.1:4242".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            theme: default_theme(),
            calibration_bias_degrees: default_bias(),
            sensitivity_gain: default_gain(),
            commit_threshold: default_threshold(),
            viewport_width: default_viewport_width(),
            listen_addr: default_listen_addr(),
            haptic_bell: true,
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

pub fn load_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };
    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

pub fn load_settings_from_path(path: &Path) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<Settings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut Settings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // Future migrations go here:
    // if settings.version < 2 {
    //     migrate_v1_to_v2(settings);
    // }

    settings.version = CURRENT_VERSION;
}

pub fn save_settings() {
    let Some(path) = preferred_config_path() else {
        warn!("Could not determine config directory, cannot save settings");
        return;
    };

    if let Ok(settings) = SETTINGS.read() {
        save_settings_to_file(&settings, &path);
    }
}

pub fn save_settings_to_path(path: &Path) {
    if let Ok(settings) = SETTINGS.read() {
        save_settings_to_file(&settings, path);
    }
}

fn save_settings_to_file(settings: &Settings, path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let body = match serde_yaml::to_string(settings) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };
    let content = format!("{FILE_HEADER}{body}");

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

const FILE_HEADER: &str = "\
# gazeflip configuration
#
# calibration_bias_degrees: added to every yaw reading (sensor mounting offset)
# sensitivity_gain:         pointer pixels per degree of head yaw
# commit_threshold:         accumulated pressure needed for one page turn
# viewport_width:           logical pointer surface width in pixels
# listen_addr:              UDP address for opentrack-style head trackers
";

// Public API for accessing/modifying settings

pub fn snapshot() -> Settings {
    SETTINGS.read().map(|s| s.clone()).unwrap_or_default()
}

pub fn get_theme_name() -> String {
    SETTINGS
        .read()
        .map(|s| s.theme.clone())
        .unwrap_or_else(|_| default_theme())
}

pub fn set_theme_name(name: &str) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.theme = name.to_string();
    }
    save_settings();
}

pub fn get_calibration_bias_degrees() -> f64 {
    SETTINGS
        .read()
        .map(|s| s.calibration_bias_degrees)
        .unwrap_or_else(|_| default_bias())
}

pub fn set_calibration_bias_degrees(bias: f64) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.calibration_bias_degrees = bias;
    }
    save_settings();
}

pub fn get_sensitivity_gain() -> f64 {
    SETTINGS
        .read()
        .map(|s| s.sensitivity_gain)
        .unwrap_or_else(|_| default_gain())
}

pub fn get_commit_threshold() -> i64 {
    SETTINGS
        .read()
        .map(|s| s.commit_threshold)
        .unwrap_or_else(|_| default_threshold())
}

pub fn get_viewport_width() -> f64 {
    SETTINGS
        .read()
        .map(|s| s.viewport_width)
        .unwrap_or_else(|_| default_viewport_width())
}

pub fn get_listen_addr() -> String {
    SETTINGS
        .read()
        .map(|s| s.listen_addr.clone())
        .unwrap_or_else(|_| default_listen_addr())
}

pub fn is_haptic_bell_enabled() -> bool {
    SETTINGS.read().map(|s| s.haptic_bell).unwrap_or(true)
}

pub fn set_haptic_bell_enabled(enabled: bool) {
    if let Ok(mut settings) = SETTINGS.write() {
        settings.haptic_bell = enabled;
    }
    save_settings();
}

/// Replace the in-memory settings without touching the file. Used by tests
/// and by CLI overrides that should not persist.
pub fn replace_in_memory(settings: Settings) {
    if let Ok(mut global) = SETTINGS.write() {
        *global = settings;
    }
}
