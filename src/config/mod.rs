use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_MAXIMUM_SAVED_STATES;

/// System set for config loading (other plugins can run after this)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigLoaded;

/// A folder of surface models to load on startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseFolder {
    pub name: String,
    #[serde(default)]
    pub models: Vec<PathBuf>,
}

fn default_maximum_saved_states() -> usize {
    DEFAULT_MAXIMUM_SAVED_STATES
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfigData {
    /// Number of undo states kept per folder (0 disables undo)
    #[serde(default = "default_maximum_saved_states")]
    pub maximum_saved_states: usize,

    /// Model folders spawned into the scene on startup
    #[serde(default)]
    pub case_folders: Vec<CaseFolder>,
}

impl Default for AppConfigData {
    fn default() -> Self {
        Self {
            maximum_saved_states: DEFAULT_MAXIMUM_SAVED_STATES,
            case_folders: Vec::new(),
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted configuration data
    pub data: AppConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: AppConfigData::default(),
            config_path: get_config_path(),
            dirty: false,
        }
    }
}

/// Resource to notify user when config was reset to defaults
#[derive(Resource, Default)]
pub struct ConfigResetNotification {
    /// Whether to show the notification dialog
    pub show: bool,
    /// The reason for the reset (parse error, read error, etc.)
    pub reason: Option<String>,
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Message to change how many undo states are kept
#[derive(Message)]
pub struct SetMaximumSavedStatesRequest {
    pub value: usize,
}

/// Get the path to the config file (platform-appropriate location)
fn get_config_path() -> PathBuf {
    crate::paths::config_file()
}

/// Parse config JSON, falling back to defaults with a reason on failure
fn parse_config(json: &str) -> (AppConfigData, Option<String>) {
    match serde_json::from_str(json) {
        Ok(data) => (data, None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
fn load_config(config_path: &Path) -> (AppConfigData, Option<String>) {
    if !config_path.exists() {
        info!("No config file found, using defaults");
        return (AppConfigData::default(), None);
    }

    match std::fs::read_to_string(config_path) {
        Ok(json) => {
            let result = parse_config(&json);
            if result.1.is_none() {
                info!("Loaded config from {:?}", config_path);
            }
            result
        }
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            (
                AppConfigData::default(),
                Some(format!("Could not read configuration file: {}", e)),
            )
        }
    }
}

/// Save configuration to disk
fn save_config(config: &AppConfig) {
    match serde_json::to_string_pretty(&config.data) {
        Ok(json) => {
            if let Err(e) = std::fs::write(&config.config_path, json) {
                error!("Failed to save config: {}", e);
            } else {
                info!("Config saved to {:?}", config.config_path);
            }
        }
        Err(e) => {
            error!("Failed to serialize config: {}", e);
        }
    }
}

/// Startup system to load config from disk into the existing resource
fn load_config_system(
    mut config: ResMut<AppConfig>,
    mut reset_notification: ResMut<ConfigResetNotification>,
) {
    let config_path = get_config_path();
    let (data, reset_reason) = load_config(&config_path);
    config.data = data;
    config.config_path = config_path;
    config.dirty = false;

    // Set notification if config was reset due to an error
    if let Some(reason) = reset_reason {
        reset_notification.show = true;
        reset_notification.reason = Some(reason);
    }
}

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<AppConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to update the undo capacity in config
fn set_maximum_saved_states_system(
    mut events: MessageReader<SetMaximumSavedStatesRequest>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.maximum_saved_states == event.value {
            continue;
        }
        config.data.maximum_saved_states = event.value;
        config.dirty = true;
        save_events.write(SaveConfigRequest);
        info!("Set maximum saved states to {}", event.value);
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<SetMaximumSavedStatesRequest>()
            .add_systems(Startup, load_config_system.in_set(ConfigLoaded))
            .add_systems(
                Update,
                (
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                    set_maximum_saved_states_system
                        .run_if(on_message::<SetMaximumSavedStatesRequest>),
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_data_default() {
        let data = AppConfigData::default();
        assert_eq!(data.maximum_saved_states, DEFAULT_MAXIMUM_SAVED_STATES);
        assert!(data.case_folders.is_empty());
    }

    #[test]
    fn test_app_config_data_serialization() {
        let data = AppConfigData {
            maximum_saved_states: 4,
            case_folders: vec![CaseFolder {
                name: "Mandible".to_string(),
                models: vec![PathBuf::from("/cases/mandible.vtk")],
            }],
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: AppConfigData = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.maximum_saved_states, 4);
        assert_eq!(parsed.case_folders, data.case_folders);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let (data, reason) = parse_config("{}");
        assert!(reason.is_none());
        assert_eq!(data.maximum_saved_states, DEFAULT_MAXIMUM_SAVED_STATES);
        assert!(data.case_folders.is_empty());
    }

    #[test]
    fn test_case_folder_without_models() {
        let (data, _) = parse_config(r#"{"case_folders": [{"name": "Skull"}]}"#);
        assert_eq!(data.case_folders.len(), 1);
        assert!(data.case_folders[0].models.is_empty());
    }

    #[test]
    fn test_corrupted_config_falls_back_to_defaults() {
        let (data, reason) = parse_config("{ not json");
        assert!(reason.is_some());
        assert_eq!(data.maximum_saved_states, DEFAULT_MAXIMUM_SAVED_STATES);
    }

    #[test]
    fn test_config_reset_notification_default() {
        let notification = ConfigResetNotification::default();
        assert!(!notification.show);
        assert!(notification.reason.is_none());
    }
}
