use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::constants::{DEFAULT_EMOJI_FONT_SIZE, DEFAULT_MAX_WIDTH, DEFAULT_TEXT_FONT_SIZE};

/// Configuration that cannot be used as-is
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required resource `{name}` not found at {path:?}")]
    MissingResource { name: &'static str, path: PathBuf },

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Application configuration persisted to disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerConfigData {
    /// Font size given to new emoji stickers
    pub emoji_font_size: f32,
    /// Font size given to new text stickers
    pub text_font_size: f32,
    /// Wrap width used before the canvas size is known
    pub initial_max_width: f32,
    /// RGBA color of the overlay chrome and control icons
    pub chrome_color: [u8; 4],
    /// Keep controls the same size on screen however far a sticker is scaled
    pub legible_chrome: bool,
    /// Control icons. Relative paths resolve under the bundled assets.
    pub icon_close: Option<PathBuf>,
    pub icon_rotate: Option<PathBuf>,
    pub icon_expand: Option<PathBuf>,
    /// Last drawing saved or opened (not auto-loaded, just remembered)
    pub last_drawing_path: Option<PathBuf>,
}

impl Default for StickerConfigData {
    fn default() -> Self {
        Self {
            emoji_font_size: DEFAULT_EMOJI_FONT_SIZE,
            text_font_size: DEFAULT_TEXT_FONT_SIZE,
            initial_max_width: DEFAULT_MAX_WIDTH,
            chrome_color: [255, 255, 255, 255],
            legible_chrome: true,
            icon_close: None,
            icon_rotate: None,
            icon_expand: None,
            last_drawing_path: None,
        }
    }
}

impl StickerConfigData {
    /// Check sizes and that every configured icon exists.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("emoji_font_size", self.emoji_font_size),
            ("text_font_size", self.text_font_size),
            ("initial_max_width", self.initial_max_width),
        ];
        for (field, value) in sizes {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }

        for (name, path) in self.icon_paths() {
            let resolved = crate::paths::resolve_resource(path);
            if !resolved.is_file() {
                return Err(ConfigError::MissingResource {
                    name,
                    path: resolved,
                });
            }
        }
        Ok(())
    }

    /// Configured icons by name
    pub fn icon_paths(&self) -> impl Iterator<Item = (&'static str, &PathBuf)> {
        [
            ("icon_close", self.icon_close.as_ref()),
            ("icon_rotate", self.icon_rotate.as_ref()),
            ("icon_expand", self.icon_expand.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, path)| path.map(|path| (name, path)))
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct StickerConfig {
    /// The persisted configuration data
    pub data: StickerConfigData,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            data: StickerConfigData::default(),
            config_path: crate::paths::config_file(),
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

/// Message to update the last drawing path in config
#[derive(Message)]
pub struct UpdateLastDrawingPathRequest {
    pub path: PathBuf,
}

/// Result of loading config from disk
pub struct LoadConfigResult {
    pub config: StickerConfig,
    /// Error message if config was reset to defaults due to an error
    pub reset_reason: Option<String>,
}

impl LoadConfigResult {
    pub fn notification(&self) -> ConfigResetNotification {
        ConfigResetNotification {
            show: self.reset_reason.is_some(),
            reason: self.reset_reason.clone(),
        }
    }
}

/// Parse config JSON, falling back to defaults with a reason on failure
fn parse_config(json: &str) -> (StickerConfigData, Option<String>) {
    match serde_json::from_str(json) {
        Ok(data) => (data, None),
        Err(e) => {
            warn!("Failed to parse config file: {}", e);
            (
                StickerConfigData::default(),
                Some(format!("Configuration file was corrupted: {}", e)),
            )
        }
    }
}

/// Load configuration from disk
pub fn load_config() -> LoadConfigResult {
    let config_path = crate::paths::config_file();

    let (data, reset_reason) = if config_path.exists() {
        match std::fs::read_to_string(&config_path) {
            Ok(json) => {
                let parsed = parse_config(&json);
                if parsed.1.is_none() {
                    info!("Loaded config from {:?}", config_path);
                }
                parsed
            }
            Err(e) => {
                warn!("Failed to read config file: {}", e);
                (
                    StickerConfigData::default(),
                    Some(format!("Could not read configuration file: {}", e)),
                )
            }
        }
    } else {
        info!("No config file found, using defaults");
        (StickerConfigData::default(), None)
    };

    LoadConfigResult {
        config: StickerConfig {
            data,
            config_path,
            dirty: false,
        },
        reset_reason,
    }
}

/// Save configuration to disk
fn save_config(config: &StickerConfig) {
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

/// System to save config when requested
fn save_config_system(
    mut events: MessageReader<SaveConfigRequest>,
    mut config: ResMut<StickerConfig>,
) {
    for _ in events.read() {
        if config.dirty {
            save_config(&config);
            config.dirty = false;
        }
    }
}

/// System to update last drawing path
fn update_last_drawing_path_system(
    mut events: MessageReader<UpdateLastDrawingPathRequest>,
    mut config: ResMut<StickerConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) {
    for event in events.read() {
        if config.data.last_drawing_path.as_ref() == Some(&event.path) {
            continue;
        }
        config.data.last_drawing_path = Some(event.path.clone());
        config.dirty = true;
        save_events.write(SaveConfigRequest);
    }
}

/// Config is loaded and validated in `main` before the app is built, so the
/// plugin only registers the resources (without replacing inserted ones) and
/// the save plumbing.
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<StickerConfig>()
            .init_resource::<ConfigResetNotification>()
            .add_message::<SaveConfigRequest>()
            .add_message::<UpdateLastDrawingPathRequest>()
            .add_systems(
                Update,
                (
                    update_last_drawing_path_system
                        .run_if(on_message::<UpdateLastDrawingPathRequest>),
                    save_config_system.run_if(on_message::<SaveConfigRequest>),
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_data_default() {
        let data = StickerConfigData::default();
        assert_eq!(data.emoji_font_size, 70.0);
        assert_eq!(data.text_font_size, 24.0);
        assert_eq!(data.initial_max_width, 320.0);
        assert!(data.icon_close.is_none());
        assert!(data.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let (data, reason) = parse_config(r#"{ "text_font_size": 30.0 }"#);
        assert!(reason.is_none());
        assert_eq!(data.text_font_size, 30.0);
        assert_eq!(data.emoji_font_size, 70.0);
    }

    #[test]
    fn test_corrupt_config_resets_with_reason() {
        let (data, reason) = parse_config("{ not json");
        assert_eq!(data, StickerConfigData::default());
        assert!(reason.is_some_and(|r| r.contains("corrupted")));
    }

    #[test]
    fn test_config_data_serialization() {
        let data = StickerConfigData {
            chrome_color: [10, 20, 30, 40],
            icon_rotate: Some(PathBuf::from("icons/rotate.png")),
            last_drawing_path: Some(PathBuf::from("/tmp/drawing.json")),
            ..Default::default()
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: StickerConfigData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_validate_rejects_non_positive_sizes() {
        let data = StickerConfigData {
            emoji_font_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            data.validate(),
            Err(ConfigError::Invalid {
                field: "emoji_font_size",
                ..
            })
        ));

        let data = StickerConfigData {
            initial_max_width: f32::NAN,
            ..Default::default()
        };
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_icon() {
        let data = StickerConfigData {
            icon_expand: Some(PathBuf::from("icons/definitely-missing.png")),
            ..Default::default()
        };
        assert!(matches!(
            data.validate(),
            Err(ConfigError::MissingResource {
                name: "icon_expand",
                ..
            })
        ));
    }
}
