//! Viewer settings and their persistence.
//!
//! [`ViewerSettings`] is the flat configuration surface the rest of the
//! pipeline reads each frame: display mode, threshold angle, line options,
//! colors, and helper toggles. Every field carries a serde default so a
//! partial or missing config file falls back to documented defaults instead
//! of failing. Settings are persisted to a platform-appropriate
//! `config.json`; systems that change them mark the config dirty and request
//! a save.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    DEFAULT_EDGE_THRESHOLD_DEG, DEFAULT_LINE_THICKNESS, MAX_EDGE_THRESHOLD_DEG, MAX_LINE_THICKNESS,
};
use crate::edges::EdgeDisplayMode;
use crate::mesh::ModelType;
use crate::theme::{self, Palette, ThemeMode};

/// The configuration surface read by the rendering pipeline.
///
/// Mutating a field takes effect on the next frame; geometry-affecting
/// fields (model, threshold, display mode, toggles) additionally invalidate
/// the edge cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    /// Active color palette
    #[serde(default)]
    pub theme: ThemeMode,

    /// Custom palette colors, used when `theme` is [`ThemeMode::Custom`]
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_model_color")]
    pub model_color: Color,
    #[serde(default = "default_line_color")]
    pub line_color: Color,
    #[serde(default = "default_shadow_color")]
    pub shadow_color: Color,

    /// Which model to inspect
    #[serde(default)]
    pub model: ModelType,

    /// Model fill opacity in [0, 1]
    #[serde(default = "default_opacity")]
    pub opacity: f32,

    /// Shaded rendering with shadows (off = flat unlit fill)
    #[serde(default)]
    pub lit: bool,

    /// Dihedral angle threshold in degrees, [0, 120]
    #[serde(default = "default_threshold")]
    pub threshold_deg: f32,

    /// Which primary edge overlay to show
    #[serde(default)]
    pub display_mode: EdgeDisplayMode,

    /// Show the view-dependent conditional edge overlay
    #[serde(default = "default_true")]
    pub show_conditional_edges: bool,

    /// Render edges as screen-space-constant-width ribbons
    #[serde(default)]
    pub use_thick_lines: bool,

    /// Thick-line width, [0, 5]
    #[serde(default = "default_thickness")]
    pub thickness: f32,

    /// Helper toggles
    #[serde(default = "default_true")]
    pub show_axes: bool,
    #[serde(default = "default_true")]
    pub show_grid: bool,

    /// Show annotation markers and labels
    #[serde(default = "default_true")]
    pub show_annotations: bool,
}

fn default_background_color() -> Color {
    theme::CUSTOM_BACKGROUND
}

fn default_model_color() -> Color {
    theme::CUSTOM_MODEL
}

fn default_line_color() -> Color {
    theme::CUSTOM_LINES
}

fn default_shadow_color() -> Color {
    theme::CUSTOM_SHADOW
}

fn default_opacity() -> f32 {
    0.85
}

fn default_threshold() -> f32 {
    DEFAULT_EDGE_THRESHOLD_DEG
}

fn default_thickness() -> f32 {
    DEFAULT_LINE_THICKNESS
}

fn default_true() -> bool {
    true
}

impl Default for ViewerSettings {
    fn default() -> Self {
        // serde_json deserializing an empty object applies every field default
        serde_json::from_str("{}").expect("empty settings object must deserialize")
    }
}

impl ViewerSettings {
    /// Clamp numeric fields to their documented ranges.
    ///
    /// Applied after loading from disk so a hand-edited config cannot push
    /// the pipeline outside its tested parameter space.
    pub fn sanitize(&mut self) {
        self.threshold_deg = self.threshold_deg.clamp(0.0, MAX_EDGE_THRESHOLD_DEG);
        self.thickness = self.thickness.clamp(0.0, MAX_LINE_THICKNESS);
        self.opacity = self.opacity.clamp(0.0, 1.0);
    }

    /// Resolve the effective scene colors for the active theme.
    pub fn palette(&self) -> Palette {
        match self.theme {
            ThemeMode::Light => theme::LIGHT,
            ThemeMode::Dark => theme::DARK,
            ThemeMode::Custom => Palette {
                background: self.background_color,
                model: self.model_color,
                line: self.line_color,
                shadow: self.shadow_color,
            },
        }
    }
}

/// Runtime configuration resource
#[derive(Resource)]
pub struct AppConfig {
    /// The persisted settings
    pub data: ViewerSettings,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Whether config needs to be saved (dirty flag)
    pub dirty: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data: ViewerSettings::default(),
            config_path: crate::paths::config_file(),
            dirty: false,
        }
    }
}

/// Message to trigger config save
#[derive(Message)]
pub struct SaveConfigRequest;

/// Load settings from disk, falling back to defaults on any error.
fn load_settings(config_path: &PathBuf) -> ViewerSettings {
    let mut settings = if config_path.exists() {
        match std::fs::read_to_string(config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(data) => {
                    info!("Loaded settings from {:?}", config_path);
                    data
                }
                Err(e) => {
                    warn!("Failed to parse config file, using defaults: {}", e);
                    ViewerSettings::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file, using defaults: {}", e);
                ViewerSettings::default()
            }
        }
    } else {
        info!("No config file found, using defaults");
        ViewerSettings::default()
    };

    settings.sanitize();
    settings
}

/// Save settings to disk
fn save_settings(config: &AppConfig) {
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

/// Startup system to load settings from disk into the existing resource
fn load_config_system(mut config: ResMut<AppConfig>) {
    config.data = load_settings(&config.config_path.clone());
    config.dirty = false;
}

/// System to save config when requested
fn save_config_system(mut events: MessageReader<SaveConfigRequest>, mut config: ResMut<AppConfig>) {
    for _ in events.read() {
        if config.dirty {
            save_settings(&config);
            config.dirty = false;
        }
    }
}

pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AppConfig>()
            .add_message::<SaveConfigRequest>()
            .add_systems(Startup, load_config_system)
            .add_systems(
                Update,
                save_config_system.run_if(on_message::<SaveConfigRequest>),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let settings = ViewerSettings::default();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.model, ModelType::Helmet);
        assert_eq!(settings.display_mode, EdgeDisplayMode::ThresholdEdges);
        assert_eq!(settings.threshold_deg, 40.0);
        assert_eq!(settings.thickness, 1.0);
        assert_eq!(settings.opacity, 0.85);
        assert!(settings.show_conditional_edges);
        assert!(!settings.use_thick_lines);
        assert!(!settings.lit);
        assert!(settings.show_annotations);
    }

    #[test]
    fn test_absent_fields_fall_back_to_defaults() {
        // A config written by an older build may omit newer fields
        let json = r#"{ "threshold_deg": 75.0, "lit": true }"#;
        let settings: ViewerSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.threshold_deg, 75.0);
        assert!(settings.lit);
        assert_eq!(settings.display_mode, EdgeDisplayMode::ThresholdEdges);
        assert!(settings.show_conditional_edges);
        assert_eq!(settings.thickness, 1.0);
    }

    #[test]
    fn test_sanitize_clamps_ranges() {
        let mut settings = ViewerSettings::default();
        settings.threshold_deg = 500.0;
        settings.thickness = -2.0;
        settings.opacity = 1.5;
        settings.sanitize();
        assert_eq!(settings.threshold_deg, MAX_EDGE_THRESHOLD_DEG);
        assert_eq!(settings.thickness, 0.0);
        assert_eq!(settings.opacity, 1.0);
    }

    #[test]
    fn test_settings_round_trip() {
        let mut settings = ViewerSettings::default();
        settings.theme = ThemeMode::Dark;
        settings.use_thick_lines = true;
        settings.thickness = 3.5;

        let json = serde_json::to_string(&settings).unwrap();
        let parsed: ViewerSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_custom_palette_uses_settings_colors() {
        let mut settings = ViewerSettings::default();
        settings.theme = ThemeMode::Custom;
        let palette = settings.palette();
        assert_eq!(palette.line, settings.line_color);
        assert_eq!(palette.background, settings.background_color);
    }

    #[test]
    fn test_light_palette_ignores_settings_colors() {
        let settings = ViewerSettings::default();
        let palette = settings.palette();
        assert_eq!(palette.background, theme::LIGHT_BACKGROUND);
        assert_eq!(palette.line, theme::LIGHT_LINES);
    }
}
