//! Color palettes for the viewer.
//!
//! The viewer ships with a light and a dark palette plus a custom mode where
//! every color comes from the settings panel. A palette covers the four
//! surfaces the renderer needs: background, model fill, edge lines, and the
//! shadow tint.

use bevy::prelude::Color;
use bevy_egui::egui;
use serde::{Deserialize, Serialize};

/// Which palette drives the scene colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    Custom,
}

impl ThemeMode {
    pub fn all() -> &'static [ThemeMode] {
        &[ThemeMode::Light, ThemeMode::Dark, ThemeMode::Custom]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::Custom => "Custom",
        }
    }
}

/// Resolved scene colors for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub model: Color,
    pub line: Color,
    pub shadow: Color,
}

// ============================================================================
// Light palette
// ============================================================================

pub const LIGHT_BACKGROUND: Color = Color::srgb(0.933, 0.933, 0.933);
pub const LIGHT_MODEL: Color = Color::srgb(1.0, 1.0, 1.0);
pub const LIGHT_LINES: Color = Color::srgb(0.271, 0.353, 0.392);
pub const LIGHT_SHADOW: Color = Color::srgb(0.769, 0.788, 0.796);

// ============================================================================
// Dark palette
// ============================================================================

pub const DARK_BACKGROUND: Color = Color::srgb(0.067, 0.067, 0.067);
pub const DARK_MODEL: Color = Color::srgb(0.067, 0.067, 0.067);
pub const DARK_LINES: Color = Color::srgb(0.690, 0.745, 0.773);
pub const DARK_SHADOW: Color = Color::srgb(0.173, 0.180, 0.184);

// ============================================================================
// Custom palette seed (shown when the user first switches to Custom)
// ============================================================================

pub const CUSTOM_BACKGROUND: Color = Color::srgb(0.051, 0.165, 0.157);
pub const CUSTOM_MODEL: Color = Color::srgb(0.051, 0.165, 0.157);
pub const CUSTOM_LINES: Color = Color::srgb(1.0, 0.706, 0.0);
pub const CUSTOM_SHADOW: Color = Color::srgb(0.267, 0.286, 0.122);

/// Marker sphere color for annotation points
pub const MARKER_COLOR: Color = Color::srgb(1.0, 0.27, 0.2);

pub const LIGHT: Palette = Palette {
    background: LIGHT_BACKGROUND,
    model: LIGHT_MODEL,
    line: LIGHT_LINES,
    shadow: LIGHT_SHADOW,
};

pub const DARK: Palette = Palette {
    background: DARK_BACKGROUND,
    model: DARK_MODEL,
    line: DARK_LINES,
    shadow: DARK_SHADOW,
};

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (fully opaque)
pub fn bevy_to_egui_opaque(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        255,
    )
}

/// Convert an egui Color32 to Bevy Color
pub fn egui_to_bevy(color: egui::Color32) -> Color {
    Color::srgba(
        color.r() as f32 / 255.0,
        color.g() as f32 / 255.0,
        color.b() as f32 / 255.0,
        color.a() as f32 / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_mode_default_is_light() {
        assert_eq!(ThemeMode::default(), ThemeMode::Light);
    }

    #[test]
    fn test_theme_mode_all_covers_variants() {
        assert_eq!(ThemeMode::all().len(), 3);
    }

    #[test]
    fn test_egui_round_trip_preserves_channels() {
        let color = Color::srgb(0.5, 0.25, 0.75);
        let egui_color = bevy_to_egui_opaque(color);
        let back = egui_to_bevy(egui_color).to_srgba();
        assert!((back.red - 0.5).abs() < 0.01);
        assert!((back.green - 0.25).abs() < 0.01);
        assert!((back.blue - 0.75).abs() < 0.01);
    }
}
