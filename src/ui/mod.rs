//! egui surfaces: the controls side panel and the annotation label overlay.

mod controls_panel;
mod overlay;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Panel first so the overlay can never paint under it
        app.add_systems(
            EguiPrimaryContextPass,
            (controls_panel::controls_panel_ui, overlay::annotation_overlay_ui).chain(),
        );
    }
}
