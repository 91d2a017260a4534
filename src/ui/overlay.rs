use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::annotations::{AnnotationStore, AnnotationVisibility};
use crate::config::AppConfig;
use crate::theme;

/// Draws the numbered annotation labels over the viewport.
///
/// Labels track their annotation's projected position each frame and dim
/// when the surface point is occluded by geometry.
pub fn annotation_overlay_ui(
    mut contexts: EguiContexts,
    config: Res<AppConfig>,
    store: Res<AnnotationStore>,
    visibility: Res<AnnotationVisibility>,
    cameras: Query<(&Camera, &GlobalTransform)>,
) -> Result {
    if !config.data.show_annotations || store.is_empty() {
        return Ok(());
    }
    let (camera, camera_transform) = cameras.single()?;
    let line_color = theme::bevy_to_egui_opaque(config.data.palette().line);
    let ctx = contexts.ctx_mut()?;

    for annotation in store.iter() {
        let Ok(pos) = camera.world_to_viewport(camera_transform, annotation.position) else {
            // off-screen or behind the camera
            continue;
        };
        let visible = visibility.0.get(&annotation.id).copied().unwrap_or(false);
        let color = if visible {
            line_color
        } else {
            line_color.gamma_multiply(0.25)
        };

        egui::Area::new(egui::Id::new(("annotation_label", annotation.id.0)))
            .fixed_pos(egui::pos2(pos.x + 8.0, pos.y - 8.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(annotation.number.to_string())
                        .strong()
                        .size(16.0)
                        .color(color),
                );
            });
    }

    Ok(())
}
