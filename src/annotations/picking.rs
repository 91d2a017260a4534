//! Mouse picking for annotations.
//!
//! Left click casts a ray against the model and adds an annotation at the
//! hit point. Right click removes the annotation nearest the pointer in
//! screen space. Clicks over egui panels are ignored so panel interaction
//! never places stray annotations.

use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

use crate::constants::PICK_THRESHOLD_NDC;
use crate::scene::ModelRoot;

use super::store::{closest_within, AnnotationStore};

pub(super) fn handle_annotation_clicks(
    mouse: Res<ButtonInput<MouseButton>>,
    mut contexts: EguiContexts,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut ray_cast: MeshRayCast,
    model: Query<(), With<ModelRoot>>,
    mut store: ResMut<AnnotationStore>,
) -> Result {
    let add = mouse.just_pressed(MouseButton::Left);
    let remove = mouse.just_pressed(MouseButton::Right);
    if !add && !remove {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;
    if ctx.wants_pointer_input() || ctx.is_pointer_over_area() {
        return Ok(());
    }

    let window = windows.single()?;
    let Some(cursor) = window.cursor_position() else {
        return Ok(());
    };
    let (camera, camera_transform) = cameras.single()?;

    if add {
        let ray = camera.viewport_to_world(camera_transform, cursor)?;
        let filter = |entity: Entity| model.contains(entity);
        let settings = MeshRayCastSettings::default().with_filter(&filter);
        if let Some((_, hit)) = ray_cast.cast_ray(ray, &settings).first() {
            let id = store.add(hit.point);
            debug!("Added annotation {:?} at {:?}", id, hit.point);
        }
    } else if remove {
        let size = window.size();
        let pointer_ndc = Vec2::new(
            cursor.x / size.x * 2.0 - 1.0,
            1.0 - cursor.y / size.y * 2.0,
        );
        let projected: Vec<_> = store
            .iter()
            .filter_map(|annotation| {
                camera
                    .world_to_ndc(camera_transform, annotation.position)
                    // behind the camera is outside the clip volume
                    .filter(|ndc| ndc.z > 0.0 && ndc.z < 1.0)
                    .map(|ndc| (annotation.id, ndc.truncate()))
            })
            .collect();
        if let Some(id) = closest_within(pointer_ndc, &projected, PICK_THRESHOLD_NDC) {
            store.remove(id);
            debug!("Removed annotation {:?}", id);
        }
    }

    Ok(())
}
