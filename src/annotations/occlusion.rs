//! Screen-space occlusion for annotation labels.
//!
//! Each frame, every annotation is re-projected to the viewport and a ray is
//! cast back through that pixel. If the model surface is hit meaningfully
//! closer than the annotation itself, the annotation is behind geometry and
//! its label should dim. Re-evaluated per frame because camera motion
//! changes the answer.

use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings};
use bevy::platform::collections::HashMap;
use bevy::prelude::*;

use crate::constants::OCCLUSION_EPSILON;
use crate::scene::ModelRoot;

use super::store::{AnnotationId, AnnotationStore};

/// Per-annotation visibility verdicts for the current frame.
///
/// Annotations that are off-screen or behind the camera are absent.
#[derive(Resource, Default)]
pub struct AnnotationVisibility(pub HashMap<AnnotationId, bool>);

/// Whether a surface hit at `hit_distance` hides a point at
/// `point_distance` along the same ray.
///
/// The epsilon keeps an annotation sitting exactly on the surface from
/// occluding itself.
pub fn is_occluded(hit_distance: f32, point_distance: f32, epsilon: f32) -> bool {
    hit_distance < point_distance - epsilon
}

pub(super) fn update_annotation_visibility(
    store: Res<AnnotationStore>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut ray_cast: MeshRayCast,
    model: Query<(), With<ModelRoot>>,
    mut visibility: ResMut<AnnotationVisibility>,
) -> Result {
    visibility.0.clear();
    if store.is_empty() {
        return Ok(());
    }
    let (camera, camera_transform) = cameras.single()?;

    let filter = |entity: Entity| model.contains(entity);
    let settings = MeshRayCastSettings::default().with_filter(&filter);

    for annotation in store.iter() {
        let Ok(viewport) = camera.world_to_viewport(camera_transform, annotation.position) else {
            continue;
        };
        let Ok(ray) = camera.viewport_to_world(camera_transform, viewport) else {
            continue;
        };
        // measured from the ray origin so orthographic cameras work too
        let point_distance = annotation.position.distance(ray.origin);
        let visible = match ray_cast.cast_ray(ray, &settings).first() {
            Some((_, hit)) => !is_occluded(hit.distance, point_distance, OCCLUSION_EPSILON),
            None => true,
        };
        visibility.0.insert(annotation.id, visible);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_hit_in_front_occludes() {
        assert!(is_occluded(1.0, 2.0, 0.01));
    }

    #[test]
    fn test_hit_at_own_position_does_not_occlude() {
        // self-hit within epsilon of the annotation distance
        assert!(!is_occluded(1.995, 2.0, 0.01));
    }

    #[test]
    fn test_hit_behind_does_not_occlude() {
        assert!(!is_occluded(3.0, 2.0, 0.01));
    }
}
