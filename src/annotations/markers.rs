//! Marker spheres for annotation positions.

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constants::MARKER_RADIUS;
use crate::theme::MARKER_COLOR;

use super::store::{AnnotationId, AnnotationStore};

/// Tags a marker entity with the annotation it represents.
///
/// Marker entities are excluded from model ray casts, so placing one
/// annotation never blocks placing the next behind it.
#[derive(Component)]
pub struct AnnotationMarker(pub AnnotationId);

#[derive(Resource)]
pub(super) struct MarkerAssets {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

pub(super) fn setup_marker_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(MarkerAssets {
        mesh: meshes.add(Sphere::new(MARKER_RADIUS)),
        material: materials.add(StandardMaterial {
            base_color: MARKER_COLOR,
            unlit: true,
            ..default()
        }),
    });
}

/// Keep one marker entity per stored annotation.
pub(super) fn sync_markers(
    mut commands: Commands,
    store: Res<AnnotationStore>,
    config: Res<AppConfig>,
    assets: Res<MarkerAssets>,
    mut markers: Query<(Entity, &AnnotationMarker, &mut Visibility)>,
) {
    let desired = if config.data.show_annotations {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };

    let mut present = Vec::with_capacity(markers.iter().len());
    for (entity, marker, mut visibility) in markers.iter_mut() {
        if store.iter().any(|a| a.id == marker.0) {
            present.push(marker.0);
            if *visibility != desired {
                *visibility = desired;
            }
        } else {
            commands.entity(entity).despawn();
        }
    }

    for annotation in store.iter() {
        if !present.contains(&annotation.id) {
            commands.spawn((
                Mesh3d(assets.mesh.clone()),
                MeshMaterial3d(assets.material.clone()),
                Transform::from_translation(annotation.position),
                desired,
                AnnotationMarker(annotation.id),
            ));
        }
    }
}
