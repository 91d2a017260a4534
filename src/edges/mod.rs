//! Edge set derivation and overlay management.
//!
//! [`classify`] is the pure classification pass; this module owns when it
//! runs. Classification and line-geometry construction are not per-frame
//! work: results are memoized under an explicit [`EdgeCacheKey`] built from
//! the mesh generation and every classification-relevant setting, and the
//! overlay entities are rebuilt only when that key changes.

mod classify;

pub use classify::{
    classify, conditional_edge_visible, ConditionalEdge, EdgeDisplayMode, EdgeSets,
};

use bevy::prelude::*;

use crate::config::AppConfig;
use crate::constants::POSITION_TOLERANCE;
use crate::lines::{
    conditional_line_list_mesh, conditional_ribbon_mesh, line_list_mesh, ribbon_mesh,
    LineMaterials,
};
use crate::mesh::{normalize, CurrentModel, TriangleMesh};

/// Tag for spawned line overlay entities.
#[derive(Component)]
pub struct EdgeOverlay;

/// Everything that, when changed, invalidates the classified edge sets or
/// the overlay geometry built from them.
#[derive(Debug, Clone, PartialEq)]
struct EdgeCacheKey {
    mesh_generation: u64,
    threshold_bits: u32,
    display_mode: EdgeDisplayMode,
    show_conditional: bool,
    use_thick_lines: bool,
}

/// Memoized classification output plus the key it was built under.
#[derive(Resource, Default)]
pub struct EdgeCache {
    key: Option<EdgeCacheKey>,
    pub sets: EdgeSets,
}

/// Rebuild edge sets and overlay entities when the cache key changes.
///
/// On a degenerate mesh the previous sets and overlays are retained
/// (stale but valid) and the error is logged; the key still advances so the
/// failure is not retried every frame.
fn rebuild_edge_overlays(
    mut commands: Commands,
    config: Res<AppConfig>,
    current: Res<CurrentModel>,
    mut meshes: ResMut<Assets<Mesh>>,
    line_materials: Res<LineMaterials>,
    mut cache: ResMut<EdgeCache>,
    overlays: Query<Entity, With<EdgeOverlay>>,
) {
    let settings = &config.data;
    let key = EdgeCacheKey {
        mesh_generation: current.generation,
        threshold_bits: settings.threshold_deg.to_bits(),
        display_mode: settings.display_mode,
        show_conditional: settings.show_conditional_edges,
        use_thick_lines: settings.use_thick_lines,
    };
    if cache.key.as_ref() == Some(&key) {
        return;
    }

    // Mesh asset may still be uploading; leave the key unset and retry.
    let Some(mesh) = meshes.get(&current.handle) else {
        return;
    };
    let Some(snapshot) = TriangleMesh::from_bevy_mesh(mesh) else {
        warn!("active model is not a readable triangle list, keeping previous edge sets");
        cache.key = Some(key);
        return;
    };

    match normalize(&snapshot, POSITION_TOLERANCE) {
        Ok(merged) => {
            cache.sets = classify(&merged, settings.threshold_deg);
            info!(
                "classified edges: {} boundary, {} threshold, {} conditional",
                cache.sets.boundary.len(),
                cache.sets.threshold.len(),
                cache.sets.conditional.len()
            );
        }
        Err(e) => {
            error!("edge classification skipped: {}", e);
            cache.key = Some(key);
            return;
        }
    }
    cache.key = Some(key);

    for entity in overlays.iter() {
        commands.entity(entity).despawn();
    }

    let primary: Option<&[[Vec3; 2]]> = match settings.display_mode {
        EdgeDisplayMode::ThresholdEdges => Some(&cache.sets.threshold),
        EdgeDisplayMode::NormalEdges => Some(&cache.sets.boundary),
        EdgeDisplayMode::None => None,
    };

    if let Some(segments) = primary
        && !segments.is_empty()
    {
        if settings.use_thick_lines {
            commands.spawn((
                Mesh3d(meshes.add(ribbon_mesh(segments))),
                MeshMaterial3d(line_materials.thick.clone()),
                EdgeOverlay,
            ));
        } else {
            commands.spawn((
                Mesh3d(meshes.add(line_list_mesh(segments))),
                MeshMaterial3d(line_materials.thin.clone()),
                EdgeOverlay,
            ));
        }
    }

    if settings.show_conditional_edges && !cache.sets.conditional.is_empty() {
        if settings.use_thick_lines {
            commands.spawn((
                Mesh3d(meshes.add(conditional_ribbon_mesh(&cache.sets.conditional))),
                MeshMaterial3d(line_materials.conditional_thick.clone()),
                EdgeOverlay,
            ));
        } else {
            commands.spawn((
                Mesh3d(meshes.add(conditional_line_list_mesh(&cache.sets.conditional))),
                MeshMaterial3d(line_materials.conditional_thin.clone()),
                EdgeOverlay,
            ));
        }
    }
}

pub struct EdgesPlugin;

impl Plugin for EdgesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EdgeCache>()
            .add_systems(Update, rebuild_edge_overlays);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_changes_with_threshold() {
        let base = EdgeCacheKey {
            mesh_generation: 1,
            threshold_bits: 40.0_f32.to_bits(),
            display_mode: EdgeDisplayMode::ThresholdEdges,
            show_conditional: true,
            use_thick_lines: false,
        };
        let mut other = base.clone();
        assert_eq!(base, other);
        other.threshold_bits = 41.0_f32.to_bits();
        assert_ne!(base, other);
    }

    #[test]
    fn test_cache_key_changes_with_mesh_generation() {
        let base = EdgeCacheKey {
            mesh_generation: 1,
            threshold_bits: 40.0_f32.to_bits(),
            display_mode: EdgeDisplayMode::NormalEdges,
            show_conditional: false,
            use_thick_lines: true,
        };
        let mut other = base.clone();
        other.mesh_generation = 2;
        assert_ne!(base, other);
    }
}
