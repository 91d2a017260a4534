//! Model selection and loading.
//!
//! Resolves the user's model choice to a concrete mesh handle. The helmet is
//! a GLTF asset and may be loading or broken; the procedural cylinder is
//! always available, so downstream consumers (classifier, scene) never see a
//! missing mesh. Every switch of the active handle bumps a generation
//! counter that the edge cache keys on.

use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::constants::{
    CYLINDER_HEIGHT, CYLINDER_RADIAL_SEGMENTS, CYLINDER_RADIUS, HELMET_MODEL_PATH,
};

use super::primitives;

/// Which model the inspector displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModelType {
    #[default]
    Helmet,
    Cylinder,
}

impl ModelType {
    pub fn all() -> &'static [ModelType] {
        &[ModelType::Helmet, ModelType::Cylinder]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelType::Helmet => "Helmet",
            ModelType::Cylinder => "Cylinder",
        }
    }
}

/// The mesh currently being inspected.
///
/// `generation` increments whenever `handle` changes, giving cache keys a
/// cheap identity for "the mesh was swapped".
#[derive(Resource)]
pub struct CurrentModel {
    pub handle: Handle<Mesh>,
    pub generation: u64,
    pub source: ModelType,
}

/// Procedural cylinder, generated once at startup.
#[derive(Resource)]
pub(super) struct FallbackMesh {
    handle: Handle<Mesh>,
}

#[derive(Resource, Default)]
pub(super) struct HelmetMesh {
    handle: Option<Handle<Mesh>>,
    load_failure_logged: bool,
}

pub(super) fn setup_model_source(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    asset_server: Res<AssetServer>,
) {
    let cylinder =
        primitives::cylinder(CYLINDER_RADIUS, CYLINDER_HEIGHT, CYLINDER_RADIAL_SEGMENTS);
    let fallback = meshes.add(cylinder.to_bevy_mesh());

    commands.insert_resource(CurrentModel {
        handle: fallback.clone(),
        generation: 1,
        source: ModelType::Cylinder,
    });
    commands.insert_resource(FallbackMesh { handle: fallback });
    commands.insert_resource(HelmetMesh {
        handle: Some(asset_server.load(HELMET_MODEL_PATH)),
        load_failure_logged: false,
    });
}

/// Resolve the configured model to a loaded mesh handle.
///
/// The helmet is only promoted once its asset is fully loaded; while it
/// loads (or after it fails) the cylinder stands in. Runs every frame but
/// only touches `CurrentModel` when the resolved handle actually changes.
pub(super) fn resolve_model(
    config: Res<AppConfig>,
    asset_server: Res<AssetServer>,
    mut current: ResMut<CurrentModel>,
    fallback: Res<FallbackMesh>,
    mut helmet: ResMut<HelmetMesh>,
) {
    let desired = config.data.model;

    let (handle, effective) = match desired {
        ModelType::Cylinder => (fallback.handle.clone(), ModelType::Cylinder),
        ModelType::Helmet => match &helmet.handle {
            Some(handle) => match asset_server.load_state(handle.id()) {
                LoadState::Loaded => (handle.clone(), ModelType::Helmet),
                LoadState::Failed(_) => {
                    if !helmet.load_failure_logged {
                        warn!(
                            "Failed to load {}, falling back to procedural cylinder",
                            HELMET_MODEL_PATH
                        );
                        helmet.load_failure_logged = true;
                        helmet.handle = None;
                    }
                    (fallback.handle.clone(), ModelType::Cylinder)
                }
                // still loading, keep the fallback on screen
                _ => (fallback.handle.clone(), ModelType::Cylinder),
            },
            None => (fallback.handle.clone(), ModelType::Cylinder),
        },
    };

    if current.handle != handle {
        current.handle = handle;
        current.source = effective;
        current.generation += 1;
        info!(
            "Active model is now {} (generation {})",
            effective.display_name(),
            current.generation
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_type_default_is_helmet() {
        assert_eq!(ModelType::default(), ModelType::Helmet);
    }

    #[test]
    fn test_model_type_all_covers_variants() {
        assert_eq!(ModelType::all().len(), 2);
    }
}
