//! Mesh acquisition and normalization.
//!
//! - [`snapshot`] - CPU-side triangle mesh snapshot, converted from/to Bevy meshes
//! - [`normalize`] - vertex merging and canonical indexing ahead of edge classification
//! - [`primitives`] - procedural cylinder (the guaranteed fallback) and cube
//! - [`source`] - model selection with GLTF loading and fallback handling

mod normalize;
mod primitives;
mod snapshot;
mod source;

pub use normalize::{normalize, DegenerateMeshError};
pub use primitives::{cylinder, unit_cube};
pub use snapshot::TriangleMesh;
pub use source::{CurrentModel, ModelType};

use bevy::prelude::*;

/// Startup label for model source initialization; the scene spawns after it.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelSourceStartup;

pub struct MeshSourcePlugin;

impl Plugin for MeshSourcePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Startup,
            source::setup_model_source.in_set(ModelSourceStartup),
        )
        .add_systems(Update, source::resolve_model);
    }
}
