//! Numbered annotations pinned to the model surface.
//!
//! - [`store`] - annotation data and pure screen-space pick helpers
//! - [`picking`] - click handling (add on left, remove on right)
//! - [`markers`] - marker sphere entities, one per annotation
//! - [`occlusion`] - per-frame visibility verdicts for the labels

mod markers;
mod occlusion;
mod picking;
mod store;

pub use markers::AnnotationMarker;
pub use occlusion::{is_occluded, AnnotationVisibility};
pub use store::{closest_within, Annotation, AnnotationId, AnnotationStore};

use bevy::prelude::*;

pub struct AnnotationsPlugin;

impl Plugin for AnnotationsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnnotationStore>()
            .init_resource::<AnnotationVisibility>()
            .add_systems(Startup, markers::setup_marker_assets)
            .add_systems(
                Update,
                (
                    picking::handle_annotation_clicks,
                    markers::sync_markers,
                    occlusion::update_annotation_visibility,
                )
                    .chain(),
            );
    }
}
