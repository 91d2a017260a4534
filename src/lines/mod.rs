//! Line rendering: geometry builders, materials, and uniform upkeep.
//!
//! - [`geometry`] - LineList and ribbon mesh construction from edge sets
//! - [`material`] - typed line materials (thick, conditional, both)
//!
//! The one shared handle per material kind lives in [`LineMaterials`];
//! edge overlay entities all reference these, so a single uniform update
//! retargets every line on screen.

mod geometry;
mod material;

pub use geometry::{
    conditional_line_list_mesh, conditional_ribbon_mesh, line_list_mesh, ribbon_mesh,
};
pub use material::{
    ConditionalLineMaterial, ConditionalThickLineMaterial, LineParams, ThickLineMaterial,
};

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::AppConfig;

/// Shared material handles for every line style.
///
/// Thin plain lines use a stock unlit material; the other three are custom
/// materials with the [`LineParams`] uniform block.
#[derive(Resource)]
pub struct LineMaterials {
    pub thin: Handle<StandardMaterial>,
    pub thick: Handle<ThickLineMaterial>,
    pub conditional_thin: Handle<ConditionalLineMaterial>,
    pub conditional_thick: Handle<ConditionalThickLineMaterial>,
}

fn setup_line_materials(
    mut commands: Commands,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut thick_materials: ResMut<Assets<ThickLineMaterial>>,
    mut conditional_materials: ResMut<Assets<ConditionalLineMaterial>>,
    mut conditional_thick_materials: ResMut<Assets<ConditionalThickLineMaterial>>,
) {
    let thin = standard_materials.add(StandardMaterial {
        unlit: true,
        ..default()
    });
    let params = LineParams::default();
    commands.insert_resource(LineMaterials {
        thin,
        thick: thick_materials.add(ThickLineMaterial { params }),
        conditional_thin: conditional_materials.add(ConditionalLineMaterial { params }),
        conditional_thick: conditional_thick_materials
            .add(ConditionalThickLineMaterial { params }),
    });
}

/// Keep line uniforms in sync with the settings and the viewport.
///
/// The resolution uniform follows the physical window size; running this
/// every frame (writing only on change) guarantees a resize can never leave
/// thick lines at a stale width.
fn update_line_params(
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<AppConfig>,
    line_materials: Res<LineMaterials>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut thick_materials: ResMut<Assets<ThickLineMaterial>>,
    mut conditional_materials: ResMut<Assets<ConditionalLineMaterial>>,
    mut conditional_thick_materials: ResMut<Assets<ConditionalThickLineMaterial>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };

    let line_color = config.data.palette().line;
    let desired = LineParams {
        color: line_color.to_linear(),
        resolution: Vec2::new(
            window.physical_width() as f32,
            window.physical_height() as f32,
        ),
        linewidth: config.data.thickness,
        opacity: 1.0,
    };

    // Compare before writing so untouched frames do not re-upload uniforms
    if let Some(material) = thick_materials.get(&line_materials.thick)
        && material.params != desired
    {
        if let Some(material) = thick_materials.get_mut(&line_materials.thick) {
            material.params = desired;
        }
    }
    if let Some(material) = conditional_materials.get(&line_materials.conditional_thin)
        && material.params != desired
    {
        if let Some(material) = conditional_materials.get_mut(&line_materials.conditional_thin) {
            material.params = desired;
        }
    }
    if let Some(material) =
        conditional_thick_materials.get(&line_materials.conditional_thick)
        && material.params != desired
    {
        if let Some(material) =
            conditional_thick_materials.get_mut(&line_materials.conditional_thick)
        {
            material.params = desired;
        }
    }
    if let Some(material) = standard_materials.get(&line_materials.thin)
        && material.base_color != line_color
    {
        if let Some(material) = standard_materials.get_mut(&line_materials.thin) {
            material.base_color = line_color;
        }
    }
}

pub struct LinesPlugin;

impl Plugin for LinesPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MaterialPlugin::<ThickLineMaterial>::default(),
            MaterialPlugin::<ConditionalLineMaterial>::default(),
            MaterialPlugin::<ConditionalThickLineMaterial>::default(),
        ))
        .add_systems(Startup, setup_line_materials)
        .add_systems(Update, update_line_params);
    }
}
