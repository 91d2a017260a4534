//! Scene assembly: camera, lights, ground plane, and the model entity.
//!
//! The camera is orthographic with pan-orbit controls. The model entity's
//! mesh follows [`CurrentModel`]; its material, the ground plane, and the
//! clear color follow the active palette every frame.

use bevy::camera::ScalingMode;
use bevy::prelude::*;
use bevy_panorbit_camera::PanOrbitCamera;

use crate::config::AppConfig;
use crate::mesh::CurrentModel;

/// Vertical world-space extent visible in the orthographic viewport.
const VIEWPORT_HEIGHT: f32 = 5.0;

/// The entity displaying the active model.
#[derive(Component)]
pub struct ModelRoot;

/// Shadow-catching plane under the model, visible only in lit mode.
#[derive(Component)]
struct GroundPlane;

/// Material handles owned by the scene.
#[derive(Resource)]
struct SceneMaterials {
    model: Handle<StandardMaterial>,
    ground: Handle<StandardMaterial>,
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    current: Res<CurrentModel>,
    config: Res<AppConfig>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEWPORT_HEIGHT,
            },
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_xyz(-10.0, 10.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        PanOrbitCamera::default(),
    ));

    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 6_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    let palette = config.data.palette();
    let model = materials.add(StandardMaterial {
        base_color: palette.model,
        unlit: !config.data.lit,
        // fill sits behind coincident edge lines
        depth_bias: -1.0,
        ..default()
    });
    let ground = materials.add(StandardMaterial {
        base_color: palette.shadow,
        perceptual_roughness: 1.0,
        ..default()
    });

    commands.spawn((
        Mesh3d(current.handle.clone()),
        MeshMaterial3d(model.clone()),
        ModelRoot,
    ));
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(40.0, 40.0))),
        MeshMaterial3d(ground.clone()),
        Transform::from_xyz(0.0, -0.5, 0.0),
        Visibility::Hidden,
        GroundPlane,
    ));

    commands.insert_resource(SceneMaterials { model, ground });
}

/// Keep the model entity pointed at the active mesh handle.
fn sync_model_mesh(current: Res<CurrentModel>, mut query: Query<&mut Mesh3d, With<ModelRoot>>) {
    if !current.is_changed() {
        return;
    }
    for mut mesh in query.iter_mut() {
        if mesh.0 != current.handle {
            mesh.0 = current.handle.clone();
        }
    }
}

/// Apply palette, opacity, and lighting mode to the scene.
///
/// Runs every frame but compares before writing so material assets are only
/// re-uploaded when a setting actually changed.
fn sync_scene_appearance(
    config: Res<AppConfig>,
    scene_materials: Res<SceneMaterials>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut clear_color: ResMut<ClearColor>,
    mut ground: Query<&mut Visibility, With<GroundPlane>>,
) {
    let settings = &config.data;
    let palette = settings.palette();

    if clear_color.0 != palette.background {
        clear_color.0 = palette.background;
    }

    let model_color = palette.model.with_alpha(settings.opacity);
    let alpha_mode = if settings.opacity < 1.0 {
        AlphaMode::Blend
    } else {
        AlphaMode::Opaque
    };
    if let Some(material) = materials.get(&scene_materials.model)
        && (material.base_color != model_color
            || material.unlit == settings.lit
            || material.alpha_mode != alpha_mode)
    {
        if let Some(material) = materials.get_mut(&scene_materials.model) {
            material.base_color = model_color;
            material.unlit = !settings.lit;
            material.alpha_mode = alpha_mode;
        }
    }

    if let Some(material) = materials.get(&scene_materials.ground)
        && material.base_color != palette.shadow
    {
        if let Some(material) = materials.get_mut(&scene_materials.ground) {
            material.base_color = palette.shadow;
        }
    }

    let desired = if settings.lit {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
    for mut visibility in ground.iter_mut() {
        if *visibility != desired {
            *visibility = desired;
        }
    }
}

/// Draw the axes cross and ground grid helpers.
fn draw_helpers(config: Res<AppConfig>, mut gizmos: Gizmos) {
    let settings = &config.data;
    if settings.show_axes {
        gizmos.line(Vec3::ZERO, Vec3::X, Color::srgb(0.9, 0.2, 0.2));
        gizmos.line(Vec3::ZERO, Vec3::Y, Color::srgb(0.2, 0.9, 0.2));
        gizmos.line(Vec3::ZERO, Vec3::Z, Color::srgb(0.2, 0.2, 0.9));
    }
    if settings.show_grid {
        gizmos.grid(
            Isometry3d::from_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
            UVec2::splat(20),
            Vec2::splat(0.5),
            Color::srgba(0.5, 0.5, 0.5, 0.4),
        );
    }
}

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_scene.after(crate::mesh::ModelSourceStartup))
            .add_systems(Update, (sync_model_mesh, sync_scene_appearance, draw_helpers));
    }
}
