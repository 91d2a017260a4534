//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1280.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 800.0;

/// Vertex merge tolerance for mesh normalization (world units).
/// Vertices closer than this are treated as the same vertex when
/// building edge adjacency.
pub const POSITION_TOLERANCE: f32 = 1e-3;

/// Default dihedral angle threshold for threshold-edge extraction (degrees)
pub const DEFAULT_EDGE_THRESHOLD_DEG: f32 = 40.0;

/// Maximum dihedral angle threshold accepted from the UI (degrees)
pub const MAX_EDGE_THRESHOLD_DEG: f32 = 120.0;

/// Default thick-line width (screen-space units, roughly pixels)
pub const DEFAULT_LINE_THICKNESS: f32 = 1.0;

/// Maximum thick-line width accepted from the UI
pub const MAX_LINE_THICKNESS: f32 = 5.0;

/// Distance slack for the annotation occlusion test (world units).
/// A surface hit must be at least this much closer than the annotation
/// before the annotation counts as occluded.
pub const OCCLUSION_EPSILON: f32 = 0.01;

/// Screen-space radius for remove-nearest annotation picking,
/// in normalized device coordinates.
pub const PICK_THRESHOLD_NDC: f32 = 0.1;

/// Radial segment count for the procedural fallback cylinder
pub const CYLINDER_RADIAL_SEGMENTS: u32 = 100;

/// Radius of the procedural fallback cylinder (world units)
pub const CYLINDER_RADIUS: f32 = 0.25;

/// Height of the procedural fallback cylinder (world units)
pub const CYLINDER_HEIGHT: f32 = 0.5;

/// Asset path for the helmet demo model (first primitive of the GLTF)
pub const HELMET_MODEL_PATH: &str = "models/damaged_helmet.glb#Mesh0/Primitive0";

/// World-space radius of annotation marker spheres
pub const MARKER_RADIUS: f32 = 0.015;
