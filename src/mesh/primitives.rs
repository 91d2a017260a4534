//! Procedural test and fallback meshes.
//!
//! The cylinder is the guaranteed fallback model: if the GLTF asset fails to
//! load, the pipeline always has this mesh to classify. Both generators
//! produce closed manifolds with shared vertices and outward-facing winding,
//! so their edge topology is exact rather than an artifact of vertex
//! duplication.

use bevy::prelude::*;
use std::f32::consts::TAU;

use super::TriangleMesh;

/// Closed cylinder centered at the origin, axis along +Y.
///
/// Topology per radial segment: two side triangles plus one fan triangle on
/// each cap. Rim edges sit between a cap face and a side face (dihedral
/// ~90 degrees); the vertical seams between adjacent side quads have a
/// dihedral of 360/segments degrees.
pub fn cylinder(radius: f32, height: f32, radial_segments: u32) -> TriangleMesh {
    let n = radial_segments.max(3) as usize;
    let half = height / 2.0;

    let mut positions = Vec::with_capacity(2 * n + 2);
    // top ring [0, n), bottom ring [n, 2n)
    for ring_y in [half, -half] {
        for i in 0..n {
            let angle = i as f32 / n as f32 * TAU;
            positions.push(Vec3::new(radius * angle.cos(), ring_y, radius * angle.sin()));
        }
    }
    let top_center = positions.len() as u32;
    positions.push(Vec3::new(0.0, half, 0.0));
    let bottom_center = positions.len() as u32;
    positions.push(Vec3::new(0.0, -half, 0.0));

    let mut indices = Vec::with_capacity(4 * n);
    for i in 0..n {
        let j = (i + 1) % n;
        let (top_i, top_j) = (i as u32, j as u32);
        let (bot_i, bot_j) = ((n + i) as u32, (n + j) as u32);

        // side quad, split along a diagonal (both halves are coplanar)
        indices.push([bot_i, top_j, bot_j]);
        indices.push([bot_i, top_i, top_j]);
        // caps
        indices.push([top_center, top_j, top_i]);
        indices.push([bottom_center, bot_i, bot_j]);
    }

    TriangleMesh { positions, indices }
}

/// Axis-aligned unit cube centered at the origin.
///
/// 8 shared vertices, 12 triangles. Each face's diagonal edge is coplanar;
/// the 12 geometric cube edges all have 90 degree dihedrals.
pub fn unit_cube() -> TriangleMesh {
    let positions = vec![
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, 0.5, 0.5),
    ];

    let indices = vec![
        // -Z
        [0, 3, 2],
        [0, 2, 1],
        // +Z
        [4, 5, 6],
        [4, 6, 7],
        // -X
        [0, 4, 7],
        [0, 7, 3],
        // +X
        [1, 2, 6],
        [1, 6, 5],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [3, 7, 6],
        [3, 6, 2],
    ];

    TriangleMesh { positions, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_twelve_triangles() {
        let cube = unit_cube();
        assert_eq!(cube.positions.len(), 8);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let cube = unit_cube();
        for tri in 0..cube.triangle_count() {
            let normal = cube.face_normal(tri).unwrap();
            let [a, b, c] = cube.indices[tri];
            let centroid = (cube.positions[a as usize]
                + cube.positions[b as usize]
                + cube.positions[c as usize])
                / 3.0;
            assert!(
                normal.dot(centroid) > 0.0,
                "triangle {} normal {:?} points inward",
                tri,
                normal
            );
        }
    }

    #[test]
    fn test_cylinder_triangle_count() {
        let n = 16;
        let mesh = cylinder(0.25, 0.5, n);
        assert_eq!(mesh.triangle_count(), 4 * n as usize);
        assert_eq!(mesh.positions.len(), 2 * n as usize + 2);
    }

    #[test]
    fn test_cylinder_normals_point_outward() {
        let mesh = cylinder(0.25, 0.5, 16);
        for tri in 0..mesh.triangle_count() {
            let normal = mesh.face_normal(tri).unwrap();
            let [a, b, c] = mesh.indices[tri];
            let centroid = (mesh.positions[a as usize]
                + mesh.positions[b as usize]
                + mesh.positions[c as usize])
                / 3.0;
            assert!(normal.dot(centroid) > 0.0, "triangle {} points inward", tri);
        }
    }

    #[test]
    fn test_cylinder_enforces_minimum_segments() {
        let mesh = cylinder(0.25, 0.5, 1);
        assert_eq!(mesh.triangle_count(), 12); // clamped to 3 segments
    }
}
