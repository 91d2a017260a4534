//! CPU-side triangle mesh snapshot.
//!
//! Edge classification runs on an immutable snapshot of the displayed mesh,
//! never on the GPU-resident asset itself. Only positions and connectivity
//! survive the conversion; all other vertex attributes are irrelevant to
//! adjacency and get dropped.

use bevy::mesh::{Indices, Mesh, PrimitiveTopology, VertexAttributeValues};
use bevy::prelude::*;

/// An indexed triangle list with positions only.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Unit face normal of triangle `tri`, or `None` for a degenerate
    /// (zero-area) triangle.
    pub fn face_normal(&self, tri: usize) -> Option<Vec3> {
        let [a, b, c] = self.indices[tri];
        let (a, b, c) = (
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        );
        (b - a).cross(c - a).try_normalize()
    }

    /// Extract a snapshot from a Bevy triangle-list mesh.
    ///
    /// Returns `None` if the mesh has no position attribute or an
    /// unsupported topology.
    pub fn from_bevy_mesh(mesh: &Mesh) -> Option<Self> {
        if mesh.primitive_topology() != PrimitiveTopology::TriangleList {
            return None;
        }

        let positions: Vec<Vec3> = match mesh.attribute(Mesh::ATTRIBUTE_POSITION)? {
            VertexAttributeValues::Float32x3(values) => {
                values.iter().map(|p| Vec3::from_array(*p)).collect()
            }
            _ => return None,
        };

        let indices: Vec<[u32; 3]> = match mesh.indices() {
            Some(Indices::U32(indices)) => {
                indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect()
            }
            Some(Indices::U16(indices)) => indices
                .chunks_exact(3)
                .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
                .collect(),
            // Non-indexed: every consecutive vertex triple is a triangle
            None => (0..positions.len() as u32)
                .collect::<Vec<_>>()
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]])
                .collect(),
        };

        Some(Self { positions, indices })
    }

    /// Build a renderable Bevy mesh with flat per-face normals.
    pub fn to_bevy_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|p| p.to_array()).collect();
        let indices: Vec<u32> = self.indices.iter().flatten().copied().collect();

        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            bevy::asset::RenderAssetUsages::default(),
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        mesh.insert_indices(Indices::U32(indices));
        // Flat shading needs one normal per face corner
        mesh.duplicate_vertices();
        mesh.compute_flat_normals();
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> TriangleMesh {
        TriangleMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            indices: vec![[0, 1, 2]],
        }
    }

    #[test]
    fn test_face_normal_of_xy_triangle_is_z() {
        let mesh = single_triangle();
        assert_eq!(mesh.face_normal(0), Some(Vec3::Z));
    }

    #[test]
    fn test_face_normal_degenerate_is_none() {
        let mesh = TriangleMesh {
            positions: vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0],
            indices: vec![[0, 1, 2]],
        };
        assert!(mesh.face_normal(0).is_none());
    }

    #[test]
    fn test_bevy_round_trip_preserves_triangles() {
        let mesh = single_triangle();
        let bevy_mesh = mesh.to_bevy_mesh();
        let back = TriangleMesh::from_bevy_mesh(&bevy_mesh).unwrap();
        assert_eq!(back.triangle_count(), 1);
        assert_eq!(back.face_normal(0), Some(Vec3::Z));
    }
}
