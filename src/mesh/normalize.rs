//! Mesh normalization: vertex merging and canonical indexing.
//!
//! Edge adjacency only works if coincident vertices share an index. Render
//! meshes routinely duplicate vertices along UV seams and flat-shaded faces,
//! so before classification every vertex is snapped to a quantized grid and
//! duplicates are merged. The merge is deterministic: vertices map to the
//! first occurrence of their grid cell in index order, independent of any
//! hash iteration order.

use bevy::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

use super::TriangleMesh;

/// The mesh had no usable triangles left after merging.
#[derive(Debug, Error)]
#[error("mesh has no triangles after normalization (started with {input_triangles})")]
pub struct DegenerateMeshError {
    pub input_triangles: usize,
}

/// Quantized position key. Two positions within `tolerance` of the same grid
/// point share a key.
fn position_key(p: Vec3, tolerance: f32) -> [i64; 3] {
    [
        (p.x / tolerance).round() as i64,
        (p.y / tolerance).round() as i64,
        (p.z / tolerance).round() as i64,
    ]
}

/// Merge vertices closer than `tolerance` and drop triangles that collapse.
///
/// The output keeps only positions and connectivity. Triangles whose corners
/// merge into fewer than three distinct vertices are discarded; if none
/// survive, the mesh is degenerate and classification cannot proceed.
pub fn normalize(mesh: &TriangleMesh, tolerance: f32) -> Result<TriangleMesh, DegenerateMeshError> {
    let mut merged_index: HashMap<[i64; 3], u32> = HashMap::new();
    let mut positions: Vec<Vec3> = Vec::new();
    let mut remap: Vec<u32> = Vec::with_capacity(mesh.positions.len());

    for &p in &mesh.positions {
        let key = position_key(p, tolerance);
        let index = *merged_index.entry(key).or_insert_with(|| {
            positions.push(p);
            (positions.len() - 1) as u32
        });
        remap.push(index);
    }

    let indices: Vec<[u32; 3]> = mesh
        .indices
        .iter()
        .map(|&[a, b, c]| [remap[a as usize], remap[b as usize], remap[c as usize]])
        .filter(|&[a, b, c]| a != b && b != c && a != c)
        .collect();

    if indices.is_empty() {
        return Err(DegenerateMeshError {
            input_triangles: mesh.triangle_count(),
        });
    }

    Ok(TriangleMesh { positions, indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POSITION_TOLERANCE;

    /// Two triangles sharing an edge, with the shared vertices duplicated
    /// (as a flat-shaded render mesh would have them).
    fn duplicated_quad() -> TriangleMesh {
        TriangleMesh {
            positions: vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::Y,
                // second triangle repeats the shared edge endpoints
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            indices: vec![[0, 1, 2], [3, 4, 5]],
        }
    }

    #[test]
    fn test_merges_duplicated_vertices() {
        let merged = normalize(&duplicated_quad(), POSITION_TOLERANCE).unwrap();
        assert_eq!(merged.positions.len(), 4);
        assert_eq!(merged.triangle_count(), 2);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let mesh = duplicated_quad();
        let a = normalize(&mesh, POSITION_TOLERANCE).unwrap();
        let b = normalize(&mesh, POSITION_TOLERANCE).unwrap();
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn test_nearby_vertices_merge_within_tolerance() {
        let mesh = TriangleMesh {
            positions: vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::Y,
                Vec3::new(1.0 + 1e-5, 0.0, 0.0),
                Vec3::new(0.0, 1.0 - 1e-5, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
            indices: vec![[0, 1, 2], [3, 5, 4]],
        };
        let merged = normalize(&mesh, 1e-3).unwrap();
        assert_eq!(merged.positions.len(), 4);
    }

    #[test]
    fn test_collapsed_triangles_are_dropped() {
        // All three corners merge into one grid cell
        let mesh = TriangleMesh {
            positions: vec![
                Vec3::ZERO,
                Vec3::splat(1e-6),
                Vec3::splat(2e-6),
                Vec3::ZERO,
                Vec3::X,
                Vec3::Y,
            ],
            indices: vec![[0, 1, 2], [3, 4, 5]],
        };
        let merged = normalize(&mesh, 1e-3).unwrap();
        assert_eq!(merged.triangle_count(), 1);
    }

    #[test]
    fn test_degenerate_mesh_is_an_error() {
        let mesh = TriangleMesh {
            positions: vec![Vec3::ZERO, Vec3::splat(1e-6), Vec3::splat(2e-6)],
            indices: vec![[0, 1, 2]],
        };
        let err = normalize(&mesh, 1e-3).unwrap_err();
        assert_eq!(err.input_triangles, 1);
    }

    #[test]
    fn test_empty_mesh_is_an_error() {
        let mesh = TriangleMesh::default();
        assert!(normalize(&mesh, POSITION_TOLERANCE).is_err());
    }
}
