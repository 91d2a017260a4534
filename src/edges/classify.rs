//! Edge classification.
//!
//! Walks every undirected vertex pair of a normalized mesh, collects the
//! face normals adjacent to it, and sorts the edge into one of three sets:
//!
//! - **boundary**: exactly one adjacent face (the outline of an open or
//!   non-manifold mesh)
//! - **threshold**: dihedral angle above the configured threshold; boundary
//!   edges qualify as well
//! - **conditional**: two adjacent faces below the threshold — whether these
//!   read as an edge depends on the view direction, so both face normals are
//!   kept for per-frame evaluation on the GPU
//!
//! Edges with more than two adjacent faces are non-manifold; they are
//! counted, reported, and treated as boundary rather than aborting the pass.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mesh::TriangleMesh;

/// Which edge set is shown as the primary overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EdgeDisplayMode {
    #[default]
    ThresholdEdges,
    NormalEdges,
    None,
}

impl EdgeDisplayMode {
    pub fn all() -> &'static [EdgeDisplayMode] {
        &[
            EdgeDisplayMode::ThresholdEdges,
            EdgeDisplayMode::NormalEdges,
            EdgeDisplayMode::None,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EdgeDisplayMode::ThresholdEdges => "Threshold Edges",
            EdgeDisplayMode::NormalEdges => "Normal Edges",
            EdgeDisplayMode::None => "None",
        }
    }
}

/// An edge whose visibility depends on the current view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConditionalEdge {
    pub start: Vec3,
    pub end: Vec3,
    pub normal_a: Vec3,
    pub normal_b: Vec3,
}

/// The three classified edge sets for one mesh + threshold combination.
#[derive(Debug, Clone, Default)]
pub struct EdgeSets {
    /// Segment endpoints of edges with exactly one adjacent face
    pub boundary: Vec<[Vec3; 2]>,
    /// Segment endpoints of edges whose dihedral angle exceeds the threshold
    pub threshold: Vec<[Vec3; 2]>,
    /// Smooth interior edges carrying both face normals
    pub conditional: Vec<ConditionalEdge>,
    /// Number of edges with more than two adjacent faces (treated as boundary)
    pub non_manifold_edges: usize,
}

/// CPU mirror of the per-frame GPU test: a conditional edge reads as a
/// silhouette exactly when its two faces point to opposite sides of the
/// view direction. Symmetric in the two normals.
pub fn conditional_edge_visible(normal_a: Vec3, normal_b: Vec3, view_dir: Vec3) -> bool {
    normal_a.dot(view_dir) * normal_b.dot(view_dir) < 0.0
}

fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a < b { (a, b) } else { (b, a) }
}

/// Classify every edge of `mesh` against `threshold_deg` (clamped to
/// [0, 120] degrees).
///
/// The input is expected to be normalized; unmerged duplicate vertices would
/// make interior edges look like boundaries. Output ordering is
/// deterministic: edges appear in first-encountered triangle order.
pub fn classify(mesh: &TriangleMesh, threshold_deg: f32) -> EdgeSets {
    let threshold_rad = threshold_deg.clamp(0.0, 120.0).to_radians();

    let face_normals: Vec<Option<Vec3>> =
        (0..mesh.triangle_count()).map(|t| mesh.face_normal(t)).collect();

    // Adjacency in first-seen order so classification output is stable
    // regardless of hash iteration order.
    let mut edge_order: Vec<(u32, u32)> = Vec::new();
    let mut adjacent: HashMap<(u32, u32), Vec<usize>> = HashMap::new();

    for (tri, &[a, b, c]) in mesh.indices.iter().enumerate() {
        // Degenerate faces have no normal and contribute nothing to dihedrals
        if face_normals[tri].is_none() {
            continue;
        }
        for (u, v) in [(a, b), (b, c), (c, a)] {
            let key = edge_key(u, v);
            adjacent
                .entry(key)
                .or_insert_with(|| {
                    edge_order.push(key);
                    Vec::with_capacity(2)
                })
                .push(tri);
        }
    }

    let mut sets = EdgeSets::default();

    for key in edge_order {
        let faces = &adjacent[&key];
        let segment = [
            mesh.positions[key.0 as usize],
            mesh.positions[key.1 as usize],
        ];

        match faces.len() {
            0 => {}
            1 => {
                sets.boundary.push(segment);
                // An open edge is always a hard outline
                sets.threshold.push(segment);
            }
            2 => {
                let (Some(normal_a), Some(normal_b)) =
                    (face_normals[faces[0]], face_normals[faces[1]])
                else {
                    continue;
                };
                if normal_a.angle_between(normal_b) > threshold_rad {
                    sets.threshold.push(segment);
                } else {
                    sets.conditional.push(ConditionalEdge {
                        start: segment[0],
                        end: segment[1],
                        normal_a,
                        normal_b,
                    });
                }
            }
            _ => {
                sets.non_manifold_edges += 1;
                sets.boundary.push(segment);
                sets.threshold.push(segment);
            }
        }
    }

    if sets.non_manifold_edges > 0 {
        warn!(
            "mesh contains {} non-manifold edges, treating them as boundary",
            sets.non_manifold_edges
        );
    }

    sets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::POSITION_TOLERANCE;
    use crate::mesh::{cylinder, normalize, unit_cube};

    #[test]
    fn test_closed_cube_has_no_boundary_edges() {
        let sets = classify(&unit_cube(), 40.0);
        assert!(sets.boundary.is_empty());
        assert_eq!(sets.non_manifold_edges, 0);
    }

    #[test]
    fn test_cube_threshold_40_yields_twelve_edges() {
        // All cube dihedrals are 90 degrees; face diagonals are coplanar
        let sets = classify(&unit_cube(), 40.0);
        assert_eq!(sets.threshold.len(), 12);
    }

    #[test]
    fn test_cube_threshold_100_yields_no_edges() {
        let sets = classify(&unit_cube(), 100.0);
        assert!(sets.threshold.is_empty());
        // every edge with two faces below threshold becomes conditional:
        // 12 cube edges + 6 face diagonals
        assert_eq!(sets.conditional.len(), 18);
    }

    #[test]
    fn test_cube_diagonals_are_conditional_at_low_threshold() {
        let sets = classify(&unit_cube(), 40.0);
        assert_eq!(sets.conditional.len(), 6);
        // coplanar faces: normals equal, never a silhouette from any view
        for edge in &sets.conditional {
            assert!((edge.normal_a - edge.normal_b).length() < 1e-5);
        }
    }

    #[test]
    fn test_cylinder_rims_included_seams_excluded() {
        let n = 16;
        // seam dihedral is 360/16 = 22.5 degrees, rims are ~90
        let sets = classify(&cylinder(0.25, 0.5, n), 50.0);
        assert!(sets.boundary.is_empty());
        assert_eq!(sets.threshold.len(), 2 * n as usize);
    }

    #[test]
    fn test_cylinder_rims_excluded_above_ninety() {
        let sets = classify(&cylinder(0.25, 0.5, 16), 95.0);
        assert!(sets.threshold.is_empty());
    }

    #[test]
    fn test_cylinder_seams_are_conditional() {
        let n = 16;
        let sets = classify(&cylinder(0.25, 0.5, n), 50.0);
        // vertical seams carry two side-facet normals that differ by 22.5
        // degrees; a view direction between them sees a silhouette
        let seam = sets
            .conditional
            .iter()
            .find(|e| (e.normal_a - e.normal_b).length() > 1e-3)
            .expect("cylinder should have non-coplanar conditional edges");
        // a grazing view along the difference of the normals always puts
        // the two faces on opposite sides
        let grazing = (seam.normal_a - seam.normal_b).normalize();
        assert!(conditional_edge_visible(
            seam.normal_a,
            seam.normal_b,
            grazing
        ));
        // a head-on view sees both faces, no silhouette
        let head_on = (seam.normal_a + seam.normal_b).normalize();
        assert!(!conditional_edge_visible(
            seam.normal_a,
            seam.normal_b,
            head_on
        ));
    }

    #[test]
    fn test_conditional_visibility_is_symmetric() {
        let samples = [
            Vec3::new(1.0, 0.3, -0.2),
            Vec3::new(-0.5, 1.0, 0.8),
            Vec3::new(0.0, -1.0, 0.4),
            Vec3::NEG_Z,
        ];
        let normal_a = Vec3::new(0.8, 0.6, 0.0).normalize();
        let normal_b = Vec3::new(0.8, -0.6, 0.0).normalize();
        for view in samples {
            assert_eq!(
                conditional_edge_visible(normal_a, normal_b, view),
                conditional_edge_visible(normal_b, normal_a, view),
            );
        }
    }

    #[test]
    fn test_non_manifold_edge_counts_and_becomes_boundary() {
        // three triangles sharing the edge (0, 1)
        let mesh = TriangleMesh {
            positions: vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::Y,
                Vec3::Z,
                Vec3::new(0.5, -1.0, 0.0),
            ],
            indices: vec![[0, 1, 2], [0, 3, 1], [0, 1, 4]],
        };
        let sets = classify(&mesh, 40.0);
        assert_eq!(sets.non_manifold_edges, 1);
        let shared = [Vec3::ZERO, Vec3::X];
        assert!(sets.boundary.contains(&shared));
    }

    #[test]
    fn test_open_quad_has_boundary_ring() {
        let mesh = TriangleMesh {
            positions: vec![
                Vec3::ZERO,
                Vec3::X,
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::Y,
            ],
            indices: vec![[0, 1, 2], [0, 2, 3]],
        };
        let sets = classify(&mesh, 40.0);
        assert_eq!(sets.boundary.len(), 4);
        // boundary edges are also part of the threshold set
        assert_eq!(sets.threshold.len(), 4);
        // the shared diagonal is coplanar, hence conditional
        assert_eq!(sets.conditional.len(), 1);
    }

    #[test]
    fn test_classification_after_normalization_of_render_mesh() {
        // A cube that went through flat-normal vertex duplication still
        // classifies to the same 12 edges once normalized.
        let duplicated =
            TriangleMesh::from_bevy_mesh(&unit_cube().to_bevy_mesh()).unwrap();
        let merged = normalize(&duplicated, POSITION_TOLERANCE).unwrap();
        let sets = classify(&merged, 40.0);
        assert!(sets.boundary.is_empty());
        assert_eq!(sets.threshold.len(), 12);
    }
}
