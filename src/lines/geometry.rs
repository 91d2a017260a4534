//! Line geometry construction.
//!
//! Two families of meshes are built from classified edge sets:
//!
//! - plain `LineList` meshes, rendered as device-pixel lines
//! - ribbon meshes for thick lines: each segment becomes a quad whose four
//!   vertices all carry the segment endpoints as attributes plus a corner
//!   code, and the vertex shader expands the quad to a constant screen-space
//!   width
//!
//! Conditional variants additionally carry the two adjacent face normals on
//! every vertex so the shader can run the per-frame silhouette test.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh, MeshVertexAttribute, PrimitiveTopology, VertexFormat};
use bevy::prelude::*;

use crate::edges::ConditionalEdge;

/// Segment start point, shared by all four vertices of a ribbon quad.
pub const ATTRIBUTE_SEG_START: MeshVertexAttribute =
    MeshVertexAttribute::new("SegStart", 711624313, VertexFormat::Float32x3);

/// Segment end point, shared by all four vertices of a ribbon quad.
pub const ATTRIBUTE_SEG_END: MeshVertexAttribute =
    MeshVertexAttribute::new("SegEnd", 711624314, VertexFormat::Float32x3);

/// Ribbon corner code: x is the side of the line (-1 or +1), y selects the
/// segment endpoint (0 = start, 1 = end).
pub const ATTRIBUTE_CORNER: MeshVertexAttribute =
    MeshVertexAttribute::new("Corner", 711624315, VertexFormat::Float32x2);

/// First adjacent face normal of a conditional edge.
pub const ATTRIBUTE_EDGE_NORMAL_A: MeshVertexAttribute =
    MeshVertexAttribute::new("EdgeNormalA", 711624316, VertexFormat::Float32x3);

/// Second adjacent face normal of a conditional edge.
pub const ATTRIBUTE_EDGE_NORMAL_B: MeshVertexAttribute =
    MeshVertexAttribute::new("EdgeNormalB", 711624317, VertexFormat::Float32x3);

fn empty_mesh(topology: PrimitiveTopology) -> Mesh {
    Mesh::new(topology, RenderAssetUsages::default())
}

/// Plain line-list mesh: two vertices per segment.
pub fn line_list_mesh(segments: &[[Vec3; 2]]) -> Mesh {
    let positions: Vec<[f32; 3]> = segments
        .iter()
        .flat_map(|[a, b]| [a.to_array(), b.to_array()])
        .collect();

    let mut mesh = empty_mesh(PrimitiveTopology::LineList);
    // stock material pipeline wants normals even when unlit
    let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh
}

/// Line-list mesh for conditional edges, with both face normals on each
/// vertex.
pub fn conditional_line_list_mesh(edges: &[ConditionalEdge]) -> Mesh {
    let positions: Vec<[f32; 3]> = edges
        .iter()
        .flat_map(|e| [e.start.to_array(), e.end.to_array()])
        .collect();
    let normals_a: Vec<[f32; 3]> = edges
        .iter()
        .flat_map(|e| [e.normal_a.to_array(); 2])
        .collect();
    let normals_b: Vec<[f32; 3]> = edges
        .iter()
        .flat_map(|e| [e.normal_b.to_array(); 2])
        .collect();

    let mut mesh = empty_mesh(PrimitiveTopology::LineList);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(ATTRIBUTE_EDGE_NORMAL_A, normals_a);
    mesh.insert_attribute(ATTRIBUTE_EDGE_NORMAL_B, normals_b);
    mesh
}

/// Corner codes for one ribbon quad, in vertex order.
const QUAD_CORNERS: [[f32; 2]; 4] = [[-1.0, 0.0], [1.0, 0.0], [-1.0, 1.0], [1.0, 1.0]];

fn ribbon_attributes(segments: impl Iterator<Item = [Vec3; 2]> + ExactSizeIterator) -> Mesh {
    let count = segments.len();
    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(count * 4);
    let mut seg_starts: Vec<[f32; 3]> = Vec::with_capacity(count * 4);
    let mut seg_ends: Vec<[f32; 3]> = Vec::with_capacity(count * 4);
    let mut corners: Vec<[f32; 2]> = Vec::with_capacity(count * 4);
    let mut indices: Vec<u32> = Vec::with_capacity(count * 6);

    for (i, [start, end]) in segments.enumerate() {
        for corner in QUAD_CORNERS {
            // position only anchors culling bounds; the shader recomputes it
            let anchor = if corner[1] > 0.5 { end } else { start };
            positions.push(anchor.to_array());
            seg_starts.push(start.to_array());
            seg_ends.push(end.to_array());
            corners.push(corner);
        }
        let base = (i * 4) as u32;
        indices.extend([base, base + 2, base + 1, base + 2, base + 3, base + 1]);
    }

    let mut mesh = empty_mesh(PrimitiveTopology::TriangleList);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(ATTRIBUTE_SEG_START, seg_starts);
    mesh.insert_attribute(ATTRIBUTE_SEG_END, seg_ends);
    mesh.insert_attribute(ATTRIBUTE_CORNER, corners);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Ribbon mesh for thick lines: one quad (4 vertices, 6 indices) per
/// segment.
pub fn ribbon_mesh(segments: &[[Vec3; 2]]) -> Mesh {
    ribbon_attributes(segments.iter().copied())
}

/// Ribbon mesh for thick conditional lines, with face normals on each
/// vertex.
pub fn conditional_ribbon_mesh(edges: &[ConditionalEdge]) -> Mesh {
    let mut mesh = ribbon_attributes(edges.iter().map(|e| [e.start, e.end]));

    let normals_a: Vec<[f32; 3]> = edges
        .iter()
        .flat_map(|e| [e.normal_a.to_array(); 4])
        .collect();
    let normals_b: Vec<[f32; 3]> = edges
        .iter()
        .flat_map(|e| [e.normal_b.to_array(); 4])
        .collect();
    mesh.insert_attribute(ATTRIBUTE_EDGE_NORMAL_A, normals_a);
    mesh.insert_attribute(ATTRIBUTE_EDGE_NORMAL_B, normals_b);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_segments() -> Vec<[Vec3; 2]> {
        vec![[Vec3::ZERO, Vec3::X], [Vec3::Y, Vec3::new(1.0, 1.0, 0.0)]]
    }

    fn sample_conditional() -> Vec<ConditionalEdge> {
        vec![ConditionalEdge {
            start: Vec3::ZERO,
            end: Vec3::X,
            normal_a: Vec3::Y,
            normal_b: Vec3::Z,
        }]
    }

    #[test]
    fn test_line_list_has_two_vertices_per_segment() {
        let mesh = line_list_mesh(&sample_segments());
        assert_eq!(mesh.count_vertices(), 4);
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::LineList);
    }

    #[test]
    fn test_ribbon_has_quad_per_segment() {
        let mesh = ribbon_mesh(&sample_segments());
        assert_eq!(mesh.count_vertices(), 8);
        match mesh.indices() {
            Some(Indices::U32(indices)) => assert_eq!(indices.len(), 12),
            other => panic!("expected u32 indices, got {:?}", other),
        }
    }

    #[test]
    fn test_ribbon_carries_segment_endpoints_on_every_vertex() {
        let mesh = ribbon_mesh(&[[Vec3::ZERO, Vec3::X]]);
        let starts = mesh.attribute(ATTRIBUTE_SEG_START).unwrap();
        let ends = mesh.attribute(ATTRIBUTE_SEG_END).unwrap();
        assert_eq!(starts.len(), 4);
        assert_eq!(ends.len(), 4);
    }

    #[test]
    fn test_conditional_line_list_carries_normals() {
        let mesh = conditional_line_list_mesh(&sample_conditional());
        assert_eq!(mesh.count_vertices(), 2);
        assert_eq!(mesh.attribute(ATTRIBUTE_EDGE_NORMAL_A).unwrap().len(), 2);
        assert_eq!(mesh.attribute(ATTRIBUTE_EDGE_NORMAL_B).unwrap().len(), 2);
    }

    #[test]
    fn test_conditional_ribbon_carries_normals_per_quad_vertex() {
        let mesh = conditional_ribbon_mesh(&sample_conditional());
        assert_eq!(mesh.count_vertices(), 4);
        assert_eq!(mesh.attribute(ATTRIBUTE_EDGE_NORMAL_A).unwrap().len(), 4);
    }

    #[test]
    fn test_empty_edge_sets_build_empty_meshes() {
        assert_eq!(line_list_mesh(&[]).count_vertices(), 0);
        assert_eq!(ribbon_mesh(&[]).count_vertices(), 0);
    }
}
