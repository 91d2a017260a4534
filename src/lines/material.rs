//! Line materials.
//!
//! Each material carries one typed uniform block ([`LineParams`]: color,
//! resolution, linewidth, opacity) passed explicitly at draw time — no
//! dynamic uniform injection. The resolution uniform must track the physical
//! viewport size; a stale value makes thick lines render at the wrong width,
//! so [`super::update_line_params`] refreshes it on every resize.

use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::pbr::{Material, MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::*;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderType, SpecializedMeshPipelineError,
};
use bevy::shader::ShaderRef;

use super::geometry::{
    ATTRIBUTE_CORNER, ATTRIBUTE_EDGE_NORMAL_A, ATTRIBUTE_EDGE_NORMAL_B, ATTRIBUTE_SEG_END,
    ATTRIBUTE_SEG_START,
};

/// Uniform block shared by all line materials.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct LineParams {
    pub color: LinearRgba,
    /// Physical viewport size in pixels (width, height)
    pub resolution: Vec2,
    /// Screen-space line width, roughly in pixels
    pub linewidth: f32,
    pub opacity: f32,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            color: LinearRgba::BLACK,
            resolution: Vec2::ONE,
            linewidth: 1.0,
            opacity: 1.0,
        }
    }
}

/// Screen-space-constant-width ribbon lines.
#[derive(Asset, TypePath, AsBindGroup, Clone)]
pub struct ThickLineMaterial {
    #[uniform(0)]
    pub params: LineParams,
}

impl Material for ThickLineMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/thick_line.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/thick_line.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_SEG_START.at_shader_location(1),
            ATTRIBUTE_SEG_END.at_shader_location(2),
            ATTRIBUTE_CORNER.at_shader_location(3),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        // ribbons face the camera from either side
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

/// Thin conditional lines: the fragment shader hides edges whose two faces
/// are on the same side of the view direction.
#[derive(Asset, TypePath, AsBindGroup, Clone)]
pub struct ConditionalLineMaterial {
    #[uniform(0)]
    pub params: LineParams,
}

impl Material for ConditionalLineMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/conditional_line.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/conditional_line.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_EDGE_NORMAL_A.at_shader_location(1),
            ATTRIBUTE_EDGE_NORMAL_B.at_shader_location(2),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        Ok(())
    }
}

/// Thick conditional lines: ribbon expansion plus the per-frame silhouette
/// test.
#[derive(Asset, TypePath, AsBindGroup, Clone)]
pub struct ConditionalThickLineMaterial {
    #[uniform(0)]
    pub params: LineParams,
}

impl Material for ConditionalThickLineMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/conditional_thick_line.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/conditional_thick_line.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            ATTRIBUTE_SEG_START.at_shader_location(1),
            ATTRIBUTE_SEG_END.at_shader_location(2),
            ATTRIBUTE_CORNER.at_shader_location(3),
            ATTRIBUTE_EDGE_NORMAL_A.at_shader_location(4),
            ATTRIBUTE_EDGE_NORMAL_B.at_shader_location(5),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_params_default() {
        let params = LineParams::default();
        assert_eq!(params.linewidth, 1.0);
        assert_eq!(params.opacity, 1.0);
        assert_eq!(params.resolution, Vec2::ONE);
    }
}
