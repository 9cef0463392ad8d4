/// Per-draw assembly of pipeline state descriptions
///
/// The vertex layout is only known once a program state is bound, so a full
/// pipeline description is assembled right before every draw and turned into a
/// device object that lives until the end of the frame.

use std::sync::Arc;

use crate::depth_stencil::DepthStencilState;
use crate::device::{
    BlendState, CommandList, DepthStencilDesc, Device, DynamicStateFlags, PipelineState,
    PipelineStateDesc, RasterizerState, RenderPass, Shader, VertexAttribute,
};
use crate::error::Result;
use crate::frame_state::FrameState;
use crate::render_pipeline::RenderPipeline;
use crate::transient_pool::TransientPool;
use crate::types::PrimitiveType;
use crate::vertex_layout::VertexLayout;

/// Vertex attributes for a draw
///
/// A valid client layout wins. Otherwise the shader's reflected inputs are
/// packed back to back in declaration order.
pub fn resolve_attributes(layout: Option<&VertexLayout>, shader: &dyn Shader) -> Vec<VertexAttribute> {
    if let Some(attributes) = layout
        .map(VertexLayout::to_vertex_attributes)
        .filter(|attributes| !attributes.is_empty())
    {
        return attributes;
    }

    let mut offset = 0;
    shader
        .attributes()
        .iter()
        .map(|attribute| {
            let resolved = VertexAttribute {
                name: attribute.name.clone(),
                location: attribute.location,
                format: attribute.format,
                normalized: attribute.normalized,
                offset,
            };
            offset += attribute.format.size_bytes();
            resolved
        })
        .collect()
}

/// Everything a pipeline state is derived from
pub struct PipelineInputs<'a> {
    pub render_pipeline: &'a RenderPipeline,
    pub render_pass: &'a Arc<dyn RenderPass>,
    pub attributes: Vec<VertexAttribute>,
    pub primitive: PrimitiveType,
    pub frame: &'a FrameState,
    pub depth_stencil: Option<&'a DepthStencilState>,
}

impl PipelineInputs<'_> {
    /// Assemble the device description
    ///
    /// Only the line width is dynamic; viewport and scissor are baked in.
    pub fn describe(self) -> PipelineStateDesc {
        let program = self.render_pipeline.program();

        let mut depth_stencil = DepthStencilDesc::disabled();
        match self.depth_stencil {
            Some(state) => state.apply(
                &mut depth_stencil,
                self.frame.stencil_ref_front,
                self.frame.stencil_ref_back,
            ),
            None => DepthStencilState::reset(&mut depth_stencil),
        }

        let mut blend = BlendState::default();
        if let Some(target) = blend.targets.first_mut() {
            self.render_pipeline.apply(target);
        }

        PipelineStateDesc {
            shader: program.shader().clone(),
            pipeline_layout: program.default_pipeline_layout().clone(),
            render_pass: self.render_pass.clone(),
            attributes: self.attributes,
            topology: self.primitive.to_topology(),
            rasterizer: RasterizerState {
                cull_mode: self.frame.cull_mode,
                front_face: self.frame.winding.to_front_face(),
                line_width: self.frame.line_width,
            },
            depth_stencil,
            blend,
            dynamic_states: DynamicStateFlags::LINE_WIDTH,
        }
    }
}

/// Create the pipeline state, keep it alive for the frame and bind it
pub fn realize(
    device: &mut dyn Device,
    desc: &PipelineStateDesc,
    pool: &mut TransientPool,
    commands: &mut dyn CommandList,
) -> Result<Arc<dyn PipelineState>> {
    let pipeline_state = device.create_pipeline_state(desc)?;
    pool.push_pipeline_state(pipeline_state.clone());
    commands.bind_pipeline_state(&pipeline_state)?;
    Ok(pipeline_state)
}

#[cfg(test)]
#[path = "pipeline_builder_tests.rs"]
mod tests;
