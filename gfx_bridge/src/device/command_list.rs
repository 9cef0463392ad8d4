/// CommandList trait - for recording rendering commands

use std::sync::Arc;
use crate::error::Result;
use crate::device::{
    DescriptorSet, DrawInfo, Framebuffer, InputAssembler, PipelineState, RenderPass,
};

/// Command list for recording rendering commands
///
/// Commands are recorded and later submitted via `Device::submit()`.
pub trait CommandList: Send + Sync {
    /// Begin recording commands
    fn begin(&mut self) -> Result<()>;

    /// End recording commands
    fn end(&mut self) -> Result<()>;

    /// Begin a render pass
    ///
    /// # Arguments
    ///
    /// * `render_pass` - The render pass to begin
    /// * `framebuffer` - The framebuffer containing the attachments
    /// * `render_area` - Rectangle used as both viewport and scissor for the pass
    /// * `clear_values` - Clear values for attachments
    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()>;

    /// End the current render pass
    fn end_render_pass(&mut self) -> Result<()>;

    /// Set the viewport
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Set the scissor rectangle
    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()>;

    /// Bind a pipeline state object
    fn bind_pipeline_state(&mut self, pipeline: &Arc<dyn PipelineState>) -> Result<()>;

    /// Bind a descriptor set at a set index
    fn bind_descriptor_set(&mut self, set_index: u32, set: &Arc<dyn DescriptorSet>) -> Result<()>;

    /// Bind an input assembler (vertex + optional index buffer)
    fn bind_input_assembler(&mut self, input_assembler: &Arc<dyn InputAssembler>) -> Result<()>;

    /// Issue a draw with the bound state
    fn draw(&mut self, info: &DrawInfo) -> Result<()>;
}

/// Viewport dimensions and depth range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

impl From<Rect2D> for Viewport {
    fn from(rect: Rect2D) -> Self {
        Self {
            x: rect.x as f32,
            y: rect.y as f32,
            width: rect.width as f32,
            height: rect.height as f32,
            min_depth: 0.0,
            max_depth: 1.0,
        }
    }
}

/// 2D rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect2D {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }
}

/// 2D extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Extent2D {
    pub width: u32,
    pub height: u32,
}

impl Extent2D {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Clear value for an attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClearValue {
    /// Color clear value (RGBA)
    Color([f32; 4]),
    /// Depth/stencil clear value
    DepthStencil { depth: f32, stencil: u32 },
}
