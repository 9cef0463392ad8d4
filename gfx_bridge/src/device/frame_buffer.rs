/// Framebuffer trait - binds concrete attachment textures to a render pass

use std::sync::Arc;
use crate::device::{RenderPass, Texture};

/// Framebuffer: color and depth/stencil attachments bound to a render pass
///
/// Holds strong references to its attachments and render pass.
/// Created via `Device::create_framebuffer()`.
pub trait Framebuffer: Send + Sync {
    /// Render pass this framebuffer is compatible with
    fn render_pass(&self) -> &Arc<dyn RenderPass>;

    /// Color attachments
    fn color_textures(&self) -> &[Arc<dyn Texture>];

    /// Optional depth/stencil attachment
    fn depth_stencil_texture(&self) -> Option<&Arc<dyn Texture>>;

    /// Width in pixels (from the first attachment)
    fn width(&self) -> u32;

    /// Height in pixels (from the first attachment)
    fn height(&self) -> u32;
}

/// Descriptor for creating a framebuffer
#[derive(Clone)]
pub struct FramebufferDesc {
    /// The render pass this framebuffer is compatible with
    pub render_pass: Arc<dyn RenderPass>,
    /// Color attachments
    pub color_textures: Vec<Arc<dyn Texture>>,
    /// Optional depth/stencil attachment
    pub depth_stencil_texture: Option<Arc<dyn Texture>>,
}
