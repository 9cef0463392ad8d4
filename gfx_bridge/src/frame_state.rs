/// Mutable per-frame drawing state held by the command buffer

use crate::device::{CullMode, Extent2D, Rect2D};
use crate::types::Winding;

/// State accumulated by setter calls
///
/// Survives render passes and frames. Only the view size changes on resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Viewport in bottom-left client coordinates
    pub viewport: Rect2D,
    /// Scissor in bottom-left client coordinates
    pub scissor: Rect2D,
    pub scissor_enabled: bool,
    pub cull_mode: CullMode,
    pub winding: Winding,
    pub line_width: f32,
    pub stencil_ref_front: u32,
    pub stencil_ref_back: u32,
    /// Size of the window/view the default framebuffer covers
    pub view_size: Extent2D,
}

impl FrameState {
    pub fn new(view_size: Extent2D, line_width: f32) -> Self {
        Self {
            viewport: Rect2D::new(0, 0, view_size.width, view_size.height),
            scissor: Rect2D::default(),
            scissor_enabled: false,
            cull_mode: CullMode::None,
            winding: Winding::default(),
            line_width,
            stencil_ref_front: 0,
            stencil_ref_back: 0,
            view_size,
        }
    }

    /// Rectangle that draws are clipped to: the scissor when enabled, else the viewport
    pub fn draw_rect(&self) -> Rect2D {
        if self.scissor_enabled {
            self.scissor
        } else {
            self.viewport
        }
    }
}
