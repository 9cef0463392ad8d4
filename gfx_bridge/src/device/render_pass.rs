/// Render pass trait and descriptor
///
/// A render pass describes attachment formats and what happens to their
/// content when the pass begins (load op) and ends (store op).

use bitflags::bitflags;
use crate::device::TextureFormat;

bitflags! {
    /// Which channels a render pass clears on load
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearFlags: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
        const DEPTH_STENCIL = Self::DEPTH.bits() | Self::STENCIL.bits();
        const ALL = Self::COLOR.bits() | Self::DEPTH_STENCIL.bits();
    }
}

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOp {
    /// Keep existing content
    Load,
    /// Clear the content
    Clear,
    /// Existing content is undefined
    Discard,
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    /// Store the rendered content
    Store,
    /// Rendered content may be thrown away
    Discard,
}

/// Color attachment of a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAttachment {
    pub format: TextureFormat,
    /// Number of samples (1 = no MSAA)
    pub sample_count: u32,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
}

impl ColorAttachment {
    /// Single-sampled attachment that clears on load and stores on end
    pub fn new(format: TextureFormat) -> Self {
        Self {
            format,
            sample_count: 1,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
        }
    }
}

/// Depth/stencil attachment of a render pass
///
/// Depth and stencil aspects resolve their load ops independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilAttachment {
    pub format: TextureFormat,
    pub sample_count: u32,
    pub depth_load_op: LoadOp,
    pub depth_store_op: StoreOp,
    pub stencil_load_op: LoadOp,
    pub stencil_store_op: StoreOp,
}

impl DepthStencilAttachment {
    /// Single-sampled attachment that clears both aspects on load
    pub fn new(format: TextureFormat) -> Self {
        Self {
            format,
            sample_count: 1,
            depth_load_op: LoadOp::Clear,
            depth_store_op: StoreOp::Store,
            stencil_load_op: LoadOp::Clear,
            stencil_store_op: StoreOp::Store,
        }
    }
}

/// Descriptor for creating a render pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderPassInfo {
    pub color_attachments: Vec<ColorAttachment>,
    pub depth_stencil_attachment: Option<DepthStencilAttachment>,
}

/// Render pass resource trait
pub trait RenderPass: Send + Sync {
    /// Descriptor this pass was created from
    fn info(&self) -> &RenderPassInfo;
}
