/// Pipeline state trait, pipeline layout and the fixed-function state descriptors

use std::sync::Arc;
use bitflags::bitflags;
use crate::device::{BufferFormat, DescriptorSetLayout, RenderPass, Shader};

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

/// Vertex attribute as consumed by pipeline states and input assemblers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute name
    pub name: String,
    /// Shader input location
    pub location: u32,
    /// Element format
    pub format: BufferFormat,
    /// Normalize integer data
    pub normalized: bool,
    /// Byte offset from the start of the vertex
    pub offset: u32,
}

// ===== RASTERIZATION =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

/// Rasterizer fixed-function state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub line_width: f32,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            front_face: FrontFace::CounterClockwise,
            line_width: 1.0,
        }
    }
}

// ===== DEPTH/STENCIL =====

/// Comparison operator for depth and stencil tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Stencil operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    IncrementAndClamp,
    DecrementAndClamp,
    Invert,
    IncrementAndWrap,
    DecrementAndWrap,
}

/// Stencil operation state (per-face)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StencilOpState {
    /// Action on stencil test fail
    pub fail_op: StencilOp,
    /// Action on stencil pass + depth pass
    pub pass_op: StencilOp,
    /// Action on stencil pass + depth fail
    pub depth_fail_op: StencilOp,
    pub compare_op: CompareOp,
    /// Bits of stencil buffer read for compare
    pub compare_mask: u32,
    /// Bits of stencil buffer written
    pub write_mask: u32,
    /// Reference value for compare/replace
    pub reference: u32,
}

impl Default for StencilOpState {
    fn default() -> Self {
        Self {
            fail_op: StencilOp::Keep,
            pass_op: StencilOp::Keep,
            depth_fail_op: StencilOp::Keep,
            compare_op: CompareOp::Always,
            compare_mask: 0xFF,
            write_mask: 0xFF,
            reference: 0,
        }
    }
}

/// Depth and stencil testing state of a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilDesc {
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: CompareOp,
    pub stencil_test_enable: bool,
    pub front: StencilOpState,
    pub back: StencilOpState,
}

impl DepthStencilDesc {
    /// Depth and stencil tests fully disabled
    pub fn disabled() -> Self {
        Self {
            depth_test_enable: false,
            depth_write_enable: false,
            depth_compare_op: CompareOp::Always,
            stencil_test_enable: false,
            front: StencilOpState::default(),
            back: StencilOpState::default(),
        }
    }
}

impl Default for DepthStencilDesc {
    fn default() -> Self {
        Self::disabled()
    }
}

// ===== COLOR BLEND =====

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    SrcAlphaSaturate,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

bitflags! {
    /// Color channels written by a blend target
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteMask: u8 {
        const R = 1 << 0;
        const G = 1 << 1;
        const B = 1 << 2;
        const A = 1 << 3;
        const ALL = Self::R.bits() | Self::G.bits() | Self::B.bits() | Self::A.bits();
    }
}

/// Blend configuration of one color attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendTarget {
    pub blend_enable: bool,
    pub src_color_factor: BlendFactor,
    pub dst_color_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_factor: BlendFactor,
    pub dst_alpha_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
    pub color_write_mask: ColorWriteMask,
}

impl Default for BlendTarget {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
            color_write_mask: ColorWriteMask::ALL,
        }
    }
}

/// Blend state: one target per color attachment
#[derive(Debug, Clone, PartialEq)]
pub struct BlendState {
    pub targets: Vec<BlendTarget>,
    pub blend_constant: [f32; 4],
}

impl Default for BlendState {
    fn default() -> Self {
        Self {
            targets: vec![BlendTarget::default()],
            blend_constant: [0.0; 4],
        }
    }
}

bitflags! {
    /// States that can change without rebuilding the pipeline state object
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DynamicStateFlags: u32 {
        const VIEWPORT = 1 << 0;
        const SCISSOR = 1 << 1;
        const LINE_WIDTH = 1 << 2;
        const DEPTH_BIAS = 1 << 3;
        const BLEND_CONSTANTS = 1 << 4;
        const STENCIL_WRITE_MASK = 1 << 5;
        const STENCIL_COMPARE_MASK = 1 << 6;
    }
}

// ===== PIPELINE LAYOUT =====

/// Descriptor for creating a pipeline layout
#[derive(Clone, Default)]
pub struct PipelineLayoutDesc {
    /// Descriptor set layouts, indexed by set number
    pub set_layouts: Vec<Arc<dyn DescriptorSetLayout>>,
}

/// Pipeline layout resource trait
pub trait PipelineLayout: Send + Sync {
    /// Number of descriptor set layouts
    fn set_layout_count(&self) -> usize;
}

// ===== PIPELINE STATE =====

/// Descriptor for creating a pipeline state object
///
/// The render pass is mandatory: a pipeline state can only be built while a pass is active.
#[derive(Clone)]
pub struct PipelineStateDesc {
    pub shader: Arc<dyn Shader>,
    pub pipeline_layout: Arc<dyn PipelineLayout>,
    pub render_pass: Arc<dyn RenderPass>,
    pub attributes: Vec<VertexAttribute>,
    pub topology: PrimitiveTopology,
    pub rasterizer: RasterizerState,
    pub depth_stencil: DepthStencilDesc,
    pub blend: BlendState,
    pub dynamic_states: DynamicStateFlags,
}

/// Pipeline state resource trait
///
/// Implemented by backend-specific pipeline types.
/// Destroyed when the last `Arc` is dropped.
pub trait PipelineState: Send + Sync {
    /// Descriptor this pipeline state was built from
    fn desc(&self) -> &PipelineStateDesc;
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
