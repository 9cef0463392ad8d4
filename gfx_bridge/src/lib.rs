/*!
# gfx_bridge

Command-buffer and resource-translation layer between a client renderer and an
abstract graphics device.

Clients record frames with a stateful protocol
(`begin_frame`, render passes, state setters, draws, `end_frame`). This crate
translates it into device objects: render passes, framebuffers, pipeline
states, input assemblers and descriptor sets. The device itself is injected as
a trait object, so any backend (Vulkan, Metal, OpenGL) can sit underneath.

## Architecture

- **Device**: factory trait for GPU objects plus submit/present
- **CommandBuffer**: frame protocol, state accumulation and per-draw pipeline assembly
- **Program / ProgramState**: shader program and its bound uniforms and textures
- **RenderPipeline / DepthStencilState**: blend and depth-stencil descriptors
- **TextureBackend**: client texture descriptors translated to device textures and samplers
- **RenderPassCache / FramebufferResolver**: render targets for each pass
*/

pub mod error;
pub mod log;
pub mod config;
pub mod device;
pub mod types;
pub mod vertex_layout;
pub mod texture;
pub mod program;
pub mod render_pipeline;
pub mod depth_stencil;
pub mod frame_state;
pub mod render_pass_cache;
pub mod transient_pool;
pub mod framebuffer_resolver;
pub mod pipeline_builder;
pub mod command_buffer;

// Main gfx namespace module
pub mod gfx {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{CommandBufferConfig, SurfaceConfig, VsyncMode};

    // Device contract
    pub use crate::device::{Device, DeviceApi};

    // Client-facing objects
    pub use crate::command_buffer::{CommandBuffer, FrameStage, FrameStats};
    pub use crate::depth_stencil::{DepthStencilDescriptor, DepthStencilState, StencilDescriptor};
    pub use crate::framebuffer_resolver::RenderPassDescriptor;
    pub use crate::program::{Program, ProgramDesc, ProgramState, SharedProgramState, UniformCallback};
    pub use crate::render_pipeline::{BlendDescriptor, PipelineDescriptor, RenderPipeline};
    pub use crate::texture::{TextureBackend, TextureDescriptor, TextureUsage};
    pub use crate::types::{PrimitiveType, Winding};
    pub use crate::vertex_layout::{VertexFormat, VertexLayout};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Device sub-module with all device types
    pub mod device {
        pub use crate::device::*;
    }
}

// Re-export math library at crate root
pub use glam;
