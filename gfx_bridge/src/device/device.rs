/// Device trait - factory for every GPU object and owner of the submission queue

use std::sync::Arc;

use crate::error::Result;
use crate::device::{
    Buffer, BufferDesc, CommandList, DescriptorSet, DescriptorSetDesc, DescriptorSetLayout,
    DescriptorSetLayoutDesc, Framebuffer, FramebufferDesc, InputAssembler, InputAssemblerDesc,
    PipelineLayout, PipelineLayoutDesc, PipelineState, PipelineStateDesc, RenderPass,
    RenderPassInfo, Sampler, SamplerDesc, Shader, ShaderDesc, Swapchain, SwapchainDesc, Texture,
    TextureDesc,
};

/// Graphics API implemented by a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceApi {
    OpenGl,
    OpenGlEs,
    WebGl,
    Vulkan,
    Metal,
}

/// Framebuffer coordinate origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// (0, 0) is the bottom-left pixel (GL family)
    BottomLeft,
    /// (0, 0) is the top-left pixel
    TopLeft,
}

impl DeviceApi {
    /// Coordinate origin used by this API's framebuffers
    pub fn origin(&self) -> Origin {
        match self {
            DeviceApi::OpenGl | DeviceApi::OpenGlEs | DeviceApi::WebGl => Origin::BottomLeft,
            DeviceApi::Vulkan | DeviceApi::Metal => Origin::TopLeft,
        }
    }
}

/// Device statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Draw calls submitted in the last flushed frame
    pub draw_calls: u32,
    /// Frames presented since creation
    pub frames_presented: u64,
    /// GPU memory used (bytes)
    pub gpu_memory_used: u64,
}

/// Main device trait
///
/// The central factory for GPU objects. Creation fails only for invalid
/// descriptors (zero dimensions, unknown format) or exhausted memory.
///
/// Devices are constructed explicitly and shared as `Arc<Mutex<dyn Device>>`.
pub trait Device: Send + Sync {
    /// API implemented by this device
    fn api(&self) -> DeviceApi;

    /// Create a swapchain for a window surface
    fn create_swapchain(&mut self, desc: &SwapchainDesc) -> Result<Box<dyn Swapchain>>;

    /// Create a render pass
    fn create_render_pass(&mut self, info: &RenderPassInfo) -> Result<Arc<dyn RenderPass>>;

    /// Create a framebuffer
    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>>;

    /// Create a texture
    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Arc<dyn Texture>>;

    /// Create a sampler
    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<Arc<dyn Sampler>>;

    /// Create a buffer
    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>>;

    /// Create (compile and link) a shader program
    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<Arc<dyn Shader>>;

    /// Create a descriptor set layout
    fn create_descriptor_set_layout(
        &mut self,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>>;

    /// Create a pipeline layout
    fn create_pipeline_layout(&mut self, desc: &PipelineLayoutDesc) -> Result<Arc<dyn PipelineLayout>>;

    /// Create a descriptor set
    fn create_descriptor_set(&mut self, desc: &DescriptorSetDesc) -> Result<Arc<dyn DescriptorSet>>;

    /// Create a pipeline state object
    fn create_pipeline_state(&mut self, desc: &PipelineStateDesc) -> Result<Arc<dyn PipelineState>>;

    /// Create an input assembler
    fn create_input_assembler(&mut self, desc: &InputAssemblerDesc) -> Result<Arc<dyn InputAssembler>>;

    /// Create a primary command list
    fn create_command_list(&mut self) -> Result<Box<dyn CommandList>>;

    /// Block until every listed swapchain has a presentable image
    ///
    /// Must be called once per frame before recording.
    fn acquire(&mut self, swapchains: &mut [Box<dyn Swapchain>]) -> Result<()>;

    /// Flush recorded commands to the backend
    fn flush_commands(&mut self, lists: &[&dyn CommandList]) -> Result<()>;

    /// Submit command lists to the graphics queue
    fn submit(&mut self, lists: &[&dyn CommandList]) -> Result<()>;

    /// Present acquired swapchain images
    ///
    /// Blocks until the previous frame's work on the presented image has been submitted.
    fn present(&mut self) -> Result<()>;

    /// Wait for all GPU operations to complete
    fn wait_idle(&self) -> Result<()>;

    /// Get statistics about the device
    fn stats(&self) -> DeviceStats;
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
