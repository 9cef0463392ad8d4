/// Descriptor set layouts and descriptor sets
///
/// A descriptor set binds uniform buffers and textures to shader-visible slots.
/// Bindings are staged with `bind_*` and committed with `update()`.

use std::sync::Arc;
use crate::error::Result;
use crate::device::{Buffer, Sampler, ShaderStage, Texture};

/// Kind of resource bound at a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorType {
    /// Uniform buffer
    UniformBuffer,
    /// Combined texture + sampler
    SampledTexture,
}

/// One slot of a descriptor set layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptorSetLayoutBinding {
    pub binding: u32,
    pub descriptor_type: DescriptorType,
    pub count: u32,
    pub stages: Vec<ShaderStage>,
}

/// Descriptor for creating a descriptor set layout
#[derive(Debug, Clone, Default)]
pub struct DescriptorSetLayoutDesc {
    pub bindings: Vec<DescriptorSetLayoutBinding>,
}

/// Descriptor set layout resource trait
pub trait DescriptorSetLayout: Send + Sync {
    /// Slots declared by this layout
    fn bindings(&self) -> &[DescriptorSetLayoutBinding];
}

/// Descriptor for creating a descriptor set
#[derive(Clone)]
pub struct DescriptorSetDesc {
    pub layout: Arc<dyn DescriptorSetLayout>,
}

/// Descriptor set resource trait
///
/// Staged bindings hold strong references, so bound resources stay alive
/// as long as the set does.
pub trait DescriptorSet: Send + Sync {
    /// Stage a uniform buffer at a binding slot
    fn bind_buffer(&self, binding: u32, buffer: Arc<dyn Buffer>);

    /// Stage a texture (and optional sampler) at a binding slot
    fn bind_texture(&self, binding: u32, texture: Arc<dyn Texture>, sampler: Option<Arc<dyn Sampler>>);

    /// Commit staged bindings to the device
    fn update(&self) -> Result<()>;
}
