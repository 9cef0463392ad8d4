/// Programs and program states
///
/// A `Program` is a linked shader plus its default descriptor-set and pipeline
/// layouts. A `ProgramState` is one instance of a program's bindings: its own
/// descriptor set, one uniform buffer per block with a CPU mirror, bound
/// textures, per-draw uniform callbacks and an optional vertex layout.

use std::sync::{Arc, Mutex};

use bytemuck::Pod;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::device::{
    Buffer, BufferDesc, BufferUsage, DescriptorSet, DescriptorSetDesc, DescriptorSetLayout,
    DescriptorSetLayoutBinding, DescriptorSetLayoutDesc, DescriptorType, Device, PipelineLayout,
    PipelineLayoutDesc, Shader, ShaderAttribute, ShaderDesc, ShaderStage, ShaderStageDesc,
    UniformBlock, UniformSampler,
};
use crate::error::{Error, Result};
use crate::texture::TextureBackend;
use crate::vertex_layout::VertexLayout;
use crate::{engine_debug, engine_warn};

/// Descriptor for creating a program
#[derive(Debug, Clone)]
pub struct ProgramDesc {
    pub name: String,
    pub vertex_source: String,
    pub fragment_source: String,
    /// Reflected vertex inputs
    pub attributes: Vec<ShaderAttribute>,
    /// Reflected uniform blocks (descriptor set 0)
    pub blocks: Vec<UniformBlock>,
    /// Reflected sampled textures (descriptor set 0)
    pub samplers: Vec<UniformSampler>,
}

/// Linked shader with its default layouts
pub struct Program {
    shader: Arc<dyn Shader>,
    set_layout: Arc<dyn DescriptorSetLayout>,
    pipeline_layout: Arc<dyn PipelineLayout>,
}

impl Program {
    /// Create a program
    ///
    /// Returns `Error::InvalidResource` when the description does not validate
    /// (missing stage source, bindings outside set 0, duplicate binding or location).
    pub fn new(device: &mut dyn Device, desc: ProgramDesc) -> Result<Arc<Self>> {
        Self::validate(&desc)?;

        let mut bindings = Vec::with_capacity(desc.blocks.len() + desc.samplers.len());
        for block in &desc.blocks {
            bindings.push(DescriptorSetLayoutBinding {
                binding: block.binding,
                descriptor_type: DescriptorType::UniformBuffer,
                count: 1,
                stages: vec![ShaderStage::Vertex, ShaderStage::Fragment],
            });
        }
        for sampler in &desc.samplers {
            bindings.push(DescriptorSetLayoutBinding {
                binding: sampler.binding,
                descriptor_type: DescriptorType::SampledTexture,
                count: 1,
                stages: vec![ShaderStage::Vertex, ShaderStage::Fragment],
            });
        }

        let shader = device.create_shader(&ShaderDesc {
            name: desc.name.clone(),
            stages: vec![
                ShaderStageDesc { stage: ShaderStage::Vertex, source: desc.vertex_source },
                ShaderStageDesc { stage: ShaderStage::Fragment, source: desc.fragment_source },
            ],
            attributes: desc.attributes,
            blocks: desc.blocks,
            samplers: desc.samplers,
        })?;
        let set_layout = device.create_descriptor_set_layout(&DescriptorSetLayoutDesc { bindings })?;
        let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDesc {
            set_layouts: vec![set_layout.clone()],
        })?;

        engine_debug!("gfx_bridge::Program", "Program '{}' created", desc.name);

        Ok(Arc::new(Self {
            shader,
            set_layout,
            pipeline_layout,
        }))
    }

    fn validate(desc: &ProgramDesc) -> Result<()> {
        if desc.vertex_source.trim().is_empty() || desc.fragment_source.trim().is_empty() {
            return Err(Error::InvalidResource(format!(
                "program '{}' is missing a stage source",
                desc.name
            )));
        }

        let mut bindings = FxHashSet::default();
        let slots = desc
            .blocks
            .iter()
            .map(|b| (b.name.as_str(), b.set, b.binding))
            .chain(desc.samplers.iter().map(|s| (s.name.as_str(), s.set, s.binding)));
        for (name, set, binding) in slots {
            if set != 0 {
                return Err(Error::InvalidResource(format!(
                    "program '{}': '{}' uses descriptor set {}, only set 0 is supported",
                    desc.name, name, set
                )));
            }
            if !bindings.insert(binding) {
                return Err(Error::InvalidResource(format!(
                    "program '{}': binding {} declared twice ('{}')",
                    desc.name, binding, name
                )));
            }
        }

        let mut locations = FxHashSet::default();
        for attribute in &desc.attributes {
            if !locations.insert(attribute.location) {
                return Err(Error::InvalidResource(format!(
                    "program '{}': attribute location {} declared twice ('{}')",
                    desc.name, attribute.location, attribute.name
                )));
            }
        }
        Ok(())
    }

    /// Linked device shader
    pub fn shader(&self) -> &Arc<dyn Shader> {
        &self.shader
    }

    /// Layout of descriptor set 0
    pub fn descriptor_set_layout(&self) -> &Arc<dyn DescriptorSetLayout> {
        &self.set_layout
    }

    /// Pipeline layout holding the default descriptor set layout
    pub fn default_pipeline_layout(&self) -> &Arc<dyn PipelineLayout> {
        &self.pipeline_layout
    }

    /// Reflected vertex inputs
    pub fn attributes(&self) -> &[ShaderAttribute] {
        self.shader.attributes()
    }
}

// ===== PROGRAM STATE =====

/// Callback invoked right before each draw that uses the program state
///
/// Receives the state and the uniform name it was registered for.
pub type UniformCallback = Arc<dyn Fn(&mut ProgramState, &str) + Send + Sync>;

/// Program state shared between the client and the command buffer
pub type SharedProgramState = Arc<Mutex<ProgramState>>;

/// Where a uniform member lives inside the program state's blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    /// Index of the block
    pub block: usize,
    /// Byte offset inside the block
    pub offset: u32,
    /// Size in bytes of the member
    pub size: u32,
}

struct BlockState {
    binding: u32,
    buffer: Arc<dyn Buffer>,
    data: Vec<u8>,
    dirty: bool,
}

/// One set of bindings for a program
pub struct ProgramState {
    program: Arc<Program>,
    descriptor_set: Arc<dyn DescriptorSet>,
    blocks: Vec<BlockState>,
    locations: FxHashMap<String, UniformLocation>,
    textures: FxHashMap<u32, Arc<TextureBackend>>,
    callbacks: Vec<(String, UniformCallback)>,
    vertex_layout: Option<VertexLayout>,
}

impl ProgramState {
    /// Create the descriptor set and one uniform buffer per block
    pub fn new(device: &mut dyn Device, program: Arc<Program>) -> Result<Self> {
        let descriptor_set = device.create_descriptor_set(&DescriptorSetDesc {
            layout: program.descriptor_set_layout().clone(),
        })?;

        let mut blocks = Vec::new();
        let mut locations = FxHashMap::default();
        for (index, block) in program.shader().blocks().iter().enumerate() {
            let size = block.size_bytes();
            let buffer = device.create_buffer(&BufferDesc {
                size: u64::from(size.max(4)),
                stride: 0,
                usage: BufferUsage::Uniform,
            })?;

            let mut offset = 0;
            for member in &block.members {
                let location = UniformLocation {
                    block: index,
                    offset,
                    size: member.size_bytes(),
                };
                locations.insert(format!("{}.{}", block.name, member.name), location);
                locations.entry(member.name.clone()).or_insert(location);
                offset += member.size_bytes();
            }

            blocks.push(BlockState {
                binding: block.binding,
                buffer,
                data: vec![0; size as usize],
                dirty: true,
            });
        }

        Ok(Self {
            program,
            descriptor_set,
            blocks,
            locations,
            textures: FxHashMap::default(),
            callbacks: Vec::new(),
            vertex_layout: None,
        })
    }

    /// Wrap for sharing with a command buffer
    pub fn shared(self) -> SharedProgramState {
        Arc::new(Mutex::new(self))
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn descriptor_set(&self) -> &Arc<dyn DescriptorSet> {
        &self.descriptor_set
    }

    /// Look up a member by `"member"` or `"block.member"`
    pub fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.locations.get(name).copied()
    }

    /// Write a plain-old-data value into a uniform member
    pub fn set_uniform<T: Pod>(&mut self, name: &str, value: &T) -> Result<()> {
        self.set_uniform_bytes(name, bytemuck::bytes_of(value))
    }

    /// Write raw bytes into a uniform member (may be shorter than the member)
    pub fn set_uniform_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        let location = self
            .uniform_location(name)
            .ok_or_else(|| Error::InvalidResource(format!("unknown uniform '{}'", name)))?;
        if bytes.len() > location.size as usize {
            return Err(Error::InvalidResource(format!(
                "uniform '{}' holds {} bytes, got {}",
                name,
                location.size,
                bytes.len()
            )));
        }
        let block = &mut self.blocks[location.block];
        let start = location.offset as usize;
        block.data[start..start + bytes.len()].copy_from_slice(bytes);
        block.dirty = true;
        Ok(())
    }

    /// Current CPU-side bytes of a uniform member
    pub fn uniform_bytes(&self, name: &str) -> Option<&[u8]> {
        let location = self.uniform_location(name)?;
        let start = location.offset as usize;
        Some(&self.blocks[location.block].data[start..start + location.size as usize])
    }

    /// Bind a texture to a reflected sampler
    pub fn set_texture(&mut self, name: &str, texture: Arc<TextureBackend>) -> Result<()> {
        let sampler = self
            .program
            .shader()
            .samplers()
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::InvalidResource(format!("unknown sampler '{}'", name)))?;
        if sampler.texture_type != texture.texture_type() {
            return Err(Error::InvalidResource(format!(
                "sampler '{}' expects {:?}, got {:?}",
                name,
                sampler.texture_type,
                texture.texture_type()
            )));
        }
        let binding = sampler.binding;
        self.textures.insert(binding, texture);
        Ok(())
    }

    /// Register a callback run before every draw using this state
    ///
    /// A callback registered again under the same name replaces the previous one.
    pub fn set_callback_uniform(&mut self, name: &str, callback: UniformCallback) {
        if self.uniform_location(name).is_none() {
            engine_warn!("gfx_bridge::ProgramState", "callback for unknown uniform '{}'", name);
        }
        match self.callbacks.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = callback,
            None => self.callbacks.push((name.to_string(), callback)),
        }
    }

    /// Invoke every registered uniform callback
    pub fn run_callbacks(&mut self) {
        let callbacks = self.callbacks.clone();
        for (name, callback) in &callbacks {
            callback(self, name);
        }
    }

    pub fn set_vertex_layout(&mut self, layout: VertexLayout) {
        self.vertex_layout = Some(layout);
    }

    pub fn vertex_layout(&self) -> Option<&VertexLayout> {
        self.vertex_layout.as_ref()
    }

    /// Upload dirty blocks, bind buffers and textures, then commit the descriptor set
    pub fn apply_bindings(&mut self) -> Result<()> {
        for block in &mut self.blocks {
            if block.dirty {
                block.buffer.update(0, &block.data)?;
                block.dirty = false;
            }
            self.descriptor_set.bind_buffer(block.binding, block.buffer.clone());
        }
        for (binding, texture) in &self.textures {
            self.descriptor_set.bind_texture(
                *binding,
                texture.handler().clone(),
                Some(texture.sampler().clone()),
            );
        }
        self.descriptor_set.update()
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
