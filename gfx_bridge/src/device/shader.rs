/// Shader trait, shader descriptor and reflection metadata

use crate::device::{BufferFormat, TextureType};

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment shader
    Fragment,
}

/// Source code for one shader stage
#[derive(Debug, Clone)]
pub struct ShaderStageDesc {
    /// Stage
    pub stage: ShaderStage,
    /// Backend-specific source text or bytecode
    pub source: String,
}

/// Reflected vertex input of a shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderAttribute {
    /// Attribute name
    pub name: String,
    /// Input location
    pub location: u32,
    /// Element format
    pub format: BufferFormat,
    /// Normalize integer data to [0, 1] / [-1, 1]
    pub normalized: bool,
}

/// Type of a member inside a uniform block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float,
    Vec2,
    Vec3,
    Vec4,
    Int,
    IVec2,
    IVec3,
    IVec4,
    Mat3,
    Mat4,
}

impl UniformType {
    /// Tightly packed size in bytes
    pub fn size_bytes(&self) -> u32 {
        match self {
            UniformType::Float | UniformType::Int => 4,
            UniformType::Vec2 | UniformType::IVec2 => 8,
            UniformType::Vec3 | UniformType::IVec3 => 12,
            UniformType::Vec4 | UniformType::IVec4 => 16,
            UniformType::Mat3 => 36,
            UniformType::Mat4 => 64,
        }
    }
}

/// One member of a uniform block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformMember {
    pub name: String,
    pub ty: UniformType,
    /// Array length (1 for scalars)
    pub count: u32,
}

impl UniformMember {
    /// Size in bytes of the whole member (all array elements)
    pub fn size_bytes(&self) -> u32 {
        self.ty.size_bytes() * self.count.max(1)
    }
}

/// Reflected uniform block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformBlock {
    pub name: String,
    pub set: u32,
    pub binding: u32,
    pub members: Vec<UniformMember>,
}

impl UniformBlock {
    /// Size in bytes of the block (members are tightly packed)
    pub fn size_bytes(&self) -> u32 {
        self.members.iter().map(UniformMember::size_bytes).sum()
    }
}

/// Reflected combined texture/sampler binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformSampler {
    pub name: String,
    pub set: u32,
    pub binding: u32,
    pub texture_type: TextureType,
}

/// Descriptor for creating a shader program
#[derive(Debug, Clone)]
pub struct ShaderDesc {
    /// Debug name
    pub name: String,
    /// Stages (vertex + fragment)
    pub stages: Vec<ShaderStageDesc>,
    /// Reflected vertex inputs
    pub attributes: Vec<ShaderAttribute>,
    /// Reflected uniform blocks
    pub blocks: Vec<UniformBlock>,
    /// Reflected sampled textures
    pub samplers: Vec<UniformSampler>,
}

/// Shader resource trait
///
/// A linked program (all stages). Exposes the reflection data it was built from.
pub trait Shader: Send + Sync {
    /// Debug name
    fn name(&self) -> &str;

    /// Reflected vertex inputs
    fn attributes(&self) -> &[ShaderAttribute];

    /// Reflected uniform blocks
    fn blocks(&self) -> &[UniformBlock];

    /// Reflected sampled textures
    fn samplers(&self) -> &[UniformSampler];
}
