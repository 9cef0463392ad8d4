/// Buffer trait, buffer descriptor and element formats

use crate::error::Result;

/// Buffer usage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Vertex buffer
    Vertex,
    /// Index buffer
    Index,
    /// Uniform/constant buffer
    Uniform,
    /// Storage buffer
    Storage,
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Size of one element in bytes (vertex size, index size; 0 = unspecified)
    pub stride: u32,
    /// Buffer usage
    pub usage: BufferUsage,
}

/// Buffer data format for vertex attributes
///
/// Defines the data type and component count of one attribute element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum BufferFormat {
    // Float formats
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,

    // Integer formats (signed)
    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,

    // Short formats (signed)
    R16G16_SINT,
    R16G16B16A16_SINT,

    // Short formats (unsigned)
    R16G16_UINT,

    // Byte formats (unsigned)
    R8G8B8A8_UINT,
    R8G8B8A8_UNORM,
}

impl BufferFormat {
    /// Returns size in bytes for this format
    pub fn size_bytes(&self) -> u32 {
        match self {
            BufferFormat::R32_SFLOAT | BufferFormat::R32_SINT => 4,
            BufferFormat::R32G32_SFLOAT | BufferFormat::R32G32_SINT => 8,
            BufferFormat::R32G32B32_SFLOAT | BufferFormat::R32G32B32_SINT => 12,
            BufferFormat::R32G32B32A32_SFLOAT | BufferFormat::R32G32B32A32_SINT => 16,
            BufferFormat::R16G16_SINT | BufferFormat::R16G16_UINT => 4,
            BufferFormat::R16G16B16A16_SINT => 8,
            BufferFormat::R8G8B8A8_UINT | BufferFormat::R8G8B8A8_UNORM => 4,
        }
    }
}

/// Index buffer element type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexType {
    /// 16-bit indices (max 65535 vertices)
    U16,
    /// 32-bit indices
    U32,
}

impl IndexType {
    /// Size in bytes of one index element
    pub fn size_bytes(&self) -> u32 {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Buffer resource trait
///
/// Implemented by backend-specific buffer types.
/// The buffer is destroyed when the last `Arc` is dropped.
pub trait Buffer: Send + Sync {
    /// Update buffer data
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset into the buffer in bytes
    /// * `data` - Data to write
    fn update(&self, offset: u64, data: &[u8]) -> Result<()>;

    /// Size in bytes
    fn size(&self) -> u64;

    /// Element stride in bytes (0 when the creator left it unspecified)
    fn stride(&self) -> u32;

    /// Usage the buffer was created with
    fn usage(&self) -> BufferUsage;
}
