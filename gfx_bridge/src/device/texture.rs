/// Texture and sampler traits, descriptors and formats

use bitflags::bitflags;

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    /// Unknown / unsupported format
    Undefined,

    // Color formats
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R5G6B5_UNORM,
    R4G4B4A4_UNORM,
    R32G32B32A32_SFLOAT,

    // Depth/stencil formats
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,

    // Compressed formats
    BC1_RGBA_UNORM,
    BC3_RGBA_UNORM,
    ETC2_RGB8_UNORM,
    ASTC_4x4_UNORM,
}

impl TextureFormat {
    /// Standard 4x8-bit color format used for render targets
    pub const STANDARD_COLOR: TextureFormat = TextureFormat::R8G8B8A8_UNORM;

    /// Standard packed depth-stencil format used for render targets
    pub const STANDARD_DEPTH_STENCIL: TextureFormat = TextureFormat::D24_UNORM_S8_UINT;

    /// Returns true for block-compressed formats
    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            TextureFormat::BC1_RGBA_UNORM
                | TextureFormat::BC3_RGBA_UNORM
                | TextureFormat::ETC2_RGB8_UNORM
                | TextureFormat::ASTC_4x4_UNORM
        )
    }

    /// Returns true for depth or depth-stencil formats
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM | TextureFormat::D32_FLOAT | TextureFormat::D24_UNORM_S8_UINT
        )
    }

    /// Returns true if the format has a stencil aspect
    pub fn has_stencil(&self) -> bool {
        matches!(self, TextureFormat::D24_UNORM_S8_UINT)
    }
}

bitflags! {
    /// Texture usage flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsageFlags: u32 {
        const TRANSFER_SRC = 1 << 0;
        const TRANSFER_DST = 1 << 1;
        const SAMPLED = 1 << 2;
        const STORAGE = 1 << 3;
        const COLOR_ATTACHMENT = 1 << 4;
        const DEPTH_STENCIL_ATTACHMENT = 1 << 5;
    }
}

/// Texture dimensionality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureType {
    /// Simple 2D texture
    Tex2D,
    /// Cubemap (6 layers)
    Cube,
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture
#[derive(Debug, Clone)]
pub struct TextureDesc {
    /// Texture dimensionality
    pub texture_type: TextureType,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsageFlags,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of array layers (6 for cubemaps)
    pub array_layers: u32,
    /// Number of mip levels (1 = no mipmaps)
    pub mip_levels: u32,
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture.
///
/// Returned by `Texture::info()` to query texture properties
/// without exposing backend-specific details.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    /// Texture dimensionality
    pub texture_type: TextureType,
    /// Pixel format
    pub format: TextureFormat,
    /// Usage flags
    pub usage: TextureUsageFlags,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Number of array layers
    pub array_layers: u32,
    /// Number of mip levels
    pub mip_levels: u32,
}

impl From<&TextureDesc> for TextureInfo {
    fn from(desc: &TextureDesc) -> Self {
        Self {
            texture_type: desc.texture_type,
            format: desc.format,
            usage: desc.usage,
            width: desc.width,
            height: desc.height,
            array_layers: desc.array_layers,
            mip_levels: desc.mip_levels,
        }
    }
}

/// Texture resource trait
///
/// Implemented by backend-specific texture types.
/// The texture is destroyed when the last `Arc` is dropped.
pub trait Texture: Send + Sync {
    /// Get the read-only properties of this texture
    fn info(&self) -> &TextureInfo;
}

// ===== SAMPLER =====

/// Texel filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Filter {
    /// No filtering (only meaningful for the mip filter)
    None,
    /// Nearest texel
    Point,
    /// Linear interpolation
    Linear,
    /// Anisotropic filtering
    Anisotropic,
}

/// Texture coordinate addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    Wrap,
    Mirror,
    Clamp,
    Border,
}

/// Descriptor for creating a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SamplerDesc {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mip_filter: Filter,
    pub address_u: AddressMode,
    pub address_v: AddressMode,
    pub address_w: AddressMode,
    pub max_anisotropy: u32,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            mip_filter: Filter::None,
            address_u: AddressMode::Wrap,
            address_v: AddressMode::Wrap,
            address_w: AddressMode::Wrap,
            max_anisotropy: 0,
        }
    }
}

/// Sampler resource trait
pub trait Sampler: Send + Sync {
    /// Get the descriptor this sampler was created with
    fn desc(&self) -> &SamplerDesc;
}
