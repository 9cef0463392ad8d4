/// Client textures
///
/// `TextureBackend` is a closed sum over the texture kinds the engine knows about.
/// Each variant owns its device texture (`handler`) and sampler, so the command
/// buffer never needs to downcast.

use std::sync::Arc;

use crate::device::{
    AddressMode, Device, DeviceApi, Filter, Sampler, SamplerDesc, Texture, TextureDesc,
    TextureFormat, TextureInfo, TextureType, TextureUsageFlags,
};
use crate::engine_debug;
use crate::error::{Error, Result};

/// How the client intends to use a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureUsage {
    /// Sampled only, uploaded once
    #[default]
    Read,
    /// Sampled, updated by the CPU
    Write,
    /// Rendered into (color or depth-stencil attachment)
    RenderTarget,
}

/// Client sampler filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerFilter {
    Nearest,
    #[default]
    Linear,
    NearestMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapNearest,
    LinearMipmapLinear,
    DontCare,
}

/// Client texture addressing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SamplerAddressMode {
    #[default]
    Repeat,
    MirrorRepeat,
    ClampToEdge,
}

/// Client sampler description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SamplerDescriptor {
    pub mag_filter: SamplerFilter,
    pub min_filter: SamplerFilter,
    pub s_address_mode: SamplerAddressMode,
    pub t_address_mode: SamplerAddressMode,
}

/// Client texture description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureDescriptor {
    pub texture_type: TextureType,
    pub format: TextureFormat,
    pub usage: TextureUsage,
    pub width: u32,
    pub height: u32,
    pub sampler: SamplerDescriptor,
}

impl TextureDescriptor {
    /// 2D texture with the default sampler
    pub fn tex2d(format: TextureFormat, usage: TextureUsage, width: u32, height: u32) -> Self {
        Self {
            texture_type: TextureType::Tex2D,
            format,
            usage,
            width,
            height,
            sampler: SamplerDescriptor::default(),
        }
    }
}

// ===== MAPPING RULES =====

/// Device usage bits for a client usage and format
pub fn device_usage(usage: TextureUsage, format: TextureFormat) -> TextureUsageFlags {
    match usage {
        TextureUsage::RenderTarget if format == TextureFormat::STANDARD_DEPTH_STENCIL => {
            TextureUsageFlags::DEPTH_STENCIL_ATTACHMENT | TextureUsageFlags::SAMPLED
        }
        TextureUsage::RenderTarget => TextureUsageFlags::COLOR_ATTACHMENT | TextureUsageFlags::SAMPLED,
        TextureUsage::Read | TextureUsage::Write => {
            TextureUsageFlags::TRANSFER_DST | TextureUsageFlags::SAMPLED
        }
    }
}

/// Mip filter implied by a min filter
pub fn mip_filter(min_filter: SamplerFilter) -> Filter {
    match min_filter {
        SamplerFilter::NearestMipmapNearest | SamplerFilter::LinearMipmapNearest => Filter::Point,
        SamplerFilter::NearestMipmapLinear | SamplerFilter::LinearMipmapLinear => Filter::Linear,
        SamplerFilter::Nearest | SamplerFilter::Linear | SamplerFilter::DontCare => Filter::None,
    }
}

fn texel_filter(filter: SamplerFilter) -> Filter {
    match filter {
        SamplerFilter::Nearest
        | SamplerFilter::NearestMipmapNearest
        | SamplerFilter::NearestMipmapLinear => Filter::Point,
        SamplerFilter::Linear
        | SamplerFilter::LinearMipmapNearest
        | SamplerFilter::LinearMipmapLinear
        | SamplerFilter::DontCare => Filter::Linear,
    }
}

fn address_mode(mode: SamplerAddressMode, clamp_only: bool) -> AddressMode {
    if clamp_only {
        return AddressMode::Clamp;
    }
    match mode {
        SamplerAddressMode::Repeat => AddressMode::Wrap,
        SamplerAddressMode::MirrorRepeat => AddressMode::Mirror,
        SamplerAddressMode::ClampToEdge => AddressMode::Clamp,
    }
}

fn is_pow2(n: u32) -> bool {
    n != 0 && n & (n - 1) == 0
}

/// Number of mip levels of a full chain for the given size
fn full_mip_chain(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// Sampler settings and mip count resolved for one texture on one API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedSampling {
    pub sampler: SamplerDesc,
    pub mip_levels: u32,
}

/// Apply the sampler mapping rules
///
/// WebGL cannot mip or repeat non-power-of-two textures, so those get a single
/// level and clamp-to-edge addressing.
pub fn resolve_sampling(desc: &TextureDescriptor, api: DeviceApi) -> ResolvedSampling {
    let npot_restricted =
        api == DeviceApi::WebGl && !(is_pow2(desc.width) && is_pow2(desc.height));

    let mut mip = Filter::None;
    if !desc.format.is_compressed() && !npot_restricted {
        mip = mip_filter(desc.sampler.min_filter);
    }
    let mip_levels = if mip == Filter::None {
        1
    } else {
        full_mip_chain(desc.width, desc.height)
    };

    ResolvedSampling {
        sampler: SamplerDesc {
            min_filter: texel_filter(desc.sampler.min_filter),
            mag_filter: texel_filter(desc.sampler.mag_filter),
            mip_filter: mip,
            address_u: address_mode(desc.sampler.s_address_mode, npot_restricted),
            address_v: address_mode(desc.sampler.t_address_mode, npot_restricted),
            address_w: address_mode(desc.sampler.t_address_mode, npot_restricted),
            max_anisotropy: 0,
        },
        mip_levels,
    }
}

// ===== TEXTURE KINDS =====

/// Device objects and client metadata shared by every texture kind
struct TextureParts {
    usage: TextureUsage,
    handler: Arc<dyn Texture>,
    sampler: Arc<dyn Sampler>,
}

impl TextureParts {
    fn create(device: &mut dyn Device, desc: &TextureDescriptor, array_layers: u32) -> Result<Self> {
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidResource(format!(
                "texture size {}x{}",
                desc.width, desc.height
            )));
        }
        if desc.format == TextureFormat::Undefined {
            return Err(Error::InvalidResource("texture format is undefined".to_string()));
        }

        let sampling = resolve_sampling(desc, device.api());
        let handler = device.create_texture(&TextureDesc {
            texture_type: desc.texture_type,
            format: desc.format,
            usage: device_usage(desc.usage, desc.format),
            width: desc.width,
            height: desc.height,
            array_layers,
            mip_levels: sampling.mip_levels,
        })?;
        let sampler = device.create_sampler(&sampling.sampler)?;

        engine_debug!(
            "gfx_bridge::Texture",
            "{:?} texture {}x{} {:?} ({} mips)",
            desc.texture_type,
            desc.width,
            desc.height,
            desc.format,
            sampling.mip_levels
        );

        Ok(Self {
            usage: desc.usage,
            handler,
            sampler,
        })
    }
}

/// 2D texture
pub struct Texture2D {
    parts: TextureParts,
}

impl Texture2D {
    pub fn new(device: &mut dyn Device, desc: &TextureDescriptor) -> Result<Self> {
        Ok(Self {
            parts: TextureParts::create(device, desc, 1)?,
        })
    }

    /// True when a mip chain was requested by the sampler
    pub fn has_mipmaps(&self) -> bool {
        self.parts.handler.info().mip_levels > 1
    }
}

/// Cubemap texture (6 square faces)
pub struct TextureCube {
    parts: TextureParts,
}

impl TextureCube {
    pub const FACE_COUNT: u32 = 6;

    pub fn new(device: &mut dyn Device, desc: &TextureDescriptor) -> Result<Self> {
        if desc.width != desc.height {
            return Err(Error::InvalidResource(format!(
                "cubemap faces must be square, got {}x{}",
                desc.width, desc.height
            )));
        }
        Ok(Self {
            parts: TextureParts::create(device, desc, Self::FACE_COUNT)?,
        })
    }

    /// Edge length of one face in pixels
    pub fn face_size(&self) -> u32 {
        self.parts.handler.info().width
    }
}

/// Any client texture
pub enum TextureBackend {
    Texture2D(Texture2D),
    TextureCube(TextureCube),
}

impl TextureBackend {
    /// Create the variant matching `desc.texture_type`
    pub fn new(device: &mut dyn Device, desc: &TextureDescriptor) -> Result<Self> {
        match desc.texture_type {
            TextureType::Tex2D => Texture2D::new(device, desc).map(TextureBackend::Texture2D),
            TextureType::Cube => TextureCube::new(device, desc).map(TextureBackend::TextureCube),
        }
    }

    fn parts(&self) -> &TextureParts {
        match self {
            TextureBackend::Texture2D(t) => &t.parts,
            TextureBackend::TextureCube(t) => &t.parts,
        }
    }

    /// Device texture
    pub fn handler(&self) -> &Arc<dyn Texture> {
        &self.parts().handler
    }

    /// Device sampler
    pub fn sampler(&self) -> &Arc<dyn Sampler> {
        &self.parts().sampler
    }

    pub fn texture_type(&self) -> TextureType {
        match self {
            TextureBackend::Texture2D(_) => TextureType::Tex2D,
            TextureBackend::TextureCube(_) => TextureType::Cube,
        }
    }

    pub fn usage(&self) -> TextureUsage {
        self.parts().usage
    }

    pub fn info(&self) -> &TextureInfo {
        self.parts().handler.info()
    }

    pub fn format(&self) -> TextureFormat {
        self.info().format
    }

    pub fn width(&self) -> u32 {
        self.info().width
    }

    pub fn height(&self) -> u32 {
        self.info().height
    }
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
