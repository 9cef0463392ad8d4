/// Resolution of a render pass descriptor into a concrete draw target
///
/// Two kinds of target exist:
/// - the default framebuffer, wrapping the swapchain images; built once and
///   rebuilt after a resize
/// - generated framebuffers, built from client attachments for one pass and
///   handed to the transient pool so they die at the end of the frame

use std::sync::Arc;

use crate::device::{
    ClearFlags, ClearValue, Device, Extent2D, Framebuffer, FramebufferDesc, Origin, Rect2D,
    RenderPass, Swapchain, TextureFormat, TextureType,
};
use crate::error::{Error, Result};
use crate::render_pass_cache::{RenderPassCache, RenderPassKey};
use crate::texture::{TextureBackend, TextureUsage};
use crate::transient_pool::TransientPool;
use crate::{engine_debug, engine_ensure, engine_info};

/// Declarative description of one render pass
#[derive(Clone)]
pub struct RenderPassDescriptor {
    pub clear_color_value: [f32; 4],
    pub clear_depth_value: f32,
    pub clear_stencil_value: u32,
    pub need_clear_color: bool,
    pub need_clear_depth: bool,
    pub need_clear_stencil: bool,
    pub depth_test_enabled: bool,
    pub stencil_test_enabled: bool,
    /// Render into this texture instead of the default framebuffer
    pub color_attachment: Option<Arc<TextureBackend>>,
    pub depth_attachment: Option<Arc<TextureBackend>>,
    pub stencil_attachment: Option<Arc<TextureBackend>>,
}

impl Default for RenderPassDescriptor {
    fn default() -> Self {
        Self {
            clear_color_value: [0.0, 0.0, 0.0, 0.0],
            clear_depth_value: 1.0,
            clear_stencil_value: 0,
            need_clear_color: false,
            need_clear_depth: false,
            need_clear_stencil: false,
            depth_test_enabled: false,
            stencil_test_enabled: false,
            color_attachment: None,
            depth_attachment: None,
            stencil_attachment: None,
        }
    }
}

impl RenderPassDescriptor {
    pub fn clear_flags(&self) -> ClearFlags {
        let mut flags = ClearFlags::empty();
        flags.set(ClearFlags::COLOR, self.need_clear_color);
        flags.set(ClearFlags::DEPTH, self.need_clear_depth);
        flags.set(ClearFlags::STENCIL, self.need_clear_stencil);
        flags
    }

    /// Clear values in attachment order
    pub fn clear_values(&self, has_depth_stencil: bool) -> Vec<ClearValue> {
        let mut values = vec![ClearValue::Color(self.clear_color_value)];
        if has_depth_stencil {
            values.push(ClearValue::DepthStencil {
                depth: self.clear_depth_value,
                stencil: self.clear_stencil_value,
            });
        }
        values
    }

    fn has_external_depth_stencil(&self) -> bool {
        self.depth_attachment.is_some() || self.stencil_attachment.is_some()
    }

    /// Depth-stencil texture actually bound, if the enabled tests need one
    fn used_depth_stencil(&self) -> Option<&Arc<TextureBackend>> {
        match (&self.depth_attachment, &self.stencil_attachment) {
            (Some(depth), _) if self.depth_test_enabled => Some(depth),
            (_, Some(stencil)) if self.stencil_test_enabled => Some(stencil),
            _ => None,
        }
    }
}

/// Which kind of framebuffer a pass renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Default,
    Generated,
}

/// Render pass, framebuffer and size of the pass being recorded
#[derive(Clone)]
pub struct ActiveTarget {
    pub render_pass: Arc<dyn RenderPass>,
    pub framebuffer: Arc<dyn Framebuffer>,
    pub size: Extent2D,
    pub kind: TargetKind,
    pub has_depth_stencil: bool,
}

/// Owns the default framebuffer and builds targets for render passes
#[derive(Default)]
pub struct FramebufferResolver {
    default_framebuffer: Option<Arc<dyn Framebuffer>>,
    default_color_format: Option<TextureFormat>,
}

impl FramebufferResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the default framebuffer (window resized)
    pub fn invalidate_default(&mut self) {
        self.default_framebuffer = None;
    }

    pub fn needs_default_rebuild(&self) -> bool {
        self.default_framebuffer.is_none()
    }

    pub fn default_framebuffer(&self) -> Option<&Arc<dyn Framebuffer>> {
        self.default_framebuffer.as_ref()
    }

    /// Build the default framebuffer around the swapchain images
    pub fn rebuild_default(
        &mut self,
        device: &mut dyn Device,
        cache: &mut RenderPassCache,
        swapchain: &dyn Swapchain,
    ) -> Result<()> {
        let color_format = swapchain.color_format();
        let render_pass = cache.get_or_create(device, RenderPassKey::new(ClearFlags::ALL, true, color_format))?;
        let framebuffer = device.create_framebuffer(&FramebufferDesc {
            render_pass,
            color_textures: vec![swapchain.color_texture()],
            depth_stencil_texture: Some(swapchain.depth_stencil_texture()),
        })?;

        engine_info!(
            "gfx_bridge::FramebufferResolver",
            "Default framebuffer built: {}x{} {:?}",
            framebuffer.width(),
            framebuffer.height(),
            color_format
        );

        self.default_framebuffer = Some(framebuffer);
        self.default_color_format = Some(color_format);
        Ok(())
    }

    /// Resolve the target of a render pass
    ///
    /// Without a color attachment the pass renders into the default framebuffer
    /// and takes the view size. With one, a framebuffer is generated and the
    /// attachment size is used. Depth-stencil attachments are only accepted
    /// together with a color attachment.
    pub fn resolve(
        &mut self,
        device: &mut dyn Device,
        cache: &mut RenderPassCache,
        desc: &RenderPassDescriptor,
        view_size: Extent2D,
        pool: &mut TransientPool,
    ) -> Result<ActiveTarget> {
        let color = match &desc.color_attachment {
            Some(color) => color,
            None => {
                engine_ensure!(
                    !desc.has_external_depth_stencil(),
                    "gfx_bridge::FramebufferResolver",
                    "depth/stencil attachment supplied without a color attachment"
                );
                return self.resolve_default(device, cache, desc, view_size);
            }
        };

        engine_ensure!(
            color.format() == TextureFormat::STANDARD_COLOR
                && color.usage() == TextureUsage::RenderTarget
                && color.texture_type() == TextureType::Tex2D,
            "gfx_bridge::FramebufferResolver",
            "color attachment must be a 2D {:?} render target, got {:?} {:?} {:?}",
            TextureFormat::STANDARD_COLOR,
            color.texture_type(),
            color.format(),
            color.usage()
        );

        let depth_stencil = desc.used_depth_stencil();
        if let Some(ds) = depth_stencil {
            engine_ensure!(
                ds.format() == TextureFormat::STANDARD_DEPTH_STENCIL
                    && ds.usage() == TextureUsage::RenderTarget,
                "gfx_bridge::FramebufferResolver",
                "depth-stencil attachment must be a {:?} render target, got {:?} {:?}",
                TextureFormat::STANDARD_DEPTH_STENCIL,
                ds.format(),
                ds.usage()
            );
        }

        let has_depth_stencil = depth_stencil.is_some();
        let render_pass = cache.get_or_create(
            device,
            RenderPassKey::new(desc.clear_flags(), has_depth_stencil, color.format()),
        )?;
        let framebuffer = device.create_framebuffer(&FramebufferDesc {
            render_pass: render_pass.clone(),
            color_textures: vec![color.handler().clone()],
            depth_stencil_texture: depth_stencil.map(|ds| ds.handler().clone()),
        })?;

        engine_debug!(
            "gfx_bridge::FramebufferResolver",
            "Framebuffer generated: {}x{} depth_stencil={}",
            color.width(),
            color.height(),
            has_depth_stencil
        );

        pool.push_framebuffer(framebuffer.clone());
        pool.retain_texture(color.clone());
        if let Some(ds) = depth_stencil {
            pool.retain_texture(ds.clone());
        }

        Ok(ActiveTarget {
            render_pass,
            framebuffer,
            size: Extent2D::new(color.width(), color.height()),
            kind: TargetKind::Generated,
            has_depth_stencil,
        })
    }

    fn resolve_default(
        &self,
        device: &mut dyn Device,
        cache: &mut RenderPassCache,
        desc: &RenderPassDescriptor,
        view_size: Extent2D,
    ) -> Result<ActiveTarget> {
        let (framebuffer, color_format) = match (&self.default_framebuffer, self.default_color_format) {
            (Some(framebuffer), Some(format)) => (framebuffer.clone(), format),
            _ => {
                return Err(Error::InitializationFailed(
                    "default framebuffer has not been built".to_string(),
                ))
            }
        };
        let render_pass = cache.get_or_create(device, RenderPassKey::new(desc.clear_flags(), true, color_format))?;
        Ok(ActiveTarget {
            render_pass,
            framebuffer,
            size: view_size,
            kind: TargetKind::Default,
            has_depth_stencil: true,
        })
    }
}

/// Convert a bottom-left rectangle to the device's coordinate convention
pub fn flip_y(rect: Rect2D, target_height: u32, origin: Origin) -> Rect2D {
    match origin {
        Origin::BottomLeft => rect,
        Origin::TopLeft => Rect2D {
            y: target_height as i32 - rect.y - rect.height as i32,
            ..rect
        },
    }
}

#[cfg(test)]
#[path = "framebuffer_resolver_tests.rs"]
mod tests;
