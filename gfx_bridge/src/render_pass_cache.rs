/// Process-lifetime cache of render passes
///
/// Keyed by (clear flags, depth-stencil presence, color format). The key space is
/// small and bounded, so entries are never evicted.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::device::{
    ClearFlags, ColorAttachment, DepthStencilAttachment, Device, LoadOp, RenderPass,
    RenderPassInfo, TextureFormat,
};
use crate::engine_debug;
use crate::error::Result;

/// Discrete description of a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderPassKey {
    pub clear_flags: ClearFlags,
    pub has_depth_stencil: bool,
    pub color_format: TextureFormat,
}

impl RenderPassKey {
    /// Bit set when the pass has no depth-stencil attachment
    const NO_DEPTH_STENCIL_BIT: u64 = 1 << 31;

    pub fn new(clear_flags: ClearFlags, has_depth_stencil: bool, color_format: TextureFormat) -> Self {
        Self {
            clear_flags,
            has_depth_stencil,
            color_format,
        }
    }

    /// Integer form of the key
    ///
    /// Clear flags occupy the low bits, depth-stencil absence bit 31 and the
    /// color format the upper half.
    pub fn packed(&self) -> u64 {
        let mut key = u64::from(self.clear_flags.bits());
        if !self.has_depth_stencil {
            key |= Self::NO_DEPTH_STENCIL_BIT;
        }
        key | (self.color_format as u64) << 32
    }

    /// Render pass description for this key
    ///
    /// Attachments that are not cleared are loaded so earlier content survives.
    pub fn describe(&self) -> RenderPassInfo {
        let load_op = |flag: ClearFlags| {
            if self.clear_flags.contains(flag) {
                LoadOp::Clear
            } else {
                LoadOp::Load
            }
        };

        let mut color = ColorAttachment::new(self.color_format);
        color.load_op = load_op(ClearFlags::COLOR);

        let depth_stencil = self.has_depth_stencil.then(|| {
            let mut attachment = DepthStencilAttachment::new(TextureFormat::STANDARD_DEPTH_STENCIL);
            if !self.clear_flags.contains(ClearFlags::DEPTH_STENCIL) {
                attachment.depth_load_op = load_op(ClearFlags::DEPTH);
                attachment.stencil_load_op = load_op(ClearFlags::STENCIL);
            }
            attachment
        });

        RenderPassInfo {
            color_attachments: vec![color],
            depth_stencil_attachment: depth_stencil,
        }
    }
}

/// Render passes created so far, by packed key
#[derive(Default)]
pub struct RenderPassCache {
    passes: FxHashMap<u64, Arc<dyn RenderPass>>,
}

impl RenderPassCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached pass for `key`, creating it on first use
    pub fn get_or_create(&mut self, device: &mut dyn Device, key: RenderPassKey) -> Result<Arc<dyn RenderPass>> {
        let packed = key.packed();
        if let Some(pass) = self.passes.get(&packed) {
            return Ok(pass.clone());
        }

        let pass = device.create_render_pass(&key.describe())?;
        engine_debug!(
            "gfx_bridge::RenderPassCache",
            "Render pass created: clear={:?} depth_stencil={} format={:?} (key {:#x})",
            key.clear_flags,
            key.has_depth_stencil,
            key.color_format,
            packed
        );
        self.passes.insert(packed, pass.clone());
        Ok(pass)
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[cfg(test)]
#[path = "render_pass_cache_tests.rs"]
mod tests;
