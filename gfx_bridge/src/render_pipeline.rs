/// Render pipeline: a program plus its color blend configuration

use std::sync::Arc;

use crate::device::{BlendFactor, BlendOp, BlendTarget, ColorWriteMask};
use crate::program::Program;

/// Blend configuration of the single color target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendDescriptor {
    pub blend_enabled: bool,
    pub source_rgb_factor: BlendFactor,
    pub destination_rgb_factor: BlendFactor,
    pub source_alpha_factor: BlendFactor,
    pub destination_alpha_factor: BlendFactor,
    pub rgb_blend_operation: BlendOp,
    pub alpha_blend_operation: BlendOp,
    pub write_mask: ColorWriteMask,
}

impl Default for BlendDescriptor {
    fn default() -> Self {
        Self {
            blend_enabled: false,
            source_rgb_factor: BlendFactor::One,
            destination_rgb_factor: BlendFactor::Zero,
            source_alpha_factor: BlendFactor::One,
            destination_alpha_factor: BlendFactor::Zero,
            rgb_blend_operation: BlendOp::Add,
            alpha_blend_operation: BlendOp::Add,
            write_mask: ColorWriteMask::ALL,
        }
    }
}

impl BlendDescriptor {
    /// Classic premultiplied-alpha "over" blending
    pub fn alpha_premultiplied() -> Self {
        Self {
            blend_enabled: true,
            source_rgb_factor: BlendFactor::One,
            destination_rgb_factor: BlendFactor::OneMinusSrcAlpha,
            source_alpha_factor: BlendFactor::One,
            destination_alpha_factor: BlendFactor::OneMinusSrcAlpha,
            ..Self::default()
        }
    }
}

/// Descriptor for creating a render pipeline
#[derive(Clone)]
pub struct PipelineDescriptor {
    pub program: Arc<Program>,
    pub blend: BlendDescriptor,
}

/// Program and blend state used by subsequent draws
pub struct RenderPipeline {
    program: Arc<Program>,
    blend: BlendDescriptor,
}

impl RenderPipeline {
    pub fn new(desc: PipelineDescriptor) -> Self {
        Self {
            program: desc.program,
            blend: desc.blend,
        }
    }

    /// Replace program and blend configuration
    pub fn update(&mut self, desc: PipelineDescriptor) {
        self.program = desc.program;
        self.blend = desc.blend;
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn blend(&self) -> &BlendDescriptor {
        &self.blend
    }

    /// Write the blend configuration into a device blend target
    ///
    /// Factors and operations are only copied when blending is enabled; the
    /// write mask always is.
    pub fn apply(&self, target: &mut BlendTarget) {
        target.blend_enable = self.blend.blend_enabled;
        if self.blend.blend_enabled {
            target.src_color_factor = self.blend.source_rgb_factor;
            target.dst_color_factor = self.blend.destination_rgb_factor;
            target.color_blend_op = self.blend.rgb_blend_operation;
            target.src_alpha_factor = self.blend.source_alpha_factor;
            target.dst_alpha_factor = self.blend.destination_alpha_factor;
            target.alpha_blend_op = self.blend.alpha_blend_operation;
        }
        target.color_write_mask = self.blend.write_mask;
    }
}

#[cfg(test)]
#[path = "render_pipeline_tests.rs"]
mod tests;
