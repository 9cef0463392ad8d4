/// Per-frame pool of transient device objects
///
/// Everything pushed here lives until the end of the frame. Clearing the pool
/// is the only release point for these objects.

use std::sync::Arc;

use crate::device::{Framebuffer, InputAssembler, PipelineState};
use crate::texture::TextureBackend;

/// Number of objects held by each pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolCounts {
    pub pipeline_states: usize,
    pub input_assemblers: usize,
    pub framebuffers: usize,
    pub textures: usize,
}

#[derive(Default)]
pub struct TransientPool {
    pipeline_states: Vec<Arc<dyn PipelineState>>,
    input_assemblers: Vec<Arc<dyn InputAssembler>>,
    framebuffers: Vec<Arc<dyn Framebuffer>>,
    /// External attachments retained for the passes that render into them
    textures: Vec<Arc<TextureBackend>>,
}

impl TransientPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_pipeline_state(&mut self, pipeline_state: Arc<dyn PipelineState>) {
        self.pipeline_states.push(pipeline_state);
    }

    pub fn push_input_assembler(&mut self, input_assembler: Arc<dyn InputAssembler>) {
        self.input_assemblers.push(input_assembler);
    }

    pub fn push_framebuffer(&mut self, framebuffer: Arc<dyn Framebuffer>) {
        self.framebuffers.push(framebuffer);
    }

    pub fn retain_texture(&mut self, texture: Arc<TextureBackend>) {
        self.textures.push(texture);
    }

    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            pipeline_states: self.pipeline_states.len(),
            input_assemblers: self.input_assemblers.len(),
            framebuffers: self.framebuffers.len(),
            textures: self.textures.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts() == PoolCounts::default()
    }

    /// Drop every held object
    pub fn clear(&mut self) {
        self.pipeline_states.clear();
        self.input_assemblers.clear();
        self.framebuffers.clear();
        self.textures.clear();
    }
}
