/// Command buffer: the client drawing protocol
///
/// Translates the stateful protocol
/// `begin_frame (begin_render_pass (set* draw*)* end_render_pass)* end_frame`
/// into device objects. Setters accumulate state; every draw builds its own
/// input assembler and pipeline state, which live in the transient pool until
/// `end_frame`.
///
/// Calls made out of order are contract violations (see `engine_ensure!`).

use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{CommandBufferConfig, SurfaceConfig};
use crate::depth_stencil::DepthStencilState;
use crate::device::{
    Buffer, CommandList, CullMode, Device, DeviceApi, DrawInfo, Extent2D, IndexType,
    InputAssemblerDesc, Rect2D, Swapchain, VertexAttribute, Viewport,
};
use crate::error::{Error, Result};
use crate::frame_state::FrameState;
use crate::framebuffer_resolver::{flip_y, ActiveTarget, FramebufferResolver, RenderPassDescriptor};
use crate::pipeline_builder::{self, PipelineInputs};
use crate::program::{ProgramState, SharedProgramState};
use crate::render_pass_cache::RenderPassCache;
use crate::render_pipeline::RenderPipeline;
use crate::transient_pool::{PoolCounts, TransientPool};
use crate::types::{PrimitiveType, Winding};
use crate::{engine_debug, engine_ensure, engine_info};

const SOURCE: &str = "gfx_bridge::CommandBuffer";

/// Position in the frame protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStage {
    Idle,
    FrameOpen,
    PassOpen,
}

/// Counters of the last completed frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub draw_calls: u32,
    pub pipeline_states: usize,
    pub input_assemblers: usize,
    pub generated_framebuffers: usize,
}

/// Index of the first index addressed by a byte offset into an index buffer
///
/// Offsets whose index does not fit in 32 bits are a contract violation.
pub fn first_index_from_offset(offset: u64, stride: u32) -> Result<u32> {
    if stride == 0 {
        return Ok(0);
    }
    let first_index = u32::try_from(offset / u64::from(stride)).ok();
    engine_ensure!(
        first_index.is_some(),
        SOURCE,
        "index offset {} with stride {} overflows the first index",
        offset,
        stride
    );
    Ok(first_index.unwrap_or_default())
}

fn lock_device<'a>(device: &'a Mutex<dyn Device + 'static>) -> Result<MutexGuard<'a, dyn Device + 'static>> {
    device
        .lock()
        .map_err(|_| Error::BackendError("device mutex poisoned".to_string()))
}

fn lock_program_state(state: &SharedProgramState) -> Result<MutexGuard<'_, ProgramState>> {
    state
        .lock()
        .map_err(|_| Error::BackendError("program state mutex poisoned".to_string()))
}

pub struct CommandBuffer {
    device: Arc<Mutex<dyn Device>>,
    api: DeviceApi,
    config: CommandBufferConfig,
    surface: SurfaceConfig,
    command_list: Box<dyn CommandList>,
    swapchains: Vec<Box<dyn Swapchain>>,
    stage: FrameStage,
    frame: FrameState,
    render_passes: RenderPassCache,
    resolver: FramebufferResolver,
    pool: TransientPool,
    active: Option<ActiveTarget>,
    vertex_buffer: Option<Arc<dyn Buffer>>,
    index_buffer: Option<Arc<dyn Buffer>>,
    program_state: Option<SharedProgramState>,
    render_pipeline: Option<Arc<RenderPipeline>>,
    depth_stencil_state: Option<Arc<DepthStencilState>>,
    pending_resize: Option<Extent2D>,
    frame_draws: u32,
    last_frame: FrameStats,
}

impl CommandBuffer {
    /// Create a command buffer recording into `device`
    ///
    /// The swapchain is created on the first `begin_frame` from `surface`.
    pub fn new(
        device: Arc<Mutex<dyn Device>>,
        surface: SurfaceConfig,
        config: CommandBufferConfig,
    ) -> Result<Self> {
        let (api, command_list) = {
            let mut guard = lock_device(&device)?;
            (guard.api(), guard.create_command_list()?)
        };
        let view_size = Extent2D::new(surface.width, surface.height);

        Ok(Self {
            device,
            api,
            config,
            surface,
            command_list,
            swapchains: Vec::new(),
            stage: FrameStage::Idle,
            frame: FrameState::new(view_size, config.default_line_width),
            render_passes: RenderPassCache::new(),
            resolver: FramebufferResolver::new(),
            pool: TransientPool::new(),
            active: None,
            vertex_buffer: None,
            index_buffer: None,
            program_state: None,
            render_pipeline: None,
            depth_stencil_state: None,
            pending_resize: None,
            frame_draws: 0,
            last_frame: FrameStats::default(),
        })
    }

    // ===== FRAME =====

    /// Acquire a presentable image and open recording
    pub fn begin_frame(&mut self) -> Result<()> {
        engine_ensure!(
            self.stage == FrameStage::Idle,
            SOURCE,
            "begin_frame called while {:?}",
            self.stage
        );

        let device = self.device.clone();
        let mut device = lock_device(&device)?;

        if self.swapchains.is_empty() {
            let swapchain = device.create_swapchain(&self.surface.to_swapchain_desc())?;
            engine_info!(
                SOURCE,
                "Swapchain created: {}x{} {:?} ({:?})",
                swapchain.width(),
                swapchain.height(),
                swapchain.color_format(),
                self.surface.vsync
            );
            self.swapchains.push(swapchain);
            self.pending_resize = None;
        }

        if let Some(size) = self.pending_resize.take() {
            for swapchain in &mut self.swapchains {
                swapchain.resize(size.width, size.height)?;
            }
            self.resolver.invalidate_default();
        }

        device.acquire(&mut self.swapchains)?;

        if self.resolver.needs_default_rebuild() {
            let swapchain = self
                .swapchains
                .first()
                .ok_or_else(|| Error::InitializationFailed("no swapchain".to_string()))?;
            self.resolver
                .rebuild_default(&mut *device, &mut self.render_passes, swapchain.as_ref())?;
        }

        self.command_list.begin()?;
        self.active = None;
        self.frame_draws = 0;
        self.stage = FrameStage::FrameOpen;
        Ok(())
    }

    /// Close recording, submit, present and release the frame's transient objects
    pub fn end_frame(&mut self) -> Result<()> {
        engine_ensure!(
            self.stage != FrameStage::PassOpen,
            SOURCE,
            "end_frame called with a render pass still open"
        );
        engine_ensure!(
            self.stage == FrameStage::FrameOpen,
            SOURCE,
            "end_frame called without begin_frame"
        );

        let device = self.device.clone();
        let mut device = lock_device(&device)?;

        self.command_list.end()?;
        let lists = [self.command_list.as_ref()];
        device.flush_commands(&lists)?;
        device.submit(&lists)?;
        device.present()?;

        let counts = self.pool.counts();
        self.last_frame = FrameStats {
            draw_calls: self.frame_draws,
            pipeline_states: counts.pipeline_states,
            input_assemblers: counts.input_assemblers,
            generated_framebuffers: counts.framebuffers,
        };
        self.pool.clear();
        self.active = None;
        self.stage = FrameStage::Idle;
        Ok(())
    }

    /// Flag the swapchain and default framebuffer for recreation at the next frame
    pub fn notify_resized(&mut self, width: u32, height: u32) {
        engine_info!(SOURCE, "Resize to {}x{}", width, height);
        self.surface.width = width;
        self.surface.height = height;
        self.frame.view_size = Extent2D::new(width, height);
        self.pending_resize = Some(Extent2D::new(width, height));
    }

    // ===== RENDER PASS =====

    pub fn begin_render_pass(&mut self, desc: &RenderPassDescriptor) -> Result<()> {
        engine_ensure!(
            self.stage == FrameStage::FrameOpen,
            SOURCE,
            "begin_render_pass called while {:?}",
            self.stage
        );

        let device = self.device.clone();
        let mut device = lock_device(&device)?;

        let target = self.resolver.resolve(
            &mut *device,
            &mut self.render_passes,
            desc,
            self.frame.view_size,
            &mut self.pool,
        )?;
        let clear_values = desc.clear_values(target.has_depth_stencil);
        let render_area = self.device_draw_rect(target.size.height);
        self.command_list.begin_render_pass(
            &target.render_pass,
            &target.framebuffer,
            render_area,
            &clear_values,
        )?;

        self.active = Some(target);
        self.stage = FrameStage::PassOpen;
        Ok(())
    }

    pub fn end_render_pass(&mut self) -> Result<()> {
        engine_ensure!(
            self.stage == FrameStage::PassOpen,
            SOURCE,
            "end_render_pass called while {:?}",
            self.stage
        );
        self.command_list.end_render_pass()?;
        self.active = None;
        self.stage = FrameStage::FrameOpen;
        Ok(())
    }

    // ===== STATE SETTERS =====

    fn ensure_frame_open(&self, operation: &str) -> Result<()> {
        engine_ensure!(
            self.stage != FrameStage::Idle,
            SOURCE,
            "{} called outside begin_frame/end_frame",
            operation
        );
        Ok(())
    }

    /// Viewport in bottom-left coordinates
    pub fn set_viewport(&mut self, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.ensure_frame_open("set_viewport")?;
        self.frame.viewport = Rect2D::new(x, y, width, height);
        Ok(())
    }

    /// Scissor rectangle in bottom-left coordinates
    ///
    /// While enabled it also replaces the viewport.
    pub fn set_scissor_rect(&mut self, enabled: bool, x: i32, y: i32, width: u32, height: u32) -> Result<()> {
        self.ensure_frame_open("set_scissor_rect")?;
        self.frame.scissor_enabled = enabled;
        if enabled {
            self.frame.scissor = Rect2D::new(x, y, width, height);
        }
        Ok(())
    }

    pub fn set_cull_mode(&mut self, mode: CullMode) -> Result<()> {
        self.ensure_frame_open("set_cull_mode")?;
        self.frame.cull_mode = mode;
        Ok(())
    }

    pub fn set_winding(&mut self, winding: Winding) -> Result<()> {
        self.ensure_frame_open("set_winding")?;
        self.frame.winding = winding;
        Ok(())
    }

    /// Non-positive widths fall back to the default line width
    pub fn set_line_width(&mut self, width: f32) -> Result<()> {
        self.ensure_frame_open("set_line_width")?;
        self.frame.line_width = if width > 0.0 {
            width
        } else {
            self.config.default_line_width
        };
        Ok(())
    }

    pub fn set_stencil_reference_value(&mut self, front: u32, back: u32) -> Result<()> {
        self.ensure_frame_open("set_stencil_reference_value")?;
        self.frame.stencil_ref_front = front;
        self.frame.stencil_ref_back = back;
        Ok(())
    }

    /// `None` disables depth and stencil testing for subsequent draws
    pub fn set_depth_stencil_state(&mut self, state: Option<Arc<DepthStencilState>>) -> Result<()> {
        self.ensure_frame_open("set_depth_stencil_state")?;
        self.depth_stencil_state = state;
        Ok(())
    }

    pub fn set_render_pipeline(&mut self, pipeline: Arc<RenderPipeline>) -> Result<()> {
        self.ensure_frame_open("set_render_pipeline")?;
        self.render_pipeline = Some(pipeline);
        Ok(())
    }

    pub fn set_program_state(&mut self, state: Option<SharedProgramState>) -> Result<()> {
        self.ensure_frame_open("set_program_state")?;
        self.program_state = state;
        Ok(())
    }

    pub fn set_vertex_buffer(&mut self, buffer: Arc<dyn Buffer>) -> Result<()> {
        self.ensure_frame_open("set_vertex_buffer")?;
        self.vertex_buffer = Some(buffer);
        Ok(())
    }

    pub fn set_index_buffer(&mut self, buffer: Arc<dyn Buffer>) -> Result<()> {
        self.ensure_frame_open("set_index_buffer")?;
        self.index_buffer = Some(buffer);
        Ok(())
    }

    // ===== DRAWING =====

    /// Draw `count` vertices starting at `start`
    pub fn draw_arrays(&mut self, primitive: PrimitiveType, start: u32, count: u32) -> Result<()> {
        self.draw(primitive, DrawInfo::vertices(count, start), false)
    }

    /// Draw `count` indices starting `offset` bytes into the index buffer
    pub fn draw_elements(
        &mut self,
        primitive: PrimitiveType,
        index_type: IndexType,
        count: u32,
        offset: u64,
    ) -> Result<()> {
        let stride = match &self.index_buffer {
            Some(buffer) if buffer.stride() != 0 => buffer.stride(),
            _ => index_type.size_bytes(),
        };
        let first_index = first_index_from_offset(offset, stride)?;
        self.draw(primitive, DrawInfo::indexed(count, first_index), true)
    }

    fn draw(&mut self, primitive: PrimitiveType, info: DrawInfo, indexed: bool) -> Result<()> {
        engine_ensure!(
            self.stage == FrameStage::PassOpen,
            SOURCE,
            "draw called outside a render pass ({:?})",
            self.stage
        );
        engine_ensure!(self.render_pipeline.is_some(), SOURCE, "draw without a render pipeline");
        engine_ensure!(self.vertex_buffer.is_some(), SOURCE, "draw without a vertex buffer");
        engine_ensure!(
            !indexed || self.index_buffer.is_some(),
            SOURCE,
            "indexed draw without an index buffer"
        );

        let device = self.device.clone();
        let mut device = lock_device(&device)?;

        let render_pipeline = self
            .render_pipeline
            .clone()
            .ok_or_else(|| Error::ContractViolation("draw without a render pipeline".to_string()))?;
        let program_state = self.program_state.clone();

        let attributes = {
            let shader = render_pipeline.program().shader().as_ref();
            match &program_state {
                Some(state) => {
                    let state = lock_program_state(state)?;
                    pipeline_builder::resolve_attributes(state.vertex_layout(), shader)
                }
                None => pipeline_builder::resolve_attributes(None, shader),
            }
        };

        self.prepare_drawing(
            &mut *device,
            &render_pipeline,
            program_state.as_ref(),
            primitive,
            attributes.clone(),
        )?;

        let input_assembler = device.create_input_assembler(&InputAssemblerDesc {
            attributes,
            vertex_buffers: self.vertex_buffer.iter().cloned().collect(),
            index_buffer: if indexed { self.index_buffer.clone() } else { None },
        })?;
        self.pool.push_input_assembler(input_assembler.clone());
        self.command_list.bind_input_assembler(&input_assembler)?;
        self.command_list.draw(&info)?;
        self.frame_draws += 1;

        self.release_draw_resources();
        Ok(())
    }

    /// Bind uniforms, viewport/scissor and a fresh pipeline state
    fn prepare_drawing(
        &mut self,
        device: &mut dyn Device,
        render_pipeline: &RenderPipeline,
        program_state: Option<&SharedProgramState>,
        primitive: PrimitiveType,
        attributes: Vec<VertexAttribute>,
    ) -> Result<()> {
        let (render_pass, target_height) = match &self.active {
            Some(target) => (target.render_pass.clone(), target.size.height),
            None => {
                return Err(Error::ContractViolation(
                    "draw without an active render target".to_string(),
                ))
            }
        };

        if let Some(state) = program_state {
            let mut state = lock_program_state(state)?;
            state.run_callbacks();
            state.apply_bindings()?;
            self.command_list.bind_descriptor_set(0, state.descriptor_set())?;
        }

        let draw_rect = self.device_draw_rect(target_height);
        let scissor = if self.frame.scissor_enabled {
            draw_rect
        } else {
            let extent = self.config.unbounded_scissor_extent;
            Rect2D::new(0, 0, extent, extent)
        };
        self.command_list.set_viewport(Viewport::from(draw_rect))?;
        self.command_list.set_scissor(scissor)?;

        let desc = PipelineInputs {
            render_pipeline,
            render_pass: &render_pass,
            attributes,
            primitive,
            frame: &self.frame,
            depth_stencil: self.depth_stencil_state.as_deref(),
        }
        .describe();
        pipeline_builder::realize(device, &desc, &mut self.pool, self.command_list.as_mut())?;
        Ok(())
    }

    /// Draw rectangle in device coordinates for a target of the given height
    ///
    /// Render area, viewport and enabled scissor all use this rectangle.
    fn device_draw_rect(&self, target_height: u32) -> Rect2D {
        flip_y(self.frame.draw_rect(), target_height, self.api.origin())
    }

    /// Each draw fully re-specifies its buffers and program state
    fn release_draw_resources(&mut self) {
        self.index_buffer = None;
        self.vertex_buffer = None;
        self.program_state = None;
        engine_debug!(SOURCE, "Per-draw resources released");
    }

    // ===== QUERIES =====

    pub fn stage(&self) -> FrameStage {
        self.stage
    }

    pub fn api(&self) -> DeviceApi {
        self.api
    }

    pub fn frame_state(&self) -> &FrameState {
        &self.frame
    }

    /// Target of the render pass being recorded
    pub fn active_target(&self) -> Option<&ActiveTarget> {
        self.active.as_ref()
    }

    /// Rectangle draws are clipped to (scissor when enabled, else viewport), in
    /// bottom-left client coordinates
    pub fn draw_rect(&self) -> Rect2D {
        self.frame.draw_rect()
    }

    pub fn render_pass_cache(&self) -> &RenderPassCache {
        &self.render_passes
    }

    /// Objects currently held in the transient pool
    pub fn transient_counts(&self) -> PoolCounts {
        self.pool.counts()
    }

    /// Statistics of the last completed frame
    pub fn frame_stats(&self) -> FrameStats {
        self.last_frame
    }
}

#[cfg(test)]
#[path = "command_buffer_tests.rs"]
mod tests;
