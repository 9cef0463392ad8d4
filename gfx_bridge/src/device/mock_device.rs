/// Mock device for unit tests (no GPU required)
///
/// Every object created by `MockDevice` registers itself in a shared live-object
/// ledger and unregisters on drop, so tests can check that transient objects
/// were really destroyed. Command lists append typed `RecordedCommand`s to a
/// shared log.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

use crate::device::{
    BlendTarget, Buffer, BufferDesc, BufferUsage, ClearValue, CommandList, DepthStencilDesc,
    DescriptorSet, DescriptorSetDesc, DescriptorSetLayout, DescriptorSetLayoutBinding,
    DescriptorSetLayoutDesc, Device, DeviceApi, DeviceStats, DrawInfo, DynamicStateFlags,
    Framebuffer, FramebufferDesc, InputAssembler, InputAssemblerDesc, PipelineLayout,
    PipelineLayoutDesc, PipelineState, PipelineStateDesc, PrimitiveTopology, RasterizerState,
    Rect2D, RenderPass, RenderPassInfo, Sampler, SamplerDesc, Shader, ShaderAttribute, ShaderDesc,
    Swapchain, SwapchainDesc, Texture, TextureDesc, TextureFormat, TextureInfo, TextureType,
    TextureUsageFlags, UniformBlock, UniformSampler, VertexAttribute, Viewport,
};
use crate::engine_bail;
use crate::error::{Error, Result};

// ============================================================================
// Live-object ledger
// ============================================================================

new_key_type! {
    /// Key of one live mock object
    pub struct MockObjectKey;
}

/// Kind of object tracked by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockObjectKind {
    Swapchain,
    RenderPass,
    Framebuffer,
    Texture,
    Sampler,
    Buffer,
    Shader,
    DescriptorSetLayout,
    PipelineLayout,
    DescriptorSet,
    PipelineState,
    InputAssembler,
    CommandList,
}

#[derive(Default)]
struct MockLedger {
    live: SlotMap<MockObjectKey, MockObjectKind>,
    created: FxHashMap<MockObjectKind, u32>,
}

type SharedLedger = Arc<Mutex<MockLedger>>;
type SharedLog = Arc<Mutex<Vec<RecordedCommand>>>;

/// Registration of one mock object; unregisters on drop
struct MockLifetime {
    ledger: SharedLedger,
    key: MockObjectKey,
}

impl MockLifetime {
    fn register(ledger: &SharedLedger, kind: MockObjectKind) -> Self {
        let mut guard = ledger.lock().unwrap();
        let key = guard.live.insert(kind);
        *guard.created.entry(kind).or_insert(0) += 1;
        drop(guard);
        Self { ledger: ledger.clone(), key }
    }
}

impl Drop for MockLifetime {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.ledger.lock() {
            guard.live.remove(self.key);
        }
    }
}

// ============================================================================
// Recorded commands
// ============================================================================

/// Pipeline state as seen by the mock at bind time
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSnapshot {
    pub shader_name: String,
    pub attributes: Vec<VertexAttribute>,
    pub topology: PrimitiveTopology,
    pub rasterizer: RasterizerState,
    pub depth_stencil: DepthStencilDesc,
    pub blend_target: BlendTarget,
    pub dynamic_states: DynamicStateFlags,
    pub render_pass: RenderPassInfo,
}

impl PipelineSnapshot {
    fn from_desc(desc: &PipelineStateDesc) -> Self {
        Self {
            shader_name: desc.shader.name().to_string(),
            attributes: desc.attributes.clone(),
            topology: desc.topology,
            rasterizer: desc.rasterizer,
            depth_stencil: desc.depth_stencil,
            blend_target: desc.blend.targets.first().copied().unwrap_or_default(),
            dynamic_states: desc.dynamic_states,
            render_pass: desc.render_pass.info().clone(),
        }
    }
}

/// One call observed by the mock device or one of its command lists
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    Acquire { image_index: u32 },
    Begin,
    End,
    BeginRenderPass {
        render_pass: RenderPassInfo,
        framebuffer_size: (u32, u32),
        render_area: Rect2D,
        clear_values: Vec<ClearValue>,
    },
    EndRenderPass,
    SetViewport(Viewport),
    SetScissor(Rect2D),
    UpdateDescriptorSet { buffers: usize, textures: usize },
    BindDescriptorSet(u32),
    BindPipelineState(Box<PipelineSnapshot>),
    BindInputAssembler { attributes: usize, indexed: bool },
    Draw(DrawInfo),
    FlushCommands,
    Submit,
    Present,
}

// ============================================================================
// Mock Buffer
// ============================================================================

pub struct MockBuffer {
    size: u64,
    stride: u32,
    usage: BufferUsage,
    data: Mutex<Vec<u8>>,
    _lifetime: MockLifetime,
}

impl MockBuffer {
    /// Copy of the buffer contents
    pub fn contents(&self) -> Vec<u8> {
        self.data.lock().unwrap().clone()
    }
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let end = offset as usize + data.len();
        if end as u64 > self.size {
            engine_bail!(
                "gfx_bridge::MockBuffer",
                "update out of range: {}..{} > {}",
                offset,
                end,
                self.size
            );
        }
        self.data.lock().unwrap()[offset as usize..end].copy_from_slice(data);
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn stride(&self) -> u32 {
        self.stride
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }
}

// ============================================================================
// Mock Texture / Sampler
// ============================================================================

pub struct MockTexture {
    info: TextureInfo,
    _lifetime: MockLifetime,
}

impl Texture for MockTexture {
    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

pub struct MockSampler {
    desc: SamplerDesc,
    _lifetime: MockLifetime,
}

impl Sampler for MockSampler {
    fn desc(&self) -> &SamplerDesc {
        &self.desc
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

pub struct MockShader {
    name: String,
    attributes: Vec<ShaderAttribute>,
    blocks: Vec<UniformBlock>,
    samplers: Vec<UniformSampler>,
    _lifetime: MockLifetime,
}

impl Shader for MockShader {
    fn name(&self) -> &str {
        &self.name
    }

    fn attributes(&self) -> &[ShaderAttribute] {
        &self.attributes
    }

    fn blocks(&self) -> &[UniformBlock] {
        &self.blocks
    }

    fn samplers(&self) -> &[UniformSampler] {
        &self.samplers
    }
}

// ============================================================================
// Mock descriptor sets and layouts
// ============================================================================

pub struct MockDescriptorSetLayout {
    bindings: Vec<DescriptorSetLayoutBinding>,
    _lifetime: MockLifetime,
}

impl DescriptorSetLayout for MockDescriptorSetLayout {
    fn bindings(&self) -> &[DescriptorSetLayoutBinding] {
        &self.bindings
    }
}

pub struct MockPipelineLayout {
    set_layout_count: usize,
    _lifetime: MockLifetime,
}

impl PipelineLayout for MockPipelineLayout {
    fn set_layout_count(&self) -> usize {
        self.set_layout_count
    }
}

pub struct MockDescriptorSet {
    buffers: Mutex<FxHashMap<u32, Arc<dyn Buffer>>>,
    textures: Mutex<FxHashMap<u32, Arc<dyn Texture>>>,
    log: SharedLog,
    _lifetime: MockLifetime,
}

impl DescriptorSet for MockDescriptorSet {
    fn bind_buffer(&self, binding: u32, buffer: Arc<dyn Buffer>) {
        self.buffers.lock().unwrap().insert(binding, buffer);
    }

    fn bind_texture(&self, binding: u32, texture: Arc<dyn Texture>, _sampler: Option<Arc<dyn Sampler>>) {
        self.textures.lock().unwrap().insert(binding, texture);
    }

    fn update(&self) -> Result<()> {
        let buffers = self.buffers.lock().unwrap().len();
        let textures = self.textures.lock().unwrap().len();
        self.log
            .lock()
            .unwrap()
            .push(RecordedCommand::UpdateDescriptorSet { buffers, textures });
        Ok(())
    }
}

// ============================================================================
// Mock RenderPass / Framebuffer / Swapchain
// ============================================================================

pub struct MockRenderPass {
    info: RenderPassInfo,
    _lifetime: MockLifetime,
}

impl RenderPass for MockRenderPass {
    fn info(&self) -> &RenderPassInfo {
        &self.info
    }
}

pub struct MockFramebuffer {
    render_pass: Arc<dyn RenderPass>,
    color_textures: Vec<Arc<dyn Texture>>,
    depth_stencil_texture: Option<Arc<dyn Texture>>,
    width: u32,
    height: u32,
    _lifetime: MockLifetime,
}

impl Framebuffer for MockFramebuffer {
    fn render_pass(&self) -> &Arc<dyn RenderPass> {
        &self.render_pass
    }

    fn color_textures(&self) -> &[Arc<dyn Texture>] {
        &self.color_textures
    }

    fn depth_stencil_texture(&self) -> Option<&Arc<dyn Texture>> {
        self.depth_stencil_texture.as_ref()
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}

pub struct MockSwapchain {
    ledger: SharedLedger,
    format: TextureFormat,
    width: u32,
    height: u32,
    image_index: u32,
    color: Arc<dyn Texture>,
    depth_stencil: Arc<dyn Texture>,
    _lifetime: MockLifetime,
}

impl MockSwapchain {
    const IMAGE_COUNT: u32 = 3;

    fn make_images(
        ledger: &SharedLedger,
        format: TextureFormat,
        width: u32,
        height: u32,
    ) -> (Arc<dyn Texture>, Arc<dyn Texture>) {
        let color = MockDevice::make_texture(
            ledger,
            TextureInfo {
                texture_type: TextureType::Tex2D,
                format,
                usage: TextureUsageFlags::COLOR_ATTACHMENT | TextureUsageFlags::TRANSFER_DST,
                width,
                height,
                array_layers: 1,
                mip_levels: 1,
            },
        );
        let depth_stencil = MockDevice::make_texture(
            ledger,
            TextureInfo {
                texture_type: TextureType::Tex2D,
                format: TextureFormat::STANDARD_DEPTH_STENCIL,
                usage: TextureUsageFlags::DEPTH_STENCIL_ATTACHMENT,
                width,
                height,
                array_layers: 1,
                mip_levels: 1,
            },
        );
        (color, depth_stencil)
    }
}

impl Swapchain for MockSwapchain {
    fn acquire_next_image(&mut self) -> Result<u32> {
        let index = self.image_index;
        self.image_index = (self.image_index + 1) % Self::IMAGE_COUNT;
        Ok(index)
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!(
                "swapchain size {}x{}",
                width, height
            )));
        }
        let (color, depth_stencil) = Self::make_images(&self.ledger, self.format, width, height);
        self.color = color;
        self.depth_stencil = depth_stencil;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_format(&self) -> TextureFormat {
        self.format
    }

    fn color_texture(&self) -> Arc<dyn Texture> {
        self.color.clone()
    }

    fn depth_stencil_texture(&self) -> Arc<dyn Texture> {
        self.depth_stencil.clone()
    }
}

// ============================================================================
// Mock PipelineState / InputAssembler
// ============================================================================

pub struct MockPipelineState {
    desc: PipelineStateDesc,
    _lifetime: MockLifetime,
}

impl PipelineState for MockPipelineState {
    fn desc(&self) -> &PipelineStateDesc {
        &self.desc
    }
}

pub struct MockInputAssembler {
    attributes: Vec<VertexAttribute>,
    vertex_buffers: Vec<Arc<dyn Buffer>>,
    index_buffer: Option<Arc<dyn Buffer>>,
    _lifetime: MockLifetime,
}

impl InputAssembler for MockInputAssembler {
    fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    fn vertex_buffers(&self) -> &[Arc<dyn Buffer>] {
        &self.vertex_buffers
    }

    fn index_buffer(&self) -> Option<&Arc<dyn Buffer>> {
        self.index_buffer.as_ref()
    }
}

// ============================================================================
// Mock CommandList
// ============================================================================

pub struct MockCommandList {
    log: SharedLog,
    draw_counter: Arc<AtomicU32>,
    recording: bool,
    in_render_pass: bool,
    _lifetime: MockLifetime,
}

impl MockCommandList {
    fn push(&self, command: RecordedCommand) {
        self.log.lock().unwrap().push(command);
    }

    fn require_recording(&self, what: &str) -> Result<()> {
        if !self.recording {
            engine_bail!("gfx_bridge::MockCommandList", "{} outside begin/end", what);
        }
        Ok(())
    }

    fn require_render_pass(&self, what: &str) -> Result<()> {
        self.require_recording(what)?;
        if !self.in_render_pass {
            engine_bail!("gfx_bridge::MockCommandList", "{} outside a render pass", what);
        }
        Ok(())
    }
}

impl CommandList for MockCommandList {
    fn begin(&mut self) -> Result<()> {
        if self.recording {
            engine_bail!("gfx_bridge::MockCommandList", "begin while already recording");
        }
        self.recording = true;
        self.push(RecordedCommand::Begin);
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        self.require_recording("end")?;
        if self.in_render_pass {
            engine_bail!("gfx_bridge::MockCommandList", "end inside a render pass");
        }
        self.recording = false;
        self.push(RecordedCommand::End);
        Ok(())
    }

    fn begin_render_pass(
        &mut self,
        render_pass: &Arc<dyn RenderPass>,
        framebuffer: &Arc<dyn Framebuffer>,
        render_area: Rect2D,
        clear_values: &[ClearValue],
    ) -> Result<()> {
        self.require_recording("begin_render_pass")?;
        if self.in_render_pass {
            engine_bail!("gfx_bridge::MockCommandList", "nested render pass");
        }
        self.in_render_pass = true;
        self.push(RecordedCommand::BeginRenderPass {
            render_pass: render_pass.info().clone(),
            framebuffer_size: (framebuffer.width(), framebuffer.height()),
            render_area,
            clear_values: clear_values.to_vec(),
        });
        Ok(())
    }

    fn end_render_pass(&mut self) -> Result<()> {
        self.require_render_pass("end_render_pass")?;
        self.in_render_pass = false;
        self.push(RecordedCommand::EndRenderPass);
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.require_recording("set_viewport")?;
        self.push(RecordedCommand::SetViewport(viewport));
        Ok(())
    }

    fn set_scissor(&mut self, scissor: Rect2D) -> Result<()> {
        self.require_recording("set_scissor")?;
        self.push(RecordedCommand::SetScissor(scissor));
        Ok(())
    }

    fn bind_pipeline_state(&mut self, pipeline: &Arc<dyn PipelineState>) -> Result<()> {
        self.require_render_pass("bind_pipeline_state")?;
        self.push(RecordedCommand::BindPipelineState(Box::new(
            PipelineSnapshot::from_desc(pipeline.desc()),
        )));
        Ok(())
    }

    fn bind_descriptor_set(&mut self, set_index: u32, _set: &Arc<dyn DescriptorSet>) -> Result<()> {
        self.require_recording("bind_descriptor_set")?;
        self.push(RecordedCommand::BindDescriptorSet(set_index));
        Ok(())
    }

    fn bind_input_assembler(&mut self, input_assembler: &Arc<dyn InputAssembler>) -> Result<()> {
        self.require_recording("bind_input_assembler")?;
        self.push(RecordedCommand::BindInputAssembler {
            attributes: input_assembler.attributes().len(),
            indexed: input_assembler.index_buffer().is_some(),
        });
        Ok(())
    }

    fn draw(&mut self, info: &DrawInfo) -> Result<()> {
        self.require_render_pass("draw")?;
        self.draw_counter.fetch_add(1, Ordering::Relaxed);
        self.push(RecordedCommand::Draw(*info));
        Ok(())
    }
}

// ============================================================================
// Mock Device
// ============================================================================

/// Test-side view of a `MockDevice` that stays usable after the device is
/// moved into an `Arc<Mutex<dyn Device>>`
#[derive(Clone)]
pub struct MockDeviceHandle {
    ledger: SharedLedger,
    log: SharedLog,
}

impl MockDeviceHandle {
    /// Number of objects of `kind` currently alive
    pub fn live_count(&self, kind: MockObjectKind) -> usize {
        self.ledger
            .lock()
            .unwrap()
            .live
            .values()
            .filter(|k| **k == kind)
            .count()
    }

    /// Number of objects of `kind` created since the device was built
    pub fn created_count(&self, kind: MockObjectKind) -> u32 {
        self.ledger
            .lock()
            .unwrap()
            .created
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Copy of every recorded command
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.log.lock().unwrap().clone()
    }

    /// Forget the recorded commands
    pub fn clear_commands(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Recorded draws, in order
    pub fn draws(&self) -> Vec<DrawInfo> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCommand::Draw(info) => Some(info),
                _ => None,
            })
            .collect()
    }

    /// Pipeline snapshots of every bind, in order
    pub fn bound_pipelines(&self) -> Vec<PipelineSnapshot> {
        self.commands()
            .into_iter()
            .filter_map(|c| match c {
                RecordedCommand::BindPipelineState(snapshot) => Some(*snapshot),
                _ => None,
            })
            .collect()
    }
}

pub struct MockDevice {
    api: DeviceApi,
    swapchain_format: TextureFormat,
    ledger: SharedLedger,
    log: SharedLog,
    draw_counter: Arc<AtomicU32>,
    stats: DeviceStats,
    fail_next: Option<MockObjectKind>,
}

impl MockDevice {
    pub fn new(api: DeviceApi) -> Self {
        Self {
            api,
            swapchain_format: TextureFormat::B8G8R8A8_UNORM,
            ledger: Arc::new(Mutex::new(MockLedger::default())),
            log: Arc::new(Mutex::new(Vec::new())),
            draw_counter: Arc::new(AtomicU32::new(0)),
            stats: DeviceStats::default(),
            fail_next: None,
        }
    }

    /// Build a device already wrapped for injection, plus its test handle
    pub fn shared(api: DeviceApi) -> (Arc<Mutex<dyn Device>>, MockDeviceHandle) {
        let device = Self::new(api);
        let handle = device.handle();
        (Arc::new(Mutex::new(device)), handle)
    }

    /// Color format of swapchains created by this device
    pub fn with_swapchain_format(mut self, format: TextureFormat) -> Self {
        self.swapchain_format = format;
        self
    }

    /// Make the next creation of `kind` fail with `Error::OutOfMemory`
    pub fn fail_next_creation(&mut self, kind: MockObjectKind) {
        self.fail_next = Some(kind);
    }

    pub fn handle(&self) -> MockDeviceHandle {
        MockDeviceHandle {
            ledger: self.ledger.clone(),
            log: self.log.clone(),
        }
    }

    fn check_injected_failure(&mut self, kind: MockObjectKind) -> Result<()> {
        if self.fail_next == Some(kind) {
            self.fail_next = None;
            return Err(Error::OutOfMemory);
        }
        Ok(())
    }

    fn make_texture(ledger: &SharedLedger, info: TextureInfo) -> Arc<dyn Texture> {
        Arc::new(MockTexture {
            info,
            _lifetime: MockLifetime::register(ledger, MockObjectKind::Texture),
        })
    }

    fn push(&self, command: RecordedCommand) {
        self.log.lock().unwrap().push(command);
    }
}

impl Device for MockDevice {
    fn api(&self) -> DeviceApi {
        self.api
    }

    fn create_swapchain(&mut self, desc: &SwapchainDesc) -> Result<Box<dyn Swapchain>> {
        self.check_injected_failure(MockObjectKind::Swapchain)?;
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidResource(format!(
                "swapchain size {}x{}",
                desc.width, desc.height
            )));
        }
        let (color, depth_stencil) =
            MockSwapchain::make_images(&self.ledger, self.swapchain_format, desc.width, desc.height);
        Ok(Box::new(MockSwapchain {
            ledger: self.ledger.clone(),
            format: self.swapchain_format,
            width: desc.width,
            height: desc.height,
            image_index: 0,
            color,
            depth_stencil,
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::Swapchain),
        }))
    }

    fn create_render_pass(&mut self, info: &RenderPassInfo) -> Result<Arc<dyn RenderPass>> {
        self.check_injected_failure(MockObjectKind::RenderPass)?;
        if info.color_attachments.is_empty() && info.depth_stencil_attachment.is_none() {
            return Err(Error::InvalidResource("render pass without attachments".to_string()));
        }
        Ok(Arc::new(MockRenderPass {
            info: info.clone(),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::RenderPass),
        }))
    }

    fn create_framebuffer(&mut self, desc: &FramebufferDesc) -> Result<Arc<dyn Framebuffer>> {
        self.check_injected_failure(MockObjectKind::Framebuffer)?;
        let first = desc
            .color_textures
            .first()
            .or(desc.depth_stencil_texture.as_ref())
            .ok_or_else(|| Error::InvalidResource("framebuffer without attachments".to_string()))?;
        let (width, height) = (first.info().width, first.info().height);
        Ok(Arc::new(MockFramebuffer {
            render_pass: desc.render_pass.clone(),
            color_textures: desc.color_textures.clone(),
            depth_stencil_texture: desc.depth_stencil_texture.clone(),
            width,
            height,
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::Framebuffer),
        }))
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<Arc<dyn Texture>> {
        self.check_injected_failure(MockObjectKind::Texture)?;
        if desc.width == 0 || desc.height == 0 {
            return Err(Error::InvalidResource(format!(
                "texture size {}x{}",
                desc.width, desc.height
            )));
        }
        if desc.format == TextureFormat::Undefined {
            return Err(Error::InvalidResource("texture format is undefined".to_string()));
        }
        Ok(Self::make_texture(&self.ledger, TextureInfo::from(desc)))
    }

    fn create_sampler(&mut self, desc: &SamplerDesc) -> Result<Arc<dyn Sampler>> {
        self.check_injected_failure(MockObjectKind::Sampler)?;
        Ok(Arc::new(MockSampler {
            desc: *desc,
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::Sampler),
        }))
    }

    fn create_buffer(&mut self, desc: &BufferDesc) -> Result<Arc<dyn Buffer>> {
        self.check_injected_failure(MockObjectKind::Buffer)?;
        if desc.size == 0 {
            return Err(Error::InvalidResource("buffer size is 0".to_string()));
        }
        Ok(Arc::new(MockBuffer {
            size: desc.size,
            stride: desc.stride,
            usage: desc.usage,
            data: Mutex::new(vec![0; desc.size as usize]),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::Buffer),
        }))
    }

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<Arc<dyn Shader>> {
        self.check_injected_failure(MockObjectKind::Shader)?;
        Ok(Arc::new(MockShader {
            name: desc.name.clone(),
            attributes: desc.attributes.clone(),
            blocks: desc.blocks.clone(),
            samplers: desc.samplers.clone(),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::Shader),
        }))
    }

    fn create_descriptor_set_layout(
        &mut self,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        self.check_injected_failure(MockObjectKind::DescriptorSetLayout)?;
        Ok(Arc::new(MockDescriptorSetLayout {
            bindings: desc.bindings.clone(),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::DescriptorSetLayout),
        }))
    }

    fn create_pipeline_layout(&mut self, desc: &PipelineLayoutDesc) -> Result<Arc<dyn PipelineLayout>> {
        self.check_injected_failure(MockObjectKind::PipelineLayout)?;
        Ok(Arc::new(MockPipelineLayout {
            set_layout_count: desc.set_layouts.len(),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::PipelineLayout),
        }))
    }

    fn create_descriptor_set(&mut self, _desc: &DescriptorSetDesc) -> Result<Arc<dyn DescriptorSet>> {
        self.check_injected_failure(MockObjectKind::DescriptorSet)?;
        Ok(Arc::new(MockDescriptorSet {
            buffers: Mutex::new(FxHashMap::default()),
            textures: Mutex::new(FxHashMap::default()),
            log: self.log.clone(),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::DescriptorSet),
        }))
    }

    fn create_pipeline_state(&mut self, desc: &PipelineStateDesc) -> Result<Arc<dyn PipelineState>> {
        self.check_injected_failure(MockObjectKind::PipelineState)?;
        Ok(Arc::new(MockPipelineState {
            desc: desc.clone(),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::PipelineState),
        }))
    }

    fn create_input_assembler(&mut self, desc: &InputAssemblerDesc) -> Result<Arc<dyn InputAssembler>> {
        self.check_injected_failure(MockObjectKind::InputAssembler)?;
        if desc.vertex_buffers.is_empty() {
            return Err(Error::InvalidResource("input assembler without vertex buffer".to_string()));
        }
        Ok(Arc::new(MockInputAssembler {
            attributes: desc.attributes.clone(),
            vertex_buffers: desc.vertex_buffers.clone(),
            index_buffer: desc.index_buffer.clone(),
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::InputAssembler),
        }))
    }

    fn create_command_list(&mut self) -> Result<Box<dyn CommandList>> {
        self.check_injected_failure(MockObjectKind::CommandList)?;
        Ok(Box::new(MockCommandList {
            log: self.log.clone(),
            draw_counter: self.draw_counter.clone(),
            recording: false,
            in_render_pass: false,
            _lifetime: MockLifetime::register(&self.ledger, MockObjectKind::CommandList),
        }))
    }

    fn acquire(&mut self, swapchains: &mut [Box<dyn Swapchain>]) -> Result<()> {
        for swapchain in swapchains.iter_mut() {
            let image_index = swapchain.acquire_next_image()?;
            self.push(RecordedCommand::Acquire { image_index });
        }
        Ok(())
    }

    fn flush_commands(&mut self, _lists: &[&dyn CommandList]) -> Result<()> {
        self.push(RecordedCommand::FlushCommands);
        Ok(())
    }

    fn submit(&mut self, _lists: &[&dyn CommandList]) -> Result<()> {
        self.push(RecordedCommand::Submit);
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.push(RecordedCommand::Present);
        self.stats.draw_calls = self.draw_counter.swap(0, Ordering::Relaxed);
        self.stats.frames_presented += 1;
        Ok(())
    }

    fn wait_idle(&self) -> Result<()> {
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
