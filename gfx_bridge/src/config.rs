/// Configuration structures for the presentation surface and the command buffer

use std::sync::Arc;
use winit::window::Window;

use crate::device::SwapchainDesc;

/// Presentation synchronisation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VsyncMode {
    /// Present immediately, tearing allowed
    Off,
    /// Wait for vertical blank
    #[default]
    On,
    /// Wait for vertical blank unless the frame is late
    Relaxed,
    /// Triple-buffered mailbox presentation
    Mailbox,
}

/// Out-of-band swapchain parameters supplied by the platform layer
///
/// Read on the first `begin_frame` to create the swapchain lazily.
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Window to present into (`None` = headless swapchain)
    pub window: Option<Arc<Window>>,
    /// Vsync mode
    pub vsync: VsyncMode,
    /// Initial width in pixels
    pub width: u32,
    /// Initial height in pixels
    pub height: u32,
}

impl SurfaceConfig {
    /// Surface backed by a window
    pub fn for_window(window: Arc<Window>, vsync: VsyncMode) -> Self {
        let size = window.inner_size();
        Self {
            window: Some(window),
            vsync,
            width: size.width,
            height: size.height,
        }
    }

    /// Surface without a window (offscreen / tests)
    pub fn headless(width: u32, height: u32) -> Self {
        Self {
            window: None,
            vsync: VsyncMode::default(),
            width,
            height,
        }
    }

    /// Build the swapchain descriptor for this surface
    pub fn to_swapchain_desc(&self) -> SwapchainDesc {
        SwapchainDesc {
            window: self.window.clone(),
            vsync: self.vsync,
            width: self.width,
            height: self.height,
        }
    }
}

/// Command buffer tunables
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandBufferConfig {
    /// Scissor extent used when the scissor test is disabled
    pub unbounded_scissor_extent: u32,
    /// Line width used until `set_line_width` is called
    pub default_line_width: f32,
}

impl Default for CommandBufferConfig {
    fn default() -> Self {
        Self {
            unbounded_scissor_extent: 32768,
            default_line_width: 1.0,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
