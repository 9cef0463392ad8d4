/// Swapchain trait - for window presentation

use std::sync::Arc;
use winit::window::Window;

use crate::config::VsyncMode;
use crate::error::Result;
use crate::device::{Texture, TextureFormat};

/// Descriptor for creating a swapchain
#[derive(Debug, Clone)]
pub struct SwapchainDesc {
    /// Window surface (`None` = headless)
    pub window: Option<Arc<Window>>,
    pub vsync: VsyncMode,
    pub width: u32,
    pub height: u32,
}

/// Swapchain for presenting rendered images to a window
///
/// Exposes the current backbuffer and its depth-stencil companion as textures,
/// so the default framebuffer can be built from them.
pub trait Swapchain: Send + Sync {
    /// Acquire the next available image index
    fn acquire_next_image(&mut self) -> Result<u32>;

    /// Recreate the images at a new size
    fn resize(&mut self, width: u32, height: u32) -> Result<()>;

    /// Width of the images in pixels
    fn width(&self) -> u32;

    /// Height of the images in pixels
    fn height(&self) -> u32;

    /// Pixel format of the color images
    fn color_format(&self) -> TextureFormat;

    /// Current color backbuffer
    fn color_texture(&self) -> Arc<dyn Texture>;

    /// Depth-stencil texture paired with the backbuffer
    fn depth_stencil_texture(&self) -> Arc<dyn Texture>;
}
