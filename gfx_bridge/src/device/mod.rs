/// Device module - the device contract consumed by the command buffer

// Module declarations
pub mod device;
pub mod buffer;
pub mod texture;
pub mod shader;
pub mod pipeline;
pub mod descriptor_set;
pub mod render_pass;
pub mod frame_buffer;
pub mod swapchain;
pub mod input_assembler;
pub mod command_list;

// Re-export everything from device.rs
pub use device::*;

// Re-export from other modules
pub use buffer::*;
pub use texture::*;
pub use shader::*;
pub use pipeline::*;
pub use descriptor_set::*;
pub use render_pass::*;
pub use frame_buffer::*;
pub use swapchain::*;
pub use input_assembler::*;
pub use command_list::*;

// Mock device for tests (no GPU required)
#[cfg(test)]
pub mod mock_device;
