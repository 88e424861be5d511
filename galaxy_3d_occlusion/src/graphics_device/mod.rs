/// Graphics device module - backend interface used by culling bins

// Module declarations
pub mod graphics_device;
pub mod occlusion_query;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use occlusion_query::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
