/// GraphicsDevice trait - what culling bins need from a rendering backend
///
/// Two families of commands:
/// - draw submission for culled objects (`draw_object`)
/// - proxy rendering for occlusion tests: write masks, push constants,
///   a unit cube, and begin/end occlusion query brackets
///
/// Backends implement this on top of their command recording (Vulkan
/// command buffers, D3D12 command lists, etc.).

use bitflags::bitflags;
use crate::error::Result;
use crate::scene::CullObject;
use super::occlusion_query::OcclusionQuery;

// ===== PUSH CONSTANT LAYOUT =====

/// Offset of the proxy MVP matrix (64 bytes, column-major)
pub const PUSH_CONSTANT_MVP_OFFSET: u32 = 0;
/// Offset of the proxy model matrix (64 bytes, column-major)
pub const PUSH_CONSTANT_MODEL_OFFSET: u32 = 64;
/// Offset of the debug wireframe color (16 bytes, RGBA f32)
pub const PUSH_CONSTANT_COLOR_OFFSET: u32 = 128;

bitflags! {
    /// Framebuffer write mask.
    ///
    /// Occlusion proxies are drawn with an empty mask: the depth test
    /// still runs, but neither color nor depth is written.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WriteMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

/// Rendering backend used by culling bins.
///
/// All methods record commands on the current frame. Occlusion query
/// results arrive asynchronously through the returned `OcclusionQuery`.
pub trait GraphicsDevice: Send {
    /// Whether the backend can issue occlusion queries at all.
    ///
    /// When `false`, bins treat every tested node as visible.
    fn supports_occlusion_queries(&self) -> bool;

    /// Begin an occlusion query. Everything drawn until
    /// `end_occlusion_query` contributes to its fragment count.
    fn begin_occlusion_query(&mut self) -> Result<()>;

    /// End the current occlusion query.
    ///
    /// Returns `None` if the backend could not allocate a query; the
    /// caller then treats the tested volume as visible.
    fn end_occlusion_query(&mut self) -> Result<Option<Box<dyn OcclusionQuery>>>;

    /// Set the framebuffer write mask for subsequent draws.
    fn set_write_mask(&mut self, mask: WriteMask) -> Result<()>;

    /// Push constants for the proxy shader.
    ///
    /// # Arguments
    ///
    /// * `offset` - Offset in bytes (see `PUSH_CONSTANT_*_OFFSET`)
    /// * `data` - Data to push
    fn push_constants(&mut self, offset: u32, data: &[u8]) -> Result<()>;

    /// Draw the unit cube `[-1, 1]^3` with the pushed transform.
    ///
    /// `wireframe` selects the debug line topology.
    fn draw_unit_cube(&mut self, wireframe: bool) -> Result<()>;

    /// Submit one object's geometry with its state and transform.
    ///
    /// # Arguments
    ///
    /// * `object` - Object to draw
    /// * `force` - Draw even if some resources are not resident yet
    ///
    /// # Returns
    ///
    /// `true` if the object was submitted
    fn draw_object(&mut self, object: &CullObject, force: bool) -> Result<bool>;
}
