/// CullBin trait - per-frame culling strategy driven by the scene layer
///
/// A bin collects the frame's candidate objects, prepares them once the
/// camera is known, then submits what survives culling to a device.
///
/// Per-frame call order:
/// 1. `add_object` for every candidate
/// 2. `finish_cull` once
/// 3. `draw` once
/// 4. `clear` before the next frame (or replace the bin)

use glam::Mat4;
use crate::camera::Camera;
use crate::error::Result;
use crate::graphics_device::GraphicsDevice;
use crate::scene::CullObject;

pub trait CullBin: Send {
    /// Accept one object for this frame.
    ///
    /// # Arguments
    ///
    /// * `object` - Object to cull
    /// * `world_transform` - Net transform placing the object's local bounds in the world
    fn add_object(&mut self, object: CullObject, world_transform: &Mat4);

    /// Close collection and prepare the draw for `camera`.
    fn finish_cull(&mut self, camera: &Camera) -> Result<()>;

    /// Submit this frame's visible objects to `device`.
    ///
    /// # Arguments
    ///
    /// * `device` - Device receiving proxy tests and object draws
    /// * `force` - Passed through to `GraphicsDevice::draw_object`
    fn draw(&mut self, device: &mut dyn GraphicsDevice, force: bool) -> Result<()>;

    /// Drop all per-frame state.
    fn clear(&mut self);
}
