//! Camera module - view transform and lens.
//!
//! Provides the camera-space distance metric shared by the culling bins.

mod camera;

pub use camera::{Camera, Lens};
