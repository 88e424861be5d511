//! Scene-facing types
//!
//! What the scene traversal hands to a culling bin: objects identified by
//! geometry and transform keys, with local-space bounding spheres.

mod cull_object;

pub use cull_object::{BoundingSphere, CullObject, GeometryKey, TransformKey};
