/// Cullable objects handed to culling bins by the scene traversal.
///
/// A CullObject is a lightweight reference to something the draw layer
/// knows how to render: a geometry key, a transform key, and the geometry's
/// local-space bounding sphere. The (geometry, transform) pair is the
/// identity used for frame-to-frame visibility tracking.

use glam::{Mat4, Vec3};
use slotmap::new_key_type;

// ===== SLOT MAP KEYS =====

new_key_type! {
    /// Stable key for a piece of renderable geometry owned by the scene layer.
    pub struct GeometryKey;

    /// Stable key for a net (world) transform owned by the scene layer.
    ///
    /// Two objects sharing a geometry but placed with different transforms
    /// are different objects for visibility purposes.
    pub struct TransformKey;
}

// ===== BOUNDING SPHERE =====

/// Bounding sphere, in local or world space depending on context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center
    pub center: Vec3,
    /// Sphere radius (>= 0 for a non-empty sphere)
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// An empty sphere bounds nothing (negative or NaN radius, or a
    /// non-finite center). Empty spheres never enter an octree.
    pub fn is_empty(&self) -> bool {
        !self.radius.is_finite() || self.radius < 0.0 || !self.center.is_finite()
    }

    /// Transform this sphere by a matrix.
    ///
    /// The radius is scaled by the largest axis scale so the result still
    /// encloses the transformed volume under non-uniform scale.
    pub fn transformed(&self, matrix: &Mat4) -> BoundingSphere {
        let scale = matrix.x_axis.truncate().length()
            .max(matrix.y_axis.truncate().length())
            .max(matrix.z_axis.truncate().length());

        BoundingSphere {
            center: matrix.transform_point3(self.center),
            radius: self.radius * scale,
        }
    }

    /// Minimum corner of the sphere's axis-aligned box.
    pub fn min(&self) -> Vec3 {
        self.center - Vec3::splat(self.radius)
    }

    /// Maximum corner of the sphere's axis-aligned box.
    pub fn max(&self) -> Vec3 {
        self.center + Vec3::splat(self.radius)
    }
}

// ===== CULL OBJECT =====

/// An object submitted to a culling bin for one frame.
#[derive(Debug, Clone, Copy)]
pub struct CullObject {
    geometry: GeometryKey,
    transform: TransformKey,
    local_bounds: Option<BoundingSphere>,
}

impl CullObject {
    /// Create a cull object.
    ///
    /// # Arguments
    ///
    /// * `geometry` - Geometry to draw
    /// * `transform` - Net transform the geometry is drawn with
    /// * `local_bounds` - Bounding sphere in the geometry's local space,
    ///   or `None` when the geometry has no bounds
    pub fn new(
        geometry: GeometryKey,
        transform: TransformKey,
        local_bounds: Option<BoundingSphere>,
    ) -> Self {
        Self { geometry, transform, local_bounds }
    }

    pub fn geometry(&self) -> GeometryKey {
        self.geometry
    }

    pub fn transform(&self) -> TransformKey {
        self.transform
    }

    pub fn local_bounds(&self) -> Option<&BoundingSphere> {
        self.local_bounds.as_ref()
    }

    /// World-space bounding sphere, or `None` if the bounds are missing,
    /// empty, or degenerate after transformation.
    pub fn world_bounds(&self, world_transform: &Mat4) -> Option<BoundingSphere> {
        let local = self.local_bounds?;
        if local.is_empty() {
            return None;
        }
        let world = local.transformed(world_transform);
        if world.is_empty() {
            return None;
        }
        Some(world)
    }
}

#[cfg(test)]
#[path = "cull_object_tests.rs"]
mod tests;
