/// Camera - view transform and lens, as seen by the culling bins.
///
/// The Camera stores what the caller computed (view matrix) and derives
/// the projection from its Lens. The near-clip distance is a property of
/// the lens: occlusion bins read it to skip queries on geometry that would
/// be clipped by the near plane.
///
/// The culling crate does NOT own cameras. The caller builds one per
/// frame (or reuses it) and passes it to `finish_cull`.

use glam::{Mat4, Vec3};

/// Perspective lens parameters (right-handed, depth range 0..1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lens {
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Width / height
    pub aspect: f32,
    /// Near clip distance (> 0)
    pub near: f32,
    /// Far clip distance (> near)
    pub far: f32,
}

impl Lens {
    /// Projection matrix for this lens.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

impl Default for Lens {
    fn default() -> Self {
        Self {
            fov_y: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Camera used for front-to-back ordering, near-plane tests and
/// projecting the occlusion proxies.
#[derive(Debug, Clone)]
pub struct Camera {
    view_matrix: Mat4,
    lens: Lens,
    projection_matrix: Mat4,
}

impl Camera {
    /// Create a camera from a view matrix (inverse of the camera's world
    /// transform) and a lens.
    pub fn new(view: Mat4, lens: Lens) -> Self {
        Self {
            view_matrix: view,
            projection_matrix: lens.projection_matrix(),
            lens,
        }
    }

    /// Camera at `eye` looking at `target` (Y up).
    pub fn look_at(eye: Vec3, target: Vec3, lens: Lens) -> Self {
        Self::new(Mat4::look_at_rh(eye, target, Vec3::Y), lens)
    }

    // ===== GETTERS =====

    /// View matrix (world → camera space).
    pub fn view_matrix(&self) -> &Mat4 {
        &self.view_matrix
    }

    /// Projection matrix derived from the lens.
    pub fn projection_matrix(&self) -> &Mat4 {
        &self.projection_matrix
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix
    }

    /// Lens parameters.
    pub fn lens(&self) -> &Lens {
        &self.lens
    }

    /// Near clip distance of the lens.
    pub fn near_distance(&self) -> f32 {
        self.lens.near
    }

    /// World-space position of the camera.
    pub fn position(&self) -> Vec3 {
        self.view_matrix.inverse().w_axis.truncate()
    }

    // ===== DISTANCE METRIC =====

    /// Camera-space depth of a world-space point.
    ///
    /// Positive in front of the camera, negative behind it. This is the
    /// metric compared against `near_distance()`.
    pub fn distance_to(&self, world_point: Vec3) -> f32 {
        -self.view_matrix.transform_point3(world_point).z
    }

    /// Camera-space depth of a world-space direction (rotation only).
    ///
    /// Used to rank directions: the smaller the value, the more the
    /// direction points toward the viewer.
    pub fn direction_depth(&self, world_direction: Vec3) -> f32 {
        -self.view_matrix.transform_vector3(world_direction).z
    }

    // ===== SETTERS =====

    /// Set the view matrix.
    pub fn set_view(&mut self, matrix: Mat4) {
        self.view_matrix = matrix;
    }

    /// Replace the lens (recomputes the projection).
    pub fn set_lens(&mut self, lens: Lens) {
        self.projection_matrix = lens.projection_matrix();
        self.lens = lens;
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
