//! Camera projection parameters
//!
//! A camera is a node variant: [`PerspectiveProjection`] holds the projection
//! parameters while the node's world transform supplies the view. The view
//! matrix is the inverse of the rigid part (position + rotation) of that
//! transform; camera scale is deliberately ignored.

use crate::foundation::math::{utils, Mat4, Mat4Ext, Transform};

/// Perspective projection parameters for a camera node
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveProjection {
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Near clipping plane distance
    pub near: f32,

    /// Far clipping plane distance
    pub far: f32,
}

impl PerspectiveProjection {
    /// Create a perspective projection
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    /// Vertical field of view in radians
    pub fn fov_y_radians(&self) -> f32 {
        utils::deg_to_rad(self.fov_y_degrees)
    }

    /// Compute the projection matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov_y_radians(), self.aspect, self.near, self.far)
    }

    /// Update the aspect ratio, typically after a window resize
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

impl Default for PerspectiveProjection {
    fn default() -> Self {
        Self::new(75.0, 4.0 / 3.0, 0.1, 1000.0)
    }
}

/// Derive a view matrix from a camera node's world transform
///
/// Only the rigid part participates: the view is `R⁻¹ · T(-position)`.
pub fn view_matrix(world: &Transform) -> Mat4 {
    world.rotation.inverse().to_homogeneous() * Mat4::new_translation(&-world.position)
}
