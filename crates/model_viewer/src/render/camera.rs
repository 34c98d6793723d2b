//! # 3D Camera System
//!
//! Perspective camera used by every viewer scene.
//!
//! ## Design Principles
//! - **Library-agnostic**: No GPU API dependencies in camera math
//! - **Look-at driven**: Orientation is always derived from position, target and up
//! - **Right-handed Y-up**: +X right, +Y up, +Z towards the viewer

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, utils};

/// Perspective camera
///
/// Represents a camera in 3D space with position, look-at target and
/// projection parameters. Matrices are computed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height) for projection calculations
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera with standard Y-up orientation
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees (converted to radians internally)
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    ///
    /// # Example
    /// ```rust
    /// use model_viewer::foundation::math::Vec3;
    /// use model_viewer::render::Camera;
    ///
    /// let camera = Camera::perspective(
    ///     Vec3::new(0.0, 0.0, 800.0),  // Pulled back along +Z
    ///     75.0,                         // 75-degree vertical field of view
    ///     1200.0 / 600.0,               // Viewer aspect ratio
    ///     0.1,
    ///     1000.0,
    /// );
    /// assert_eq!(camera.target, Vec3::zeros());
    /// ```
    ///
    /// The default target is the origin and the up vector is +Y.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `target`, keeping the current up vector
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera looking at: {:?}", target);
    }

    /// Distance between the camera and its target
    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).norm()
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Perspective projection transform
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined `P × V`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
