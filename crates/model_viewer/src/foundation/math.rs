//! Math types for transforms, framing and the camera
//!
//! Thin aliases over `nalgebra` plus the viewer's Euler [`Transform`].

pub use nalgebra::{Matrix4, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Position, XYZ Euler rotation (radians) and per-axis scale
///
/// The matrix is `T · Rx · Ry · Rz · S`. Angles are kept as given, so an
/// accumulated pitch of `5π` stays `5π` instead of being folded into yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation
    pub position: Vec3,
    /// Euler angles around X, Y and Z
    pub rotation: Vec3,
    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::repeat(1.0),
        }
    }
}

impl Transform {
    /// No translation, rotation or scaling
    pub fn identity() -> Self {
        Self::default()
    }

    /// Pure translation
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Same scale factor on every axis
    pub fn set_uniform_scale(&mut self, factor: f32) {
        self.scale = Vec3::repeat(factor);
    }

    /// Local-to-parent matrix
    pub fn to_matrix(&self) -> Mat4 {
        let axis_turn = |axis, angle| Mat4::from_axis_angle(&axis, angle);
        Mat4::new_translation(&self.position)
            * axis_turn(Vec3::x_axis(), self.rotation.x)
            * axis_turn(Vec3::y_axis(), self.rotation.y)
            * axis_turn(Vec3::z_axis(), self.rotation.z)
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Map a local point into the parent space
    pub fn transform_point(&self, point: Point3) -> Point3 {
        self.to_matrix().transform_point(&point)
    }
}

/// Scalar helpers
pub mod utils {
    use super::Vec3;

    /// Degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Largest of the three components
    pub fn max_component(v: &Vec3) -> f32 {
        v.x.max(v.y).max(v.z)
    }
}

/// Camera matrices on [`Mat4`]
pub trait Mat4Ext {
    /// Right-handed perspective projection
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_transform_is_identity_matrix() {
        assert_relative_eq!(Transform::identity().to_matrix(), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let mut transform = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        transform.set_uniform_scale(2.0);

        let moved = transform.transform_point(Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(moved, Point3::new(3.0, 2.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_pitch_turns_up_into_towards_viewer() {
        let transform = Transform {
            rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
            ..Transform::default()
        };

        let rotated = transform.transform_point(Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(rotated, Point3::new(0.0, 0.0, 1.0), epsilon = EPSILON);
    }

    #[test]
    fn test_unwrapped_angles_match_wrapped_ones() {
        let wrapped = Transform {
            rotation: Vec3::new(PI, 0.0, 0.0),
            ..Transform::default()
        };
        let unwrapped = Transform {
            rotation: Vec3::new(5.0 * PI, 0.0, 0.0),
            ..Transform::default()
        };
        assert_relative_eq!(wrapped.to_matrix(), unwrapped.to_matrix(), epsilon = 1e-4);
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(utils::deg_to_rad(180.0), PI, epsilon = EPSILON);
        assert_relative_eq!(utils::max_component(&Vec3::new(1.0, 7.0, -9.0)), 7.0);
    }
}
