//! Auto-framing
//!
//! Closed-form "fit box in frustum" placement: the camera is pulled back along
//! +Z from the box center far enough that the longest box edge fits both the
//! vertical and the horizontal field of view.

use crate::foundation::math::{Vec3, utils};
use crate::render::Camera;

use super::AABB;

/// Camera placement computed for one bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Where the camera goes
    pub position: Vec3,
    /// What it looks at (the box center)
    pub target: Vec3,
    /// Distance between the two
    pub distance: f32,
    /// Whether the raw distance was replaced by the minimum
    pub clamped: bool,
}

/// Computes camera placement from object bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryFramer {
    min_distance: f32,
}

impl GeometryFramer {
    /// Create a framer that falls back to `min_distance` for degenerate bounds
    pub fn new(min_distance: f32) -> Self {
        Self { min_distance }
    }

    /// Lower bound applied to degenerate bounds
    pub const fn min_distance(&self) -> f32 {
        self.min_distance
    }

    /// Unclamped fit distance for an object whose longest edge is `max_dim`
    ///
    /// `max(fitHeight, fitHeight / aspect)` with
    /// `fitHeight = max_dim / (2 * tan(fov / 2))`. A non-positive or
    /// non-finite aspect ratio falls back to the height fit alone.
    pub fn fit_distance(max_dim: f32, fov_radians: f32, aspect: f32) -> f32 {
        let fit_height = max_dim / (2.0 * (fov_radians * 0.5).tan());
        if aspect.is_finite() && aspect > 0.0 {
            fit_height.max(fit_height / aspect)
        } else {
            fit_height
        }
    }

    /// Placement for `bounds` seen through a `fov_radians` × `aspect` frustum
    pub fn frame(&self, bounds: &AABB, fov_radians: f32, aspect: f32) -> Framing {
        let target = bounds.center();
        let max_dim = bounds.max_dimension();
        let raw = Self::fit_distance(max_dim, fov_radians, aspect);
        let clamped = !(max_dim > 0.0 && raw.is_finite() && raw > 0.0);
        let distance = if clamped { self.min_distance } else { raw };

        Framing {
            position: target + Vec3::new(0.0, 0.0, distance),
            target,
            distance,
            clamped,
        }
    }

    /// Frame `bounds` with `camera`'s own projection and move the camera there
    pub fn apply(&self, camera: &mut Camera, bounds: &AABB) -> Framing {
        let framing = self.frame(bounds, camera.fov, camera.aspect);
        if framing.clamped {
            log::warn!(
                "Degenerate bounds (max dimension {}), clamping camera distance to {}",
                utils::max_component(&bounds.size()),
                framing.distance
            );
        }
        camera.set_position(framing.position);
        camera.look_at(framing.target);
        framing
    }
}
