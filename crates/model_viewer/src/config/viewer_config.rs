//! # Viewer Configuration
//!
//! All tunables of the viewer in one serializable struct: viewport, camera
//! projection, framing limits, interaction step sizes and the sync policy.
//! Missing fields fall back to the defaults below, so a config file only needs
//! to name what it overrides.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::color::Color;
use crate::render::lighting::LightMode;
use crate::render::Viewport;
use crate::sync::SyncPolicy;

/// # Camera Configuration
///
/// Perspective projection used for every freshly built scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    /// Distance to near clipping plane
    pub near: f32,
    /// Distance to far clipping plane
    pub far: f32,
    /// Distance along +Z before any asset has been framed
    pub default_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            default_distance: 800.0,
        }
    }
}

/// # Viewer Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Camera distance used when the asset bounds are empty or degenerate
    ///
    /// Non-degenerate bounds are always framed at their fitted distance,
    /// even when that is closer than this value.
    pub min_framing_distance: f32,
    /// Scale multiplier applied by zoom-in
    pub zoom_in_factor: f32,
    /// Scale multiplier applied by zoom-out
    pub zoom_out_factor: f32,
    /// Default angle (radians) of one rotate step
    pub rotate_step: f32,
    /// Which state changes rebuild the scene
    pub sync_policy: SyncPolicy,
    /// Background color before the user picks one
    pub initial_background: Color,
    /// Lighting rig before the user picks one
    pub initial_light_mode: LightMode,
    /// Fixed logical size of the render target
    pub viewport: Viewport,
    /// Camera projection parameters
    pub camera: CameraConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            min_framing_distance: 0.1,
            zoom_in_factor: 1.2,
            zoom_out_factor: 0.9,
            rotate_step: 0.1,
            sync_policy: SyncPolicy::default(),
            initial_background: Color::WHITE,
            initial_light_mode: LightMode::Ambient,
            viewport: Viewport::new(1200, 600),
            camera: CameraConfig::default(),
        }
    }
}

impl Config for ViewerConfig {}

fn positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl ViewerConfig {
    /// Set the sync policy
    #[must_use]
    pub const fn with_sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Set the viewport size
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "Viewport must be non-empty, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }

        let fov = self.camera.fov_degrees;
        if !(fov.is_finite() && fov > 0.0 && fov < 180.0) {
            return Err(ConfigError::Invalid(format!("Field of view must be in (0, 180) degrees, got {fov}")));
        }

        if !positive_finite(self.camera.near) || !self.camera.far.is_finite() || self.camera.far <= self.camera.near {
            return Err(ConfigError::Invalid(format!(
                "Clip planes must satisfy 0 < near < far, got near={} far={}",
                self.camera.near, self.camera.far
            )));
        }

        if !positive_finite(self.camera.default_distance) {
            return Err(ConfigError::Invalid("Default camera distance must be positive".to_string()));
        }

        if !positive_finite(self.min_framing_distance) {
            return Err(ConfigError::Invalid("Minimum framing distance must be positive".to_string()));
        }

        if !positive_finite(self.zoom_in_factor) || !positive_finite(self.zoom_out_factor) {
            return Err(ConfigError::Invalid("Zoom factors must be positive".to_string()));
        }

        if !self.rotate_step.is_finite() {
            return Err(ConfigError::Invalid("Rotate step must be finite".to_string()));
        }

        Ok(())
    }
}
