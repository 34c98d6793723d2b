//! Backend abstraction traits for the rendering system
//!
//! This module defines the traits that rendering backends must implement so
//! the scene builder and render loop stay independent of any GPU API.

use serde::{Deserialize, Serialize};

use super::{Camera, RenderError};
use crate::foundation::color::Color;
use crate::scene::Scene;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, RenderError>;

/// Handle to a render target owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetId(pub u64);

/// Logical size of a render target in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect_ratio(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

/// Draw/present primitive
///
/// One target is allocated per live scene; the scene builder hands its id to
/// the scene handle, which releases it on teardown.
pub trait RenderBackend {
    /// Allocate a GPU-backed render target of the given size
    fn create_target(&mut self, viewport: Viewport) -> BackendResult<TargetId>;

    /// Set the color the target is cleared to before each frame
    fn set_clear_color(&mut self, target: TargetId, color: Color) -> BackendResult<()>;

    /// Paint one frame of `scene` seen from `camera` into `target`
    fn draw(&mut self, target: TargetId, scene: &Scene, camera: &Camera) -> BackendResult<()>;

    /// Free the target; unknown ids are ignored
    fn release_target(&mut self, target: TargetId);
}

/// Mount point that makes a render target visible
pub trait DisplaySurface {
    /// Attach `target` to the display
    fn mount(&mut self, target: TargetId) -> BackendResult<()>;

    /// Detach `target`; targets that are not mounted are ignored
    fn unmount(&mut self, target: TargetId);
}
