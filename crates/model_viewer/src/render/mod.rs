//! Rendering layer
//!
//! The viewer talks to the GPU only through [`RenderBackend`] and
//! [`DisplaySurface`]. This module also holds the camera, the lighting rigs and
//! the render loop that paints the live scene once per display refresh.

pub mod backend;
pub mod camera;
pub mod headless;
pub mod lighting;
pub mod render_loop;

pub use backend::{BackendResult, DisplaySurface, RenderBackend, TargetId, Viewport};
pub use camera::Camera;
pub use headless::{FrameRecord, HeadlessBackend};

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// Backend could not allocate a render target
    #[error("Render target allocation failed: {0}")]
    TargetAllocation(String),

    /// Target id is not (or no longer) known to the backend
    #[error("Unknown render target: {0:?}")]
    UnknownTarget(TargetId),

    /// Target could not be attached to the display surface
    #[error("Mount failed: {0}")]
    Mount(String),

    /// Frame submission failed
    #[error("Draw failed: {0}")]
    Draw(String),
}
