//! Viewer-level errors

use thiserror::Error;

use crate::config::ConfigError;
use crate::foundation::color::ColorError;
use crate::render::RenderError;

/// Errors surfaced by the synchronization controller
///
/// Asset load failures are deliberately absent: a failed load leaves the scene
/// lit and framed without an object and is only logged.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Render target allocation, mounting or drawing failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Scale must be positive and finite
    #[error("Invalid scale: {0}")]
    InvalidScale(f32),

    /// Background color could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(#[from] ColorError),

    /// Configuration could not be loaded or failed validation
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
