//! # Model Viewer
//!
//! State-to-scene synchronization engine for an interactive 3D model viewer.
//!
//! The crate owns a retained-mode scene (camera, one light, the loaded asset),
//! decides when a state change needs a full rebuild of that scene and when the
//! live object can be mutated in place, frames the camera around the asset's
//! bounding box and drives a continuous, cancellable redraw loop.
//!
//! ## Features
//!
//! - **Auto-framing**: closed-form camera placement from asset bounds
//! - **Lighting rigs**: ambient, directional and point presets
//! - **Explicit sync policy**: structural vs incremental changes as a decision table
//! - **Stale-load protection**: generation tokens on every asynchronous completion
//! - **Pluggable backends**: rendering, display surface and asset loading are traits
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use model_viewer::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut loader = InMemoryLoader::new();
//!     loader.insert(AssetHandle::new("demo://cube"), ObjectTree::cuboid("cube", Vec3::new(1.0, 1.0, 1.0)));
//!
//!     let mut viewer = SyncController::new(ViewerConfig::default(), HeadlessBackend::new(), loader)?;
//!     viewer.load_asset(AssetHandle::new("demo://cube"))?;
//!     viewer.poll_loads();
//!     viewer.rotate(RotateDirection::Up, 0.1);
//!     viewer.zoom_in()?;
//!     viewer.frame()?;
//!     Ok(())
//! }
//! ```


pub mod foundation;
pub mod config;
pub mod assets;
pub mod render;
pub mod scene;
pub mod sync;

mod error;

pub use error::ViewerError;

/// Common imports for viewer hosts
pub mod prelude {
    pub use crate::{
        ViewerError,
        foundation::{
            color::Color,
            math::{Vec3, Mat4, Transform},
        },
        config::{Config, ConfigError, ViewerConfig, CameraConfig},
        assets::{AssetHandle, AssetLoader, AssetError, InMemoryLoader, LoadRequest, ObjectTree, ObjectNode, Primitive},
        render::{
            Camera, RenderBackend, DisplaySurface, HeadlessBackend, RenderError, TargetId, Viewport,
            lighting::{Light, LightFactory, LightMode},
            render_loop::{FrameOutcome, LoopToken},
        },
        scene::{GeometryFramer, SceneBuilder, SceneHandle, AABB},
        sync::{ChangeKind, ChangeSet, RotateDirection, Rotation, SyncController, SyncPolicy, ViewState},
    };
}
