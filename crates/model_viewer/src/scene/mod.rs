//! Scene management system
//!
//! A viewer scene is deliberately small: one light, one camera, at most one
//! loaded object. The interesting part is its lifecycle.
//!
//! ```text
//! SyncController ──build──▶ SceneBuilder ──▶ SceneHandle (generation N)
//!        │                                      ├─ Scene (light + objects)
//!        │                                      ├─ Camera (auto-framed)
//!        │                                      ├─ TargetId (mounted)
//!        │                                      └─ RenderLoop (LoopToken)
//!        └─ ObjectRef { N, key } ── resolves only while N is live
//! ```

mod graph;
mod framing;
mod builder;

pub use graph::{AABB, LoadedObject, ObjectRef, Scene};
pub use framing::{Framing, GeometryFramer};
pub use builder::{BuildRequest, SceneBuilder, SceneHandle};
