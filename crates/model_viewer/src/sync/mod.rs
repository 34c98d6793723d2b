//! View state synchronization
//!
//! The controller, the view state it owns and the decision table that maps
//! state changes to scene rebuilds or in-place mutations.

mod controller;
mod policy;
mod state;

pub use controller::SyncController;
pub use policy::{classify, ChangeKind, ChangeSet, SyncPolicy};
pub use state::{ParseDirectionError, RotateDirection, Rotation, ViewState};
