//! Structural vs incremental decision table
//!
//! Every state change is described as a [`ChangeSet`]. [`classify`] decides,
//! under the configured [`SyncPolicy`], whether the change needs a full scene
//! rebuild or can be applied to the live scene.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which parts of the view state changed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ChangeSet: u8 {
        /// A different (or re-picked) asset
        const ASSET = 1 << 0;
        /// Absolute scale
        const SCALE = 1 << 1;
        /// Background color
        const BACKGROUND = 1 << 2;
        /// Lighting rig
        const LIGHT = 1 << 3;
        /// Accumulated rotation
        const ROTATION = 1 << 4;
    }
}

/// Which changes rebuild the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// Asset, scale, background and light all rebuild (and reload the asset)
    #[default]
    RebuildOnChange,
    /// Only asset and scale rebuild; background and light mutate the live scene
    MutateInPlace,
}

impl SyncPolicy {
    /// Changes that require a rebuild under this policy
    pub const fn structural_changes(self) -> ChangeSet {
        match self {
            Self::RebuildOnChange => ChangeSet::ASSET
                .union(ChangeSet::SCALE)
                .union(ChangeSet::BACKGROUND)
                .union(ChangeSet::LIGHT),
            Self::MutateInPlace => ChangeSet::ASSET.union(ChangeSet::SCALE),
        }
    }
}

/// How a change reaches the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Tear down the live scene and build a new one
    Structural,
    /// Mutate the live scene (or nothing at all for an empty change set)
    Incremental,
}

/// Decide how `changes` are applied under `policy`
///
/// Any structural member makes the whole set structural, since a rebuild
/// picks up every other change from the view state anyway.
pub fn classify(changes: ChangeSet, policy: SyncPolicy) -> ChangeKind {
    if changes.intersects(policy.structural_changes()) {
        ChangeKind::Structural
    } else {
        ChangeKind::Incremental
    }
}
