//! Asset management system
//!
//! The viewer never parses asset formats itself. An [`AssetLoader`] turns an
//! opaque [`AssetHandle`] into an [`ObjectTree`] and reports back through a
//! [`LoadRequest`], which the controller drains on its own thread.

pub mod object_tree;
pub mod loader;
pub mod memory_loader;

pub use object_tree::{ObjectNode, ObjectTree, Primitive, Vertex};
pub use loader::{AssetLoader, LoadCompletion, LoadQueue, LoadRequest, LoadResult, LoadTicket};
pub use memory_loader::{DeliveryMode, InMemoryLoader};

use std::fmt;
use thiserror::Error;

/// Opaque reference to a loadable asset (URL, object URL, file path...)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetHandle(String);

impl AssetHandle {
    /// Wrap a locator string
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// The locator string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Asset loading errors
///
/// These never escape the controller; a failed load leaves an empty scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Nothing is reachable under the handle
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// The asset was reachable but could not be decoded
    #[error("Malformed asset {handle}: {reason}")]
    Malformed {
        /// Handle that failed
        handle: String,
        /// Loader-provided description
        reason: String,
    },

    /// The loader gave up on the request
    #[error("Asset load cancelled")]
    Cancelled,
}
