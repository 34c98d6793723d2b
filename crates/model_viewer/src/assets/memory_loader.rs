//! In-memory asset loader
//!
//! Serves pre-registered object trees. Used by the demo application and the
//! test suites; deferred mode holds requests back until [`InMemoryLoader::flush`]
//! so late or never-arriving completions can be reproduced deterministically.

use std::collections::HashMap;

use super::{AssetError, AssetHandle, AssetLoader, LoadRequest, ObjectTree};

/// When registered assets are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Complete inside `load`
    #[default]
    Immediate,
    /// Queue until `flush`
    Deferred,
}

/// Loader backed by a map of handles to trees
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    assets: HashMap<AssetHandle, ObjectTree>,
    malformed: HashMap<AssetHandle, String>,
    mode: DeliveryMode,
    pending: Vec<LoadRequest>,
    requests_seen: usize,
}

impl InMemoryLoader {
    /// Create an empty loader that completes immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty loader that holds requests until `flush`
    pub fn deferred() -> Self {
        Self {
            mode: DeliveryMode::Deferred,
            ..Self::default()
        }
    }

    /// Register a tree under `handle`
    pub fn insert(&mut self, handle: AssetHandle, tree: ObjectTree) {
        self.malformed.remove(&handle);
        self.assets.insert(handle, tree);
    }

    /// Register a handle whose load fails with [`AssetError::Malformed`]
    pub fn insert_malformed(&mut self, handle: AssetHandle, reason: impl Into<String>) {
        self.assets.remove(&handle);
        self.malformed.insert(handle, reason.into());
    }

    /// Switch delivery mode; already queued requests stay queued
    pub fn set_mode(&mut self, mode: DeliveryMode) {
        self.mode = mode;
    }

    /// Number of requests waiting for `flush`
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Total number of load requests received
    pub fn requests_seen(&self) -> usize {
        self.requests_seen
    }

    /// Complete every queued request in arrival order
    pub fn flush(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for request in pending {
            self.resolve(request);
        }
        count
    }

    /// Drop every queued request without completing it
    pub fn abandon_pending(&mut self) -> usize {
        let count = self.pending.len();
        self.pending.clear();
        count
    }

    fn resolve(&self, request: LoadRequest) {
        let handle = request.asset().clone();
        let result = if let Some(tree) = self.assets.get(&handle) {
            Ok(tree.clone())
        } else if let Some(reason) = self.malformed.get(&handle) {
            Err(AssetError::Malformed {
                handle: handle.to_string(),
                reason: reason.clone(),
            })
        } else {
            Err(AssetError::NotFound(handle.to_string()))
        };
        request.complete(result);
    }
}

impl AssetLoader for InMemoryLoader {
    fn load(&mut self, request: LoadRequest) {
        self.requests_seen += 1;
        log::debug!("Load requested: {} ({})", request.asset(), request.generation());
        match self.mode {
            DeliveryMode::Immediate => self.resolve(request),
            DeliveryMode::Deferred => self.pending.push(request),
        }
    }
}
