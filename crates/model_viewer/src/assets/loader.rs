//! Asynchronous asset loading contract
//!
//! Loads are fire-and-forget from the controller's point of view. Each request
//! carries a [`LoadTicket`] naming the scene generation it was issued for; the
//! loader answers at most once by consuming the request, and the answer sits in
//! a [`LoadQueue`] until the controller drains it on its own thread.

use std::sync::mpsc::{self, Receiver, Sender};

use super::{AssetError, AssetHandle, ObjectTree};
use crate::foundation::collections::Generation;

/// Outcome of one load
pub type LoadResult = Result<ObjectTree, AssetError>;

/// Identifies which scene a load belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    /// Generation of the scene that issued the load
    pub generation: Generation,
    /// Asset being loaded
    pub asset: AssetHandle,
}

/// A finished load waiting to be applied
#[derive(Debug)]
pub struct LoadCompletion {
    /// Which scene asked for it
    pub ticket: LoadTicket,
    /// Loaded tree or the reason there is none
    pub result: LoadResult,
}

/// Pending load handed to an [`AssetLoader`]
///
/// Completing consumes the request, so a loader cannot report twice.
/// Dropping it without completing is allowed and means the load never
/// finishes.
#[derive(Debug)]
pub struct LoadRequest {
    ticket: LoadTicket,
    sender: Sender<LoadCompletion>,
}

impl LoadRequest {
    /// Asset to load
    pub fn asset(&self) -> &AssetHandle {
        &self.ticket.asset
    }

    /// Generation the load was issued for
    pub fn generation(&self) -> Generation {
        self.ticket.generation
    }

    /// Report the outcome
    pub fn complete(self, result: LoadResult) {
        let asset = self.ticket.asset.clone();
        if self.sender.send(LoadCompletion { ticket: self.ticket, result }).is_err() {
            log::debug!("Load completion for {asset} dropped: viewer already shut down");
        }
    }
}

/// Asset-loading service
pub trait AssetLoader {
    /// Start loading `request.asset()`
    ///
    /// Implementations may complete synchronously inside this call, later from
    /// another thread, or never.
    fn load(&mut self, request: LoadRequest);
}

/// Mailbox of load completions owned by the controller
#[derive(Debug)]
pub struct LoadQueue {
    sender: Sender<LoadCompletion>,
    receiver: Receiver<LoadCompletion>,
}

impl Default for LoadQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// Create a request whose completion lands in this queue
    pub fn request(&self, generation: Generation, asset: AssetHandle) -> LoadRequest {
        LoadRequest {
            ticket: LoadTicket { generation, asset },
            sender: self.sender.clone(),
        }
    }

    /// Take every completion that has arrived so far
    pub fn drain(&self) -> Vec<LoadCompletion> {
        self.receiver.try_iter().collect()
    }
}
