//! Continuous redraw loop
//!
//! The host calls [`RenderLoop::tick`] once per display refresh. Each tick
//! re-reads the view state, pushes scale and clear color into the live scene
//! and draws one frame. Cancelling the loop's [`LoopToken`] stops it for good.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{Camera, RenderBackend, RenderError, TargetId};
use crate::foundation::collections::{Generation, ObjectKey};
use crate::foundation::time::FrameTimer;
use crate::scene::Scene;
use crate::sync::ViewState;

/// Cancellable handle to one render loop
///
/// Clones share the same flag, so a host scheduler can hold a token and see
/// the loop stop when its scene is torn down.
#[derive(Debug, Clone)]
pub struct LoopToken {
    generation: Generation,
    cancelled: Arc<AtomicBool>,
}

impl LoopToken {
    fn new(generation: Generation) -> Self {
        Self {
            generation,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Stop the loop; idempotent
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) was called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Opposite of [`is_cancelled`](Self::is_cancelled)
    pub fn is_active(&self) -> bool {
        !self.is_cancelled()
    }

    /// Generation of the scene this loop draws
    pub const fn generation(&self) -> Generation {
        self.generation
    }
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was submitted
    Drawn {
        /// Frame number within this loop, starting at 1
        frame: u64,
    },
    /// The loop was cancelled and drew nothing
    Cancelled,
    /// There is no live scene to draw
    Idle,
}

/// Per-scene redraw loop
#[derive(Debug)]
pub struct RenderLoop {
    token: LoopToken,
    timer: FrameTimer,
}

impl RenderLoop {
    /// Create an active loop for the scene of `generation`
    pub fn new(generation: Generation) -> Self {
        Self {
            token: LoopToken::new(generation),
            timer: FrameTimer::new(),
        }
    }

    /// Shared cancellation token
    pub fn token(&self) -> &LoopToken {
        &self.token
    }

    /// Stop the loop
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Frames drawn so far
    pub const fn frames_drawn(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Frame timing statistics
    pub const fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Draw one frame of `scene` into `target`
    pub fn tick<B: RenderBackend + ?Sized>(
        &mut self,
        scene: &mut Scene,
        object: Option<ObjectKey>,
        camera: &Camera,
        target: TargetId,
        state: &ViewState,
        backend: &mut B,
    ) -> Result<FrameOutcome, RenderError> {
        if self.token.is_cancelled() {
            return Ok(FrameOutcome::Cancelled);
        }

        if let Some(loaded) = object.and_then(|key| scene.object_mut(key)) {
            loaded.set_uniform_scale(state.scale);
        }
        backend.set_clear_color(target, state.background_color)?;
        backend.draw(target, scene, camera)?;

        self.timer.update();
        let frame = self.timer.frame_count();
        log::trace!(
            "{} frame {} (dt {:.4}s, {:.1} fps)",
            self.token.generation(),
            frame,
            self.timer.delta_time(),
            self.timer.current_fps()
        );
        Ok(FrameOutcome::Drawn { frame })
    }
}
