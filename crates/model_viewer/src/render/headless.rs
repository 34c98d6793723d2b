//! Headless rendering backend
//!
//! Implements [`RenderBackend`] and [`DisplaySurface`] without a GPU. Targets
//! are plain ids, mounting is bookkeeping, and every draw is recorded as a
//! [`FrameRecord`] so hosts and tests can inspect what would have been shown.

use std::collections::{HashMap, HashSet};

use super::lighting::LightMode;
use super::{BackendResult, Camera, DisplaySurface, RenderBackend, RenderError, TargetId, Viewport};
use crate::foundation::color::Color;
use crate::foundation::math::Vec3;
use crate::scene::Scene;
use crate::sync::Rotation;

/// Snapshot of one submitted frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Target that was drawn into
    pub target: TargetId,
    /// Clear color in effect
    pub clear_color: Color,
    /// Active light preset
    pub light_mode: LightMode,
    /// Objects in the scene graph
    pub object_count: usize,
    /// Root scale of the first object, if any
    pub object_scale: Option<Vec3>,
    /// Root rotation of the first object, if any
    pub object_rotation: Option<Rotation>,
    /// Camera position
    pub camera_position: Vec3,
    /// Camera look-at target
    pub camera_target: Vec3,
}

#[derive(Debug)]
struct TargetState {
    viewport: Viewport,
    clear_color: Color,
}

/// GPU-less backend that records what it is asked to do
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    next_id: u64,
    targets: HashMap<TargetId, TargetState>,
    mounted: HashSet<TargetId>,
    released: Vec<TargetId>,
    draw_count: u64,
    bytes_submitted: usize,
    last_frame: Option<FrameRecord>,
    fail_next_allocation: bool,
    fail_next_mount: bool,
}

impl HeadlessBackend {
    /// Create a backend with no targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `create_target` call fail
    pub fn fail_next_allocation(&mut self) {
        self.fail_next_allocation = true;
    }

    /// Make the next `mount` call fail
    pub fn fail_next_mount(&mut self) {
        self.fail_next_mount = true;
    }

    /// Targets allocated and not yet released
    pub fn live_target_count(&self) -> usize {
        self.targets.len()
    }

    /// Targets currently attached to the display, in id order
    pub fn mounted_targets(&self) -> Vec<TargetId> {
        let mut mounted: Vec<_> = self.mounted.iter().copied().collect();
        mounted.sort_by_key(|id| id.0);
        mounted
    }

    /// Every released target in release order
    pub fn released_targets(&self) -> &[TargetId] {
        &self.released
    }

    /// Viewport a live target was allocated with
    pub fn target_viewport(&self, target: TargetId) -> Option<Viewport> {
        self.targets.get(&target).map(|state| state.viewport)
    }

    /// Frames drawn over the backend's lifetime
    pub const fn draw_count(&self) -> u64 {
        self.draw_count
    }

    /// Vertex bytes submitted across every draw
    pub const fn bytes_submitted(&self) -> usize {
        self.bytes_submitted
    }

    /// Most recent frame
    pub const fn last_frame(&self) -> Option<&FrameRecord> {
        self.last_frame.as_ref()
    }

    fn target_mut(&mut self, target: TargetId) -> BackendResult<&mut TargetState> {
        self.targets.get_mut(&target).ok_or(RenderError::UnknownTarget(target))
    }
}

impl RenderBackend for HeadlessBackend {
    fn create_target(&mut self, viewport: Viewport) -> BackendResult<TargetId> {
        if std::mem::take(&mut self.fail_next_allocation) {
            return Err(RenderError::TargetAllocation(format!(
                "{}x{} target refused",
                viewport.width, viewport.height
            )));
        }
        if viewport.width == 0 || viewport.height == 0 {
            return Err(RenderError::TargetAllocation(format!(
                "empty viewport {}x{}",
                viewport.width, viewport.height
            )));
        }

        self.next_id += 1;
        let id = TargetId(self.next_id);
        self.targets.insert(id, TargetState { viewport, clear_color: Color::WHITE });
        log::debug!("Allocated headless target {:?} ({}x{})", id, viewport.width, viewport.height);
        Ok(id)
    }

    fn set_clear_color(&mut self, target: TargetId, color: Color) -> BackendResult<()> {
        self.target_mut(target)?.clear_color = color;
        Ok(())
    }

    fn draw(&mut self, target: TargetId, scene: &Scene, camera: &Camera) -> BackendResult<()> {
        let clear_color = self.target_mut(target)?.clear_color;

        let bytes: usize = scene
            .objects()
            .flat_map(|object| object.root().primitives_recursive())
            .map(|primitive| primitive.vertex_bytes().len())
            .sum();
        let first = scene.objects().next();

        self.draw_count += 1;
        self.bytes_submitted += bytes;
        self.last_frame = Some(FrameRecord {
            target,
            clear_color,
            light_mode: scene.light().mode,
            object_count: scene.object_count(),
            object_scale: first.map(|object| object.transform().scale),
            object_rotation: first.map(|object| object.rotation()),
            camera_position: camera.position,
            camera_target: camera.target,
        });
        Ok(())
    }

    fn release_target(&mut self, target: TargetId) {
        if self.targets.remove(&target).is_some() {
            self.mounted.remove(&target);
            self.released.push(target);
            log::debug!("Released headless target {:?}", target);
        }
    }
}

impl DisplaySurface for HeadlessBackend {
    fn mount(&mut self, target: TargetId) -> BackendResult<()> {
        if !self.targets.contains_key(&target) {
            return Err(RenderError::Mount(format!("target {target:?} does not exist")));
        }
        if std::mem::take(&mut self.fail_next_mount) {
            return Err(RenderError::Mount(format!("display refused target {target:?}")));
        }
        self.mounted.insert(target);
        Ok(())
    }

    fn unmount(&mut self, target: TargetId) {
        self.mounted.remove(&target);
    }
}
